// src/watch/scan.rs

//! Recursive mtime scan over the watch set.
//!
//! Every file reachable from the watch set contributes its modification
//! time to a running maximum. Failures never abort the scan: the affected
//! entry is recorded in the [`ScanReport`] and otherwise ignored.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, trace};

use crate::fs::FileSystem;

/// Aggregate modification time, in nanoseconds since the UNIX epoch.
///
/// [`Timestamp::ZERO`] means nothing was observed. Values are only ever
/// compared for equality by the change detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u128);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    /// `None` for times before the UNIX epoch.
    pub fn from_system_time(time: SystemTime) -> Option<Self> {
        time.duration_since(UNIX_EPOCH)
            .ok()
            .map(|d| Timestamp(d.as_nanos()))
    }

    pub fn from_nanos(nanos: u128) -> Self {
        Timestamp(nanos)
    }

    pub fn as_nanos(self) -> u128 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.0 / 1_000_000_000, self.0 % 1_000_000_000)
    }
}

/// What happened to a single path during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEntry {
    /// A file whose mtime was read.
    Observed { path: PathBuf, modified: Timestamp },
    /// A file whose metadata could not be read.
    Skipped { path: PathBuf, reason: String },
    /// A directory that could not be listed.
    Unlisted { path: PathBuf, reason: String },
    /// A directory already scanned through another path (symlink).
    Revisited { path: PathBuf },
}

impl ScanEntry {
    pub fn path(&self) -> &Path {
        match self {
            ScanEntry::Observed { path, .. }
            | ScanEntry::Skipped { path, .. }
            | ScanEntry::Unlisted { path, .. }
            | ScanEntry::Revisited { path } => path,
        }
    }
}

/// Result of [`scan_report`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    latest: Timestamp,
    entries: Vec<ScanEntry>,
}

impl ScanReport {
    /// Maximum mtime over all observed files, `ZERO` if none.
    pub fn latest(&self) -> Timestamp {
        self.latest
    }

    pub fn entries(&self) -> &[ScanEntry] {
        &self.entries
    }

    pub fn observed(&self) -> impl Iterator<Item = (&Path, Timestamp)> {
        self.entries.iter().filter_map(|e| match e {
            ScanEntry::Observed { path, modified } => Some((path.as_path(), *modified)),
            _ => None,
        })
    }

    /// Entries that contributed nothing because of an error.
    pub fn failures(&self) -> impl Iterator<Item = &ScanEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e, ScanEntry::Skipped { .. } | ScanEntry::Unlisted { .. }))
    }

    fn record(&mut self, entry: ScanEntry) {
        if let ScanEntry::Observed { modified, .. } = &entry {
            self.latest = self.latest.max(*modified);
        }
        self.entries.push(entry);
    }
}

/// Maximum modification time across every file reachable from `paths`.
pub fn scan<F: FileSystem + ?Sized>(fs: &F, paths: &[PathBuf]) -> Timestamp {
    scan_report(fs, paths).latest()
}

/// Like [`scan`], but keeps the per-path outcome.
pub fn scan_report<F: FileSystem + ?Sized>(fs: &F, paths: &[PathBuf]) -> ScanReport {
    let mut report = ScanReport::default();
    let mut visited = HashSet::new();
    scan_into(fs, paths, &mut visited, &mut report);
    trace!(
        latest = %report.latest,
        entries = report.entries.len(),
        "scan finished"
    );
    report
}

fn scan_into<F: FileSystem + ?Sized>(
    fs: &F,
    paths: &[PathBuf],
    visited: &mut HashSet<PathBuf>,
    report: &mut ScanReport,
) {
    for path in paths {
        if fs.is_dir(path) {
            scan_dir(fs, path, visited, report);
        } else {
            scan_file(fs, path, report);
        }
    }
}

fn scan_dir<F: FileSystem + ?Sized>(
    fs: &F,
    path: &Path,
    visited: &mut HashSet<PathBuf>,
    report: &mut ScanReport,
) {
    // If canonicalization fails the listing below fails too, or the
    // directory is scanned without cycle protection for this one step.
    if let Ok(canonical) = fs.canonicalize(path) {
        if !visited.insert(canonical) {
            debug!(path = ?path, "directory already scanned; skipping");
            report.record(ScanEntry::Revisited {
                path: path.to_path_buf(),
            });
            return;
        }
    }

    match fs.read_dir(path) {
        Ok(children) => scan_into(fs, &children, visited, report),
        Err(err) => {
            debug!(path = ?path, error = %err, "cannot list directory; skipping");
            report.record(ScanEntry::Unlisted {
                path: path.to_path_buf(),
                reason: format!("{err:#}"),
            });
        }
    }
}

fn scan_file<F: FileSystem + ?Sized>(fs: &F, path: &Path, report: &mut ScanReport) {
    let entry = match fs.modified(path) {
        Ok(time) => match Timestamp::from_system_time(time) {
            Some(modified) => ScanEntry::Observed {
                path: path.to_path_buf(),
                modified,
            },
            None => ScanEntry::Skipped {
                path: path.to_path_buf(),
                reason: "modification time before UNIX epoch".to_string(),
            },
        },
        Err(err) => {
            debug!(path = ?path, error = %err, "cannot read modification time; skipping");
            ScanEntry::Skipped {
                path: path.to_path_buf(),
                reason: format!("{err:#}"),
            }
        }
    };
    report.record(entry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::{mtime, MockFileSystem};

    fn ts(secs: u64) -> Timestamp {
        Timestamp::from_system_time(mtime(secs)).unwrap()
    }

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn empty_watch_set_yields_zero() {
        let fs = MockFileSystem::new();
        assert_eq!(scan(&fs, &[]), Timestamp::ZERO);
    }

    #[test]
    fn takes_maximum_across_files_and_directories() {
        let fs = MockFileSystem::new();
        fs.add_file("a.txt", 100);
        fs.add_file("dir/b.txt", 150);
        fs.add_file("dir/sub/c.txt", 120);

        assert_eq!(scan(&fs, &paths(&["a.txt", "dir"])), ts(150));
        assert_eq!(scan(&fs, &paths(&["a.txt"])), ts(100));
    }

    #[test]
    fn missing_paths_are_skipped_not_fatal() {
        let fs = MockFileSystem::new();
        fs.add_file("a.txt", 7);

        let report = scan_report(&fs, &paths(&["nope.txt", "a.txt"]));
        assert_eq!(report.latest(), ts(7));
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.failures().next().unwrap().path(), Path::new("nope.txt"));
    }

    #[test]
    fn all_unreadable_yields_zero() {
        let fs = MockFileSystem::new();
        fs.add_file("w/a.txt", 9);
        fs.deny("w/a.txt");

        let report = scan_report(&fs, &paths(&["w"]));
        assert_eq!(report.latest(), Timestamp::ZERO);
        assert!(matches!(
            report.entries(),
            [ScanEntry::Skipped { reason, .. }] if reason.contains("Permission denied")
        ));
    }

    #[test]
    fn unlistable_directory_is_recorded_and_skipped() {
        let fs = MockFileSystem::new();
        fs.add_file("open/a.txt", 3);
        fs.add_file("locked/b.txt", 30);
        fs.deny("locked");

        let report = scan_report(&fs, &paths(&["open", "locked"]));
        assert_eq!(report.latest(), ts(3));
        assert!(report
            .entries()
            .iter()
            .any(|e| matches!(e, ScanEntry::Unlisted { path, .. } if path == Path::new("locked"))));
    }

    #[test]
    fn symlink_cycle_terminates() {
        let fs = MockFileSystem::new();
        fs.add_file("root/a.txt", 11);
        fs.add_link("root/again", "root");

        let report = scan_report(&fs, &paths(&["root"]));
        assert_eq!(report.latest(), ts(11));
        assert_eq!(report.observed().count(), 1);
        assert!(report
            .entries()
            .iter()
            .any(|e| matches!(e, ScanEntry::Revisited { .. })));
    }

    #[test]
    fn timestamp_display_has_nanosecond_fraction() {
        let t = Timestamp::from_nanos(1_500_000_000);
        assert_eq!(t.to_string(), "1.500000000");
        assert_eq!(t.as_nanos(), 1_500_000_000);
        assert!(Timestamp::ZERO.is_zero());
    }
}
