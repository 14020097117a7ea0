// src/fs/mock.rs

//! In-memory filesystem for tests.
//!
//! Files carry a modification time (whole seconds since the UNIX epoch) and
//! can be made unreadable; directories can be made unlistable. Symlinks are
//! modelled as whole-path aliases so that cycles can be built.

use super::FileSystem;
use anyhow::{anyhow, bail, Result};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Upper bound on alias hops while resolving a path.
const MAX_LINK_HOPS: usize = 32;

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { modified: SystemTime, readable: bool },
    Dir { children: Vec<String>, listable: bool },
    Link(PathBuf),
}

#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

/// Convert whole seconds to a `SystemTime`.
pub fn mtime(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        // Ensure root exists
        files.insert(
            PathBuf::from("."),
            MockEntry::Dir {
                children: Vec::new(),
                listable: true,
            },
        );

        Self {
            files: Arc::new(Mutex::new(files)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        // A poisoned lock only means another test thread panicked.
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add (or overwrite) a file with the given mtime in seconds.
    pub fn add_file(&self, path: impl AsRef<Path>, secs: u64) {
        self.insert(
            path.as_ref(),
            MockEntry::File {
                modified: mtime(secs),
                readable: true,
            },
        );
    }

    /// Add an empty directory.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut files = self.lock();
        ensure_dir_entry(&mut files, path);
    }

    /// Add a symlink at `path` pointing at `target`.
    pub fn add_link(&self, path: impl AsRef<Path>, target: impl AsRef<Path>) {
        self.insert(path.as_ref(), MockEntry::Link(target.as_ref().to_path_buf()));
    }

    /// Change the mtime of an existing file.
    pub fn set_modified(&self, path: impl AsRef<Path>, secs: u64) {
        let mut files = self.lock();
        if let Some(MockEntry::File { modified, .. }) = files.get_mut(path.as_ref()) {
            *modified = mtime(secs);
        }
    }

    /// Make a file unreadable or a directory unlistable.
    pub fn deny(&self, path: impl AsRef<Path>) {
        let mut files = self.lock();
        match files.get_mut(path.as_ref()) {
            Some(MockEntry::File { readable, .. }) => *readable = false,
            Some(MockEntry::Dir { listable, .. }) => *listable = false,
            _ => {}
        }
    }

    /// Delete an entry but leave it listed in its parent, as if it vanished
    /// between a directory listing and the stat call.
    pub fn vanish(&self, path: impl AsRef<Path>) {
        self.lock().remove(path.as_ref());
    }

    /// Delete an entry and unlink it from its parent.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut files = self.lock();
        files.remove(path);
        let parent = parent_of(path);
        if let (Some(MockEntry::Dir { children, .. }), Some(name)) =
            (files.get_mut(parent), path.file_name().and_then(|n| n.to_str()))
        {
            children.retain(|c| c != name);
        }
    }

    fn insert(&self, path: &Path, entry: MockEntry) {
        let mut files = self.lock();
        files.insert(path.to_path_buf(), entry);
        link_into_parent(&mut files, path);
    }
}

fn parent_of(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if files.contains_key(path) {
        return;
    }
    files.insert(
        path.to_path_buf(),
        MockEntry::Dir {
            children: Vec::new(),
            listable: true,
        },
    );
    link_into_parent(files, path);
}

fn link_into_parent(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let parent = parent_of(path);
    // Avoid infinite loop at root
    if parent == path {
        return;
    }
    ensure_dir_entry(files, parent);
    if let (Some(MockEntry::Dir { children, .. }), Some(name)) =
        (files.get_mut(parent), path.file_name().and_then(|n| n.to_str()))
    {
        if !children.iter().any(|c| c == name) {
            children.push(name.to_string());
        }
    }
}

/// Resolve aliases component by component.
fn resolve(files: &HashMap<PathBuf, MockEntry>, path: &Path) -> Result<PathBuf> {
    let mut resolved = PathBuf::new();
    let mut hops = 0;
    for component in path.components() {
        match component {
            Component::CurDir if resolved.as_os_str().is_empty() => resolved.push("."),
            Component::CurDir => {}
            other => resolved.push(other),
        }
        while let Some(MockEntry::Link(target)) = files.get(&resolved) {
            hops += 1;
            if hops > MAX_LINK_HOPS {
                bail!("too many levels of symbolic links: {:?}", path);
            }
            resolved = target.clone();
        }
    }
    Ok(resolved)
}

impl FileSystem for MockFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        let files = self.lock();
        match resolve(&files, path) {
            Ok(real) => matches!(files.get(&real), Some(MockEntry::Dir { .. })),
            Err(_) => false,
        }
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let files = self.lock();
        let real = resolve(&files, path)?;
        match files.get(&real) {
            Some(MockEntry::Dir {
                children,
                listable: true,
            }) => Ok(children.iter().map(|name| path.join(name)).collect()),
            Some(MockEntry::Dir { listable: false, .. }) => {
                Err(anyhow!("Permission denied: {:?}", path))
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        let files = self.lock();
        let real = resolve(&files, path)?;
        match files.get(&real) {
            Some(MockEntry::File {
                modified,
                readable: true,
            }) => Ok(*modified),
            Some(MockEntry::File { readable: false, .. }) => {
                Err(anyhow!("Permission denied: {:?}", path))
            }
            Some(MockEntry::Dir { .. }) => Ok(UNIX_EPOCH),
            _ => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        let files = self.lock();
        let real = resolve(&files, path)?;
        if files.contains_key(&real) {
            Ok(real)
        } else {
            Err(anyhow!("File not found: {:?}", path))
        }
    }
}
