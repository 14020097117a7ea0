// src/watch/state.rs

use std::path::PathBuf;

use crate::watch::scan::Timestamp;

/// Result of comparing a fresh scan with the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Unchanged,
    Changed {
        previous: Timestamp,
        current: Timestamp,
    },
}

/// Watch set, command and the last committed aggregate timestamp.
///
/// Owned by the runtime; the watch set and command never change after
/// construction.
#[derive(Debug, Clone)]
pub struct WatchState {
    paths: Vec<PathBuf>,
    command: String,
    previous: Timestamp,
}

impl WatchState {
    pub fn new(paths: Vec<PathBuf>, command: impl Into<String>) -> Self {
        Self {
            paths,
            command: command.into(),
            previous: Timestamp::ZERO,
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn previous(&self) -> Timestamp {
        self.previous
    }

    /// Any difference counts, including a timestamp moving backwards.
    pub fn observe(&self, candidate: Timestamp) -> Change {
        if candidate == self.previous {
            Change::Unchanged
        } else {
            Change::Changed {
                previous: self.previous,
                current: candidate,
            }
        }
    }

    pub fn commit(&mut self, candidate: Timestamp) {
        self.previous = candidate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> WatchState {
        WatchState::new(vec![PathBuf::from("watched")], "echo built")
    }

    #[test]
    fn starts_at_zero_so_first_nonzero_scan_is_a_change() {
        let s = state();
        assert_eq!(s.previous(), Timestamp::ZERO);
        assert_eq!(s.observe(Timestamp::ZERO), Change::Unchanged);
        assert_eq!(
            s.observe(Timestamp::from_nanos(100)),
            Change::Changed {
                previous: Timestamp::ZERO,
                current: Timestamp::from_nanos(100)
            }
        );
    }

    #[test]
    fn observe_does_not_commit() {
        let mut s = state();
        let t = Timestamp::from_nanos(5);
        assert!(matches!(s.observe(t), Change::Changed { .. }));
        assert!(matches!(s.observe(t), Change::Changed { .. }));
        s.commit(t);
        assert_eq!(s.observe(t), Change::Unchanged);
    }

    #[test]
    fn backwards_move_is_a_change() {
        let mut s = state();
        s.commit(Timestamp::from_nanos(200));
        assert!(matches!(
            s.observe(Timestamp::from_nanos(150)),
            Change::Changed { .. }
        ));
    }
}
