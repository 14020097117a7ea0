// src/watch/mod.rs

//! Change detection by polling modification times.
//!
//! This module is responsible for:
//! - Walking the watch set and folding file mtimes into one aggregate
//!   [`Timestamp`] ([`scan`]).
//! - Keeping the previous aggregate and deciding whether a poll cycle saw a
//!   change ([`state`]).
//!
//! It does **not** run commands or sleep; the engine owns the loop.

pub mod scan;
pub mod state;

pub use scan::{scan, scan_report, ScanEntry, ScanReport, Timestamp};
pub use state::{Change, WatchState};
