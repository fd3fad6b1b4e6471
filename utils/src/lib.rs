//! Shared infrastructure utilities for Resonant Notepad.
//!
//! - **`atomic_write`**: crash-safe file persistence (temp + rename) used by
//!   document saves, session snapshots, config edits and benchmark reports.

pub mod atomic_write;

pub use atomic_write::{
    AtomicWriteOptions, SyncPolicy, atomic_write, atomic_write_with_options, backup_path,
    recover_bak_file,
};
