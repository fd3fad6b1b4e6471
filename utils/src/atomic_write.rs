//! Atomic file write helpers.
//!
//! Bytes land in a temp file next to the destination and are renamed into
//! place, so readers see either the old contents or the new ones. Where the
//! rename cannot replace an existing file, the old file is parked at
//! `<name>.bak` for the duration of the swap.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPolicy {
    /// `sync_all` the temp file, then best-effort sync the parent directory.
    #[default]
    Durable,
    /// No explicit syncing. For scratch output and tests.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AtomicWriteOptions {
    pub sync: SyncPolicy,
    /// Unix permission bits applied to the written file. `None` keeps the umask default.
    /// Ignored on other platforms.
    pub unix_mode: Option<u32>,
}

impl AtomicWriteOptions {
    /// Fully synced, default permissions. Documents and reports.
    #[must_use]
    pub const fn durable_shared() -> Self {
        Self {
            sync: SyncPolicy::Durable,
            unix_mode: None,
        }
    }

    /// Fully synced, owner read/write only. Session snapshots.
    #[must_use]
    pub const fn owner_only() -> Self {
        Self {
            sync: SyncPolicy::Durable,
            unix_mode: Some(0o600),
        }
    }

    #[must_use]
    pub const fn with_sync(mut self, sync: SyncPolicy) -> Self {
        self.sync = sync;
        self
    }
}

/// `<path>.bak`, keeping the original extension (`notes.md` -> `notes.md.bak`).
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(".bak");
    path.with_file_name(name)
}

/// Restore `path` from its backup after an interrupted swap.
///
/// Only acts when `path` is missing and the backup exists. Returns whether a
/// backup was restored.
pub fn recover_bak_file(path: &Path) -> bool {
    let backup = backup_path(path);
    if path.exists() || !backup.exists() {
        return false;
    }
    match fs::rename(&backup, path) {
        Ok(()) => {
            tracing::warn!(path = %path.display(), "Recovered file from interrupted atomic write");
            true
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "Failed to recover backup file: {e}");
            false
        }
    }
}

pub fn atomic_write(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    atomic_write_with_options(path, bytes, AtomicWriteOptions::default())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

pub fn atomic_write_with_options(
    path: impl AsRef<Path>,
    bytes: &[u8],
    options: AtomicWriteOptions,
) -> io::Result<()> {
    let path = path.as_ref();
    let parent = parent_dir(path);

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    if options.sync != SyncPolicy::None {
        tmp.as_file().sync_all()?;
    }

    if let Err(err) = tmp.persist(path) {
        if !path.exists() {
            return Err(err.error);
        }
        // Rename-over-existing refused: park the old file, retry, restore on failure.
        let backup = backup_path(path);
        let _ = fs::remove_file(&backup);
        fs::rename(path, &backup)?;
        if let Err(retry) = err.file.persist(path) {
            let _ = fs::rename(&backup, path);
            return Err(retry.error);
        }
        if let Err(e) = fs::remove_file(&backup) {
            tracing::warn!(path = %backup.display(), "Failed to remove backup after atomic write: {e}");
        }
    }

    apply_mode(path, options.unix_mode)?;

    if options.sync == SyncPolicy::Durable {
        sync_dir(parent);
    }
    Ok(())
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: Option<u32>) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    if let Some(mode) = mode {
        fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: Option<u32>) -> io::Result<()> {
    Ok(())
}

fn sync_dir(dir: &Path) {
    #[cfg(unix)]
    if let Err(e) = fs::File::open(dir).and_then(|d| d.sync_all()) {
        debug!(path = %dir.display(), "Directory sync failed (best-effort): {e}");
    }
    #[cfg(not(unix))]
    debug!(path = %dir.display(), "Skipping directory sync on this platform");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;

    fn scratch() -> AtomicWriteOptions {
        AtomicWriteOptions::durable_shared().with_sync(SyncPolicy::None)
    }

    #[test]
    fn creates_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("draft.md");

        atomic_write_with_options(&path, b"# Title", scratch()).expect("write");

        assert_eq!(fs::read_to_string(&path).expect("read"), "# Title");
    }

    #[test]
    fn overwrites_existing_and_leaves_no_backup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.md");

        atomic_write(&path, b"one").expect("write one");
        atomic_write(&path, b"two").expect("write two");

        assert_eq!(fs::read_to_string(&path).expect("read"), "two");
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn missing_parent_directory_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nope").join("file.txt");
        assert!(atomic_write_with_options(&path, b"x", scratch()).is_err());
    }

    #[test]
    fn backup_path_keeps_extension() {
        assert_eq!(
            backup_path(Path::new("/tmp/session.json")),
            Path::new("/tmp/session.json.bak")
        );
        assert_eq!(backup_path(Path::new("plain")), Path::new("plain.bak"));
    }

    #[test]
    fn recover_restores_orphaned_backup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        fs::write(backup_path(&path), "saved").expect("seed backup");

        assert!(recover_bak_file(&path));
        assert_eq!(fs::read_to_string(&path).expect("read"), "saved");
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn recover_leaves_existing_file_alone() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        fs::write(&path, "current").expect("seed");
        fs::write(backup_path(&path), "stale").expect("seed backup");

        assert!(!recover_bak_file(&path));
        assert_eq!(fs::read_to_string(&path).expect("read"), "current");
    }

    #[cfg(unix)]
    #[test]
    fn owner_only_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");

        atomic_write_with_options(&path, b"{}", AtomicWriteOptions::owner_only()).expect("write");

        let mode = fs::metadata(&path).expect("metadata").permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
