//! Session snapshots for crash-safe restore.
//!
//! A snapshot captures the editor text, the backing file (if any), the cursor
//! and the last displayed harmony. It is written to `session.json` inside the
//! session directory whenever autosave fires or a file operation completes,
//! and read back once at startup.
//!
//! Only the scalar harmony is stored. The engine always restarts from its
//! anchors.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use notepad_types::CursorIndex;
use notepad_utils::{AtomicWriteOptions, atomic_write_with_options, recover_bak_file};

pub const SESSION_DIR: &str = ".resonant-notepad";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session io error: {0}")]
    Io(#[from] io::Error),
    #[error("session serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

const fn current_version() -> u32 {
    SessionData::CURRENT_VERSION
}

/// A stored cursor that does not parse loads as `None` instead of failing the
/// whole snapshot.
fn lenient_cursor<'de, D>(deserializer: D) -> Result<Option<CursorIndex>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(text) = raw.as_ref().and_then(serde_json::Value::as_str) else {
        tracing::debug!("Ignoring non-string stored cursor {raw:?}");
        return Ok(None);
    };
    match text.parse() {
        Ok(cursor) => Ok(Some(cursor)),
        Err(e) => {
            tracing::debug!("Ignoring stored cursor {text:?}: {e}");
            Ok(None)
        }
    }
}

/// Persisted editor snapshot.
///
/// Every field has a default so older or hand-edited files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionData {
    pub text: String,
    pub current_file: Option<PathBuf>,
    /// Defaults to `1.0` when absent. `None` when the stored value does not
    /// parse; restore then places the cursor at the end of the text.
    #[serde(rename = "cursor_index", deserialize_with = "lenient_cursor")]
    pub cursor: Option<CursorIndex>,
    pub last_harmony: f64,
    /// RFC 3339 UTC timestamp of the write.
    pub updated_at_utc: String,
    /// Schema version. Files without one are treated as current.
    #[serde(default = "current_version")]
    pub version: u32,
}

impl Default for SessionData {
    fn default() -> Self {
        Self {
            text: String::new(),
            current_file: None,
            cursor: Some(CursorIndex::START),
            last_harmony: 0.0,
            updated_at_utc: String::new(),
            version: Self::CURRENT_VERSION,
        }
    }
}

impl SessionData {
    pub const CURRENT_VERSION: u32 = 1;

    pub const FILENAME: &'static str = "session.json";

    #[must_use]
    pub fn is_compatible(&self) -> bool {
        self.version == Self::CURRENT_VERSION
    }
}

/// Reads and writes the snapshot file in one directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
    path: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let path = dir.join(SessionData::FILENAME);
        Self { dir, path }
    }

    /// `~/.resonant-notepad`, or `None` without a home directory.
    #[must_use]
    pub fn default_location() -> Option<Self> {
        dirs::home_dir().map(|home| Self::new(home.join(SESSION_DIR)))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn session_path(&self) -> &Path {
        &self.path
    }

    /// Load the last snapshot. Any failure is logged and treated as "no session".
    #[must_use]
    pub fn load(&self) -> Option<SessionData> {
        recover_bak_file(&self.path);
        if !self.path.exists() {
            return None;
        }

        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Failed to read session snapshot: {e}");
                return None;
            }
        };

        match serde_json::from_str::<SessionData>(&data) {
            Ok(session) if session.is_compatible() => {
                tracing::debug!("Loaded session snapshot from {}", self.path.display());
                Some(session)
            }
            Ok(session) => {
                tracing::debug!(
                    version = session.version,
                    "Session snapshot version mismatch, starting fresh"
                );
                None
            }
            Err(e) => {
                tracing::warn!("Failed to parse session snapshot: {e}");
                None
            }
        }
    }

    /// Write a snapshot stamped with the current UTC time.
    pub fn save(
        &self,
        text: &str,
        current_file: Option<&Path>,
        cursor: CursorIndex,
        last_harmony: f64,
    ) -> Result<SessionData, SessionError> {
        let data = SessionData {
            text: text.to_owned(),
            current_file: current_file.map(Path::to_path_buf),
            cursor: Some(cursor),
            last_harmony,
            updated_at_utc: chrono::Utc::now().to_rfc3339(),
            version: SessionData::CURRENT_VERSION,
        };
        self.write(&data)?;
        Ok(data)
    }

    fn write(&self, data: &SessionData) -> Result<(), SessionError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(data)?;
        atomic_write_with_options(&self.path, json.as_bytes(), AtomicWriteOptions::owner_only())?;
        tracing::debug!(
            path = %self.path.display(),
            chars = data.text.chars().count(),
            harmony = data.last_harmony,
            "Wrote session snapshot"
        );
        Ok(())
    }
}
