//! Configuration for Resonant Notepad.
//!
//! Read from `~/.resonant-notepad/config.toml`. Every section and key is
//! optional; missing values fall back to the defaults exposed through the
//! resolved accessors on [`NotepadConfig`].

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use notepad_utils::{AtomicWriteOptions, atomic_write_with_options};

pub const CONFIG_DIR: &str = ".resonant-notepad";
pub const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 300;
pub const DEFAULT_AUTOSAVE_CHECK_MS: u64 = 2_000;
pub const DEFAULT_BENCHMARK_OUTPUT_DIR: &str = "docs";

const MIN_TIMER_MS: u64 = 50;
const MAX_TIMER_MS: u64 = 60_000;

const fn default_true() -> bool {
    true
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to update config at {}: {source}", path.display())]
    Persist { path: PathBuf, source: io::Error },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Persist { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct NotepadConfig {
    pub app: Option<AppConfig>,
    pub editor: Option<EditorConfig>,
    pub session: Option<SessionConfig>,
    pub benchmark: Option<BenchmarkConfig>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct AppConfig {
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Use ASCII-only glyphs for trend arrows and separators.
    #[serde(default)]
    pub ascii_only: bool,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct EditorConfig {
    /// Delay between resonance refreshes.
    pub refresh_interval_ms: Option<u64>,
    /// Delay between autosave checks.
    pub autosave_check_ms: Option<u64>,
    /// Open on the markdown preview tab instead of the resonance tab.
    #[serde(default)]
    pub show_preview: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Session directory. `${VAR}` references are expanded.
    pub dir: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct BenchmarkConfig {
    pub output_dir: Option<String>,
}

/// Expand `${VAR}` references from the environment.
///
/// Unset variables expand to the empty string. An unterminated `${` is kept
/// verbatim.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        if !name.is_empty() {
            out.push_str(&env::var(name).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

fn clamp_timer(ms: Option<u64>, default: u64) -> Duration {
    Duration::from_millis(ms.unwrap_or(default).clamp(MIN_TIMER_MS, MAX_TIMER_MS))
}

impl NotepadConfig {
    /// Load the user config. `Ok(None)` when no home directory or no file exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {}: {source}", path.display());
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::parse(&content).map_err(|source| {
            tracing::warn!("Failed to parse config at {}: {source}", path.display());
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn high_contrast(&self) -> bool {
        self.app.as_ref().is_some_and(|app| app.high_contrast)
    }

    #[must_use]
    pub fn ascii_only(&self) -> bool {
        self.app.as_ref().is_some_and(|app| app.ascii_only)
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        clamp_timer(
            self.editor.as_ref().and_then(|e| e.refresh_interval_ms),
            DEFAULT_REFRESH_INTERVAL_MS,
        )
    }

    #[must_use]
    pub fn autosave_check_interval(&self) -> Duration {
        clamp_timer(
            self.editor.as_ref().and_then(|e| e.autosave_check_ms),
            DEFAULT_AUTOSAVE_CHECK_MS,
        )
    }

    #[must_use]
    pub fn show_preview(&self) -> bool {
        self.editor.as_ref().is_some_and(|e| e.show_preview)
    }

    #[must_use]
    pub fn session_enabled(&self) -> bool {
        self.session.as_ref().is_none_or(|s| s.enabled)
    }

    /// Configured session directory after `${VAR}` expansion. Blank means unset.
    #[must_use]
    pub fn session_dir(&self) -> Option<PathBuf> {
        let raw = self.session.as_ref()?.dir.as_deref()?;
        let expanded = expand_env_vars(raw);
        let trimmed = expanded.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }

    #[must_use]
    pub fn benchmark_output_dir(&self) -> PathBuf {
        self.benchmark
            .as_ref()
            .and_then(|b| b.output_dir.as_deref())
            .map(expand_env_vars)
            .filter(|dir| !dir.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_BENCHMARK_OUTPUT_DIR), PathBuf::from)
    }
}

/// Set `[editor] show_preview` in the file at `path`.
///
/// Edits through `toml_edit` so comments and unrelated keys survive. Creates
/// the file and its parent directory when missing.
pub fn persist_show_preview_at(path: &Path, show: bool) -> Result<(), ConfigError> {
    let persist_err = |source: io::Error| ConfigError::Persist {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(persist_err)?;
    }

    let content = if path.exists() {
        fs::read_to_string(path).map_err(persist_err)?
    } else {
        String::new()
    };

    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| persist_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;

    if !doc.contains_table("editor") {
        doc["editor"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["editor"]["show_preview"] = toml_edit::value(show);

    atomic_write_with_options(
        path,
        doc.to_string().as_bytes(),
        AtomicWriteOptions::durable_shared(),
    )
    .map_err(persist_err)?;

    tracing::debug!(path = %path.display(), show, "Persisted preview setting");
    Ok(())
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILENAME))
}
