//! Editing-session state machine for Resonant Notepad.
//!
//! [`App`] owns the text buffer, the resonance controller and the session
//! store. It has no timers and no terminal: the caller drives it with
//! [`App::tick`] and forwards key actions to it, and the TUI reads state
//! back out for rendering.
//!
//! # Cadence
//!
//! Two independent clocks run off the `Instant`s passed to `tick`:
//!
//! 1. **Refresh** (default 300 ms): one controller evaluation, which is
//!    exactly one engine tick, plus guidance, autosave interval and trend.
//! 2. **Autosave check** (default 2 s): writes a session snapshot when the
//!    document is dirty and the current autosave interval has elapsed since
//!    the last snapshot.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notepad_config::NotepadConfig;
use notepad_core::ResonanceController;
use notepad_session::SessionStore;
use notepad_types::HarmonyBand;

mod buffer;
mod files;
mod persistence;
mod telemetry;

pub use buffer::TextBuffer;
pub use files::{ConfirmChoice, PathPurpose, PendingAction, Prompt};
pub use telemetry::{INITIAL_GUIDANCE, TREND_THRESHOLD, Telemetry, Trend};

pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelTab {
    #[default]
    Resonance,
    Preview,
}

impl PanelTab {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            PanelTab::Resonance => "Resonance",
            PanelTab::Preview => "Markdown Preview",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            PanelTab::Resonance => PanelTab::Preview,
            PanelTab::Preview => PanelTab::Resonance,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppOptions {
    pub refresh_interval: Duration,
    pub autosave_check_interval: Duration,
    pub ui: UiOptions,
    pub show_preview: bool,
    /// Where the preview toggle is persisted. `None` keeps it in memory only.
    pub config_path: Option<PathBuf>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(notepad_config::DEFAULT_REFRESH_INTERVAL_MS),
            autosave_check_interval: Duration::from_millis(
                notepad_config::DEFAULT_AUTOSAVE_CHECK_MS,
            ),
            ui: UiOptions::default(),
            show_preview: false,
            config_path: None,
        }
    }
}

impl AppOptions {
    #[must_use]
    pub fn from_config(config: &NotepadConfig) -> Self {
        Self {
            refresh_interval: config.refresh_interval(),
            autosave_check_interval: config.autosave_check_interval(),
            ui: UiOptions {
                ascii_only: config.ascii_only(),
                high_contrast: config.high_contrast(),
            },
            show_preview: config.show_preview(),
            config_path: notepad_config::config_path(),
        }
    }
}

/// Session store selected by the config: disabled, configured dir, or `~/.resonant-notepad`.
#[must_use]
pub fn session_store_for(config: &NotepadConfig) -> Option<SessionStore> {
    if !config.session_enabled() {
        return None;
    }
    config
        .session_dir()
        .map(SessionStore::new)
        .or_else(SessionStore::default_location)
}

pub struct App {
    buffer: TextBuffer,
    controller: ResonanceController,
    store: Option<SessionStore>,
    options: AppOptions,
    current_file: Option<PathBuf>,
    dirty: bool,
    telemetry: Telemetry,
    /// Harmony shown at the latest refresh (or restored from the session).
    last_harmony: f64,
    /// Baseline for the trend delta: the harmony shown one refresh before
    /// `last_harmony`. Restore leaves it alone.
    prev_harmony: f64,
    note: String,
    panel: PanelTab,
    prompt: Option<Prompt>,
    last_refresh: Instant,
    last_autosave_check: Instant,
    last_snapshot: Instant,
    should_quit: bool,
}

impl App {
    pub fn new(options: AppOptions, store: Option<SessionStore>, now: Instant) -> Self {
        let controller = ResonanceController::new();
        let last_harmony = controller.state().harmony();
        let panel = if options.show_preview {
            PanelTab::Preview
        } else {
            PanelTab::Resonance
        };
        Self {
            buffer: TextBuffer::default(),
            telemetry: Telemetry::initial(controller.autosave_interval_seconds("")),
            controller,
            store,
            options,
            current_file: None,
            dirty: false,
            last_harmony,
            prev_harmony: last_harmony,
            note: "No autosave yet".to_string(),
            panel,
            prompt: None,
            last_refresh: now,
            last_autosave_check: now,
            last_snapshot: now,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    #[must_use]
    pub fn controller(&self) -> &ResonanceController {
        &self.controller
    }

    #[must_use]
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    #[must_use]
    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    #[must_use]
    pub fn last_harmony(&self) -> f64 {
        self.last_harmony
    }

    #[must_use]
    pub fn band(&self) -> HarmonyBand {
        HarmonyBand::classify(self.last_harmony)
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.options.ui
    }

    #[must_use]
    pub fn panel(&self) -> PanelTab {
        self.panel
    }

    #[must_use]
    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    #[must_use]
    pub fn session_store(&self) -> Option<&SessionStore> {
        self.store.as_ref()
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Switch side-panel tabs and remember the choice in the config file.
    pub fn toggle_panel(&mut self) {
        self.panel = self.panel.toggled();
        let show = self.panel == PanelTab::Preview;
        if let Some(path) = &self.options.config_path
            && let Err(e) = notepad_config::persist_show_preview_at(path, show)
        {
            tracing::warn!("Failed to persist preview setting: {e}");
        }
    }

    /// Advance both clocks to `now`, doing whatever work has come due.
    pub fn tick(&mut self, now: Instant) {
        if now.saturating_duration_since(self.last_refresh) >= self.options.refresh_interval {
            self.last_refresh = now;
            self.refresh();
        }
        if now.saturating_duration_since(self.last_autosave_check)
            >= self.options.autosave_check_interval
        {
            self.last_autosave_check = now;
            self.autosave_if_due(now);
        }
    }

    /// One resonance evaluation of the current text.
    pub fn refresh(&mut self) {
        let text = self.buffer.text();
        let reading = self.controller.evaluate(&text);
        let delta = reading.harmony - self.prev_harmony;
        self.prev_harmony = self.last_harmony;
        self.last_harmony = reading.harmony;

        self.telemetry = Telemetry {
            reading: Some(reading),
            guidance: self.controller.guidance(&text).to_string(),
            autosave_seconds: self.controller.autosave_interval_seconds(&text),
            delta,
            trend: Trend::from_delta(delta),
        };
        tracing::debug!(
            harmony = reading.harmony,
            delta,
            autosave_seconds = self.telemetry.autosave_seconds,
            "Refreshed resonance"
        );
    }

    #[must_use]
    pub fn file_label(&self) -> String {
        self.current_file
            .as_deref()
            .and_then(Path::file_name)
            .map_or_else(|| UNTITLED.to_string(), |n| n.to_string_lossy().into_owned())
    }

    /// `<file>[*] | Words: N | Chars: N | Harmony: h.hhh <arrow> | Autosave: Ns | <note>`
    #[must_use]
    pub fn status_line(&self) -> String {
        format!(
            "{}{} | Words: {} | Chars: {} | Harmony: {:.3} {} | Autosave: {}s | {}",
            self.file_label(),
            if self.dirty { "*" } else { "" },
            self.buffer.word_count(),
            self.buffer.char_count(),
            self.last_harmony,
            self.telemetry.trend.glyph(self.options.ui.ascii_only),
            self.telemetry.autosave_seconds,
            self.note,
        )
    }

    // ========================================================================
    // Editing
    // ========================================================================

    pub fn insert_char(&mut self, ch: char) {
        self.buffer.insert_char(ch);
        self.dirty = true;
    }

    pub fn insert_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.buffer.insert_str(text);
        self.dirty = true;
    }

    pub fn insert_newline(&mut self) {
        self.buffer.insert_newline();
        self.dirty = true;
    }

    pub fn backspace(&mut self) {
        if self.buffer.backspace() {
            self.dirty = true;
        }
    }

    pub fn delete(&mut self) {
        if self.buffer.delete() {
            self.dirty = true;
        }
    }

    pub fn cursor_mut(&mut self) -> CursorMut<'_> {
        CursorMut(&mut self.buffer)
    }
}

/// Cursor-only access to the buffer; cannot change text or dirtiness.
pub struct CursorMut<'a>(&'a mut TextBuffer);

impl CursorMut<'_> {
    pub fn left(&mut self) {
        self.0.move_left();
    }

    pub fn right(&mut self) {
        self.0.move_right();
    }

    pub fn up(&mut self) {
        self.0.move_up();
    }

    pub fn down(&mut self) {
        self.0.move_down();
    }

    pub fn home(&mut self) {
        self.0.move_home();
    }

    pub fn end(&mut self) {
        self.0.move_end();
    }
}
