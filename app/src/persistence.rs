//! Session snapshots: restore at startup, autosave while editing, final write on quit.

use std::time::Instant;

use notepad_session::SessionError;

use crate::App;

impl App {
    /// Restore the last snapshot, if the store has one.
    ///
    /// Restored text without a backing file is unsaved work, so it comes back dirty.
    pub fn restore_session(&mut self) -> bool {
        let Some(session) = self.store.as_ref().and_then(|store| store.load()) else {
            return false;
        };

        if !session.text.is_empty() {
            self.buffer.set_text(&session.text);
        }
        self.current_file = session.current_file;
        self.last_harmony = session.last_harmony;
        match session.cursor {
            Some(cursor) => self.buffer.set_cursor_index(cursor),
            None => self.buffer.move_to_end(),
        }
        self.dirty = !session.text.is_empty() && self.current_file.is_none();
        self.note = format!("Restored session from {}", session.updated_at_utc);
        tracing::info!(
            chars = session.text.chars().count(),
            dirty = self.dirty,
            "Restored session"
        );
        true
    }

    /// Write a snapshot now. A disabled store is a no-op.
    pub fn write_snapshot(&mut self, now: Instant) -> Result<(), SessionError> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        store.save(
            &self.buffer.text(),
            self.current_file.as_deref(),
            self.buffer.cursor_index(),
            self.last_harmony,
        )?;
        self.last_snapshot = now;
        Ok(())
    }

    /// Snapshot when dirty and the current autosave interval has elapsed.
    ///
    /// Returns whether a snapshot was attempted.
    pub fn autosave_if_due(&mut self, now: Instant) -> bool {
        if !self.dirty || self.store.is_none() {
            return false;
        }
        let interval = self.controller.autosave_interval(&self.buffer.text());
        if now.saturating_duration_since(self.last_snapshot) < interval {
            return false;
        }

        match self.write_snapshot(now) {
            Ok(()) => {
                self.note = "Autosaved session snapshot".to_string();
            }
            Err(e) => {
                tracing::warn!("Autosave failed: {e}");
                self.note = format!("Autosave failed: {e}");
            }
        }
        true
    }

    /// Final best-effort snapshot before exit.
    pub fn shutdown(&mut self, now: Instant) {
        if let Err(e) = self.write_snapshot(now) {
            tracing::warn!("Final session snapshot failed: {e}");
        }
    }
}
