//! Document file operations and the prompts that guard them.
//!
//! Every operation that would drop unsaved text goes through a
//! [`Prompt::ConfirmDiscard`] first. Operations that need a path go through
//! [`Prompt::Path`]. Each successful operation writes a session snapshot.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;

use notepad_utils::{AtomicWriteOptions, atomic_write_with_options};

use crate::App;

/// What to do once a dirty document has been dealt with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    New,
    Open,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPurpose {
    Open,
    SaveAs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    Save,
    Discard,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// "Save changes before continuing?"
    ConfirmDiscard { then: PendingAction },
    /// Path entry. `then` runs after a successful save-as.
    Path {
        purpose: PathPurpose,
        input: String,
        then: Option<PendingAction>,
    },
}

impl Prompt {
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Prompt::ConfirmDiscard { .. } => "Unsaved changes. Save before continuing? [y]es / [n]o / [Esc] cancel",
            Prompt::Path {
                purpose: PathPurpose::Open,
                ..
            } => "Open file:",
            Prompt::Path {
                purpose: PathPurpose::SaveAs,
                ..
            } => "Save as:",
        }
    }
}

impl App {
    // ========================================================================
    // Direct operations
    // ========================================================================

    /// Clear the buffer and detach from any file.
    pub fn new_document(&mut self, now: Instant) {
        self.buffer.set_text("");
        self.current_file = None;
        self.dirty = false;
        self.note = "New document".to_string();
        self.snapshot_after_file_op(now);
    }

    pub fn open_path(&mut self, path: &Path, now: Instant) -> anyhow::Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("could not open {}", path.display()))?;
        self.buffer.set_text(&content);
        self.current_file = Some(path.to_path_buf());
        self.dirty = false;
        self.note = format!("Opened {}", self.file_label());
        tracing::info!(path = %path.display(), "Opened document");
        self.snapshot_after_file_op(now);
        Ok(())
    }

    pub fn save_to(&mut self, path: &Path, now: Instant) -> anyhow::Result<()> {
        let text = self.buffer.text();
        atomic_write_with_options(path, text.as_bytes(), AtomicWriteOptions::durable_shared())
            .with_context(|| format!("could not save {}", path.display()))?;
        self.current_file = Some(path.to_path_buf());
        self.dirty = false;
        self.note = format!("Saved {}", self.file_label());
        tracing::info!(path = %path.display(), chars = text.chars().count(), "Saved document");
        self.snapshot_after_file_op(now);
        Ok(())
    }

    fn snapshot_after_file_op(&mut self, now: Instant) {
        if let Err(e) = self.write_snapshot(now) {
            tracing::warn!("Session snapshot failed: {e}");
        }
    }

    // ========================================================================
    // Requests (may open a prompt)
    // ========================================================================

    pub fn request_new(&mut self, now: Instant) {
        if self.dirty {
            self.prompt = Some(Prompt::ConfirmDiscard {
                then: PendingAction::New,
            });
        } else {
            self.new_document(now);
        }
    }

    pub fn request_open(&mut self) {
        if self.dirty {
            self.prompt = Some(Prompt::ConfirmDiscard {
                then: PendingAction::Open,
            });
        } else {
            self.open_path_prompt(PathPurpose::Open, None);
        }
    }

    /// Save to the current file, or ask for a path when there is none.
    /// Returns whether the document was written.
    pub fn request_save(&mut self, now: Instant) -> bool {
        match self.current_file.clone() {
            Some(path) => self.save_reporting(&path, now),
            None => {
                self.open_path_prompt(PathPurpose::SaveAs, None);
                false
            }
        }
    }

    pub fn request_save_as(&mut self) {
        self.open_path_prompt(PathPurpose::SaveAs, None);
    }

    pub fn request_quit(&mut self, now: Instant) {
        if self.dirty {
            self.prompt = Some(Prompt::ConfirmDiscard {
                then: PendingAction::Quit,
            });
        } else {
            self.quit(now);
        }
    }

    fn open_path_prompt(&mut self, purpose: PathPurpose, then: Option<PendingAction>) {
        let input = match purpose {
            PathPurpose::SaveAs => self
                .current_file
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            PathPurpose::Open => String::new(),
        };
        self.prompt = Some(Prompt::Path {
            purpose,
            input,
            then,
        });
    }

    fn save_reporting(&mut self, path: &Path, now: Instant) -> bool {
        match self.save_to(path, now) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Save failed: {e:#}");
                self.note = format!("Save failed: {e:#}");
                false
            }
        }
    }

    fn proceed(&mut self, action: PendingAction, now: Instant) {
        match action {
            PendingAction::New => self.new_document(now),
            PendingAction::Open => self.open_path_prompt(PathPurpose::Open, None),
            PendingAction::Quit => self.quit(now),
        }
    }

    fn quit(&mut self, now: Instant) {
        self.shutdown(now);
        self.should_quit = true;
    }

    // ========================================================================
    // Prompt handling
    // ========================================================================

    /// Answer an open [`Prompt::ConfirmDiscard`]. Ignored otherwise.
    pub fn confirm(&mut self, choice: ConfirmChoice, now: Instant) {
        let Some(Prompt::ConfirmDiscard { then }) = self.prompt else {
            return;
        };
        self.prompt = None;
        match choice {
            ConfirmChoice::Cancel => {}
            ConfirmChoice::Discard => self.proceed(then, now),
            ConfirmChoice::Save => match self.current_file.clone() {
                Some(path) => {
                    if self.save_reporting(&path, now) {
                        self.proceed(then, now);
                    }
                }
                None => self.open_path_prompt(PathPurpose::SaveAs, Some(then)),
            },
        }
    }

    pub fn prompt_input_char(&mut self, ch: char) {
        if let Some(Prompt::Path { input, .. }) = &mut self.prompt {
            input.push(ch);
        }
    }

    pub fn prompt_input_str(&mut self, text: &str) {
        if let Some(Prompt::Path { input, .. }) = &mut self.prompt {
            input.extend(text.chars().filter(|c| !c.is_control()));
        }
    }

    pub fn prompt_backspace(&mut self) {
        if let Some(Prompt::Path { input, .. }) = &mut self.prompt {
            input.pop();
        }
    }

    pub fn prompt_cancel(&mut self) {
        self.prompt = None;
    }

    /// Submit an open [`Prompt::Path`]. A failed operation keeps the prompt
    /// open so the path can be corrected.
    pub fn prompt_submit(&mut self, now: Instant) {
        let Some(Prompt::Path {
            purpose,
            input,
            then,
        }) = self.prompt.clone()
        else {
            return;
        };
        let trimmed = input.trim();
        if trimmed.is_empty() {
            self.prompt = None;
            return;
        }
        let path = PathBuf::from(trimmed);

        let ok = match purpose {
            PathPurpose::Open => match self.open_path(&path, now) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Open failed: {e:#}");
                    self.note = format!("Open failed: {e:#}");
                    false
                }
            },
            PathPurpose::SaveAs => self.save_reporting(&path, now),
        };

        if ok {
            self.prompt = None;
            if let Some(then) = then {
                self.proceed(then, now);
            }
        }
    }
}
