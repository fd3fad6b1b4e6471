//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::path::Path;
use std::time::Instant;

use notepad_app::{App, AppOptions};
use notepad_session::SessionStore;
use ratatui::{Terminal, backend::TestBackend};

/// The scripted "draft_flow" session used by the benchmark.
pub const DRAFT_FLOW: [&str; 4] = [
    "Today I want to sketch the shape of this feature.",
    "It should be simple and clear, and it should help the user move quickly.",
    "What should the first interaction feel like?",
    "I will keep the core focused, then add detail where needed.",
];

pub const INITIAL_HARMONY: f64 = 0.551_273_224_190_661_2;

/// App with a session store rooted under `dir`.
pub fn app_in(dir: &Path, now: Instant) -> App {
    App::new(
        AppOptions::default(),
        Some(SessionStore::new(dir.join("session"))),
        now,
    )
}

pub fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        if ch == '\n' {
            app.insert_newline();
        } else {
            app.insert_char(ch);
        }
    }
}

/// Render one frame and return the screen as rows of text.
pub fn render_rows(app: &App, width: u16, height: u16) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
    terminal
        .draw(|frame| notepad_tui::draw(frame, app))
        .expect("draw");
    let buffer = terminal.backend().buffer();
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect()
}
