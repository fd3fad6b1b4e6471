//! Editing sessions driven through the app and TUI layers together.

use std::fs;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use notepad_tui::apply_event;

use crate::common::{DRAFT_FLOW, app_in, render_rows, type_text};

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ctrl(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

#[test]
fn writing_session_updates_telemetry_and_screen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let start = Instant::now();
    let mut app = app_in(dir.path(), start);

    let mut now = start;
    for chunk in DRAFT_FLOW {
        type_text(&mut app, chunk);
        type_text(&mut app, "\n");
        now += Duration::from_millis(300);
        app.tick(now);
    }

    assert_eq!(app.controller().state().ticks(), 4);
    let rows = render_rows(&app, 160, 24);
    let screen = rows.join("\n");
    assert!(screen.contains("H Harmony: 0.5"), "{screen}");
    assert!(screen.contains("Guidance"));
    assert!(rows[23].contains("Untitled* | Words: "));
}

#[test]
fn save_as_through_keyboard() {
    let dir = tempfile::tempdir().expect("tempdir");
    let now = Instant::now();
    let mut app = app_in(dir.path(), now);
    let target = dir.path().join("out.md");

    type_text(&mut app, "# Saved\nbody");
    apply_event(&mut app, ctrl('w'), now);
    apply_event(
        &mut app,
        Event::Paste(target.display().to_string()),
        now,
    );
    apply_event(&mut app, key(KeyCode::Enter), now);

    assert_eq!(fs::read_to_string(&target).expect("read"), "# Saved\nbody");
    assert!(!app.is_dirty());
    assert_eq!(app.file_label(), "out.md");
}

#[test]
fn quit_with_unsaved_work_then_discard_keeps_snapshot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let now = Instant::now();
    let mut app = app_in(dir.path(), now);

    type_text(&mut app, "draft in progress");
    assert!(!apply_event(&mut app, ctrl('q'), now));
    assert!(apply_event(&mut app, key(KeyCode::Char('n')), now));

    let snapshot = app.session_store().expect("store").load().expect("snapshot");
    assert_eq!(snapshot.text, "draft in progress");
}

#[test]
fn restored_session_resumes_unsaved_text() {
    let dir = tempfile::tempdir().expect("tempdir");
    let start = Instant::now();
    {
        let mut app = app_in(dir.path(), start);
        type_text(&mut app, "remember me");
        app.shutdown(start);
    }

    let mut app = app_in(dir.path(), start);
    assert!(app.restore_session());
    assert_eq!(app.text(), "remember me");
    assert!(app.is_dirty());
    assert!(app.note().starts_with("Restored session from "));
}
