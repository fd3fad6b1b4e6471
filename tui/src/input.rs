//! Input handling for the Resonant Notepad TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};
use tokio::sync::mpsc;

use notepad_app::{App, ConfirmChoice, Prompt};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking thread and hands them to the frame loop.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(&stop2, &tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close first so a reader blocked on a full channel wakes up.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: &AtomicBool, tx: &mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    // Backpressure instead of dropping: a large paste must arrive intact.
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!("Terminal read failed: {e}");
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("Terminal poll failed: {e}");
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain up to a frame's worth of queued events into `app`.
///
/// Returns `Ok(true)` once the app wants to quit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    for _ in 0..MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };

        if apply_event(app, ev, Instant::now()) {
            return Ok(true);
        }
    }
    Ok(app.should_quit())
}

/// Apply one terminal event. Returns whether the app wants to quit.
pub fn apply_event(app: &mut App, event: Event, now: Instant) -> bool {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => match app.prompt() {
            Some(Prompt::ConfirmDiscard { .. }) => handle_confirm(app, key, now),
            Some(Prompt::Path { .. }) => handle_path_prompt(app, key, now),
            None => handle_editor(app, key, now),
        },
        Event::Paste(text) => {
            let normalized = normalize_line_endings(&text);
            match app.prompt() {
                Some(Prompt::Path { .. }) => app.prompt_input_str(&normalized),
                Some(Prompt::ConfirmDiscard { .. }) => {}
                None => app.insert_str(&normalized),
            }
        }
        _ => {}
    }
    app.should_quit()
}

fn handle_confirm(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('y' | 'Y' | 's' | 'S') => app.confirm(ConfirmChoice::Save, now),
        KeyCode::Char('n' | 'N' | 'd' | 'D') => app.confirm(ConfirmChoice::Discard, now),
        KeyCode::Esc | KeyCode::Char('c' | 'C') => app.confirm(ConfirmChoice::Cancel, now),
        _ => {}
    }
}

fn handle_path_prompt(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Enter => app.prompt_submit(now),
        KeyCode::Esc => app.prompt_cancel(),
        KeyCode::Backspace => app.prompt_backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.prompt_input_char(c);
        }
        _ => {}
    }
}

fn handle_editor(app: &mut App, key: KeyEvent, now: Instant) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('q' | 'c') => app.request_quit(now),
            KeyCode::Char('s') => {
                app.request_save(now);
            }
            KeyCode::Char('w') => app.request_save_as(),
            KeyCode::Char('o') => app.request_open(),
            KeyCode::Char('n') => app.request_new(now),
            KeyCode::Char('p') => app.toggle_panel(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Tab => app.toggle_panel(),
        KeyCode::Enter => app.insert_newline(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Left => app.cursor_mut().left(),
        KeyCode::Right => app.cursor_mut().right(),
        KeyCode::Up => app.cursor_mut().up(),
        KeyCode::Down => app.cursor_mut().down(),
        KeyCode::Home => app.cursor_mut().home(),
        KeyCode::End => app.cursor_mut().end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => app.insert_char(c),
        _ => {}
    }
}
