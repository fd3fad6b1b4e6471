//! TUI rendering for Resonant Notepad using ratatui.

mod input;
pub mod preview;
mod theme;

pub use input::{InputPump, apply_event, handle_events};
pub use theme::{Palette, palette, styles};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use notepad_app::{App, PanelTab, Prompt};

pub use self::preview::clear_preview_cache;
use self::preview::render_preview;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let palette = palette(app.ui_options());
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let prompt_height = u16::from(app.prompt().is_some());
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),                // Editor + side panel
            Constraint::Length(prompt_height), // Prompt
            Constraint::Length(1),             // Status bar
        ])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(3, 5), Constraint::Ratio(2, 5)])
        .split(rows[0]);

    draw_editor(frame, app, columns[0], &palette);
    draw_side_panel(frame, app, columns[1], &palette);
    if let Some(prompt) = app.prompt() {
        draw_prompt(frame, prompt, rows[1], &palette);
    }
    draw_status_bar(frame, app, rows[2], &palette);
}

fn draw_editor(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let title = format!(
        " {}{} ",
        app.file_label(),
        if app.is_dirty() { "*" } else { "" }
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.bg_border))
        .title(Span::styled(title, styles::section_title(palette)))
        .style(Style::default().bg(palette.bg_dark));
    let inner = block.inner(area);

    let buffer = app.buffer();
    let (row, col) = buffer.cursor();

    // Keep the cursor on screen. Lines are not wrapped so columns map 1:1.
    let row_offset = row.saturating_sub(usize::from(inner.height.saturating_sub(1)));
    let cursor_line = buffer.lines().get(row).map_or("", String::as_str);
    let before_cursor: String = cursor_line.chars().take(col).collect();
    let cursor_x = before_cursor.width();
    let col_offset = cursor_x.saturating_sub(usize::from(inner.width.saturating_sub(1)));

    let lines: Vec<Line> = buffer
        .lines()
        .iter()
        .map(|line| Line::styled(line.as_str(), Style::default().fg(palette.text_primary)))
        .collect();
    let editor = Paragraph::new(lines)
        .block(block)
        .scroll((row_offset as u16, col_offset as u16));
    frame.render_widget(editor, area);

    if app.prompt().is_none() && inner.width > 0 && inner.height > 0 {
        frame.set_cursor_position((
            inner.x + (cursor_x - col_offset) as u16,
            inner.y + (row - row_offset) as u16,
        ));
    }
}

fn draw_side_panel(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let separator = if app.ui_options().ascii_only { " | " } else { " │ " };
    let tab = |panel: PanelTab| {
        let style = if app.panel() == panel {
            styles::active_tab(palette)
        } else {
            styles::inactive_tab(palette)
        };
        Span::styled(panel.title(), style)
    };
    let tabs = Line::from(vec![
        Span::raw(" "),
        tab(PanelTab::Resonance),
        Span::styled(separator, Style::default().fg(palette.text_muted)),
        tab(PanelTab::Preview),
        Span::raw(" "),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.bg_border))
        .title(tabs)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(palette.bg_panel));

    let lines = match app.panel() {
        PanelTab::Resonance => resonance_lines(app, palette),
        PanelTab::Preview => preview_lines(&app.text(), palette),
    };

    let panel = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(panel, area);
}

fn resonance_lines(app: &App, palette: &Palette) -> Vec<Line<'static>> {
    let telemetry = app.telemetry();
    let text_style = Style::default().fg(palette.text_primary);

    let mut lines: Vec<Line<'static>> = telemetry
        .metric_lines(app.ui_options().ascii_only)
        .into_iter()
        .map(|line| Line::styled(line, text_style))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::styled("Guidance", styles::section_title(palette)));
    lines.push(Line::styled(telemetry.guidance.clone(), text_style));
    lines
}

fn preview_lines(markdown: &str, palette: &Palette) -> Vec<Line<'static>> {
    let text_style = Style::default().fg(palette.text_primary);
    render_preview(markdown)
        .lines()
        .map(|line| {
            let is_heading = ["H1  ", "H2  ", "H3  "]
                .iter()
                .any(|prefix| line.starts_with(prefix));
            if is_heading {
                Line::styled(line.to_string(), styles::preview_heading(palette))
            } else {
                Line::styled(line.to_string(), text_style)
            }
        })
        .collect()
}

fn draw_prompt(frame: &mut Frame, prompt: &Prompt, area: Rect, palette: &Palette) {
    let text = match prompt {
        Prompt::ConfirmDiscard { .. } => format!(" {}", prompt.title()),
        Prompt::Path { input, .. } => format!(" {} {input}", prompt.title()),
    };
    let width = text.width();
    frame.render_widget(Paragraph::new(text).style(styles::prompt(palette)), area);

    if matches!(prompt, Prompt::Path { .. }) && area.height > 0 {
        let x = area.x + (width as u16).min(area.width.saturating_sub(1));
        frame.set_cursor_position((x, area.y));
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let status = Paragraph::new(Line::from(vec![Span::raw(" "), Span::raw(app.status_line())]))
        .style(styles::status_bar(palette, app.band()));
    frame.render_widget(status, area);
}
