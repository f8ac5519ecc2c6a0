use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::model::Task;

use super::app::{App, Mode, TimelineItem};

/// Main render function — dispatches on mode
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let quote_lines = quote_lines(app, area.width);
    let footer_height = quote_lines.len() as u16 + 1;

    // Layout: content | quote footer | status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(footer_height),
        ])
        .split(area);

    match app.mode {
        Mode::Search => render_search(frame, app, chunks[0]),
        Mode::History => render_history(frame, app, chunks[0]),
        Mode::Help => render_help(frame, app, chunks[0]),
        Mode::View | Mode::Edit | Mode::ConfirmDelete => {
            render_timeline(frame, app, chunks[0]);
        }
    }

    render_footer(frame, app, chunks[1], quote_lines);
}

fn render_timeline(frame: &mut Frame, app: &mut App, area: Rect) {
    let visible_height = area.height as usize;
    if visible_height == 0 || app.items.is_empty() {
        return;
    }

    // Keep the cursor row in view
    if app.cursor < app.scroll {
        app.scroll = app.cursor;
    } else if app.cursor >= app.scroll + visible_height {
        app.scroll = app.cursor.saturating_sub(visible_height - 1);
    }

    let end = app.items.len().min(app.scroll + visible_height);
    let mut lines: Vec<Line> = Vec::with_capacity(visible_height);
    for (item, row) in app.items[app.scroll..end].iter().zip(app.scroll..end) {
        let is_cursor = row == app.cursor && app.mode != Mode::Edit;
        match item {
            TimelineItem::DayHeader(day) => lines.push(day_header_line(app, *day)),
            TimelineItem::Task { id, date } => {
                let task = app
                    .day_cache
                    .get(date)
                    .and_then(|seq| seq.iter().find(|t| t.id == *id));
                if let Some(task) = task {
                    lines.push(task_line(app, task, is_cursor));
                }
            }
            TimelineItem::AddSlot(_) => {
                let style = if is_cursor {
                    Style::default()
                        .fg(app.theme.accent)
                        .bg(app.theme.selection_bg)
                } else {
                    Style::default().fg(app.theme.dim)
                };
                let prefix = if is_cursor { "> " } else { "  " };
                lines.push(Line::from(Span::styled(
                    format!("{prefix}+ Add new task"),
                    style,
                )));
            }
        }
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn day_header_line(app: &App, day: NaiveDate) -> Line<'static> {
    let date = day.format("%A, %B %-d");
    let label = if day == app.today {
        format!("Today - {date}")
    } else if app.today.succ_opt() == Some(day) {
        format!("Tomorrow - {date}")
    } else {
        date.to_string()
    };
    Line::from(Span::styled(
        label,
        Style::default()
            .fg(app.theme.accent)
            .add_modifier(Modifier::BOLD),
    ))
}

fn task_line(app: &App, task: &Task, is_cursor: bool) -> Line<'static> {
    let prefix = if is_cursor { "> " } else { "  " };
    let indent = "  ".repeat(task.level as usize);

    let (body, mut style) = if task.is_calendar {
        let time = task
            .start_time
            .map(|t| t.format(&app.storage.config().time_format).to_string())
            .unwrap_or_default();
        (
            format!("{time} {}", task.text),
            Style::default().fg(app.theme.event),
        )
    } else if task.done {
        (
            format!("[x] {}", task.text),
            Style::default()
                .fg(app.theme.done)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    } else {
        (
            format!("[ ] {}", task.text),
            Style::default().fg(app.theme.text),
        )
    };

    if is_cursor {
        style = style.bg(app.theme.selection_bg);
    }
    Line::from(Span::styled(format!("{prefix}{indent}{body}"), style))
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from(vec![
        Span::styled("/", Style::default().fg(app.theme.highlight)),
        Span::styled(
            app.search_input.clone(),
            Style::default().fg(app.theme.text),
        ),
    ])];

    if app.search_results.is_empty() && !app.search_input.trim().is_empty() {
        lines.push(Line::from(Span::styled(
            "  no matches",
            Style::default().fg(app.theme.dim),
        )));
    }

    let date_format = app.storage.config().date_format.clone();
    for (idx, result) in app.search_results.iter().enumerate() {
        let is_cursor = idx == app.search_cursor;
        let prefix = if is_cursor { "> " } else { "  " };
        let mark = if result.task.done { "[x]" } else { "[ ]" };
        let mut style = if result.task.done {
            Style::default().fg(app.theme.dim)
        } else {
            Style::default().fg(app.theme.text)
        };
        if is_cursor {
            style = style.bg(app.theme.selection_bg);
        }
        lines.push(Line::from(vec![
            Span::styled(
                format!("{prefix}{mark} {} ", result.task.text),
                style,
            ),
            Span::styled(
                result.task.date.format(&date_format).to_string(),
                Style::default().fg(app.theme.dim),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), area);
    let x = area.x + 1 + app.search_input.width() as u16;
    frame.set_cursor_position(Position::new(x.min(area.right().saturating_sub(1)), area.y));
}

fn render_history(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from(Span::styled(
        format!(
            "History ({} done today)",
            app.store.settings.tasks_completed_today
        ),
        Style::default()
            .fg(app.theme.highlight)
            .add_modifier(Modifier::BOLD),
    ))];

    let history = app.history_days();
    if history.is_empty() {
        lines.push(Line::from(Span::styled(
            "  nothing yet",
            Style::default().fg(app.theme.dim),
        )));
    }
    for (day, tasks) in &history {
        lines.push(Line::from(Span::styled(
            day.format("%A, %B %-d").to_string(),
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        )));
        for task in tasks {
            let indent = "  ".repeat(task.level as usize);
            let mark = if task.done { "[x]" } else { "[ ]" };
            let style = if task.done {
                Style::default().fg(app.theme.done)
            } else {
                Style::default().fg(app.theme.text)
            };
            lines.push(Line::from(Span::styled(
                format!("  {indent}{mark} {}", task.text),
                style,
            )));
        }
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    const BINDINGS: &[(&str, &str)] = &[
        ("↑/↓, k/j", "move selection"),
        ("Enter", "edit task / add at end of day"),
        ("a", "add task after the selected one"),
        ("Space", "toggle done"),
        ("Tab / Shift+Tab", "indent / outdent"),
        ("Shift+↑ / Shift+↓", "move task up / down"),
        ("d", "delete (asks first)"),
        ("/", "search"),
        ("h", "history"),
        ("r", "new quote"),
        ("q", "quit"),
    ];

    let mut lines = vec![Line::from(Span::styled(
        "Keys",
        Style::default()
            .fg(app.theme.highlight)
            .add_modifier(Modifier::BOLD),
    ))];
    for (keys, action) in BINDINGS {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {keys:<18}"),
                Style::default().fg(app.theme.accent),
            ),
            Span::styled(*action, Style::default().fg(app.theme.text)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect, quote_lines: Vec<Line<'static>>) {
    if area.height == 0 {
        return;
    }
    let mut lines = quote_lines;

    let status = match app.mode {
        Mode::Edit => {
            let edit = app.edit.as_ref();
            let label = match edit.and_then(|e| e.target.as_ref()) {
                Some(_) => "Edit: ",
                None => "New: ",
            };
            let buffer = edit.map(|e| e.buffer.clone()).unwrap_or_default();
            // Status row is the last footer line.
            let y = area.bottom().saturating_sub(1);
            if let Some(edit) = edit {
                let before: String = edit.buffer.chars().take(edit.cursor).collect();
                let x = area.x + (label.width() + before.width()) as u16;
                frame.set_cursor_position(Position::new(
                    x.min(area.right().saturating_sub(1)),
                    y,
                ));
            }
            Line::from(vec![
                Span::styled(label, Style::default().fg(app.theme.highlight)),
                Span::styled(buffer, Style::default().fg(app.theme.text)),
            ])
        }
        Mode::ConfirmDelete => Line::from(Span::styled(
            "Delete this task? (y/n)",
            Style::default()
                .fg(app.theme.error)
                .add_modifier(Modifier::BOLD),
        )),
        _ => match &app.last_error {
            Some(err) => Line::from(Span::styled(
                format!("error: {err}"),
                Style::default().fg(app.theme.error),
            )),
            None => Line::from(Span::styled(
                help_hint(area.width),
                Style::default().fg(app.theme.dim),
            )),
        },
    };
    lines.push(status);

    frame.render_widget(Paragraph::new(lines), area);
}

/// The key hint for the footer, shortened when the terminal is narrow.
fn help_hint(width: u16) -> &'static str {
    const FULL: &str =
        "enter edit  a add  space done  tab indent  d delete  / search  h history  ? help  q quit";
    const SHORT: &str = "? help  q quit";
    if (width as usize) >= FULL.len() { FULL } else { SHORT }
}

/// The current quote wrapped to two thirds of the width and centered,
/// capped at four text lines plus attribution.
fn quote_lines(app: &App, width: u16) -> Vec<Line<'static>> {
    let Some(quote) = &app.quote else {
        return Vec::new();
    };
    if width < 20 {
        return Vec::new();
    }
    let wrap_width = (width as usize) * 2 / 3;
    let mut wrapped = wrap_text(&quote.text, wrap_width);
    wrapped.truncate(4);

    let style = Style::default()
        .fg(app.theme.dim)
        .add_modifier(Modifier::ITALIC);
    let mut lines: Vec<Line<'static>> = wrapped
        .into_iter()
        .map(|text| center_line(text, width, style))
        .collect();
    if !quote.author.is_empty() {
        lines.push(center_line(
            format!("— {}", quote.author),
            width,
            Style::default().fg(app.theme.dim),
        ));
    }
    lines
}

fn center_line(text: String, width: u16, style: Style) -> Line<'static> {
    let pad = (width as usize).saturating_sub(text.width()) / 2;
    Line::from(Span::styled(format!("{}{}", " ".repeat(pad), text), style))
}

/// Greedy word wrap on display width.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.width() + 1 + word.width() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
