use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Task;
use crate::ops::{self, InsertAnchor};
use crate::search;

use super::app::{App, EditState, Mode, TimelineItem};

/// Dispatch a key press to the active mode's handler.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    match app.mode {
        Mode::View => handle_view(app, key),
        Mode::Edit => handle_edit(app, key),
        Mode::Search => handle_search(app, key),
        Mode::History | Mode::Help => handle_overlay(app, key),
        Mode::ConfirmDelete => handle_confirm_delete(app, key),
    }
}

fn handle_view(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Up if key.modifiers.contains(KeyModifiers::SHIFT) => move_task(app, true),
        KeyCode::Down if key.modifiers.contains(KeyModifiers::SHIFT) => move_task(app, false),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::Enter => open_editor(app, false),
        KeyCode::Char('a') => open_editor(app, true),
        KeyCode::Char(' ') => toggle_selected(app),
        KeyCode::Char('d') => {
            if app.selected_task().is_some_and(|t| !t.is_calendar) {
                app.mode = Mode::ConfirmDelete;
            }
        }
        KeyCode::Tab => adjust_selected_level(app, 1),
        KeyCode::BackTab => adjust_selected_level(app, -1),
        KeyCode::Char('h') => app.mode = Mode::History,
        KeyCode::Char('?') => app.mode = Mode::Help,
        KeyCode::Char('/') => {
            app.search_input.clear();
            app.search_results.clear();
            app.search_cursor = 0;
            app.mode = Mode::Search;
        }
        KeyCode::Char('r') => {
            app.next_quote();
            app.save();
        }
        _ => {}
    }
}

/// Open the inline editor. On a task row this renames (or, with
/// `add_after`, starts a sibling below the task's descendant block); on an
/// add slot it starts a task at the end of that day.
fn open_editor(app: &mut App, add_after: bool) {
    let edit = match app.selected_item() {
        Some(TimelineItem::Task { id, date }) => {
            if add_after {
                EditState {
                    buffer: String::new(),
                    cursor: 0,
                    target: None,
                    date: *date,
                    anchor: InsertAnchor::AfterTask(id.clone()),
                }
            } else {
                let Some(task) = app.selected_task() else {
                    return;
                };
                if task.is_calendar {
                    return;
                }
                EditState {
                    buffer: task.text.clone(),
                    cursor: task.text.chars().count(),
                    target: Some(id.clone()),
                    date: *date,
                    anchor: InsertAnchor::None,
                }
            }
        }
        Some(TimelineItem::AddSlot(date)) => EditState {
            buffer: String::new(),
            cursor: 0,
            target: None,
            date: *date,
            anchor: InsertAnchor::DayEnd,
        },
        _ => return,
    };
    app.edit = Some(edit);
    app.mode = Mode::Edit;
}

fn toggle_selected(app: &mut App) {
    if let Some(id) = app.selected_task_id() {
        if ops::toggle_done(&mut app.store, &id).is_some() {
            app.save();
            app.refresh_days();
        }
    }
}

fn adjust_selected_level(app: &mut App, delta: i32) {
    if let Some(id) = app.selected_task_id() {
        if ops::adjust_level(&mut app.store, &id, delta).is_some() {
            app.save();
            app.refresh_days();
        }
    }
}

fn move_task(app: &mut App, up: bool) {
    let Some(id) = app.selected_task_id() else {
        return;
    };
    let moved = if up {
        ops::move_up(&mut app.store, &id, app.today)
    } else {
        ops::move_down(&mut app.store, &id, app.today)
    };
    if moved {
        app.save();
        app.refresh_days();
        select_task(app, &id);
    }
}

fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.edit = None;
            app.mode = Mode::View;
            return;
        }
        KeyCode::Enter => {
            commit_edit(app);
            return;
        }
        _ => {}
    }
    let Some(edit) = app.edit.as_mut() else {
        app.mode = Mode::View;
        return;
    };
    match key.code {
        KeyCode::Char(c) => {
            let byte = byte_index(&edit.buffer, edit.cursor);
            edit.buffer.insert(byte, c);
            edit.cursor += 1;
        }
        KeyCode::Backspace => {
            if edit.cursor > 0 {
                edit.cursor -= 1;
                let byte = byte_index(&edit.buffer, edit.cursor);
                edit.buffer.remove(byte);
            }
        }
        KeyCode::Delete => {
            if edit.cursor < edit.buffer.chars().count() {
                let byte = byte_index(&edit.buffer, edit.cursor);
                edit.buffer.remove(byte);
            }
        }
        KeyCode::Left => edit.cursor = edit.cursor.saturating_sub(1),
        KeyCode::Right => {
            if edit.cursor < edit.buffer.chars().count() {
                edit.cursor += 1;
            }
        }
        KeyCode::Home => edit.cursor = 0,
        KeyCode::End => edit.cursor = edit.buffer.chars().count(),
        _ => {}
    }
}

fn commit_edit(app: &mut App) {
    let Some(edit) = app.edit.take() else {
        app.mode = Mode::View;
        return;
    };
    app.mode = Mode::View;
    let text = edit.buffer.trim();
    if text.is_empty() {
        return;
    }

    match edit.target {
        Some(id) => {
            if ops::set_text(&mut app.store, &id, text) {
                app.save();
                app.refresh_days();
            }
        }
        None => {
            let sequence = app.day_cache.get(&edit.date).cloned().unwrap_or_default();
            let mut task = Task::new(text, edit.date);
            task.priority = ops::priority_for_new(&sequence, &edit.anchor);
            let id = task.id.clone();
            app.store.push(task);
            app.save();
            app.refresh_days();
            select_task(app, &id);
        }
    }
}

fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.mode = Mode::View;
        }
        KeyCode::Enter => {
            let target = app
                .search_results
                .get(app.search_cursor)
                .map(|r| r.task.id.clone());
            app.mode = Mode::View;
            if let Some(id) = target {
                select_task(app, &id);
            }
        }
        KeyCode::Up => app.search_cursor = app.search_cursor.saturating_sub(1),
        KeyCode::Down => {
            if app.search_cursor + 1 < app.search_results.len() {
                app.search_cursor += 1;
            }
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            update_search(app);
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            update_search(app);
        }
        _ => {}
    }
}

fn update_search(app: &mut App) {
    app.search_results = search::search(&app.search_input, &app.store.tasks, app.today);
    app.search_cursor = 0;
}

fn handle_overlay(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Char('?') => {
            app.mode = Mode::View;
        }
        _ => {}
    }
}

fn handle_confirm_delete(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            app.mode = Mode::View;
            if let Some(id) = app.selected_task_id() {
                if ops::delete_task(&mut app.store, &id) {
                    app.save();
                    app.refresh_days();
                }
            }
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            app.mode = Mode::View;
        }
        _ => {}
    }
}

/// Put the cursor on the timeline row for `id`, if it is in the horizon.
fn select_task(app: &mut App, id: &str) {
    if let Some(idx) = app
        .items
        .iter()
        .position(|item| matches!(item, TimelineItem::Task { id: tid, .. } if tid == id))
    {
        app.cursor = idx;
    }
}

/// Byte offset of the `cursor`-th character.
fn byte_index(s: &str, cursor: usize) -> usize {
    s.char_indices()
        .nth(cursor)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
