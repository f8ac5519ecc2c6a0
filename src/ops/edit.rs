use crate::model::TaskStore;

/// Flip a task's completion state. Returns the new state, or `None` for an
/// unknown id or a calendar row.
pub fn toggle_done(store: &mut TaskStore, id: &str) -> Option<bool> {
    let task = store.get_mut(id)?;
    if task.is_calendar {
        return None;
    }
    task.done = !task.done;
    let done = task.done;
    if done {
        store.settings.tasks_completed_today = store.settings.tasks_completed_today.saturating_add(1);
    } else {
        store.settings.tasks_completed_today = store.settings.tasks_completed_today.saturating_sub(1);
    }
    Some(done)
}

/// Replace a task's text. Date, priority, level and done state are untouched.
pub fn set_text(store: &mut TaskStore, id: &str, text: &str) -> bool {
    match store.get_mut(id) {
        Some(task) if !task.is_calendar => {
            task.text = text.to_string();
            true
        }
        _ => false,
    }
}

/// Shift a task's indentation level by `delta`, clamped at zero. Returns the
/// new level, or `None` when nothing changed (unknown id, calendar row, or
/// an outdent already at the top level).
pub fn adjust_level(store: &mut TaskStore, id: &str, delta: i32) -> Option<u32> {
    let task = store.get_mut(id)?;
    if task.is_calendar {
        return None;
    }
    let new_level = task.level.checked_add_signed(delta)?;
    if new_level == task.level {
        return None;
    }
    task.level = new_level;
    Some(new_level)
}

/// Delete a task by id. Inferred children are not cascaded; they become part
/// of whatever block now precedes them.
pub fn delete_task(store: &mut TaskStore, id: &str) -> bool {
    match store.get(id) {
        Some(task) if !task.is_calendar => store.remove(id),
        _ => false,
    }
}
