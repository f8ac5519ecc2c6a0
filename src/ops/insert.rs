use crate::model::Task;

/// Priority for a task inserted into an empty day or with no anchor.
pub const DEFAULT_PRIORITY: i64 = 1;

/// Where a new task lands relative to the day it is being added to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertAnchor {
    /// No selection context: the new task becomes the day's first task.
    None,
    /// The day's trailing add slot: sort after every existing task.
    DayEnd,
    /// Insert as a sibling immediately after this task's descendant block.
    AfterTask(String),
}

/// Compute the priority for a brand-new task so it lands after its anchor
/// without splitting an existing descendant block.
///
/// `day` is the day's current composited sequence (calendar events
/// included, in display order). Total over all inputs: an unknown anchor id
/// or a calendar-event anchor falls back to the default priority.
pub fn priority_for_new(day: &[Task], anchor: &InsertAnchor) -> i64 {
    match anchor {
        InsertAnchor::None => DEFAULT_PRIORITY,
        InsertAnchor::DayEnd => {
            let user_priorities: Vec<i64> = day
                .iter()
                .filter(|t| !t.is_calendar)
                .map(|t| t.priority)
                .collect();
            if user_priorities.is_empty() {
                DEFAULT_PRIORITY
            } else {
                user_priorities.into_iter().fold(0, i64::min) - 1
            }
        }
        InsertAnchor::AfterTask(id) => match day.iter().position(|t| t.id == *id) {
            Some(idx) if !day[idx].is_calendar => block_end_priority(day, idx) - 1,
            _ => DEFAULT_PRIORITY,
        },
    }
}

/// The minimum priority across the task at `idx` and its descendant block:
/// the contiguous run of following tasks at strictly greater level. The
/// task's own priority when it has no descendants.
fn block_end_priority(day: &[Task], idx: usize) -> i64 {
    let anchor = &day[idx];
    let mut end = anchor.priority;
    for task in &day[idx + 1..] {
        if task.is_calendar || task.level <= anchor.level {
            break;
        }
        end = end.min(task.priority);
    }
    end
}
