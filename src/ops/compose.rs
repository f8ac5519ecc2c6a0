use chrono::{Local, NaiveDate};

use crate::calendar::Event;
use crate::model::{CALENDAR_PRIORITY, Task, TaskStore, display_cmp, local_midnight, new_task_id};

/// Merge a day's stored tasks with that day's calendar events into the
/// ordered sequence to display.
///
/// A pure projection: each call synthesizes a fresh task per event (their
/// ids are not stable across calls and must never be persisted), then sorts
/// everything with the display comparator. Empty inputs yield empty output.
pub fn compose_day(store: &TaskStore, day: NaiveDate, events: &[Event]) -> Vec<Task> {
    let mut sequence: Vec<Task> = events.iter().map(|ev| event_task(ev, day)).collect();
    sequence.extend(store.day_tasks(day).into_iter().cloned());
    sequence.sort_by(display_cmp);
    sequence
}

/// Synthesize the display task for a calendar event.
fn event_task(event: &Event, day: NaiveDate) -> Task {
    Task {
        id: format!("cal-{}", new_task_id()),
        text: event.summary.clone(),
        done: false,
        date: local_midnight(day),
        is_calendar: true,
        start_time: Some(event.start),
        priority: CALENDAR_PRIORITY,
        created_at: Local::now(),
        level: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn task(text: &str, d: &str, priority: i64) -> Task {
        let mut t = Task::new(text, day(d));
        t.priority = priority;
        t
    }

    fn event(summary: &str, d: &str, hour: u32) -> Event {
        Event {
            summary: summary.to_string(),
            description: String::new(),
            location: String::new(),
            start: local_midnight(day(d)) + Duration::hours(hour as i64),
            end: None,
        }
    }

    fn texts(sequence: &[Task]) -> Vec<&str> {
        sequence.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_empty_inputs_yield_empty_output() {
        let store = TaskStore::default();
        assert!(compose_day(&store, day("2025-06-02"), &[]).is_empty());
    }

    #[test]
    fn test_events_precede_tasks_and_sort_by_start() {
        let mut store = TaskStore::default();
        store.push(task("write report", "2025-06-02", 2));
        store.push(task("buy milk", "2025-06-02", 1));
        let events = vec![
            event("review", "2025-06-02", 15),
            event("standup", "2025-06-02", 9),
        ];

        let sequence = compose_day(&store, day("2025-06-02"), &events);
        assert_eq!(
            texts(&sequence),
            vec!["standup", "review", "write report", "buy milk"]
        );
        assert!(sequence[0].is_calendar);
        assert_eq!(sequence[0].priority, CALENDAR_PRIORITY);
    }

    #[test]
    fn test_only_matching_day_included() {
        let mut store = TaskStore::default();
        store.push(task("today", "2025-06-02", 1));
        store.push(task("tomorrow", "2025-06-03", 1));

        let sequence = compose_day(&store, day("2025-06-02"), &[]);
        assert_eq!(texts(&sequence), vec!["today"]);
    }

    #[test]
    fn test_time_of_day_ignored_for_grouping() {
        let mut store = TaskStore::default();
        let mut t = task("late edit", "2025-06-02", 1);
        t.date += Duration::hours(23);
        store.push(t);

        let sequence = compose_day(&store, day("2025-06-02"), &[]);
        assert_eq!(texts(&sequence), vec!["late edit"]);
    }

    #[test]
    fn test_negative_priorities_still_sort_after_events() {
        // User priorities can drop below the calendar sentinel after repeated
        // end-of-day appends; events still come first.
        let mut store = TaskStore::default();
        store.push(task("deep append", "2025-06-02", -5));
        let events = vec![event("standup", "2025-06-02", 9)];

        let sequence = compose_day(&store, day("2025-06-02"), &events);
        assert_eq!(texts(&sequence), vec!["standup", "deep append"]);
    }

    #[test]
    fn test_compositing_is_idempotent_for_stored_tasks() {
        let mut store = TaskStore::default();
        store.push(task("a", "2025-06-02", 3));
        store.push(task("b", "2025-06-02", 1));
        let events = vec![event("standup", "2025-06-02", 9)];

        let first = compose_day(&store, day("2025-06-02"), &events);
        let second = compose_day(&store, day("2025-06-02"), &events);
        // Synthetic ids differ per call; content and order must not.
        assert_eq!(texts(&first), texts(&second));
        let first_user: Vec<&str> = first
            .iter()
            .filter(|t| !t.is_calendar)
            .map(|t| t.id.as_str())
            .collect();
        let second_user: Vec<&str> = second
            .iter()
            .filter(|t| !t.is_calendar)
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(first_user, second_user);
        assert_ne!(first[0].id, second[0].id);
    }
}
