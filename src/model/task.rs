use std::cmp::Ordering;

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveTime, TimeZone};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Sentinel priority assigned to synthesized calendar-event tasks so they
/// sort ahead of every user task.
pub const CALENDAR_PRIORITY: i64 = -1;

/// A single task, or a synthesized calendar event shown as one.
///
/// Tasks are stored as a flat list; the sub-task hierarchy is inferred from
/// `level` plus the priority order within a day, never from parent pointers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique, never reused. Calendar tasks get a fresh `cal-` id per view.
    pub id: String,
    pub text: String,
    pub done: bool,
    /// The day this task belongs to. Time-of-day is ignored for grouping.
    pub date: DateTime<Local>,
    /// True only for tasks synthesized from calendar events; never persisted.
    #[serde(default)]
    pub is_calendar: bool,
    /// Event start, meaningful only when `is_calendar` is set.
    #[serde(default)]
    pub start_time: Option<DateTime<Local>>,
    /// Ordering key within a day: higher sorts earlier.
    pub priority: i64,
    pub created_at: DateTime<Local>,
    /// Hierarchy depth; 0 is top-level.
    #[serde(default)]
    pub level: u32,
}

impl Task {
    /// Create a new user task on the given day with a fresh id.
    /// The caller assigns the real priority via the insertion engine.
    pub fn new(text: impl Into<String>, day: NaiveDate) -> Self {
        Task {
            id: new_task_id(),
            text: text.into(),
            done: false,
            date: local_midnight(day),
            is_calendar: false,
            start_time: None,
            priority: 0,
            created_at: Local::now(),
            level: 0,
        }
    }

    /// The calendar day this task belongs to (date truncated to midnight).
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

/// Total display order within a day: calendar events first, ascending by
/// start time; then user tasks, descending by priority. Ties fall back to
/// `created_at` ascending, then id, so the order is deterministic even when
/// priorities collide.
pub fn display_cmp(a: &Task, b: &Task) -> Ordering {
    match (a.is_calendar, b.is_calendar) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => a
            .start_time
            .cmp(&b.start_time)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id)),
        (false, false) => b
            .priority
            .cmp(&a.priority)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id)),
    }
}

/// Generate a fresh 32-hex-char task id.
pub fn new_task_id() -> String {
    let mut rng = rand::rng();
    (0..32)
        .map(|_| char::from_digit(rng.random_range(0..16u32), 16).unwrap_or('0'))
        .collect()
}

/// Midnight of the given day in the local timezone.
pub fn local_midnight(day: NaiveDate) -> DateTime<Local> {
    let naive = day.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        // Midnight skipped by a DST transition; noon always exists.
        LocalResult::None => {
            let noon = day.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN));
            match Local.from_local_datetime(&noon) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
                LocalResult::None => Local::now(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn user_task(text: &str, d: &str, priority: i64) -> Task {
        let mut t = Task::new(text, day(d));
        t.priority = priority;
        t
    }

    fn calendar_task(text: &str, d: &str, hour: u32) -> Task {
        let mut t = Task::new(text, day(d));
        t.id = format!("cal-{}", t.id);
        t.is_calendar = true;
        t.priority = CALENDAR_PRIORITY;
        t.start_time = Some(local_midnight(day(d)) + Duration::hours(hour as i64));
        t
    }

    #[test]
    fn test_new_task_defaults() {
        let t = Task::new("write report", day("2025-06-02"));
        assert_eq!(t.text, "write report");
        assert!(!t.done);
        assert!(!t.is_calendar);
        assert_eq!(t.level, 0);
        assert_eq!(t.day(), day("2025-06-02"));
        assert_eq!(t.id.len(), 32);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(new_task_id()));
        }
    }

    #[test]
    fn test_day_truncates_time_of_day() {
        let mut t = Task::new("x", day("2025-06-02"));
        t.date += Duration::hours(17) + Duration::minutes(30);
        assert_eq!(t.day(), day("2025-06-02"));
    }

    #[test]
    fn test_calendar_events_sort_before_user_tasks() {
        let cal = calendar_task("standup", "2025-06-02", 9);
        let user = user_task("write report", "2025-06-02", 100);
        assert_eq!(display_cmp(&cal, &user), Ordering::Less);
        assert_eq!(display_cmp(&user, &cal), Ordering::Greater);
    }

    #[test]
    fn test_calendar_events_sort_by_start_time() {
        let early = calendar_task("standup", "2025-06-02", 9);
        let late = calendar_task("review", "2025-06-02", 15);
        assert_eq!(display_cmp(&early, &late), Ordering::Less);
    }

    #[test]
    fn test_user_tasks_sort_by_descending_priority() {
        let high = user_task("first", "2025-06-02", 5);
        let low = user_task("second", "2025-06-02", 2);
        assert_eq!(display_cmp(&high, &low), Ordering::Less);
        assert_eq!(display_cmp(&low, &high), Ordering::Greater);
    }

    #[test]
    fn test_priority_ties_break_by_created_at() {
        let mut older = user_task("older", "2025-06-02", 3);
        let mut newer = user_task("newer", "2025-06-02", 3);
        older.created_at = local_midnight(day("2025-06-01"));
        newer.created_at = local_midnight(day("2025-06-02"));
        assert_eq!(display_cmp(&older, &newer), Ordering::Less);
    }

    #[test]
    fn test_order_is_total_on_identical_keys() {
        let mut a = user_task("a", "2025-06-02", 3);
        let mut b = user_task("b", "2025-06-02", 3);
        b.created_at = a.created_at;
        // Distinct ids still produce a strict order.
        assert_ne!(display_cmp(&a, &b), Ordering::Equal);
        b.id = a.id.clone();
        a.text = b.text.clone();
        assert_eq!(display_cmp(&a, &b), Ordering::Equal);
    }

    #[test]
    fn test_serde_round_trip() {
        let t = user_task("buy milk", "2025-06-02", 4);
        let json = serde_json::to_string(&t).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }

    #[test]
    fn test_deserialize_tolerates_missing_optional_fields() {
        let json = r#"{
            "id": "abc",
            "text": "legacy task",
            "done": false,
            "date": "2025-06-02T00:00:00+00:00",
            "priority": 1,
            "created_at": "2025-06-01T10:00:00+00:00"
        }"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert!(!t.is_calendar);
        assert_eq!(t.start_time, None);
        assert_eq!(t.level, 0);
    }
}
