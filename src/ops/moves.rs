use chrono::NaiveDate;

use crate::model::{TaskStore, local_midnight};

/// Move a task one step earlier: swap upward within its day, or transfer to
/// the end of the previous day when it is already the day's first user task.
///
/// Moves to a date before `today` are silently refused (the task stays
/// put), as are moves of calendar-event rows and unknown ids. Returns
/// whether anything changed.
pub fn move_up(store: &mut TaskStore, id: &str, today: NaiveDate) -> bool {
    let Some((day, idx, _len)) = locate(store, id) else {
        return false;
    };

    if idx > 0 {
        if let Some(task) = store.get_mut(id) {
            task.priority += 1;
            return true;
        }
        return false;
    }

    // First user task of its day: transfer to the previous day's end.
    let Some(prev) = day.pred_opt() else {
        return false;
    };
    if prev < today {
        return false;
    }
    let priority = store.min_priority(prev) - 1;
    if let Some(task) = store.get_mut(id) {
        task.date = local_midnight(prev);
        task.priority = priority;
        true
    } else {
        false
    }
}

/// Move a task one step later: swap downward within its day, or transfer to
/// the start of the next day when it is already the day's last user task.
/// Moving into the future has no ceiling.
pub fn move_down(store: &mut TaskStore, id: &str, today: NaiveDate) -> bool {
    let _ = today; // No floor in this direction; kept for a symmetric signature.
    let Some((day, idx, len)) = locate(store, id) else {
        return false;
    };

    if idx + 1 < len {
        if let Some(task) = store.get_mut(id) {
            task.priority -= 1;
            return true;
        }
        return false;
    }

    let Some(next) = day.succ_opt() else {
        return false;
    };
    let priority = store.max_priority(next) + 1;
    if let Some(task) = store.get_mut(id) {
        task.date = local_midnight(next);
        task.priority = priority;
        true
    } else {
        false
    }
}

/// Find a movable task's day, its index among that day's user tasks in
/// display order, and the day's user-task count. Calendar rows are not
/// valid move targets.
fn locate(store: &TaskStore, id: &str) -> Option<(NaiveDate, usize, usize)> {
    let task = store.get(id)?;
    if task.is_calendar {
        return None;
    }
    let day = task.day();
    let siblings = store.day_tasks(day);
    let idx = siblings.iter().position(|t| t.id == id)?;
    Some((day, idx, siblings.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;
    use pretty_assertions::assert_eq;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn add_task(store: &mut TaskStore, text: &str, d: &str, priority: i64) -> String {
        let mut t = Task::new(text, day(d));
        t.priority = priority;
        let id = t.id.clone();
        store.push(t);
        id
    }

    fn day_order(store: &TaskStore, d: &str) -> Vec<String> {
        store
            .day_tasks(day(d))
            .iter()
            .map(|t| t.text.clone())
            .collect()
    }

    #[test]
    fn test_move_up_within_day() {
        let mut store = TaskStore::default();
        add_task(&mut store, "first", "2025-06-02", 3);
        let second = add_task(&mut store, "second", "2025-06-02", 2);

        assert!(move_up(&mut store, &second, day("2025-06-01")));
        assert_eq!(store.get(&second).unwrap().priority, 3);
    }

    #[test]
    fn test_move_down_within_day() {
        let mut store = TaskStore::default();
        let first = add_task(&mut store, "first", "2025-06-02", 3);
        add_task(&mut store, "second", "2025-06-02", 2);

        assert!(move_down(&mut store, &first, day("2025-06-01")));
        assert_eq!(store.get(&first).unwrap().priority, 2);
    }

    #[test]
    fn test_move_up_at_floor_is_noop() {
        let mut store = TaskStore::default();
        let id = add_task(&mut store, "only", "2025-06-02", 1);
        let before = store.clone();

        // Today is the task's own day: the previous day is in the past.
        assert!(!move_up(&mut store, &id, day("2025-06-02")));
        assert_eq!(store.tasks, before.tasks);
    }

    #[test]
    fn test_move_up_transfers_to_previous_day_end() {
        let mut store = TaskStore::default();
        add_task(&mut store, "existing", "2025-06-02", 2);
        let id = add_task(&mut store, "mover", "2025-06-03", 1);

        assert!(move_up(&mut store, &id, day("2025-06-01")));
        let task = store.get(&id).unwrap();
        assert_eq!(task.day(), day("2025-06-02"));
        // Appended: sorts after every existing task on the target day.
        assert_eq!(day_order(&store, "2025-06-02"), vec!["existing", "mover"]);
        assert_eq!(task.priority, store.min_priority(day("2025-06-02")));
    }

    #[test]
    fn test_move_down_transfers_to_next_day_start() {
        let mut store = TaskStore::default();
        let id = add_task(&mut store, "mover", "2025-06-02", 1);
        add_task(&mut store, "existing-a", "2025-06-03", 4);
        add_task(&mut store, "existing-b", "2025-06-03", 2);

        assert!(move_down(&mut store, &id, day("2025-06-01")));
        let task = store.get(&id).unwrap();
        assert_eq!(task.day(), day("2025-06-03"));
        assert_eq!(task.priority, 5);
        assert_eq!(
            day_order(&store, "2025-06-03"),
            vec!["mover", "existing-a", "existing-b"]
        );
    }

    #[test]
    fn test_move_down_into_empty_day() {
        let mut store = TaskStore::default();
        let id = add_task(&mut store, "mover", "2025-06-02", 1);

        assert!(move_down(&mut store, &id, day("2025-06-01")));
        let task = store.get(&id).unwrap();
        assert_eq!(task.day(), day("2025-06-03"));
        assert_eq!(task.priority, 1);
    }

    #[test]
    fn test_move_up_into_future_day_allowed() {
        // A task on day D+2 moving up lands on D+1, still after today.
        let mut store = TaskStore::default();
        let id = add_task(&mut store, "mover", "2025-06-04", 1);

        assert!(move_up(&mut store, &id, day("2025-06-02")));
        assert_eq!(store.get(&id).unwrap().day(), day("2025-06-03"));
    }

    #[test]
    fn test_calendar_row_is_not_movable() {
        let mut store = TaskStore::default();
        let mut cal = Task::new("standup", day("2025-06-02"));
        cal.is_calendar = true;
        let id = cal.id.clone();
        store.push(cal);

        assert!(!move_up(&mut store, &id, day("2025-06-01")));
        assert!(!move_down(&mut store, &id, day("2025-06-01")));
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut store = TaskStore::default();
        assert!(!move_up(&mut store, "missing", day("2025-06-01")));
        assert!(!move_down(&mut store, "missing", day("2025-06-01")));
    }

    #[test]
    fn test_round_trip_down_then_up() {
        let mut store = TaskStore::default();
        // b created first so the priority tie after a's move breaks toward b.
        add_task(&mut store, "b", "2025-06-02", 2);
        let a = add_task(&mut store, "a", "2025-06-02", 3);
        assert_eq!(day_order(&store, "2025-06-02"), vec!["a", "b"]);

        assert!(move_down(&mut store, &a, day("2025-06-01")));
        assert_eq!(day_order(&store, "2025-06-02"), vec!["b", "a"]);
        assert!(move_up(&mut store, &a, day("2025-06-01")));
        assert_eq!(day_order(&store, "2025-06-02"), vec!["a", "b"]);
    }

    #[test]
    fn test_wide_priority_gap_takes_multiple_presses() {
        let mut store = TaskStore::default();
        // low created first so the eventual priority tie breaks toward it.
        let low = add_task(&mut store, "low", "2025-06-02", 1);
        add_task(&mut store, "top", "2025-06-02", 5);

        // Each press closes the gap by one; the order flips only once the
        // priorities actually cross.
        for _ in 0..4 {
            assert_eq!(day_order(&store, "2025-06-02"), vec!["top", "low"]);
            assert!(move_up(&mut store, &low, day("2025-06-01")));
        }
        assert_eq!(day_order(&store, "2025-06-02"), vec!["low", "top"]);
    }
}
