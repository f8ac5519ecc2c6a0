use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::task::{Task, display_cmp};

/// Counters persisted alongside the tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub last_quote_index: usize,
    #[serde(default)]
    pub tasks_completed_today: u32,
}

/// The full persistent state: a flat task list plus settings.
///
/// Owned by the TUI shell for the life of the process; the engines in
/// `ops` borrow it per call and never retain references.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskStore {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub settings: Settings,
}

impl TaskStore {
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Remove a task by id. Inferred children are left in place; they join
    /// whatever block now precedes them.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// All stored tasks for a day, in display order. Persisted tasks are
    /// user tasks; anything claiming to be a calendar event is filtered out
    /// since those are synthesized per view, never stored.
    pub fn day_tasks(&self, day: NaiveDate) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| !t.is_calendar && t.day() == day)
            .collect();
        tasks.sort_by(|a, b| display_cmp(a, b));
        tasks
    }

    /// Lowest priority on a day, folded from 0 so an empty day yields 0.
    pub fn min_priority(&self, day: NaiveDate) -> i64 {
        self.day_tasks(day)
            .iter()
            .map(|t| t.priority)
            .fold(0, i64::min)
    }

    /// Highest priority on a day, folded from 0 so an empty day yields 0.
    pub fn max_priority(&self, day: NaiveDate) -> i64 {
        self.day_tasks(day)
            .iter()
            .map(|t| t.priority)
            .fold(0, i64::max)
    }
}
