pub mod fuzzy;

use chrono::NaiveDate;

use crate::model::Task;

/// Score from the shell's search mode boosting matches still worth acting
/// on: not done, and dated today or later.
const ACTIVE_BOOST: i64 = 100;

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub task: Task,
    pub score: i64,
}

/// Fuzzy-search `tasks` for `query`, best matches first.
///
/// The query is trimmed and lowercased; a blank query returns nothing.
/// Non-matches are dropped. Ties in score break toward the more recent
/// date.
pub fn search(query: &str, tasks: &[Task], today: NaiveDate) -> Vec<SearchResult> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<SearchResult> = tasks
        .iter()
        .filter_map(|task| {
            let mut score = fuzzy::score(&task.text, &query);
            if score <= 0 {
                return None;
            }
            if !task.done && task.day() >= today {
                score += ACTIVE_BOOST;
            }
            Some(SearchResult {
                task: task.clone(),
                score,
            })
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.task.date.cmp(&a.task.date))
    });
    results
}
