//! Search and ranking over the in-memory task list.

use super::resource::Task;
use crate::ui::viewmodel::TaskViewModel;
use chrono::prelude::*;

pub const MAX_RESULTS: usize = 100;

const TITLE_PREFIX_SCORE: f64 = 3.0;
const TITLE_SCORE: f64 = 2.0;
const LABEL_SCORE: f64 = 1.0;
const ASSIGNEE_SCORE: f64 = 0.75;
const DESCRIPTION_SCORE: f64 = 0.5;

/// A ranked match. Highlights are `(start, end)` character offsets into the
/// title, end exclusive.
///
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub task: TaskViewModel,
    pub score: f64,
    pub highlights: Vec<(usize, usize)>,
}

/// Rank tasks against a query. Matching is case-insensitive; an empty query
/// returns every task with a score of zero in its original order.
///
pub fn rank(tasks: &[Task], query: &str, now: DateTime<Utc>) -> Vec<SearchResult> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return tasks
            .iter()
            .take(MAX_RESULTS)
            .map(|task| SearchResult {
                task: TaskViewModel::from_task(task, now),
                score: 0.0,
                highlights: vec![],
            })
            .collect();
    }

    let mut results: Vec<SearchResult> = tasks
        .iter()
        .filter_map(|task| {
            let score = score(task, &needle);
            (score > 0.0).then(|| SearchResult {
                task: TaskViewModel::from_task(task, now),
                score,
                highlights: highlights(&task.title, &needle),
            })
        })
        .collect();

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(MAX_RESULTS);
    results
}

/// Return true if the title contains the query, ignoring case.
///
pub fn title_matches(title: &str, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    !needle.is_empty() && title.to_lowercase().contains(&needle)
}

fn score(task: &Task, needle: &str) -> f64 {
    let mut score = 0.0;
    let title = task.title.to_lowercase();
    if title.starts_with(needle) {
        score += TITLE_PREFIX_SCORE;
    } else if title.contains(needle) {
        score += TITLE_SCORE;
    }
    if task.labels.iter().any(|l| l.to_lowercase().contains(needle)) {
        score += LABEL_SCORE;
    }
    if task.assignee.to_lowercase().contains(needle) {
        score += ASSIGNEE_SCORE;
    }
    if task.description.to_lowercase().contains(needle) {
        score += DESCRIPTION_SCORE;
    }
    score
}

/// Find non-overlapping occurrences of `needle` in `title` as character
/// offsets. Comparison is per character so offsets stay valid for titles
/// whose lowercase form changes length.
///
fn highlights(title: &str, needle: &str) -> Vec<(usize, usize)> {
    let haystack: Vec<char> = title.chars().flat_map(|c| c.to_lowercase().next()).collect();
    let needle: Vec<char> = needle.chars().collect();
    let mut spans = vec![];
    if needle.is_empty() || needle.len() > haystack.len() {
        return spans;
    }
    let mut i = 0;
    while i + needle.len() <= haystack.len() {
        if haystack[i..i + needle.len()] == needle[..] {
            spans.push((i, i + needle.len()));
            i += needle.len();
        } else {
            i += 1;
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, title: &str) -> Task {
        Task::new(id, title)
    }

    #[test]
    fn test_empty_query_lists_everything() {
        let tasks = vec![task("1", "alpha"), task("2", "beta")];
        let results = rank(&tasks, "  ", Utc::now());
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.score == 0.0 && r.highlights.is_empty()));
        assert_eq!(results[0].task.id, "1");
    }

    #[test]
    fn test_title_prefix_ranks_above_substring() {
        let tasks = vec![task("1", "Fix logout bug"), task("2", "Login page")];
        let results = rank(&tasks, "log", Utc::now());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].task.id, "2");
        assert_eq!(results[0].score, 3.0);
        assert_eq!(results[1].score, 2.0);
    }

    #[test]
    fn test_other_fields_contribute() {
        let mut labelled = task("1", "Unrelated");
        labelled.labels = vec!["backend".to_string()];
        let mut assigned = task("2", "Other");
        assigned.assignee = "Backend team".to_string();
        let mut described = task("3", "Third");
        described.description = "touches the backend".to_string();
        let results = rank(&[described, assigned, labelled], "backend", Utc::now());
        let ids: Vec<_> = results.iter().map(|r| r.task.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_non_matching_tasks_are_dropped() {
        let results = rank(&[task("1", "alpha")], "zzz", Utc::now());
        assert!(results.is_empty());
    }

    #[test]
    fn test_equal_scores_keep_input_order() {
        let tasks = vec![task("1", "Fix login bug"), task("2", "Fix logout bug")];
        let results = rank(&tasks, "fix", Utc::now());
        assert_eq!(results[0].task.id, "1");
        assert_eq!(results[1].task.id, "2");
    }

    #[test]
    fn test_highlights_are_char_offsets() {
        assert_eq!(highlights("Log the login", "log"), vec![(0, 3), (8, 11)]);
        assert_eq!(highlights("aaaa", "aa"), vec![(0, 2), (2, 4)]);
        assert_eq!(highlights("Café log", "log"), vec![(5, 8)]);
    }

    #[test]
    fn test_results_are_capped() {
        let tasks: Vec<Task> = (0..150).map(|i| task(&i.to_string(), "same title")).collect();
        assert_eq!(rank(&tasks, "same", Utc::now()).len(), MAX_RESULTS);
    }

    #[test]
    fn test_title_matches() {
        assert!(title_matches("Fix Login", "login"));
        assert!(!title_matches("Fix Login", ""));
    }
}
