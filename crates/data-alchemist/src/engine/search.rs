use super::domain::{Client, DataSet, Task, Worker};
use serde::Serialize;

/// Workers loaded beyond this share of their slots match capacity queries.
const OVERLOAD_RATIO: f64 = 0.8;

/// Matches per entity for one query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub clients: Vec<Client>,
    pub workers: Vec<Worker>,
    pub tasks: Vec<Task>,
}

/// Replaceable query strategy. The default [`KeywordSearch`] is a
/// deterministic keyword classifier; a model-backed implementation can be
/// substituted without changing callers.
pub trait SearchStrategy {
    fn search(&self, query: &str, data: &DataSet) -> SearchResults;
}

/// Keyword-driven search over the three collections.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordSearch;

impl SearchStrategy for KeywordSearch {
    fn search(&self, query: &str, data: &DataSet) -> SearchResults {
        let lower = query.to_lowercase();
        let mut results = SearchResults::default();

        if lower.contains("high priority") || lower.contains("urgent") {
            results.clients = data
                .clients
                .iter()
                .filter(|client| client.priority_level >= 4)
                .cloned()
                .collect();
        } else if let Some(skill) = skill_term(&lower) {
            results.workers = data
                .workers
                .iter()
                .filter(|worker| {
                    worker
                        .skills
                        .iter()
                        .any(|owned| owned.to_lowercase().contains(&skill))
                })
                .cloned()
                .collect();
            results.tasks = data
                .tasks
                .iter()
                .filter(|task| {
                    task.required_skills
                        .iter()
                        .any(|required| required.to_lowercase().contains(&skill))
                })
                .cloned()
                .collect();
        } else if lower.contains("overload") || lower.contains("capacity") {
            results.workers = data
                .workers
                .iter()
                .filter(|worker| {
                    let slots = worker.available_slots.len().max(1) as f64;
                    worker.max_load_per_phase as f64 / slots > OVERLOAD_RATIO
                })
                .cloned()
                .collect();
        } else {
            results.clients = substring_matches(&data.clients, &lower);
            results.workers = substring_matches(&data.workers, &lower);
            results.tasks = substring_matches(&data.tasks, &lower);
        }

        results
    }
}

/// Extract the word following "skill"/"skills" when the query names one.
fn skill_term(lower: &str) -> Option<String> {
    if !lower.contains("skill") && !lower.contains("expertise") {
        return None;
    }

    let mut words = lower.split_whitespace().peekable();
    while let Some(word) = words.next() {
        if word.starts_with("skill") {
            if let Some(next) = words.peek() {
                let term: String = next
                    .chars()
                    .filter(|ch| ch.is_alphanumeric())
                    .collect::<String>();
                if !term.is_empty() {
                    return Some(term);
                }
            }
        }
    }

    None
}

/// Fallback: substring match over the serialized record.
fn substring_matches<T: Serialize + Clone>(rows: &[T], lower: &str) -> Vec<T> {
    rows.iter()
        .filter(|row| {
            serde_json::to_string(row)
                .map(|serialized| serialized.to_lowercase().contains(lower))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}
