use super::domain::{DataSet, Finding};
use crate::config::ScoringConfig;

/// Aggregate 0-100 data-quality score.
///
/// Two-stage average: the error/warning-penalized base is first averaged
/// with completeness, and that midpoint is averaged with skill consistency.
/// The staging keeps any single dimension from dominating while staying
/// sensitive to all three.
pub fn quality_score(data: &DataSet, findings: &[Finding], config: &ScoringConfig) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let error_count = findings.iter().filter(|f| f.is_error()).count() as f64;
    let warning_count = findings.iter().filter(|f| f.is_warning()).count() as f64;
    let base = 100.0 - error_count * 10.0 - warning_count * 3.0;

    let completeness =
        ((data.total_records() as f64 / config.target_records as f64) * 100.0).min(100.0);

    let consistency = consistency_score(data);

    (((base + completeness) / 2.0 + consistency) / 2.0).clamp(0.0, 100.0)
}

/// Share of task-required skills offered by at least one worker, 0-100.
/// A dataset with no required skills is trivially consistent.
pub(crate) fn consistency_score(data: &DataSet) -> f64 {
    let required = data.required_skills();
    if required.is_empty() {
        return 100.0;
    }

    let offered = data.offered_skills();
    let covered = required.iter().filter(|skill| offered.contains(*skill)).count();
    covered as f64 / required.len() as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::domain::{Task, Worker};

    #[test]
    fn empty_dataset_scores_zero() {
        assert_eq!(
            quality_score(&DataSet::default(), &[], &ScoringConfig::default()),
            0.0
        );
    }

    #[test]
    fn consistency_is_full_without_required_skills() {
        let data = DataSet {
            workers: vec![Worker {
                skills: vec!["A".into(), "B".into()],
                ..Worker::default()
            }],
            ..DataSet::default()
        };
        assert_eq!(consistency_score(&data), 100.0);
    }

    #[test]
    fn consistency_counts_covered_required_skills() {
        let data = DataSet {
            workers: vec![Worker {
                skills: vec!["A".into()],
                ..Worker::default()
            }],
            tasks: vec![Task {
                task_id: "T001".into(),
                required_skills: vec!["A".into(), "B".into()],
                duration: 1,
                ..Task::default()
            }],
            ..DataSet::default()
        };
        assert_eq!(consistency_score(&data), 50.0);
    }
}
