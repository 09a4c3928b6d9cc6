//! Rule catalog inspecting the three collections and reporting every data
//! problem as a [`Finding`].
//!
//! `validate` is deterministic and total: malformed or missing fields are
//! reported, never rejected. Row indices are assigned by position at call
//! time and a re-run fully replaces the finding set.

mod clients;
mod tasks;
mod workers;

use super::domain::{DataSet, Finding};

/// Slot-utilization ratio above which a worker is flagged as an overload
/// risk.
pub(crate) const OVERLOAD_RATIO: f64 = 0.8;

/// Task durations beyond this many phases earn a decomposition note.
pub(crate) const LONG_DURATION_PHASES: i64 = 5;

/// Run every per-entity rule set plus the cross-entity referential checks.
pub fn validate(data: &DataSet) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (index, client) in data.clients.iter().enumerate() {
        clients::check(client, index, &data.tasks, &mut findings);
    }

    for (index, task) in data.tasks.iter().enumerate() {
        tasks::check(task, index, &data.workers, &mut findings);
    }

    for (index, worker) in data.workers.iter().enumerate() {
        workers::check(worker, index, &mut findings);
    }

    findings
}
