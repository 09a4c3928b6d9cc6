use super::domain::{generated_id, DataSet, EntityKind, Finding, ProposedValue};
use serde_json::Value;

/// Neutral priority applied when a priority finding carries no usable
/// proposed value.
const DEFAULT_PRIORITY: i64 = 3;

/// Conservative per-phase load applied when a load finding carries no usable
/// proposed value.
const DEFAULT_MAX_LOAD: i64 = 2;

/// Payload substituted for unparseable `AttributesJSON`.
const DEFAULT_ATTRIBUTES: &str = "{\"status\": \"active\"}";

/// Result of one auto-fix pass: the repaired collections plus the ids of the
/// findings that were acted on. The finding list itself is never touched;
/// the caller must re-validate to obtain a fresh set.
#[derive(Debug, Clone)]
pub struct FixOutcome {
    pub data: DataSet,
    pub applied: Vec<String>,
}

/// Apply every safe, deterministic repair among `findings` to a copy of
/// `data`.
///
/// Only findings flagged `auto_fixable` are considered, and each fix mutates
/// exactly the field the finding names. Repairs are per-field: one finding
/// without a matching fixer never blocks the rest of the batch.
pub fn auto_fix(findings: &[Finding], data: &DataSet) -> FixOutcome {
    let mut repaired = data.clone();
    let mut applied = Vec::new();

    for finding in findings.iter().filter(|f| f.auto_fixable) {
        let fixed = match finding.entity {
            EntityKind::Clients => fix_client(finding, &mut repaired),
            EntityKind::Workers => fix_worker(finding, &mut repaired),
            EntityKind::Tasks => fix_task(finding, &mut repaired),
        };
        if fixed {
            applied.push(finding.id.clone());
        }
    }

    FixOutcome {
        data: repaired,
        applied,
    }
}

fn fix_client(finding: &Finding, data: &mut DataSet) -> bool {
    let Some(client) = data.clients.get_mut(finding.row_index) else {
        return false;
    };

    match finding.field {
        "ClientID" => {
            if client.client_id.is_empty() {
                client.client_id = proposed_text(finding)
                    .unwrap_or_else(|| generated_id(EntityKind::Clients, finding.row_index));
                true
            } else {
                false
            }
        }
        "PriorityLevel" => {
            client.priority_level = proposed_int(finding).unwrap_or(DEFAULT_PRIORITY);
            true
        }
        "AttributesJSON" => {
            client.attributes_json = match serde_json::from_str::<Value>(&client.attributes_json) {
                Ok(value) => serde_json::to_string_pretty(&value)
                    .unwrap_or_else(|_| DEFAULT_ATTRIBUTES.to_string()),
                Err(_) => DEFAULT_ATTRIBUTES.to_string(),
            };
            true
        }
        _ => false,
    }
}

fn fix_worker(finding: &Finding, data: &mut DataSet) -> bool {
    let Some(worker) = data.workers.get_mut(finding.row_index) else {
        return false;
    };

    match finding.field {
        "WorkerID" => {
            if worker.worker_id.is_empty() {
                worker.worker_id = proposed_text(finding)
                    .unwrap_or_else(|| generated_id(EntityKind::Workers, finding.row_index));
                true
            } else {
                false
            }
        }
        "MaxLoadPerPhase" => {
            worker.max_load_per_phase = proposed_int(finding).unwrap_or(DEFAULT_MAX_LOAD);
            true
        }
        _ => false,
    }
}

fn fix_task(finding: &Finding, data: &mut DataSet) -> bool {
    let Some(task) = data.tasks.get_mut(finding.row_index) else {
        return false;
    };

    match finding.field {
        "TaskID" => {
            if task.task_id.is_empty() {
                task.task_id = proposed_text(finding)
                    .unwrap_or_else(|| generated_id(EntityKind::Tasks, finding.row_index));
                true
            } else {
                false
            }
        }
        _ => false,
    }
}

fn proposed_text(finding: &Finding) -> Option<String> {
    match &finding.proposed {
        Some(ProposedValue::Text(value)) => Some(value.clone()),
        _ => None,
    }
}

fn proposed_int(finding: &Finding) -> Option<i64> {
    match &finding.proposed {
        Some(ProposedValue::Int(value)) => Some(*value),
        _ => None,
    }
}
