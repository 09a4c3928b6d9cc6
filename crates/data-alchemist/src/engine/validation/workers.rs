use super::OVERLOAD_RATIO;
use crate::engine::domain::{
    generated_id, EntityKind, Finding, FindingKind, ProposedValue, Severity, Worker,
};
use std::collections::BTreeSet;

pub(crate) fn check(worker: &Worker, index: usize, findings: &mut Vec<Finding>) {
    if worker.worker_id.is_empty() {
        let id = generated_id(EntityKind::Workers, index);
        findings.push(Finding {
            id: format!("worker-{index}-id"),
            kind: FindingKind::Error,
            severity: Severity::Critical,
            entity: EntityKind::Workers,
            row_index: index,
            field: "WorkerID",
            message: "Worker ID is required".to_string(),
            suggestion: Some(format!("Generate ID: {id}")),
            proposed: Some(ProposedValue::Text(id)),
            auto_fixable: true,
        });
    }

    let slot_count = worker.available_slots.len() as i64;
    if slot_count > 0 && worker.max_load_per_phase > 0 {
        let utilization = worker.max_load_per_phase as f64 / slot_count as f64;
        if utilization > OVERLOAD_RATIO {
            let reduced = (slot_count as f64 * 0.7).floor() as i64;
            findings.push(Finding {
                id: format!("worker-{index}-overload"),
                kind: FindingKind::Warning,
                severity: Severity::Medium,
                entity: EntityKind::Workers,
                row_index: index,
                field: "MaxLoadPerPhase",
                message: "High utilization ratio detected".to_string(),
                suggestion: Some(format!("Reduce max load to {reduced} to leave headroom")),
                proposed: Some(ProposedValue::Int(reduced)),
                auto_fixable: true,
            });
        }
    }

    let distinct_skills: BTreeSet<&str> = worker.skills.iter().map(String::as_str).collect();
    if distinct_skills.len() < 2 {
        findings.push(Finding {
            id: format!("worker-{index}-skill-diversity"),
            kind: FindingKind::Info,
            severity: Severity::Low,
            entity: EntityKind::Workers,
            row_index: index,
            field: "Skills",
            message: "Limited skill diversity".to_string(),
            suggestion: Some("Cross-train this worker to increase versatility".to_string()),
            proposed: None,
            auto_fixable: false,
        });
    }
}
