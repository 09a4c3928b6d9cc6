use super::LONG_DURATION_PHASES;
use crate::engine::domain::{
    generated_id, EntityKind, Finding, FindingKind, ProposedValue, Severity, Task, Worker,
};

pub(crate) fn check(task: &Task, index: usize, workers: &[Worker], findings: &mut Vec<Finding>) {
    if task.task_id.is_empty() {
        let id = generated_id(EntityKind::Tasks, index);
        findings.push(Finding {
            id: format!("task-{index}-id"),
            kind: FindingKind::Error,
            severity: Severity::Critical,
            entity: EntityKind::Tasks,
            row_index: index,
            field: "TaskID",
            message: "Task ID is required".to_string(),
            suggestion: Some(format!("Generate ID: {id}")),
            proposed: Some(ProposedValue::Text(id)),
            auto_fixable: true,
        });
    }

    for skill in &task.required_skills {
        let holders = workers
            .iter()
            .filter(|worker| worker.skills.iter().any(|owned| owned == skill))
            .count();

        if holders == 0 {
            findings.push(Finding {
                id: format!("task-{index}-skill-{skill}"),
                kind: FindingKind::Warning,
                severity: Severity::High,
                entity: EntityKind::Tasks,
                row_index: index,
                field: "RequiredSkills",
                message: format!("No worker has the required skill: {skill}"),
                suggestion: Some(format!(
                    "Train existing workers or hire specialists in {skill}"
                )),
                proposed: None,
                auto_fixable: false,
            });
        } else if holders == 1 {
            // Single point of failure, worth a note but not a warning.
            findings.push(Finding {
                id: format!("task-{index}-skill-risk-{skill}"),
                kind: FindingKind::Info,
                severity: Severity::Low,
                entity: EntityKind::Tasks,
                row_index: index,
                field: "RequiredSkills",
                message: format!("Only 1 worker has skill: {skill}"),
                suggestion: Some(
                    "Consider cross-training to reduce single points of failure".to_string(),
                ),
                proposed: None,
                auto_fixable: false,
            });
        }
    }

    if task.duration > LONG_DURATION_PHASES {
        findings.push(Finding {
            id: format!("task-{index}-duration"),
            kind: FindingKind::Info,
            severity: Severity::Low,
            entity: EntityKind::Tasks,
            row_index: index,
            field: "Duration",
            message: "Long duration task detected".to_string(),
            suggestion: Some(
                "Break the task into smaller subtasks for better resource allocation".to_string(),
            ),
            proposed: None,
            auto_fixable: false,
        });
    }
}
