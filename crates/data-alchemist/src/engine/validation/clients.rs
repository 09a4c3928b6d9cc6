use crate::engine::domain::{
    generated_id, Client, EntityKind, Finding, FindingKind, ProposedValue, Severity, Task,
};

pub(crate) fn check(client: &Client, index: usize, tasks: &[Task], findings: &mut Vec<Finding>) {
    if client.client_id.is_empty() {
        let id = generated_id(EntityKind::Clients, index);
        findings.push(Finding {
            id: format!("client-{index}-id"),
            kind: FindingKind::Error,
            severity: Severity::Critical,
            entity: EntityKind::Clients,
            row_index: index,
            field: "ClientID",
            message: "Client ID is required".to_string(),
            suggestion: Some(format!("Generate ID: {id}")),
            proposed: Some(ProposedValue::Text(id)),
            auto_fixable: true,
        });
    }

    if client.priority_level < 1 || client.priority_level > 5 {
        let replacement = client.priority_level.clamp(1, 5);
        findings.push(Finding {
            id: format!("client-{index}-priority"),
            kind: FindingKind::Error,
            severity: Severity::High,
            entity: EntityKind::Clients,
            row_index: index,
            field: "PriorityLevel",
            message: "Priority level must be between 1 and 5".to_string(),
            suggestion: Some(format!("Clamp priority level to {replacement}")),
            proposed: Some(ProposedValue::Int(replacement)),
            auto_fixable: true,
        });
    }

    // Referential: unresolved task ids are reported but never auto-removed,
    // since the intended target is ambiguous.
    for task_id in &client.requested_task_ids {
        if !tasks.iter().any(|task| &task.task_id == task_id) {
            findings.push(Finding {
                id: format!("client-{index}-task-{task_id}"),
                kind: FindingKind::Error,
                severity: Severity::Medium,
                entity: EntityKind::Clients,
                row_index: index,
                field: "RequestedTaskIDs",
                message: format!("Requested task {task_id} does not exist"),
                suggestion: Some("Map the reference to an existing task or remove it".to_string()),
                proposed: None,
                auto_fixable: false,
            });
        }
    }

    if !client.attributes_json.is_empty()
        && serde_json::from_str::<serde_json::Value>(&client.attributes_json).is_err()
    {
        findings.push(Finding {
            id: format!("client-{index}-json"),
            kind: FindingKind::Warning,
            severity: Severity::Medium,
            entity: EntityKind::Clients,
            row_index: index,
            field: "AttributesJSON",
            message: "Invalid JSON format".to_string(),
            suggestion: Some("Reformat the payload or reset it to a valid default".to_string()),
            proposed: None,
            auto_fixable: true,
        });
    }
}
