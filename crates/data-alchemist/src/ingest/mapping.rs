use crate::engine::domain::EntityKind;
use std::collections::BTreeMap;

/// Map raw CSV headers to canonical field names for one entity.
///
/// Substring heuristics cover renamed or rearranged columns; when two
/// headers fight over the same target the whole mapping falls back to exact
/// canonical matches only, so a messy file never scrambles fields.
pub fn map_columns(headers: &[String], entity: EntityKind) -> BTreeMap<String, String> {
    let mut mapped = BTreeMap::new();

    for header in headers {
        if let Some(target) = heuristic_target(header, entity) {
            mapped.insert(header.clone(), target.to_string());
        }
    }

    let mut seen = std::collections::BTreeSet::new();
    let collision = mapped.values().any(|target| !seen.insert(target.clone()));
    if collision {
        return conservative_mapping(headers, entity);
    }

    mapped
}

fn heuristic_target(header: &str, entity: EntityKind) -> Option<&'static str> {
    let lower = header.to_lowercase();
    let has = |needle: &str| lower.contains(needle);

    match entity {
        EntityKind::Clients => {
            if has("clientid") || lower == "id" || lower == "client_id" {
                Some("ClientID")
            } else if has("clientname") || has("name") {
                Some("ClientName")
            } else if has("priority") || has("level") {
                Some("PriorityLevel")
            } else if has("task") || has("request") {
                Some("RequestedTaskIDs")
            } else if has("group") || has("tag") || has("category") {
                Some("GroupTag")
            } else if has("attribute") || has("json") || has("metadata") {
                Some("AttributesJSON")
            } else {
                None
            }
        }
        EntityKind::Workers => {
            if has("workerid") || lower == "id" || lower == "worker_id" {
                Some("WorkerID")
            } else if has("workername") || has("name") {
                Some("WorkerName")
            } else if has("skill") || has("expertise") {
                Some("Skills")
            } else if has("slot") || has("available") || has("phase") {
                Some("AvailableSlots")
            } else if has("load") || has("capacity") {
                Some("MaxLoadPerPhase")
            } else if has("group") || has("team") || has("department") {
                Some("WorkerGroup")
            } else if has("qualification") || has("level") || has("experience") {
                Some("QualificationLevel")
            } else {
                None
            }
        }
        EntityKind::Tasks => {
            if has("taskid") || lower == "id" || lower == "task_id" {
                Some("TaskID")
            } else if has("taskname") || has("name") {
                Some("TaskName")
            } else if has("category") || has("type") || has("classification") {
                Some("Category")
            } else if has("duration") || has("time") || has("length") {
                Some("Duration")
            } else if has("skill") || has("requirement") || has("expertise") {
                Some("RequiredSkills")
            } else if has("phase") || has("preferred") || has("schedule") {
                Some("PreferredPhases")
            } else if has("concurrent") || has("parallel") || has("max") {
                Some("MaxConcurrent")
            } else {
                None
            }
        }
    }
}

const CLIENT_FIELDS: &[&str] = &[
    "ClientID",
    "ClientName",
    "PriorityLevel",
    "RequestedTaskIDs",
    "GroupTag",
    "AttributesJSON",
];

const WORKER_FIELDS: &[&str] = &[
    "WorkerID",
    "WorkerName",
    "Skills",
    "AvailableSlots",
    "MaxLoadPerPhase",
    "WorkerGroup",
    "QualificationLevel",
];

const TASK_FIELDS: &[&str] = &[
    "TaskID",
    "TaskName",
    "Category",
    "Duration",
    "RequiredSkills",
    "PreferredPhases",
    "MaxConcurrent",
];

/// Exact matches only (case and underscore insensitive), used when two
/// heuristic guesses collide.
fn conservative_mapping(headers: &[String], entity: EntityKind) -> BTreeMap<String, String> {
    let canonical = match entity {
        EntityKind::Clients => CLIENT_FIELDS,
        EntityKind::Workers => WORKER_FIELDS,
        EntityKind::Tasks => TASK_FIELDS,
    };

    let mut mapped = BTreeMap::new();
    for header in headers {
        let flattened: String = header
            .chars()
            .filter(|ch| *ch != '_' && !ch.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if let Some(field) = canonical
            .iter()
            .find(|field| field.to_lowercase() == flattened)
        {
            mapped.insert(header.clone(), field.to_string());
        }
    }
    mapped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn maps_renamed_client_columns() {
        let mapped = map_columns(
            &headers(&["client_id", "priority", "requested tasks"]),
            EntityKind::Clients,
        );
        assert_eq!(mapped["client_id"], "ClientID");
        assert_eq!(mapped["priority"], "PriorityLevel");
        assert_eq!(mapped["requested tasks"], "RequestedTaskIDs");
    }

    #[test]
    fn colliding_guesses_fall_back_to_exact_matches() {
        // Both headers would map to ClientName heuristically.
        let mapped = map_columns(
            &headers(&["name", "nickname", "client_id"]),
            EntityKind::Clients,
        );
        assert!(!mapped.contains_key("name"));
        assert!(!mapped.contains_key("nickname"));
        assert_eq!(mapped["client_id"], "ClientID");
    }

    #[test]
    fn maps_worker_capacity_columns() {
        let mapped = map_columns(
            &headers(&["WorkerID", "max load", "available slots"]),
            EntityKind::Workers,
        );
        assert_eq!(mapped["max load"], "MaxLoadPerPhase");
        assert_eq!(mapped["available slots"], "AvailableSlots");
    }

    #[test]
    fn unknown_headers_are_left_unmapped() {
        let mapped = map_columns(&headers(&["mystery_column"]), EntityKind::Tasks);
        assert!(mapped.is_empty());
    }
}
