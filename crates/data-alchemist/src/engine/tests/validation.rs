use super::common::*;
use crate::engine::domain::{EntityKind, FindingKind, ProposedValue, Severity};
use crate::engine::validate;

#[test]
fn missing_client_id_is_critical_and_fixable() {
    // Scenario A.
    let data = dataset(vec![client("", 3)], Vec::new(), Vec::new());

    let findings = validate(&data);
    let finding = findings
        .iter()
        .find(|f| f.field == "ClientID")
        .expect("missing client id reported");

    assert_eq!(finding.kind, FindingKind::Error);
    assert_eq!(finding.severity, Severity::Critical);
    assert_eq!(finding.entity, EntityKind::Clients);
    assert_eq!(finding.row_index, 0);
    assert!(finding.auto_fixable);
    assert_eq!(
        finding.proposed,
        Some(ProposedValue::Text("C001".to_string()))
    );
}

#[test]
fn uncovered_skill_is_high_warning_not_fixable() {
    // Scenario B.
    let data = dataset(Vec::new(), Vec::new(), vec![task("T001", &["Rust"], 1)]);

    let findings = validate(&data);
    assert_eq!(findings.len(), 1);
    let finding = &findings[0];
    assert_eq!(finding.kind, FindingKind::Warning);
    assert_eq!(finding.severity, Severity::High);
    assert_eq!(finding.message, "No worker has the required skill: Rust");
    assert!(!finding.auto_fixable);
}

#[test]
fn out_of_range_priority_proposes_clamped_value() {
    // Scenario C; the replacement is deterministic clamping, never random.
    let data = dataset(vec![client("C001", 9)], Vec::new(), Vec::new());

    let findings = validate(&data);
    let finding = findings
        .iter()
        .find(|f| f.field == "PriorityLevel")
        .expect("out-of-range priority reported");

    assert_eq!(finding.kind, FindingKind::Error);
    assert_eq!(finding.severity, Severity::High);
    assert!(finding.auto_fixable);
    assert_eq!(finding.proposed, Some(ProposedValue::Int(5)));

    let low = dataset(vec![client("C001", 0)], Vec::new(), Vec::new());
    let findings = validate(&low);
    let finding = findings
        .iter()
        .find(|f| f.field == "PriorityLevel")
        .expect("under-range priority reported");
    assert_eq!(finding.proposed, Some(ProposedValue::Int(1)));
}

#[test]
fn unknown_requested_task_is_reported_not_fixable() {
    // Scenario E.
    let mut requester = client("C001", 3);
    requester.requested_task_ids = vec!["T404".to_string()];
    let data = dataset(vec![requester], Vec::new(), vec![task("T001", &[], 1)]);

    let findings = validate(&data);
    let finding = findings
        .iter()
        .find(|f| f.field == "RequestedTaskIDs")
        .expect("dangling reference reported");

    assert_eq!(finding.kind, FindingKind::Error);
    assert_eq!(finding.severity, Severity::Medium);
    assert_eq!(finding.message, "Requested task T404 does not exist");
    assert!(!finding.auto_fixable);
}

#[test]
fn malformed_attributes_json_is_fixable_warning() {
    let mut row = client("C001", 3);
    row.attributes_json = "{not json".to_string();
    let data = dataset(vec![row], Vec::new(), Vec::new());

    let findings = validate(&data);
    let finding = findings
        .iter()
        .find(|f| f.field == "AttributesJSON")
        .expect("invalid json reported");

    assert_eq!(finding.kind, FindingKind::Warning);
    assert_eq!(finding.severity, Severity::Medium);
    assert!(finding.auto_fixable);
}

#[test]
fn empty_attributes_json_is_not_flagged() {
    let data = dataset(vec![client("C001", 3)], Vec::new(), Vec::new());
    assert!(validate(&data)
        .iter()
        .all(|f| f.field != "AttributesJSON"));
}

#[test]
fn single_skill_holder_is_info_note() {
    let data = dataset(
        Vec::new(),
        vec![worker("W001", &["Rust", "Go"], &[1, 2, 3], 1)],
        vec![task("T001", &["Rust"], 1)],
    );

    let findings = validate(&data);
    let finding = findings
        .iter()
        .find(|f| f.id == "task-0-skill-risk-Rust")
        .expect("single point of failure noted");
    assert_eq!(finding.kind, FindingKind::Info);
    assert_eq!(finding.severity, Severity::Low);
    assert!(!finding.auto_fixable);
}

#[test]
fn long_duration_earns_decomposition_note() {
    let data = dataset(Vec::new(), Vec::new(), vec![task("T001", &[], 6)]);
    assert!(validate(&data)
        .iter()
        .any(|f| f.id == "task-0-duration" && f.kind == FindingKind::Info));

    let five = dataset(Vec::new(), Vec::new(), vec![task("T001", &[], 5)]);
    assert!(validate(&five).iter().all(|f| f.field != "Duration"));
}

#[test]
fn overloaded_worker_proposes_reduced_load() {
    // 4 of 4 slots used per phase: utilization 1.0 > 0.8.
    let data = dataset(
        Vec::new(),
        vec![worker("W001", &["A", "B"], &[1, 2, 3, 4], 4)],
        Vec::new(),
    );

    let findings = validate(&data);
    let finding = findings
        .iter()
        .find(|f| f.field == "MaxLoadPerPhase")
        .expect("overload risk reported");

    assert_eq!(finding.kind, FindingKind::Warning);
    assert!(finding.auto_fixable);
    // floor(4 * 0.7) = 2
    assert_eq!(finding.proposed, Some(ProposedValue::Int(2)));
}

#[test]
fn worker_under_threshold_is_not_flagged() {
    // 3 of 4 slots: utilization 0.75 stays under the 0.8 threshold.
    let data = dataset(
        Vec::new(),
        vec![worker("W001", &["A", "B"], &[1, 2, 3, 4], 3)],
        Vec::new(),
    );
    assert!(validate(&data)
        .iter()
        .all(|f| f.field != "MaxLoadPerPhase"));
}

#[test]
fn narrow_skill_set_is_info_note() {
    let data = dataset(Vec::new(), vec![worker("W001", &["A"], &[1], 1)], Vec::new());
    assert!(validate(&data)
        .iter()
        .any(|f| f.id == "worker-0-skill-diversity" && f.kind == FindingKind::Info));
}

#[test]
fn validation_is_deterministic() {
    let mut bad_client = client("", 9);
    bad_client.requested_task_ids = vec!["T404".to_string()];
    bad_client.attributes_json = "oops".to_string();
    let data = dataset(
        vec![bad_client],
        vec![worker("", &["A"], &[1, 2], 2)],
        vec![task("", &["Rust"], 7)],
    );

    let first = validate(&data);
    let second = validate(&data);
    assert_eq!(first, second);
}

#[test]
fn clean_dataset_yields_no_findings() {
    let data = dataset(
        vec![client("C001", 3)],
        vec![worker("W001", &["Rust", "Go"], &[1, 2, 3], 2)],
        vec![task("T001", &[], 2)],
    );
    // The worker holds two skills and stays under the utilization threshold;
    // the task requires nothing and is short.
    assert!(validate(&data).is_empty());
}
