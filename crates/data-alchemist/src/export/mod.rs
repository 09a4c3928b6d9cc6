//! Serialization of cleaned collections and configuration for the
//! downstream allocator.
//!
//! Data and package exports are gated on a clean validation run: any finding
//! of kind `error` blocks them, while warnings and info notes never do.

use crate::engine::domain::{DataSet, EntityKind, Finding};
use crate::engine::rules::{Priority, Rule};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

pub const CONFIG_VERSION: &str = "1.0";

/// Errors raised while producing an export artifact.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("cannot export with {errors} unresolved validation errors")]
    BlockedByErrors { errors: usize },
    #[error("failed to write {entity} csv: {source}", entity = .entity.label())]
    Csv {
        entity: EntityKind,
        #[source]
        source: csv::Error,
    },
    #[error("failed to serialize export json: {0}")]
    Json(#[from] serde_json::Error),
}

fn error_count(findings: &[Finding]) -> usize {
    findings.iter().filter(|f| f.is_error()).count()
}

fn warning_count(findings: &[Finding]) -> usize {
    findings.iter().filter(|f| f.is_warning()).count()
}

/// Fail unless the finding set is free of errors.
pub fn ensure_exportable(findings: &[Finding]) -> Result<(), ExportError> {
    let errors = error_count(findings);
    if errors > 0 {
        return Err(ExportError::BlockedByErrors { errors });
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleExport {
    pub id: String,
    #[serde(rename = "type")]
    pub rule_type: &'static str,
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
    pub priority: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriorityExport {
    pub name: String,
    pub weight: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationStatus {
    pub errors: usize,
    pub warnings: usize,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigMetadata {
    #[serde(rename = "totalClients")]
    pub total_clients: usize,
    #[serde(rename = "totalWorkers")]
    pub total_workers: usize,
    #[serde(rename = "totalTasks")]
    pub total_tasks: usize,
    #[serde(rename = "totalRules")]
    pub total_rules: usize,
    #[serde(rename = "validationStatus")]
    pub validation_status: ValidationStatus,
}

/// The `rules_config.json` payload consumed by the allocator.
#[derive(Debug, Clone, Serialize)]
pub struct RulesConfig {
    pub version: &'static str,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
    pub rules: Vec<RuleExport>,
    pub priorities: BTreeMap<String, PriorityExport>,
    pub metadata: ConfigMetadata,
}

/// Build the rules/priorities configuration. Only enabled rules are
/// exported; the configuration itself is never gated on validation state
/// (its metadata reports it instead).
pub fn rules_config(
    data: &DataSet,
    rules: &[Rule],
    priorities: &[Priority],
    findings: &[Finding],
    generated_at: DateTime<Utc>,
) -> Result<RulesConfig, ExportError> {
    let enabled: Vec<&Rule> = rules.iter().filter(|rule| rule.enabled).collect();
    let exported = enabled
        .iter()
        .map(|rule| {
            Ok(RuleExport {
                id: rule.id.clone(),
                rule_type: rule.rule_type().label(),
                name: rule.name.clone(),
                description: rule.description.clone(),
                parameters: serde_json::to_value(&rule.params)?,
                priority: 1,
            })
        })
        .collect::<Result<Vec<_>, serde_json::Error>>()?;

    let priorities = priorities
        .iter()
        .map(|priority| {
            (
                priority.id.clone(),
                PriorityExport {
                    name: priority.name.clone(),
                    weight: priority.weight,
                    description: priority.description.clone(),
                },
            )
        })
        .collect();

    let errors = error_count(findings);
    Ok(RulesConfig {
        version: CONFIG_VERSION,
        generated_at,
        rules: exported,
        priorities,
        metadata: ConfigMetadata {
            total_clients: data.clients.len(),
            total_workers: data.workers.len(),
            total_tasks: data.tasks.len(),
            total_rules: enabled.len(),
            validation_status: ValidationStatus {
                errors,
                warnings: warning_count(findings),
                passed: errors == 0,
            },
        },
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    #[serde(rename = "totalErrors")]
    pub total_errors: usize,
    #[serde(rename = "totalWarnings")]
    pub total_warnings: usize,
    #[serde(rename = "validationPassed")]
    pub validation_passed: bool,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FindingsByEntity {
    pub clients: Vec<Finding>,
    pub workers: Vec<Finding>,
    pub tasks: Vec<Finding>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub entity: EntityKind,
    pub field: &'static str,
    pub issue: String,
    pub recommendation: String,
}

/// The `validation_report.json` payload.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub summary: ReportSummary,
    #[serde(rename = "errorsByEntity")]
    pub errors_by_entity: FindingsByEntity,
    pub recommendations: Vec<Recommendation>,
}

/// Snapshot the current finding set as a report. Not gated: the report is
/// most useful precisely when errors remain.
pub fn validation_report(findings: &[Finding], generated_at: DateTime<Utc>) -> ValidationReport {
    let by_entity = |entity: EntityKind| -> Vec<Finding> {
        findings
            .iter()
            .filter(|f| f.entity == entity)
            .cloned()
            .collect()
    };

    let errors = error_count(findings);
    ValidationReport {
        summary: ReportSummary {
            total_errors: errors,
            total_warnings: warning_count(findings),
            validation_passed: errors == 0,
            generated_at,
        },
        errors_by_entity: FindingsByEntity {
            clients: by_entity(EntityKind::Clients),
            workers: by_entity(EntityKind::Workers),
            tasks: by_entity(EntityKind::Tasks),
        },
        recommendations: findings
            .iter()
            .filter_map(|finding| {
                finding.suggestion.as_ref().map(|suggestion| Recommendation {
                    entity: finding.entity,
                    field: finding.field,
                    issue: finding.message.clone(),
                    recommendation: suggestion.clone(),
                })
            })
            .collect(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageMetadata {
    #[serde(rename = "exportedAt")]
    pub exported_at: DateTime<Utc>,
    pub version: &'static str,
    pub source: &'static str,
}

/// The single-file package bundling data, configuration, and report.
#[derive(Debug, Clone, Serialize)]
pub struct ExportPackage {
    pub data: DataSet,
    pub configuration: RulesConfig,
    pub validation: ValidationReport,
    pub metadata: PackageMetadata,
}

/// Bundle everything into one payload. Gated on zero errors like the data
/// files it contains.
pub fn export_package(
    data: &DataSet,
    rules: &[Rule],
    priorities: &[Priority],
    findings: &[Finding],
    exported_at: DateTime<Utc>,
) -> Result<ExportPackage, ExportError> {
    ensure_exportable(findings)?;

    Ok(ExportPackage {
        data: data.clone(),
        configuration: rules_config(data, rules, priorities, findings, exported_at)?,
        validation: validation_report(findings, exported_at),
        metadata: PackageMetadata {
            exported_at,
            version: CONFIG_VERSION,
            source: "Data Alchemist Configurator",
        },
    })
}

/// Write one cleaned entity collection as CSV. Gated on zero errors.
///
/// List-valued fields are joined with commas inside a single cell, the same
/// shape the ingest side parses back out.
pub fn write_entity_csv<W: Write>(
    writer: W,
    data: &DataSet,
    entity: EntityKind,
    findings: &[Finding],
) -> Result<(), ExportError> {
    ensure_exportable(findings)?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    let result = match entity {
        EntityKind::Clients => write_clients(&mut csv_writer, data),
        EntityKind::Workers => write_workers(&mut csv_writer, data),
        EntityKind::Tasks => write_tasks(&mut csv_writer, data),
    };
    result.map_err(|source| ExportError::Csv { entity, source })
}

fn join_strings(values: &[String]) -> String {
    values.join(",")
}

fn join_numbers(values: &[i64]) -> String {
    values
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn write_clients<W: Write>(writer: &mut csv::Writer<W>, data: &DataSet) -> Result<(), csv::Error> {
    writer.write_record([
        "ClientID",
        "ClientName",
        "PriorityLevel",
        "RequestedTaskIDs",
        "GroupTag",
        "AttributesJSON",
    ])?;
    for client in &data.clients {
        writer.write_record([
            client.client_id.as_str(),
            client.client_name.as_str(),
            &client.priority_level.to_string(),
            &join_strings(&client.requested_task_ids),
            client.group_tag.as_str(),
            client.attributes_json.as_str(),
        ])?;
    }
    writer.flush().map_err(csv::Error::from)
}

fn write_workers<W: Write>(writer: &mut csv::Writer<W>, data: &DataSet) -> Result<(), csv::Error> {
    writer.write_record([
        "WorkerID",
        "WorkerName",
        "Skills",
        "AvailableSlots",
        "MaxLoadPerPhase",
        "WorkerGroup",
        "QualificationLevel",
    ])?;
    for worker in &data.workers {
        writer.write_record([
            worker.worker_id.as_str(),
            worker.worker_name.as_str(),
            &join_strings(&worker.skills),
            &join_numbers(&worker.available_slots),
            &worker.max_load_per_phase.to_string(),
            worker.worker_group.as_str(),
            &worker.qualification_level.to_string(),
        ])?;
    }
    writer.flush().map_err(csv::Error::from)
}

fn write_tasks<W: Write>(writer: &mut csv::Writer<W>, data: &DataSet) -> Result<(), csv::Error> {
    writer.write_record([
        "TaskID",
        "TaskName",
        "Category",
        "Duration",
        "RequiredSkills",
        "PreferredPhases",
        "MaxConcurrent",
    ])?;
    for task in &data.tasks {
        writer.write_record([
            task.task_id.as_str(),
            task.task_name.as_str(),
            task.category.as_str(),
            &task.duration.to_string(),
            &join_strings(&task.required_skills),
            &join_numbers(&task.preferred_phases),
            &task.max_concurrent.to_string(),
        ])?;
    }
    writer.flush().map_err(csv::Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::domain::{Client, FindingKind, ProposedValue, Severity};
    use crate::engine::rules::default_priorities;

    fn error_finding() -> Finding {
        Finding {
            id: "client-0-id".to_string(),
            kind: FindingKind::Error,
            severity: Severity::Critical,
            entity: EntityKind::Clients,
            row_index: 0,
            field: "ClientID",
            message: "Client ID is required".to_string(),
            suggestion: Some("Generate ID: C001".to_string()),
            proposed: Some(ProposedValue::Text("C001".to_string())),
            auto_fixable: true,
        }
    }

    #[test]
    fn errors_block_data_export() {
        let data = DataSet::default();
        let findings = vec![error_finding()];
        let mut buffer = Vec::new();

        let result = write_entity_csv(&mut buffer, &data, EntityKind::Clients, &findings);
        assert!(matches!(
            result,
            Err(ExportError::BlockedByErrors { errors: 1 })
        ));
    }

    #[test]
    fn warnings_do_not_block_export() {
        let mut warning = error_finding();
        warning.kind = FindingKind::Warning;

        let data = DataSet {
            clients: vec![Client {
                client_id: "C001".to_string(),
                ..Client::default()
            }],
            ..DataSet::default()
        };
        let mut buffer = Vec::new();

        write_entity_csv(&mut buffer, &data, EntityKind::Clients, &[warning])
            .expect("warnings never gate exports");
        let written = String::from_utf8(buffer).expect("utf8 csv");
        assert!(written.contains("C001"));
        assert!(written.starts_with("ClientID"));
    }

    #[test]
    fn rules_config_shape_matches_contract() {
        let data = DataSet::default();
        let now = Utc::now();
        let config = rules_config(&data, &[], &default_priorities(), &[], now)
            .expect("config builds");

        let json = serde_json::to_value(&config).expect("config serializes");
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["metadata"]["validationStatus"]["passed"], true);
        assert_eq!(json["priorities"]["priority-level"]["weight"], 0.3);
    }

    #[test]
    fn validation_report_groups_by_entity() {
        let report = validation_report(&[error_finding()], Utc::now());
        assert_eq!(report.summary.total_errors, 1);
        assert!(!report.summary.validation_passed);
        assert_eq!(report.errors_by_entity.clients.len(), 1);
        assert!(report.errors_by_entity.workers.is_empty());
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].field, "ClientID");
    }

    #[test]
    fn package_requires_clean_findings() {
        let data = DataSet::default();
        let result = export_package(
            &data,
            &[],
            &default_priorities(),
            &[error_finding()],
            Utc::now(),
        );
        assert!(matches!(result, Err(ExportError::BlockedByErrors { .. })));
    }
}
