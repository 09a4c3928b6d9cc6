use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A client requesting work, keyed by `ClientID`.
///
/// Field names keep the canonical PascalCase headers used by the upstream
/// spreadsheets so rows survive a serde round trip unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "ClientID", default)]
    pub client_id: String,
    #[serde(rename = "ClientName", default)]
    pub client_name: String,
    #[serde(rename = "PriorityLevel", default)]
    pub priority_level: i64,
    #[serde(rename = "RequestedTaskIDs", default)]
    pub requested_task_ids: Vec<String>,
    #[serde(rename = "GroupTag", default)]
    pub group_tag: String,
    #[serde(rename = "AttributesJSON", default)]
    pub attributes_json: String,
}

/// A worker with per-phase availability and capacity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    #[serde(rename = "WorkerID", default)]
    pub worker_id: String,
    #[serde(rename = "WorkerName", default)]
    pub worker_name: String,
    #[serde(rename = "Skills", default)]
    pub skills: Vec<String>,
    #[serde(rename = "AvailableSlots", default)]
    pub available_slots: Vec<i64>,
    #[serde(rename = "MaxLoadPerPhase", default)]
    pub max_load_per_phase: i64,
    #[serde(rename = "WorkerGroup", default)]
    pub worker_group: String,
    #[serde(rename = "QualificationLevel", default)]
    pub qualification_level: i64,
}

impl Worker {
    /// Capacity contributed to the pool: max load across every available
    /// phase.
    pub fn capacity(&self) -> i64 {
        self.max_load_per_phase.max(0) * self.available_slots.len() as i64
    }
}

/// A unit of schedulable work expressed in phases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "TaskID", default)]
    pub task_id: String,
    #[serde(rename = "TaskName", default)]
    pub task_name: String,
    #[serde(rename = "Category", default)]
    pub category: String,
    #[serde(rename = "Duration", default)]
    pub duration: i64,
    #[serde(rename = "RequiredSkills", default)]
    pub required_skills: Vec<String>,
    #[serde(rename = "PreferredPhases", default)]
    pub preferred_phases: Vec<i64>,
    #[serde(rename = "MaxConcurrent", default)]
    pub max_concurrent: i64,
}

/// The three entity collections handed to every engine function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSet {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub workers: Vec<Worker>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl DataSet {
    pub fn total_records(&self) -> usize {
        self.clients.len() + self.workers.len() + self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_records() == 0
    }

    /// Distinct skills required by at least one task.
    pub fn required_skills(&self) -> BTreeSet<&str> {
        self.tasks
            .iter()
            .flat_map(|task| task.required_skills.iter())
            .map(String::as_str)
            .collect()
    }

    /// Distinct skills offered by at least one worker.
    pub fn offered_skills(&self) -> BTreeSet<&str> {
        self.workers
            .iter()
            .flat_map(|worker| worker.skills.iter())
            .map(String::as_str)
            .collect()
    }

    /// Total worker capacity in task-units across all phases.
    pub fn total_capacity(&self) -> i64 {
        self.workers.iter().map(Worker::capacity).sum()
    }

    /// Total demand: phases consumed by every task.
    pub fn total_demand(&self) -> i64 {
        self.tasks.iter().map(|task| task.duration.max(0)).sum()
    }
}

/// Which collection a finding points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Clients,
    Workers,
    Tasks,
}

impl EntityKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Workers => "workers",
            Self::Tasks => "tasks",
        }
    }

    /// Prefix used by the generated-id convention (`C001`, `W001`, `T001`).
    pub const fn id_prefix(self) -> char {
        match self {
            Self::Clients => 'C',
            Self::Workers => 'W',
            Self::Tasks => 'T',
        }
    }
}

/// Deterministic replacement id for a row missing its identifier.
pub fn generated_id(entity: EntityKind, row_index: usize) -> String {
    format!("{}{:03}", entity.id_prefix(), row_index + 1)
}

/// Drives export gating: only `Error` blocks a data export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    Error,
    Warning,
    Info,
}

impl FindingKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// Drives UI ordering and emphasis only; export gating ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Machine-readable remediation value attached next to the human-readable
/// suggestion so the auto-fixer never parses prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ProposedValue {
    Text(String),
    Int(i64),
    List(Vec<String>),
}

/// One reported validation issue tied to a specific entity row and field.
///
/// Findings are a derived snapshot of the collections at validation time;
/// `row_index` is only meaningful until the next validation pass replaces
/// the set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub id: String,
    pub kind: FindingKind,
    pub severity: Severity,
    pub entity: EntityKind,
    #[serde(rename = "rowIndex")]
    pub row_index: usize,
    pub field: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed: Option<ProposedValue>,
    #[serde(rename = "autoFixable")]
    pub auto_fixable: bool,
}

impl Finding {
    pub fn is_error(&self) -> bool {
        self.kind == FindingKind::Error
    }

    pub fn is_warning(&self) -> bool {
        self.kind == FindingKind::Warning
    }
}
