//! Caller-owned session state.
//!
//! A [`Workspace`] bundles the entity collections with their derived
//! validation findings, the rule set, and prioritization weights. Every
//! mutation that can change validation outcomes revalidates immediately, so
//! the findings snapshot never lags the data. Interested parties subscribe
//! through [`WorkspaceObserver`] rather than the workspace pushing into any
//! shared global.

use crate::config::ScoringConfig;
use crate::engine::advisor::{self, ResourceForecast, RuleRecommendation};
use crate::engine::autofix;
use crate::engine::domain::{Client, DataSet, EntityKind, Finding, Task, Worker};
use crate::engine::insights::{self, Insight};
use crate::engine::rules::{default_priorities, Priority, Rule};
use crate::engine::scoring;
use crate::engine::search::{KeywordSearch, SearchResults, SearchStrategy};
use crate::engine::validation;
use tracing::debug;

/// Notification about a state transition inside a [`Workspace`].
#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceEvent {
    /// A collection was replaced or a row edited, and findings refreshed.
    DataChanged {
        entity: EntityKind,
        findings: usize,
    },
    /// Auto-fix ran; carries the applied finding ids.
    FixesApplied { applied: Vec<String> },
    /// The rule set changed.
    RulesChanged { total: usize },
    /// A priority weight changed.
    PriorityChanged { id: String, weight: f64 },
}

/// Receives [`WorkspaceEvent`]s synchronously as they happen.
pub trait WorkspaceObserver: Send {
    fn notify(&self, event: &WorkspaceEvent);
}

/// Session state for one set of uploaded collections.
pub struct Workspace {
    data: DataSet,
    findings: Vec<Finding>,
    rules: Vec<Rule>,
    priorities: Vec<Priority>,
    scoring: ScoringConfig,
    observers: Vec<Box<dyn WorkspaceObserver>>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("data", &self.data)
            .field("findings", &self.findings.len())
            .field("rules", &self.rules.len())
            .field("priorities", &self.priorities.len())
            .finish()
    }
}

impl Workspace {
    pub fn new(scoring: ScoringConfig) -> Self {
        Self {
            data: DataSet::default(),
            findings: Vec::new(),
            rules: Vec::new(),
            priorities: default_priorities(),
            scoring,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn WorkspaceObserver>) {
        self.observers.push(observer);
    }

    fn emit(&self, event: WorkspaceEvent) {
        for observer in &self.observers {
            observer.notify(&event);
        }
    }

    pub fn data(&self) -> &DataSet {
        &self.data
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn priorities(&self) -> &[Priority] {
        &self.priorities
    }

    fn revalidate(&mut self) {
        self.findings = validation::validate(&self.data);
        debug!(findings = self.findings.len(), "validation pass complete");
    }

    fn data_changed(&mut self, entity: EntityKind) {
        self.revalidate();
        self.emit(WorkspaceEvent::DataChanged {
            entity,
            findings: self.findings.len(),
        });
    }

    pub fn replace_clients(&mut self, clients: Vec<Client>) {
        self.data.clients = clients;
        self.data_changed(EntityKind::Clients);
    }

    pub fn replace_workers(&mut self, workers: Vec<Worker>) {
        self.data.workers = workers;
        self.data_changed(EntityKind::Workers);
    }

    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.data.tasks = tasks;
        self.data_changed(EntityKind::Tasks);
    }

    /// Edit one client row in place. Returns false when the index is out of
    /// range, leaving state untouched.
    pub fn edit_client(&mut self, index: usize, edit: impl FnOnce(&mut Client)) -> bool {
        match self.data.clients.get_mut(index) {
            Some(client) => {
                edit(client);
                self.data_changed(EntityKind::Clients);
                true
            }
            None => false,
        }
    }

    pub fn edit_worker(&mut self, index: usize, edit: impl FnOnce(&mut Worker)) -> bool {
        match self.data.workers.get_mut(index) {
            Some(worker) => {
                edit(worker);
                self.data_changed(EntityKind::Workers);
                true
            }
            None => false,
        }
    }

    pub fn edit_task(&mut self, index: usize, edit: impl FnOnce(&mut Task)) -> bool {
        match self.data.tasks.get_mut(index) {
            Some(task) => {
                edit(task);
                self.data_changed(EntityKind::Tasks);
                true
            }
            None => false,
        }
    }

    /// Apply every auto-fixable finding, then revalidate. Returns the ids of
    /// the findings that were applied.
    pub fn apply_fixes(&mut self) -> Vec<String> {
        let outcome = autofix::auto_fix(&self.findings, &self.data);
        self.data = outcome.data;
        self.revalidate();
        self.emit(WorkspaceEvent::FixesApplied {
            applied: outcome.applied.clone(),
        });
        outcome.applied
    }

    pub fn quality_score(&self) -> f64 {
        scoring::quality_score(&self.data, &self.findings, &self.scoring)
    }

    pub fn insights(&self) -> Vec<Insight> {
        insights::generate_insights(&self.data)
    }

    pub fn resource_forecast(&self) -> ResourceForecast {
        advisor::predict_resource_needs(&self.data)
    }

    pub fn rule_suggestions(&self) -> Vec<String> {
        advisor::optimize_rules(&self.rules, &self.data)
    }

    pub fn rule_recommendations(&self) -> Vec<RuleRecommendation> {
        advisor::recommend_rules(&self.data)
    }

    pub fn search(&self, query: &str) -> SearchResults {
        KeywordSearch.search(query, &self.data)
    }

    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
        self.emit(WorkspaceEvent::RulesChanged {
            total: self.rules.len(),
        });
    }

    /// Replace the rule with a matching id. Returns false when no rule has
    /// that id.
    pub fn update_rule(&mut self, rule: Rule) -> bool {
        match self.rules.iter_mut().find(|existing| existing.id == rule.id) {
            Some(slot) => {
                *slot = rule;
                self.emit(WorkspaceEvent::RulesChanged {
                    total: self.rules.len(),
                });
                true
            }
            None => false,
        }
    }

    pub fn remove_rule(&mut self, id: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.id != id);
        let removed = self.rules.len() != before;
        if removed {
            self.emit(WorkspaceEvent::RulesChanged {
                total: self.rules.len(),
            });
        }
        removed
    }

    /// Set a priority's weight, clamped to `[0, 1]`. Returns false when the
    /// id is unknown.
    pub fn set_priority_weight(&mut self, id: &str, weight: f64) -> bool {
        match self.priorities.iter_mut().find(|priority| priority.id == id) {
            Some(priority) => {
                priority.weight = weight.clamp(0.0, 1.0);
                let weight = priority.weight;
                self.emit(WorkspaceEvent::PriorityChanged {
                    id: id.to_string(),
                    weight,
                });
                true
            }
            None => false,
        }
    }
}
