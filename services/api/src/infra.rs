use data_alchemist::workspace::{Workspace, WorkspaceEvent, WorkspaceObserver};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) workspace: Arc<Mutex<Workspace>>,
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

impl AppState {
    pub(crate) fn workspace(&self) -> MutexGuard<'_, Workspace> {
        self.workspace.lock().expect("workspace mutex poisoned")
    }
}

/// Mirrors workspace transitions into the tracing stream so operators can
/// follow a session without polling the API.
pub(crate) struct TracingObserver;

impl WorkspaceObserver for TracingObserver {
    fn notify(&self, event: &WorkspaceEvent) {
        match event {
            WorkspaceEvent::DataChanged { entity, findings } => {
                info!(entity = entity.label(), findings, "collection replaced");
            }
            WorkspaceEvent::FixesApplied { applied } => {
                info!(count = applied.len(), "auto-fixes applied");
            }
            WorkspaceEvent::RulesChanged { total } => {
                info!(total, "rule set changed");
            }
            WorkspaceEvent::PriorityChanged { id, weight } => {
                info!(priority = id.as_str(), weight, "priority weight changed");
            }
        }
    }
}
