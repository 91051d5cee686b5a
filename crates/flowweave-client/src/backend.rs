use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use flowweave_core::{Automation, AutomationExecution, AutomationStatus, Graph, TriggerType};

/// Partial update for an automation. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct AutomationPatch {
    pub name: Option<String>,
    pub status: Option<AutomationStatus>,
    pub enabled: Option<bool>,
    pub graph: Option<Graph>,
}

impl AutomationPatch {
    pub fn graph(graph: Graph) -> Self {
        Self {
            graph: Some(graph),
            ..Default::default()
        }
    }

    pub fn status(status: AutomationStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn apply_to(&self, automation: &mut Automation) {
        if let Some(name) = &self.name {
            automation.name = name.clone();
        }
        if let Some(status) = self.status {
            automation.status = status;
        }
        if let Some(enabled) = self.enabled {
            automation.enabled = enabled;
        }
        if let Some(graph) = &self.graph {
            automation.graph = graph.clone();
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TriggerRequest {
    pub trigger_data: Value,
    pub test_mode: bool,
}

/// The backend collaborator contract (spec'd transport-agnostic; a real
/// deployment binds this to HTTP/RPC plus a realtime channel).
#[async_trait]
pub trait AutomationBackend: Send + Sync {
    /// Create an automation, optionally seeded from a template slug.
    async fn create_automation(
        &self,
        name: &str,
        trigger_type: TriggerType,
        template: Option<&str>,
    ) -> Result<Automation>;

    /// Apply a partial update (graph save, status or enabled toggle) and
    /// return the committed copy.
    async fn update_automation(&self, id: Uuid, patch: AutomationPatch) -> Result<Automation>;

    /// Idempotent delete; deleting an unknown id succeeds.
    async fn delete_automation(&self, id: Uuid) -> Result<()>;

    /// Executions for one automation, newest first.
    async fn list_executions(&self, automation_id: Uuid) -> Result<Vec<AutomationExecution>>;

    /// Fire an execution and return its id without awaiting completion.
    async fn trigger_execution(
        &self,
        automation_id: Uuid,
        request: TriggerRequest,
    ) -> Result<Uuid>;

    /// Fetch one execution; callers poll this while the status is not
    /// terminal.
    async fn get_execution(&self, execution_id: Uuid) -> Result<AutomationExecution>;
}
