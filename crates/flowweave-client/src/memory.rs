//! In-memory [`AutomationBackend`] used by tests and the demo app.
//!
//! Runs are synthesized instantly: the graph is walked from its trigger root
//! and each node gets a plausible trace entry. Failure injection hooks let
//! tests exercise the save-error and failed-run paths without a network.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use flowweave_core::{
    template::Template, Automation, AutomationExecution, ExecutionStatus, NodeConfig,
    NodeExecution, NodeRunStatus, TriggerType,
};

use crate::{AutomationBackend, AutomationPatch, TriggerRequest};

#[derive(Default)]
pub struct MemoryBackend {
    automations: Mutex<HashMap<Uuid, Automation>>,
    /// Insertion-ordered; `list_executions` reverses for newest-first.
    executions: Mutex<Vec<AutomationExecution>>,
    fail_next_update: Mutex<Option<String>>,
    fail_next_run: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `update_automation` call fail with `message`.
    pub fn inject_update_failure(&self, message: impl Into<String>) {
        *self.fail_next_update.lock().unwrap() = Some(message.into());
    }

    /// Make the next triggered run fail with `message` on its first
    /// non-trigger node.
    pub fn inject_run_failure(&self, message: impl Into<String>) {
        *self.fail_next_run.lock().unwrap() = Some(message.into());
    }

    fn synthesize_execution(
        automation: &Automation,
        request: &TriggerRequest,
        failure: Option<String>,
    ) -> AutomationExecution {
        let started_at = Utc::now();
        let order = automation.graph.walk_order();

        let mut nodes_executed = Vec::with_capacity(order.len());
        let mut variables = serde_json::Map::new();
        let mut stopped = false;
        let mut failed = false;
        let mut top_error = None;

        for node_id in order {
            let Some(node) = automation.graph.find_node(node_id) else {
                continue;
            };

            let mut entry = NodeExecution {
                node_id,
                node_type: node.config.tag().to_string(),
                status: NodeRunStatus::Success,
                output: None,
                error: None,
                duration_ms: 2,
                timestamp: Utc::now(),
            };

            if node.disabled || stopped || failed {
                entry.status = NodeRunStatus::Skipped;
                entry.duration_ms = 0;
                nodes_executed.push(entry);
                continue;
            }

            if let Some(message) = &failure
                && !node.config.is_trigger()
            {
                entry.status = NodeRunStatus::Error;
                entry.error = Some(message.clone());
                top_error = Some(message.clone());
                failed = true;
                nodes_executed.push(entry);
                continue;
            }

            entry.output = Some(match &node.config {
                NodeConfig::TriggerEvent(_)
                | NodeConfig::TriggerSchedule(_)
                | NodeConfig::TriggerManual(_)
                | NodeConfig::TriggerAiTool(_) => request.trigger_data.clone(),
                NodeConfig::AiGenerate(p) => {
                    let text = format!("[generated for: {}]", p.prompt);
                    if let Some(var) = &p.output_variable {
                        variables.insert(var.clone(), Value::String(text.clone()));
                    }
                    json!({ "text": text })
                }
                NodeConfig::AiClassify(p) => {
                    json!({ "category": p.categories.first().cloned() })
                }
                NodeConfig::TransformSetVariable(p) => {
                    variables.insert(p.name.clone(), Value::String(p.value.clone()));
                    json!({ "set": p.name })
                }
                NodeConfig::LogicStop(_) => {
                    stopped = true;
                    json!({ "stopped": true })
                }
                _ => json!({ "ok": true }),
            });
            nodes_executed.push(entry);
        }

        let duration_ms: u64 = nodes_executed.iter().map(|n| n.duration_ms).sum();
        AutomationExecution {
            id: Uuid::new_v4(),
            automation_id: automation.id,
            status: if failed {
                ExecutionStatus::Failed
            } else {
                ExecutionStatus::Completed
            },
            trigger_type: automation.trigger_type,
            test_mode: request.test_mode,
            started_at,
            completed_at: Some(Utc::now()),
            duration_ms: Some(duration_ms),
            error: top_error,
            trigger_data: request.trigger_data.clone(),
            variables: Value::Object(variables),
            nodes_executed,
        }
    }
}

#[async_trait]
impl AutomationBackend for MemoryBackend {
    async fn create_automation(
        &self,
        name: &str,
        trigger_type: TriggerType,
        template: Option<&str>,
    ) -> Result<Automation> {
        let mut automation = Automation::new(name, trigger_type);
        if let Some(slug) = template {
            let template = Template::by_slug(slug)
                .ok_or_else(|| anyhow!("unknown template {slug:?}"))?;
            automation.graph = template.seed_graph();
        }
        tracing::debug!("created automation {} ({})", automation.name, automation.id);
        self.automations
            .lock()
            .unwrap()
            .insert(automation.id, automation.clone());
        Ok(automation)
    }

    async fn update_automation(&self, id: Uuid, patch: AutomationPatch) -> Result<Automation> {
        if let Some(message) = self.fail_next_update.lock().unwrap().take() {
            return Err(anyhow!(message));
        }
        let mut automations = self.automations.lock().unwrap();
        let automation = automations
            .get_mut(&id)
            .ok_or_else(|| anyhow!("automation {id} not found"))?;
        patch.apply_to(automation);
        automation.updated_at = Utc::now();
        Ok(automation.clone())
    }

    async fn delete_automation(&self, id: Uuid) -> Result<()> {
        self.automations.lock().unwrap().remove(&id);
        self.executions
            .lock()
            .unwrap()
            .retain(|e| e.automation_id != id);
        Ok(())
    }

    async fn list_executions(&self, automation_id: Uuid) -> Result<Vec<AutomationExecution>> {
        Ok(self
            .executions
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.automation_id == automation_id)
            .rev()
            .cloned()
            .collect())
    }

    async fn trigger_execution(
        &self,
        automation_id: Uuid,
        request: TriggerRequest,
    ) -> Result<Uuid> {
        let automation = self
            .automations
            .lock()
            .unwrap()
            .get(&automation_id)
            .cloned()
            .ok_or_else(|| anyhow!("automation {automation_id} not found"))?;

        let failure = self.fail_next_run.lock().unwrap().take();
        let execution = Self::synthesize_execution(&automation, &request, failure);
        let id = execution.id;
        tracing::debug!(
            "triggered execution {id} for {automation_id} (test_mode={})",
            request.test_mode
        );
        self.executions.lock().unwrap().push(execution);
        Ok(id)
    }

    async fn get_execution(&self, execution_id: Uuid) -> Result<AutomationExecution> {
        self.executions
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == execution_id)
            .cloned()
            .ok_or_else(|| anyhow!("execution {execution_id} not found"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use flowweave_core::AutomationStatus;

    #[tokio::test]
    async fn create_from_template_seeds_the_graph() {
        let backend = MemoryBackend::new();
        let automation = backend
            .create_automation("Leads", TriggerType::Event, Some("lead-management"))
            .await
            .unwrap();
        assert_eq!(automation.graph.nodes.len(), 2);
        assert_eq!(automation.status, AutomationStatus::Draft);
    }

    #[tokio::test]
    async fn unknown_template_is_an_error() {
        let backend = MemoryBackend::new();
        assert!(backend
            .create_automation("X", TriggerType::Manual, Some("no-such-template"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let backend = MemoryBackend::new();
        let automation = backend
            .create_automation("X", TriggerType::Manual, None)
            .await
            .unwrap();
        backend.delete_automation(automation.id).await.unwrap();
        // Second delete of the same id still succeeds.
        backend.delete_automation(automation.id).await.unwrap();
    }

    #[tokio::test]
    async fn triggered_run_traces_every_node_in_walk_order() {
        let backend = MemoryBackend::new();
        let automation = backend
            .create_automation("Triage", TriggerType::Event, Some("support-triage"))
            .await
            .unwrap();

        let execution_id = backend
            .trigger_execution(
                automation.id,
                TriggerRequest {
                    trigger_data: json!({ "conversation": { "id": 7 } }),
                    test_mode: true,
                },
            )
            .await
            .unwrap();

        let execution = backend.get_execution(execution_id).await.unwrap();
        assert_eq!(execution.status, ExecutionStatus::Completed);
        assert!(execution.test_mode);
        assert_eq!(execution.nodes_executed.len(), 3);

        let expected: Vec<Uuid> = automation.graph.walk_order();
        let traced: Vec<Uuid> = execution.nodes_executed.iter().map(|n| n.node_id).collect();
        assert_eq!(traced, expected);
    }

    #[tokio::test]
    async fn injected_failure_marks_node_and_execution() {
        let backend = MemoryBackend::new();
        let automation = backend
            .create_automation("Leads", TriggerType::Event, Some("lead-management"))
            .await
            .unwrap();

        backend.inject_run_failure("lead service unavailable");
        let execution_id = backend
            .trigger_execution(automation.id, TriggerRequest::default())
            .await
            .unwrap();

        let execution = backend.get_execution(execution_id).await.unwrap();
        assert_eq!(execution.status, ExecutionStatus::Failed);
        assert_eq!(execution.error.as_deref(), Some("lead service unavailable"));
        let statuses: Vec<NodeRunStatus> =
            execution.nodes_executed.iter().map(|n| n.status).collect();
        assert_eq!(statuses, vec![NodeRunStatus::Success, NodeRunStatus::Error]);
    }

    #[tokio::test]
    async fn list_executions_is_newest_first() {
        let backend = MemoryBackend::new();
        let automation = backend
            .create_automation("X", TriggerType::Manual, Some("welcome-email"))
            .await
            .unwrap();

        let first = backend
            .trigger_execution(automation.id, TriggerRequest::default())
            .await
            .unwrap();
        let second = backend
            .trigger_execution(automation.id, TriggerRequest::default())
            .await
            .unwrap();

        let listed = backend.list_executions(automation.id).await.unwrap();
        assert_eq!(listed[0].id, second);
        assert_eq!(listed[1].id, first);
    }
}
