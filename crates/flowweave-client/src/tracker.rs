use std::time::Duration;

use anyhow::Result;
use uuid::Uuid;

use flowweave_core::AutomationExecution;

use crate::AutomationBackend;

/// Client-side cache of the execution list for one automation.
///
/// Updates arrive out of band (poll or push) and may repeat; `apply` is
/// idempotent keyed by execution id. A later snapshot for a known id replaces
/// the earlier one wholesale — partial `nodes_executed` arrays are never
/// merged together.
#[derive(Debug, Default)]
pub struct ExecutionTracker {
    executions: Vec<AutomationExecution>,
}

impl ExecutionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list with a fresh newest-first listing.
    pub fn replace_all(&mut self, executions: Vec<AutomationExecution>) {
        self.executions = executions;
    }

    /// Apply one execution snapshot. Known ids are replaced in place; new
    /// ids are inserted at the front (they are by definition the newest).
    pub fn apply(&mut self, execution: AutomationExecution) {
        match self.executions.iter_mut().find(|e| e.id == execution.id) {
            Some(existing) => *existing = execution,
            None => self.executions.insert(0, execution),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<&AutomationExecution> {
        self.executions.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AutomationExecution> {
        self.executions.iter()
    }

    pub fn len(&self) -> usize {
        self.executions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executions.is_empty()
    }
}

/// Poll an execution until it reaches a terminal status.
///
/// There is no client-side cancellation of the backend run; callers that
/// lose interest just drop the future.
pub async fn watch_execution(
    backend: &dyn AutomationBackend,
    execution_id: Uuid,
    poll_every: Duration,
) -> Result<AutomationExecution> {
    loop {
        let execution = backend.get_execution(execution_id).await?;
        if execution.status.is_terminal() {
            return Ok(execution);
        }
        tracing::debug!(
            "execution {execution_id} still {:?}, polling again",
            execution.status
        );
        tokio::time::sleep(poll_every).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryBackend, TriggerRequest};
    use chrono::Utc;
    use flowweave_core::{ExecutionStatus, TriggerType};

    fn execution(id: Uuid, status: ExecutionStatus) -> AutomationExecution {
        AutomationExecution {
            id,
            automation_id: Uuid::new_v4(),
            status,
            trigger_type: TriggerType::Manual,
            test_mode: false,
            started_at: Utc::now(),
            completed_at: None,
            duration_ms: None,
            error: None,
            trigger_data: serde_json::Value::Null,
            variables: serde_json::Value::Null,
            nodes_executed: Vec::new(),
        }
    }

    #[test]
    fn apply_replaces_by_id_never_duplicates() {
        let mut tracker = ExecutionTracker::new();
        let id = Uuid::new_v4();

        tracker.apply(execution(id, ExecutionStatus::Running));
        // Later snapshot for the same id replaces, even if applied twice.
        tracker.apply(execution(id, ExecutionStatus::Completed));
        tracker.apply(execution(id, ExecutionStatus::Completed));

        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.get(id).unwrap().status, ExecutionStatus::Completed);
    }

    #[test]
    fn unknown_ids_insert_at_front() {
        let mut tracker = ExecutionTracker::new();
        let old = Uuid::new_v4();
        let new = Uuid::new_v4();

        tracker.apply(execution(old, ExecutionStatus::Completed));
        tracker.apply(execution(new, ExecutionStatus::Running));

        let ids: Vec<Uuid> = tracker.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![new, old]);
    }

    #[test]
    fn stale_partial_trace_is_discarded_on_replace() {
        let mut tracker = ExecutionTracker::new();
        let id = Uuid::new_v4();

        let mut partial = execution(id, ExecutionStatus::Running);
        partial.nodes_executed.push(flowweave_core::NodeExecution {
            node_id: Uuid::new_v4(),
            node_type: "trigger-manual".to_string(),
            status: flowweave_core::NodeRunStatus::Success,
            output: None,
            error: None,
            duration_ms: 1,
            timestamp: Utc::now(),
        });
        tracker.apply(partial);

        // Terminal snapshot arrives with an empty trace; it must win outright.
        tracker.apply(execution(id, ExecutionStatus::Failed));
        assert!(tracker.get(id).unwrap().nodes_executed.is_empty());
    }

    #[tokio::test]
    async fn watch_returns_terminal_execution() {
        let backend = MemoryBackend::new();
        let automation = backend
            .create_automation("X", TriggerType::Manual, Some("welcome-email"))
            .await
            .unwrap();
        let id = backend
            .trigger_execution(automation.id, TriggerRequest::default())
            .await
            .unwrap();

        let done = watch_execution(&backend, id, Duration::from_millis(5))
            .await
            .unwrap();
        assert!(done.status.is_terminal());
    }
}
