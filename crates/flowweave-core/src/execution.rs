//! Execution records, read-only from the editor's perspective.
//!
//! The backend runs automations and reports what happened; these types only
//! mirror that report. The `nodes_executed` order is the authoritative
//! execution order and is never re-sorted client-side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::TriggerType;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl ExecutionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Completed | ExecutionStatus::Failed | ExecutionStatus::Cancelled
        )
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExecutionStatus::Pending => "Pending",
            ExecutionStatus::Running => "Running",
            ExecutionStatus::Completed => "Completed",
            ExecutionStatus::Failed => "Failed",
            ExecutionStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRunStatus {
    Success,
    Error,
    Skipped,
}

impl NodeRunStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            NodeRunStatus::Success => "✓",
            NodeRunStatus::Error => "✗",
            NodeRunStatus::Skipped => "⊘",
        }
    }
}

/// One entry of an execution trace.
///
/// `node_type` stays a raw tag string: traces may reference node types the
/// current build does not know about, and the viewer only displays the tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeExecution {
    pub node_id: Uuid,
    pub node_type: String,
    pub status: NodeRunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// One run of an automation, as persisted by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationExecution {
    pub id: Uuid,
    pub automation_id: Uuid,
    pub status: ExecutionStatus,
    pub trigger_type: TriggerType,
    #[serde(default)]
    pub test_mode: bool,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    /// Top-level failure, independent of per-node errors.
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub trigger_data: Value,
    /// Final variable bag at the end of the run.
    #[serde(default)]
    pub variables: Value,
    #[serde(default)]
    pub nodes_executed: Vec<NodeExecution>,
}
