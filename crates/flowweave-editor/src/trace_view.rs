//! Read-only view model for one execution record.
//!
//! The trace is a historical record, not live control flow: rows render in
//! stored order, a failed node never stops the rows after it from rendering,
//! and nothing here can fail — malformed payloads degrade to raw text.

use flowweave_core::{AutomationExecution, ExecutionStatus, NodeRunStatus, TriggerType};
use serde_json::Value;
use uuid::Uuid;

/// Byte cap for output/error previews inside a trace row.
pub const PREVIEW_MAX_BYTES: usize = 600;

#[derive(Debug, Clone, PartialEq)]
pub struct TraceRow {
    /// 1-based position in the stored execution order.
    pub seq: usize,
    pub node_id: Uuid,
    /// Truncated id for display next to the type tag.
    pub short_id: String,
    pub node_type: String,
    pub status: NodeRunStatus,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub output_preview: Option<String>,
    /// Errors start expanded; everything else starts collapsed.
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionView {
    pub execution_id: Uuid,
    pub status: ExecutionStatus,
    pub test_mode: bool,
    pub trigger_type: TriggerType,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub duration_ms: Option<u64>,
    /// Top-level failure, rendered as its own alert block above the rows.
    pub error: Option<String>,
    /// Pretty-printed trigger payload, when non-empty.
    pub trigger_data: Option<String>,
    /// Pretty-printed final variable bag, when non-empty.
    pub variables: Option<String>,
    pub rows: Vec<TraceRow>,
}

impl ExecutionView {
    /// Build the view. Rows keep the stored order exactly; the viewer must
    /// not re-sort or re-group them.
    pub fn build(execution: &AutomationExecution) -> Self {
        let rows = execution
            .nodes_executed
            .iter()
            .enumerate()
            .map(|(i, node)| TraceRow {
                seq: i + 1,
                node_id: node.node_id,
                short_id: short_id(node.node_id),
                node_type: node.node_type.clone(),
                status: node.status,
                duration_ms: node.duration_ms,
                error: node
                    .error
                    .as_deref()
                    .map(|e| truncate_preview(e, PREVIEW_MAX_BYTES)),
                output_preview: node
                    .output
                    .as_ref()
                    .and_then(|output| payload_preview(output, PREVIEW_MAX_BYTES)),
                expanded: node.status == NodeRunStatus::Error,
            })
            .collect();

        Self {
            execution_id: execution.id,
            status: execution.status,
            test_mode: execution.test_mode,
            trigger_type: execution.trigger_type,
            started_at: execution.started_at,
            completed_at: execution.completed_at,
            duration_ms: execution.duration_ms,
            error: execution.error.clone(),
            trigger_data: payload_preview(&execution.trigger_data, PREVIEW_MAX_BYTES * 2),
            variables: payload_preview(&execution.variables, PREVIEW_MAX_BYTES * 2),
            rows,
        }
    }

    /// True when there is nothing at all to show: no rows and no top-level
    /// error. The caller renders a neutral "no execution data" placeholder —
    /// the same rendering whether the backend has not flushed a trace yet or
    /// the run genuinely produced zero node results.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.error.is_none()
    }

    pub fn toggle_row(&mut self, seq: usize) {
        if let Some(row) = self.rows.iter_mut().find(|r| r.seq == seq) {
            row.expanded = !row.expanded;
        }
    }

    /// "2.3s" / "450ms" style duration for the header.
    pub fn duration_label(&self) -> Option<String> {
        self.duration_ms.map(|ms| {
            if ms >= 1000 {
                format!("{:.1}s", ms as f64 / 1000.0)
            } else {
                format!("{ms}ms")
            }
        })
    }
}

fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// Structured payloads pretty-print; plain strings render raw; null and empty
/// containers render nothing.
fn payload_preview(value: &Value, max_bytes: usize) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::Object(map) if map.is_empty() => return None,
        Value::Array(items) if items.is_empty() => return None,
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    };
    Some(truncate_preview(&text, max_bytes))
}

/// Truncate to a byte cap, snapping to a char boundary.
fn truncate_preview(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let end = text
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= max_bytes)
        .last()
        .unwrap_or(0);
    format!("{}…[truncated, {} bytes total]", &text[..end], text.len())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use flowweave_core::NodeExecution;
    use serde_json::json;

    fn entry(node_type: &str, status: NodeRunStatus) -> NodeExecution {
        NodeExecution {
            node_id: Uuid::new_v4(),
            node_type: node_type.to_string(),
            status,
            output: None,
            error: if status == NodeRunStatus::Error {
                Some("boom".to_string())
            } else {
                None
            },
            duration_ms: 12,
            timestamp: Utc::now(),
        }
    }

    fn execution_with(nodes: Vec<NodeExecution>) -> AutomationExecution {
        AutomationExecution {
            id: Uuid::new_v4(),
            automation_id: Uuid::new_v4(),
            status: ExecutionStatus::Completed,
            trigger_type: TriggerType::Event,
            test_mode: false,
            started_at: Utc::now(),
            completed_at: Some(Utc::now()),
            duration_ms: Some(36),
            error: None,
            trigger_data: Value::Null,
            variables: Value::Null,
            nodes_executed: nodes,
        }
    }

    #[test]
    fn rows_keep_stored_order_and_error_rows_start_expanded() {
        let execution = execution_with(vec![
            entry("trigger-event", NodeRunStatus::Success),
            entry("action-http", NodeRunStatus::Error),
            entry("action-notify", NodeRunStatus::Skipped),
        ]);

        let view = ExecutionView::build(&execution);
        assert_eq!(view.rows.len(), 3);
        assert_eq!(
            view.rows.iter().map(|r| r.seq).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(view.rows[0].node_type, "trigger-event");
        assert_eq!(view.rows[1].node_type, "action-http");
        assert_eq!(view.rows[2].node_type, "action-notify");

        assert!(!view.rows[0].expanded);
        assert!(view.rows[1].expanded);
        assert!(!view.rows[2].expanded);
        assert_eq!(view.rows[1].error.as_deref(), Some("boom"));
    }

    #[test]
    fn empty_trace_without_error_is_the_placeholder_state() {
        let view = ExecutionView::build(&execution_with(Vec::new()));
        assert!(view.is_empty());
    }

    #[test]
    fn top_level_error_is_not_the_empty_state() {
        let mut execution = execution_with(Vec::new());
        execution.error = Some("automation engine unavailable".to_string());
        let view = ExecutionView::build(&execution);
        assert!(!view.is_empty());
        assert!(view.error.is_some());
    }

    #[test]
    fn string_output_renders_raw_and_objects_pretty() {
        let mut nodes = vec![
            entry("ai-generate", NodeRunStatus::Success),
            entry("action-http", NodeRunStatus::Success),
        ];
        nodes[0].output = Some(Value::String("plain text answer".to_string()));
        nodes[1].output = Some(json!({ "status": 200 }));

        let view = ExecutionView::build(&execution_with(nodes));
        assert_eq!(
            view.rows[0].output_preview.as_deref(),
            Some("plain text answer")
        );
        let pretty = view.rows[1].output_preview.as_deref().unwrap();
        assert!(pretty.contains("\"status\": 200"));
    }

    #[test]
    fn long_output_is_truncated_on_a_char_boundary() {
        let mut nodes = vec![entry("ai-generate", NodeRunStatus::Success)];
        nodes[0].output = Some(Value::String("é".repeat(PREVIEW_MAX_BYTES)));

        let view = ExecutionView::build(&execution_with(nodes));
        let preview = view.rows[0].output_preview.as_deref().unwrap();
        assert!(preview.contains("[truncated"));
        // Must still be valid UTF-8 to exist as a &str; also check the cap.
        assert!(preview.len() < PREVIEW_MAX_BYTES + 64);
    }

    #[test]
    fn empty_payload_sections_are_omitted() {
        let mut execution = execution_with(Vec::new());
        execution.trigger_data = json!({});
        execution.variables = json!({ "lead": "l-1" });

        let view = ExecutionView::build(&execution);
        assert!(view.trigger_data.is_none());
        assert!(view.variables.as_deref().unwrap().contains("lead"));
    }

    #[test]
    fn toggle_flips_default_state() {
        let execution = execution_with(vec![entry("action-http", NodeRunStatus::Success)]);
        let mut view = ExecutionView::build(&execution);
        assert!(!view.rows[0].expanded);
        view.toggle_row(1);
        assert!(view.rows[0].expanded);
    }

    #[test]
    fn short_id_is_eight_chars() {
        let execution = execution_with(vec![entry("action-http", NodeRunStatus::Success)]);
        let view = ExecutionView::build(&execution);
        assert_eq!(view.rows[0].short_id.len(), 8);
    }
}
