//! Pure validation pass over an automation graph.
//!
//! Produces the issue list that gates activation, "Test", and "Run Now".
//! Validation never fails: malformed data yields an issue entry, not an error.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::{cron, Graph, NodeConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// `None` for graph-shape issues that are not tied to a single node.
    pub node_id: Option<Uuid>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn node_has_issues(&self, node_id: Uuid) -> bool {
        self.issues.iter().any(|i| i.node_id == Some(node_id))
    }

    pub fn issues_for(&self, node_id: Uuid) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.node_id == Some(node_id))
            .collect()
    }
}

/// Evaluate the graph against per-node required-field rules and graph-shape
/// rules. Pure and total; recomputed whenever the graph changes.
pub fn validate(graph: &Graph) -> ValidationReport {
    let mut issues = Vec::new();

    for node in &graph.nodes {
        validate_node(node.id, &node.label, &node.config, &mut issues);
    }

    validate_shape(graph, &mut issues);

    ValidationReport { issues }
}

fn validate_node(
    node_id: Uuid,
    label: &str,
    config: &NodeConfig,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut push = |message: String| {
        issues.push(ValidationIssue {
            node_id: Some(node_id),
            message,
        })
    };

    match config {
        NodeConfig::TriggerEvent(p) => {
            if p.event.is_empty() {
                push("Select an event to listen for".to_string());
            }
        }
        NodeConfig::TriggerSchedule(p) => {
            if let Err(e) = cron::parse(&p.cron) {
                push(format!("Invalid schedule: {e}"));
            }
        }
        NodeConfig::TriggerManual(_) => {
            if label.is_empty() {
                push("Give the trigger a label".to_string());
            }
        }
        NodeConfig::TriggerAiTool(p) => {
            if p.tool_name.is_empty() {
                push("Name the AI tool".to_string());
            }
        }
        NodeConfig::ActionHttp(p) => {
            if p.url.is_empty() {
                push("Enter a request URL".to_string());
            }
        }
        NodeConfig::ActionEmail(p) => {
            if p.to.is_empty() {
                push("Enter a recipient".to_string());
            }
            if p.subject.is_empty() {
                push("Enter a subject".to_string());
            }
        }
        NodeConfig::ActionUpdateLead(p) => {
            if p.fields.is_empty() {
                push("Add at least one field to update".to_string());
            }
        }
        NodeConfig::ActionTask(p) => {
            if p.title.is_empty() {
                push("Enter a task title".to_string());
            }
        }
        NodeConfig::ActionNotify(p) => {
            if p.message.is_empty() {
                push("Enter a notification message".to_string());
            }
        }
        NodeConfig::SupabaseQuery(p) => {
            if p.table.is_empty() {
                push("Choose a table".to_string());
            }
        }
        NodeConfig::LogicCondition(p) => {
            if p.field.is_empty() {
                push("Choose a field to compare".to_string());
            }
            if p.value.is_empty() && !p.operator.is_unary() {
                push("Enter a comparison value".to_string());
            }
        }
        NodeConfig::LogicDelay(p) => {
            if p.duration == 0 {
                push("Delay must be greater than zero".to_string());
            }
        }
        NodeConfig::LogicStop(_) => {}
        NodeConfig::AiGenerate(p) => {
            if p.prompt.is_empty() {
                push("Enter a prompt".to_string());
            }
        }
        NodeConfig::AiClassify(p) => {
            if p.categories.is_empty() {
                push("Add at least one category".to_string());
            }
        }
        NodeConfig::AiExtract(p) => {
            if p.fields.is_empty() {
                push("Add at least one field to extract".to_string());
            }
        }
        NodeConfig::TransformSetVariable(p) => {
            if p.name.is_empty() {
                push("Name the variable".to_string());
            }
        }
        // Legacy payloads may be perfectly valid under a schema this build
        // does not know; flagging them would make old automations permanently
        // unactivatable. The backend re-validates on its side.
        NodeConfig::Legacy { .. } => {}
    }
}

fn validate_shape(graph: &Graph, issues: &mut Vec<ValidationIssue>) {
    // A trigger must exist and be a root (no incoming edge).
    let targets: HashSet<Uuid> = graph.edges.iter().map(|e| e.target).collect();
    let has_trigger_root = graph
        .nodes
        .iter()
        .any(|n| n.config.is_trigger() && !targets.contains(&n.id));
    if !has_trigger_root {
        issues.push(ValidationIssue {
            node_id: None,
            message: "Add a trigger to start this automation".to_string(),
        });
    }

    if let Some(node_id) = find_cycle(graph) {
        issues.push(ValidationIssue {
            node_id: Some(node_id),
            message: "This step is part of a loop".to_string(),
        });
    }
}

/// DFS cycle detection over all edges. Returns a node on the first cycle
/// found, so the issue can be surfaced inline on the canvas.
fn find_cycle(graph: &Graph) -> Option<Uuid> {
    let mut outgoing: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for edge in &graph.edges {
        outgoing.entry(edge.source).or_default().push(edge.target);
    }

    let mut done: HashSet<Uuid> = HashSet::new();
    for node in &graph.nodes {
        if done.contains(&node.id) {
            continue;
        }
        let mut on_path: HashSet<Uuid> = HashSet::new();
        // Stack of (node, next-child-index) frames.
        let mut stack: Vec<(Uuid, usize)> = vec![(node.id, 0)];
        on_path.insert(node.id);
        while let Some((current, child_idx)) = stack.pop() {
            let children = outgoing.get(&current).map(Vec::as_slice).unwrap_or(&[]);
            if let Some(&child) = children.get(child_idx) {
                stack.push((current, child_idx + 1));
                if on_path.contains(&child) {
                    return Some(child);
                }
                if !done.contains(&child) {
                    on_path.insert(child);
                    stack.push((child, 0));
                }
            } else {
                on_path.remove(&current);
                done.insert(current);
            }
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        AiClassifyParams, AutomationEdge, AutomationNode, ConditionOperator, ConditionParams,
        EmailActionParams, EventTriggerParams, HttpActionParams, ManualTriggerParams, Position,
        ScheduleTriggerParams,
    };

    fn node(config: NodeConfig) -> AutomationNode {
        AutomationNode::new(config, Position::default())
    }

    fn graph_of(nodes: Vec<AutomationNode>) -> Graph {
        Graph {
            nodes,
            edges: Vec::new(),
        }
    }

    #[test]
    fn empty_graph_needs_a_trigger() {
        let report = validate(&Graph::default());
        assert_eq!(report.issue_count(), 1);
        assert_eq!(report.issues[0].node_id, None);
    }

    #[test]
    fn trigger_behind_an_edge_is_not_a_root() {
        let mut graph = graph_of(vec![
            node(NodeConfig::TriggerEvent(EventTriggerParams {
                event: "lead.created".to_string(),
            })),
            node(NodeConfig::TriggerManual(ManualTriggerParams::default())),
        ]);
        let (a, b) = (graph.nodes[0].id, graph.nodes[1].id);
        // Both triggers have incoming edges: no root remains.
        graph.edges.push(AutomationEdge::new(a, b, None));
        graph.edges.push(AutomationEdge::new(b, a, None));

        let report = validate(&graph);
        assert!(report
            .issues
            .iter()
            .any(|i| i.node_id.is_none() && i.message.contains("trigger")));
    }

    #[test]
    fn http_action_requires_url() {
        let graph = graph_of(vec![
            node(NodeConfig::TriggerManual(ManualTriggerParams::default())),
            node(NodeConfig::ActionHttp(HttpActionParams::default())),
        ]);
        let action_id = graph.nodes[1].id;

        let report = validate(&graph);
        assert!(report.node_has_issues(action_id));
        assert_eq!(report.issues_for(action_id).len(), 1);
    }

    #[test]
    fn email_reports_each_missing_field() {
        let graph = graph_of(vec![
            node(NodeConfig::TriggerManual(ManualTriggerParams::default())),
            node(NodeConfig::ActionEmail(EmailActionParams::default())),
        ]);
        let email_id = graph.nodes[1].id;
        assert_eq!(validate(&graph).issues_for(email_id).len(), 2);
    }

    #[test]
    fn unary_condition_operator_allows_empty_value() {
        let mut graph = graph_of(vec![
            node(NodeConfig::TriggerManual(ManualTriggerParams::default())),
            node(NodeConfig::LogicCondition(ConditionParams {
                field: "email".to_string(),
                operator: ConditionOperator::IsEmpty,
                value: String::new(),
            })),
        ]);
        let cond_id = graph.nodes[1].id;
        assert!(!validate(&graph).node_has_issues(cond_id));

        // Same shape with a binary operator needs a value.
        if let NodeConfig::LogicCondition(p) = &mut graph.nodes[1].config {
            p.operator = ConditionOperator::Equals;
        }
        assert!(validate(&graph).node_has_issues(cond_id));
    }

    #[test]
    fn malformed_cron_is_an_issue_not_a_panic() {
        let graph = graph_of(vec![node(NodeConfig::TriggerSchedule(
            ScheduleTriggerParams {
                cron: "0 9 * *".to_string(),
                timezone: "UTC".to_string(),
            },
        ))]);
        let id = graph.nodes[0].id;
        let report = validate(&graph);
        assert!(report.node_has_issues(id));
        assert!(report.issues_for(id)[0].message.contains("Invalid schedule"));
    }

    #[test]
    fn filling_a_required_field_reduces_issue_count() {
        // Validation monotonicity: empty → 1 issue, filled → 0, cleared → 1.
        let mut graph = graph_of(vec![
            node(NodeConfig::TriggerManual(ManualTriggerParams::default())),
            node(NodeConfig::AiClassify(AiClassifyParams::default())),
        ]);
        let id = graph.nodes[1].id;
        let before = validate(&graph).issues_for(id).len();
        assert_eq!(before, 1);

        if let NodeConfig::AiClassify(p) = &mut graph.nodes[1].config {
            p.categories.push("sales".to_string());
        }
        assert_eq!(validate(&graph).issues_for(id).len(), 0);

        if let NodeConfig::AiClassify(p) = &mut graph.nodes[1].config {
            p.categories.clear();
        }
        assert_eq!(validate(&graph).issues_for(id).len(), 1);
    }

    #[test]
    fn cycle_is_flagged_on_a_cycle_node() {
        let mut graph = graph_of(vec![
            node(NodeConfig::TriggerManual(ManualTriggerParams::default())),
            node(NodeConfig::ActionHttp(HttpActionParams {
                url: "https://example.com".to_string(),
                ..Default::default()
            })),
            node(NodeConfig::ActionNotify(crate::NotifyActionParams {
                message: "hi".to_string(),
                channel: None,
            })),
        ]);
        let (t, a, b) = (graph.nodes[0].id, graph.nodes[1].id, graph.nodes[2].id);
        graph.edges.push(AutomationEdge::new(t, a, None));
        graph.edges.push(AutomationEdge::new(a, b, None));
        graph.edges.push(AutomationEdge::new(b, a, None));

        let report = validate(&graph);
        let cycle_issue = report
            .issues
            .iter()
            .find(|i| i.message.contains("loop"))
            .expect("cycle should be flagged");
        assert!(cycle_issue.node_id == Some(a) || cycle_issue.node_id == Some(b));
    }

    #[test]
    fn acyclic_diamond_is_not_a_cycle() {
        let mut graph = graph_of(vec![
            node(NodeConfig::TriggerManual(ManualTriggerParams::default())),
            node(NodeConfig::LogicStop(crate::StopParams::default())),
            node(NodeConfig::LogicStop(crate::StopParams::default())),
            node(NodeConfig::LogicStop(crate::StopParams::default())),
        ]);
        let ids: Vec<Uuid> = graph.nodes.iter().map(|n| n.id).collect();
        graph
            .edges
            .push(AutomationEdge::new(ids[0], ids[1], Some("true".into())));
        graph
            .edges
            .push(AutomationEdge::new(ids[0], ids[2], Some("false".into())));
        graph.edges.push(AutomationEdge::new(ids[1], ids[3], None));
        graph.edges.push(AutomationEdge::new(ids[2], ids[3], None));

        assert!(validate(&graph).is_valid());
    }
}
