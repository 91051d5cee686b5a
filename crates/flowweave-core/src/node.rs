use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset applied when duplicating a node so the copy is visibly distinct.
    pub fn offset_for_duplicate(self) -> Self {
        Self {
            x: self.x + 32.0,
            y: self.y + 32.0,
        }
    }
}

// =============================================================================
// Node Type System
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeCategory {
    Trigger,
    Action,
    Logic,
    Ai,
    Transform,
}

impl NodeCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeCategory::Trigger => "Triggers",
            NodeCategory::Action => "Actions",
            NodeCategory::Logic => "Logic",
            NodeCategory::Ai => "AI",
            NodeCategory::Transform => "Transform",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NodeCategory::Trigger => "⚡",
            NodeCategory::Action => "▶",
            NodeCategory::Logic => "◆",
            NodeCategory::Ai => "✦",
            NodeCategory::Transform => "≡",
        }
    }
}

/// Type-specific configuration payload of a node.
///
/// The tag set is closed; payloads persisted by older schema versions with a
/// tag we no longer (or do not yet) know deserialize to [`NodeConfig::Legacy`]
/// carrying the raw JSON, so they render as an inert placeholder instead of
/// failing the whole graph decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeConfig {
    TriggerEvent(EventTriggerParams),
    TriggerSchedule(ScheduleTriggerParams),
    TriggerManual(ManualTriggerParams),
    TriggerAiTool(AiToolTriggerParams),
    ActionHttp(HttpActionParams),
    ActionEmail(EmailActionParams),
    ActionUpdateLead(UpdateLeadParams),
    ActionTask(TaskActionParams),
    ActionNotify(NotifyActionParams),
    #[serde(rename = "action-supabase")]
    SupabaseQuery(SupabaseActionParams),
    LogicCondition(ConditionParams),
    LogicDelay(DelayParams),
    LogicStop(StopParams),
    AiGenerate(AiGenerateParams),
    AiClassify(AiClassifyParams),
    AiExtract(AiExtractParams),
    TransformSetVariable(SetVariableParams),
    #[serde(skip)]
    Legacy { tag: String, raw: Value },
}

impl NodeConfig {
    /// Decode a raw payload, falling back to [`NodeConfig::Legacy`] when the
    /// tag is unknown or the shape does not match. Never fails.
    pub fn from_value(value: Value) -> Self {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        match serde_json::from_value::<NodeConfig>(value.clone()) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("Unknown node config tag {:?}: {}", tag, e);
                NodeConfig::Legacy { tag, raw: value }
            }
        }
    }

    /// The wire tag for this config.
    pub fn tag(&self) -> &str {
        match self {
            NodeConfig::TriggerEvent(_) => "trigger-event",
            NodeConfig::TriggerSchedule(_) => "trigger-schedule",
            NodeConfig::TriggerManual(_) => "trigger-manual",
            NodeConfig::TriggerAiTool(_) => "trigger-ai-tool",
            NodeConfig::ActionHttp(_) => "action-http",
            NodeConfig::ActionEmail(_) => "action-email",
            NodeConfig::ActionUpdateLead(_) => "action-update-lead",
            NodeConfig::ActionTask(_) => "action-task",
            NodeConfig::ActionNotify(_) => "action-notify",
            NodeConfig::SupabaseQuery(_) => "action-supabase",
            NodeConfig::LogicCondition(_) => "logic-condition",
            NodeConfig::LogicDelay(_) => "logic-delay",
            NodeConfig::LogicStop(_) => "logic-stop",
            NodeConfig::AiGenerate(_) => "ai-generate",
            NodeConfig::AiClassify(_) => "ai-classify",
            NodeConfig::AiExtract(_) => "ai-extract",
            NodeConfig::TransformSetVariable(_) => "transform-set-variable",
            NodeConfig::Legacy { tag, .. } => tag,
        }
    }

    pub fn category(&self) -> NodeCategory {
        match self {
            NodeConfig::TriggerEvent(_)
            | NodeConfig::TriggerSchedule(_)
            | NodeConfig::TriggerManual(_)
            | NodeConfig::TriggerAiTool(_) => NodeCategory::Trigger,
            NodeConfig::ActionHttp(_)
            | NodeConfig::ActionEmail(_)
            | NodeConfig::ActionUpdateLead(_)
            | NodeConfig::ActionTask(_)
            | NodeConfig::ActionNotify(_)
            | NodeConfig::SupabaseQuery(_) => NodeCategory::Action,
            NodeConfig::LogicCondition(_) | NodeConfig::LogicDelay(_) | NodeConfig::LogicStop(_) => {
                NodeCategory::Logic
            }
            NodeConfig::AiGenerate(_) | NodeConfig::AiClassify(_) | NodeConfig::AiExtract(_) => {
                NodeCategory::Ai
            }
            // Legacy payloads get a neutral slot in the palette-free Transform
            // bucket; they never appear in the palette itself.
            NodeConfig::TransformSetVariable(_) | NodeConfig::Legacy { .. } => {
                NodeCategory::Transform
            }
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            NodeConfig::TriggerEvent(_) => "Event Trigger",
            NodeConfig::TriggerSchedule(_) => "Schedule Trigger",
            NodeConfig::TriggerManual(_) => "Manual Trigger",
            NodeConfig::TriggerAiTool(_) => "AI Tool Trigger",
            NodeConfig::ActionHttp(_) => "HTTP Request",
            NodeConfig::ActionEmail(_) => "Send Email",
            NodeConfig::ActionUpdateLead(_) => "Update Lead",
            NodeConfig::ActionTask(_) => "Create Task",
            NodeConfig::ActionNotify(_) => "Notify Team",
            NodeConfig::SupabaseQuery(_) => "Database Query",
            NodeConfig::LogicCondition(_) => "Condition",
            NodeConfig::LogicDelay(_) => "Delay",
            NodeConfig::LogicStop(_) => "Stop",
            NodeConfig::AiGenerate(_) => "AI Generate",
            NodeConfig::AiClassify(_) => "AI Classify",
            NodeConfig::AiExtract(_) => "AI Extract",
            NodeConfig::TransformSetVariable(_) => "Set Variable",
            NodeConfig::Legacy { .. } => "Unknown Step",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NodeConfig::TriggerEvent(_) => "⚡",
            NodeConfig::TriggerSchedule(_) => "🕘",
            NodeConfig::TriggerManual(_) => "👆",
            NodeConfig::TriggerAiTool(_) => "🛠",
            NodeConfig::ActionHttp(_) => "🌐",
            NodeConfig::ActionEmail(_) => "✉",
            NodeConfig::ActionUpdateLead(_) => "👤",
            NodeConfig::ActionTask(_) => "📋",
            NodeConfig::ActionNotify(_) => "🔔",
            NodeConfig::SupabaseQuery(_) => "🗄",
            NodeConfig::LogicCondition(_) => "◆",
            NodeConfig::LogicDelay(_) => "⏳",
            NodeConfig::LogicStop(_) => "⏹",
            NodeConfig::AiGenerate(_) => "✨",
            NodeConfig::AiClassify(_) => "🏷",
            NodeConfig::AiExtract(_) => "🔎",
            NodeConfig::TransformSetVariable(_) => "≡",
            NodeConfig::Legacy { .. } => "❔",
        }
    }

    pub fn is_trigger(&self) -> bool {
        self.category() == NodeCategory::Trigger
    }

    /// One-line projection of the configuration, rendered inside the node body.
    pub fn summary(&self) -> String {
        fn or_placeholder(s: &str, placeholder: &str) -> String {
            if s.is_empty() {
                placeholder.to_string()
            } else {
                s.to_string()
            }
        }

        match self {
            NodeConfig::TriggerEvent(p) => or_placeholder(&p.event, "No event selected"),
            NodeConfig::TriggerSchedule(p) => crate::cron::humanize(&p.cron),
            NodeConfig::TriggerManual(_) => "Run manually".to_string(),
            NodeConfig::TriggerAiTool(p) => or_placeholder(&p.tool_name, "Unnamed tool"),
            NodeConfig::ActionHttp(p) => {
                if p.url.is_empty() {
                    "No URL set".to_string()
                } else {
                    format!("{} {}", p.method.as_str(), p.url)
                }
            }
            NodeConfig::ActionEmail(p) => {
                if p.to.is_empty() {
                    "No recipient".to_string()
                } else {
                    format!("To {}", p.to)
                }
            }
            NodeConfig::ActionUpdateLead(p) => format!("{} field(s)", p.fields.len()),
            NodeConfig::ActionTask(p) => or_placeholder(&p.title, "Untitled task"),
            NodeConfig::ActionNotify(p) => or_placeholder(&p.message, "No message"),
            NodeConfig::SupabaseQuery(p) => {
                if p.table.is_empty() {
                    "No table set".to_string()
                } else {
                    format!("{} {}", p.operation.as_str(), p.table)
                }
            }
            NodeConfig::LogicCondition(p) => {
                if p.field.is_empty() {
                    "No condition set".to_string()
                } else {
                    format!("{} {}", p.field, p.operator.as_str())
                }
            }
            NodeConfig::LogicDelay(p) => format!("Wait {} {}", p.duration, p.unit.as_str()),
            NodeConfig::LogicStop(_) => "End automation".to_string(),
            NodeConfig::AiGenerate(p) => or_placeholder(&p.prompt, "No prompt"),
            NodeConfig::AiClassify(p) => format!("{} categories", p.categories.len()),
            NodeConfig::AiExtract(p) => format!("{} field(s)", p.fields.len()),
            NodeConfig::TransformSetVariable(p) => or_placeholder(&p.name, "Unnamed variable"),
            NodeConfig::Legacy { tag, .. } => format!("Unknown step type: {tag}"),
        }
    }

    pub fn default_label(&self) -> String {
        self.display_name().to_string()
    }

    /// All known node types with default parameters, for the palette.
    pub fn all_defaults() -> Vec<NodeConfig> {
        vec![
            NodeConfig::TriggerEvent(EventTriggerParams::default()),
            NodeConfig::TriggerSchedule(ScheduleTriggerParams::default()),
            NodeConfig::TriggerManual(ManualTriggerParams::default()),
            NodeConfig::TriggerAiTool(AiToolTriggerParams::default()),
            NodeConfig::ActionHttp(HttpActionParams::default()),
            NodeConfig::ActionEmail(EmailActionParams::default()),
            NodeConfig::ActionUpdateLead(UpdateLeadParams::default()),
            NodeConfig::ActionTask(TaskActionParams::default()),
            NodeConfig::ActionNotify(NotifyActionParams::default()),
            NodeConfig::SupabaseQuery(SupabaseActionParams::default()),
            NodeConfig::LogicCondition(ConditionParams::default()),
            NodeConfig::LogicDelay(DelayParams::default()),
            NodeConfig::LogicStop(StopParams::default()),
            NodeConfig::AiGenerate(AiGenerateParams::default()),
            NodeConfig::AiClassify(AiClassifyParams::default()),
            NodeConfig::AiExtract(AiExtractParams::default()),
            NodeConfig::TransformSetVariable(SetVariableParams::default()),
        ]
    }
}

// =============================================================================
// Parameter structs
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventTriggerParams {
    /// Event selector, e.g. "lead.created".
    pub event: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTriggerParams {
    /// 5-field cron expression.
    pub cron: String,
    pub timezone: String,
}

impl Default for ScheduleTriggerParams {
    fn default() -> Self {
        Self {
            cron: "0 9 * * *".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualTriggerParams {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiToolTriggerParams {
    pub tool_name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpActionParams {
    pub url: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    #[serde(default)]
    pub body: Option<String>,
}

impl Default for HttpActionParams {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: HttpMethod::Get,
            headers: Vec::new(),
            body: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailActionParams {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateLeadParams {
    /// Field name → new value mappings applied to the lead record.
    pub fields: Vec<FieldMapping>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskActionParams {
    pub title: String,
    pub assignee: Option<String>,
    pub due_in_days: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotifyActionParams {
    pub message: String,
    pub channel: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupabaseActionParams {
    pub table: String,
    pub operation: TableOperation,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableOperation {
    #[default]
    Insert,
    Update,
    Upsert,
    Delete,
}

impl TableOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableOperation::Insert => "insert",
            TableOperation::Update => "update",
            TableOperation::Upsert => "upsert",
            TableOperation::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionParams {
    pub field: String,
    pub operator: ConditionOperator,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    #[default]
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    Contains,
    IsEmpty,
    IsNotEmpty,
}

impl ConditionOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::NotEquals => "not equals",
            ConditionOperator::GreaterThan => "greater than",
            ConditionOperator::LessThan => "less than",
            ConditionOperator::Contains => "contains",
            ConditionOperator::IsEmpty => "is empty",
            ConditionOperator::IsNotEmpty => "is not empty",
        }
    }

    /// Operators that test presence alone; the comparison value is ignored.
    pub fn is_unary(&self) -> bool {
        matches!(self, ConditionOperator::IsEmpty | ConditionOperator::IsNotEmpty)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayParams {
    pub duration: u32,
    pub unit: DelayUnit,
}

impl Default for DelayParams {
    fn default() -> Self {
        Self {
            duration: 5,
            unit: DelayUnit::Minutes,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelayUnit {
    Seconds,
    #[default]
    Minutes,
    Hours,
    Days,
}

impl DelayUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DelayUnit::Seconds => "seconds",
            DelayUnit::Minutes => "minutes",
            DelayUnit::Hours => "hours",
            DelayUnit::Days => "days",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StopParams {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiGenerateParams {
    pub prompt: String,
    pub output_variable: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiClassifyParams {
    pub input: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiExtractParams {
    pub input: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetVariableParams {
    pub name: String,
    pub value: String,
}

// =============================================================================
// Nodes, edges, graph
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationNode {
    pub id: Uuid,
    pub label: String,
    #[serde(default)]
    pub disabled: bool,
    pub position: Position,
    #[serde(with = "config_serde")]
    pub config: NodeConfig,
    /// Transient UI state, not persisted.
    #[serde(skip)]
    pub selected: bool,
}

impl AutomationNode {
    pub fn new(config: NodeConfig, position: Position) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: config.default_label(),
            disabled: false,
            position,
            config,
            selected: false,
        }
    }
}

/// Serde bridge for the `config` field: known variants use the derived tagged
/// representation; `Legacy` writes its raw JSON back out unchanged, and any
/// payload that fails the tagged decode becomes `Legacy` instead of an error.
mod config_serde {
    use super::NodeConfig;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(config: &NodeConfig, serializer: S) -> Result<S::Ok, S::Error> {
        match config {
            NodeConfig::Legacy { raw, .. } => raw.serialize(serializer),
            known => known.serialize(serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NodeConfig, D::Error> {
        Ok(NodeConfig::from_value(Value::deserialize(deserializer)?))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    Default,
    Conditional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationEdge {
    pub id: Uuid,
    pub source: Uuid,
    pub target: Uuid,
    /// Branch label for condition nodes with multiple outputs ("true"/"false").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default)]
    pub kind: EdgeKind,
}

impl AutomationEdge {
    pub fn new(source: Uuid, target: Uuid, source_handle: Option<String>) -> Self {
        let kind = if source_handle.is_some() {
            EdgeKind::Conditional
        } else {
            EdgeKind::Default
        };
        Self {
            id: Uuid::new_v4(),
            source,
            target,
            source_handle,
            kind,
        }
    }

    pub fn touches(&self, node_id: Uuid) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// The node/edge graph of one automation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<AutomationNode>,
    pub edges: Vec<AutomationEdge>,
}

impl Graph {
    pub fn find_node(&self, id: Uuid) -> Option<&AutomationNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn find_node_mut(&mut self, id: Uuid) -> Option<&mut AutomationNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn has_node(&self, id: Uuid) -> bool {
        self.find_node(id).is_some()
    }

    /// Remove a node and every edge touching it. No dangling edges survive.
    pub fn remove_node(&mut self, id: Uuid) {
        self.nodes.retain(|n| n.id != id);
        self.edges.retain(|e| !e.touches(id));
    }

    pub fn remove_edge(&mut self, id: Uuid) {
        self.edges.retain(|e| e.id != id);
    }

    /// Nodes with no incoming edge.
    pub fn roots(&self) -> Vec<Uuid> {
        let targets: std::collections::HashSet<Uuid> =
            self.edges.iter().map(|e| e.target).collect();
        self.nodes
            .iter()
            .filter(|n| !targets.contains(&n.id))
            .map(|n| n.id)
            .collect()
    }

    /// Walk edges from the roots, first-edge-wins, visiting each node once.
    /// Mirrors how the backend orders a linear run; used by the in-memory
    /// backend to synthesize traces.
    pub fn walk_order(&self) -> Vec<Uuid> {
        let roots = self.roots();
        if roots.is_empty() {
            return self.nodes.iter().map(|n| n.id).collect();
        }

        let mut order = Vec::new();
        let mut visited = std::collections::HashSet::new();
        for root in roots {
            let mut current = root;
            loop {
                if !visited.insert(current) {
                    break;
                }
                order.push(current);
                match self.edges.iter().find(|e| e.source == current) {
                    Some(edge) => current = edge.target,
                    None => break,
                }
            }
        }
        order
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_tags_match_wire_format() {
        for config in NodeConfig::all_defaults() {
            let value = serde_json::to_value(&config).unwrap();
            assert_eq!(value["type"], config.tag(), "tag mismatch for {config:?}");
        }
    }

    #[test]
    fn supabase_tag_is_action_supabase() {
        let config = NodeConfig::SupabaseQuery(SupabaseActionParams::default());
        assert_eq!(config.tag(), "action-supabase");
    }

    #[test]
    fn unknown_tag_decodes_to_legacy() {
        let raw = json!({ "type": "action-zapier", "zap_id": "z-123" });
        let config = NodeConfig::from_value(raw.clone());
        match &config {
            NodeConfig::Legacy { tag, raw: kept } => {
                assert_eq!(tag, "action-zapier");
                assert_eq!(kept, &raw);
            }
            other => panic!("expected Legacy, got {other:?}"),
        }
        assert_eq!(config.display_name(), "Unknown Step");
    }

    #[test]
    fn malformed_known_tag_decodes_to_legacy() {
        // Known tag but wrong payload shape must not fail the decode.
        let raw = json!({ "type": "logic-delay", "duration": "soon" });
        let config = NodeConfig::from_value(raw);
        assert!(matches!(config, NodeConfig::Legacy { .. }));
    }

    #[test]
    fn legacy_config_round_trips_inside_a_node() {
        let raw = json!({ "type": "action-zapier", "zap_id": "z-123" });
        let node = AutomationNode {
            id: Uuid::new_v4(),
            label: "Zap".to_string(),
            disabled: false,
            position: Position::default(),
            config: NodeConfig::from_value(raw.clone()),
            selected: false,
        };

        let json = serde_json::to_string(&node).unwrap();
        let restored: AutomationNode = serde_json::from_str(&json).unwrap();
        match restored.config {
            NodeConfig::Legacy { tag, raw: kept } => {
                assert_eq!(tag, "action-zapier");
                assert_eq!(kept, raw);
            }
            other => panic!("expected Legacy, got {other:?}"),
        }
    }

    #[test]
    fn selected_flag_is_not_persisted() {
        let mut node = AutomationNode::new(
            NodeConfig::TriggerManual(ManualTriggerParams::default()),
            Position::new(10.0, 20.0),
        );
        node.selected = true;

        let json = serde_json::to_string(&node).unwrap();
        let restored: AutomationNode = serde_json::from_str(&json).unwrap();
        assert!(!restored.selected);
        assert_eq!(restored.position, node.position);
    }

    #[test]
    fn remove_node_cascades_edges() {
        let mut graph = Graph::default();
        let a = AutomationNode::new(
            NodeConfig::TriggerEvent(EventTriggerParams::default()),
            Position::default(),
        );
        let b = AutomationNode::new(
            NodeConfig::ActionHttp(HttpActionParams::default()),
            Position::default(),
        );
        let (a_id, b_id) = (a.id, b.id);
        graph.nodes.push(a);
        graph.nodes.push(b);
        graph.edges.push(AutomationEdge::new(a_id, b_id, None));

        graph.remove_node(b_id);
        assert!(graph.edges.is_empty());
        assert!(graph.has_node(a_id));
    }

    #[test]
    fn walk_order_follows_edges_from_root() {
        let mut graph = Graph::default();
        let ids: Vec<Uuid> = (0..3)
            .map(|_| {
                let node = AutomationNode::new(
                    NodeConfig::TriggerManual(ManualTriggerParams::default()),
                    Position::default(),
                );
                let id = node.id;
                graph.nodes.push(node);
                id
            })
            .collect();
        // Chain 2 -> 0 -> 1; root is 2.
        graph.edges.push(AutomationEdge::new(ids[2], ids[0], None));
        graph.edges.push(AutomationEdge::new(ids[0], ids[1], None));

        assert_eq!(graph.walk_order(), vec![ids[2], ids[0], ids[1]]);
    }
}
