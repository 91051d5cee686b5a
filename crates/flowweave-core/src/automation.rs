use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Graph;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    #[default]
    Manual,
    Event,
    Schedule,
    AiTool,
}

impl TriggerType {
    pub fn display_name(&self) -> &'static str {
        match self {
            TriggerType::Manual => "Manual",
            TriggerType::Event => "Event",
            TriggerType::Schedule => "Schedule",
            TriggerType::AiTool => "AI Tool",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutomationStatus {
    #[default]
    Draft,
    Active,
    Paused,
    Error,
}

impl AutomationStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            AutomationStatus::Draft => "Draft",
            AutomationStatus::Active => "Active",
            AutomationStatus::Paused => "Paused",
            AutomationStatus::Error => "Error",
        }
    }
}

/// Aggregate root persisted by the backend. The editor works on a local copy
/// that diverges from the committed one until an explicit save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Automation {
    pub id: Uuid,
    pub name: String,
    pub trigger_type: TriggerType,
    pub status: AutomationStatus,
    pub enabled: bool,
    #[serde(default)]
    pub graph: Graph,
    pub updated_at: DateTime<Utc>,
}

impl Automation {
    pub fn new(name: impl Into<String>, trigger_type: TriggerType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            trigger_type,
            status: AutomationStatus::Draft,
            enabled: false,
            graph: Graph::default(),
            updated_at: Utc::now(),
        }
    }
}
