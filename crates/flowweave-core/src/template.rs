//! Built-in starter templates.
//!
//! A template is a named, pre-built graph bundle; instantiating one is the
//! same as creating an automation seeded with the template's graph instead of
//! an empty one. Seeds intentionally leave required fields blank where a
//! human has to make a choice, so a fresh instance shows its configuration
//! gaps in the validation panel.

use crate::{
    AiClassifyParams, AutomationEdge, AutomationNode, EmailActionParams, EventTriggerParams,
    Graph, NodeConfig, NotifyActionParams, Position, ScheduleTriggerParams, TriggerType,
    UpdateLeadParams,
};

#[derive(Debug, Clone)]
pub struct Template {
    pub slug: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub trigger_type: TriggerType,
}

impl Template {
    pub fn builtin() -> Vec<Template> {
        vec![
            Template {
                slug: "lead-management",
                name: "Lead Management",
                description: "Route new leads to the right owner and keep the record fresh",
                icon: "👤",
                color: "#4c9ee8",
                trigger_type: TriggerType::Event,
            },
            Template {
                slug: "welcome-email",
                name: "Welcome Email",
                description: "Send a scheduled welcome email to recent signups",
                icon: "✉",
                color: "#50c878",
                trigger_type: TriggerType::Schedule,
            },
            Template {
                slug: "support-triage",
                name: "Support Triage",
                description: "Classify incoming conversations and notify the owning team",
                icon: "🏷",
                color: "#ff6d5a",
                trigger_type: TriggerType::Event,
            },
        ]
    }

    pub fn by_slug(slug: &str) -> Option<Template> {
        Self::builtin().into_iter().find(|t| t.slug == slug)
    }

    /// Build this template's seed graph with fresh node ids.
    pub fn seed_graph(&self) -> Graph {
        match self.slug {
            "lead-management" => {
                let trigger = AutomationNode::new(
                    NodeConfig::TriggerEvent(EventTriggerParams {
                        event: "lead.created".to_string(),
                    }),
                    Position::new(80.0, 160.0),
                );
                // Owner assignment is left for the user to fill in.
                let update = AutomationNode::new(
                    NodeConfig::ActionUpdateLead(UpdateLeadParams::default()),
                    Position::new(360.0, 160.0),
                );
                chain(vec![trigger, update])
            }
            "welcome-email" => {
                let trigger = AutomationNode::new(
                    NodeConfig::TriggerSchedule(ScheduleTriggerParams {
                        cron: "0 9 * * 1-5".to_string(),
                        timezone: "UTC".to_string(),
                    }),
                    Position::new(80.0, 160.0),
                );
                let email = AutomationNode::new(
                    NodeConfig::ActionEmail(EmailActionParams {
                        to: String::new(),
                        subject: "Welcome aboard".to_string(),
                        body: String::new(),
                    }),
                    Position::new(360.0, 160.0),
                );
                chain(vec![trigger, email])
            }
            "support-triage" => {
                let trigger = AutomationNode::new(
                    NodeConfig::TriggerEvent(EventTriggerParams {
                        event: "conversation.created".to_string(),
                    }),
                    Position::new(80.0, 160.0),
                );
                let classify = AutomationNode::new(
                    NodeConfig::AiClassify(AiClassifyParams {
                        input: "{{conversation.body}}".to_string(),
                        categories: vec![
                            "billing".to_string(),
                            "bug".to_string(),
                            "question".to_string(),
                        ],
                    }),
                    Position::new(360.0, 160.0),
                );
                let notify = AutomationNode::new(
                    NodeConfig::ActionNotify(NotifyActionParams::default()),
                    Position::new(640.0, 160.0),
                );
                chain(vec![trigger, classify, notify])
            }
            _ => Graph::default(),
        }
    }
}

/// Connect a list of nodes into a left-to-right chain.
fn chain(nodes: Vec<AutomationNode>) -> Graph {
    let edges = nodes
        .windows(2)
        .map(|pair| AutomationEdge::new(pair[0].id, pair[1].id, None))
        .collect();
    Graph { nodes, edges }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate;

    #[test]
    fn every_template_has_a_seed_with_a_trigger_root() {
        for template in Template::builtin() {
            let graph = template.seed_graph();
            assert!(
                !graph.nodes.is_empty(),
                "{} seed is empty",
                template.slug
            );
            let report = validate(&graph);
            // Seeds may have blank required fields, but never a missing trigger.
            assert!(
                !report.issues.iter().any(|i| i.node_id.is_none()),
                "{} seed has no trigger root",
                template.slug
            );
        }
    }

    #[test]
    fn lead_management_seed_starts_invalid() {
        let graph = Template::by_slug("lead-management").unwrap().seed_graph();
        let report = validate(&graph);
        assert!(report.issue_count() >= 1);

        // The gap is on the update-lead action, not the trigger.
        let update = graph
            .nodes
            .iter()
            .find(|n| matches!(n.config, NodeConfig::ActionUpdateLead(_)))
            .unwrap();
        assert!(report.node_has_issues(update.id));
    }

    #[test]
    fn declared_trigger_type_matches_the_seed_trigger_node() {
        for template in Template::builtin() {
            let graph = template.seed_graph();
            let root = graph
                .nodes
                .iter()
                .find(|n| n.config.is_trigger())
                .unwrap_or_else(|| panic!("{} seed has no trigger node", template.slug));
            let seeded = match root.config {
                NodeConfig::TriggerEvent(_) => TriggerType::Event,
                NodeConfig::TriggerSchedule(_) => TriggerType::Schedule,
                NodeConfig::TriggerManual(_) => TriggerType::Manual,
                NodeConfig::TriggerAiTool(_) => TriggerType::AiTool,
                ref other => panic!("{} seed root is not a trigger: {other:?}", template.slug),
            };
            assert_eq!(template.trigger_type, seeded, "{}", template.slug);
        }
    }

    #[test]
    fn seeds_get_fresh_ids_per_instantiation() {
        let template = Template::by_slug("welcome-email").unwrap();
        let first = template.seed_graph();
        let second = template.seed_graph();
        assert_ne!(first.nodes[0].id, second.nodes[0].id);
    }
}
