//! Save/activate orchestration for one open automation.
//!
//! The session owns the working copy (via [`GraphStore`]) and tracks how it
//! relates to the committed copy on the backend. It never performs the
//! backend calls itself — it hands out patches and records outcomes, so the
//! transport layer stays swappable and the state machine stays synchronous
//! and testable.

use flowweave_core::{validate, Automation, AutomationStatus, Graph, ValidationReport};
use thiserror::Error;

use crate::GraphStore;

/// Dirty/saving lifecycle of the working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveState {
    /// Working copy matches the last committed save.
    Clean,
    /// Local edits not yet saved.
    Dirty,
    /// A save round trip is in flight; the canvas stays interactive.
    Saving,
    /// Last save failed; the dirty graph is retained for retry.
    Failed(String),
}

/// Why a toolbar action is unavailable. The display text is surfaced next to
/// the disabled control; a blocked action must never be a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Blocked {
    #[error("No unsaved changes")]
    NothingToSave,

    #[error("Save in progress")]
    SaveInFlight,

    #[error("Save your changes first")]
    UnsavedChanges,

    #[error("Fix {issues} configuration issue(s) first")]
    InvalidGraph { issues: usize },
}

/// Explicit recoverable-error state for the editor subtree. When a renderer
/// trips over bad data the app records the crash here and swaps the subtree
/// for a recovery panel; the rest of the shell keeps running.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorBoundary {
    #[default]
    Ready,
    Crashed {
        message: String,
    },
}

impl EditorBoundary {
    pub fn record_crash(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("editor subtree crashed: {message}");
        *self = EditorBoundary::Crashed { message };
    }

    /// The "Try Again" transition.
    pub fn reset(&mut self) {
        *self = EditorBoundary::Ready;
    }

    pub fn is_crashed(&self) -> bool {
        matches!(self, EditorBoundary::Crashed { .. })
    }
}

/// Type-to-confirm guard for irreversible deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirm {
    expected: String,
    pub typed: String,
}

impl DeleteConfirm {
    pub fn for_automation(name: &str) -> Self {
        Self {
            expected: name.to_string(),
            typed: String::new(),
        }
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn confirmed(&self) -> bool {
        !self.expected.is_empty() && self.typed == self.expected
    }
}

pub struct EditorSession {
    /// Last committed copy of the aggregate, as reported by the backend.
    automation: Automation,
    pub store: GraphStore,
    saved_revision: u64,
    /// Revision captured when the in-flight save started; a mutation during
    /// the round trip keeps the session dirty after the save lands.
    saving_revision: Option<u64>,
    save_error: Option<String>,
}

impl EditorSession {
    pub fn open(automation: Automation) -> Self {
        let store = GraphStore::new(automation.graph.clone());
        let saved_revision = store.revision();
        Self {
            automation,
            store,
            saved_revision,
            saving_revision: None,
            save_error: None,
        }
    }

    pub fn automation(&self) -> &Automation {
        &self.automation
    }

    pub fn is_dirty(&self) -> bool {
        self.store.revision() != self.saved_revision
    }

    pub fn is_saving(&self) -> bool {
        self.saving_revision.is_some()
    }

    pub fn save_state(&self) -> SaveState {
        if self.is_saving() {
            SaveState::Saving
        } else if let Some(error) = &self.save_error {
            SaveState::Failed(error.clone())
        } else if self.is_dirty() {
            SaveState::Dirty
        } else {
            SaveState::Clean
        }
    }

    /// Current validation result for the working copy.
    pub fn validation(&self) -> ValidationReport {
        validate(self.store.graph())
    }

    // -- gates ---------------------------------------------------------------

    pub fn can_save(&self) -> Result<(), Blocked> {
        if self.is_saving() {
            return Err(Blocked::SaveInFlight);
        }
        if !self.is_dirty() && self.save_error.is_none() {
            return Err(Blocked::NothingToSave);
        }
        Ok(())
    }

    /// "Test" and "Run Now" both require a committed, valid graph.
    pub fn can_run(&self) -> Result<(), Blocked> {
        if self.is_saving() {
            return Err(Blocked::SaveInFlight);
        }
        if self.is_dirty() {
            return Err(Blocked::UnsavedChanges);
        }
        let report = self.validation();
        if !report.is_valid() {
            return Err(Blocked::InvalidGraph {
                issues: report.issue_count(),
            });
        }
        Ok(())
    }

    /// Status transitions are free except into `Active`, which requires a
    /// valid graph.
    pub fn can_set_status(&self, status: AutomationStatus) -> Result<(), Blocked> {
        if status == AutomationStatus::Active {
            let report = self.validation();
            if !report.is_valid() {
                return Err(Blocked::InvalidGraph {
                    issues: report.issue_count(),
                });
            }
        }
        Ok(())
    }

    // -- save lifecycle ------------------------------------------------------

    /// Start a save. Returns the graph to send to the backend.
    pub fn begin_save(&mut self) -> Result<Graph, Blocked> {
        self.can_save()?;
        self.saving_revision = Some(self.store.revision());
        Ok(self.store.snapshot())
    }

    /// The backend committed the save and returned the stored copy.
    pub fn save_succeeded(&mut self, committed: Automation) {
        if let Some(revision) = self.saving_revision.take() {
            self.saved_revision = revision;
        }
        self.save_error = None;
        self.automation = committed;
    }

    /// The round trip failed; local edits are kept so the user can retry.
    pub fn save_failed(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("save failed: {message}");
        self.saving_revision = None;
        self.save_error = Some(message);
    }

    /// Record a committed status/enabled change (the backend already
    /// accepted it).
    pub fn apply_committed(&mut self, committed: Automation) {
        self.automation = committed;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use flowweave_core::{
        template::Template, FieldMapping, NodeConfig, Position, TriggerType,
    };

    fn fresh_session() -> EditorSession {
        EditorSession::open(Automation::new("Test automation", TriggerType::Manual))
    }

    fn session_from_template(slug: &str) -> EditorSession {
        let template = Template::by_slug(slug).unwrap();
        let mut automation = Automation::new(template.name, template.trigger_type);
        automation.graph = template.seed_graph();
        EditorSession::open(automation)
    }

    #[test]
    fn opens_clean_with_nothing_to_save() {
        let session = fresh_session();
        assert_eq!(session.save_state(), SaveState::Clean);
        assert_eq!(session.can_save(), Err(Blocked::NothingToSave));
    }

    #[test]
    fn mutation_makes_the_session_dirty_and_save_clears_it() {
        let mut session = fresh_session();
        session.store.add_node(
            NodeConfig::TriggerManual(Default::default()),
            Position::default(),
        );
        assert_eq!(session.save_state(), SaveState::Dirty);

        let graph = session.begin_save().unwrap();
        assert_eq!(session.save_state(), SaveState::Saving);
        assert_eq!(session.can_save(), Err(Blocked::SaveInFlight));

        let mut committed = session.automation().clone();
        committed.graph = graph;
        session.save_succeeded(committed);
        assert_eq!(session.save_state(), SaveState::Clean);
    }

    #[test]
    fn edit_during_save_stays_dirty_after_save_lands() {
        let mut session = fresh_session();
        session.store.add_node(
            NodeConfig::TriggerManual(Default::default()),
            Position::default(),
        );
        let graph = session.begin_save().unwrap();

        // Concurrent local edit while the round trip is in flight.
        session.store.add_node(
            NodeConfig::LogicStop(Default::default()),
            Position::default(),
        );

        let mut committed = session.automation().clone();
        committed.graph = graph;
        session.save_succeeded(committed);
        assert_eq!(session.save_state(), SaveState::Dirty);
    }

    #[test]
    fn failed_save_keeps_the_dirty_graph_for_retry() {
        let mut session = fresh_session();
        session.store.add_node(
            NodeConfig::TriggerManual(Default::default()),
            Position::default(),
        );
        session.begin_save().unwrap();
        session.save_failed("backend unavailable");

        assert_eq!(
            session.save_state(),
            SaveState::Failed("backend unavailable".to_string())
        );
        assert_eq!(session.store.graph().nodes.len(), 1);
        // Retry is allowed.
        assert!(session.begin_save().is_ok());
    }

    #[test]
    fn run_requires_save_first() {
        let mut session = session_from_template("support-triage");
        session.store.update_node(
            session.store.graph().nodes[2].id,
            |n| {
                if let NodeConfig::ActionNotify(p) = &mut n.config {
                    p.message = "triaged".to_string();
                }
            },
        );
        assert_eq!(session.can_run(), Err(Blocked::UnsavedChanges));

        let graph = session.begin_save().unwrap();
        let mut committed = session.automation().clone();
        committed.graph = graph;
        session.save_succeeded(committed);
        assert_eq!(session.can_run(), Ok(()));
    }

    #[test]
    fn lead_management_gating_end_to_end() {
        // Template seeds a trigger plus an update-lead action with no field
        // mappings: activation must be blocked with the issue count, and
        // filling the missing field must unblock it.
        let mut session = session_from_template("lead-management");

        let report = session.validation();
        assert!(report.issue_count() >= 1);
        assert_eq!(
            session.can_set_status(AutomationStatus::Active),
            Err(Blocked::InvalidGraph {
                issues: report.issue_count()
            })
        );
        // The blocked reason names the count for the tooltip.
        let reason = session
            .can_set_status(AutomationStatus::Active)
            .unwrap_err()
            .to_string();
        assert!(reason.contains(&report.issue_count().to_string()));

        // Pausing a broken automation is fine; only Active is gated.
        assert_eq!(session.can_set_status(AutomationStatus::Paused), Ok(()));

        let update_id = session
            .store
            .graph()
            .nodes
            .iter()
            .find(|n| matches!(n.config, NodeConfig::ActionUpdateLead(_)))
            .unwrap()
            .id;
        session.store.update_node(update_id, |n| {
            if let NodeConfig::ActionUpdateLead(p) = &mut n.config {
                p.fields.push(FieldMapping {
                    field: "owner".to_string(),
                    value: "sales-team".to_string(),
                });
            }
        });

        assert!(session.validation().is_valid());
        assert_eq!(session.can_set_status(AutomationStatus::Active), Ok(()));
    }

    #[test]
    fn undo_redo_are_available_regardless_of_save_state() {
        let mut session = fresh_session();
        session.store.add_node(
            NodeConfig::TriggerManual(Default::default()),
            Position::default(),
        );
        session.begin_save().unwrap();
        // Mid-save the history still works.
        assert!(session.store.can_undo());
        assert!(session.store.undo());
        assert!(session.store.redo());
    }

    #[test]
    fn delete_confirm_requires_the_exact_name() {
        let mut confirm = DeleteConfirm::for_automation("Lead Management");
        assert!(!confirm.confirmed());

        confirm.typed = "lead management".to_string();
        assert!(!confirm.confirmed());

        confirm.typed = "Lead Management".to_string();
        assert!(confirm.confirmed());
    }

    #[test]
    fn boundary_reset_recovers() {
        let mut boundary = EditorBoundary::default();
        assert!(!boundary.is_crashed());

        boundary.record_crash("renderer tripped on node payload");
        assert!(boundary.is_crashed());

        boundary.reset();
        assert_eq!(boundary, EditorBoundary::Ready);
    }
}
