use anyhow::{Result, ensure};
use eframe::egui;
use egui_snarl::ui::{PinInfo, SnarlStyle, SnarlViewer};
use egui_snarl::{InPinId, NodeId, OutPinId, Snarl};
use std::collections::HashMap;
use uuid::Uuid;

use flowweave_core::{NodeCategory, Position, ValidationReport};
use flowweave_editor::{GraphStore, Viewport};

use crate::theme;

/// Display payload for one snarl node, projected from the graph store.
#[derive(Clone)]
pub struct CanvasNode {
    pub automation_node_id: Uuid,
    pub label: String,
    pub icon: String,
    pub summary: String,
    pub category: NodeCategory,
    pub disabled: bool,
    pub selected: bool,
    pub has_issues: bool,
    pub is_trigger: bool,
    pub is_condition: bool,
    pub is_stop: bool,
}

pub struct GraphEditor {
    snarl: Snarl<CanvasNode>,
    uuid_to_snarl: HashMap<Uuid, NodeId>,
    snarl_to_uuid: HashMap<NodeId, Uuid>,
    style: SnarlStyle,
    // Rebuild the snarl only when the store actually changed. Selection is
    // transient and does not move the revision, so it is tracked separately.
    synced_revision: Option<u64>,
    synced_selection: Vec<Uuid>,
    // Nodes moved by an in-flight drag; committed to history on release.
    dragged: Vec<Uuid>,
    // Bumped by `reset_view` so the snarl widget forgets its camera state.
    view_epoch: u64,
}

pub struct CanvasResponse {
    pub clicked_node: Option<Uuid>,
}

impl GraphEditor {
    pub fn new() -> Self {
        Self {
            snarl: Snarl::new(),
            uuid_to_snarl: HashMap::new(),
            snarl_to_uuid: HashMap::new(),
            style: theme::create_snarl_style(),
            synced_revision: None,
            synced_selection: Vec::new(),
            dragged: Vec::new(),
            view_epoch: 0,
        }
    }

    /// Force a rebuild on the next frame, e.g. after loading an automation.
    pub fn invalidate(&mut self) {
        self.synced_revision = None;
    }

    /// Return the camera to the origin at 1:1 zoom. The snarl widget keeps
    /// its pan/zoom in egui memory keyed by the widget id, so a fresh id is
    /// what actually drops the old camera.
    pub fn reset_view(&mut self) {
        self.view_epoch += 1;
        self.invalidate();
    }

    fn sync_from_store(&mut self, store: &GraphStore, validation: &ValidationReport) {
        self.snarl = Snarl::new();
        self.uuid_to_snarl.clear();
        self.snarl_to_uuid.clear();

        for node in &store.graph().nodes {
            let canvas_node = CanvasNode {
                automation_node_id: node.id,
                label: node.label.clone(),
                icon: node.config.icon().to_string(),
                summary: node.config.summary(),
                category: node.config.category(),
                disabled: node.disabled,
                selected: node.selected,
                has_issues: validation.node_has_issues(node.id),
                is_trigger: node.config.is_trigger(),
                is_condition: matches!(node.config, flowweave_core::NodeConfig::LogicCondition(_)),
                is_stop: matches!(node.config, flowweave_core::NodeConfig::LogicStop(_)),
            };

            let pos = egui::pos2(node.position.x, node.position.y);
            let snarl_id = self.snarl.insert_node(pos, canvas_node);
            self.uuid_to_snarl.insert(node.id, snarl_id);
            self.snarl_to_uuid.insert(snarl_id, node.id);
        }

        for edge in &store.graph().edges {
            if let (Some(&from), Some(&to)) = (
                self.uuid_to_snarl.get(&edge.source),
                self.uuid_to_snarl.get(&edge.target),
            ) {
                let output = match edge.source_handle.as_deref() {
                    Some("false") => 1,
                    _ => 0,
                };
                self.snarl.connect(
                    OutPinId { node: from, output },
                    InPinId { node: to, input: 0 },
                );
            }
        }
    }

    /// Render one frame. Errors instead of panicking when the snarl/store
    /// mapping is inconsistent; the app shows a recovery screen and rebuilds.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        store: &mut GraphStore,
        validation: &ValidationReport,
    ) -> Result<CanvasResponse> {
        let selection = store.selected_ids();
        if self.synced_revision != Some(store.revision()) || self.synced_selection != selection {
            self.sync_from_store(store, validation);
            self.synced_revision = Some(store.revision());
            self.synced_selection = selection;
        }
        ensure!(
            self.uuid_to_snarl.len() == store.graph().nodes.len(),
            "canvas node map out of sync with the graph ({} mapped, {} in graph)",
            self.uuid_to_snarl.len(),
            store.graph().nodes.len()
        );

        let mut clicked = None;
        let mut connected: Vec<(Uuid, Uuid, Option<String>)> = Vec::new();
        let mut disconnected: Vec<(Uuid, Uuid)> = Vec::new();
        let mut camera: Option<egui::emath::TSTransform> = None;

        let mut viewer = CanvasViewer {
            clicked: &mut clicked,
            connected: &mut connected,
            disconnected: &mut disconnected,
            snarl_to_uuid: &self.snarl_to_uuid,
            camera: &mut camera,
        };

        self.snarl
            .show(&mut viewer, &self.style, ("automation_graph", self.view_epoch), ui);

        // Mirror the snarl camera into the store so drop translation and hit
        // tests see the real pan/zoom, not a stale identity transform.
        if let Some(t) = camera {
            store.set_viewport(Viewport {
                pan: (t.translation.x, t.translation.y),
                zoom: t.scaling,
            });
        }

        self.write_back_positions(ui, store);

        // Mutating the store bumps its revision, which forces a resync on the
        // next frame, so the snarl never drifts from the store.
        for (source, target, handle) in connected {
            store.connect(source, target, handle);
        }
        for (source, target) in disconnected {
            let edge_id = store
                .graph()
                .edges
                .iter()
                .find(|e| e.source == source && e.target == target)
                .map(|e| e.id);
            if let Some(id) = edge_id {
                store.remove_edge(id);
            }
        }

        Ok(CanvasResponse {
            clicked_node: clicked,
        })
    }

    /// Flow node drags back into the store: transient position updates while
    /// the pointer is down, one committed `move_node` per dragged node on
    /// release so the whole drag is a single undo step.
    fn write_back_positions(&mut self, ui: &egui::Ui, store: &mut GraphStore) {
        let pointer_down = ui.input(|i| i.pointer.primary_down());

        let mut moved: Vec<(Uuid, Position)> = Vec::new();
        for (&uuid, &snarl_id) in &self.uuid_to_snarl {
            let Some(info) = self.snarl.get_node_info(snarl_id) else {
                continue;
            };
            let pos = Position::new(info.pos.x, info.pos.y);
            let in_store = store.graph().find_node(uuid).map(|n| n.position);
            if in_store.is_some_and(|current| current != pos) {
                moved.push((uuid, pos));
            }
        }

        for (uuid, pos) in moved {
            store.move_node_transient(uuid, pos);
            if pointer_down && !self.dragged.contains(&uuid) {
                self.dragged.push(uuid);
            }
        }

        if !pointer_down {
            for uuid in std::mem::take(&mut self.dragged) {
                if let Some(pos) = store.graph().find_node(uuid).map(|n| n.position) {
                    store.move_node(uuid, pos);
                }
            }
        }
    }
}

struct CanvasViewer<'a> {
    clicked: &'a mut Option<Uuid>,
    connected: &'a mut Vec<(Uuid, Uuid, Option<String>)>,
    disconnected: &'a mut Vec<(Uuid, Uuid)>,
    snarl_to_uuid: &'a HashMap<NodeId, Uuid>,
    camera: &'a mut Option<egui::emath::TSTransform>,
}

impl CanvasViewer<'_> {
    fn edge_endpoints(&self, from: &egui_snarl::OutPin, to: &egui_snarl::InPin) -> Option<(Uuid, Uuid)> {
        let source = *self.snarl_to_uuid.get(&from.id.node)?;
        let target = *self.snarl_to_uuid.get(&to.id.node)?;
        Some((source, target))
    }
}

impl SnarlViewer<CanvasNode> for CanvasViewer<'_> {
    fn title(&mut self, node: &CanvasNode) -> String {
        format!("{} {}", node.icon, node.label)
    }

    fn inputs(&mut self, node: &CanvasNode) -> usize {
        if node.is_trigger { 0 } else { 1 }
    }

    fn outputs(&mut self, node: &CanvasNode) -> usize {
        if node.is_stop {
            0
        } else if node.is_condition {
            2
        } else {
            1
        }
    }

    fn show_input(
        &mut self,
        _pin: &egui_snarl::InPin,
        _ui: &mut egui::Ui,
        _snarl: &mut Snarl<CanvasNode>,
    ) -> PinInfo {
        PinInfo::circle().with_fill(theme::TEXT_SECONDARY)
    }

    fn show_output(
        &mut self,
        pin: &egui_snarl::OutPin,
        ui: &mut egui::Ui,
        snarl: &mut Snarl<CanvasNode>,
    ) -> PinInfo {
        let node = &snarl[pin.id.node];
        if node.is_condition {
            let branch = if pin.id.output == 0 { "true" } else { "false" };
            ui.label(
                egui::RichText::new(branch)
                    .size(10.0)
                    .color(theme::TEXT_MUTED),
            );
        }
        PinInfo::circle().with_fill(theme::category_color(node.category))
    }

    fn has_body(&mut self, _node: &CanvasNode) -> bool {
        true
    }

    fn show_body(
        &mut self,
        node_id: NodeId,
        _inputs: &[egui_snarl::InPin],
        _outputs: &[egui_snarl::OutPin],
        ui: &mut egui::Ui,
        snarl: &mut Snarl<CanvasNode>,
    ) {
        // Node bodies live inside the transformed canvas layer; its
        // layer-to-global transform is the current camera.
        if self.camera.is_none() {
            *self.camera = Some(
                ui.ctx()
                    .layer_transform_to_global(ui.layer_id())
                    .unwrap_or(egui::emath::TSTransform::IDENTITY),
            );
        }

        let node = &snarl[node_id];
        let color = theme::category_color(node.category);

        ui.horizontal(|ui| {
            if node.selected {
                ui.colored_label(theme::ACCENT_CORAL, "▣");
            }
            if node.has_issues {
                ui.colored_label(theme::ACCENT_RED, "⚠")
                    .on_hover_text("This step has configuration issues");
            }
            if node.disabled {
                ui.colored_label(theme::TEXT_MUTED, "⊘")
                    .on_hover_text("Disabled; skipped at runtime");
            }
            ui.colored_label(color, "●");
            let summary = egui::RichText::new(&node.summary)
                .size(11.0)
                .color(theme::TEXT_SECONDARY);
            if ui.link(summary).clicked()
                && let Some(&uuid) = self.snarl_to_uuid.get(&node_id)
            {
                *self.clicked = Some(uuid);
            }
        });
    }

    fn connect(
        &mut self,
        from: &egui_snarl::OutPin,
        to: &egui_snarl::InPin,
        snarl: &mut Snarl<CanvasNode>,
    ) {
        let source_node = &snarl[from.id.node];
        if let Some((source, target)) = self.edge_endpoints(from, to) {
            // Self-loops are rejected by the store; skip the visual connect
            // too so the canvas never shows an edge the model refused.
            if source == target {
                return;
            }
            let handle = if source_node.is_condition {
                Some(if from.id.output == 0 { "true" } else { "false" }.to_string())
            } else {
                None
            };
            self.connected.push((source, target, handle));
        }
        snarl.connect(from.id, to.id);
    }

    fn disconnect(
        &mut self,
        from: &egui_snarl::OutPin,
        to: &egui_snarl::InPin,
        snarl: &mut Snarl<CanvasNode>,
    ) {
        if let Some((source, target)) = self.edge_endpoints(from, to) {
            self.disconnected.push((source, target));
        }
        snarl.disconnect(from.id, to.id);
    }
}
