use std::sync::Arc;

use eframe::egui::{self, Align, Button, Color32, Layout, RichText, Vec2};
use uuid::Uuid;

use flowweave_client::{AutomationBackend, ExecutionTracker, MemoryBackend};
use flowweave_core::{
    AiClassifyParams, AiExtractParams, AiGenerateParams, AiToolTriggerParams, Automation,
    AutomationStatus, ConditionOperator, ConditionParams, DelayParams, DelayUnit,
    EmailActionParams, EventTriggerParams, FieldMapping, HttpActionParams, HttpMethod,
    NodeCategory, NodeConfig, NotifyActionParams, Position, ScheduleTriggerParams,
    SetVariableParams, StopParams, SupabaseActionParams, TableOperation, TaskActionParams,
    TriggerType, UpdateLeadParams, cron, template::Template,
};
use flowweave_editor::{
    ContextMenu, DeleteConfirm, EditorBoundary, EditorCommand, EditorKey, EditorSession,
    ExecutionView, SaveState, Viewport, resolve_shortcut,
};

use crate::bridge::{BackendBridge, BackendEvent, BackendRequest};
use crate::editor::GraphEditor;
use crate::theme::{
    self, ACCENT_CORAL, ACCENT_GREEN, ACCENT_RED, BG_DARK, TEXT_MUTED, TEXT_PRIMARY,
    TEXT_SECONDARY,
};

pub struct FlowweaveApp {
    bridge: BackendBridge,

    session: EditorSession,
    editor: GraphEditor,

    // Execution history for the open automation
    tracker: ExecutionTracker,
    selected_execution: Option<Uuid>,
    trace: Option<ExecutionView>,

    // UI state
    context_menu: ContextMenu,
    boundary: EditorBoundary,
    delete_confirm: Option<DeleteConfirm>,
    executions_open: bool,
    logs_open: bool,
    show_new_dialog: bool,
    new_name: String,
    new_template: Option<&'static str>,
    name_buffer: String,
    logs: Vec<String>,

    // JSON payload editing buffer for the database action; only committed
    // back into the node when it parses.
    json_buffer: String,
    json_buffer_node: Option<Uuid>,
    json_error: Option<String>,
}

impl FlowweaveApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let backend = Arc::new(MemoryBackend::new());

        // One blocking call before the first frame so the editor always has
        // an automation to show; everything after goes through the bridge.
        let automation = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .ok()
            .and_then(|rt| {
                rt.block_on(backend.create_automation("My automation", TriggerType::Manual, None))
                    .ok()
            })
            .unwrap_or_else(|| Automation::new("My automation", TriggerType::Manual));

        let name_buffer = automation.name.clone();
        let bridge = BackendBridge::start(backend);

        Self {
            bridge,
            session: EditorSession::open(automation),
            editor: GraphEditor::new(),
            tracker: ExecutionTracker::new(),
            selected_execution: None,
            trace: None,
            context_menu: ContextMenu::Closed,
            boundary: EditorBoundary::Ready,
            delete_confirm: None,
            executions_open: false,
            logs_open: false,
            show_new_dialog: false,
            new_name: String::new(),
            new_template: None,
            name_buffer,
            logs: vec!["Flowweave started".to_string()],
            json_buffer: String::new(),
            json_buffer_node: None,
            json_error: None,
        }
    }

    fn log(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        tracing::info!("{}", msg);
        self.logs.push(msg);
        if self.logs.len() > 1000 {
            self.logs.remove(0);
        }
    }

    fn open_automation(&mut self, automation: Automation) {
        self.name_buffer = automation.name.clone();
        let id = automation.id;
        self.session = EditorSession::open(automation);
        self.editor.invalidate();
        self.tracker = ExecutionTracker::new();
        self.selected_execution = None;
        self.trace = None;
        self.context_menu.close();
        self.delete_confirm = None;
        self.json_buffer_node = None;
        self.bridge
            .send(BackendRequest::FetchExecutions { automation_id: id });
    }

    fn set_trace(&mut self, view: ExecutionView) {
        let mut view = view;
        // Keep rows the user expanded open across polling refreshes.
        if let Some(old) = &self.trace
            && old.execution_id == view.execution_id
        {
            for row in &mut view.rows {
                if let Some(prev) = old.rows.iter().find(|r| r.seq == row.seq) {
                    row.expanded = row.expanded || prev.expanded;
                }
            }
        }
        self.trace = Some(view);
    }

    fn poll_backend_events(&mut self) {
        while let Some(event) = self.bridge.try_recv() {
            match event {
                BackendEvent::Created(automation) => {
                    self.log(format!("Opened automation \"{}\"", automation.name));
                    self.open_automation(automation);
                }
                BackendEvent::Saved(automation) => {
                    if automation.id == self.session.automation().id {
                        self.session.save_succeeded(automation);
                        self.log("Saved");
                    }
                }
                BackendEvent::SaveFailed(message) => {
                    self.log(format!("Save failed: {}", message));
                    self.session.save_failed(message);
                }
                BackendEvent::Updated(automation) => {
                    if automation.id == self.session.automation().id {
                        self.name_buffer = automation.name.clone();
                        self.session.apply_committed(automation);
                    }
                }
                BackendEvent::Deleted(id) => {
                    self.log("Automation deleted");
                    if id == self.session.automation().id {
                        self.bridge.send(BackendRequest::Create {
                            name: "My automation".to_string(),
                            trigger_type: TriggerType::Manual,
                            template: None,
                        });
                    }
                }
                BackendEvent::Triggered(execution_id) => {
                    self.selected_execution = Some(execution_id);
                    self.executions_open = true;
                }
                BackendEvent::ExecutionSnapshot(execution) => {
                    if self.selected_execution == Some(execution.id) {
                        self.set_trace(ExecutionView::build(&execution));
                    }
                    self.tracker.apply(execution);
                }
                BackendEvent::Executions(executions) => {
                    self.tracker.replace_all(executions);
                }
                BackendEvent::Error(message) => {
                    tracing::error!("{}", message);
                    self.logs.push(message);
                }
            }
        }
    }

    fn save(&mut self) {
        match self.session.begin_save() {
            Ok(graph) => self.bridge.send(BackendRequest::SaveGraph {
                automation_id: self.session.automation().id,
                graph,
            }),
            Err(blocked) => self.log(blocked.to_string()),
        }
    }

    fn trigger(&mut self, test_mode: bool) {
        match self.session.can_run() {
            Ok(()) => {
                self.bridge.send(BackendRequest::Trigger {
                    automation_id: self.session.automation().id,
                    test_mode,
                });
            }
            Err(blocked) => self.log(blocked.to_string()),
        }
    }

    fn add_node(&mut self, config: NodeConfig) {
        let offset = self.session.store.graph().nodes.len() as f32 * 40.0;
        let id = self
            .session
            .store
            .add_node(config, Position::new(280.0 + offset, 180.0 + offset));
        self.session.store.deselect_all();
        self.session.store.set_selected(id, true);
    }

    fn handle_command(&mut self, command: EditorCommand) {
        match command {
            EditorCommand::Dismiss => {
                if self.delete_confirm.is_some() {
                    self.delete_confirm = None;
                } else if self.context_menu.is_open() {
                    self.context_menu.close();
                } else {
                    self.session.store.deselect_all();
                }
            }
            EditorCommand::DuplicateSelected => {
                if let Some(id) = self.session.store.first_selected()
                    && let Some(new_id) = self.session.store.duplicate_node(id)
                {
                    self.session.store.deselect_all();
                    self.session.store.set_selected(new_id, true);
                }
            }
            EditorCommand::SelectAll => self.session.store.select_all(),
            EditorCommand::DeleteSelected => self.session.store.remove_selected(),
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let text_input_focused = ctx.memory(|m| m.focused().is_some());
        let (command, undo, redo, save, keys) = ctx.input(|i| {
            let keys: Vec<EditorKey> = [
                (egui::Key::Escape, EditorKey::Escape),
                (egui::Key::Delete, EditorKey::Delete),
                (egui::Key::Backspace, EditorKey::Backspace),
                (egui::Key::A, EditorKey::A),
                (egui::Key::D, EditorKey::D),
            ]
            .into_iter()
            .filter(|(egui_key, _)| i.key_pressed(*egui_key))
            .map(|(_, key)| key)
            .collect();
            (
                i.modifiers.command,
                i.modifiers.command && !i.modifiers.shift && i.key_pressed(egui::Key::Z),
                i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z),
                i.modifiers.command && i.key_pressed(egui::Key::S),
                keys,
            )
        });

        for key in keys {
            if let Some(cmd) = resolve_shortcut(key, command, text_input_focused) {
                self.handle_command(cmd);
            }
        }
        if !text_input_focused {
            if undo {
                self.session.store.undo();
            }
            if redo {
                self.session.store.redo();
            }
        }
        if save && self.session.can_save().is_ok() {
            self.save();
        }
    }

    // =========================================================================
    // Toolbar
    // =========================================================================

    fn show_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar")
            .frame(theme::header_frame())
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let name_edit = ui.add(
                        egui::TextEdit::singleline(&mut self.name_buffer)
                            .font(egui::TextStyle::Heading)
                            .text_color(TEXT_PRIMARY)
                            .desired_width(220.0)
                            .frame(false),
                    );
                    if name_edit.lost_focus()
                        && self.name_buffer != self.session.automation().name
                        && !self.name_buffer.trim().is_empty()
                    {
                        self.bridge.send(BackendRequest::Rename {
                            automation_id: self.session.automation().id,
                            name: self.name_buffer.clone(),
                        });
                    }

                    ui.add_space(8.0);
                    self.show_save_indicator(ui);
                    ui.add_space(8.0);
                    self.show_validation_badge(ui);

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.menu_button(RichText::new("☰").size(16.0), |ui| {
                            if ui.button("New automation...").clicked() {
                                self.show_new_dialog = true;
                                self.new_name = "New automation".to_string();
                                self.new_template = None;
                                ui.close();
                            }
                            ui.separator();
                            if ui.button("Delete automation...").clicked() {
                                self.delete_confirm = Some(DeleteConfirm::for_automation(
                                    &self.session.automation().name,
                                ));
                                ui.close();
                            }
                        });

                        ui.add_space(8.0);
                        self.show_status_controls(ui);
                        ui.add_space(16.0);

                        // Save
                        let can_save = self.session.can_save();
                        let save_btn = Button::new(RichText::new("Save").color(Color32::WHITE))
                            .fill(ACCENT_CORAL)
                            .corner_radius(6.0);
                        let response = ui.add_enabled(can_save.is_ok(), save_btn);
                        let response = match &can_save {
                            Ok(()) => response,
                            Err(blocked) => response.on_disabled_hover_text(blocked.to_string()),
                        };
                        if response.clicked() {
                            self.save();
                        }

                        // Test / Run
                        let can_run = self.session.can_run();
                        let test_btn = Button::new("▶ Test").corner_radius(6.0);
                        let response = ui.add_enabled(can_run.is_ok(), test_btn);
                        let response = match &can_run {
                            Ok(()) => response,
                            Err(blocked) => response.on_disabled_hover_text(blocked.to_string()),
                        };
                        if response.clicked() {
                            self.trigger(true);
                        }

                        let run_btn = Button::new("Run now").corner_radius(6.0);
                        let response = ui.add_enabled(can_run.is_ok(), run_btn);
                        let response = match &can_run {
                            Ok(()) => response,
                            Err(blocked) => response.on_disabled_hover_text(blocked.to_string()),
                        };
                        if response.clicked() {
                            self.trigger(false);
                        }

                        ui.add_space(16.0);

                        // Undo / redo
                        let undo_btn =
                            ui.add_enabled(self.session.store.can_undo(), Button::new("↩"));
                        if undo_btn.on_hover_text("Undo").clicked() {
                            self.session.store.undo();
                        }
                        let redo_btn =
                            ui.add_enabled(self.session.store.can_redo(), Button::new("↪"));
                        if redo_btn.on_hover_text("Redo").clicked() {
                            self.session.store.redo();
                        }

                        ui.add_space(16.0);
                        if ui
                            .selectable_label(self.executions_open, "Executions")
                            .clicked()
                        {
                            self.executions_open = !self.executions_open;
                            if self.executions_open {
                                self.bridge.send(BackendRequest::FetchExecutions {
                                    automation_id: self.session.automation().id,
                                });
                            }
                        }
                        if ui.selectable_label(self.logs_open, "Log").clicked() {
                            self.logs_open = !self.logs_open;
                        }
                    });
                });
            });
    }

    fn show_save_indicator(&self, ui: &mut egui::Ui) {
        match self.session.save_state() {
            SaveState::Clean => {
                ui.label(RichText::new("Saved").size(11.0).color(TEXT_MUTED));
            }
            SaveState::Dirty => {
                ui.label(
                    RichText::new("Unsaved changes")
                        .size(11.0)
                        .color(TEXT_SECONDARY),
                );
            }
            SaveState::Saving => {
                ui.label(RichText::new("Saving…").size(11.0).color(TEXT_SECONDARY));
            }
            SaveState::Failed(message) => {
                ui.label(RichText::new("Save failed").size(11.0).color(ACCENT_RED))
                    .on_hover_text(message);
            }
        }
    }

    fn show_validation_badge(&self, ui: &mut egui::Ui) {
        let report = self.session.validation();
        if report.is_valid() {
            return;
        }
        let label = format!("⚠ {} issue(s)", report.issue_count());
        ui.label(RichText::new(label).size(11.0).color(ACCENT_RED))
            .on_hover_ui(|ui| {
                for issue in &report.issues {
                    ui.label(RichText::new(&issue.message).size(11.0));
                }
            });
    }

    fn show_status_controls(&mut self, ui: &mut egui::Ui) {
        let automation = self.session.automation();
        let current = automation.status;
        let automation_id = automation.id;
        let enabled = automation.enabled;

        let mut requested: Option<AutomationStatus> = None;
        egui::ComboBox::from_id_salt("automation_status")
            .selected_text(current.display_name())
            .show_ui(ui, |ui| {
                for status in [
                    AutomationStatus::Draft,
                    AutomationStatus::Active,
                    AutomationStatus::Paused,
                ] {
                    if ui
                        .selectable_label(current == status, status.display_name())
                        .clicked()
                        && status != current
                    {
                        requested = Some(status);
                    }
                }
            });
        if let Some(status) = requested {
            match self.session.can_set_status(status) {
                Ok(()) => self.bridge.send(BackendRequest::SetStatus {
                    automation_id,
                    status,
                }),
                Err(blocked) => self.log(blocked.to_string()),
            }
        }

        let mut enabled_now = enabled;
        if ui.checkbox(&mut enabled_now, "Enabled").changed() {
            self.bridge.send(BackendRequest::SetEnabled {
                automation_id,
                enabled: enabled_now,
            });
        }
    }

    // =========================================================================
    // Node palette
    // =========================================================================

    fn show_palette(&mut self, ctx: &egui::Context) {
        let mut node_to_add: Option<NodeConfig> = None;

        egui::SidePanel::left("node_palette")
            .frame(theme::sidebar_frame())
            .exact_width(210.0)
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("Add a step");
                ui.label(
                    RichText::new("Click or drag onto the canvas")
                        .size(11.0)
                        .color(TEXT_MUTED),
                );
                ui.add_space(8.0);

                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        let categories = [
                            NodeCategory::Trigger,
                            NodeCategory::Action,
                            NodeCategory::Logic,
                            NodeCategory::Ai,
                            NodeCategory::Transform,
                        ];

                        for category in categories {
                            let entries: Vec<NodeConfig> = NodeConfig::all_defaults()
                                .into_iter()
                                .filter(|c| c.category() == category)
                                .collect();
                            if entries.is_empty() {
                                continue;
                            }

                            let color = theme::category_color(category);
                            let header =
                                format!("{} {}", category.icon(), category.display_name());
                            ui.collapsing(RichText::new(header).color(color), |ui| {
                                for config in entries {
                                    let label =
                                        format!("{} {}", config.icon(), config.display_name());
                                    let drag_id =
                                        egui::Id::new(("palette_entry", config.tag().to_string()));
                                    let payload = config.clone();
                                    let response = ui
                                        .dnd_drag_source(drag_id, payload, |ui| {
                                            ui.add(
                                                Button::new(label)
                                                    .frame(false)
                                                    .min_size(Vec2::new(
                                                        ui.available_width(),
                                                        26.0,
                                                    )),
                                            )
                                        })
                                        .response;
                                    if response.clicked() {
                                        node_to_add = Some(config);
                                    }
                                }
                            });
                        }
                    });
            });

        if let Some(config) = node_to_add {
            self.add_node(config);
        }
    }

    // =========================================================================
    // Canvas + context menus
    // =========================================================================

    fn show_canvas(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame {
                fill: BG_DARK,
                ..Default::default()
            })
            .show(ctx, |ui| {
                if self.boundary.is_crashed() {
                    self.show_recovery(ui);
                    return;
                }

                let canvas_rect = ui.max_rect();
                let validation = self.session.validation();
                match self.editor.show(ui, &mut self.session.store, &validation) {
                    Ok(response) => {
                        if let Some(id) = response.clicked_node {
                            self.session.store.deselect_all();
                            self.session.store.set_selected(id, true);
                        }
                        self.handle_canvas_drop(ctx, canvas_rect);
                        self.handle_right_click(ctx, canvas_rect);
                    }
                    Err(e) => {
                        tracing::error!("Canvas render failed: {}", e);
                        self.boundary.record_crash(e.to_string());
                    }
                }
            });

        self.show_context_menu(ctx);
    }

    fn show_recovery(&mut self, ui: &mut egui::Ui) {
        let message = match &self.boundary {
            EditorBoundary::Crashed { message } => message.clone(),
            EditorBoundary::Ready => return,
        };
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.heading("The editor hit a problem");
            ui.label(RichText::new(message).color(TEXT_SECONDARY));
            ui.add_space(12.0);
            ui.label(
                RichText::new("Your last saved version is safe on the server.")
                    .size(11.0)
                    .color(TEXT_MUTED),
            );
            ui.add_space(12.0);
            if ui.button("Try again").clicked() {
                self.boundary.reset();
                self.editor.invalidate();
            }
        });
    }

    fn handle_canvas_drop(&mut self, ctx: &egui::Context, canvas_rect: egui::Rect) {
        let released = ctx.input(|i| i.pointer.any_released());
        if !released {
            return;
        }
        let Some(pointer) = ctx.input(|i| i.pointer.interact_pos()) else {
            return;
        };
        if !canvas_rect.contains(pointer) {
            return;
        }
        if let Some(config) = egui::DragAndDrop::take_payload::<NodeConfig>(ctx) {
            // The mirrored viewport maps global screen points to graph space.
            let position = self
                .session
                .store
                .viewport()
                .screen_to_graph((pointer.x, pointer.y));
            let id = self.session.store.add_node((*config).clone(), position);
            self.session.store.deselect_all();
            self.session.store.set_selected(id, true);
        }
    }

    fn handle_right_click(&mut self, ctx: &egui::Context, canvas_rect: egui::Rect) {
        let clicked = ctx.input(|i| i.pointer.secondary_clicked());
        if !clicked {
            return;
        }
        let Some(pointer) = ctx.input(|i| i.pointer.interact_pos()) else {
            return;
        };
        if !canvas_rect.contains(pointer) {
            return;
        }

        let viewport = self.session.store.viewport();

        // Node hit test against the same footprint the canvas draws, in
        // global screen space like the mirrored viewport.
        let hit = self.session.store.graph().nodes.iter().find(|node| {
            let (x, y) = viewport.graph_to_screen(node.position);
            let rect = egui::Rect::from_min_size(
                egui::pos2(x, y),
                Vec2::new(190.0 * viewport.zoom, 80.0 * viewport.zoom),
            );
            rect.contains(pointer)
        });

        match hit {
            Some(node) => self.context_menu.open_node(node.id, (pointer.x, pointer.y)),
            None => self.context_menu.open_canvas((pointer.x, pointer.y)),
        }
    }

    fn show_context_menu(&mut self, ctx: &egui::Context) {
        let menu = self.context_menu.clone();
        match menu {
            ContextMenu::Closed => {}
            ContextMenu::Node { node_id, at } => {
                if !self.session.store.graph().has_node(node_id) {
                    self.context_menu.close();
                    return;
                }
                let mut close = false;
                egui::Area::new(egui::Id::new("node_context_menu"))
                    .fixed_pos(egui::pos2(at.0, at.1))
                    .order(egui::Order::Foreground)
                    .show(ctx, |ui| {
                        egui::Frame::popup(ui.style()).show(ui, |ui| {
                            ui.set_min_width(160.0);
                            if ui.button("Duplicate").clicked() {
                                if let Some(new_id) = self.session.store.duplicate_node(node_id) {
                                    self.session.store.deselect_all();
                                    self.session.store.set_selected(new_id, true);
                                }
                                close = true;
                            }
                            let disabled = self
                                .session
                                .store
                                .graph()
                                .find_node(node_id)
                                .is_some_and(|n| n.disabled);
                            let toggle_label = if disabled { "Enable" } else { "Disable" };
                            if ui.button(toggle_label).clicked() {
                                self.session
                                    .store
                                    .update_node(node_id, |n| n.disabled = !n.disabled);
                                close = true;
                            }
                            ui.separator();
                            if ui
                                .button(RichText::new("Delete").color(ACCENT_RED))
                                .clicked()
                            {
                                self.session.store.remove_node(node_id);
                                close = true;
                            }
                        });
                    });
                if close || ctx.input(|i| i.pointer.primary_clicked()) {
                    self.context_menu.close();
                }
            }
            ContextMenu::Canvas { at } => {
                let mut close = false;
                egui::Area::new(egui::Id::new("canvas_context_menu"))
                    .fixed_pos(egui::pos2(at.0, at.1))
                    .order(egui::Order::Foreground)
                    .show(ctx, |ui| {
                        egui::Frame::popup(ui.style()).show(ui, |ui| {
                            ui.set_min_width(180.0);
                            let mut node_to_add: Option<NodeConfig> = None;
                            ui.menu_button("Add step", |ui| {
                                for category in [
                                    NodeCategory::Trigger,
                                    NodeCategory::Action,
                                    NodeCategory::Logic,
                                    NodeCategory::Ai,
                                    NodeCategory::Transform,
                                ] {
                                    let color = theme::category_color(category);
                                    let header = format!(
                                        "{} {}",
                                        category.icon(),
                                        category.display_name()
                                    );
                                    ui.menu_button(RichText::new(header).color(color), |ui| {
                                        for config in NodeConfig::all_defaults()
                                            .into_iter()
                                            .filter(|c| c.category() == category)
                                        {
                                            let label = format!(
                                                "{} {}",
                                                config.icon(),
                                                config.display_name()
                                            );
                                            if ui.button(label).clicked() {
                                                node_to_add = Some(config);
                                                ui.close();
                                            }
                                        }
                                    });
                                }
                            });
                            if let Some(config) = node_to_add {
                                let position =
                                    self.session.store.viewport().screen_to_graph(at);
                                let id = self.session.store.add_node(config, position);
                                self.session.store.deselect_all();
                                self.session.store.set_selected(id, true);
                                close = true;
                            }
                            ui.separator();
                            if ui.button("Select all").clicked() {
                                self.session.store.select_all();
                                close = true;
                            }
                            if ui.button("Tidy layout").clicked() {
                                self.tidy_layout();
                                close = true;
                            }
                            if ui.button("Reset view").clicked() {
                                self.editor.reset_view();
                                self.session.store.set_viewport(Viewport::default());
                                close = true;
                            }
                        });
                    });
                if close || ctx.input(|i| i.pointer.primary_clicked()) {
                    self.context_menu.close();
                }
            }
        }
    }

    /// Lay nodes out left to right in run order.
    fn tidy_layout(&mut self) {
        let order = self.session.store.graph().walk_order();
        for (i, id) in order.into_iter().enumerate() {
            self.session
                .store
                .move_node(id, Position::new(120.0 + i as f32 * 240.0, 200.0));
        }
    }

    // =========================================================================
    // Inspector
    // =========================================================================

    fn show_inspector(&mut self, ctx: &egui::Context) {
        let Some(node_id) = self.session.store.first_selected() else {
            return;
        };
        let Some(original) = self.session.store.graph().find_node(node_id).cloned() else {
            return;
        };

        let report = self.session.validation();
        let mut edited = original.clone();
        let mut duplicate = false;
        let mut delete = false;

        egui::SidePanel::right("inspector")
            .frame(theme::inspector_frame())
            .exact_width(300.0)
            .resizable(false)
            .show(ctx, |ui| {
                let color = theme::category_color(edited.config.category());
                ui.horizontal(|ui| {
                    ui.colored_label(color, RichText::new(edited.config.icon()).size(20.0));
                    ui.label(
                        RichText::new(edited.config.display_name())
                            .size(11.0)
                            .color(color),
                    );
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("🗑").on_hover_text("Delete step").clicked() {
                            delete = true;
                        }
                        if ui.button("⧉").on_hover_text("Duplicate step").clicked() {
                            duplicate = true;
                        }
                    });
                });

                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.label("Label:");
                    ui.add(egui::TextEdit::singleline(&mut edited.label).desired_width(170.0));
                });
                ui.horizontal(|ui| {
                    ui.label("Enabled:");
                    let mut enabled = !edited.disabled;
                    if ui.checkbox(&mut enabled, "").changed() {
                        edited.disabled = !enabled;
                    }
                });

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        self.show_config_editor(ui, node_id, &mut edited.config);

                        let issues = report.issues_for(node_id);
                        if !issues.is_empty() {
                            ui.add_space(12.0);
                            ui.separator();
                            for issue in issues {
                                ui.colored_label(
                                    ACCENT_RED,
                                    RichText::new(format!("⚠ {}", issue.message)).size(11.0),
                                );
                            }
                        }
                    });
            });

        if edited != original {
            self.session.store.update_node(node_id, |n| *n = edited);
        }
        if duplicate {
            if let Some(new_id) = self.session.store.duplicate_node(node_id) {
                self.session.store.deselect_all();
                self.session.store.set_selected(new_id, true);
            }
        }
        if delete {
            self.session.store.remove_node(node_id);
        }
    }

    fn show_config_editor(&mut self, ui: &mut egui::Ui, node_id: Uuid, config: &mut NodeConfig) {
        match config {
            NodeConfig::TriggerEvent(p) => show_event_trigger(ui, p),
            NodeConfig::TriggerSchedule(p) => show_schedule_trigger(ui, p),
            NodeConfig::TriggerManual(_) => {
                ui.label(
                    RichText::new("Runs when you press Test or Run now.")
                        .size(11.0)
                        .color(TEXT_SECONDARY),
                );
            }
            NodeConfig::TriggerAiTool(p) => show_ai_tool_trigger(ui, p),
            NodeConfig::ActionHttp(p) => show_http_action(ui, p),
            NodeConfig::ActionEmail(p) => show_email_action(ui, p),
            NodeConfig::ActionUpdateLead(p) => show_update_lead(ui, p),
            NodeConfig::ActionTask(p) => show_task_action(ui, p),
            NodeConfig::ActionNotify(p) => show_notify_action(ui, p),
            NodeConfig::SupabaseQuery(p) => self.show_supabase_action(ui, node_id, p),
            NodeConfig::LogicCondition(p) => show_condition(ui, p),
            NodeConfig::LogicDelay(p) => show_delay(ui, p),
            NodeConfig::LogicStop(p) => show_stop(ui, p),
            NodeConfig::AiGenerate(p) => show_ai_generate(ui, p),
            NodeConfig::AiClassify(p) => show_ai_classify(ui, p),
            NodeConfig::AiExtract(p) => show_ai_extract(ui, p),
            NodeConfig::TransformSetVariable(p) => show_set_variable(ui, p),
            NodeConfig::Legacy { tag, raw } => {
                ui.colored_label(
                    TEXT_SECONDARY,
                    format!("Unknown step type \"{}\".", tag),
                );
                ui.label(
                    RichText::new(
                        "This step came from a newer or older schema. Its settings are \
                         preserved exactly and will be saved back unchanged.",
                    )
                    .size(11.0)
                    .color(TEXT_MUTED),
                );
                ui.add_space(8.0);
                let pretty = serde_json::to_string_pretty(raw)
                    .unwrap_or_else(|_| "<unprintable payload>".to_string());
                ui.add(
                    egui::TextEdit::multiline(&mut pretty.as_str())
                        .font(egui::TextStyle::Monospace)
                        .desired_width(f32::INFINITY),
                );
            }
        }
    }

    fn show_supabase_action(
        &mut self,
        ui: &mut egui::Ui,
        node_id: Uuid,
        p: &mut SupabaseActionParams,
    ) {
        text_row(ui, "Table:", &mut p.table);
        ui.horizontal(|ui| {
            ui.label("Operation:");
            egui::ComboBox::from_id_salt("table_operation")
                .selected_text(p.operation.as_str())
                .show_ui(ui, |ui| {
                    for op in [
                        TableOperation::Insert,
                        TableOperation::Update,
                        TableOperation::Upsert,
                        TableOperation::Delete,
                    ] {
                        ui.selectable_value(&mut p.operation, op, op.as_str());
                    }
                });
        });

        ui.label("Payload (JSON):");
        if self.json_buffer_node != Some(node_id) {
            self.json_buffer =
                serde_json::to_string_pretty(&p.payload).unwrap_or_else(|_| "{}".to_string());
            self.json_buffer_node = Some(node_id);
            self.json_error = None;
        }
        let changed = ui
            .add(
                egui::TextEdit::multiline(&mut self.json_buffer)
                    .font(egui::TextStyle::Monospace)
                    .desired_rows(5)
                    .desired_width(f32::INFINITY),
            )
            .changed();
        if changed {
            match serde_json::from_str(&self.json_buffer) {
                Ok(value) => {
                    p.payload = value;
                    self.json_error = None;
                }
                Err(e) => self.json_error = Some(e.to_string()),
            }
        }
        if let Some(error) = &self.json_error {
            ui.colored_label(ACCENT_RED, RichText::new(error).size(10.0));
        }
    }

    // =========================================================================
    // Executions drawer
    // =========================================================================

    fn show_executions_drawer(&mut self, ctx: &egui::Context) {
        if !self.executions_open {
            return;
        }

        egui::TopBottomPanel::bottom("executions_drawer")
            .frame(theme::executions_drawer_frame())
            .resizable(true)
            .default_height(240.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Executions");
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("✕").clicked() {
                            self.executions_open = false;
                        }
                        if ui.button("Refresh").clicked() {
                            self.bridge.send(BackendRequest::FetchExecutions {
                                automation_id: self.session.automation().id,
                            });
                        }
                    });
                });
                ui.separator();

                ui.columns(2, |columns| {
                    self.show_execution_list(&mut columns[0]);
                    self.show_trace(&mut columns[1]);
                });
            });
    }

    fn show_logs_drawer(&mut self, ctx: &egui::Context) {
        if !self.logs_open {
            return;
        }

        egui::TopBottomPanel::bottom("logs_drawer")
            .frame(theme::executions_drawer_frame())
            .resizable(true)
            .default_height(160.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Log");
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("✕").clicked() {
                            self.logs_open = false;
                        }
                        if ui.button("Clear").clicked() {
                            self.logs.clear();
                        }
                    });
                });
                ui.separator();

                egui::ScrollArea::vertical()
                    .id_salt("activity_log")
                    .auto_shrink([false; 2])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in &self.logs {
                            ui.label(RichText::new(line).size(12.0).color(TEXT_SECONDARY));
                        }
                    });
            });
    }

    fn show_execution_list(&mut self, ui: &mut egui::Ui) {
        if self.tracker.is_empty() {
            ui.label(
                RichText::new("No executions yet. Press Test to run this automation.")
                    .color(TEXT_MUTED),
            );
            return;
        }

        let mut selected = self.selected_execution;
        egui::ScrollArea::vertical()
            .id_salt("execution_list")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for execution in self.tracker.iter() {
                    let color = theme::execution_status_color(execution.status);
                    let mode = if execution.test_mode { " (test)" } else { "" };
                    let label = format!(
                        "{} {}{} · {}",
                        execution.status.display_name(),
                        execution.trigger_type.display_name(),
                        mode,
                        execution.started_at.format("%H:%M:%S"),
                    );
                    let is_selected = selected == Some(execution.id);
                    if ui
                        .selectable_label(is_selected, RichText::new(label).color(color))
                        .clicked()
                    {
                        selected = Some(execution.id);
                    }
                }
            });

        if selected != self.selected_execution {
            self.selected_execution = selected;
            self.trace = None;
            if let Some(id) = selected
                && let Some(execution) = self.tracker.get(id)
            {
                let view = ExecutionView::build(execution);
                self.set_trace(view);
            }
        }
    }

    fn show_trace(&mut self, ui: &mut egui::Ui) {
        let Some(view) = &mut self.trace else {
            ui.label(RichText::new("Select an execution to inspect.").color(TEXT_MUTED));
            return;
        };

        ui.horizontal(|ui| {
            ui.colored_label(
                theme::execution_status_color(view.status),
                view.status.display_name(),
            );
            ui.label(
                RichText::new(view.started_at.format("%Y-%m-%d %H:%M:%S").to_string())
                    .size(11.0)
                    .color(TEXT_SECONDARY),
            );
            if let Some(duration) = view.duration_label() {
                ui.label(RichText::new(duration).size(11.0).color(TEXT_SECONDARY));
            }
            ui.label(
                RichText::new(view.trigger_type.display_name())
                    .size(11.0)
                    .color(TEXT_MUTED),
            );
            if view.test_mode {
                ui.label(RichText::new("test run").size(11.0).color(TEXT_MUTED));
            }
        });

        if view.is_empty() {
            ui.label(RichText::new("No execution data").color(TEXT_MUTED));
            return;
        }

        if let Some(error) = &view.error {
            ui.colored_label(ACCENT_RED, RichText::new(error).size(11.0));
        }

        let mut toggle: Option<usize> = None;
        egui::ScrollArea::vertical()
            .id_salt("trace_rows")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for row in &view.rows {
                    let status_color = theme::node_run_status_color(row.status);
                    let arrow = if row.expanded { "▼" } else { "▶" };
                    let header = format!(
                        "{} {} {}.  {} · {} · {}ms",
                        arrow,
                        row.status.icon(),
                        row.seq,
                        row.node_type,
                        row.short_id,
                        row.duration_ms,
                    );
                    if ui
                        .add(
                            Button::new(RichText::new(header).size(11.0).color(status_color))
                                .frame(false),
                        )
                        .clicked()
                    {
                        toggle = Some(row.seq);
                    }

                    if row.expanded {
                        ui.indent(row.seq, |ui| {
                            if let Some(error) = &row.error {
                                ui.colored_label(ACCENT_RED, RichText::new(error).size(11.0));
                            }
                            if let Some(preview) = &row.output_preview {
                                ui.add(
                                    egui::TextEdit::multiline(&mut preview.as_str())
                                        .font(egui::TextStyle::Monospace)
                                        .desired_width(f32::INFINITY),
                                );
                            }
                            if row.error.is_none() && row.output_preview.is_none() {
                                ui.label(RichText::new("No output").size(11.0).color(TEXT_MUTED));
                            }
                        });
                    }
                }

                if let Some(trigger_data) = &view.trigger_data {
                    ui.add_space(8.0);
                    ui.collapsing("Trigger data", |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut trigger_data.as_str())
                                .font(egui::TextStyle::Monospace)
                                .desired_width(f32::INFINITY),
                        );
                    });
                }
                if let Some(variables) = &view.variables {
                    ui.add_space(8.0);
                    ui.collapsing("Variables", |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut variables.as_str())
                                .font(egui::TextStyle::Monospace)
                                .desired_width(f32::INFINITY),
                        );
                    });
                }
            });

        if let Some(seq) = toggle {
            view.toggle_row(seq);
        }
    }

    // =========================================================================
    // Modals
    // =========================================================================

    fn show_new_automation_dialog(&mut self, ctx: &egui::Context) {
        if !self.show_new_dialog {
            return;
        }
        let mut open = true;
        let mut create: Option<(String, TriggerType, Option<String>)> = None;

        egui::Window::new("New automation")
            .collapsible(false)
            .resizable(false)
            .default_width(380.0)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Name:");
                    ui.add(egui::TextEdit::singleline(&mut self.new_name).desired_width(240.0));
                });
                ui.add_space(8.0);
                ui.label("Start from a template:");
                ui.add_space(4.0);

                if ui
                    .selectable_label(self.new_template.is_none(), "✨ Blank automation")
                    .clicked()
                {
                    self.new_template = None;
                }
                for template in Template::builtin() {
                    let selected = self.new_template == Some(template.slug);
                    let label = format!("{} {}", template.icon, template.name);
                    if ui
                        .selectable_label(selected, label)
                        .on_hover_text(template.description)
                        .clicked()
                    {
                        self.new_template = Some(template.slug);
                    }
                }

                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    let create_btn = Button::new(RichText::new("Create").color(Color32::WHITE))
                        .fill(ACCENT_CORAL)
                        .corner_radius(6.0);
                    if ui
                        .add_enabled(!self.new_name.trim().is_empty(), create_btn)
                        .clicked()
                    {
                        let trigger_type = self
                            .new_template
                            .and_then(Template::by_slug)
                            .map(|t| t.trigger_type)
                            .unwrap_or(TriggerType::Manual);
                        create = Some((
                            self.new_name.trim().to_string(),
                            trigger_type,
                            self.new_template.map(str::to_string),
                        ));
                    }
                    if ui.button("Cancel").clicked() {
                        self.show_new_dialog = false;
                    }
                });
            });

        if let Some((name, trigger_type, template)) = create {
            self.bridge.send(BackendRequest::Create {
                name,
                trigger_type,
                template,
            });
            self.show_new_dialog = false;
        }
        if !open {
            self.show_new_dialog = false;
        }
    }

    fn show_delete_confirm(&mut self, ctx: &egui::Context) {
        let Some(confirm) = &mut self.delete_confirm else {
            return;
        };

        let mut cancel = false;
        let mut delete = false;

        egui::Window::new("Delete automation")
            .collapsible(false)
            .resizable(false)
            .default_width(360.0)
            .show(ctx, |ui| {
                ui.label(format!(
                    "This permanently deletes \"{}\" and its execution history.",
                    confirm.expected()
                ));
                ui.add_space(8.0);
                ui.label(
                    RichText::new("Type the automation name to confirm:")
                        .size(11.0)
                        .color(TEXT_SECONDARY),
                );
                ui.add(egui::TextEdit::singleline(&mut confirm.typed).desired_width(240.0));
                ui.add_space(12.0);

                ui.horizontal(|ui| {
                    let delete_btn = Button::new(RichText::new("Delete").color(Color32::WHITE))
                        .fill(ACCENT_RED)
                        .corner_radius(6.0);
                    if ui.add_enabled(confirm.confirmed(), delete_btn).clicked() {
                        delete = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if delete {
            self.bridge.send(BackendRequest::Delete {
                automation_id: self.session.automation().id,
            });
            self.delete_confirm = None;
        } else if cancel {
            self.delete_confirm = None;
        }
    }
}

impl eframe::App for FlowweaveApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_backend_events();
        self.handle_shortcuts(ctx);

        self.show_toolbar(ctx);
        self.show_palette(ctx);
        self.show_inspector(ctx);
        self.show_executions_drawer(ctx);
        self.show_logs_drawer(ctx);
        self.show_canvas(ctx);

        self.show_new_automation_dialog(ctx);
        self.show_delete_confirm(ctx);

        // Keep polling visuals fresh while a run is in flight.
        let running = self.tracker.iter().any(|e| !e.status.is_terminal());
        if running || self.session.is_saving() {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }
}

// =============================================================================
// Per-type config editors
// =============================================================================

fn text_row(ui: &mut egui::Ui, label: &str, value: &mut String) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::TextEdit::singleline(value).desired_width(180.0));
    });
}

fn optional_text_row(ui: &mut egui::Ui, label: &str, value: &mut Option<String>) {
    let mut buffer = value.clone().unwrap_or_default();
    ui.horizontal(|ui| {
        ui.label(label);
        if ui
            .add(egui::TextEdit::singleline(&mut buffer).desired_width(180.0))
            .changed()
        {
            *value = if buffer.is_empty() {
                None
            } else {
                Some(buffer.clone())
            };
        }
    });
}

fn string_list_editor(ui: &mut egui::Ui, items: &mut Vec<String>, add_label: &str) {
    let mut remove: Option<usize> = None;
    for (i, item) in items.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(item).desired_width(180.0));
            if ui.small_button("✕").clicked() {
                remove = Some(i);
            }
        });
    }
    if let Some(i) = remove {
        items.remove(i);
    }
    if ui.small_button(format!("+ {add_label}")).clicked() {
        items.push(String::new());
    }
}

fn show_event_trigger(ui: &mut egui::Ui, p: &mut EventTriggerParams) {
    ui.horizontal(|ui| {
        ui.label("Event:");
        ui.add(
            egui::TextEdit::singleline(&mut p.event)
                .hint_text("lead.created")
                .desired_width(180.0),
        );
    });
    ui.label(
        RichText::new("Fires when this event is published in your workspace.")
            .size(11.0)
            .color(TEXT_MUTED),
    );
}

fn show_schedule_trigger(ui: &mut egui::Ui, p: &mut ScheduleTriggerParams) {
    ui.horizontal(|ui| {
        ui.label("Cron:");
        ui.add(
            egui::TextEdit::singleline(&mut p.cron)
                .hint_text("0 9 * * 1-5")
                .font(egui::TextStyle::Monospace)
                .desired_width(180.0),
        );
    });
    match cron::parse(&p.cron) {
        Ok(_) => {
            ui.label(
                RichText::new(cron::humanize(&p.cron))
                    .size(11.0)
                    .color(ACCENT_GREEN),
            );
        }
        Err(e) => {
            ui.colored_label(ACCENT_RED, RichText::new(e.to_string()).size(11.0));
        }
    }
    text_row(ui, "Timezone:", &mut p.timezone);
}

fn show_ai_tool_trigger(ui: &mut egui::Ui, p: &mut AiToolTriggerParams) {
    text_row(ui, "Tool name:", &mut p.tool_name);
    ui.label("Description:");
    ui.add(
        egui::TextEdit::multiline(&mut p.description)
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );
}

fn show_http_action(ui: &mut egui::Ui, p: &mut HttpActionParams) {
    ui.horizontal(|ui| {
        ui.label("Method:");
        egui::ComboBox::from_id_salt("http_method")
            .selected_text(p.method.as_str())
            .show_ui(ui, |ui| {
                for method in [
                    HttpMethod::Get,
                    HttpMethod::Post,
                    HttpMethod::Put,
                    HttpMethod::Patch,
                    HttpMethod::Delete,
                ] {
                    ui.selectable_value(&mut p.method, method, method.as_str());
                }
            });
    });
    ui.horizontal(|ui| {
        ui.label("URL:");
        ui.add(
            egui::TextEdit::singleline(&mut p.url)
                .hint_text("https://")
                .desired_width(200.0),
        );
    });

    ui.label("Headers:");
    let mut remove: Option<usize> = None;
    for (i, (key, value)) in p.headers.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(key).desired_width(90.0));
            ui.add(egui::TextEdit::singleline(value).desired_width(90.0));
            if ui.small_button("✕").clicked() {
                remove = Some(i);
            }
        });
    }
    if let Some(i) = remove {
        p.headers.remove(i);
    }
    if ui.small_button("+ Header").clicked() {
        p.headers.push((String::new(), String::new()));
    }

    let mut body = p.body.clone().unwrap_or_default();
    ui.label("Body:");
    if ui
        .add(
            egui::TextEdit::multiline(&mut body)
                .font(egui::TextStyle::Monospace)
                .desired_rows(3)
                .desired_width(f32::INFINITY),
        )
        .changed()
    {
        p.body = if body.is_empty() { None } else { Some(body) };
    }
}

fn show_email_action(ui: &mut egui::Ui, p: &mut EmailActionParams) {
    text_row(ui, "To:", &mut p.to);
    text_row(ui, "Subject:", &mut p.subject);
    ui.label("Body:");
    ui.add(
        egui::TextEdit::multiline(&mut p.body)
            .desired_rows(4)
            .desired_width(f32::INFINITY),
    );
}

fn show_update_lead(ui: &mut egui::Ui, p: &mut UpdateLeadParams) {
    ui.label("Field updates:");
    let mut remove: Option<usize> = None;
    for (i, mapping) in p.fields.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut mapping.field)
                    .hint_text("field")
                    .desired_width(85.0),
            );
            ui.label("=");
            ui.add(
                egui::TextEdit::singleline(&mut mapping.value)
                    .hint_text("value")
                    .desired_width(85.0),
            );
            if ui.small_button("✕").clicked() {
                remove = Some(i);
            }
        });
    }
    if let Some(i) = remove {
        p.fields.remove(i);
    }
    if ui.small_button("+ Field").clicked() {
        p.fields.push(FieldMapping::default());
    }
}

fn show_task_action(ui: &mut egui::Ui, p: &mut TaskActionParams) {
    text_row(ui, "Title:", &mut p.title);
    optional_text_row(ui, "Assignee:", &mut p.assignee);
    ui.horizontal(|ui| {
        ui.label("Due in days:");
        let mut days = p.due_in_days.unwrap_or(0);
        if ui
            .add(egui::DragValue::new(&mut days).range(0..=365))
            .changed()
        {
            p.due_in_days = (days > 0).then_some(days);
        }
    });
}

fn show_notify_action(ui: &mut egui::Ui, p: &mut NotifyActionParams) {
    ui.label("Message:");
    ui.add(
        egui::TextEdit::multiline(&mut p.message)
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );
    optional_text_row(ui, "Channel:", &mut p.channel);
}

fn show_condition(ui: &mut egui::Ui, p: &mut ConditionParams) {
    text_row(ui, "Field:", &mut p.field);
    ui.horizontal(|ui| {
        ui.label("Operator:");
        egui::ComboBox::from_id_salt("condition_operator")
            .selected_text(p.operator.as_str())
            .show_ui(ui, |ui| {
                for op in [
                    ConditionOperator::Equals,
                    ConditionOperator::NotEquals,
                    ConditionOperator::GreaterThan,
                    ConditionOperator::LessThan,
                    ConditionOperator::Contains,
                    ConditionOperator::IsEmpty,
                    ConditionOperator::IsNotEmpty,
                ] {
                    ui.selectable_value(&mut p.operator, op, op.as_str());
                }
            });
    });
    if !p.operator.is_unary() {
        text_row(ui, "Value:", &mut p.value);
    }
    ui.label(
        RichText::new("True takes the first output, false the second.")
            .size(11.0)
            .color(TEXT_MUTED),
    );
}

fn show_delay(ui: &mut egui::Ui, p: &mut DelayParams) {
    ui.horizontal(|ui| {
        ui.label("Wait:");
        ui.add(egui::DragValue::new(&mut p.duration).range(1..=10_000));
        egui::ComboBox::from_id_salt("delay_unit")
            .selected_text(p.unit.as_str())
            .show_ui(ui, |ui| {
                for unit in [
                    DelayUnit::Seconds,
                    DelayUnit::Minutes,
                    DelayUnit::Hours,
                    DelayUnit::Days,
                ] {
                    ui.selectable_value(&mut p.unit, unit, unit.as_str());
                }
            });
    });
}

fn show_stop(ui: &mut egui::Ui, p: &mut StopParams) {
    optional_text_row(ui, "Reason:", &mut p.reason);
    ui.label(
        RichText::new("Ends the run; later steps are skipped.")
            .size(11.0)
            .color(TEXT_MUTED),
    );
}

fn show_ai_generate(ui: &mut egui::Ui, p: &mut AiGenerateParams) {
    ui.label("Prompt:");
    ui.add(
        egui::TextEdit::multiline(&mut p.prompt)
            .desired_rows(4)
            .desired_width(f32::INFINITY),
    );
    optional_text_row(ui, "Output variable:", &mut p.output_variable);
}

fn show_ai_classify(ui: &mut egui::Ui, p: &mut AiClassifyParams) {
    text_row(ui, "Input:", &mut p.input);
    ui.label("Categories:");
    string_list_editor(ui, &mut p.categories, "Category");
}

fn show_ai_extract(ui: &mut egui::Ui, p: &mut AiExtractParams) {
    text_row(ui, "Input:", &mut p.input);
    ui.label("Fields to extract:");
    string_list_editor(ui, &mut p.fields, "Field");
}

fn show_set_variable(ui: &mut egui::Ui, p: &mut SetVariableParams) {
    text_row(ui, "Name:", &mut p.name);
    text_row(ui, "Value:", &mut p.value);
}
