//! Single mutable source of truth for the editing session.
//!
//! Every component reads the graph from here and mutates it only through the
//! operation set below, so the invariants (no dangling edges, history push on
//! every committed mutation) live in one place. All operations are
//! synchronous and total: invalid references are ignored, never raised — the
//! UI only ever hands us ids it just rendered.

use flowweave_core::{AutomationEdge, AutomationNode, Graph, NodeConfig, Position};
use uuid::Uuid;

use crate::Viewport;

/// Bounded depth of the undo stack.
pub const HISTORY_CAP: usize = 50;

/// Snapshot stack with a cursor. Index 0 is the oldest retained state; the
/// cursor points at the snapshot matching the live graph.
#[derive(Debug)]
struct History {
    snapshots: Vec<Graph>,
    cursor: usize,
}

impl History {
    fn new(initial: Graph) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    fn push(&mut self, snapshot: Graph) {
        // A new mutation invalidates anything that was undone.
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        self.cursor += 1;
        if self.snapshots.len() > HISTORY_CAP {
            self.snapshots.remove(0);
            self.cursor -= 1;
        }
    }

    fn undo(&mut self) -> Option<Graph> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.snapshots[self.cursor].clone())
    }

    fn redo(&mut self) -> Option<Graph> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.snapshots[self.cursor].clone())
    }

    fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }
}

pub struct GraphStore {
    graph: Graph,
    history: History,
    viewport: Viewport,
    /// Monotonic count of committed mutations (including undo/redo); the
    /// session compares this against the last-saved revision for dirtiness.
    revision: u64,
}

impl GraphStore {
    pub fn new(graph: Graph) -> Self {
        let history = History::new(persistent(&graph));
        Self {
            graph,
            history,
            viewport: Viewport::default(),
            revision: 0,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Clone of the persistent graph state (selection stripped), for saving.
    pub fn snapshot(&self) -> Graph {
        persistent(&self.graph)
    }

    /// Replace the graph wholesale (e.g. after loading from the backend) and
    /// restart history from it.
    pub fn load(&mut self, graph: Graph) {
        self.history = History::new(persistent(&graph));
        self.graph = graph;
        self.revision += 1;
    }

    // -- committed mutations ------------------------------------------------

    /// Add a node of the given config at `position`. Never fails; a
    /// [`NodeConfig::Legacy`] config produces an inert placeholder node.
    pub fn add_node(&mut self, config: NodeConfig, position: Position) -> Uuid {
        let node = AutomationNode::new(config, position);
        let id = node.id;
        self.graph.nodes.push(node);
        self.commit();
        id
    }

    /// Clone a node's config (deep copy) into a new node offset from the
    /// original. Unknown ids are ignored.
    pub fn duplicate_node(&mut self, id: Uuid) -> Option<Uuid> {
        let source = self.graph.find_node(id)?;
        let mut copy = AutomationNode::new(
            source.config.clone(),
            source.position.offset_for_duplicate(),
        );
        copy.label = source.label.clone();
        copy.disabled = source.disabled;
        let copy_id = copy.id;
        self.graph.nodes.push(copy);
        self.commit();
        Some(copy_id)
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: Uuid) {
        if !self.graph.has_node(id) {
            return;
        }
        self.graph.remove_node(id);
        self.commit();
    }

    pub fn remove_edge(&mut self, id: Uuid) {
        if !self.graph.edges.iter().any(|e| e.id == id) {
            return;
        }
        self.graph.remove_edge(id);
        self.commit();
    }

    /// Connect two nodes. Self-loops and unknown endpoints are ignored;
    /// parallel edges between the same pair are allowed.
    pub fn connect(
        &mut self,
        source: Uuid,
        target: Uuid,
        source_handle: Option<String>,
    ) -> Option<Uuid> {
        if source == target {
            return None;
        }
        if !self.graph.has_node(source) || !self.graph.has_node(target) {
            return None;
        }
        let edge = AutomationEdge::new(source, target, source_handle);
        let id = edge.id;
        self.graph.edges.push(edge);
        self.commit();
        Some(id)
    }

    /// Commit a node's final position after a drag. Intermediate drag frames
    /// should use `move_node_transient`.
    pub fn move_node(&mut self, id: Uuid, position: Position) {
        let Some(node) = self.graph.find_node_mut(id) else {
            return;
        };
        node.position = position;
        self.commit();
    }

    /// Position update without a history entry, for in-flight drags.
    pub fn move_node_transient(&mut self, id: Uuid, position: Position) {
        if let Some(node) = self.graph.find_node_mut(id) {
            node.position = position;
        }
    }

    /// Edit a node in place (label, disabled flag, config fields) as one
    /// committed mutation.
    pub fn update_node(&mut self, id: Uuid, edit: impl FnOnce(&mut AutomationNode)) {
        let Some(node) = self.graph.find_node_mut(id) else {
            return;
        };
        edit(node);
        self.commit();
    }

    /// Remove every selected node (with its edges) as a single history entry.
    pub fn remove_selected(&mut self) {
        let selected: Vec<Uuid> = self.selected_ids();
        if selected.is_empty() {
            return;
        }
        for id in selected {
            self.graph.remove_node(id);
        }
        self.commit();
    }

    // -- transient state ----------------------------------------------------

    pub fn select_all(&mut self) {
        for node in &mut self.graph.nodes {
            node.selected = true;
        }
    }

    pub fn deselect_all(&mut self) {
        for node in &mut self.graph.nodes {
            node.selected = false;
        }
    }

    pub fn set_selected(&mut self, id: Uuid, selected: bool) {
        if let Some(node) = self.graph.find_node_mut(id) {
            node.selected = selected;
        }
    }

    pub fn selected_ids(&self) -> Vec<Uuid> {
        self.graph
            .nodes
            .iter()
            .filter(|n| n.selected)
            .map(|n| n.id)
            .collect()
    }

    pub fn first_selected(&self) -> Option<Uuid> {
        self.graph.nodes.iter().find(|n| n.selected).map(|n| n.id)
    }

    /// Camera state; excluded from history and from the persisted automation.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    // -- history ------------------------------------------------------------

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(graph) => {
                self.graph = graph;
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(graph) => {
                self.graph = graph;
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    fn commit(&mut self) {
        self.history.push(persistent(&self.graph));
        self.revision += 1;
    }
}

/// Persistent projection of the graph: selection is transient UI state and
/// never enters history or saves.
fn persistent(graph: &Graph) -> Graph {
    let mut copy = graph.clone();
    for node in &mut copy.nodes {
        node.selected = false;
    }
    copy
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use flowweave_core::{
        EventTriggerParams, HttpActionParams, ManualTriggerParams, NotifyActionParams,
    };

    fn store_with_two_nodes() -> (GraphStore, Uuid, Uuid) {
        let mut store = GraphStore::new(Graph::default());
        let a = store.add_node(
            NodeConfig::TriggerEvent(EventTriggerParams {
                event: "lead.created".to_string(),
            }),
            Position::new(0.0, 0.0),
        );
        let b = store.add_node(
            NodeConfig::ActionHttp(HttpActionParams::default()),
            Position::new(200.0, 0.0),
        );
        (store, a, b)
    }

    #[test]
    fn duplicate_is_a_deep_copy() {
        let (mut store, _, b) = store_with_two_nodes();
        let copy = store.duplicate_node(b).unwrap();

        // Configs are equal at duplication time.
        let original_config = store.graph().find_node(b).unwrap().config.clone();
        assert_eq!(store.graph().find_node(copy).unwrap().config, original_config);

        // Mutating the duplicate never touches the original.
        store.update_node(copy, |n| {
            if let NodeConfig::ActionHttp(p) = &mut n.config {
                p.url = "https://example.com/hook".to_string();
            }
        });
        match &store.graph().find_node(b).unwrap().config {
            NodeConfig::ActionHttp(p) => assert!(p.url.is_empty()),
            other => panic!("unexpected config {other:?}"),
        }

        // And it is visibly offset.
        let original = store.graph().find_node(b).unwrap().position;
        let duplicate = store.graph().find_node(copy).unwrap().position;
        assert_ne!(original, duplicate);
    }

    #[test]
    fn transient_drag_then_commit_is_one_undo_step() {
        let (mut store, a, _) = store_with_two_nodes();
        let before = store.revision();

        // In-flight drag frames: position moves, nothing is committed.
        store.move_node_transient(a, Position::new(40.0, 10.0));
        store.move_node_transient(a, Position::new(80.0, 20.0));
        assert_eq!(store.revision(), before);

        // Release commits the final position as a single history entry.
        store.move_node(a, Position::new(120.0, 30.0));
        assert_eq!(store.revision(), before + 1);
        assert_eq!(
            store.graph().find_node(a).unwrap().position,
            Position::new(120.0, 30.0)
        );

        assert!(store.undo());
        assert_eq!(
            store.graph().find_node(a).unwrap().position,
            Position::new(0.0, 0.0)
        );
    }

    #[test]
    fn connect_rejects_self_loops_and_unknown_ids() {
        let (mut store, a, _) = store_with_two_nodes();
        assert!(store.connect(a, a, None).is_none());
        assert!(store.connect(a, Uuid::new_v4(), None).is_none());
        assert!(store.graph().edges.is_empty());
    }

    #[test]
    fn connect_allows_parallel_edges() {
        let (mut store, a, b) = store_with_two_nodes();
        assert!(store.connect(a, b, None).is_some());
        assert!(store.connect(a, b, None).is_some());
        assert_eq!(store.graph().edges.len(), 2);
    }

    #[test]
    fn no_dangling_edges_after_any_removal() {
        let (mut store, a, b) = store_with_two_nodes();
        let c = store.add_node(
            NodeConfig::ActionNotify(NotifyActionParams::default()),
            Position::new(400.0, 0.0),
        );
        store.connect(a, b, None);
        store.connect(b, c, None);
        store.connect(a, c, None);

        store.remove_node(b);

        for edge in &store.graph().edges {
            assert!(store.graph().has_node(edge.source));
            assert!(store.graph().has_node(edge.target));
        }
        assert_eq!(store.graph().edges.len(), 1);
    }

    #[test]
    fn undo_then_redo_restores_each_state() {
        // Inverse law: n mutations, n undos back to the start, n redos back
        // to the end.
        let mut store = GraphStore::new(Graph::default());
        let a = store.add_node(
            NodeConfig::TriggerManual(ManualTriggerParams::default()),
            Position::new(10.0, 10.0),
        );
        let b = store.add_node(
            NodeConfig::ActionHttp(HttpActionParams::default()),
            Position::new(20.0, 20.0),
        );
        store.connect(a, b, None);
        store.move_node(b, Position::new(50.0, 60.0));
        let end_state = store.snapshot();

        for _ in 0..4 {
            assert!(store.undo());
        }
        assert!(store.graph().nodes.is_empty());
        assert!(!store.undo(), "history floor should be a no-op");

        for _ in 0..4 {
            assert!(store.redo());
        }
        assert_eq!(store.snapshot(), end_state);
        assert!(!store.redo(), "history ceiling should be a no-op");
    }

    #[test]
    fn new_mutation_discards_the_redo_branch() {
        let (mut store, _, _) = store_with_two_nodes();
        store.undo();
        assert!(store.can_redo());

        store.add_node(
            NodeConfig::TriggerManual(ManualTriggerParams::default()),
            Position::default(),
        );
        assert!(!store.can_redo());
    }

    #[test]
    fn history_is_bounded() {
        let mut store = GraphStore::new(Graph::default());
        for i in 0..(HISTORY_CAP + 20) {
            store.add_node(
                NodeConfig::TriggerManual(ManualTriggerParams::default()),
                Position::new(i as f32, 0.0),
            );
        }
        let mut undos = 0;
        while store.undo() {
            undos += 1;
        }
        assert_eq!(undos, HISTORY_CAP - 1);
    }

    #[test]
    fn selection_and_viewport_do_not_touch_history() {
        let (mut store, a, _) = store_with_two_nodes();
        let revision = store.revision();

        store.select_all();
        store.set_selected(a, false);
        store.deselect_all();
        store.set_viewport(Viewport {
            pan: (120.0, -40.0),
            zoom: 2.0,
        });

        assert_eq!(store.revision(), revision);
        // Two adds happened; exactly two undos are available.
        assert!(store.undo());
        assert!(store.undo());
        assert!(!store.undo());
    }

    #[test]
    fn selection_is_stripped_from_saves() {
        let (mut store, a, _) = store_with_two_nodes();
        store.set_selected(a, true);
        assert!(store.snapshot().nodes.iter().all(|n| !n.selected));
        assert!(store.graph().find_node(a).unwrap().selected);
    }

    #[test]
    fn remove_selected_is_one_history_entry() {
        let (mut store, a, b) = store_with_two_nodes();
        store.connect(a, b, None);
        store.set_selected(a, true);
        store.set_selected(b, true);

        store.remove_selected();
        assert!(store.graph().nodes.is_empty());
        assert!(store.graph().edges.is_empty());

        // One undo restores both nodes and the edge.
        assert!(store.undo());
        assert_eq!(store.graph().nodes.len(), 2);
        assert_eq!(store.graph().edges.len(), 1);
    }
}
