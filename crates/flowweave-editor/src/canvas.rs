//! Canvas interaction state, kept free of any UI toolkit so the coordinate
//! math and menu/shortcut rules are testable on their own. The app crate
//! feeds it raw input and renders whatever it says.

use flowweave_core::Position;
use uuid::Uuid;

/// Camera over the graph plane: `screen = graph * zoom + pan`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub pan: (f32, f32),
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: (0.0, 0.0),
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Map a screen pixel to a graph coordinate under this viewport. Used for
    /// drop-position translation when a palette entry lands on the canvas.
    pub fn screen_to_graph(&self, screen: (f32, f32)) -> Position {
        Position {
            x: (screen.0 - self.pan.0) / self.zoom,
            y: (screen.1 - self.pan.1) / self.zoom,
        }
    }

    pub fn graph_to_screen(&self, graph: Position) -> (f32, f32) {
        (
            graph.x * self.zoom + self.pan.0,
            graph.y * self.zoom + self.pan.1,
        )
    }
}

/// At most one context menu is open at a time; opening one kind closes the
/// other.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ContextMenu {
    #[default]
    Closed,
    /// Node-scoped menu: duplicate, disable/enable, delete.
    Node { node_id: Uuid, at: (f32, f32) },
    /// Canvas menu: creation entries grouped by category, select all, fit view.
    Canvas { at: (f32, f32) },
}

impl ContextMenu {
    pub fn open_node(&mut self, node_id: Uuid, at: (f32, f32)) {
        *self = ContextMenu::Node { node_id, at };
    }

    pub fn open_canvas(&mut self, at: (f32, f32)) {
        *self = ContextMenu::Canvas { at };
    }

    pub fn close(&mut self) {
        *self = ContextMenu::Closed;
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, ContextMenu::Closed)
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Escape,
    Delete,
    Backspace,
    A,
    D,
}

/// What the toolbar/canvas should do in response to a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    /// Close any open menu, else clear the selection.
    Dismiss,
    DuplicateSelected,
    SelectAll,
    DeleteSelected,
}

/// Resolve a key press to an editor command.
///
/// Every shortcut is suppressed while focus is inside a text input, textarea,
/// or other editable widget; typing "a" into a label field must never select
/// all nodes. `command` covers both Ctrl and Cmd.
pub fn resolve_shortcut(
    key: EditorKey,
    command: bool,
    text_input_focused: bool,
) -> Option<EditorCommand> {
    if text_input_focused {
        return None;
    }
    match (key, command) {
        (EditorKey::Escape, _) => Some(EditorCommand::Dismiss),
        (EditorKey::D, true) => Some(EditorCommand::DuplicateSelected),
        (EditorKey::A, true) => Some(EditorCommand::SelectAll),
        (EditorKey::Delete, false) | (EditorKey::Backspace, false) => {
            Some(EditorCommand::DeleteSelected)
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_position_is_stable_under_a_fixed_viewport() {
        let viewport = Viewport {
            pan: (140.0, -60.0),
            zoom: 1.5,
        };
        let first = viewport.screen_to_graph((400.0, 300.0));
        let second = viewport.screen_to_graph((400.0, 300.0));
        assert_eq!(first, second);
    }

    #[test]
    fn round_trip_through_the_transform() {
        let viewport = Viewport {
            pan: (-25.0, 310.0),
            zoom: 0.75,
        };
        let graph = Position::new(128.0, -64.0);
        let back = viewport.screen_to_graph(viewport.graph_to_screen(graph));
        assert!((back.x - graph.x).abs() < 1e-3);
        assert!((back.y - graph.y).abs() < 1e-3);
    }

    #[test]
    fn doubling_zoom_halves_graph_displacement() {
        let base = Viewport {
            pan: (50.0, 50.0),
            zoom: 1.0,
        };
        let zoomed = Viewport {
            pan: (50.0, 50.0),
            zoom: 2.0,
        };

        let delta = |v: &Viewport| {
            let a = v.screen_to_graph((100.0, 100.0));
            let b = v.screen_to_graph((200.0, 100.0));
            b.x - a.x
        };

        assert!((delta(&base) - 2.0 * delta(&zoomed)).abs() < 1e-3);
    }

    #[test]
    fn opening_one_menu_kind_closes_the_other() {
        let mut menu = ContextMenu::default();
        assert!(!menu.is_open());

        menu.open_canvas((10.0, 10.0));
        assert!(matches!(menu, ContextMenu::Canvas { .. }));

        let node_id = Uuid::new_v4();
        menu.open_node(node_id, (20.0, 20.0));
        assert!(matches!(menu, ContextMenu::Node { .. }));

        menu.open_canvas((30.0, 30.0));
        assert!(matches!(menu, ContextMenu::Canvas { .. }));

        menu.close();
        assert!(!menu.is_open());
    }

    #[test]
    fn shortcuts_are_suppressed_while_typing() {
        for key in [
            EditorKey::Escape,
            EditorKey::Delete,
            EditorKey::Backspace,
            EditorKey::A,
            EditorKey::D,
        ] {
            assert_eq!(resolve_shortcut(key, true, true), None);
            assert_eq!(resolve_shortcut(key, false, true), None);
        }
    }

    #[test]
    fn shortcut_mapping() {
        assert_eq!(
            resolve_shortcut(EditorKey::Escape, false, false),
            Some(EditorCommand::Dismiss)
        );
        assert_eq!(
            resolve_shortcut(EditorKey::D, true, false),
            Some(EditorCommand::DuplicateSelected)
        );
        assert_eq!(
            resolve_shortcut(EditorKey::A, true, false),
            Some(EditorCommand::SelectAll)
        );
        assert_eq!(
            resolve_shortcut(EditorKey::Delete, false, false),
            Some(EditorCommand::DeleteSelected)
        );
        assert_eq!(
            resolve_shortcut(EditorKey::Backspace, false, false),
            Some(EditorCommand::DeleteSelected)
        );
        // Plain letters without the command modifier do nothing.
        assert_eq!(resolve_shortcut(EditorKey::A, false, false), None);
        assert_eq!(resolve_shortcut(EditorKey::D, false, false), None);
    }
}
