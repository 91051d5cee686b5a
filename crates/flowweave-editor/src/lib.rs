//! Editing session for one automation: the graph state store with undo/redo,
//! canvas interaction state, the execution-trace view model, and the
//! save/activate orchestration the toolbar drives.

mod canvas;
mod session;
mod store;
mod trace_view;

pub use canvas::*;
pub use session::*;
pub use store::*;
pub use trace_view::*;
