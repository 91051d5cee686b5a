//! Client-side contract with the hosted automation backend.
//!
//! The editor never talks to a database or realtime channel directly; it goes
//! through [`AutomationBackend`], which a deployment binds to its transport.
//! [`MemoryBackend`] implements the same contract in-process for tests and
//! the demo app, and [`ExecutionTracker`] keeps a push/poll-updated execution
//! list consistent (replace-by-id, never merge).

mod backend;
mod memory;
mod tracker;

pub use backend::*;
pub use memory::MemoryBackend;
pub use tracker::*;
