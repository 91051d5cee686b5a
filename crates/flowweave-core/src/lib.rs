pub mod cron;
pub mod template;

mod automation;
mod execution;
mod node;
mod validation;

pub use automation::*;
pub use execution::*;
pub use node::*;
pub use validation::*;
