mod orchestrator;
mod registration;
mod runtime;
mod shutdown;
mod startup;
mod state;
mod types;


pub use orchestrator::Lifecycle;
pub use state::{LifecycleSnapshot, StageSummary};
pub use types::{Stage, State};
