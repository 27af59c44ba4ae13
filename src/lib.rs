//! Staged startup and shutdown of the long-lived components in a process.
//!
//! Components are registered with a [`Lifecycle`] at a [`Stage`]. Starting
//! the lifecycle brings stages up in order (INIT, NORMAL, SERVER,
//! ANNOUNCEMENTS); stopping it tears them down in reverse, attempting every
//! component even when some fail.

pub mod config;
pub mod error;
pub mod exit_hook;
pub mod handler;
pub mod lifecycle;
pub mod logging;

pub use config::{LifecycleConfig, LoggingConfig};
pub use error::{HandlerFailure, LifecycleError, Result, StopFailure};
pub use handler::{
    Closeable, CloseableHandler, Handler, Managed, ManagedHandler, ManagedHandlerBuilder,
    StartClose, StartCloseHandler,
};
pub use lifecycle::{Lifecycle, LifecycleSnapshot, Stage, StageSummary, State};
pub use logging::init_logging;
