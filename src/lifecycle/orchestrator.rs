use super::types::{Stage, State};
use crate::config::LifecycleConfig;
use crate::error::{LifecycleError, Result};
use crate::handler::Handler;
use crossbeam::atomic::AtomicCell;
use parking_lot::{Mutex, ReentrantMutex};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::debug;

pub(super) type Registry = BTreeMap<Stage, Vec<Arc<dyn Handler>>>;

/// Manager of ordered component startup and shutdown.
///
/// Handlers are registered at one of four [`Stage`]s. `start()` walks the
/// stages in ascending order and starts each stage's handlers in registration
/// order; `stop()` walks back down and stops them in reverse. Cloning a
/// `Lifecycle` yields another handle to the same orchestrator.
#[derive(Clone)]
pub struct Lifecycle {
    pub(super) inner: Arc<LifecycleInner>,
}

pub(super) struct LifecycleInner {
    pub(super) name: String,
    /// Linearizes every handler start/stop call and registry mutation.
    /// Reentrant so a handler may register more handlers from its own start.
    pub(super) transition: ReentrantMutex<()>,
    /// Only held long enough to copy or append; never across handler calls
    pub(super) registry: Mutex<Registry>,
    /// Written by CAS outside the lock in `stop()`
    pub(super) state: AtomicCell<State>,
    pub(super) current_stage: AtomicCell<Option<Stage>>,
    pub(super) shutdown_hook_registered: AtomicBool,
}

impl Lifecycle {
    /// Create a lifecycle; `name` only shows up in diagnostics but must not be blank
    pub fn new<S: Into<String>>(name: S) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LifecycleError::InvalidName);
        }
        Ok(Self::named(name))
    }

    /// Create a lifecycle named "anonymous"
    pub fn anonymous() -> Self {
        Self::named("anonymous".to_string())
    }

    fn named(name: String) -> Self {
        let registry: Registry = Stage::ALL
            .into_iter()
            .map(|stage| (stage, Vec::new()))
            .collect();

        debug!("Created lifecycle [{}]", name);

        Self {
            inner: Arc::new(LifecycleInner {
                name,
                transition: ReentrantMutex::new(()),
                registry: Mutex::new(registry),
                state: AtomicCell::new(State::NotStarted),
                current_stage: AtomicCell::new(None),
                shutdown_hook_registered: AtomicBool::new(false),
            }),
        }
    }

    /// Create a lifecycle from configuration, installing the shutdown hook if requested
    pub fn from_config(config: &LifecycleConfig) -> Result<Self> {
        let lifecycle = Self::new(config.name.clone())?;
        if config.install_shutdown_hook {
            lifecycle.ensure_shutdown_hook();
        }
        Ok(lifecycle)
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }
}

impl LifecycleInner {
    /// Copy of a stage's handlers so they can be invoked while the registry stays
    /// open to reentrant registration.
    pub(super) fn handlers_at(&self, stage: Stage) -> Vec<Arc<dyn Handler>> {
        self.registry.lock().get(&stage).cloned().unwrap_or_default()
    }

    pub(super) fn append(&self, stage: Stage, handler: Arc<dyn Handler>) {
        self.registry.lock().entry(stage).or_default().push(handler);
    }
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("name", &self.inner.name)
            .field("state", &self.inner.state.load())
            .field("current_stage", &self.inner.current_stage.load())
            .finish()
    }
}
