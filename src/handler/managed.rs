use super::{short_type_name, Handler};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

type Action<T> = Box<dyn Fn(&T) -> anyhow::Result<()> + Send + Sync>;

/// Objects that carry their own start and stop actions.
///
/// Both default to no-ops, so a type only overrides what it needs.
pub trait Managed: Send + Sync + 'static {
    fn lifecycle_start(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn lifecycle_stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

struct NamedAction<T> {
    name: String,
    action: Action<T>,
}

/// Handler over an arbitrary object with start and stop actions attached at
/// registration time.
///
/// Start actions run in the order they were added and the first failure
/// aborts the start. Stop actions all run in order; failures are logged and
/// swallowed. A handler without actions is a no-op.
pub struct ManagedHandler<T: Send + Sync + 'static> {
    target: Arc<T>,
    start_actions: Vec<NamedAction<T>>,
    stop_actions: Vec<NamedAction<T>>,
}

impl<T: Send + Sync + 'static> ManagedHandler<T> {
    /// Start building a handler for `target`
    pub fn builder(target: Arc<T>) -> ManagedHandlerBuilder<T> {
        ManagedHandlerBuilder {
            target,
            start_actions: Vec::new(),
            stop_actions: Vec::new(),
        }
    }

    pub fn target(&self) -> &Arc<T> {
        &self.target
    }

    pub fn start_action_count(&self) -> usize {
        self.start_actions.len()
    }

    pub fn stop_action_count(&self) -> usize {
        self.stop_actions.len()
    }
}

impl<T: Managed> ManagedHandler<T> {
    /// Handler driven by the target's [`Managed`] implementation
    pub fn new(target: Arc<T>) -> Self {
        Self::builder(target)
            .on_start_named("lifecycle_start", T::lifecycle_start)
            .on_stop_named("lifecycle_stop", T::lifecycle_stop)
            .build()
    }
}

impl<T: Send + Sync + 'static> Handler for ManagedHandler<T> {
    fn start(&self) -> anyhow::Result<()> {
        for action in &self.start_actions {
            info!(
                "Starting lifecycle [{}#{}]",
                short_type_name::<T>(),
                action.name
            );
            (action.action)(self.target.as_ref())?;
        }
        Ok(())
    }

    fn stop(&self) -> anyhow::Result<()> {
        for action in &self.stop_actions {
            debug!(
                "Stopping lifecycle [{}#{}]",
                short_type_name::<T>(),
                action.name
            );
            if let Err(e) = (action.action)(self.target.as_ref()) {
                error!(
                    "Exception when stopping action [{}] on object [{}]: {:#}",
                    action.name,
                    short_type_name::<T>(),
                    e
                );
            }
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("ManagedHandler[{}]", short_type_name::<T>())
    }
}

impl<T: Send + Sync + 'static> fmt::Debug for ManagedHandler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedHandler")
            .field("target", &short_type_name::<T>())
            .field(
                "start_actions",
                &self.start_actions.iter().map(|a| &a.name).collect::<Vec<_>>(),
            )
            .field(
                "stop_actions",
                &self.stop_actions.iter().map(|a| &a.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Builder for [`ManagedHandler`]
pub struct ManagedHandlerBuilder<T: Send + Sync + 'static> {
    target: Arc<T>,
    start_actions: Vec<NamedAction<T>>,
    stop_actions: Vec<NamedAction<T>>,
}

impl<T: Send + Sync + 'static> ManagedHandlerBuilder<T> {
    /// Add a start action
    pub fn on_start<F>(self, action: F) -> Self
    where
        F: Fn(&T) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let name = format!("start#{}", self.start_actions.len());
        self.on_start_named(name, action)
    }

    /// Add a start action with a name for log lines
    pub fn on_start_named<S, F>(mut self, name: S, action: F) -> Self
    where
        S: Into<String>,
        F: Fn(&T) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.start_actions.push(NamedAction {
            name: name.into(),
            action: Box::new(action),
        });
        self
    }

    /// Add a stop action
    pub fn on_stop<F>(self, action: F) -> Self
    where
        F: Fn(&T) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let name = format!("stop#{}", self.stop_actions.len());
        self.on_stop_named(name, action)
    }

    /// Add a stop action with a name for log lines
    pub fn on_stop_named<S, F>(mut self, name: S, action: F) -> Self
    where
        S: Into<String>,
        F: Fn(&T) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.stop_actions.push(NamedAction {
            name: name.into(),
            action: Box::new(action),
        });
        self
    }

    pub fn build(self) -> ManagedHandler<T> {
        ManagedHandler {
            target: self.target,
            start_actions: self.start_actions,
            stop_actions: self.stop_actions,
        }
    }
}
