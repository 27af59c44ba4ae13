use super::orchestrator::Lifecycle;
use super::types::{Stage, State};
use crate::error::{LifecycleError, Result};
use crate::handler::{
    Closeable, CloseableHandler, Handler, Managed, ManagedHandler, StartClose, StartCloseHandler,
};
use std::sync::Arc;
use tracing::debug;

impl Lifecycle {
    /// Add a handler at [`Stage::Normal`]; fails once the lifecycle has started
    pub fn add_handler<H: Handler + 'static>(&self, handler: H) -> Result<()> {
        self.add_handler_at(handler, Stage::Normal)
    }

    /// Add a handler at `stage`.
    ///
    /// Fails fast with [`LifecycleError::TransitionInProgress`] if another
    /// thread is in the middle of starting or stopping, and with
    /// [`LifecycleError::AlreadyStarted`] once `start()` has been called.
    pub fn add_handler_at<H: Handler + 'static>(&self, handler: H, stage: Stage) -> Result<()> {
        let _transition = self.inner.transition.try_lock().ok_or_else(|| {
            LifecycleError::TransitionInProgress {
                lifecycle: self.inner.name.clone(),
            }
        })?;

        if self.inner.state.load() != State::NotStarted {
            return Err(LifecycleError::AlreadyStarted {
                lifecycle: self.inner.name.clone(),
            });
        }

        self.append(Arc::new(handler), stage);
        Ok(())
    }

    /// Add a handler at [`Stage::Normal`], starting it if the lifecycle is running
    pub fn add_maybe_start_handler<H: Handler + 'static>(&self, handler: H) -> Result<()> {
        self.add_maybe_start_handler_at(handler, Stage::Normal)
    }

    /// Add a handler at `stage` and, if the lifecycle is running and has
    /// already reached `stage`, start it before returning.
    ///
    /// If that start fails the handler is not added. Blocks while another
    /// thread is starting, but fails immediately once a stop has begun.
    pub fn add_maybe_start_handler_at<H: Handler + 'static>(
        &self,
        handler: H,
        stage: Stage,
    ) -> Result<()> {
        let _transition = match self.inner.transition.try_lock() {
            Some(guard) => guard,
            None => {
                // stop() flips the state before taking the lock, so a stopper
                // holding it is visible here instead of deadlocking on it.
                if self.inner.state.load() == State::Stopped {
                    return Err(LifecycleError::Stopping {
                        lifecycle: self.inner.name.clone(),
                    });
                }
                self.inner.transition.lock()
            }
        };

        match self.inner.state.load() {
            State::Stopped => {
                return Err(LifecycleError::Stopped {
                    lifecycle: self.inner.name.clone(),
                });
            }
            State::Running => {
                let reached = matches!(self.inner.current_stage.load(), Some(current) if stage <= current);
                if reached {
                    handler
                        .start()
                        .map_err(|source| LifecycleError::HandlerStart {
                            lifecycle: self.inner.name.clone(),
                            stage,
                            handler: handler.describe(),
                            source,
                        })?;
                }
            }
            State::NotStarted => {}
        }

        self.append(Arc::new(handler), stage);
        Ok(())
    }

    /// Add an object with [`Managed`] start/stop actions at [`Stage::Normal`]
    pub fn add_managed_instance<T: Managed>(&self, instance: Arc<T>) -> Result<Arc<T>> {
        self.add_managed_instance_at(instance, Stage::Normal)
    }

    pub fn add_managed_instance_at<T: Managed>(
        &self,
        instance: Arc<T>,
        stage: Stage,
    ) -> Result<Arc<T>> {
        self.add_handler_at(ManagedHandler::new(Arc::clone(&instance)), stage)?;
        Ok(instance)
    }

    pub fn add_maybe_start_managed_instance<T: Managed>(&self, instance: Arc<T>) -> Result<Arc<T>> {
        self.add_maybe_start_managed_instance_at(instance, Stage::Normal)
    }

    pub fn add_maybe_start_managed_instance_at<T: Managed>(
        &self,
        instance: Arc<T>,
        stage: Stage,
    ) -> Result<Arc<T>> {
        self.add_maybe_start_handler_at(ManagedHandler::new(Arc::clone(&instance)), stage)?;
        Ok(instance)
    }

    /// Add an object with `start`/`close` at [`Stage::Normal`]
    pub fn add_start_close_instance<T: StartClose>(&self, instance: Arc<T>) -> Result<Arc<T>> {
        self.add_start_close_instance_at(instance, Stage::Normal)
    }

    pub fn add_start_close_instance_at<T: StartClose>(
        &self,
        instance: Arc<T>,
        stage: Stage,
    ) -> Result<Arc<T>> {
        self.add_handler_at(StartCloseHandler::new(Arc::clone(&instance)), stage)?;
        Ok(instance)
    }

    pub fn add_maybe_start_start_close_instance<T: StartClose>(
        &self,
        instance: Arc<T>,
    ) -> Result<Arc<T>> {
        self.add_maybe_start_start_close_instance_at(instance, Stage::Normal)
    }

    pub fn add_maybe_start_start_close_instance_at<T: StartClose>(
        &self,
        instance: Arc<T>,
        stage: Stage,
    ) -> Result<Arc<T>> {
        self.add_maybe_start_handler_at(StartCloseHandler::new(Arc::clone(&instance)), stage)?;
        Ok(instance)
    }

    /// Add a resource that only needs closing, at [`Stage::Normal`]. Nothing is
    /// called on start.
    pub fn add_closeable_instance<T: Closeable>(&self, instance: Arc<T>) -> Result<Arc<T>> {
        self.add_closeable_instance_at(instance, Stage::Normal)
    }

    pub fn add_closeable_instance_at<T: Closeable>(
        &self,
        instance: Arc<T>,
        stage: Stage,
    ) -> Result<Arc<T>> {
        self.add_handler_at(CloseableHandler::new(Arc::clone(&instance)), stage)?;
        Ok(instance)
    }

    fn append(&self, handler: Arc<dyn Handler>, stage: Stage) {
        debug!(
            "Lifecycle [{}] registered {} at stage [{}]",
            self.inner.name,
            handler.describe(),
            stage
        );
        self.inner.append(stage, handler);
    }
}
