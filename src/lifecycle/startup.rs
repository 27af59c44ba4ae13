use super::orchestrator::Lifecycle;
use super::types::{Stage, State};
use crate::error::{LifecycleError, Result};
use tracing::{error, info};

impl Lifecycle {
    /// Start every registered handler, stage by stage.
    ///
    /// The first handler failure is returned immediately and nothing after it
    /// is started. Handlers that did start stay started and the lifecycle
    /// remains running; call [`stop`](Lifecycle::stop) to unwind them.
    pub fn start(&self) -> Result<()> {
        let transition = self.inner.transition.lock();

        if self.inner.state.load() != State::NotStarted {
            return Err(LifecycleError::AlreadyStarted {
                lifecycle: self.inner.name.clone(),
            });
        }

        if self
            .inner
            .state
            .compare_exchange(State::NotStarted, State::Running)
            .is_err()
        {
            return Err(LifecycleError::ConcurrentStartStop {
                lifecycle: self.inner.name.clone(),
            });
        }

        for stage in Stage::ALL {
            self.inner.current_stage.store(Some(stage));
            info!("Starting lifecycle [{}] stage [{}]", self.inner.name, stage);

            for handler in self.inner.handlers_at(stage) {
                handler.start().map_err(|source| {
                    error!(
                        "Lifecycle [{}] failed to start {} at stage [{}]: {:#}",
                        self.inner.name,
                        handler.describe(),
                        stage,
                        source
                    );
                    LifecycleError::HandlerStart {
                        lifecycle: self.inner.name.clone(),
                        stage,
                        handler: handler.describe(),
                        source,
                    }
                })?;
            }
        }

        info!("Successfully started lifecycle [{}]", self.inner.name);
        Ok(())
    }
}
