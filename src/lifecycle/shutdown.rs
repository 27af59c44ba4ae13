use super::orchestrator::Lifecycle;
use super::types::{Stage, State};
use crate::error::{HandlerFailure, Result, StopFailure};
use tracing::{info, warn};

impl Lifecycle {
    /// Stop every registered handler, last stage first and, within a stage,
    /// in reverse registration order.
    ///
    /// Only the first call on a running lifecycle does anything; every other
    /// call returns `Ok(())` immediately. All handlers get a stop attempt even
    /// if some fail; the failures are then returned together as a
    /// [`StopFailure`].
    pub fn stop(&self) -> Result<()> {
        // Flip the state before locking so add_maybe_start_handler can see a
        // stop in progress without waiting on the lock.
        if self
            .inner
            .state
            .compare_exchange(State::Running, State::Stopped)
            .is_err()
        {
            info!(
                "Lifecycle [{}] already stopped and stop was called. Silently skipping",
                self.inner.name
            );
            return Ok(());
        }

        let transition = self.inner.transition.lock();
        let mut failure: Option<StopFailure> = None;

        for stage in Stage::ALL.into_iter().rev() {
            info!("Stopping lifecycle [{}] stage [{}]", self.inner.name, stage);

            for handler in self.inner.handlers_at(stage).iter().rev() {
                if let Err(error) = handler.stop() {
                    let described = handler.describe();
                    warn!(
                        "Lifecycle [{}] encountered exception while stopping {}: {:#}",
                        self.inner.name, described, error
                    );

                    let handler_failure = HandlerFailure {
                        stage,
                        handler: described,
                        error,
                    };
                    match failure.as_mut() {
                        Some(aggregate) => aggregate.suppress(handler_failure),
                        None => {
                            failure = Some(StopFailure::new(
                                self.inner.name.clone(),
                                handler_failure,
                            ))
                        }
                    }
                }
            }
        }

        drop(transition);

        match failure {
            Some(failure) => Err(failure.into()),
            None => {
                info!("Successfully stopped lifecycle [{}]", self.inner.name);
                Ok(())
            }
        }
    }
}
