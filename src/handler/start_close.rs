use super::{short_type_name, Closeable, Handler};
use std::sync::Arc;
use tracing::{error, info};

/// Components with a `start` and a `close` operation.
///
/// `close` comes from [`Closeable`], so anything registered this way can also
/// be registered as a release-only resource.
pub trait StartClose: Closeable {
    fn start(&self) -> anyhow::Result<()>;
}

/// Handler that calls `start` on start and `close` on stop
pub struct StartCloseHandler<T: StartClose> {
    target: Arc<T>,
}

impl<T: StartClose> StartCloseHandler<T> {
    pub fn new(target: Arc<T>) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &Arc<T> {
        &self.target
    }
}

impl<T: StartClose> Handler for StartCloseHandler<T> {
    fn start(&self) -> anyhow::Result<()> {
        info!("Starting object [{}]", short_type_name::<T>());
        StartClose::start(self.target.as_ref())
    }

    fn stop(&self) -> anyhow::Result<()> {
        info!("Stopping object [{}]", short_type_name::<T>());
        if let Err(e) = Closeable::close(self.target.as_ref()) {
            error!(
                "Unable to invoke close() on [{}]: {:#}",
                short_type_name::<T>(),
                e
            );
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("StartCloseHandler[{}]", short_type_name::<T>())
    }
}
