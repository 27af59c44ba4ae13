use super::{short_type_name, Handler};
use std::sync::Arc;
use tracing::{error, info};

/// A resource that only needs releasing on shutdown
pub trait Closeable: Send + Sync + 'static {
    fn close(&self) -> anyhow::Result<()>;
}

/// Handler that closes a resource on stop and does nothing on start
pub struct CloseableHandler<T: Closeable> {
    target: Arc<T>,
}

impl<T: Closeable> CloseableHandler<T> {
    pub fn new(target: Arc<T>) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &Arc<T> {
        &self.target
    }
}

impl<T: Closeable> Handler for CloseableHandler<T> {
    fn start(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn stop(&self) -> anyhow::Result<()> {
        info!("Closing object [{}]", short_type_name::<T>());
        if let Err(e) = self.target.close() {
            error!(
                "Exception when closing object [{}]: {:#}",
                short_type_name::<T>(),
                e
            );
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("CloseableHandler[{}]", short_type_name::<T>())
    }
}
