//! Start/stop capability shared by everything a [`Lifecycle`](crate::Lifecycle) manages,
//! plus adapters for objects that expose a different shape.

mod closeable;
mod managed;
mod start_close;

#[cfg(test)]
mod tests;

pub use closeable::{Closeable, CloseableHandler};
pub use managed::{Managed, ManagedHandler, ManagedHandlerBuilder};
pub use start_close::{StartClose, StartCloseHandler};

use std::sync::Arc;

/// A component that can be started and stopped by a lifecycle.
///
/// `start` failures are returned to whoever triggered the start. `stop`
/// failures are collected by the lifecycle and never interrupt the shutdown
/// of other handlers.
pub trait Handler: Send + Sync {
    fn start(&self) -> anyhow::Result<()>;

    fn stop(&self) -> anyhow::Result<()>;

    /// Name used in log lines and error reports
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn start(&self) -> anyhow::Result<()> {
        (**self).start()
    }

    fn stop(&self) -> anyhow::Result<()> {
        (**self).stop()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn start(&self) -> anyhow::Result<()> {
        (**self).start()
    }

    fn stop(&self) -> anyhow::Result<()> {
        (**self).stop()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Short type name without the module path, for log lines
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}
