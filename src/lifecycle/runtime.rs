use super::orchestrator::Lifecycle;
use crate::exit_hook;
use std::sync::atomic::Ordering;
use std::thread;
use tracing::{error, info, warn};

impl Lifecycle {
    /// Arrange for `stop()` to run when the process is shutting down.
    ///
    /// Registers at most one exit hook per lifecycle no matter how many
    /// threads call this; returns `true` only for the call that registered it.
    pub fn ensure_shutdown_hook(&self) -> bool {
        self.ensure_hook_with(|hook| exit_hook::register_exit_hook(hook))
    }

    /// Hand a stop hook to `register` unless one was already handed over for
    /// this lifecycle. `register` reports whether the hook was accepted.
    pub(super) fn ensure_hook_with<R>(&self, register: R) -> bool
    where
        R: FnOnce(Box<dyn FnOnce() + Send>) -> bool,
    {
        if self
            .inner
            .shutdown_hook_registered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        let lifecycle = self.clone();
        let registered = register(Box::new(move || {
            info!("Lifecycle [{}] running shutdown hook", lifecycle.name());
            if let Err(e) = lifecycle.stop() {
                error!("Lifecycle [{}] shutdown hook failed: {}", lifecycle.name(), e);
            }
        }));

        if !registered {
            warn!(
                "Lifecycle [{}] shutdown hook not registered, process is already exiting",
                self.inner.name
            );
        }
        true
    }

    /// Install the shutdown hook and block the calling thread until the
    /// process exits.
    pub fn join(&self) -> ! {
        self.ensure_shutdown_hook();
        info!("Lifecycle [{}] joined, waiting for process exit", self.inner.name);
        loop {
            thread::park();
        }
    }
}
