//! Process-wide exit hooks.
//!
//! Hooks registered here run at most once per process, in reverse
//! registration order, the first time one of these happens:
//!
//! * the process receives SIGINT or SIGTERM (SIGINT only off Unix), after
//!   which it exits with status 128 + signal number;
//! * the process exits normally or through [`std::process::exit`];
//! * a host with its own signal handling calls [`run_exit_hooks`].

use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Once, OnceLock};
use std::thread;
use tracing::{error, info, warn};

type Hook = Box<dyn FnOnce() + Send>;

/// A set of hooks that runs once
pub struct ExitHooks {
    /// `None` once the hooks have run
    hooks: Mutex<Option<Vec<Hook>>>,
}

impl ExitHooks {
    pub fn new() -> Self {
        Self {
            hooks: Mutex::new(Some(Vec::new())),
        }
    }

    /// Queue a hook. Returns `false` if the hooks already ran, in which case
    /// `hook` is dropped without being called.
    pub fn register<F>(&self, hook: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        match self.hooks.lock().as_mut() {
            Some(hooks) => {
                hooks.push(Box::new(hook));
                true
            }
            None => false,
        }
    }

    /// Run every queued hook, newest first, and return how many ran.
    /// Later calls run nothing.
    pub fn run(&self) -> usize {
        // Taken out of the lock so a hook may itself register (and be refused).
        let hooks = match self.hooks.lock().take() {
            Some(hooks) => hooks,
            None => return 0,
        };

        let count = hooks.len();
        for hook in hooks.into_iter().rev() {
            if panic::catch_unwind(AssertUnwindSafe(hook)).is_err() {
                error!("Exit hook panicked");
            }
        }
        count
    }

    pub fn pending(&self) -> usize {
        self.hooks.lock().as_ref().map_or(0, Vec::len)
    }
}

impl Default for ExitHooks {
    fn default() -> Self {
        Self::new()
    }
}

static EXIT_HOOKS: OnceLock<ExitHooks> = OnceLock::new();
static TRIGGERS: Once = Once::new();

fn global() -> &'static ExitHooks {
    EXIT_HOOKS.get_or_init(ExitHooks::new)
}

/// Register a process-wide exit hook, installing the signal and exit
/// triggers on first use. Returns `false` if the hooks already ran.
pub fn register_exit_hook<F>(hook: F) -> bool
where
    F: FnOnce() + Send + 'static,
{
    TRIGGERS.call_once(install_triggers);
    global().register(hook)
}

/// Run the process-wide exit hooks now. Safe to call more than once.
pub fn run_exit_hooks() -> usize {
    global().run()
}

fn install_triggers() {
    // SAFETY: `run_at_exit` is an `extern "C"` function that never unwinds.
    if unsafe { libc::atexit(run_at_exit) } != 0 {
        warn!("Failed to register atexit handler; exit hooks will only run on signals");
    }

    if let Err(e) = thread::Builder::new()
        .name("lifecycle-exit-signals".to_string())
        .spawn(watch_signals)
    {
        warn!("Failed to spawn signal watcher, exit hooks will not run on signals: {}", e);
    }
}

extern "C" fn run_at_exit() {
    let _ = panic::catch_unwind(run_exit_hooks);
}

fn watch_signals() {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            warn!("Failed to build signal runtime: {}", e);
            return;
        }
    };

    if let Some((signal, exit_code)) = runtime.block_on(wait_for_signal()) {
        info!("Received {} signal, running exit hooks", signal);
        run_exit_hooks();
        std::process::exit(exit_code);
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> Option<(&'static str, i32)> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            warn!("Failed to register SIGTERM handler: {}", e);
            return tokio::signal::ctrl_c().await.ok().map(|_| ("SIGINT", 130));
        }
    };

    tokio::select! {
        _ = sigterm.recv() => Some(("SIGTERM", 143)),
        result = tokio::signal::ctrl_c() => result.ok().map(|_| ("SIGINT", 130)),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Option<(&'static str, i32)> {
    tokio::signal::ctrl_c().await.ok().map(|_| ("SIGINT", 130))
}
