use crate::lifecycle::Stage;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("Lifecycle name must not be empty or blank")]
    InvalidName,

    #[error("Lifecycle [{lifecycle}] already started")]
    AlreadyStarted { lifecycle: String },

    #[error("Cannot add a handler in the process of Lifecycle [{lifecycle}] starting or stopping")]
    TransitionInProgress { lifecycle: String },

    #[error("Cannot add a handler in the process of Lifecycle [{lifecycle}] stopping")]
    Stopping { lifecycle: String },

    #[error("Cannot add a handler after Lifecycle [{lifecycle}] has stopped")]
    Stopped { lifecycle: String },

    #[error("stop() was called concurrently with start() on Lifecycle [{lifecycle}]")]
    ConcurrentStartStop { lifecycle: String },

    #[error("Lifecycle [{lifecycle}] failed to start {handler} at stage [{stage}]: {source}")]
    HandlerStart {
        lifecycle: String,
        stage: Stage,
        handler: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Stop(#[from] StopFailure),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("Logging error: {message}")]
    Logging { message: String },
}

impl LifecycleError {
    pub fn logging<S: Into<String>>(message: S) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }

    /// True for the illegal-state class: calls made in the wrong lifecycle state
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::AlreadyStarted { .. }
                | Self::TransitionInProgress { .. }
                | Self::Stopping { .. }
                | Self::Stopped { .. }
                | Self::ConcurrentStartStop { .. }
        )
    }
}

/// A handler that failed while the lifecycle was stopping
#[derive(Debug)]
pub struct HandlerFailure {
    pub stage: Stage,
    pub handler: String,
    pub error: anyhow::Error,
}

impl fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at stage [{}]: {}", self.handler, self.stage, self.error)
    }
}

/// Aggregate of every handler failure seen during one `stop()` pass.
///
/// The first failure is the primary cause and is exposed through
/// [`std::error::Error::source`]; later ones are kept in order as suppressed.
#[derive(Debug)]
pub struct StopFailure {
    lifecycle: String,
    primary: HandlerFailure,
    suppressed: Vec<HandlerFailure>,
}

impl StopFailure {
    pub(crate) fn new(lifecycle: String, primary: HandlerFailure) -> Self {
        Self {
            lifecycle,
            primary,
            suppressed: Vec::new(),
        }
    }

    pub(crate) fn suppress(&mut self, failure: HandlerFailure) {
        self.suppressed.push(failure);
    }

    pub fn lifecycle(&self) -> &str {
        &self.lifecycle
    }

    pub fn primary(&self) -> &HandlerFailure {
        &self.primary
    }

    pub fn suppressed(&self) -> &[HandlerFailure] {
        &self.suppressed
    }

    /// Every failure in the order the handlers were stopped
    pub fn failures(&self) -> impl Iterator<Item = &HandlerFailure> {
        std::iter::once(&self.primary).chain(self.suppressed.iter())
    }
}

impl fmt::Display for StopFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lifecycle [{}] encountered {} failure(s) while stopping; first: {}",
            self.lifecycle,
            1 + self.suppressed.len(),
            self.primary
        )
    }
}

impl std::error::Error for StopFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.primary.error.as_ref())
    }
}

pub type Result<T> = std::result::Result<T, LifecycleError>;
