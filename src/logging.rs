use crate::config::LoggingConfig;
use crate::error::{LifecycleError, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter directive used when `RUST_LOG` is not set
pub fn default_directive(config: &LoggingConfig) -> String {
    format!("lifecycle={}", config.level.to_ascii_lowercase())
}

/// Known format name for `format`; anything unrecognized falls back to pretty
fn resolve_format(format: &str) -> &'static str {
    match format.to_ascii_lowercase().as_str() {
        "json" => "json",
        "compact" => "compact",
        "pretty" => "pretty",
        other => {
            eprintln!("Warning: Unknown log format '{}', using pretty", other);
            "pretty"
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a global
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let verbose = matches!(
        config.level.to_ascii_lowercase().as_str(),
        "debug" | "trace"
    );

    let fmt_layer = match resolve_format(&config.format) {
        "json" => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        "compact" => fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        _ => fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(verbose)
            .with_file(verbose)
            .with_line_number(verbose)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| LifecycleError::logging(e.to_string()))
}
