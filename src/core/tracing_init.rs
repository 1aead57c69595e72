use crate::core::config::LoggingConfig;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where the client's own diagnostics go. Both write to stderr so command
/// output on stdout stays clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    /// Compact human-readable lines, colored on a terminal
    Console { ansi: bool },
    /// One JSON object per event
    Json,
}

impl LogOutput {
    pub fn from_config(config: &LoggingConfig, stderr_is_terminal: bool) -> Self {
        let console = config.console
            || matches!(config.format.to_lowercase().as_str(), "console" | "pretty" | "text");

        if console {
            LogOutput::Console {
                ansi: stderr_is_terminal,
            }
        } else {
            LogOutput::Json
        }
    }
}

/// `RUST_LOG` wins over the configured level
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_tracing(config: &LoggingConfig) {
    let output = LogOutput::from_config(config, std::io::stderr().is_terminal());
    let registry = tracing_subscriber::registry().with(env_filter(config));

    let result = match output {
        LogOutput::Console { ansi } => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_ansi(ansi),
            )
            .try_init(),
        LogOutput::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_writer(std::io::stderr)
                    .with_current_span(false),
            )
            .try_init(),
    };

    // A subscriber installed by an embedding application stays in place
    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
}
