//! Error types for CLI utilities.

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;

/// Errors that can occur in CLI operations.
#[derive(Error, Debug)]
pub enum CliError {
    /// The global tracing subscriber could not be installed.
    #[error("Failed to initialize tracing: {0}")]
    Tracing(#[from] tracing_subscriber::util::TryInitError),

    /// The Prometheus exporter could not be installed.
    #[error("Failed to initialize metrics: {0}")]
    MetricsInitialization(#[from] BuildError),
}

/// Type alias for CLI results.
pub type CliResult<T> = Result<T, CliError>;
