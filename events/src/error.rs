use thiserror::Error;

/// The main error type for the `fibre_events` library.
#[derive(Debug, Error)]
pub enum Error {
  #[error("Property name {0:?} is not valid; names must contain at least one non-whitespace character")]
  InvalidPropertyName(String),

  #[error("{} audit sink(s) failed to emit an event: {}", .0.len(), display_audit(.0))]
  Audit(Vec<SinkFailure>),

  #[error("Failed to read configuration file: {0}")]
  ConfigRead(#[from] std::io::Error),

  #[error("Failed to parse configuration: {0}")]
  ConfigParse(String),

  #[error("Invalid configuration value for '{field}': {message}")]
  InvalidConfigValue { field: String, message: String },
}

/// The error a [`Sink`](crate::sink::Sink) reports when it cannot accept an event.
#[derive(Debug, Error)]
pub enum SinkError {
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Formatting failed: {0}")]
  Format(String),

  #[error("{0}")]
  Other(String),
}

/// A single failed audit emission, named after the sink that produced it.
#[derive(Debug)]
pub struct SinkFailure {
  pub sink: String,
  pub error: SinkError,
}

fn display_audit(failures: &[SinkFailure]) -> String {
  failures
    .iter()
    .map(|f| format!("{}: {}", f.sink, f.error))
    .collect::<Vec<_>>()
    .join("; ")
}

/// A specialized `Result` type for `fibre_events` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
