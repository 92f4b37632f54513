use thiserror::Error;

/// The main error type for the `fibre_log_adapter` library.
#[derive(Debug, Error)]
pub enum Error {
  /// Raised by the backend while writing, i.e. an audit sink failed.
  #[error(transparent)]
  Write(#[from] fibre_events::Error),

  #[error("Invalid log state: {0}")]
  State(#[from] StateError),

  #[error("Failed to read configuration file: {0}")]
  ConfigRead(#[from] std::io::Error),

  #[error("Failed to parse configuration: {0}")]
  ConfigParse(String),

  #[error("Invalid configuration value for '{field}': {message}")]
  InvalidConfigValue { field: String, message: String },

  #[error("Failed to install the log bridge: {0}")]
  LogBridgeInit(String),
}

/// A state payload that cannot be turned into properties.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
  #[error("The format string '{format}' has {expected} named placeholder(s) but {actual} argument(s) were supplied")]
  ArgumentCountMismatch {
    format: String,
    expected: usize,
    actual: usize,
  },
}

/// A specialized `Result` type for `fibre_log_adapter` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
