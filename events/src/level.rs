use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// The severity of a [`LogEvent`](crate::LogEvent), least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LogEventLevel {
  Verbose,
  Debug,
  #[default]
  Information,
  Warning,
  Error,
  Fatal,
}

impl LogEventLevel {
  pub const ALL: [LogEventLevel; 6] = [
    LogEventLevel::Verbose,
    LogEventLevel::Debug,
    LogEventLevel::Information,
    LogEventLevel::Warning,
    LogEventLevel::Error,
    LogEventLevel::Fatal,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      LogEventLevel::Verbose => "Verbose",
      LogEventLevel::Debug => "Debug",
      LogEventLevel::Information => "Information",
      LogEventLevel::Warning => "Warning",
      LogEventLevel::Error => "Error",
      LogEventLevel::Fatal => "Fatal",
    }
  }

  /// The conventional three-letter abbreviation used by text output.
  pub fn short_name(&self) -> &'static str {
    match self {
      LogEventLevel::Verbose => "VRB",
      LogEventLevel::Debug => "DBG",
      LogEventLevel::Information => "INF",
      LogEventLevel::Warning => "WRN",
      LogEventLevel::Error => "ERR",
      LogEventLevel::Fatal => "FTL",
    }
  }
}

impl fmt::Display for LogEventLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Returned when a string does not name a [`LogEventLevel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(pub String);

impl fmt::Display for ParseLevelError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "'{}' is not a valid log event level", self.0)
  }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for LogEventLevel {
  type Err = ParseLevelError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "verbose" | "trace" => Ok(LogEventLevel::Verbose),
      "debug" => Ok(LogEventLevel::Debug),
      "information" | "info" => Ok(LogEventLevel::Information),
      "warning" | "warn" => Ok(LogEventLevel::Warning),
      "error" => Ok(LogEventLevel::Error),
      "fatal" => Ok(LogEventLevel::Fatal),
      _ => Err(ParseLevelError(s.to_string())),
    }
  }
}

impl TryFrom<String> for LogEventLevel {
  type Error = ParseLevelError;

  fn try_from(value: String) -> Result<Self, ParseLevelError> {
    value.parse()
  }
}
