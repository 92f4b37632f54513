use fibre_events::LogEventLevel;

/// Severity as seen by the generic logging front-end.
///
/// `None` is not a severity but a "log nothing" marker; loggers never emit at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
  Trace = 0,
  Debug = 1,
  Information = 2,
  Warning = 3,
  Error = 4,
  Critical = 5,
  None = 6,
}

impl LogLevel {
  /// Maps a raw numeric level. Anything out of range is treated as `Trace`.
  pub fn from_raw(raw: i32) -> LogLevel {
    match raw {
      1 => LogLevel::Debug,
      2 => LogLevel::Information,
      3 => LogLevel::Warning,
      4 => LogLevel::Error,
      5 => LogLevel::Critical,
      6 => LogLevel::None,
      _ => LogLevel::Trace,
    }
  }

  /// The most verbose `log` filter that still lets this level through.
  pub fn to_level_filter(self) -> log::LevelFilter {
    match self {
      LogLevel::Trace => log::LevelFilter::Trace,
      LogLevel::Debug => log::LevelFilter::Debug,
      LogLevel::Information => log::LevelFilter::Info,
      LogLevel::Warning => log::LevelFilter::Warn,
      LogLevel::Error | LogLevel::Critical => log::LevelFilter::Error,
      LogLevel::None => log::LevelFilter::Off,
    }
  }
}

impl From<log::Level> for LogLevel {
  fn from(level: log::Level) -> Self {
    match level {
      log::Level::Error => LogLevel::Error,
      log::Level::Warn => LogLevel::Warning,
      log::Level::Info => LogLevel::Information,
      log::Level::Debug => LogLevel::Debug,
      log::Level::Trace => LogLevel::Trace,
    }
  }
}

/// Conversions between front-end and backend levels.
pub struct LevelConvert;

impl LevelConvert {
  /// `None` maps to `Fatal`, the same as `Critical`: the backend has no "off" level.
  pub fn to_backend_level(level: LogLevel) -> LogEventLevel {
    match level {
      LogLevel::None | LogLevel::Critical => LogEventLevel::Fatal,
      LogLevel::Error => LogEventLevel::Error,
      LogLevel::Warning => LogEventLevel::Warning,
      LogLevel::Information => LogEventLevel::Information,
      LogLevel::Debug => LogEventLevel::Debug,
      LogLevel::Trace => LogEventLevel::Verbose,
    }
  }

  pub fn to_generic_level(level: LogEventLevel) -> LogLevel {
    match level {
      LogEventLevel::Fatal => LogLevel::Critical,
      LogEventLevel::Error => LogLevel::Error,
      LogEventLevel::Warning => LogLevel::Warning,
      LogEventLevel::Information => LogLevel::Information,
      LogEventLevel::Debug => LogLevel::Debug,
      LogEventLevel::Verbose => LogLevel::Trace,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const ALL: [LogLevel; 7] = [
    LogLevel::Trace,
    LogLevel::Debug,
    LogLevel::Information,
    LogLevel::Warning,
    LogLevel::Error,
    LogLevel::Critical,
    LogLevel::None,
  ];

  #[test]
  fn round_trips_every_level_except_none() {
    for level in ALL {
      let back = LevelConvert::to_generic_level(LevelConvert::to_backend_level(level));
      if level == LogLevel::None {
        assert_eq!(back, LogLevel::Critical);
      } else {
        assert_eq!(back, level);
      }
    }
  }

  #[test]
  fn backend_levels_map_back_and_forth() {
    for level in LogEventLevel::ALL {
      assert_eq!(LevelConvert::to_backend_level(LevelConvert::to_generic_level(level)), level);
    }
  }

  #[test]
  fn out_of_range_raw_levels_fail_open() {
    assert_eq!(LogLevel::from_raw(-1), LogLevel::Trace);
    assert_eq!(LogLevel::from_raw(42), LogLevel::Trace);
    assert_eq!(LogLevel::from_raw(3), LogLevel::Warning);
  }

  #[test]
  fn maps_log_crate_levels() {
    assert_eq!(LogLevel::from(log::Level::Warn), LogLevel::Warning);
    assert_eq!(LogLevel::Critical.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::None.to_level_filter(), log::LevelFilter::Off);
  }
}
