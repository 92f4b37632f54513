//! Routes records from the `log` facade through a [`FibreLoggerProvider`].
//!
//! The record target becomes the category. Key/value pairs attached with
//! `log::info!(user = 7; "signed in")` become event properties, and the formatted
//! message becomes the template text with its braces escaped.

use crate::api::Logger;
use crate::error::{Error, Result};
use crate::event_id::EventId;
use crate::level::LogLevel;
use crate::logger::FibreLogger;
use crate::provider::FibreLoggerProvider;
use crate::state::{PairList, State, ORIGINAL_FORMAT};
use dashmap::DashMap;
use fibre_events::{Exception, SelfLog, Value};
use log::kv::{self, VisitSource};
use std::sync::Arc;

pub struct LogBridge {
  provider: Arc<FibreLoggerProvider>,
  loggers: DashMap<String, FibreLogger>,
}

impl LogBridge {
  pub fn new(provider: Arc<FibreLoggerProvider>) -> Self {
    Self {
      provider,
      loggers: DashMap::new(),
    }
  }

  /// Installs a bridge as the `log` crate's global logger.
  ///
  /// Fails if another `log` implementation is already installed.
  pub fn init(provider: Arc<FibreLoggerProvider>, max_level: log::LevelFilter) -> Result<()> {
    log::set_boxed_logger(Box::new(Self::new(provider))).map_err(|e| Error::LogBridgeInit(e.to_string()))?;
    log::set_max_level(max_level);
    Ok(())
  }

  fn logger(&self, target: &str) -> FibreLogger {
    if let Some(logger) = self.loggers.get(target) {
      return logger.clone();
    }
    self
      .loggers
      .entry(target.to_string())
      .or_insert_with(|| self.provider.logger(target))
      .clone()
  }

  /// The state a record is logged with.
  pub fn state_for(record: &log::Record<'_>) -> State {
    let mut pairs = PairList::new();
    let mut collector = PairCollector { pairs: &mut pairs };
    if let Err(e) = record.key_values().visit(&mut collector) {
      SelfLog::write_line(format_args!("Failed to read key/values of a log record: {}", e));
    }
    pairs.push(ORIGINAL_FORMAT, escape_braces(&record.args().to_string()));
    State::Pairs(pairs)
  }
}

struct PairCollector<'a> {
  pairs: &'a mut PairList,
}

impl<'kvs> VisitSource<'kvs> for PairCollector<'_> {
  fn visit_pair(&mut self, key: kv::Key<'kvs>, value: kv::Value<'kvs>) -> std::result::Result<(), kv::Error> {
    self.pairs.push(key.as_str(), to_value(&value));
    Ok(())
  }
}

// Integers before floats: `to_f64` also accepts integers.
fn to_value(value: &kv::Value<'_>) -> Value {
  if let Some(b) = value.to_bool() {
    Value::Bool(b)
  } else if let Some(i) = value.to_i64() {
    Value::I64(i)
  } else if let Some(u) = value.to_u64() {
    Value::U64(u)
  } else if let Some(f) = value.to_f64() {
    Value::F64(f)
  } else if let Some(s) = value.to_borrowed_str() {
    Value::Str(s.to_string())
  } else {
    Value::Str(value.to_string())
  }
}

fn escape_braces(message: &str) -> String {
  message.replace('{', "{{").replace('}', "}}")
}

fn format_record(state: &State, _exception: Option<&Exception>) -> String {
  state.to_string()
}

impl log::Log for LogBridge {
  fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
    self.logger(metadata.target()).is_enabled(LogLevel::from(metadata.level()))
  }

  fn log(&self, record: &log::Record<'_>) {
    let logger = self.logger(record.target());
    let level = LogLevel::from(record.level());
    if !logger.is_enabled(level) {
      return;
    }
    let state = Self::state_for(record);
    if let Err(e) = logger.log(level, &EventId::default(), &state, None, Some(&format_record)) {
      SelfLog::write_line(format_args!("Failed to write a log record through LogBridge: {}", e));
    }
  }

  fn flush(&self) {
    self.provider.flush();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use fibre_events::sink::InMemorySink;
  use fibre_events::{LogEventLevel, LoggerConfiguration, PropertyValue, Scalar};
  use log::Log;

  fn bridge() -> (LogBridge, Arc<InMemorySink>) {
    let sink = Arc::new(InMemorySink::new());
    let logger = LoggerConfiguration::new()
      .minimum_level(LogEventLevel::Debug)
      .write_to("memory", sink.clone())
      .create_logger();
    let provider = Arc::new(FibreLoggerProvider::new(Some(logger), false));
    (LogBridge::new(provider), sink)
  }

  #[test]
  fn record_becomes_event_with_category_and_pairs() {
    let (bridge, sink) = bridge();
    bridge.log(
      &log::Record::builder()
        .args(format_args!("order {} shipped", "{A-1}"))
        .level(log::Level::Warn)
        .target("shop::orders")
        .key_values(&("count", 3i64))
        .build(),
    );

    let event = sink.single().unwrap();
    assert_eq!(event.level(), LogEventLevel::Warning);
    assert_eq!(event.render_message(), "order {A-1} shipped");
    assert_eq!(
      event.property(fibre_events::SOURCE_CONTEXT_PROPERTY),
      Some(&PropertyValue::scalar("shop::orders"))
    );
    assert_eq!(event.property("count"), Some(&PropertyValue::Scalar(Scalar::I64(3))));
  }

  #[test]
  fn records_below_the_minimum_are_dropped() {
    let (bridge, sink) = bridge();
    let metadata = log::Metadata::builder().level(log::Level::Trace).target("t").build();
    assert!(!bridge.enabled(&metadata));
    bridge.log(
      &log::Record::builder()
        .args(format_args!("noise"))
        .level(log::Level::Trace)
        .target("t")
        .build(),
    );
    assert!(sink.is_empty());
  }

  #[test]
  fn braces_are_escaped() {
    assert_eq!(escape_braces("{a}"), "{{a}}");
  }
}
