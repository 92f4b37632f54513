// src/logger.rs
use crate::binding::PropertyBinder;
use crate::context::LogContext;
use crate::enrich::{Enricher, FixedPropertyEnricher, PropertyFactory};
use crate::error::{Error, Result, SinkFailure};
use crate::event::{Exception, LogEvent};
use crate::level::LogEventLevel;
use crate::self_log::SelfLog;
use crate::sink::Sink;
use crate::template::{Destructuring, MessageTemplate, MessageTemplateParser};
use crate::value::{LogEventProperty, Value};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// --- Configuration ---

struct SinkEntry {
  name: String,
  sink: Arc<dyn Sink>,
  minimum_level: Option<LogEventLevel>,
  audit: bool,
}

/// Builds a [`Logger`].
pub struct LoggerConfiguration {
  minimum_level: LogEventLevel,
  sinks: Vec<SinkEntry>,
  enrichers: Vec<Arc<dyn Enricher>>,
  from_log_context: bool,
  binder: PropertyBinder,
}

impl Default for LoggerConfiguration {
  fn default() -> Self {
    Self {
      minimum_level: LogEventLevel::Information,
      sinks: Vec::new(),
      enrichers: Vec::new(),
      from_log_context: false,
      binder: PropertyBinder::default(),
    }
  }
}

impl LoggerConfiguration {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn minimum_level(mut self, level: LogEventLevel) -> Self {
    self.minimum_level = level;
    self
  }

  /// Adds a sink. Failures are reported to [`SelfLog`] and otherwise ignored.
  pub fn write_to(self, name: impl Into<String>, sink: impl Sink + 'static) -> Self {
    self.add_sink(name.into(), Arc::new(sink), None, false)
  }

  /// Adds a sink that only receives events at or above `level`.
  pub fn write_to_at(self, name: impl Into<String>, sink: impl Sink + 'static, level: LogEventLevel) -> Self {
    self.add_sink(name.into(), Arc::new(sink), Some(level), false)
  }

  /// Adds an audit sink: its failures are returned to the caller of [`Logger::write`].
  pub fn audit_to(self, name: impl Into<String>, sink: impl Sink + 'static) -> Self {
    self.add_sink(name.into(), Arc::new(sink), None, true)
  }

  pub(crate) fn add_sink(
    mut self,
    name: String,
    sink: Arc<dyn Sink>,
    minimum_level: Option<LogEventLevel>,
    audit: bool,
  ) -> Self {
    self.sinks.push(SinkEntry {
      name,
      sink,
      minimum_level,
      audit,
    });
    self
  }

  pub fn enrich_with(mut self, enricher: Arc<dyn Enricher>) -> Self {
    self.enrichers.push(enricher);
    self
  }

  pub fn enrich_with_property(self, name: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
    let property = self
      .binder
      .bind_property(name, &value.into(), Destructuring::Default)?;
    Ok(self.enrich_with(Arc::new(FixedPropertyEnricher::new(property))))
  }

  /// Applies the enrichers pushed through [`LogContext`] to every event.
  pub fn enrich_from_log_context(mut self) -> Self {
    self.from_log_context = true;
    self
  }

  pub fn max_depth(mut self, depth: usize) -> Self {
    self.binder = PropertyBinder::with_max_depth(depth);
    self
  }

  pub fn create_logger(self) -> Logger {
    Logger {
      core: Arc::new(LoggerCore {
        minimum_level: self.minimum_level,
        sinks: self.sinks,
        enrichers: self.enrichers,
        from_log_context: self.from_log_context,
        binder: self.binder,
        parser: MessageTemplateParser::new(),
        closed: AtomicBool::new(false),
      }),
      contextual: Arc::from(Vec::new()),
    }
  }
}

// --- Logger ---

struct LoggerCore {
  minimum_level: LogEventLevel,
  sinks: Vec<SinkEntry>,
  enrichers: Vec<Arc<dyn Enricher>>,
  from_log_context: bool,
  binder: PropertyBinder,
  parser: MessageTemplateParser,
  closed: AtomicBool,
}

/// The event pipeline: level check, enrichment, then dispatch to every sink.
///
/// Cloning is cheap; clones and [`for_context`](Logger::for_context) children share
/// the same sinks and are closed together.
#[derive(Clone)]
pub struct Logger {
  core: Arc<LoggerCore>,
  contextual: Arc<[Arc<dyn Enricher>]>,
}

impl std::fmt::Debug for Logger {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Logger")
      .field("minimum_level", &self.core.minimum_level)
      .field("sinks", &self.core.sinks.iter().map(|s| s.name.as_str()).collect::<Vec<_>>())
      .field("contextual_enrichers", &self.contextual.len())
      .finish()
  }
}

impl Logger {
  /// A logger with no sinks.
  pub fn none() -> Logger {
    LoggerConfiguration::new().create_logger()
  }

  pub fn is_enabled(&self, level: LogEventLevel) -> bool {
    !self.is_closed() && level >= self.core.minimum_level
  }

  pub fn minimum_level(&self) -> LogEventLevel {
    self.core.minimum_level
  }

  /// Binds a value as a named property, or `None` if the name is not a valid property name.
  pub fn bind_property(&self, name: &str, value: &Value, destructure: bool) -> Option<LogEventProperty> {
    self.core.binder.create_property(name, value, destructure).ok()
  }

  pub fn property_factory(&self) -> &dyn PropertyFactory {
    &self.core.binder
  }

  pub fn parse_template(&self, text: &str) -> MessageTemplate {
    self.core.parser.parse(text)
  }

  /// A child logger that applies `enricher` before this logger's own enrichers.
  pub fn for_context(&self, enricher: Arc<dyn Enricher>) -> Logger {
    let mut contextual: Vec<Arc<dyn Enricher>> = self.contextual.iter().cloned().collect();
    contextual.push(enricher);
    Logger {
      core: self.core.clone(),
      contextual: Arc::from(contextual),
    }
  }

  /// A child logger that attaches a fixed property to every event.
  pub fn for_context_property(&self, name: &str, value: impl Into<Value>) -> Logger {
    match self.bind_property(name, &value.into(), false) {
      Some(property) => self.for_context(Arc::new(FixedPropertyEnricher::new(property))),
      None => self.clone(),
    }
  }

  /// Enriches and dispatches an event.
  ///
  /// Failures of ordinary sinks go to [`SelfLog`]. Failures of audit sinks are
  /// collected and returned as [`Error::Audit`].
  pub fn write(&self, mut event: LogEvent) -> Result<()> {
    if !self.is_enabled(event.level()) {
      return Ok(());
    }

    let factory: &dyn PropertyFactory = &self.core.binder;
    for enricher in self.contextual.iter().rev() {
      enricher.enrich(&mut event, factory);
    }
    for enricher in &self.core.enrichers {
      enricher.enrich(&mut event, factory);
    }
    if self.core.from_log_context {
      LogContext::enrich(&mut event, factory);
    }

    let mut failures = Vec::new();
    for entry in &self.core.sinks {
      if entry.minimum_level.is_some_and(|min| event.level() < min) {
        continue;
      }
      if let Err(error) = entry.sink.emit(&event) {
        if entry.audit {
          failures.push(SinkFailure {
            sink: entry.name.clone(),
            error,
          });
        } else {
          SelfLog::write_line(format_args!("Caught exception while emitting to sink {}: {}", entry.name, error));
        }
      }
    }

    if failures.is_empty() {
      Ok(())
    } else {
      Err(Error::Audit(failures))
    }
  }

  /// Parses `template`, binds `args` to its holes positionally and writes the event.
  pub fn write_template(
    &self,
    level: LogEventLevel,
    exception: Option<Exception>,
    template: &str,
    args: &[Value],
  ) -> Result<()> {
    if !self.is_enabled(level) {
      return Ok(());
    }
    let template = self.parse_template(template);
    let properties = self.core.binder.bind_template(&template, args);
    self.write(LogEvent::new(Utc::now(), level, exception, Arc::new(template), properties))
  }

  pub fn information(&self, template: &str, args: &[Value]) -> Result<()> {
    self.write_template(LogEventLevel::Information, None, template, args)
  }

  pub fn warning(&self, template: &str, args: &[Value]) -> Result<()> {
    self.write_template(LogEventLevel::Warning, None, template, args)
  }

  pub fn error(&self, exception: Option<Exception>, template: &str, args: &[Value]) -> Result<()> {
    self.write_template(LogEventLevel::Error, exception, template, args)
  }

  pub fn flush(&self) {
    for entry in &self.core.sinks {
      if let Err(error) = entry.sink.flush() {
        SelfLog::write_line(format_args!("Failed to flush sink {}: {}", entry.name, error));
      }
    }
  }

  /// Flushes every sink and stops accepting events. Idempotent.
  pub fn close(&self) {
    if !self.core.closed.swap(true, Ordering::AcqRel) {
      self.flush();
    }
  }

  pub fn is_closed(&self) -> bool {
    self.core.closed.load(Ordering::Acquire)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sink::InMemorySink;
  use pretty_assertions::assert_eq;

  #[test]
  fn filters_below_minimum_level() {
    let sink = Arc::new(InMemorySink::new());
    let logger = LoggerConfiguration::new()
      .minimum_level(LogEventLevel::Warning)
      .write_to("memory", sink.clone())
      .create_logger();

    logger.information("quiet", &[]).unwrap();
    logger.warning("loud", &[]).unwrap();

    assert_eq!(sink.len(), 1);
    assert!(!logger.is_enabled(LogEventLevel::Debug));
  }

  #[test]
  fn child_context_wins_over_parent_enrichers() {
    let sink = Arc::new(InMemorySink::new());
    let logger = LoggerConfiguration::new()
      .enrich_with_property("Origin", "parent")
      .unwrap()
      .write_to("memory", sink.clone())
      .create_logger();

    let child = logger.for_context_property("Origin", "child");
    child.information("hi", &[]).unwrap();

    let event = sink.single().expect("one event");
    assert_eq!(event.property("Origin").unwrap().to_string(), "\"child\"");
  }

  #[test]
  fn closed_logger_drops_events() {
    let sink = Arc::new(InMemorySink::new());
    let logger = LoggerConfiguration::new().write_to("memory", sink.clone()).create_logger();
    logger.close();
    logger.information("ignored", &[]).unwrap();
    assert!(sink.is_empty());
    assert!(logger.is_closed());
  }
}
