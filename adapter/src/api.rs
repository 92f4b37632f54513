//! The generic logging front-end: categories, levels, event ids and scopes.

use crate::binder::StateFormatter;
use crate::error::Result;
use crate::event_id::EventId;
use crate::level::LogLevel;
use crate::scope::ScopeHandle;
use crate::state::{FormattedLogValues, State};
use fibre_events::{Exception, Value};
use std::sync::Arc;

pub trait Logger: Send + Sync {
  fn is_enabled(&self, level: LogLevel) -> bool;

  /// Writes one event. Only failures the caller must act on, such as an audit sink
  /// rejecting the event, are returned.
  fn log(
    &self,
    level: LogLevel,
    event_id: &EventId,
    state: &State,
    exception: Option<&Exception>,
    formatter: Option<&StateFormatter>,
  ) -> Result<()>;

  fn begin_scope(&self, state: State) -> ScopeHandle;
}

pub trait LoggerProvider: Send + Sync {
  fn create_logger(&self, category: &str) -> Arc<dyn Logger>;

  fn dispose(&self) {}
}

pub trait LoggerFactory: Send + Sync {
  fn create_logger(&self, category: &str) -> Arc<dyn Logger>;

  fn add_provider(&self, provider: Arc<dyn LoggerProvider>);

  fn dispose(&self);
}

fn format_state(state: &State, _exception: Option<&Exception>) -> String {
  state.to_string()
}

/// Message-template helpers over [`Logger::log`].
pub trait LoggerExt: Logger {
  fn log_message(
    &self,
    level: LogLevel,
    event_id: &EventId,
    exception: Option<&Exception>,
    format: &str,
    args: Vec<Value>,
  ) -> Result<()> {
    let state = State::Formatted(FormattedLogValues::new(format, args));
    self.log(level, event_id, &state, exception, Some(&format_state))
  }

  fn log_trace(&self, format: &str, args: Vec<Value>) -> Result<()> {
    self.log_message(LogLevel::Trace, &EventId::default(), None, format, args)
  }

  fn log_debug(&self, format: &str, args: Vec<Value>) -> Result<()> {
    self.log_message(LogLevel::Debug, &EventId::default(), None, format, args)
  }

  fn log_information(&self, format: &str, args: Vec<Value>) -> Result<()> {
    self.log_message(LogLevel::Information, &EventId::default(), None, format, args)
  }

  fn log_warning(&self, format: &str, args: Vec<Value>) -> Result<()> {
    self.log_message(LogLevel::Warning, &EventId::default(), None, format, args)
  }

  fn log_error(&self, exception: Option<&Exception>, format: &str, args: Vec<Value>) -> Result<()> {
    self.log_message(LogLevel::Error, &EventId::default(), exception, format, args)
  }

  fn log_critical(&self, exception: Option<&Exception>, format: &str, args: Vec<Value>) -> Result<()> {
    self.log_message(LogLevel::Critical, &EventId::default(), exception, format, args)
  }

  /// Begins a scope described by a format string and its arguments.
  fn begin_scope_with(&self, format: &str, args: Vec<Value>) -> ScopeHandle {
    self.begin_scope(State::Formatted(FormattedLogValues::new(format, args)))
  }
}

impl<L: Logger + ?Sized> LoggerExt for L {}
