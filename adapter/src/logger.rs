use crate::api::Logger;
use crate::binder::{self, StateFormatter};
use crate::caches::BindingCaches;
use crate::error::Result;
use crate::event_id::EventId;
use crate::level::{LevelConvert, LogLevel};
use crate::scope::{ScopeHandle, ScopeStack};
use crate::state::State;
use chrono::Utc;
use fibre_events::{Exception, LogEvent, SelfLog};
use std::sync::Arc;

/// A [`Logger`] for one category, writing through a `fibre_events` logger.
///
/// Every event carries the category as its `SourceContext` property.
#[derive(Clone)]
pub struct FibreLogger {
  logger: fibre_events::Logger,
  scopes: Arc<ScopeStack>,
  caches: Arc<BindingCaches>,
  category: Arc<str>,
}

impl std::fmt::Debug for FibreLogger {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FibreLogger")
      .field("category", &self.category)
      .field("logger", &self.logger)
      .finish()
  }
}

impl FibreLogger {
  pub(crate) fn new(
    logger: fibre_events::Logger,
    scopes: Arc<ScopeStack>,
    caches: Arc<BindingCaches>,
    category: &str,
  ) -> Self {
    Self {
      logger: logger.for_context_property(fibre_events::SOURCE_CONTEXT_PROPERTY, category),
      scopes,
      caches,
      category: Arc::from(category),
    }
  }

  pub fn category(&self) -> &str {
    &self.category
  }

  /// The backend logger events are written through.
  pub fn inner(&self) -> &fibre_events::Logger {
    &self.logger
  }
}

impl Logger for FibreLogger {
  fn is_enabled(&self, level: LogLevel) -> bool {
    level != LogLevel::None && self.logger.is_enabled(LevelConvert::to_backend_level(level))
  }

  fn log(
    &self,
    level: LogLevel,
    event_id: &EventId,
    state: &State,
    exception: Option<&Exception>,
    formatter: Option<&StateFormatter>,
  ) -> Result<()> {
    if level == LogLevel::None {
      return Ok(());
    }
    let backend_level = LevelConvert::to_backend_level(level);
    if !self.logger.is_enabled(backend_level) {
      return Ok(());
    }

    let bound = match binder::bind(&self.logger, &self.caches, state, formatter, event_id) {
      Ok(bound) => bound,
      Err(error) => {
        SelfLog::write_line(format_args!("Failed to write event through FibreLogger: {}", error));
        return Ok(());
      }
    };

    let event = LogEvent::new(
      Utc::now(),
      backend_level,
      exception.cloned(),
      bound.template,
      bound.properties,
    );
    self.logger.write(event)?;
    Ok(())
  }

  fn begin_scope(&self, state: State) -> ScopeHandle {
    self.scopes.push(state)
  }
}
