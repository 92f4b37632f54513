//! Enrichers add properties to events after they are created.

use crate::binding::PropertyBinder;
use crate::error::Result;
use crate::event::LogEvent;
use crate::template::Destructuring;
use crate::value::{LogEventProperty, Value};

/// Creates properties from captured values, the same way the pipeline binds template
/// arguments.
pub trait PropertyFactory {
  fn create_property(&self, name: &str, value: &Value, destructure: bool) -> Result<LogEventProperty>;
}

impl PropertyFactory for PropertyBinder {
  fn create_property(&self, name: &str, value: &Value, destructure: bool) -> Result<LogEventProperty> {
    let destructuring = if destructure {
      Destructuring::Destructure
    } else {
      Destructuring::Default
    };
    self.bind_property(name, value, destructuring)
  }
}

pub trait Enricher: Send + Sync {
  fn enrich(&self, event: &mut LogEvent, factory: &dyn PropertyFactory);
}

impl<F> Enricher for F
where
  F: Fn(&mut LogEvent, &dyn PropertyFactory) + Send + Sync,
{
  fn enrich(&self, event: &mut LogEvent, factory: &dyn PropertyFactory) {
    self(event, factory)
  }
}

/// Adds one pre-bound property, unless the event already has it.
#[derive(Debug, Clone)]
pub struct FixedPropertyEnricher {
  property: LogEventProperty,
}

impl FixedPropertyEnricher {
  pub fn new(property: LogEventProperty) -> Self {
    Self { property }
  }
}

impl Enricher for FixedPropertyEnricher {
  fn enrich(&self, event: &mut LogEvent, _factory: &dyn PropertyFactory) {
    event.add_if_absent(self.property.clone());
  }
}
