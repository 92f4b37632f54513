use crate::level::LogEventLevel;
use crate::template::MessageTemplate;
use crate::value::{LogEventProperty, PropertyValue};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::sync::Arc;

/// An error attached to an event.
pub type Exception = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// A single structured log record.
///
/// Properties keep their insertion order, which is the order sinks see them in.
#[derive(Debug, Clone)]
pub struct LogEvent {
  timestamp: DateTime<Utc>,
  level: LogEventLevel,
  exception: Option<Exception>,
  template: Arc<MessageTemplate>,
  properties: IndexMap<String, Arc<PropertyValue>>,
}

impl LogEvent {
  pub fn new(
    timestamp: DateTime<Utc>,
    level: LogEventLevel,
    exception: Option<Exception>,
    template: Arc<MessageTemplate>,
    properties: impl IntoIterator<Item = LogEventProperty>,
  ) -> Self {
    let mut event = Self {
      timestamp,
      level,
      exception,
      template,
      properties: IndexMap::new(),
    };
    for property in properties {
      event.add_or_update(property);
    }
    event
  }

  pub fn timestamp(&self) -> DateTime<Utc> {
    self.timestamp
  }

  pub fn level(&self) -> LogEventLevel {
    self.level
  }

  pub fn exception(&self) -> Option<&Exception> {
    self.exception.as_ref()
  }

  pub fn message_template(&self) -> &Arc<MessageTemplate> {
    &self.template
  }

  pub fn properties(&self) -> &IndexMap<String, Arc<PropertyValue>> {
    &self.properties
  }

  pub fn property(&self, name: &str) -> Option<&PropertyValue> {
    self.properties.get(name).map(Arc::as_ref)
  }

  /// The shared value behind a property, for identity comparisons.
  pub fn property_arc(&self, name: &str) -> Option<&Arc<PropertyValue>> {
    self.properties.get(name)
  }

  pub fn contains_property(&self, name: &str) -> bool {
    self.properties.contains_key(name)
  }

  /// Adds the property unless one with the same name is already present.
  ///
  /// Returns `true` if the property was added.
  pub fn add_if_absent(&mut self, property: LogEventProperty) -> bool {
    if self.properties.contains_key(&property.name) {
      return false;
    }
    self.properties.insert(property.name, property.value);
    true
  }

  pub fn add_or_update(&mut self, property: LogEventProperty) {
    self.properties.insert(property.name, property.value);
  }

  pub fn remove_property(&mut self, name: &str) -> Option<Arc<PropertyValue>> {
    self.properties.shift_remove(name)
  }

  pub fn render_message(&self) -> String {
    self.template.render(&self.properties)
  }
}
