//! Sending backend events back out through other front-end providers.

use crate::api::LoggerProvider;
use crate::event_id::EventId;
use crate::event_id_cache::EVENT_ID_PROPERTY;
use crate::level::LevelConvert;
use crate::state::{State, ORIGINAL_FORMAT};
use fibre_events::sink::Sink;
use fibre_events::{Exception, LogEvent, MessageTemplate, PropertyValue, Scalar, SinkError, Value};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

const UNKNOWN_CATEGORY: &str = "None";

/// A copy-on-write list of providers.
#[derive(Default)]
pub struct LoggerProviderCollection {
  providers: RwLock<Arc<Vec<Arc<dyn LoggerProvider>>>>,
}

impl fmt::Debug for LoggerProviderCollection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LoggerProviderCollection")
      .field("providers", &self.providers.read().len())
      .finish()
  }
}

impl LoggerProviderCollection {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_provider(&self, provider: Arc<dyn LoggerProvider>) {
    let mut providers = self.providers.write();
    let mut next = Vec::with_capacity(providers.len() + 1);
    next.extend(providers.iter().cloned());
    next.push(provider);
    *providers = Arc::new(next);
  }

  /// A snapshot; later additions do not show up in it.
  pub fn providers(&self) -> Arc<Vec<Arc<dyn LoggerProvider>>> {
    self.providers.read().clone()
  }

  pub fn dispose(&self) {
    for provider in self.providers().iter() {
      provider.dispose();
    }
  }
}

/// A backend sink that logs every event through each provider in a collection.
///
/// The category comes from `SourceContext` and the event id from the `EventId`
/// structure. The state handed to each provider is a [`LogEventValues`].
#[derive(Debug, Clone)]
pub struct LoggerProviderCollectionSink {
  providers: Arc<LoggerProviderCollection>,
}

impl LoggerProviderCollectionSink {
  pub fn new(providers: Arc<LoggerProviderCollection>) -> Self {
    Self { providers }
  }

  pub fn dispose(&self) {
    self.providers.dispose();
  }
}

fn format_values(state: &State, _exception: Option<&Exception>) -> String {
  state.to_string()
}

impl Sink for LoggerProviderCollectionSink {
  fn emit(&self, event: &LogEvent) -> Result<(), SinkError> {
    let category = match event.property(fibre_events::SOURCE_CONTEXT_PROPERTY) {
      Some(PropertyValue::Scalar(Scalar::Str(source))) => source.as_str(),
      _ => UNKNOWN_CATEGORY,
    };
    let event_id = event_id_of(event);
    let level = LevelConvert::to_generic_level(event.level());
    let state = State::Event(LogEventValues::new(
      event.message_template().clone(),
      event.properties().clone(),
    ));

    let mut first_error = None;
    for provider in self.providers.providers().iter() {
      let logger = provider.create_logger(category);
      if let Err(error) = logger.log(level, &event_id, &state, event.exception(), Some(&format_values)) {
        first_error.get_or_insert(error);
      }
    }
    match first_error {
      Some(error) => Err(SinkError::Other(error.to_string())),
      None => Ok(()),
    }
  }
}

fn event_id_of(event: &LogEvent) -> EventId {
  let Some(PropertyValue::Structure(structure)) = event.property(EVENT_ID_PROPERTY) else {
    return EventId::default();
  };
  let id = match structure.get("Id") {
    Some(PropertyValue::Scalar(scalar)) => scalar.as_i64().and_then(|id| i32::try_from(id).ok()).unwrap_or(0),
    _ => 0,
  };
  let name = match structure.get("Name") {
    Some(PropertyValue::Scalar(Scalar::Str(name))) => Some(name.as_str()),
    _ => None,
  };
  EventId::new(id, name)
}

/// An event's properties as key/value state, followed by its template under
/// [`ORIGINAL_FORMAT`]. Displays as the rendered message.
#[derive(Debug, Clone)]
pub struct LogEventValues {
  template: Arc<MessageTemplate>,
  properties: IndexMap<String, Arc<PropertyValue>>,
  values: Vec<(String, Value)>,
}

impl LogEventValues {
  pub fn new(template: Arc<MessageTemplate>, properties: IndexMap<String, Arc<PropertyValue>>) -> Self {
    let mut values: Vec<(String, Value)> = properties
      .iter()
      .map(|(name, value)| (name.clone(), Value::from(value.as_ref())))
      .collect();
    values.push((ORIGINAL_FORMAT.to_string(), Value::Str(template.text().to_string())));
    Self {
      template,
      properties,
      values,
    }
  }

  pub fn entries(&self) -> Vec<(&str, &Value)> {
    self.values.iter().map(|(k, v)| (k.as_str(), v)).collect()
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

impl fmt::Display for LogEventValues {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.template.render(&self.properties))
  }
}
