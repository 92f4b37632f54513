mod common;

use common::{int, provider, text};
use fibre_events::sink::InMemorySink;
use fibre_events::{Log, LogEventLevel, LoggerConfiguration, SelfLog, Value};
use fibre_log_adapter::{
  EventId, FibreLoggerFactory, FibreLoggerProvider, LogLevel, Logger, LoggerExt, LoggerFactory, LoggerProvider,
  LoggerProviderCollection, LoggerProviderCollectionSink, ProviderOptions, ScopeHandle, State, StateFormatter,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::sync::Arc;

/// A front-end provider that records what it is asked to log.
#[derive(Default)]
struct RecordingProvider {
  records: Arc<Mutex<Vec<Record>>>,
  disposed: Mutex<bool>,
}

#[derive(Debug, Clone, PartialEq)]
struct Record {
  category: String,
  level: LogLevel,
  event_id: EventId,
  message: String,
  pairs: Vec<(String, Value)>,
}

struct RecordingLogger {
  category: String,
  records: Arc<Mutex<Vec<Record>>>,
}

impl Logger for RecordingLogger {
  fn is_enabled(&self, _level: LogLevel) -> bool {
    true
  }

  fn log(
    &self,
    level: LogLevel,
    event_id: &EventId,
    state: &State,
    exception: Option<&fibre_events::Exception>,
    formatter: Option<&StateFormatter>,
  ) -> fibre_log_adapter::Result<()> {
    let pairs = match state {
      State::Event(values) => values.entries().into_iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
      _ => Vec::new(),
    };
    self.records.lock().push(Record {
      category: self.category.clone(),
      level,
      event_id: event_id.clone(),
      message: formatter.map(|f| f(state, exception)).unwrap_or_default(),
      pairs,
    });
    Ok(())
  }

  fn begin_scope(&self, _state: State) -> ScopeHandle {
    ScopeHandle::noop()
  }
}

impl LoggerProvider for RecordingProvider {
  fn create_logger(&self, category: &str) -> Arc<dyn Logger> {
    Arc::new(RecordingLogger {
      category: category.to_string(),
      records: self.records.clone(),
    })
  }

  fn dispose(&self) {
    *self.disposed.lock() = true;
  }
}

#[test]
fn disposing_closes_the_given_logger_only_when_asked() {
  let sink = Arc::new(InMemorySink::new());
  let backend = LoggerConfiguration::new().write_to("memory", sink.clone()).create_logger();

  let keeps = FibreLoggerProvider::new(Some(backend.clone()), false);
  keeps.dispose();
  assert!(!backend.is_closed());

  let closes = FibreLoggerProvider::new(Some(backend.clone()), true);
  let logger = closes.create_logger("shutdown");
  closes.dispose();
  closes.dispose();
  assert!(backend.is_closed());

  logger.log_information("after close", vec![]).unwrap();
  assert!(sink.is_empty());
}

#[test]
#[serial(global_logger)]
fn without_a_logger_the_global_one_is_used_and_closed() {
  let sink = Arc::new(InMemorySink::new());
  let global = LoggerConfiguration::new().write_to("memory", sink.clone()).create_logger();
  Log::set_logger(global.clone());

  let provider = FibreLoggerProvider::new(None, true);
  let logger = provider.create_logger("global");
  let _scope = provider.begin_scope(State::Pair("Run".to_string(), Value::from(1)));
  logger.log_information("Through global", vec![]).unwrap();
  provider.dispose();

  assert!(global.is_closed());
  let event = sink.single().unwrap();
  assert_eq!(event.property("SourceContext"), Some(&text("global")));
  assert_eq!(event.property("Run"), Some(&int(1)));
}

#[test]
fn provider_options_select_private_caches() {
  let options = ProviderOptions::from_yaml_str("caches:\n  event_id_capacity: 1\n").unwrap();
  let (provider, sink) = provider();
  let configured = FibreLoggerProvider::builder().options(&options).build();
  assert!(!Arc::ptr_eq(provider.caches(), configured.caches()));

  let logger = provider.create_logger("ids");
  logger
    .log_message(LogLevel::Warning, &EventId::new(1, None), None, "one", vec![])
    .unwrap();
  assert_eq!(sink.len(), 1);
}

#[test]
fn the_collection_sink_forwards_events_to_every_provider() {
  let collection = Arc::new(LoggerProviderCollection::new());
  let recorder = Arc::new(RecordingProvider::default());
  collection.add_provider(recorder.clone());

  let backend = LoggerConfiguration::new()
    .write_to("providers", LoggerProviderCollectionSink::new(collection.clone()))
    .create_logger();
  let provider = FibreLoggerProvider::builder().logger(backend).build();
  let logger = provider.create_logger("orders");

  logger
    .log_message(
      LogLevel::Warning,
      &EventId::new(7, Some("Late")),
      None,
      "Order {OrderId} is late",
      vec![Value::from(99)],
    )
    .unwrap();

  let records = recorder.records.lock();
  assert_eq!(records.len(), 1);
  let record = &records[0];
  assert_eq!(record.category, "orders");
  assert_eq!(record.level, LogLevel::Warning);
  assert_eq!(record.event_id, EventId::new(7, Some("Late")));
  assert_eq!(record.message, "Order 99 is late");
  assert!(record.pairs.contains(&("OrderId".to_string(), Value::I64(99))));
  assert_eq!(
    record.pairs.last(),
    Some(&("{OriginalFormat}".to_string(), Value::from("Order {OrderId} is late")))
  );
}

#[test]
fn events_without_a_source_context_use_the_none_category() {
  let collection = Arc::new(LoggerProviderCollection::new());
  let recorder = Arc::new(RecordingProvider::default());
  collection.add_provider(recorder.clone());
  let backend = LoggerConfiguration::new()
    .minimum_level(LogEventLevel::Debug)
    .write_to("providers", LoggerProviderCollectionSink::new(collection))
    .create_logger();

  backend.information("direct", &[]).unwrap();

  let records = recorder.records.lock();
  assert_eq!(records[0].category, "None");
  assert!(records[0].event_id.is_default());
}

#[test]
fn factory_adds_providers_to_its_collection_and_disposes() {
  let collection = Arc::new(LoggerProviderCollection::new());
  let (provider, _) = provider();
  let factory = FibreLoggerFactory::with_provider(provider, Some(collection.clone()));
  let recorder = Arc::new(RecordingProvider::default());

  factory.add_provider(recorder.clone());
  assert_eq!(collection.providers().len(), 1);

  collection.dispose();
  assert!(*recorder.disposed.lock());
  factory.dispose();
}

#[test]
#[serial(self_log)]
fn factory_without_a_collection_ignores_providers() {
  let lines = Arc::new(Mutex::new(Vec::<String>::new()));
  let captured = lines.clone();
  SelfLog::enable(move |line| captured.lock().push(line.to_string()));

  let factory = FibreLoggerFactory::new(None, false, None);
  factory.add_provider(Arc::new(RecordingProvider::default()));
  let logger = factory.create_logger("anything");
  SelfLog::disable();

  assert!(lines.lock().iter().any(|line| line.contains("Ignoring added logger provider")));
  assert!(!logger.is_enabled(LogLevel::None));
}
