// Shared setup for the integration suites.
#![allow(dead_code)]

use fibre_events::sink::InMemorySink;
use fibre_events::{LogEventLevel, LoggerConfiguration, PropertyValue, Scalar};
use fibre_log_adapter::FibreLoggerProvider;
use std::sync::Arc;

pub fn provider_at(level: LogEventLevel) -> (FibreLoggerProvider, Arc<InMemorySink>) {
  let sink = Arc::new(InMemorySink::new());
  let logger = LoggerConfiguration::new()
    .minimum_level(level)
    .write_to("memory", sink.clone())
    .create_logger();
  (FibreLoggerProvider::builder().logger(logger).build(), sink)
}

pub fn provider() -> (FibreLoggerProvider, Arc<InMemorySink>) {
  provider_at(LogEventLevel::Verbose)
}

pub fn text(value: &str) -> PropertyValue {
  PropertyValue::scalar(value)
}

pub fn int(value: i64) -> PropertyValue {
  PropertyValue::Scalar(Scalar::I64(value))
}
