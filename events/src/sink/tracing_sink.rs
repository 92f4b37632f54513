use super::Sink;
use crate::error::SinkError;
use crate::event::LogEvent;
use crate::level::LogEventLevel;
use std::fmt::Write;

/// Forwards events to the `tracing` dispatcher.
///
/// The rendered message becomes the event message. `SourceContext` and the remaining
/// properties are recorded as the `source_context` and `properties` fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
  pub fn new() -> Self {
    Self
  }
}

impl Sink for TracingSink {
  fn emit(&self, event: &LogEvent) -> Result<(), SinkError> {
    let message = event.render_message();
    let source_context = event
      .property(crate::SOURCE_CONTEXT_PROPERTY)
      .and_then(|v| v.as_scalar())
      .and_then(|s| s.as_str())
      .unwrap_or("")
      .to_string();

    let mut properties = String::new();
    for (name, value) in event.properties() {
      if name == crate::SOURCE_CONTEXT_PROPERTY {
        continue;
      }
      if !properties.is_empty() {
        properties.push_str(", ");
      }
      let _ = write!(properties, "{}={}", name, value);
    }
    let error = event.exception().map(|e| e.to_string());

    macro_rules! forward {
      ($level:expr) => {
        tracing::event!(
          target: "fibre_events",
          $level,
          source_context = %source_context,
          properties = %properties,
          error = error.as_deref(),
          "{}",
          message
        )
      };
    }

    match event.level() {
      LogEventLevel::Verbose => forward!(tracing::Level::TRACE),
      LogEventLevel::Debug => forward!(tracing::Level::DEBUG),
      LogEventLevel::Information => forward!(tracing::Level::INFO),
      LogEventLevel::Warning => forward!(tracing::Level::WARN),
      LogEventLevel::Error | LogEventLevel::Fatal => forward!(tracing::Level::ERROR),
    }
    Ok(())
  }
}
