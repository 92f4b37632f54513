use super::Formatter;
use crate::error::SinkError;
use crate::event::LogEvent;
use std::fmt::Write;

/// `2024-01-01T12:00:00.000Z [INF] (SourceContext) message`, followed by the error on
/// its own line when one is attached.
#[derive(Debug, Clone)]
pub struct TextFormatter {
  timestamp_format: String,
  include_properties: bool,
}

impl Default for TextFormatter {
  fn default() -> Self {
    Self {
      timestamp_format: "%Y-%m-%dT%H:%M:%S%.3fZ".to_string(),
      include_properties: false,
    }
  }
}

impl TextFormatter {
  /// Uses a `chrono` strftime pattern for the timestamp.
  pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
    self.timestamp_format = format.into();
    self
  }

  /// Appends the full property list after the message.
  pub fn with_properties(mut self, include: bool) -> Self {
    self.include_properties = include;
    self
  }
}

impl Formatter for TextFormatter {
  fn format(&self, event: &LogEvent, out: &mut String) -> Result<(), SinkError> {
    let result = (|| -> std::fmt::Result {
      write!(
        out,
        "{} [{}] ",
        event.timestamp().format(&self.timestamp_format),
        event.level().short_name()
      )?;
      if let Some(source) = event
        .property(crate::SOURCE_CONTEXT_PROPERTY)
        .and_then(|v| v.as_scalar())
        .and_then(|s| s.as_str())
      {
        write!(out, "({}) ", source)?;
      }
      out.push_str(&event.render_message());
      if self.include_properties && !event.properties().is_empty() {
        out.push_str(" {");
        for (i, (name, value)) in event.properties().iter().enumerate() {
          if i > 0 {
            out.push_str(", ");
          }
          write!(out, "{}: {}", name, value)?;
        }
        out.push('}');
      }
      out.push('\n');
      if let Some(error) = event.exception() {
        writeln!(out, "{}", error)?;
      }
      Ok(())
    })();
    result.map_err(|e| SinkError::Format(e.to_string()))
  }
}
