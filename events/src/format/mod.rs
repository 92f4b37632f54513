mod json;
mod text;

pub use json::{to_json, JsonFormatter};
pub use text::TextFormatter;

use crate::error::SinkError;
use crate::event::LogEvent;

/// Renders one event, including its trailing newline.
pub trait Formatter: Send + Sync {
  fn format(&self, event: &LogEvent, out: &mut String) -> Result<(), SinkError>;
}
