mod memory;
mod tracing_sink;
mod writer;

pub use memory::InMemorySink;
pub use tracing_sink::TracingSink;
pub use writer::WriterSink;

use crate::error::SinkError;
use crate::event::LogEvent;

/// A destination for events.
pub trait Sink: Send + Sync {
  fn emit(&self, event: &LogEvent) -> Result<(), SinkError>;

  fn flush(&self) -> Result<(), SinkError> {
    Ok(())
  }
}

impl<S: Sink + ?Sized> Sink for std::sync::Arc<S> {
  fn emit(&self, event: &LogEvent) -> Result<(), SinkError> {
    (**self).emit(event)
  }

  fn flush(&self) -> Result<(), SinkError> {
    (**self).flush()
  }
}
