use super::Sink;
use crate::error::SinkError;
use crate::event::LogEvent;
use parking_lot::Mutex;

/// Keeps every event it receives. Mostly useful in tests.
#[derive(Debug, Default)]
pub struct InMemorySink {
  events: Mutex<Vec<LogEvent>>,
  fail_with: Mutex<Option<String>>,
}

impl InMemorySink {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn events(&self) -> Vec<LogEvent> {
    self.events.lock().clone()
  }

  pub fn len(&self) -> usize {
    self.events.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.events.lock().is_empty()
  }

  pub fn single(&self) -> Option<LogEvent> {
    let events = self.events.lock();
    match events.as_slice() {
      [event] => Some(event.clone()),
      _ => None,
    }
  }

  pub fn clear(&self) {
    self.events.lock().clear();
  }

  /// Makes every subsequent emit fail with the given message.
  pub fn fail_with(&self, message: impl Into<String>) {
    *self.fail_with.lock() = Some(message.into());
  }
}

impl Sink for InMemorySink {
  fn emit(&self, event: &LogEvent) -> Result<(), SinkError> {
    if let Some(message) = self.fail_with.lock().as_ref() {
      return Err(SinkError::Other(message.clone()));
    }
    self.events.lock().push(event.clone());
    Ok(())
  }
}
