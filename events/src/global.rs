// src/global.rs
use crate::logger::Logger;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

static GLOBAL: Lazy<RwLock<Logger>> = Lazy::new(|| RwLock::new(Logger::none()));

/// The process-wide logger.
pub struct Log;

impl Log {
  pub fn logger() -> Logger {
    GLOBAL.read().clone()
  }

  pub fn set_logger(logger: Logger) {
    *GLOBAL.write() = logger;
  }

  /// Closes the current global logger and resets it to one with no sinks.
  pub fn close_and_flush() {
    let previous = std::mem::replace(&mut *GLOBAL.write(), Logger::none());
    previous.close();
  }
}
