// src/self_log.rs
//! Diagnostic output for failures inside the logging pipeline itself.
//!
//! Disabled by default. Nothing written here ever reaches a sink.

use chrono::{SecondsFormat, Utc};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::fmt::Display;

type Output = Box<dyn Fn(&str) + Send + Sync>;

static OUTPUT: Lazy<RwLock<Option<Output>>> = Lazy::new(|| RwLock::new(None));

pub struct SelfLog;

impl SelfLog {
  /// Routes diagnostic lines to `output`. Each line is prefixed with a UTC timestamp.
  pub fn enable(output: impl Fn(&str) + Send + Sync + 'static) {
    *OUTPUT.write() = Some(Box::new(output));
  }

  pub fn enable_stderr() {
    Self::enable(|line| eprintln!("{}", line));
  }

  pub fn disable() {
    *OUTPUT.write() = None;
  }

  pub fn is_enabled() -> bool {
    OUTPUT.read().is_some()
  }

  pub fn write_line(message: impl Display) {
    let output = OUTPUT.read();
    if let Some(output) = output.as_ref() {
      let line = format!(
        "{} {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        message
      );
      output(&line);
    }
  }
}
