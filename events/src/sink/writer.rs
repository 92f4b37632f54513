use super::Sink;
use crate::error::SinkError;
use crate::event::LogEvent;
use crate::format::{Formatter, TextFormatter};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Formats events and writes them to any [`Write`] implementation.
pub struct WriterSink {
  writer: Mutex<Box<dyn Write + Send>>,
  formatter: Box<dyn Formatter>,
  auto_flush: bool,
}

impl WriterSink {
  pub fn new(writer: impl Write + Send + 'static, formatter: impl Formatter + 'static) -> Self {
    Self {
      writer: Mutex::new(Box::new(writer)),
      formatter: Box::new(formatter),
      auto_flush: false,
    }
  }

  pub fn stdout() -> Self {
    Self::new(io::stdout(), TextFormatter::default()).auto_flush(true)
  }

  pub fn stderr() -> Self {
    Self::new(io::stderr(), TextFormatter::default()).auto_flush(true)
  }

  /// Appends to a file, creating it and any missing parent directories.
  pub fn file(path: impl AsRef<Path>, formatter: impl Formatter + 'static) -> io::Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Self::new(BufWriter::new(file), formatter))
  }

  /// Flush after every event.
  pub fn auto_flush(mut self, enabled: bool) -> Self {
    self.auto_flush = enabled;
    self
  }
}

impl Sink for WriterSink {
  fn emit(&self, event: &LogEvent) -> Result<(), SinkError> {
    let mut line = String::new();
    self.formatter.format(event, &mut line)?;
    let mut writer = self.writer.lock();
    writer.write_all(line.as_bytes())?;
    if self.auto_flush {
      writer.flush()?;
    }
    Ok(())
  }

  fn flush(&self) -> Result<(), SinkError> {
    self.writer.lock().flush()?;
    Ok(())
  }
}
