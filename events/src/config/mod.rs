// src/config/mod.rs
// YAML configuration for building a `LoggerConfiguration`.

pub mod processed; // Validated configuration
pub mod raw; // Structs mapping directly to the YAML structure

use crate::error::{Error, Result};
use crate::format::{JsonFormatter, TextFormatter};
use crate::logger::LoggerConfiguration;
use crate::self_log::SelfLog;
use crate::sink::{Sink, TracingSink, WriterSink};
use processed::{process_raw_config, ConfigInternal, FormatInternal, SinkKindInternal};
use raw::ConfigRaw;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

impl LoggerConfiguration {
  /// Builds a configuration from YAML text.
  ///
  /// ```yaml
  /// minimum_level: debug
  /// enrich:
  ///   from_log_context: true
  ///   properties:
  ///     Application: billing
  /// sinks:
  ///   console:
  ///     kind: console
  ///     format: json
  ///   audit_file:
  ///     kind: file
  ///     path: logs/audit.log
  ///     audit: true
  /// ```
  pub fn from_yaml_str(yaml: &str) -> Result<LoggerConfiguration> {
    let raw: ConfigRaw = serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse(e.to_string()))?;
    build(process_raw_config(raw)?)
  }

  pub fn from_file(path: impl AsRef<Path>) -> Result<LoggerConfiguration> {
    let file = std::fs::File::open(path)?;
    let raw: ConfigRaw =
      serde_yaml::from_reader(io::BufReader::new(file)).map_err(|e| Error::ConfigParse(e.to_string()))?;
    build(process_raw_config(raw)?)
  }
}

fn build(config: ConfigInternal) -> Result<LoggerConfiguration> {
  if config.self_log {
    SelfLog::enable_stderr();
  }

  let mut configuration = LoggerConfiguration::new().minimum_level(config.minimum_level);
  if let Some(depth) = config.max_depth {
    configuration = configuration.max_depth(depth);
  }
  if config.from_log_context {
    configuration = configuration.enrich_from_log_context();
  }
  for (name, value) in config.properties {
    configuration = configuration.enrich_with_property(name, value)?;
  }

  for sink in config.sinks {
    let built: Arc<dyn Sink> = match &sink.kind {
      SinkKindInternal::Stdout => Arc::new(writer_sink(io::stdout(), sink.format).auto_flush(true)),
      SinkKindInternal::Stderr => Arc::new(writer_sink(io::stderr(), sink.format).auto_flush(true)),
      SinkKindInternal::File(path) => {
        let opened = match sink.format {
          FormatInternal::Text => WriterSink::file(path, TextFormatter::default()),
          FormatInternal::Json => WriterSink::file(path, JsonFormatter::new()),
        };
        let opened = opened.map_err(|e| Error::InvalidConfigValue {
          field: format!("sinks.{}.path", sink.name),
          message: format!("failed to open {:?}: {}", path, e),
        })?;
        // Audit sinks must not hide events in a buffer.
        Arc::new(opened.auto_flush(sink.audit))
      }
      SinkKindInternal::Tracing => Arc::new(TracingSink::new()),
    };
    configuration = configuration.add_sink(sink.name, built, sink.minimum_level, sink.audit);
  }

  Ok(configuration)
}

fn writer_sink(writer: impl Write + Send + 'static, format: FormatInternal) -> WriterSink {
  match format {
    FormatInternal::Text => WriterSink::new(writer, TextFormatter::default()),
    FormatInternal::Json => WriterSink::new(writer, JsonFormatter::new()),
  }
}
