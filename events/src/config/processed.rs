// src/config/processed.rs
use crate::config::raw::{ConfigRaw, SinkConfigRaw};
use crate::error::{Error, Result};
use crate::level::LogEventLevel;
use std::path::PathBuf;

// --- Processed Top Level Config ---
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigInternal {
  pub minimum_level: LogEventLevel,
  pub from_log_context: bool,
  pub properties: Vec<(String, String)>,
  pub max_depth: Option<usize>,
  pub sinks: Vec<SinkInternal>,
  pub self_log: bool,
}

// --- Processed Sink Config ---
#[derive(Debug, Clone, PartialEq)]
pub struct SinkInternal {
  pub name: String,
  pub kind: SinkKindInternal,
  pub format: FormatInternal,
  pub minimum_level: Option<LogEventLevel>,
  pub audit: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkKindInternal {
  Stdout,
  Stderr,
  File(PathBuf),
  Tracing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatInternal {
  Text,
  Json,
}

pub fn process_raw_config(raw: ConfigRaw) -> Result<ConfigInternal> {
  let minimum_level = parse_level("minimum_level", &raw.minimum_level)?;

  let mut sinks = Vec::with_capacity(raw.sinks.len());
  for (name, sink) in raw.sinks {
    let field = |f: &str| format!("sinks.{}.{}", name, f);
    let processed = match sink {
      SinkConfigRaw::Console(console) => {
        let kind = match console.stream.to_ascii_lowercase().as_str() {
          "stdout" => SinkKindInternal::Stdout,
          "stderr" => SinkKindInternal::Stderr,
          other => {
            return Err(Error::InvalidConfigValue {
              field: field("stream"),
              message: format!("expected 'stdout' or 'stderr', found '{}'", other),
            })
          }
        };
        SinkInternal {
          kind,
          format: parse_format(&field("format"), console.format.as_deref())?,
          minimum_level: parse_optional_level(&field("minimum_level"), console.minimum_level.as_deref())?,
          audit: false,
          name,
        }
      }
      SinkConfigRaw::File(file) => {
        if file.path.trim().is_empty() {
          return Err(Error::InvalidConfigValue {
            field: field("path"),
            message: "path must not be empty".to_string(),
          });
        }
        SinkInternal {
          kind: SinkKindInternal::File(PathBuf::from(file.path)),
          format: parse_format(&field("format"), file.format.as_deref())?,
          minimum_level: parse_optional_level(&field("minimum_level"), file.minimum_level.as_deref())?,
          audit: file.audit,
          name,
        }
      }
      SinkConfigRaw::Tracing(tracing) => SinkInternal {
        kind: SinkKindInternal::Tracing,
        format: FormatInternal::Text,
        minimum_level: parse_optional_level(&field("minimum_level"), tracing.minimum_level.as_deref())?,
        audit: false,
        name,
      },
    };
    sinks.push(processed);
  }

  Ok(ConfigInternal {
    minimum_level,
    from_log_context: raw.enrich.from_log_context,
    properties: raw.enrich.properties.into_iter().collect(),
    max_depth: raw.enrich.max_depth,
    sinks,
    self_log: raw.self_log,
  })
}

fn parse_level(field: &str, value: &str) -> Result<LogEventLevel> {
  value.parse().map_err(|e| Error::InvalidConfigValue {
    field: field.to_string(),
    message: format!("{}", e),
  })
}

fn parse_optional_level(field: &str, value: Option<&str>) -> Result<Option<LogEventLevel>> {
  value.map(|v| parse_level(field, v)).transpose()
}

fn parse_format(field: &str, value: Option<&str>) -> Result<FormatInternal> {
  match value.map(str::to_ascii_lowercase).as_deref() {
    None | Some("text") => Ok(FormatInternal::Text),
    Some("json") => Ok(FormatInternal::Json),
    Some(other) => Err(Error::InvalidConfigValue {
      field: field.to_string(),
      message: format!("expected 'text' or 'json', found '{}'", other),
    }),
  }
}
