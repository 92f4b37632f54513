// src/config/raw.rs
use indexmap::IndexMap;
use serde::Deserialize;

// --- Top Level Config ---
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigRaw {
  #[serde(default = "default_minimum_level")]
  pub minimum_level: String,
  #[serde(default)]
  pub enrich: EnrichConfigRaw,
  #[serde(default)] // No sinks means events are dropped
  pub sinks: IndexMap<String, SinkConfigRaw>,
  #[serde(default)]
  pub self_log: bool,
}

fn default_minimum_level() -> String {
  "information".to_string()
}

#[derive(Debug, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct EnrichConfigRaw {
  #[serde(default)]
  pub from_log_context: bool,
  #[serde(default)]
  pub properties: IndexMap<String, String>,
  #[serde(default)]
  pub max_depth: Option<usize>,
}

// --- Sink Config ---
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum SinkConfigRaw {
  Console(ConsoleSinkConfigRaw),
  File(FileSinkConfigRaw),
  Tracing(TracingSinkConfigRaw),
}

#[derive(Debug, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConsoleSinkConfigRaw {
  #[serde(default = "default_stream")]
  pub stream: String,
  #[serde(default)]
  pub format: Option<String>,
  #[serde(default)]
  pub minimum_level: Option<String>,
}

fn default_stream() -> String {
  "stdout".to_string()
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileSinkConfigRaw {
  pub path: String,
  #[serde(default)]
  pub format: Option<String>,
  #[serde(default)]
  pub minimum_level: Option<String>,
  #[serde(default)]
  pub audit: bool,
}

#[derive(Debug, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct TracingSinkConfigRaw {
  #[serde(default)]
  pub minimum_level: Option<String>,
}
