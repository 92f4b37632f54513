// src/config.rs
// YAML options for a `FibreLoggerProvider`.

use crate::caches::CacheOptions;
use crate::error::{Error, Result};
use crate::{captured_names, event_id_cache, template_cache};
use serde::Deserialize;
use std::io;
use std::path::Path;

// --- Raw ---
#[derive(Debug, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProviderOptionsRaw {
  #[serde(default)]
  pub dispose: bool,
  #[serde(default)]
  pub caches: CacheOptionsRaw,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CacheOptionsRaw {
  #[serde(default = "default_template_max_items")]
  pub template_max_items: usize,
  #[serde(default = "default_template_max_length")]
  pub template_max_length: usize,
  #[serde(default = "default_event_id_capacity")]
  pub event_id_capacity: usize,
  #[serde(default = "default_captured_name_capacity")]
  pub captured_name_capacity: usize,
}

impl Default for CacheOptionsRaw {
  fn default() -> Self {
    Self {
      template_max_items: default_template_max_items(),
      template_max_length: default_template_max_length(),
      event_id_capacity: default_event_id_capacity(),
      captured_name_capacity: default_captured_name_capacity(),
    }
  }
}

fn default_template_max_items() -> usize {
  template_cache::DEFAULT_MAX_ITEMS
}
fn default_template_max_length() -> usize {
  template_cache::DEFAULT_MAX_TEMPLATE_LENGTH
}
fn default_event_id_capacity() -> usize {
  event_id_cache::DEFAULT_CAPACITY
}
fn default_captured_name_capacity() -> usize {
  captured_names::DEFAULT_CAPACITY
}

// --- Processed ---
/// Validated provider options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProviderOptions {
  /// Close the backend logger when the provider is disposed.
  pub dispose: bool,
  pub caches: CacheOptions,
}

impl ProviderOptions {
  /// Parses options from YAML text.
  ///
  /// ```yaml
  /// dispose: true
  /// caches:
  ///   template_max_items: 500
  ///   event_id_capacity: 256
  /// ```
  pub fn from_yaml_str(yaml: &str) -> Result<ProviderOptions> {
    let raw: ProviderOptionsRaw = serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse(e.to_string()))?;
    Self::process(raw)
  }

  pub fn from_file(path: impl AsRef<Path>) -> Result<ProviderOptions> {
    let file = std::fs::File::open(path)?;
    let raw: ProviderOptionsRaw =
      serde_yaml::from_reader(io::BufReader::new(file)).map_err(|e| Error::ConfigParse(e.to_string()))?;
    Self::process(raw)
  }

  fn process(raw: ProviderOptionsRaw) -> Result<ProviderOptions> {
    let caches = &raw.caches;
    for (field, value) in [
      ("caches.template_max_items", caches.template_max_items),
      ("caches.template_max_length", caches.template_max_length),
      ("caches.event_id_capacity", caches.event_id_capacity),
      ("caches.captured_name_capacity", caches.captured_name_capacity),
    ] {
      if value == 0 {
        return Err(Error::InvalidConfigValue {
          field: field.to_string(),
          message: "must be greater than zero".to_string(),
        });
      }
    }

    Ok(ProviderOptions {
      dispose: raw.dispose,
      caches: CacheOptions {
        template_max_items: caches.template_max_items,
        template_max_length: caches.template_max_length,
        event_id_capacity: caches.event_id_capacity,
        captured_name_capacity: caches.captured_name_capacity,
      },
    })
  }
}
