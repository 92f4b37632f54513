use crate::captured_names::{self, CapturedNames};
use crate::event_id_cache::{self, EventIdPropertyCache};
use crate::template_cache::{self, TemplateCache};
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Sizes of the caches used while binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
  pub template_max_items: usize,
  pub template_max_length: usize,
  pub event_id_capacity: usize,
  pub captured_name_capacity: usize,
}

impl Default for CacheOptions {
  fn default() -> Self {
    Self {
      template_max_items: template_cache::DEFAULT_MAX_ITEMS,
      template_max_length: template_cache::DEFAULT_MAX_TEMPLATE_LENGTH,
      event_id_capacity: event_id_cache::DEFAULT_CAPACITY,
      captured_name_capacity: captured_names::DEFAULT_CAPACITY,
    }
  }
}

/// The caches shared by every logger of a provider.
///
/// Providers use [`BindingCaches::global`] unless given their own set.
#[derive(Debug, Default)]
pub struct BindingCaches {
  pub templates: TemplateCache,
  pub event_ids: EventIdPropertyCache,
  pub names: CapturedNames,
}

static GLOBAL: Lazy<Arc<BindingCaches>> = Lazy::new(|| Arc::new(BindingCaches::default()));

impl BindingCaches {
  pub fn new(options: CacheOptions) -> Self {
    Self {
      templates: TemplateCache::new(options.template_max_items, options.template_max_length),
      event_ids: EventIdPropertyCache::new(options.event_id_capacity),
      names: CapturedNames::new(options.captured_name_capacity),
    }
  }

  pub fn global() -> Arc<BindingCaches> {
    GLOBAL.clone()
  }
}
