use fibre_events::{MessageTemplate, MessageTemplateParser};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_MAX_ITEMS: usize = 1000;
pub const DEFAULT_MAX_TEMPLATE_LENGTH: usize = 1024;

/// Memoizes parsed templates by their text.
///
/// Templates longer than `max_template_length` are parsed every time and never stored.
/// When an insert would exceed `max_items`, the whole cache is cleared first.
#[derive(Debug)]
pub struct TemplateCache {
  parser: MessageTemplateParser,
  templates: RwLock<HashMap<String, Arc<MessageTemplate>>>,
  max_items: usize,
  max_template_length: usize,
}

impl Default for TemplateCache {
  fn default() -> Self {
    Self::new(DEFAULT_MAX_ITEMS, DEFAULT_MAX_TEMPLATE_LENGTH)
  }
}

impl TemplateCache {
  pub fn new(max_items: usize, max_template_length: usize) -> Self {
    Self {
      parser: MessageTemplateParser::new(),
      templates: RwLock::new(HashMap::new()),
      max_items,
      max_template_length,
    }
  }

  pub fn parse(&self, text: &str) -> Arc<MessageTemplate> {
    if text.len() > self.max_template_length {
      return Arc::new(self.parser.parse(text));
    }

    if let Some(hit) = self.templates.read().get(text) {
      return hit.clone();
    }

    let parsed = Arc::new(self.parser.parse(text));
    let mut templates = self.templates.write();
    if templates.len() >= self.max_items {
      templates.clear();
    }
    templates.insert(text.to_string(), parsed.clone());
    parsed
  }

  pub fn len(&self) -> usize {
    self.templates.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.templates.read().is_empty()
  }

  pub fn clear(&self) {
    self.templates.write().clear();
  }
}
