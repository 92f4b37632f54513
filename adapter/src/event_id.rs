use std::fmt;
use std::sync::Arc;

/// Identifies a kind of log call within a category.
///
/// The default value (id `0`, no name) means "no event id".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EventId {
  id: i32,
  name: Option<Arc<str>>,
}

impl EventId {
  pub fn new(id: i32, name: Option<&str>) -> Self {
    Self {
      id,
      name: name.map(Arc::from),
    }
  }

  pub fn id(&self) -> i32 {
    self.id
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  /// True for the zero, unnamed marker.
  pub fn is_default(&self) -> bool {
    self.id == 0 && self.name.is_none()
  }
}

impl From<i32> for EventId {
  fn from(id: i32) -> Self {
    Self { id, name: None }
  }
}

impl fmt::Display for EventId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.name {
      Some(name) => f.write_str(name),
      None => write!(f, "{}", self.id),
    }
  }
}
