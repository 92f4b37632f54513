use dashmap::DashMap;
use std::sync::Arc;

pub const DEFAULT_CAPACITY: usize = 1000;

/// Capture operator found at the start of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
  /// No operator: bind the value as-is.
  Plain,
  /// `@`: destructure the value.
  Destructure,
  /// `$`: bind the value's string form.
  Stringify,
}

/// Strips capture operators from keys, remembering up to `capacity` results per operator.
#[derive(Debug)]
pub struct CapturedNames {
  destructured: DashMap<String, Arc<str>>,
  stringified: DashMap<String, Arc<str>>,
  capacity: usize,
}

impl Default for CapturedNames {
  fn default() -> Self {
    Self::new(DEFAULT_CAPACITY)
  }
}

impl CapturedNames {
  pub fn new(capacity: usize) -> Self {
    Self {
      destructured: DashMap::new(),
      stringified: DashMap::new(),
      capacity,
    }
  }

  /// Splits `key` into its capture operator and property name.
  pub fn resolve(&self, key: &str) -> (Capture, Arc<str>) {
    if key.starts_with('@') {
      (Capture::Destructure, self.strip(&self.destructured, key))
    } else if key.starts_with('$') {
      (Capture::Stringify, self.strip(&self.stringified, key))
    } else {
      (Capture::Plain, Arc::from(key))
    }
  }

  fn strip(&self, names: &DashMap<String, Arc<str>>, key: &str) -> Arc<str> {
    if let Some(hit) = names.get(key) {
      return hit.clone();
    }
    let stripped: Arc<str> = Arc::from(&key[1..]);
    if names.len() < self.capacity {
      names.entry(key.to_string()).or_insert_with(|| stripped.clone());
    }
    stripped
  }

  pub fn len(&self) -> usize {
    self.destructured.len() + self.stringified.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn strips_operators() {
    let names = CapturedNames::default();
    assert_eq!(names.resolve("@Person"), (Capture::Destructure, Arc::from("Person")));
    assert_eq!(names.resolve("$Count"), (Capture::Stringify, Arc::from("Count")));
    assert_eq!(names.resolve("Plain"), (Capture::Plain, Arc::from("Plain")));
    assert_eq!(names.len(), 2);
  }

  #[test]
  fn stops_remembering_at_capacity() {
    let names = CapturedNames::new(1);
    names.resolve("@A");
    names.resolve("@B");
    assert_eq!(names.resolve("@B").1.as_ref(), "B");
    assert_eq!(names.len(), 1);
  }
}
