use crate::event_id::EventId;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use fibre_events::{LogEventProperty, PropertyValue, Scalar, Structure};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const DEFAULT_CAPACITY: usize = 1024;
pub const EVENT_ID_PROPERTY: &str = "EventId";

/// Memoizes the `EventId` property for each `(id, name)` pair.
///
/// Once `capacity` entries are stored, new pairs are no longer admitted: hits keep
/// returning the shared value and misses build a fresh one each time.
#[derive(Debug)]
pub struct EventIdPropertyCache {
  properties: DashMap<EventId, LogEventProperty>,
  count: AtomicUsize,
  capacity: usize,
}

impl Default for EventIdPropertyCache {
  fn default() -> Self {
    Self::new(DEFAULT_CAPACITY)
  }
}

impl EventIdPropertyCache {
  pub fn new(capacity: usize) -> Self {
    Self {
      properties: DashMap::new(),
      count: AtomicUsize::new(0),
      capacity,
    }
  }

  pub fn get_or_create(&self, event_id: &EventId) -> LogEventProperty {
    if let Some(hit) = self.properties.get(event_id) {
      return hit.clone();
    }

    let created = create_property(event_id);
    if !self.try_reserve_slot() {
      return created;
    }

    match self.properties.entry(event_id.clone()) {
      Entry::Occupied(existing) => {
        // Another thread stored it first; give the slot back.
        self.count.fetch_sub(1, Ordering::AcqRel);
        existing.get().clone()
      }
      Entry::Vacant(vacant) => {
        vacant.insert(created.clone());
        created
      }
    }
  }

  fn try_reserve_slot(&self) -> bool {
    self
      .count
      .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
        (count < self.capacity).then_some(count + 1)
      })
      .is_ok()
  }

  pub fn len(&self) -> usize {
    self.properties.len()
  }

  pub fn is_empty(&self) -> bool {
    self.properties.is_empty()
  }
}

/// `EventId { Id: .., Name: .. }`, leaving out a zero id and a missing name.
pub fn create_property(event_id: &EventId) -> LogEventProperty {
  let mut properties = Vec::with_capacity(2);
  if event_id.id() != 0 {
    properties.push(LogEventProperty {
      name: "Id".to_string(),
      value: Arc::new(PropertyValue::Scalar(Scalar::I64(i64::from(event_id.id())))),
    });
  }
  if let Some(name) = event_id.name() {
    properties.push(LogEventProperty {
      name: "Name".to_string(),
      value: Arc::new(PropertyValue::Scalar(Scalar::Str(name.to_string()))),
    });
  }
  LogEventProperty {
    name: EVENT_ID_PROPERTY.to_string(),
    value: Arc::new(PropertyValue::Structure(Structure::new(None, properties))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use std::thread;

  #[test]
  fn id_and_name_are_present_only_when_set() {
    let cache = EventIdPropertyCache::default();

    let both = cache.get_or_create(&EventId::new(7, Some("Started")));
    let structure = both.value.as_structure().unwrap();
    assert_eq!(structure.get("Id"), Some(&PropertyValue::Scalar(Scalar::I64(7))));
    assert_eq!(structure.get("Name"), Some(&PropertyValue::scalar("Started")));

    let id_only = cache.get_or_create(&EventId::from(7));
    assert!(id_only.value.as_structure().unwrap().get("Name").is_none());

    let name_only = cache.get_or_create(&EventId::new(0, Some("Named")));
    assert!(name_only.value.as_structure().unwrap().get("Id").is_none());
  }

  #[test]
  fn same_pair_returns_the_same_instance() {
    let cache = EventIdPropertyCache::default();
    let a = cache.get_or_create(&EventId::new(1, Some("A")));
    let b = cache.get_or_create(&EventId::new(1, Some("A")));
    assert!(Arc::ptr_eq(&a.value, &b.value));
  }

  #[test]
  fn pairs_differing_in_name_are_distinct_instances() {
    let cache = EventIdPropertyCache::default();
    let a = cache.get_or_create(&EventId::new(1, Some("A")));
    let b = cache.get_or_create(&EventId::new(1, Some("B")));
    let c = cache.get_or_create(&EventId::from(1));
    assert!(!Arc::ptr_eq(&a.value, &b.value));
    assert!(!Arc::ptr_eq(&a.value, &c.value));
    assert_eq!(cache.len(), 3);
  }

  #[test]
  fn stops_admitting_once_full() {
    let cache = EventIdPropertyCache::new(1);
    let cached = cache.get_or_create(&EventId::from(1));

    let first = cache.get_or_create(&EventId::from(2));
    let second = cache.get_or_create(&EventId::from(2));
    assert_eq!(first, second);
    assert!(!Arc::ptr_eq(&first.value, &second.value));

    let again = cache.get_or_create(&EventId::from(1));
    assert!(Arc::ptr_eq(&cached.value, &again.value));
    assert_eq!(cache.len(), 1);
  }

  #[test]
  fn concurrent_inserts_never_exceed_capacity() {
    let cache = Arc::new(EventIdPropertyCache::new(16));
    let handles: Vec<_> = (0..8)
      .map(|t| {
        let cache = cache.clone();
        thread::spawn(move || {
          for i in 0..64 {
            cache.get_or_create(&EventId::from(i * 8 + t));
          }
        })
      })
      .collect();
    for handle in handles {
      handle.join().unwrap();
    }
    assert_eq!(cache.len(), 16);
  }
}
