//! Turns a log call's state into a message template and its properties.

use crate::caches::BindingCaches;
use crate::captured_names::{CapturedNames, Capture};
use crate::error::StateError;
use crate::event_id::EventId;
use crate::state::{State, ORIGINAL_FORMAT};
use fibre_events::{Exception, LogEventProperty, Logger, MessageTemplate, PropertyValue, Scalar, Value};
use std::sync::Arc;

/// Renders a state into a message for front-ends that only deal in strings.
pub type StateFormatter = dyn Fn(&State, Option<&Exception>) -> String + Send + Sync;

/// The outcome of binding one log call.
#[derive(Debug, Clone)]
pub struct BoundState {
  pub template: Arc<MessageTemplate>,
  pub properties: Vec<LogEventProperty>,
}

/// Binds `state` against `logger`'s property rules.
///
/// In order of preference the template text comes from the state's `{OriginalFormat}`
/// entry, from the state's type name (`{TypeName:l}`), from the state itself
/// (`{State:l}`) or from the formatter (`{Message:l}`). Entries whose names are not
/// valid property names are skipped. A state that cannot produce its entries fails the
/// whole call.
pub fn bind(
  logger: &Logger,
  caches: &BindingCaches,
  state: &State,
  formatter: Option<&StateFormatter>,
  event_id: &EventId,
) -> Result<BoundState, StateError> {
  let mut template_text: Option<String> = None;
  let mut properties = Vec::new();

  if let Some(entries) = state.entries()? {
    for (key, value) in entries {
      if key == ORIGINAL_FORMAT {
        if let Value::Str(text) = value {
          template_text = Some(text.clone());
          continue;
        }
      }
      if let Some(property) = bind_entry(logger, &caches.names, key, value) {
        properties.push(property);
      }
    }

    if template_text.is_none() {
      if let Some(type_name) = state.type_name() {
        template_text = Some(format!("{{{}:l}}", type_name));
        if let Some(property) = bind_value(logger, type_name, &loggable_value(state, formatter), false) {
          properties.push(property);
        }
      }
    }
  }

  if template_text.is_none() {
    let fallback = if !state.is_null() {
      Some("State")
    } else if formatter.is_some() {
      Some("Message")
    } else {
      None
    };
    if let Some(name) = fallback {
      template_text = Some(format!("{{{}:l}}", name));
      if let Some(property) = bind_value(logger, name, &loggable_value(state, formatter), false) {
        properties.push(property);
      }
    }
  }

  if !event_id.is_default() {
    properties.push(caches.event_ids.get_or_create(event_id));
  }

  Ok(BoundState {
    template: caches.templates.parse(template_text.as_deref().unwrap_or("")),
    properties,
  })
}

/// Binds one key/value entry, honouring a leading `@` or `$` on the key.
pub(crate) fn bind_entry(
  logger: &Logger,
  names: &CapturedNames,
  key: &str,
  value: &Value,
) -> Option<LogEventProperty> {
  match names.resolve(key) {
    (Capture::Plain, name) => bind_value(logger, &name, value, false),
    (Capture::Destructure, name) => bind_value(logger, &name, value, true),
    (Capture::Stringify, name) => bind_value(logger, &name, &stringify(value), true),
  }
}

/// `$` binds the string form; null stays null.
pub(crate) fn stringify(value: &Value) -> Value {
  match value {
    Value::Null => Value::Null,
    other => Value::Str(other.to_string()),
  }
}

/// Primitives skip the backend's capture negotiation.
fn bind_value(logger: &Logger, name: &str, value: &Value, destructure: bool) -> Option<LogEventProperty> {
  let scalar = match value {
    Value::Null => Scalar::Null,
    Value::Str(s) => Scalar::Str(s.clone()),
    Value::I64(i) => Scalar::I64(*i),
    Value::U64(u) => Scalar::U64(*u),
    Value::F64(f) => Scalar::F64(*f),
    _ => return logger.bind_property(name, value, destructure),
  };
  LogEventProperty::new(name, PropertyValue::Scalar(scalar)).ok()
}

/// The formatter's output when there is one, otherwise the state itself.
fn loggable_value(state: &State, formatter: Option<&StateFormatter>) -> Value {
  match formatter {
    Some(format) => Value::Str(format(state, None)),
    None => state.to_value(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::state::{FormattedLogValues, PairList};
  use fibre_events::{LoggerConfiguration, Object};
  use pretty_assertions::assert_eq;

  fn setup() -> (Logger, BindingCaches) {
    (LoggerConfiguration::new().create_logger(), BindingCaches::default())
  }

  fn names(bound: &BoundState) -> Vec<&str> {
    bound.properties.iter().map(|p| p.name.as_str()).collect()
  }

  fn to_string_formatter(state: &State, _: Option<&Exception>) -> String {
    state.to_string()
  }

  #[test]
  fn original_format_supplies_the_template() {
    let (logger, caches) = setup();
    let state = State::from(FormattedLogValues::new("Hello, {Name}", vec![Value::from("World")]));
    let bound = bind(&logger, &caches, &state, None, &EventId::default()).unwrap();

    assert_eq!(bound.template.text(), "Hello, {Name}");
    assert_eq!(names(&bound), vec!["Name"]);
  }

  #[test]
  fn capture_operators_are_stripped_and_applied() {
    let (logger, caches) = setup();
    let person = Value::Object(Object {
      type_tag: Some("Person".to_string()),
      text: "Person".to_string(),
      fields: vec![("Name".to_string(), Value::from("Ann"))],
    });
    let state = State::Pairs(
      PairList::new()
        .with("@Person", person)
        .with("$Numbers", Value::Seq(vec![Value::from(1), Value::from(2)]))
        .with("Plain", 5)
        .with(ORIGINAL_FORMAT, "{@Person} {$Numbers} {Plain}"),
    );
    let bound = bind(&logger, &caches, &state, None, &EventId::default()).unwrap();

    assert_eq!(names(&bound), vec!["Person", "Numbers", "Plain"]);
    assert!(bound.properties[0].value.as_structure().is_some());
    assert_eq!(*bound.properties[1].value, PropertyValue::scalar("[1, 2]"));
    assert_eq!(*bound.properties[2].value, PropertyValue::Scalar(Scalar::I64(5)));
  }

  #[test]
  fn typed_pairs_fall_back_to_their_type_name() {
    let (logger, caches) = setup();
    let state = State::Pairs(PairList::typed("OrderPlaced").with("OrderId", 17));
    let bound = bind(&logger, &caches, &state, Some(&to_string_formatter), &EventId::default()).unwrap();

    assert_eq!(bound.template.text(), "{OrderPlaced:l}");
    assert_eq!(names(&bound), vec!["OrderId", "OrderPlaced"]);
    assert_eq!(*bound.properties[1].value, PropertyValue::scalar("OrderId: 17"));
  }

  #[test]
  fn untyped_pairs_fall_back_to_state() {
    let (logger, caches) = setup();
    let state = State::Pairs(PairList::new().with("A", 1));
    let bound = bind(&logger, &caches, &state, None, &EventId::default()).unwrap();
    assert_eq!(bound.template.text(), "{State:l}");
    assert_eq!(names(&bound), vec!["A", "State"]);
  }

  #[test]
  fn plain_text_and_null_states() {
    let (logger, caches) = setup();

    let bound = bind(&logger, &caches, &State::from("hi"), None, &EventId::default()).unwrap();
    assert_eq!(bound.template.text(), "{State:l}");
    assert_eq!(*bound.properties[0].value, PropertyValue::scalar("hi"));

    let bound = bind(&logger, &caches, &State::Null, Some(&|_: &State, _: Option<&Exception>| "formatted".to_string()), &EventId::default()).unwrap();
    assert_eq!(bound.template.text(), "{Message:l}");
    assert_eq!(*bound.properties[0].value, PropertyValue::scalar("formatted"));

    let bound = bind(&logger, &caches, &State::Null, None, &EventId::default()).unwrap();
    assert_eq!(bound.template.text(), "");
    assert!(bound.properties.is_empty());
  }

  #[test]
  fn invalid_names_are_skipped() {
    let (logger, caches) = setup();
    let state = State::Pairs(PairList::new().with(" ", 1).with("Ok", 2).with(ORIGINAL_FORMAT, "{Ok}"));
    let bound = bind(&logger, &caches, &state, None, &EventId::default()).unwrap();
    assert_eq!(names(&bound), vec!["Ok"]);
  }

  #[test]
  fn event_id_is_added_unless_default() {
    let (logger, caches) = setup();
    let bound = bind(&logger, &caches, &State::from("x"), None, &EventId::from(42)).unwrap();
    assert_eq!(names(&bound), vec!["State", "EventId"]);

    let bound = bind(&logger, &caches, &State::from("x"), None, &EventId::default()).unwrap();
    assert_eq!(names(&bound), vec!["State"]);
  }

  #[test]
  fn mismatched_arguments_fail() {
    let (logger, caches) = setup();
    let state = State::from(FormattedLogValues::new("{Two} {Properties}", vec![Value::from("one")]));
    assert!(bind(&logger, &caches, &state, None, &EventId::default()).is_err());
  }
}
