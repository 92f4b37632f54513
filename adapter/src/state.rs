//! The payload handed to [`Logger::log`](crate::Logger::log) and
//! [`Logger::begin_scope`](crate::Logger::begin_scope).
//!
//! Each variant is one of the shapes the binder and the scope stack treat differently.

use crate::error::StateError;
use crate::provider_collection::LogEventValues;
use fibre_events::template::MessageTemplateToken;
use fibre_events::{MessageTemplate, MessageTemplateParser, Object, Value};
use indexmap::IndexMap;
use std::fmt;

/// The key under which a key/value state carries its message template text.
pub const ORIGINAL_FORMAT: &str = "{OriginalFormat}";

#[derive(Debug, Clone)]
pub enum State {
  Null,
  /// A plain message.
  Text(String),
  /// Any other single value.
  Value(Value),
  /// An ordered list of key/value pairs.
  Pairs(PairList),
  /// A string-keyed map. Always treated as a generic container.
  Dictionary(IndexMap<String, Value>),
  /// A single named value.
  Pair(String, Value),
  /// A format string with positional arguments.
  Formatted(FormattedLogValues),
  /// The properties of an already bound event, passed on to another front-end.
  Event(LogEventValues),
}

impl State {
  /// The state's key/value entries, or `None` when it is not a key/value collection.
  pub fn entries(&self) -> Result<Option<Vec<(&str, &Value)>>, StateError> {
    Ok(match self {
      State::Pairs(pairs) => Some(pairs.iter().collect()),
      State::Dictionary(map) => Some(map.iter().map(|(k, v)| (k.as_str(), v)).collect()),
      State::Formatted(formatted) => Some(formatted.entries()?),
      State::Event(values) => Some(values.entries()),
      State::Null | State::Text(_) | State::Value(_) | State::Pair(..) => None,
    })
  }

  /// The type name of a non-generic key/value shape, used as a last-resort property name.
  pub fn type_name(&self) -> Option<&str> {
    match self {
      State::Pairs(pairs) => pairs.type_name(),
      State::Formatted(_) => Some("FormattedLogValues"),
      State::Event(_) => Some("LogEventValues"),
      _ => None,
    }
  }

  pub fn is_null(&self) -> bool {
    matches!(self, State::Null)
  }

  /// The state as a single capturable value.
  pub fn to_value(&self) -> Value {
    match self {
      State::Null => Value::Null,
      State::Text(text) => Value::Str(text.clone()),
      State::Value(value) => value.clone(),
      State::Pairs(pairs) => Value::Object(Object {
        type_tag: pairs.type_name().map(str::to_string),
        text: self.to_string(),
        fields: pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
      }),
      State::Dictionary(map) => Value::Map(
        map
          .iter()
          .map(|(k, v)| (Value::Str(k.clone()), v.clone()))
          .collect(),
      ),
      State::Pair(name, value) => Value::Object(Object {
        type_tag: None,
        text: self.to_string(),
        fields: vec![
          ("Item1".to_string(), Value::Str(name.clone())),
          ("Item2".to_string(), value.clone()),
        ],
      }),
      State::Formatted(_) | State::Event(_) => Value::Str(self.to_string()),
    }
  }
}

fn write_entries<'a>(f: &mut fmt::Formatter<'_>, entries: impl Iterator<Item = (&'a str, &'a Value)>) -> fmt::Result {
  for (i, (key, value)) in entries.enumerate() {
    if i > 0 {
      f.write_str(", ")?;
    }
    write!(f, "{}: {}", key, value)?;
  }
  Ok(())
}

impl fmt::Display for State {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      State::Null => f.write_str("(null)"),
      State::Text(text) => f.write_str(text),
      State::Value(value) => write!(f, "{}", value),
      State::Pairs(pairs) => write_entries(f, pairs.iter()),
      State::Dictionary(map) => write_entries(f, map.iter().map(|(k, v)| (k.as_str(), v))),
      State::Pair(name, value) => write!(f, "({}, {})", name, value),
      State::Formatted(formatted) => write!(f, "{}", formatted),
      State::Event(values) => write!(f, "{}", values),
    }
  }
}

impl From<&str> for State {
  fn from(text: &str) -> Self {
    State::Text(text.to_string())
  }
}

impl From<String> for State {
  fn from(text: String) -> Self {
    State::Text(text)
  }
}

impl From<Value> for State {
  fn from(value: Value) -> Self {
    State::Value(value)
  }
}

impl From<PairList> for State {
  fn from(pairs: PairList) -> Self {
    State::Pairs(pairs)
  }
}

impl From<IndexMap<String, Value>> for State {
  fn from(map: IndexMap<String, Value>) -> Self {
    State::Dictionary(map)
  }
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for State {
  fn from((name, value): (K, V)) -> Self {
    State::Pair(name.into(), value.into())
  }
}

impl From<FormattedLogValues> for State {
  fn from(formatted: FormattedLogValues) -> Self {
    State::Formatted(formatted)
  }
}

// --- Pair list ---

/// Ordered key/value pairs, optionally named after the type they describe.
///
/// A named list is "non-generic": when it carries no message template, the binder falls
/// back to a `{TypeName:l}` template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairList {
  type_name: Option<String>,
  pairs: Vec<(String, Value)>,
}

impl PairList {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn typed(type_name: impl Into<String>) -> Self {
    Self {
      type_name: Some(type_name.into()),
      pairs: Vec::new(),
    }
  }

  pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.push(key, value);
    self
  }

  pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
    self.pairs.push((key.into(), value.into()));
  }

  pub fn type_name(&self) -> Option<&str> {
    self.type_name.as_deref()
  }

  pub fn len(&self) -> usize {
    self.pairs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.pairs.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
    self.pairs.iter().map(|(k, v)| (k.as_str(), v))
  }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for PairList {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self {
      type_name: None,
      pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
    }
  }
}

// --- Formatted values ---

/// A message format with positional arguments, e.g. `("Hello, {Name}", ["World"])`.
///
/// Each named placeholder, capture operator included, becomes the key of the argument at
/// the same position. The format itself is exposed under [`ORIGINAL_FORMAT`].
#[derive(Debug, Clone)]
pub struct FormattedLogValues {
  original: Value,
  template: MessageTemplate,
  keys: Vec<String>,
  args: Vec<Value>,
}

impl FormattedLogValues {
  pub fn new(format: impl Into<String>, args: Vec<Value>) -> Self {
    let format = format.into();
    let template = MessageTemplateParser::new().parse(&format);
    let keys = template
      .property_tokens()
      .map(|token| {
        let prefix = match token.destructuring {
          fibre_events::Destructuring::Destructure => "@",
          fibre_events::Destructuring::Stringify => "$",
          fibre_events::Destructuring::Default => "",
        };
        format!("{}{}", prefix, token.name)
      })
      .collect();
    Self {
      original: Value::Str(format),
      template,
      keys,
      args,
    }
  }

  pub fn format(&self) -> &str {
    self.template.text()
  }

  pub fn args(&self) -> &[Value] {
    &self.args
  }

  /// The placeholder/argument pairs followed by the original format.
  ///
  /// Without arguments the format is passed through untouched. Otherwise every
  /// placeholder needs exactly one argument.
  pub fn entries(&self) -> Result<Vec<(&str, &Value)>, StateError> {
    if self.args.is_empty() {
      return Ok(vec![(ORIGINAL_FORMAT, &self.original)]);
    }
    if self.keys.len() != self.args.len() {
      return Err(StateError::ArgumentCountMismatch {
        format: self.format().to_string(),
        expected: self.keys.len(),
        actual: self.args.len(),
      });
    }
    let mut entries: Vec<(&str, &Value)> = self
      .keys
      .iter()
      .map(String::as_str)
      .zip(self.args.iter())
      .collect();
    entries.push((ORIGINAL_FORMAT, &self.original));
    Ok(entries)
  }
}

impl fmt::Display for FormattedLogValues {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.args.is_empty() {
      return f.write_str(self.format());
    }
    let mut index = 0;
    for token in self.template.tokens() {
      match token {
        MessageTemplateToken::Text(text) => f.write_str(text)?,
        MessageTemplateToken::Property(property) => {
          match self.args.get(index) {
            Some(Value::Null) => f.write_str("(null)")?,
            Some(value) => write!(f, "{}", value)?,
            None => f.write_str(&property.raw)?,
          }
          index += 1;
        }
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn formatted_values_expose_keys_with_operators() {
    let formatted = FormattedLogValues::new("{@Person} is {$Age} in {City}", vec![
      Value::from("p"),
      Value::from(30),
      Value::from("Oslo"),
    ]);
    let keys: Vec<&str> = formatted.entries().unwrap().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["@Person", "$Age", "City", ORIGINAL_FORMAT]);
    assert_eq!(formatted.to_string(), "p is 30 in Oslo");
  }

  #[test]
  fn argument_count_mismatch_is_an_error() {
    let formatted = FormattedLogValues::new("{Two} {Properties}", vec![Value::from("one")]);
    assert_eq!(
      formatted.entries(),
      Err(StateError::ArgumentCountMismatch {
        format: "{Two} {Properties}".to_string(),
        expected: 2,
        actual: 1,
      })
    );
  }

  #[test]
  fn format_without_arguments_passes_through() {
    let formatted = FormattedLogValues::new("Nothing {Here}", Vec::new());
    assert_eq!(formatted.entries().unwrap().len(), 1);
    assert_eq!(formatted.to_string(), "Nothing {Here}");
  }

  #[test]
  fn only_non_generic_shapes_have_type_names() {
    assert_eq!(State::Pairs(PairList::typed("Order")).type_name(), Some("Order"));
    assert_eq!(State::Pairs(PairList::new()).type_name(), None);
    assert_eq!(State::Dictionary(IndexMap::new()).type_name(), None);
    assert!(State::from("text").entries().unwrap().is_none());
  }
}
