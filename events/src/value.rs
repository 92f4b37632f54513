//! Values handed to the backend for capture, and the structured values it produces.
//!
//! A [`Value`] is what a caller supplies: a primitive, a collection, or an arbitrary
//! object captured through `serde`. A [`PropertyValue`] is what ends up on a
//! [`LogEvent`](crate::LogEvent) after [binding](crate::binding): a scalar, a sequence,
//! a structure, or a dictionary.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt::{self, Write};
use std::sync::Arc;

/// An arbitrary captured value, before it is bound to a property.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Null,
  Bool(bool),
  I64(i64),
  U64(u64),
  F64(f64),
  Str(String),
  Seq(Vec<Value>),
  Map(Vec<(Value, Value)>),
  Object(Object),
}

/// A captured object: its type tag, its display form, and its named fields.
///
/// Without destructuring, an object binds as its display text. With destructuring,
/// its fields become a [`Structure`].
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
  pub type_tag: Option<String>,
  pub text: String,
  pub fields: Vec<(String, Value)>,
}

impl Value {
  /// Captures any serializable value.
  ///
  /// Serialized maps and structs become a [`Value::Object`] tagged with the short
  /// type name of `T` and displayed through its `Debug` output. Anything else maps
  /// onto the corresponding primitive or collection variant.
  pub fn from_serialize<T: Serialize + fmt::Debug>(value: &T) -> Value {
    let text = format!("{:?}", value);
    match serde_json::to_value(value) {
      Ok(serde_json::Value::Object(map)) => Value::Object(Object {
        type_tag: Some(short_type_name::<T>().to_string()),
        text,
        fields: map
          .into_iter()
          .map(|(k, v)| (k, Value::from(v)))
          .collect(),
      }),
      Ok(other) => Value::from(other),
      Err(_) => Value::Object(Object {
        type_tag: Some(short_type_name::<T>().to_string()),
        text,
        fields: Vec::new(),
      }),
    }
  }

  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null)
  }

  /// True for the variants that bind directly to a [`Scalar`].
  pub fn is_scalar(&self) -> bool {
    matches!(
      self,
      Value::Null | Value::Bool(_) | Value::I64(_) | Value::U64(_) | Value::F64(_) | Value::Str(_)
    )
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::Str(s) => Some(s),
      _ => None,
    }
  }
}

fn short_type_name<T: ?Sized>() -> &'static str {
  let full = std::any::type_name::<T>();
  let base = full.split('<').next().unwrap_or(full);
  base.rsplit("::").next().unwrap_or(base)
}

/// The "string form" of a value, as used by the `$` stringify operator.
impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Null => f.write_str("null"),
      Value::Bool(b) => write!(f, "{}", b),
      Value::I64(i) => write!(f, "{}", i),
      Value::U64(u) => write!(f, "{}", u),
      Value::F64(x) => write!(f, "{}", x),
      Value::Str(s) => f.write_str(s),
      Value::Seq(items) => {
        f.write_char('[')?;
        for (i, item) in items.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          write!(f, "{}", item)?;
        }
        f.write_char(']')
      }
      Value::Map(entries) => {
        f.write_char('{')?;
        for (i, (k, v)) in entries.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          write!(f, "{}: {}", k, v)?;
        }
        f.write_char('}')
      }
      Value::Object(obj) => f.write_str(&obj.text),
    }
  }
}

impl From<serde_json::Value> for Value {
  fn from(value: serde_json::Value) -> Self {
    match value {
      serde_json::Value::Null => Value::Null,
      serde_json::Value::Bool(b) => Value::Bool(b),
      serde_json::Value::Number(n) => {
        if let Some(i) = n.as_i64() {
          Value::I64(i)
        } else if let Some(u) = n.as_u64() {
          Value::U64(u)
        } else {
          Value::F64(n.as_f64().unwrap_or(f64::NAN))
        }
      }
      serde_json::Value::String(s) => Value::Str(s),
      serde_json::Value::Array(items) => Value::Seq(items.into_iter().map(Value::from).collect()),
      serde_json::Value::Object(map) => Value::Object(Object {
        type_tag: None,
        text: serde_json::Value::Object(map.clone()).to_string(),
        fields: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
      }),
    }
  }
}

macro_rules! value_from_signed {
  ($($t:ty),*) => { $(impl From<$t> for Value { fn from(v: $t) -> Self { Value::I64(v as i64) } })* };
}
macro_rules! value_from_unsigned {
  ($($t:ty),*) => { $(impl From<$t> for Value { fn from(v: $t) -> Self { Value::U64(v as u64) } })* };
}
value_from_signed!(i8, i16, i32, i64, isize);
value_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
  fn from(v: f32) -> Self {
    Value::F64(v as f64)
  }
}

impl From<f64> for Value {
  fn from(v: f64) -> Self {
    Value::F64(v)
  }
}

impl From<bool> for Value {
  fn from(v: bool) -> Self {
    Value::Bool(v)
  }
}

impl From<&str> for Value {
  fn from(v: &str) -> Self {
    Value::Str(v.to_string())
  }
}

impl From<String> for Value {
  fn from(v: String) -> Self {
    Value::Str(v)
  }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(v: Option<T>) -> Self {
    v.map_or(Value::Null, Into::into)
  }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
  fn from(v: Vec<T>) -> Self {
    Value::Seq(v.into_iter().map(Into::into).collect())
  }
}

/// A primitive property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
  Null,
  Bool(bool),
  I64(i64),
  U64(u64),
  F64(f64),
  Str(String),
  /// The display form of a non-primitive captured without destructuring. Renders unquoted.
  Text(String),
}

impl Scalar {
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Scalar::Str(s) | Scalar::Text(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_i64(&self) -> Option<i64> {
    match self {
      Scalar::I64(i) => Some(*i),
      Scalar::U64(u) => i64::try_from(*u).ok(),
      _ => None,
    }
  }

  fn render(&self, format: Option<&str>, out: &mut String) {
    match self {
      Scalar::Null => out.push_str("null"),
      Scalar::Bool(b) => {
        let _ = write!(out, "{}", b);
      }
      Scalar::I64(i) => {
        let _ = write!(out, "{}", i);
      }
      Scalar::U64(u) => {
        let _ = write!(out, "{}", u);
      }
      Scalar::F64(x) => {
        let _ = write!(out, "{}", x);
      }
      Scalar::Str(s) if format == Some("l") => out.push_str(s),
      Scalar::Str(s) => {
        out.push('"');
        for c in s.chars() {
          if c == '"' || c == '\\' {
            out.push('\\');
          }
          out.push(c);
        }
        out.push('"');
      }
      Scalar::Text(s) => out.push_str(s),
    }
  }
}

macro_rules! scalar_from {
  ($($t:ty => $variant:ident as $target:ty),*) => {
    $(impl From<$t> for Scalar { fn from(v: $t) -> Self { Scalar::$variant(v as $target) } })*
  };
}
scalar_from!(i32 => I64 as i64, i64 => I64 as i64, u32 => U64 as u64, u64 => U64 as u64, f64 => F64 as f64);

impl From<bool> for Scalar {
  fn from(v: bool) -> Self {
    Scalar::Bool(v)
  }
}

impl From<&str> for Scalar {
  fn from(v: &str) -> Self {
    Scalar::Str(v.to_string())
  }
}

impl From<String> for Scalar {
  fn from(v: String) -> Self {
    Scalar::Str(v)
  }
}

/// A named list of properties, optionally tagged with the type it was captured from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Structure {
  pub type_tag: Option<String>,
  pub properties: Vec<LogEventProperty>,
}

impl Structure {
  pub fn new(type_tag: Option<String>, properties: Vec<LogEventProperty>) -> Self {
    Self {
      type_tag,
      properties,
    }
  }

  pub fn get(&self, name: &str) -> Option<&PropertyValue> {
    self
      .properties
      .iter()
      .find(|p| p.name == name)
      .map(|p| p.value.as_ref())
  }
}

/// A structured value attached to a [`LogEvent`](crate::LogEvent).
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
  Scalar(Scalar),
  Sequence(Vec<PropertyValue>),
  Structure(Structure),
  Dictionary(Vec<(Scalar, PropertyValue)>),
}

impl PropertyValue {
  pub fn scalar(value: impl Into<Scalar>) -> Self {
    PropertyValue::Scalar(value.into())
  }

  pub fn as_scalar(&self) -> Option<&Scalar> {
    match self {
      PropertyValue::Scalar(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_structure(&self) -> Option<&Structure> {
    match self {
      PropertyValue::Structure(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_sequence(&self) -> Option<&[PropertyValue]> {
    match self {
      PropertyValue::Sequence(items) => Some(items),
      _ => None,
    }
  }

  /// Renders the value as it appears inside a rendered message.
  ///
  /// The `l` format suppresses quoting of top-level strings.
  pub fn render(&self, format: Option<&str>, out: &mut String) {
    match self {
      PropertyValue::Scalar(s) => s.render(format, out),
      PropertyValue::Sequence(items) => {
        out.push('[');
        for (i, item) in items.iter().enumerate() {
          if i > 0 {
            out.push_str(", ");
          }
          item.render(None, out);
        }
        out.push(']');
      }
      PropertyValue::Structure(structure) => {
        if let Some(tag) = &structure.type_tag {
          out.push_str(tag);
          out.push(' ');
        }
        out.push_str("{ ");
        for (i, property) in structure.properties.iter().enumerate() {
          if i > 0 {
            out.push_str(", ");
          }
          out.push_str(&property.name);
          out.push_str(": ");
          property.value.render(None, out);
        }
        out.push_str(" }");
      }
      PropertyValue::Dictionary(entries) => {
        out.push('[');
        for (i, (key, value)) in entries.iter().enumerate() {
          if i > 0 {
            out.push_str(", ");
          }
          out.push('(');
          key.render(None, out);
          out.push_str(": ");
          value.render(None, out);
          out.push(')');
        }
        out.push(']');
      }
    }
  }
}

impl fmt::Display for PropertyValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut out = String::new();
    self.render(None, &mut out);
    f.write_str(&out)
  }
}

impl From<Scalar> for PropertyValue {
  fn from(value: Scalar) -> Self {
    PropertyValue::Scalar(value)
  }
}

/// Turns a bound value back into a capturable one, e.g. to hand an event's properties
/// to another logging front-end.
impl From<&PropertyValue> for Value {
  fn from(value: &PropertyValue) -> Self {
    match value {
      PropertyValue::Scalar(scalar) => match scalar {
        Scalar::Null => Value::Null,
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::I64(i) => Value::I64(*i),
        Scalar::U64(u) => Value::U64(*u),
        Scalar::F64(f) => Value::F64(*f),
        Scalar::Str(s) | Scalar::Text(s) => Value::Str(s.clone()),
      },
      PropertyValue::Sequence(items) => Value::Seq(items.iter().map(Value::from).collect()),
      PropertyValue::Structure(structure) => Value::Object(Object {
        type_tag: structure.type_tag.clone(),
        text: value.to_string(),
        fields: structure
          .properties
          .iter()
          .map(|p| (p.name.clone(), Value::from(p.value.as_ref())))
          .collect(),
      }),
      PropertyValue::Dictionary(entries) => Value::Map(
        entries
          .iter()
          .map(|(k, v)| (Value::from(&PropertyValue::Scalar(k.clone())), Value::from(v)))
          .collect(),
      ),
    }
  }
}

/// A named value. The value is shared so cached properties attach without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEventProperty {
  pub name: String,
  pub value: Arc<PropertyValue>,
}

impl LogEventProperty {
  /// Creates a property, rejecting names that fail [`is_valid_name`](Self::is_valid_name).
  pub fn new(name: impl Into<String>, value: impl Into<Arc<PropertyValue>>) -> Result<Self> {
    let name = name.into();
    if !Self::is_valid_name(&name) {
      return Err(Error::InvalidPropertyName(name));
    }
    Ok(Self {
      name,
      value: value.into(),
    })
  }

  pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Serialize)]
  struct Person {
    first_name: String,
    age: u32,
  }

  #[test]
  fn serializable_structs_become_tagged_objects() {
    let value = Value::from_serialize(&Person {
      first_name: "John".into(),
      age: 42,
    });
    let Value::Object(obj) = value else {
      panic!("expected an object, got {:?}", value);
    };
    assert_eq!(obj.type_tag.as_deref(), Some("Person"));
    assert!(obj.text.starts_with("Person {"));
    assert_eq!(obj.fields[0], ("first_name".to_string(), Value::Str("John".into())));
    assert_eq!(obj.fields[1], ("age".to_string(), Value::I64(42)));
  }

  #[test]
  fn serializable_sequences_stay_sequences() {
    let value = Value::from_serialize(&vec![1, 2, 3]);
    assert_eq!(value, Value::Seq(vec![Value::I64(1), Value::I64(2), Value::I64(3)]));
    assert_eq!(value.to_string(), "[1, 2, 3]");
  }

  #[test]
  fn property_values_render_like_message_holes() {
    assert_eq!(PropertyValue::scalar("pizza").to_string(), "\"pizza\"");
    assert_eq!(PropertyValue::scalar(7).to_string(), "7");

    let mut literal = String::new();
    PropertyValue::scalar("pizza").render(Some("l"), &mut literal);
    assert_eq!(literal, "pizza");

    let structure = PropertyValue::Structure(Structure::new(
      Some("Person".into()),
      vec![LogEventProperty::new("Name", PropertyValue::scalar("Ann")).unwrap()],
    ));
    assert_eq!(structure.to_string(), "Person { Name: \"Ann\" }");

    let dictionary = PropertyValue::Dictionary(vec![(Scalar::from("k"), PropertyValue::scalar(1))]);
    assert_eq!(dictionary.to_string(), "[(\"k\": 1)]");
  }

  #[test]
  fn blank_property_names_are_rejected() {
    assert!(LogEventProperty::new("", PropertyValue::scalar(1)).is_err());
    assert!(LogEventProperty::new("   ", PropertyValue::scalar(1)).is_err());
    assert!(LogEventProperty::new("Ok", PropertyValue::scalar(1)).is_ok());
  }
}
