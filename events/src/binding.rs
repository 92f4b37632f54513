//! Turning captured [`Value`]s into [`PropertyValue`]s.

use crate::error::Result;
use crate::template::{Destructuring, MessageTemplate};
use crate::value::{LogEventProperty, PropertyValue, Scalar, Structure, Value};

/// Nesting beyond this depth binds as null.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Binds values according to a capture mode and a depth limit.
#[derive(Debug, Clone, Copy)]
pub struct PropertyBinder {
  max_depth: usize,
}

impl Default for PropertyBinder {
  fn default() -> Self {
    Self {
      max_depth: DEFAULT_MAX_DEPTH,
    }
  }
}

impl PropertyBinder {
  pub fn with_max_depth(max_depth: usize) -> Self {
    Self { max_depth }
  }

  pub fn max_depth(&self) -> usize {
    self.max_depth
  }

  pub fn bind_property(
    &self,
    name: impl Into<String>,
    value: &Value,
    destructuring: Destructuring,
  ) -> Result<LogEventProperty> {
    LogEventProperty::new(name, self.bind_value(value, destructuring))
  }

  pub fn bind_value(&self, value: &Value, destructuring: Destructuring) -> PropertyValue {
    if destructuring == Destructuring::Stringify {
      return PropertyValue::scalar(value.to_string());
    }
    self.bind_at(value, destructuring == Destructuring::Destructure, 0)
  }

  fn bind_at(&self, value: &Value, destructure: bool, depth: usize) -> PropertyValue {
    if depth > self.max_depth {
      return PropertyValue::Scalar(Scalar::Null);
    }
    match value {
      Value::Null => PropertyValue::Scalar(Scalar::Null),
      Value::Bool(b) => PropertyValue::Scalar(Scalar::Bool(*b)),
      Value::I64(i) => PropertyValue::Scalar(Scalar::I64(*i)),
      Value::U64(u) => PropertyValue::Scalar(Scalar::U64(*u)),
      Value::F64(f) => PropertyValue::Scalar(Scalar::F64(*f)),
      Value::Str(s) => PropertyValue::Scalar(Scalar::Str(s.clone())),
      Value::Seq(items) => PropertyValue::Sequence(
        items
          .iter()
          .map(|item| self.bind_at(item, destructure, depth + 1))
          .collect(),
      ),
      Value::Map(entries) if entries.iter().all(|(k, _)| k.is_scalar()) => {
        PropertyValue::Dictionary(
          entries
            .iter()
            .map(|(k, v)| (scalar_key(k), self.bind_at(v, destructure, depth + 1)))
            .collect(),
        )
      }
      Value::Map(entries) => PropertyValue::Sequence(
        entries
          .iter()
          .map(|(k, v)| {
            PropertyValue::Sequence(vec![
              self.bind_at(k, destructure, depth + 1),
              self.bind_at(v, destructure, depth + 1),
            ])
          })
          .collect(),
      ),
      Value::Object(object) if destructure => {
        let properties = object
          .fields
          .iter()
          .filter(|(name, _)| LogEventProperty::is_valid_name(name))
          .map(|(name, field)| LogEventProperty {
            name: name.clone(),
            value: self.bind_at(field, true, depth + 1).into(),
          })
          .collect();
        PropertyValue::Structure(Structure::new(object.type_tag.clone(), properties))
      }
      Value::Object(object) => PropertyValue::Scalar(Scalar::Text(object.text.clone())),
    }
  }

  /// Pairs the template's holes, in order, with positional arguments.
  ///
  /// Arguments beyond the last hole are dropped; holes without an argument stay unbound
  /// and render as written.
  pub fn bind_template(&self, template: &MessageTemplate, args: &[Value]) -> Vec<LogEventProperty> {
    let mut bound: Vec<LogEventProperty> = Vec::new();
    for (token, arg) in template.property_tokens().zip(args) {
      if bound.iter().any(|p| p.name == token.name) {
        continue;
      }
      bound.push(LogEventProperty {
        name: token.name.clone(),
        value: self.bind_value(arg, token.destructuring).into(),
      });
    }
    bound
  }
}

fn scalar_key(key: &Value) -> Scalar {
  match key {
    Value::Bool(b) => Scalar::Bool(*b),
    Value::I64(i) => Scalar::I64(*i),
    Value::U64(u) => Scalar::U64(*u),
    Value::F64(f) => Scalar::F64(*f),
    Value::Str(s) => Scalar::Str(s.clone()),
    _ => Scalar::Null,
  }
}
