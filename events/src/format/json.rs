use super::Formatter;
use crate::error::SinkError;
use crate::event::LogEvent;
use crate::value::{PropertyValue, Scalar};
use serde_json::{json, Map, Value as Json};

/// One JSON object per line, in the compact `@t`/`@l`/`@mt` layout.
///
/// Properties are written at the top level next to the reserved `@` fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
  render_message: bool,
}

impl JsonFormatter {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds the rendered message as `@m`.
  pub fn with_rendered_message(mut self, enabled: bool) -> Self {
    self.render_message = enabled;
    self
  }
}

impl Formatter for JsonFormatter {
  fn format(&self, event: &LogEvent, out: &mut String) -> Result<(), SinkError> {
    let mut object = Map::new();
    object.insert("@t".into(), Json::String(event.timestamp().to_rfc3339()));
    object.insert("@l".into(), Json::String(event.level().as_str().to_string()));
    object.insert("@mt".into(), Json::String(event.message_template().text().to_string()));
    if self.render_message {
      object.insert("@m".into(), Json::String(event.render_message()));
    }
    if let Some(error) = event.exception() {
      object.insert("@x".into(), Json::String(error.to_string()));
    }
    for (name, value) in event.properties() {
      let key = if name.starts_with('@') {
        format!("@{}", name)
      } else {
        name.clone()
      };
      object.insert(key, to_json(value));
    }
    let line = serde_json::to_string(&Json::Object(object)).map_err(|e| SinkError::Format(e.to_string()))?;
    out.push_str(&line);
    out.push('\n');
    Ok(())
  }
}

/// Converts a property value into plain JSON. Structures carry their tag as `$type`.
pub fn to_json(value: &PropertyValue) -> Json {
  match value {
    PropertyValue::Scalar(scalar) => scalar_to_json(scalar),
    PropertyValue::Sequence(items) => Json::Array(items.iter().map(to_json).collect()),
    PropertyValue::Structure(structure) => {
      let mut object = Map::new();
      if let Some(tag) = &structure.type_tag {
        object.insert("$type".into(), Json::String(tag.clone()));
      }
      for property in &structure.properties {
        object.insert(property.name.clone(), to_json(&property.value));
      }
      Json::Object(object)
    }
    PropertyValue::Dictionary(entries) => {
      let mut object = Map::new();
      for (key, value) in entries {
        let key = match key {
          Scalar::Str(s) | Scalar::Text(s) => s.clone(),
          other => PropertyValue::Scalar(other.clone()).to_string(),
        };
        object.insert(key, to_json(value));
      }
      Json::Object(object)
    }
  }
}

fn scalar_to_json(scalar: &Scalar) -> Json {
  match scalar {
    Scalar::Null => Json::Null,
    Scalar::Bool(b) => json!(b),
    Scalar::I64(i) => json!(i),
    Scalar::U64(u) => json!(u),
    Scalar::F64(f) => json!(f),
    Scalar::Str(s) | Scalar::Text(s) => Json::String(s.clone()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::level::LogEventLevel;
  use crate::template::MessageTemplateParser;
  use crate::value::{LogEventProperty, Structure};
  use chrono::Utc;
  use std::sync::Arc;

  #[test]
  fn writes_reserved_fields_and_properties() {
    let structure = PropertyValue::Structure(Structure::new(
      Some("EventId".to_string()),
      vec![LogEventProperty::new("Id", PropertyValue::scalar(7)).unwrap()],
    ));
    let event = LogEvent::new(
      Utc::now(),
      LogEventLevel::Error,
      None,
      Arc::new(MessageTemplateParser::new().parse("Failed {Count} times")),
      vec![
        LogEventProperty::new("Count", PropertyValue::scalar(3)).unwrap(),
        LogEventProperty::new("EventId", structure).unwrap(),
      ],
    );

    let mut out = String::new();
    JsonFormatter::new().with_rendered_message(true).format(&event, &mut out).unwrap();
    let parsed: Json = serde_json::from_str(out.trim_end()).unwrap();

    assert_eq!(parsed["@l"], "Error");
    assert_eq!(parsed["@mt"], "Failed {Count} times");
    assert_eq!(parsed["@m"], "Failed 3 times");
    assert_eq!(parsed["Count"], 3);
    assert_eq!(parsed["EventId"]["$type"], "EventId");
    assert_eq!(parsed["EventId"]["Id"], 7);
  }
}
