//! Message templates: literal text with named holes.
//!
//! A hole is written `{Name}`, optionally prefixed with a capture operator (`@` to
//! destructure, `$` to stringify) and followed by an alignment (`,-10`) and/or a
//! format (`:l`). Doubled braces escape themselves. Text that does not form a valid
//! hole is kept as literal text; parsing never fails.

use crate::value::PropertyValue;
use indexmap::IndexMap;
use std::sync::Arc;

/// How a hole asks for its value to be captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destructuring {
  #[default]
  Default,
  /// `@Name`
  Destructure,
  /// `$Name`
  Stringify,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyToken {
  pub name: String,
  pub destructuring: Destructuring,
  pub alignment: Option<i32>,
  pub format: Option<String>,
  /// The hole exactly as written, braces included.
  pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageTemplateToken {
  Text(String),
  Property(PropertyToken),
}

/// A parsed, immutable message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
  text: String,
  tokens: Vec<MessageTemplateToken>,
}

impl MessageTemplate {
  pub fn empty() -> Self {
    Self {
      text: String::new(),
      tokens: Vec::new(),
    }
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn tokens(&self) -> &[MessageTemplateToken] {
    &self.tokens
  }

  /// The named holes, in the order they appear.
  pub fn property_tokens(&self) -> impl Iterator<Item = &PropertyToken> {
    self.tokens.iter().filter_map(|t| match t {
      MessageTemplateToken::Property(p) => Some(p),
      MessageTemplateToken::Text(_) => None,
    })
  }

  pub fn property_names(&self) -> impl Iterator<Item = &str> {
    self.property_tokens().map(|p| p.name.as_str())
  }

  /// Renders the template against a set of properties.
  ///
  /// Holes with no matching property are rendered as written.
  pub fn render(&self, properties: &IndexMap<String, Arc<PropertyValue>>) -> String {
    let mut out = String::with_capacity(self.text.len());
    for token in &self.tokens {
      match token {
        MessageTemplateToken::Text(text) => out.push_str(text),
        MessageTemplateToken::Property(p) => match properties.get(&p.name) {
          Some(value) => {
            let mut rendered = String::new();
            value.render(p.format.as_deref(), &mut rendered);
            push_aligned(&mut out, &rendered, p.alignment);
          }
          None => out.push_str(&p.raw),
        },
      }
    }
    out
  }
}

fn push_aligned(out: &mut String, rendered: &str, alignment: Option<i32>) {
  let Some(width) = alignment else {
    out.push_str(rendered);
    return;
  };
  let len = rendered.chars().count();
  let pad = (width.unsigned_abs() as usize).saturating_sub(len);
  if width < 0 {
    out.push_str(rendered);
    out.extend(std::iter::repeat(' ').take(pad));
  } else {
    out.extend(std::iter::repeat(' ').take(pad));
    out.push_str(rendered);
  }
}

/// Parses template text into a [`MessageTemplate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageTemplateParser;

impl MessageTemplateParser {
  pub fn new() -> Self {
    Self
  }

  pub fn parse(&self, text: &str) -> MessageTemplate {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
      match c {
        '{' if rest.starts_with("{{") => {
          literal.push('{');
          rest = &rest[2..];
        }
        '{' => match rest[1..].find(['{', '}']) {
          Some(end) if rest.as_bytes()[end + 1] == b'}' => {
            let raw = &rest[..end + 2];
            match parse_hole(&raw[1..raw.len() - 1], raw) {
              Some(token) => {
                if !literal.is_empty() {
                  tokens.push(MessageTemplateToken::Text(std::mem::take(&mut literal)));
                }
                tokens.push(MessageTemplateToken::Property(token));
              }
              None => literal.push_str(raw),
            }
            rest = &rest[raw.len()..];
          }
          // Unterminated, or another '{' before the closing brace.
          Some(end) => {
            literal.push_str(&rest[..end + 1]);
            rest = &rest[end + 1..];
          }
          None => {
            literal.push_str(rest);
            rest = "";
          }
        },
        '}' if rest.starts_with("}}") => {
          literal.push('}');
          rest = &rest[2..];
        }
        _ => {
          literal.push(c);
          rest = &rest[c.len_utf8()..];
        }
      }
    }

    if !literal.is_empty() {
      tokens.push(MessageTemplateToken::Text(literal));
    }

    MessageTemplate {
      text: text.to_string(),
      tokens,
    }
  }
}

fn parse_hole(inner: &str, raw: &str) -> Option<PropertyToken> {
  let (destructuring, body) = match inner.chars().next()? {
    '@' => (Destructuring::Destructure, &inner[1..]),
    '$' => (Destructuring::Stringify, &inner[1..]),
    _ => (Destructuring::Default, inner),
  };

  let (head, format) = match body.split_once(':') {
    Some((head, format)) => (head, Some(format)),
    None => (body, None),
  };
  let (name, alignment) = match head.split_once(',') {
    Some((name, alignment)) => (name, Some(alignment.trim().parse::<i32>().ok()?)),
    None => (head, None),
  };

  if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
    return None;
  }
  if format.is_some_and(str::is_empty) {
    return None;
  }

  Some(PropertyToken {
    name: name.to_string(),
    destructuring,
    alignment,
    format: format.map(str::to_string),
    raw: raw.to_string(),
  })
}
