//! Nested logging scopes.
//!
//! Each provider keeps one scope chain per logical flow. A pushed scope's state
//! contributes properties to every event written while it is active, and plain states
//! are collected, outermost first, into the event's `Scope` property.

use crate::caches::BindingCaches;
use crate::captured_names::Capture;
use crate::binder::stringify;
use crate::state::{State, ORIGINAL_FORMAT};
use fibre_events::{
  Enricher, FlowLocal, LogContext, LogContextGuard, LogEvent, LogEventProperty, PropertyFactory,
  PropertyValue, Scalar, SelfLog, Value,
};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;

pub const SCOPE_PROPERTY: &str = "Scope";

/// Name used to bind a scope state that is neither a pair nor a key/value collection.
const UNNAMED_SCOPE: &str = "None";

/// Scopes tracked outside this crate, e.g. by another logging front-end.
pub trait ExternalScopeProvider: Send + Sync {
  /// Calls `callback` once per active scope, outermost first.
  fn for_each_scope(&self, callback: &mut dyn FnMut(&State));
}

struct ScopeNode {
  state: State,
  parent: Option<Arc<ScopeNode>>,
}

/// The scope chain of one provider, and the enricher that applies it.
pub struct ScopeStack {
  current: FlowLocal<ScopeNode>,
  external: RwLock<Option<Arc<dyn ExternalScopeProvider>>>,
  caches: Arc<BindingCaches>,
}

impl fmt::Debug for ScopeStack {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ScopeStack")
      .field("depth", &self.depth())
      .field("external", &self.external.read().is_some())
      .finish()
  }
}

impl ScopeStack {
  pub fn new(caches: Arc<BindingCaches>) -> Self {
    Self {
      current: FlowLocal::new(),
      external: RwLock::new(None),
      caches,
    }
  }

  pub fn set_external_provider(&self, provider: Option<Arc<dyn ExternalScopeProvider>>) {
    *self.external.write() = provider;
  }

  /// Number of scopes active on the current flow.
  pub fn depth(&self) -> usize {
    let mut depth = 0;
    let mut scan = self.current.get();
    while let Some(node) = scan {
      depth += 1;
      scan = node.parent.clone();
    }
    depth
  }

  /// Pushes a scope onto the current flow.
  ///
  /// The outermost scope also pushes this stack onto the backend's [`LogContext`], so
  /// loggers that read the log context see the scopes too.
  pub fn push(self: &Arc<Self>, state: State) -> ScopeHandle {
    let parent = self.current.get();
    let chained = parent
      .is_none()
      .then(|| LogContext::push(self.clone() as Arc<dyn Enricher>));

    let node = Arc::new(ScopeNode { state, parent });
    self.current.set(Some(node.clone()));

    let stack = self.clone();
    ScopeHandle::new(move || stack.pop(&node, chained))
  }

  /// Unlinks `node` if it is still reachable from the current scope. A node that an
  /// earlier out-of-order disposal already cut off is left alone.
  ///
  /// Disposing an outer scope before an inner one ends the inner scopes too: the
  /// current scope becomes the outer scope's parent.
  fn pop(&self, node: &Arc<ScopeNode>, chained: Option<LogContextGuard>) {
    let mut scan = self.current.get();
    while let Some(candidate) = scan {
      if Arc::ptr_eq(&candidate, node) {
        self.current.set(node.parent.clone());
        break;
      }
      scan = candidate.parent.clone();
    }
    drop(chained);
  }
}

impl Enricher for ScopeStack {
  fn enrich(&self, event: &mut LogEvent, factory: &dyn PropertyFactory) {
    let mut items = Vec::new();

    let mut scan = self.current.get();
    while let Some(node) = scan {
      if let Some(item) = self.translate(&node.state, event, factory, AddMode::IfAbsent) {
        items.push(item);
      }
      scan = node.parent.clone();
    }
    items.reverse();

    let external = self.external.read().clone();
    if let Some(external) = external {
      external.for_each_scope(&mut |state: &State| {
        if let Some(item) = self.translate(state, event, factory, AddMode::Update) {
          items.push(item);
        }
      });
    }

    if !items.is_empty() {
      event.add_if_absent(LogEventProperty {
        name: SCOPE_PROPERTY.to_string(),
        value: Arc::new(PropertyValue::Sequence(items)),
      });
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddMode {
  IfAbsent,
  Update,
}

impl ScopeStack {
  /// Adds the properties a scope state contributes and returns its scope item, if any.
  fn translate(
    &self,
    state: &State,
    event: &mut LogEvent,
    factory: &dyn PropertyFactory,
    mode: AddMode,
  ) -> Option<PropertyValue> {
    match state {
      State::Null => None,
      State::Pair(name, value) => {
        self.add_property(event, factory, name, value, mode);
        None
      }
      State::Dictionary(_) | State::Pairs(_) | State::Formatted(_) | State::Event(_) => {
        let entries = match state.entries() {
          Ok(entries) => entries.unwrap_or_default(),
          Err(error) => {
            SelfLog::write_line(format_args!("Failed to enrich event from scope: {}", error));
            return Some(PropertyValue::Scalar(Scalar::Str(state.to_string())));
          }
        };
        let mut item = None;
        for (key, value) in entries {
          if key == ORIGINAL_FORMAT && matches!(value, Value::Str(_)) {
            item = Some(PropertyValue::Scalar(Scalar::Str(state.to_string())));
          } else {
            self.add_property(event, factory, key, value, mode);
          }
        }
        item
      }
      State::Text(_) | State::Value(_) => factory
        .create_property(UNNAMED_SCOPE, &state.to_value(), false)
        .ok()
        .map(|property| Arc::unwrap_or_clone(property.value)),
    }
  }

  fn add_property(&self, event: &mut LogEvent, factory: &dyn PropertyFactory, key: &str, value: &Value, mode: AddMode) {
    let (capture, name) = self.caches.names.resolve(key);
    let created = match capture {
      Capture::Plain => factory.create_property(&name, value, false),
      Capture::Destructure => factory.create_property(&name, value, true),
      Capture::Stringify => factory.create_property(&name, &stringify(value), false),
    };
    let Ok(property) = created else {
      return;
    };
    match mode {
      AddMode::IfAbsent => {
        event.add_if_absent(property);
      }
      AddMode::Update => event.add_or_update(property),
    }
  }
}

// --- Handle ---

type Disposer = Box<dyn FnOnce() + Send>;

/// Ends a scope when disposed or dropped. Disposing twice is a no-op.
#[must_use = "dropping the handle immediately ends the scope"]
pub struct ScopeHandle {
  disposer: Mutex<Option<Disposer>>,
}

impl fmt::Debug for ScopeHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ScopeHandle")
      .field("disposed", &self.is_disposed())
      .finish()
  }
}

impl ScopeHandle {
  pub fn new(disposer: impl FnOnce() + Send + 'static) -> Self {
    Self {
      disposer: Mutex::new(Some(Box::new(disposer))),
    }
  }

  /// A handle with nothing to end.
  pub fn noop() -> Self {
    Self {
      disposer: Mutex::new(None),
    }
  }

  pub fn dispose(&self) {
    let disposer = self.disposer.lock().take();
    if let Some(disposer) = disposer {
      disposer();
    }
  }

  pub fn is_disposed(&self) -> bool {
    self.disposer.lock().is_none()
  }
}

impl Drop for ScopeHandle {
  fn drop(&mut self) {
    self.dispose();
  }
}

// --- External scopes ---

/// A standalone [`ExternalScopeProvider`] with its own flow-local stack.
pub struct ExternalScopes {
  current: FlowLocal<ExternalNode>,
}

struct ExternalNode {
  state: State,
  parent: Option<Arc<ExternalNode>>,
}

impl Default for ExternalScopes {
  fn default() -> Self {
    Self {
      current: FlowLocal::new(),
    }
  }
}

impl fmt::Debug for ExternalScopes {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ExternalScopes").finish_non_exhaustive()
  }
}

impl ExternalScopes {
  pub fn new() -> Self {
    Self::default()
  }

  /// Pushes a scope; the handle ends it and anything pushed inside it.
  pub fn push(self: &Arc<Self>, state: State) -> ScopeHandle {
    let node = Arc::new(ExternalNode {
      state,
      parent: self.current.get(),
    });
    self.current.set(Some(node.clone()));
    let scopes = self.clone();
    ScopeHandle::new(move || scopes.pop(&node))
  }

  /// Same unlinking rule as the internal scope chain.
  fn pop(&self, node: &Arc<ExternalNode>) {
    let mut scan = self.current.get();
    while let Some(candidate) = scan {
      if Arc::ptr_eq(&candidate, node) {
        self.current.set(node.parent.clone());
        return;
      }
      scan = candidate.parent.clone();
    }
  }
}

impl ExternalScopeProvider for ExternalScopes {
  fn for_each_scope(&self, callback: &mut dyn FnMut(&State)) {
    let mut chain = Vec::new();
    let mut scan = self.current.get();
    while let Some(node) = scan {
      scan = node.parent.clone();
      chain.push(node);
    }
    for node in chain.iter().rev() {
      callback(&node.state);
    }
  }
}
