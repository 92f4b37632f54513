//! Flow-local state: values that follow a logical flow of execution across `.await`
//! points and into spawned tasks, rather than staying with an OS thread.
//!
//! The current [`FlowContext`] lives in a thread local. Synchronous code sees whatever
//! was installed last on its thread; futures wrapped with [`in_current_flow`] carry a
//! snapshot and install it around every poll. Changes made inside a child flow never
//! leak back into the parent.

use crate::enrich::{Enricher, FixedPropertyEnricher, PropertyFactory};
use crate::event::LogEvent;
use crate::value::LogEventProperty;
use once_cell::sync::Lazy;
use pin_project::pin_project;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

type Slots = HashMap<u64, Arc<dyn Any + Send + Sync>>;

thread_local! {
  static CURRENT: RefCell<FlowContext> = RefCell::new(FlowContext::default());
}

static NEXT_SLOT: AtomicU64 = AtomicU64::new(1);

/// An immutable snapshot of every flow-local value.
#[derive(Clone, Default)]
pub struct FlowContext {
  slots: Arc<Slots>,
}

impl std::fmt::Debug for FlowContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FlowContext").field("slots", &self.slots.len()).finish()
  }
}

impl FlowContext {
  /// Snapshots the calling thread's current flow.
  pub fn capture() -> FlowContext {
    CURRENT.with(|c| c.borrow().clone())
  }

  /// Runs `f` inside this flow, restoring the caller's flow afterwards.
  pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
    let _restore = Installed::install(self.clone());
    f()
  }
}

/// Puts a context in place for as long as it lives.
struct Installed {
  previous: Option<FlowContext>,
}

impl Installed {
  fn install(context: FlowContext) -> Self {
    let previous = CURRENT.with(|c| c.replace(context));
    Self {
      previous: Some(previous),
    }
  }

  /// Restores the previous context, handing back the one that was current.
  fn finish(mut self) -> FlowContext {
    let previous = self.previous.take().unwrap_or_default();
    CURRENT.with(|c| c.replace(previous))
  }
}

impl Drop for Installed {
  fn drop(&mut self) {
    if let Some(previous) = self.previous.take() {
      let _ = CURRENT.try_with(|c| *c.borrow_mut() = previous);
    }
  }
}

/// A typed slot in the flow context.
pub struct FlowLocal<T> {
  id: u64,
  _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> FlowLocal<T> {
  pub fn new() -> Self {
    Self {
      id: NEXT_SLOT.fetch_add(1, Ordering::Relaxed),
      _marker: PhantomData,
    }
  }

  pub fn get(&self) -> Option<Arc<T>> {
    let slot = CURRENT.with(|c| c.borrow().slots.get(&self.id).cloned())?;
    slot.downcast::<T>().ok()
  }

  /// Replaces the value in the current flow, returning the previous one.
  pub fn set(&self, value: Option<Arc<T>>) -> Option<Arc<T>> {
    CURRENT.with(|c| {
      let mut current = c.borrow_mut();
      let slots = Arc::make_mut(&mut current.slots);
      let previous = match value {
        Some(value) => slots.insert(self.id, value),
        None => slots.remove(&self.id),
      };
      previous.and_then(|p| p.downcast::<T>().ok())
    })
  }
}

impl<T: Send + Sync + 'static> Default for FlowLocal<T> {
  fn default() -> Self {
    Self::new()
  }
}

/// A future that runs inside its own flow context.
#[pin_project]
#[derive(Debug)]
pub struct WithFlow<F> {
  #[pin]
  inner: F,
  context: FlowContext,
}

impl<F: Future> Future for WithFlow<F> {
  type Output = F::Output;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let this = self.project();
    let installed = Installed::install(this.context.clone());
    let result = this.inner.poll(cx);
    *this.context = installed.finish();
    result
  }
}

/// Wraps a future so it carries a snapshot of the caller's current flow.
pub fn in_current_flow<F: Future>(future: F) -> WithFlow<F> {
  WithFlow {
    inner: future,
    context: FlowContext::capture(),
  }
}

pub trait FlowExt: Future + Sized {
  fn in_current_flow(self) -> WithFlow<Self> {
    in_current_flow(self)
  }
}

impl<F: Future> FlowExt for F {}

// --- Ambient log context ---

type EnricherStack = Vec<Arc<dyn Enricher>>;

static LOG_CONTEXT: Lazy<FlowLocal<EnricherStack>> = Lazy::new(FlowLocal::new);

/// Enrichers pushed onto the current flow, applied to every event written by a logger
/// configured with [`enrich_from_log_context`](crate::LoggerConfiguration::enrich_from_log_context).
pub struct LogContext;

impl LogContext {
  /// Pushes an enricher for the rest of the current flow, until the guard is dropped.
  pub fn push(enricher: Arc<dyn Enricher>) -> LogContextGuard {
    let previous = LOG_CONTEXT.get();
    let mut next: EnricherStack = previous.as_deref().cloned().unwrap_or_default();
    next.push(enricher);
    LOG_CONTEXT.set(Some(Arc::new(next)));
    LogContextGuard {
      previous: Some(previous),
    }
  }

  pub fn push_property(property: LogEventProperty) -> LogContextGuard {
    Self::push(Arc::new(FixedPropertyEnricher::new(property)))
  }

  /// Number of enrichers on the current flow's stack.
  pub fn depth() -> usize {
    LOG_CONTEXT.get().map_or(0, |stack| stack.len())
  }

  /// Applies the stacked enrichers, most recently pushed first.
  pub fn enrich(event: &mut LogEvent, factory: &dyn PropertyFactory) {
    if let Some(stack) = LOG_CONTEXT.get() {
      for enricher in stack.iter().rev() {
        enricher.enrich(event, factory);
      }
    }
  }
}

/// Restores the log context to what it was before the matching push.
#[must_use = "dropping the guard immediately pops the pushed enricher"]
pub struct LogContextGuard {
  previous: Option<Option<Arc<EnricherStack>>>,
}

impl LogContextGuard {
  pub fn pop(self) {}
}

impl Drop for LogContextGuard {
  fn drop(&mut self) {
    if let Some(previous) = self.previous.take() {
      LOG_CONTEXT.set(previous);
    }
  }
}
