//! Structured log events.
//!
//! `fibre_events` is a small event pipeline built around message templates:
//!
//! - A [`MessageTemplate`] is text with named holes such as `"User {UserId} signed in"`.
//! - A [`LogEvent`] pairs a template with typed [`PropertyValue`]s, a level, a timestamp
//!   and an optional error.
//! - A [`Logger`] filters events by level, runs [`Enricher`]s over them and hands them
//!   to every configured [`Sink`](sink::Sink).
//! - [`LogContext`] carries enrichers along the current logical flow, including across
//!   `.await` points of futures wrapped with [`in_current_flow`].

pub mod binding;
pub mod config;
pub mod context;
pub mod enrich;
pub mod error;
pub mod event;
pub mod format;
mod global;
pub mod level;
mod logger;
pub mod self_log;
pub mod sink;
pub mod template;
pub mod value;

pub use binding::PropertyBinder;
pub use context::{in_current_flow, FlowContext, FlowExt, FlowLocal, LogContext, LogContextGuard, WithFlow};
pub use enrich::{Enricher, FixedPropertyEnricher, PropertyFactory};
pub use error::{Error, Result, SinkError, SinkFailure};
pub use event::{Exception, LogEvent};
pub use global::Log;
pub use level::LogEventLevel;
pub use logger::{Logger, LoggerConfiguration};
pub use self_log::SelfLog;
pub use template::{Destructuring, MessageTemplate, MessageTemplateParser};
pub use value::{LogEventProperty, Object, PropertyValue, Scalar, Structure, Value};

/// The property that names the component an event came from.
pub const SOURCE_CONTEXT_PROPERTY: &str = "SourceContext";
