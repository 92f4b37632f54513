//! A category/level/event-id/scope logging front-end over `fibre_events`.
//!
//! Loggers come from a [`FibreLoggerProvider`] (or a [`FibreLoggerFactory`]) and take
//! their input as a [`State`]: a message template with arguments, key/value pairs,
//! or plain text. Each call is bound into a [`fibre_events::LogEvent`]:
//!
//! - `{OriginalFormat}` becomes the event's message template and the remaining pairs
//!   become properties. Keys prefixed with `@` are destructured and `$` stringified.
//! - A non-default [`EventId`] is attached as an `EventId` structure.
//! - Scopes opened with [`Logger::begin_scope`] follow the current logical flow and
//!   surface as properties plus a `Scope` sequence of scope names.
//!
//! Records from the `log` facade can be routed the same way with [`LogBridge`].
//!
//! ```ignore
//! use fibre_log_adapter::{FibreLoggerProvider, LoggerExt, LoggerProvider};
//!
//! let provider = FibreLoggerProvider::builder().logger(backend).build();
//! let logger = provider.create_logger("billing");
//! let _scope = logger.begin_scope_with("Invoice {InvoiceId}", vec![42.into()]);
//! logger.log_information("Charged {Amount}", vec![12.5.into()])?;
//! ```

mod api;
mod binder;
mod bridge;
mod caches;
mod captured_names;
pub mod config;
pub mod error;
mod event_id;
mod event_id_cache;
mod factory;
mod level;
mod logger;
mod provider;
mod provider_collection;
mod scope;
mod state;
mod template_cache;

pub use api::{Logger, LoggerExt, LoggerFactory, LoggerProvider};
pub use binder::StateFormatter;
pub use bridge::LogBridge;
pub use caches::{BindingCaches, CacheOptions};
pub use config::ProviderOptions;
pub use error::{Error, Result, StateError};
pub use event_id::EventId;
pub use event_id_cache::{EventIdPropertyCache, EVENT_ID_PROPERTY};
pub use factory::FibreLoggerFactory;
pub use level::{LevelConvert, LogLevel};
pub use logger::FibreLogger;
pub use provider::{FibreLoggerProvider, ProviderBuilder};
pub use provider_collection::{LogEventValues, LoggerProviderCollection, LoggerProviderCollectionSink};
pub use scope::{ExternalScopeProvider, ExternalScopes, ScopeHandle, SCOPE_PROPERTY};
pub use state::{FormattedLogValues, PairList, State, ORIGINAL_FORMAT};
pub use template_cache::TemplateCache;
