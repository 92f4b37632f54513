use crate::api::{Logger, LoggerProvider};
use crate::caches::BindingCaches;
use crate::config::ProviderOptions;
use crate::logger::FibreLogger;
use crate::scope::{ExternalScopeProvider, ScopeHandle, ScopeStack};
use crate::state::State;
use fibre_events::{Enricher, Log};
use parking_lot::Mutex;
use std::sync::Arc;

enum DisposeAction {
  Close(fibre_events::Logger),
  CloseAndFlushGlobal,
}

/// Creates [`FibreLogger`]s that share one scope stack and one set of binding caches.
///
/// Without an explicit backend logger, each created logger writes through the global
/// [`Log`] logger current at creation time.
pub struct FibreLoggerProvider {
  logger: Option<fibre_events::Logger>,
  scopes: Arc<ScopeStack>,
  caches: Arc<BindingCaches>,
  dispose_action: Mutex<Option<DisposeAction>>,
}

impl std::fmt::Debug for FibreLoggerProvider {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FibreLoggerProvider")
      .field("logger", &self.logger)
      .field("scopes", &self.scopes)
      .field("disposes", &self.dispose_action.lock().is_some())
      .finish()
  }
}

/// Builds a [`FibreLoggerProvider`].
#[derive(Default)]
pub struct ProviderBuilder {
  logger: Option<fibre_events::Logger>,
  dispose: bool,
  caches: Option<Arc<BindingCaches>>,
}

impl ProviderBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn logger(mut self, logger: fibre_events::Logger) -> Self {
    self.logger = Some(logger);
    self
  }

  /// Close the given logger, or the global one if none was given, when the provider
  /// is disposed.
  pub fn dispose(mut self, dispose: bool) -> Self {
    self.dispose = dispose;
    self
  }

  /// Use a private set of caches instead of the process-wide one.
  pub fn caches(mut self, caches: Arc<BindingCaches>) -> Self {
    self.caches = Some(caches);
    self
  }

  pub fn options(self, options: &ProviderOptions) -> Self {
    self
      .dispose(options.dispose)
      .caches(Arc::new(BindingCaches::new(options.caches)))
  }

  pub fn build(self) -> FibreLoggerProvider {
    let caches = self.caches.unwrap_or_else(BindingCaches::global);
    let scopes = Arc::new(ScopeStack::new(caches.clone()));
    let dispose_action = match (&self.logger, self.dispose) {
      (_, false) => None,
      (Some(logger), true) => Some(DisposeAction::Close(logger.clone())),
      (None, true) => Some(DisposeAction::CloseAndFlushGlobal),
    };
    let logger = self
      .logger
      .map(|logger| logger.for_context(scopes.clone() as Arc<dyn Enricher>));

    FibreLoggerProvider {
      logger,
      scopes,
      caches,
      dispose_action: Mutex::new(dispose_action),
    }
  }
}

impl FibreLoggerProvider {
  pub fn builder() -> ProviderBuilder {
    ProviderBuilder::new()
  }

  pub fn new(logger: Option<fibre_events::Logger>, dispose: bool) -> Self {
    let builder = ProviderBuilder::new().dispose(dispose);
    match logger {
      Some(logger) => builder.logger(logger).build(),
      None => builder.build(),
    }
  }

  pub fn logger(&self, category: &str) -> FibreLogger {
    let backend = match &self.logger {
      Some(logger) => logger.clone(),
      None => Log::logger().for_context(self.enricher()),
    };
    FibreLogger::new(backend, self.scopes.clone(), self.caches.clone(), category)
  }

  pub fn begin_scope(&self, state: State) -> ScopeHandle {
    self.scopes.push(state)
  }

  /// Also enrich events with the scopes of another front-end.
  pub fn set_scope_provider(&self, provider: Option<Arc<dyn ExternalScopeProvider>>) {
    self.scopes.set_external_provider(provider);
  }

  /// The enricher that applies this provider's scopes, for use in other pipelines.
  pub fn enricher(&self) -> Arc<dyn Enricher> {
    self.scopes.clone()
  }

  pub fn caches(&self) -> &Arc<BindingCaches> {
    &self.caches
  }

  pub fn flush(&self) {
    match &self.logger {
      Some(logger) => logger.flush(),
      None => Log::logger().flush(),
    }
  }

  /// Runs the dispose action chosen at construction, at most once.
  pub fn dispose(&self) {
    let action = self.dispose_action.lock().take();
    match action {
      Some(DisposeAction::Close(logger)) => logger.close(),
      Some(DisposeAction::CloseAndFlushGlobal) => Log::close_and_flush(),
      None => {}
    }
  }
}

impl LoggerProvider for FibreLoggerProvider {
  fn create_logger(&self, category: &str) -> Arc<dyn Logger> {
    Arc::new(self.logger(category))
  }

  fn dispose(&self) {
    FibreLoggerProvider::dispose(self)
  }
}
