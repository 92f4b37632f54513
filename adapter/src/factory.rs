use crate::api::{Logger, LoggerFactory, LoggerProvider};
use crate::provider::FibreLoggerProvider;
use crate::provider_collection::LoggerProviderCollection;
use fibre_events::SelfLog;
use std::sync::Arc;

/// A [`LoggerFactory`] backed by a single [`FibreLoggerProvider`].
///
/// Providers added through [`add_provider`](LoggerFactory::add_provider) go to the
/// attached [`LoggerProviderCollection`], if any. Without one they are ignored.
#[derive(Debug)]
pub struct FibreLoggerFactory {
  provider: FibreLoggerProvider,
  collection: Option<Arc<LoggerProviderCollection>>,
}

impl FibreLoggerFactory {
  pub fn new(
    logger: Option<fibre_events::Logger>,
    dispose: bool,
    collection: Option<Arc<LoggerProviderCollection>>,
  ) -> Self {
    Self::with_provider(FibreLoggerProvider::new(logger, dispose), collection)
  }

  pub fn with_provider(provider: FibreLoggerProvider, collection: Option<Arc<LoggerProviderCollection>>) -> Self {
    Self { provider, collection }
  }

  pub fn provider(&self) -> &FibreLoggerProvider {
    &self.provider
  }
}

impl LoggerFactory for FibreLoggerFactory {
  fn create_logger(&self, category: &str) -> Arc<dyn Logger> {
    self.provider.create_logger(category)
  }

  fn add_provider(&self, provider: Arc<dyn LoggerProvider>) {
    match &self.collection {
      Some(collection) => collection.add_provider(provider),
      None => SelfLog::write_line("Ignoring added logger provider"),
    }
  }

  fn dispose(&self) {
    self.provider.dispose();
  }
}
