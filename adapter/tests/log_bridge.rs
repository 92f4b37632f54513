mod common;

use common::{int, provider_at, text};
use fibre_events::LogEventLevel;
use fibre_log_adapter::{Error, LogBridge};
use pretty_assertions::assert_eq;
use std::sync::Arc;

// The `log` facade accepts one logger per process, so everything runs in one test.
#[test]
fn log_macros_are_routed_through_the_provider() {
  let (provider, sink) = provider_at(LogEventLevel::Debug);
  let provider = Arc::new(provider);
  LogBridge::init(provider.clone(), log::LevelFilter::Trace).unwrap();

  log::info!(target: "app::http", status = 200, path = "/health"; "served {}", "{ok}");
  log::trace!(target: "app::http", "too detailed");
  {
    let _scope = provider.begin_scope(fibre_log_adapter::State::Pair(
      "ConnectionId".to_string(),
      fibre_events::Value::from(5),
    ));
    log::warn!(target: "app::db", "slow query");
  }
  log::logger().flush();

  let events = sink.events();
  assert_eq!(events.len(), 2);

  let served = &events[0];
  assert_eq!(served.level(), LogEventLevel::Information);
  assert_eq!(served.render_message(), "served {ok}");
  assert_eq!(served.property("SourceContext"), Some(&text("app::http")));
  assert_eq!(served.property("status"), Some(&int(200)));
  assert_eq!(served.property("path"), Some(&text("/health")));

  let slow = &events[1];
  assert_eq!(slow.level(), LogEventLevel::Warning);
  assert_eq!(slow.property("ConnectionId"), Some(&int(5)));

  let second = LogBridge::init(provider, log::LevelFilter::Info);
  assert!(matches!(second, Err(Error::LogBridgeInit(_))));
}
