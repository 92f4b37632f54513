use fibre_events::{
  in_current_flow, FlowExt, FlowLocal, LogContext, LogEventProperty, LoggerConfiguration, PropertyValue,
};
use fibre_events::sink::InMemorySink;
use std::sync::Arc;
use std::time::Duration;

fn property(name: &str, value: &str) -> LogEventProperty {
  LogEventProperty::new(name, PropertyValue::scalar(value)).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn log_context_follows_spawned_tasks() {
  let sink = Arc::new(InMemorySink::new());
  let logger = LoggerConfiguration::new()
    .enrich_from_log_context()
    .write_to("memory", sink.clone())
    .create_logger();

  let guard = LogContext::push_property(property("RequestId", "r-1"));
  let task_logger = logger.clone();
  let handle = tokio::spawn(in_current_flow(async move {
    tokio::time::sleep(Duration::from_millis(5)).await;
    task_logger.information("in task", &[]).unwrap();
  }));
  drop(guard);
  handle.await.unwrap();

  logger.information("after pop", &[]).unwrap();

  let events = sink.events();
  assert_eq!(events.len(), 2);
  assert_eq!(events[0].property("RequestId").unwrap().to_string(), "\"r-1\"");
  assert!(events[1].property("RequestId").is_none());
}

#[tokio::test]
async fn child_changes_do_not_leak_into_parent() {
  let local: Arc<FlowLocal<String>> = Arc::new(FlowLocal::new());
  local.set(Some(Arc::new("parent".to_string())));

  let inner = local.clone();
  let seen = async move {
    let before = inner.get().map(|v| v.to_string());
    inner.set(Some(Arc::new("child".to_string())));
    tokio::task::yield_now().await;
    let after = inner.get().map(|v| v.to_string());
    (before, after)
  }
  .in_current_flow()
  .await;

  assert_eq!(seen.0.as_deref(), Some("parent"));
  assert_eq!(seen.1.as_deref(), Some("child"));
  assert_eq!(local.get().map(|v| v.to_string()).as_deref(), Some("parent"));
}

#[test]
fn innermost_push_wins() {
  let sink = Arc::new(InMemorySink::new());
  let logger = LoggerConfiguration::new()
    .enrich_from_log_context()
    .write_to("memory", sink.clone())
    .create_logger();

  let _outer = LogContext::push_property(property("Layer", "outer"));
  let _inner = LogContext::push_property(property("Layer", "inner"));
  logger.information("x", &[]).unwrap();

  assert_eq!(sink.single().unwrap().property("Layer").unwrap().to_string(), "\"inner\"");
}
