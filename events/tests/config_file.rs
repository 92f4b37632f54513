use fibre_events::{LogEventLevel, LoggerConfiguration, Value};
use std::io::Write;

#[test]
fn file_sink_from_yaml_writes_json_lines() {
  let dir = tempfile::tempdir().unwrap();
  let log_path = dir.path().join("nested").join("events.log");
  let config_path = dir.path().join("logging.yaml");

  let yaml = format!(
    r#"
minimum_level: debug
enrich:
  properties:
    Application: billing
sinks:
  file:
    kind: file
    path: {:?}
    format: json
"#,
    log_path.display().to_string()
  );
  std::fs::File::create(&config_path)
    .unwrap()
    .write_all(yaml.as_bytes())
    .unwrap();

  let logger = LoggerConfiguration::from_file(&config_path).unwrap().create_logger();
  assert!(logger.is_enabled(LogEventLevel::Debug));
  logger.information("Charged {Amount}", &[Value::from(42)]).unwrap();
  logger.close();

  let contents = std::fs::read_to_string(&log_path).unwrap();
  let line: serde_json::Value = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
  assert_eq!(line["@mt"], "Charged {Amount}");
  assert_eq!(line["Amount"], 42);
  assert_eq!(line["Application"], "billing");
}

#[test]
fn missing_file_is_a_read_error() {
  let dir = tempfile::tempdir().unwrap();
  let result = LoggerConfiguration::from_file(dir.path().join("absent.yaml"));
  assert!(matches!(result, Err(fibre_events::Error::ConfigRead(_))));
}
