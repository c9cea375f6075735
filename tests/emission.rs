use chrono::{DateTime, Duration as ChronoDuration, Utc};
use gedai_log::sink::MemorySink;
use gedai_log::{BuildError, Level, Logger, LoggerConfig, SinkTarget};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

fn memory_logger(config: LoggerConfig) -> (Logger, MemorySink, MemorySink) {
    let out = MemorySink::new();
    let err = MemorySink::new();
    let logger = Logger::with_sinks(config, Arc::new(out.clone()), Arc::new(err.clone()))
        .expect("default config is valid");
    (logger, out, err)
}

#[test]
fn info_floor_scenario() {
    let (logger, out, err) = memory_logger(LoggerConfig::default());

    logger.emit(Level::Debug, "x", &[]);
    assert!(out.is_empty());
    assert!(err.is_empty());

    logger.emit(Level::Info, "hi", &[]);
    let records = out.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["Body"], "hi");
    assert_eq!(records[0]["Severity"], "INFO");
    assert!(err.is_empty());

    logger.emit(Level::Warn, "careful", &[]);
    assert_eq!(out.lines().len(), 2);
    assert!(err.is_empty());

    logger.emit(Level::Error, "bad", &[]);
    let out_lines = out.lines();
    assert_eq!(out_lines.len(), 3);
    assert_eq!(err.lines(), vec![out_lines[2].clone()]);
}

#[test]
fn below_floor_writes_zero_bytes() {
    for floor in Level::ALL {
        let (logger, out, err) = memory_logger(LoggerConfig::default().with_minimum_level(floor));
        for level in Level::ALL.iter().copied().filter(|l| *l < floor) {
            logger.emit(level, "dropped", &[]);
        }
        assert!(out.bytes().is_empty(), "floor {floor}");
        assert!(err.bytes().is_empty(), "floor {floor}");
    }
}

#[test]
fn one_line_per_enabled_call_and_errors_mirrored_byte_for_byte() {
    let (logger, out, err) = memory_logger(LoggerConfig::default().with_minimum_level(Level::Debug));

    for level in Level::ALL {
        out.clear();
        err.clear();
        logger.emit(level, format!("at {}", level), &[]);

        let bytes = out.bytes();
        assert_eq!(bytes.last(), Some(&b'\n'));
        assert_eq!(bytes.iter().filter(|b| **b == b'\n').count(), 1);

        if level.is_error() {
            assert_eq!(err.bytes(), bytes);
        } else {
            assert!(err.is_empty());
        }
    }
}

#[test]
fn records_carry_exactly_the_default_keys() {
    let (logger, out, _) = memory_logger(LoggerConfig::default());
    logger.info("keys");
    logger.error("keys");

    let expected: BTreeSet<&str> =
        ["Severity", "Body", "Timestamp", "Caller", "Attributes", "Annotations"].into_iter().collect();
    for record in out.records() {
        let keys: BTreeSet<&str> = record.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, expected);
    }
}

#[test]
fn static_fields_match_default_profile() {
    let (logger, out, _) = memory_logger(LoggerConfig::default());
    logger.info("meta");

    let record = &out.records()[0];
    assert_eq!(record["Attributes"]["service.name"], "gedai");
    assert_eq!(record["Attributes"]["service.version"], "v1.0.0");
    assert_eq!(record["Annotations"]["team"], "team-gedai");
    assert_eq!(record["Annotations"]["contact"], "gedai-contact");
    assert_eq!(record["Annotations"]["handbook"], "http://handbook.io");

    let captured = record["Attributes"]["time"].as_str().unwrap();
    let captured = DateTime::parse_from_rfc3339(captured).unwrap();
    assert_eq!(captured.offset().local_minus_utc(), 0);
    assert_eq!(captured.with_timezone(&Utc), logger.static_fields().captured_at());
}

#[test]
fn capture_time_is_fixed_while_timestamp_follows_calls() {
    let (logger, out, _) = memory_logger(LoggerConfig::default());

    let before = Utc::now();
    logger.info("first");
    std::thread::sleep(std::time::Duration::from_millis(1100));
    logger.info("second");
    let after = Utc::now();

    let records = out.records();
    assert_eq!(records[0]["Attributes"]["time"], records[1]["Attributes"]["time"]);
    assert_ne!(records[0]["Timestamp"], records[1]["Timestamp"]);

    for record in &records {
        let ts = DateTime::parse_from_rfc3339(record["Timestamp"].as_str().unwrap())
            .unwrap()
            .with_timezone(&Utc);
        assert!(ts >= before - ChronoDuration::seconds(1));
        assert!(ts <= after);
    }
}

#[test]
fn parsed_lines_round_trip_level_and_message() {
    let (logger, out, _) = memory_logger(LoggerConfig::default().with_minimum_level(Level::Debug));
    let messages = ["plain", "with \"quotes\"", "multi\nline", "unicode ✓", ""];

    for level in Level::ALL {
        for message in messages {
            out.clear();
            logger.emit(level, message, &[]);
            let lines = out.lines();
            assert_eq!(lines.len(), 1, "embedded newlines must be escaped");
            let parsed: Value = serde_json::from_str(&lines[0]).unwrap();
            assert_eq!(parsed["Severity"], level.as_str());
            assert_eq!(parsed["Body"], message);
        }
    }
}

#[test]
fn overridden_metadata_and_keys() {
    let mut config = LoggerConfig::default()
        .with_service("search", "v0.9.0")
        .with_annotation("oncall", "#search");
    config.schema.message_key = "msg".to_string();
    config.schema.level_key = "lvl".to_string();
    let (logger, out, _) = memory_logger(config);

    logger.warn("custom");
    let record = &out.records()[0];
    assert_eq!(record["msg"], "custom");
    assert_eq!(record["lvl"], "WARN");
    assert!(record.get("Body").is_none());
    assert_eq!(record["Attributes"]["service.name"], "search");
    assert_eq!(record["Annotations"]["oncall"], "#search");
}

#[test]
fn build_fails_when_sink_cannot_be_opened() {
    let missing = std::env::temp_dir().join("gedai-log-no-such-dir").join("x").join("out.json");
    let config = LoggerConfig::default().with_outputs(SinkTarget::File(missing), SinkTarget::Stderr);

    match Logger::build(config) {
        Err(BuildError::OpenSink { source, .. }) => {
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected OpenSink, got {:?}", other),
    }
}

#[test]
fn build_fails_on_inconsistent_layout() {
    let mut config = LoggerConfig::default();
    config.schema.name_key = "Severity".to_string();
    assert!(matches!(Logger::build(config), Err(BuildError::DuplicateKey(_))));
}

#[test]
fn file_output_receives_records() {
    let path = std::env::temp_dir().join(format!("gedai-log-emission-{}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let config = LoggerConfig::default().with_outputs(SinkTarget::File(path.clone()), SinkTarget::Discard);
    let logger = Logger::build(config).unwrap();
    logger.info("to file");
    logger.sync().unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    let parsed: Value = serde_json::from_str(written.trim_end()).unwrap();
    assert_eq!(parsed["Body"], "to file");
    let _ = std::fs::remove_file(&path);
}
