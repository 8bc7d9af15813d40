//! Tests for output module

use super::*;
use crate::streams::StreamKind;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_schema_message() {
    let def = StreamKind::SurveyResponses.definition();
    let msg = Message::schema(&def);
    assert!(msg.is_schema());
    assert_eq!(msg.stream(), Some("survey_responses"));

    let value = serde_json::to_value(&msg).unwrap();
    assert_eq!(value["type"], "SCHEMA");
    assert_eq!(value["key_properties"], json!(["id"]));
    assert_eq!(value["bookmark_properties"], json!(["created_at"]));
    assert_eq!(value["schema"]["type"], "object");
}

#[test]
fn test_record_message_carries_key_metadata() {
    let def = StreamKind::SurveyResponses.definition();
    let msg = Message::record(&def, json!({"id": "a"}));
    assert!(msg.is_record());

    let value = serde_json::to_value(&msg).unwrap();
    assert_eq!(value["type"], "RECORD");
    assert_eq!(value["stream"], "survey_responses");
    assert_eq!(value["record"], json!({"id": "a"}));
    assert_eq!(value["key_properties"], json!(["id"]));
    assert_eq!(value["replication_key"], "created_at");
    assert!(value["time_extracted"].is_string());
}

#[test]
fn test_child_record_has_no_replication_key() {
    let def = StreamKind::SurveyResponseProfiles.definition();
    let value = serde_json::to_value(Message::record(&def, json!({"id": "p"}))).unwrap();
    assert!(value.get("replication_key").is_none());

    let schema = serde_json::to_value(Message::schema(&def)).unwrap();
    assert!(schema.get("bookmark_properties").is_none());
}

#[test]
fn test_state_message() {
    let msg = Message::state(json!({"bookmarks": {}}));
    assert!(msg.is_state());
    assert_eq!(msg.stream(), None);
    assert_eq!(
        serde_json::to_value(&msg).unwrap(),
        json!({"type": "STATE", "value": {"bookmarks": {}}})
    );
}

#[test]
fn test_message_deserialize() {
    let msg: Message =
        serde_json::from_str(r#"{"type": "STATE", "value": {"bookmarks": {}}}"#).unwrap();
    assert!(msg.is_state());

    let msg: Message = serde_json::from_str(
        r#"{"type": "RECORD", "stream": "s", "record": {"id": 1}, "key_properties": []}"#,
    )
    .unwrap();
    assert_eq!(msg.stream(), Some("s"));
}

#[test]
fn test_json_lines_sink() {
    let def = StreamKind::SurveyResponses.definition();
    let mut sink = JsonLinesSink::new(Vec::new());
    sink.write(&Message::schema(&def)).unwrap();
    sink.write(&Message::record(&def, json!({"id": "a"}))).unwrap();
    sink.write(&Message::state(json!({}))).unwrap();
    sink.flush().unwrap();

    let output = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);

    let types: Vec<String> = lines
        .iter()
        .map(|l| {
            let v: serde_json::Value = serde_json::from_str(l).unwrap();
            v["type"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(types, vec!["SCHEMA", "RECORD", "STATE"]);
}

#[test]
fn test_memory_sink_queries() {
    let responses = StreamKind::SurveyResponses.definition();
    let profiles = StreamKind::SurveyResponseProfiles.definition();

    let mut sink = MemorySink::new();
    sink.write(&Message::schema(&responses)).unwrap();
    sink.write(&Message::record(&responses, json!({"id": "a"}))).unwrap();
    sink.write(&Message::record(&profiles, json!({"id": "p"}))).unwrap();
    sink.write(&Message::record(&responses, json!({"id": "b"}))).unwrap();
    sink.write(&Message::state(json!({"n": 1}))).unwrap();

    assert_eq!(
        sink.records("survey_responses"),
        vec![&json!({"id": "a"}), &json!({"id": "b"})]
    );
    assert_eq!(sink.records("survey_response_profiles").len(), 1);
    assert_eq!(sink.schema_count("survey_responses"), 1);
    assert_eq!(sink.schema_count("survey_response_profiles"), 0);
    assert_eq!(sink.states(), vec![&json!({"n": 1})]);
}
