//! Test fixtures and event generators.

use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use session_core::{Event, DEFAULT_INTEGRATION_KEY, SESSION_ID_FIELD};

/// Generate a valid wire event of the given type with a unique message id.
pub fn wire_event(event_type: &str) -> Value {
    let mut event = json!({
        "type": event_type,
        "messageId": Uuid::new_v4().to_string(),
        "anonymousId": Uuid::new_v4().to_string(),
        "timestamp": Utc::now().to_rfc3339(),
        "integrations": {}
    });

    let extra = match event_type {
        "track" => json!({ "event": "Song Played", "properties": { "plays": 1 } }),
        "screen" => json!({ "name": "Home" }),
        "identify" => json!({ "userId": "user-1", "traits": { "plan": "pro" } }),
        "alias" => json!({ "previousId": "anon-1" }),
        "group" => json!({ "groupId": "group-1" }),
        _ => json!({}),
    };
    if let (Some(obj), Value::Object(extra)) = (event.as_object_mut(), extra) {
        obj.extend(extra);
    }
    event
}

/// One event of every kind.
pub fn every_kind() -> Vec<Event> {
    vec![
        Event::identify("user-1"),
        Event::track("Song Played"),
        Event::screen("Home"),
        Event::alias("anon-1"),
        Event::group("group-1"),
    ]
}

/// Settings payload that enables the Amplitude destination.
pub fn amplitude_settings() -> Value {
    json!({ "integrations": { DEFAULT_INTEGRATION_KEY: { "apiKey": "test-key" } } })
}

/// Settings payload without the Amplitude destination.
pub fn other_settings() -> Value {
    json!({ "integrations": { "Segment.io": {} } })
}

/// Session id an event was tagged with, if any.
pub fn tagged_session_id(event: &Event) -> Option<i64> {
    event
        .integration(DEFAULT_INTEGRATION_KEY)
        .and_then(|v| v.get(SESSION_ID_FIELD))
        .and_then(Value::as_i64)
}

/// Join records into NDJSON input.
pub fn ndjson(records: &[Value]) -> String {
    records
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
