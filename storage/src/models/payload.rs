//! Record payload shapes.
//!
//! The store only writes [`RecordPayload::Turn`]. Two older shapes still exist on disk and are read
//! back as-is: a nested `{"content": {"user_message", "assistant_response"}}` object and a single-field
//! `{role: text}` object (also seen as `{"role": r, "content": c}`).

use serde_json::{Map, Value};

use super::turn_record::{TurnRecord, ROLE_ASSISTANT, ROLE_USER};
use crate::error::StorageError;

/// Envelope keys written next to the turn; never part of the conversation itself.
const METADATA_KEYS: [&str; 2] = ["created_at", "seq"];

/// Parsed content of one stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordPayload {
    /// Current shape: `{"user": .., "assistant": ..}`.
    Turn(TurnRecord),
    /// Legacy nested shape.
    Nested {
        user_message: String,
        assistant_response: String,
    },
    /// Legacy single-message shape as `(role, text)` pairs in field order.
    Single(Vec<(String, String)>),
}

impl RecordPayload {
    /// Classifies a JSON document into one of the known shapes.
    pub fn from_value(value: &Value) -> Result<Self, StorageError> {
        let obj = value
            .as_object()
            .ok_or_else(|| StorageError::Malformed("record is not a JSON object".to_string()))?;

        if let (Some(Value::String(user)), Some(Value::String(assistant))) =
            (obj.get(ROLE_USER), obj.get(ROLE_ASSISTANT))
        {
            return Ok(RecordPayload::Turn(TurnRecord::new(user.clone(), assistant.clone())));
        }

        if let Some(Value::Object(content)) = obj.get("content") {
            return Ok(RecordPayload::Nested {
                user_message: string_field(content, "user_message"),
                assistant_response: string_field(content, "assistant_response"),
            });
        }

        if let (Some(Value::String(role)), Some(Value::String(content))) =
            (obj.get("role"), obj.get("content"))
        {
            return Ok(RecordPayload::Single(vec![(role.clone(), content.clone())]));
        }

        let pairs: Vec<(String, String)> = obj
            .iter()
            .filter(|(key, _)| !METADATA_KEYS.contains(&key.as_str()))
            .filter_map(|(key, value)| value.as_str().map(|text| (key.clone(), text.to_string())))
            .collect();
        if pairs.is_empty() {
            return Err(StorageError::Malformed(
                "record has no recognizable message fields".to_string(),
            ));
        }
        Ok(RecordPayload::Single(pairs))
    }

    /// Combined character count used by the eviction budget.
    pub fn char_len(&self) -> usize {
        match self {
            RecordPayload::Turn(turn) => turn.char_len(),
            RecordPayload::Nested {
                user_message,
                assistant_response,
            } => user_message.chars().count() + assistant_response.chars().count(),
            RecordPayload::Single(pairs) => pairs
                .iter()
                .map(|(_, text)| text.chars().count())
                .sum(),
        }
    }

    /// Expands the record into `(role, text)` lines, user first.
    pub fn lines(&self) -> Vec<(String, String)> {
        match self {
            RecordPayload::Turn(turn) => vec![
                (ROLE_USER.to_string(), turn.user_text.clone()),
                (ROLE_ASSISTANT.to_string(), turn.assistant_text.clone()),
            ],
            RecordPayload::Nested {
                user_message,
                assistant_response,
            } => vec![
                (ROLE_USER.to_string(), user_message.clone()),
                (ROLE_ASSISTANT.to_string(), assistant_response.clone()),
            ],
            RecordPayload::Single(pairs) => pairs.clone(),
        }
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
