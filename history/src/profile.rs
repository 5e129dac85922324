//! Personalization profile: per-user system prompt override and seed history.
//!
//! The user-facing document is JSON: `{"system_prompt": "...", "chat_history": [["role", "text"], ...]}`,
//! both keys optional. It is both the export and the import format. Parsing is lenient: a non-string
//! `system_prompt` or a `chat_history` entry that is not a two-string array is dropped, the rest kept.

use serde_json::{json, Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use storage::{user_scope_dir, PROFILE_FILE_NAME};
use tracing::{info, warn};

use crate::error::HistoryError;
use crate::line::HistoryLine;

/// Built-in template handed out when neither a stored profile nor the template file exist.
pub const DEFAULT_TEMPLATE_JSON: &str = r#"{
  "system_prompt": "Your name is Janet. You are a helpful AI assistant that specializes in answering questions clearly and accurately.",
  "chat_history": [
    ["system", "Remember to be friendly and concise in your responses."],
    ["user", "What can you help me with?"],
    ["assistant", "I can help you with information, answering questions, creative writing, language translation, and more. Just let me know what you need!"]
  ]
}"#;

/// Per-user override of the system prompt plus seed history. Empty by default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub system_prompt: Option<String>,
    pub chat_history: Vec<HistoryLine>,
}

impl Profile {
    pub fn is_empty(&self) -> bool {
        self.system_prompt.is_none() && self.chat_history.is_empty()
    }

    /// Reads a profile from a parsed document. Fails only when the document is not a JSON object.
    pub fn from_document(document: &Value) -> Result<Self, HistoryError> {
        let obj = document.as_object().ok_or_else(|| {
            HistoryError::InvalidProfile("document must be a JSON object".to_string())
        })?;

        let system_prompt = match obj.get("system_prompt") {
            Some(Value::String(prompt)) => Some(prompt.clone()),
            Some(other) => {
                warn!(value = %other, "Dropping non-string system_prompt");
                None
            }
            None => None,
        };

        let mut chat_history = Vec::new();
        if let Some(entries) = obj.get("chat_history") {
            match entries.as_array() {
                Some(entries) => {
                    for entry in entries {
                        match parse_history_entry(entry) {
                            Some(line) => chat_history.push(line),
                            None => warn!(entry = %entry, "Dropping malformed chat_history entry"),
                        }
                    }
                }
                None => warn!("Dropping non-array chat_history"),
            }
        }

        Ok(Self {
            system_prompt,
            chat_history,
        })
    }

    /// Parses a raw document (e.g. an uploaded file).
    pub fn from_json_str(raw: &str) -> Result<Self, HistoryError> {
        let document: Value = serde_json::from_str(raw)?;
        Self::from_document(&document)
    }

    /// Serializes to the user-facing document shape.
    pub fn to_document(&self) -> Value {
        let mut obj = Map::new();
        if let Some(prompt) = &self.system_prompt {
            obj.insert("system_prompt".to_string(), Value::String(prompt.clone()));
        }
        let history: Vec<Value> = self
            .chat_history
            .iter()
            .map(|line| json!([line.role, line.text]))
            .collect();
        obj.insert("chat_history".to_string(), Value::Array(history));
        Value::Object(obj)
    }
}

fn parse_history_entry(entry: &Value) -> Option<HistoryLine> {
    match entry.as_array()?.as_slice() {
        [Value::String(role), Value::String(text)] => Some(HistoryLine::new(role.clone(), text.clone())),
        _ => None,
    }
}

/// Stores one profile document per user next to the user's turn records.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    data_dir: PathBuf,
    template_path: Option<PathBuf>,
}

impl ProfileStore {
    /// `template_path` points at the bundled default document; [`DEFAULT_TEMPLATE_JSON`] is used
    /// when it is unset or unreadable.
    pub fn new(data_dir: impl Into<PathBuf>, template_path: Option<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            template_path,
        }
    }

    fn profile_path(&self, user_id: &str) -> Result<PathBuf, HistoryError> {
        Ok(user_scope_dir(&self.data_dir, user_id)?.join(PROFILE_FILE_NAME))
    }

    /// Replaces any existing profile wholesale.
    pub async fn save(&self, user_id: &str, profile: &Profile) -> Result<(), HistoryError> {
        let path = self.profile_path(user_id)?;
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let body = serde_json::to_vec(&profile.to_document())?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &body).await?;
        tokio::fs::rename(&tmp, &path).await?;
        info!(
            user_id = %user_id,
            has_system_prompt = profile.system_prompt.is_some(),
            seed_lines = profile.chat_history.len(),
            "Profile saved"
        );
        Ok(())
    }

    /// Parses an uploaded document and saves it. Returns the profile as stored.
    pub async fn save_document(&self, user_id: &str, raw: &str) -> Result<Profile, HistoryError> {
        let profile = Profile::from_json_str(raw)?;
        self.save(user_id, &profile).await?;
        Ok(profile)
    }

    /// Loads the user's profile; empty when none is stored or the stored file is unreadable.
    pub async fn load(&self, user_id: &str) -> Result<Profile, HistoryError> {
        let path = self.profile_path(user_id)?;
        match read_document(&path).await? {
            Some(document) => Ok(Profile::from_document(&document).unwrap_or_else(|e| {
                warn!(user_id = %user_id, error = %e, "Stored profile is invalid, using empty profile");
                Profile::default()
            })),
            None => Ok(Profile::default()),
        }
    }

    /// Deletes the stored profile if present. Idempotent.
    pub async fn reset(&self, user_id: &str) -> Result<bool, HistoryError> {
        let path = self.profile_path(user_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(user_id = %user_id, "Profile reset");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// The stored profile document if one exists, otherwise the bundled template.
    pub async fn export_current_or_default(&self, user_id: &str) -> Result<Value, HistoryError> {
        let profile = self.load(user_id).await?;
        if !profile.is_empty() {
            return Ok(profile.to_document());
        }
        if let Some(template) = &self.template_path {
            match read_document(template).await {
                Ok(Some(document)) => return Ok(document),
                Ok(None) => warn!(path = %template.display(), "Profile template not found, using built-in"),
                Err(e) => warn!(path = %template.display(), error = %e, "Profile template unreadable, using built-in"),
            }
        }
        Ok(serde_json::from_str(DEFAULT_TEMPLATE_JSON)?)
    }
}

/// Reads and parses a JSON file; `Ok(None)` when the file does not exist or is not valid JSON.
async fn read_document(path: &Path) -> Result<Option<Value>, HistoryError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_str(&raw) {
        Ok(document) => Ok(Some(document)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring invalid JSON document");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_entries_are_dropped() {
        let document = json!({
            "system_prompt": "Be terse.",
            "chat_history": [
                ["user", "hi"],
                ["assistant"],
                ["user", "a", "b"],
                "not a pair",
                ["assistant", 5],
                ["assistant", "hello"]
            ]
        });
        let profile = Profile::from_document(&document).unwrap();
        assert_eq!(profile.system_prompt.as_deref(), Some("Be terse."));
        assert_eq!(
            profile.chat_history,
            vec![HistoryLine::new("user", "hi"), HistoryLine::new("assistant", "hello")]
        );
    }

    #[test]
    fn test_non_string_prompt_and_non_array_history_are_dropped() {
        let profile =
            Profile::from_document(&json!({"system_prompt": 3, "chat_history": "x"})).unwrap();
        assert!(profile.is_empty());
    }

    #[test]
    fn test_non_object_document_is_rejected() {
        assert!(Profile::from_document(&json!([1, 2])).is_err());
        assert!(Profile::from_json_str("not json").is_err());
    }

    #[test]
    fn test_document_round_trip() {
        let profile = Profile {
            system_prompt: Some("You are Kim.".to_string()),
            chat_history: vec![HistoryLine::new("system", "Be kind.")],
        };
        assert_eq!(Profile::from_document(&profile.to_document()).unwrap(), profile);
    }

    #[test]
    fn test_builtin_template_parses() {
        let profile = Profile::from_json_str(DEFAULT_TEMPLATE_JSON).unwrap();
        assert!(profile.system_prompt.is_some());
        assert_eq!(profile.chat_history.len(), 3);
    }
}
