//! # Prompt
//!
//! Assembles the chat messages sent to the language model.
//!
//! ## Order
//!
//! - **System**: the user's profile prompt, or [`default_persona`] for the reply language
//! - **History**: `(role, text)` lines, oldest first, each mapped to a [`MessageRole`]
//! - **Question**: the current user message, always last
//!
//! ## External interactions
//!
//! - **AI models**: Output is sent to the Chat Completions API by `llm-client`.

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
    /// Assistant message (API `role: "assistant"`).
    Assistant,
}

impl MessageRole {
    /// Maps a stored role name to a model role. Accepts the API names and the `human` / `ai`
    /// aliases found in older profile documents, case-insensitively.
    pub fn parse(role: &str) -> Option<Self> {
        match role.trim().to_ascii_lowercase().as_str() {
            "system" => Some(MessageRole::System),
            "user" | "human" => Some(MessageRole::User),
            "assistant" | "ai" => Some(MessageRole::Assistant),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A single chat message, one-to-one with one element of OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    /// Builds a message from a stored `(role, text)` line. A role the model does not know is
    /// kept as a user message with the role name as a `role: ` prefix so the content survives.
    pub fn from_line(role: &str, text: &str) -> Self {
        match MessageRole::parse(role) {
            Some(role) => Self {
                role,
                content: text.to_string(),
            },
            None => Self::user(format!("{}: {}", role, text)),
        }
    }
}

/// Persona instruction used when the user has no profile prompt.
pub fn default_persona(language: &str) -> String {
    format!(
        "Your name is Janet. You are a helpful AI assistant. Please respond in {} language.",
        language
    )
}

/// Builds the message list: system instruction, history lines in order, then the question.
///
/// # Arguments
///
/// * `system_prompt` - The system instruction (profile prompt or [`default_persona`])
/// * `history` - `(role, text)` pairs, oldest first
/// * `question` - Current user message, pushed last as a User message
pub fn build_messages<I, R, T>(system_prompt: &str, history: I, question: &str) -> Vec<ChatMessage>
where
    I: IntoIterator<Item = (R, T)>,
    R: AsRef<str>,
    T: AsRef<str>,
{
    let mut messages = vec![ChatMessage::system(system_prompt)];
    messages.extend(
        history
            .into_iter()
            .map(|(role, text)| ChatMessage::from_line(role.as_ref(), text.as_ref())),
    );
    messages.push(ChatMessage::user(question));
    messages
}
