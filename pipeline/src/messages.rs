//! User-facing reply texts.

pub const TEXT_APOLOGY: &str = "Sorry, there was an error processing your message.";
pub const VOICE_APOLOGY: &str = "Sorry, there was an error processing the voice message.";
pub const FILE_ACCESS_APOLOGY: &str = "Sorry, there was an error accessing the voice message file.";
pub const DURATION_TOO_SHORT: &str = "Voice message received, but duration is too short < 1 sec.";
pub const DURATION_TOO_LONG: &str = "Voice message received, but duration is too long: > 60 sec.";
pub const VOICE_FORBIDDEN_HINT: &str = "Sorry, I can't send voice messages. Please enable voice messages for everyone in your Telegram privacy settings (Settings -> Privacy and Security -> Voice Messages).";
pub const REFERENCE_SAVED: &str = "Reference voice saved. Replies will now be spoken in this voice.";
pub const REFERENCE_APOLOGY: &str = "Sorry, there was an error processing the reference voice.";
