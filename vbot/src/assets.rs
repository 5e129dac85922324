//! Bundled text assets: candidate languages, `/start` greeting, user allowlist.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Used when the languages file is missing or empty.
pub const DEFAULT_LANGUAGES: &[&str] = &["en-US"];

/// Sent on `/start` when the greeting file cannot be read.
pub const FALLBACK_GREETING: &str =
    "Welcome! I'm Janet, your AI assistant. You can use /mentagram to customize how I behave!";

const MENTAGRAM_HINT: &str = "\n\nUse /mentagram to get your personalization file. You can edit this file and upload it back to customize how I behave and respond to you!";

/// Non-empty trimmed lines of a text file.
fn non_empty_lines(content: &str) -> impl Iterator<Item = &str> {
    content.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// Reads candidate transcription languages, one BCP-47 tag per line.
pub async fn load_languages(path: &Path) -> Vec<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => {
            let languages: Vec<String> = non_empty_lines(&content).map(str::to_string).collect();
            if languages.is_empty() {
                warn!(path = %path.display(), "Languages file is empty, using defaults");
                DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect()
            } else {
                languages
            }
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Languages file unreadable, using defaults");
            DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect()
        }
    }
}

/// Reads the allowlist: one numeric user id per line. Unparsable lines are skipped.
pub fn load_allowlist(path: &Path) -> Result<Vec<i64>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read allowlist {}", path.display()))?;
    Ok(non_empty_lines(&content)
        .filter_map(|line| match line.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!(line = %line, "Skipping invalid user id in allowlist");
                None
            }
        })
        .collect())
}

/// `/start` greeting: text read from disk on every request, so edits apply without a restart.
#[derive(Debug, Clone)]
pub struct Greeting {
    pub text_file: PathBuf,
    pub image: PathBuf,
    pub languages: Vec<String>,
}

impl Greeting {
    pub fn new(text_file: PathBuf, image: PathBuf, languages: Vec<String>) -> Self {
        Self {
            text_file,
            image,
            languages,
        }
    }

    /// Greeting text followed by the supported languages and the personalization hint.
    /// `None` when the greeting file cannot be read.
    pub async fn compose(&self) -> Option<String> {
        let mut text = match tokio::fs::read_to_string(&self.text_file).await {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %self.text_file.display(), error = %e, "Greeting file unreadable");
                return None;
            }
        };
        let listed: Vec<String> = self.languages.iter().map(|l| format!("'{}'", l)).collect();
        text.push_str(&format!("\nSupported languages: [{}]", listed.join(", ")));
        text.push_str(MENTAGRAM_HINT);
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_languages_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("langs.txt");
        std::fs::write(&path, "en-US\n\n  ru-RU  \ncmn-Hans-CN\n").unwrap();
        assert_eq!(load_languages(&path).await, vec!["en-US", "ru-RU", "cmn-Hans-CN"]);
    }

    #[tokio::test]
    async fn test_load_languages_defaults_when_missing_or_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_languages(&dir.path().join("missing.txt")).await, vec!["en-US"]);

        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "\n \n").unwrap();
        assert_eq!(load_languages(&empty).await, vec!["en-US"]);
    }

    #[test]
    fn test_load_allowlist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.txt");
        std::fs::write(&path, "42\nnot-a-number\n 7 \n").unwrap();
        assert_eq!(load_allowlist(&path).unwrap(), vec![42, 7]);
        assert!(load_allowlist(&dir.path().join("missing.txt")).is_err());
    }

    #[tokio::test]
    async fn test_greeting_compose() {
        let dir = tempfile::tempdir().unwrap();
        let text_file = dir.path().join("greeting.txt");
        std::fs::write(&text_file, "Hi, I'm Janet.").unwrap();
        let greeting = Greeting::new(
            text_file,
            dir.path().join("voclone.png"),
            vec!["en-US".to_string(), "ru-RU".to_string()],
        );

        let text = greeting.compose().await.unwrap();
        assert!(text.starts_with("Hi, I'm Janet.\nSupported languages: ['en-US', 'ru-RU']"));
        assert!(text.contains("/mentagram"));

        let missing = Greeting::new(dir.path().join("nope.txt"), PathBuf::new(), vec![]);
        assert!(missing.compose().await.is_none());
    }
}
