//! Integration tests for [`pipeline::TextPipeline`]: prompt assembly, history recording,
//! voice delivery and the text fallback.

mod common;

use common::{message, Harness, MockStt, BotEvent};
use history::{HistoryLine, Profile};
use pipeline::messages::{TEXT_APOLOGY, VOICE_FORBIDDEN_HINT};
use pipeline::{DeliveredAs, TextOutcome};
use prompt::{ChatMessage, MessageRole};
use vbot_core::TextFormat;

/// **Test: A successful synthesis is sent as voice; the turn is recorded; artifacts are removed.**
#[tokio::test]
async fn test_reply_is_delivered_as_voice() {
    let h = Harness::new(MockStt::new(vec![]));
    let outcome = h.text.respond(&message("hi", None), "hi", "en-US").await.unwrap();

    assert!(matches!(outcome, TextOutcome::Replied(d) if d.delivered_as == DeliveredAs::Voice));
    assert_eq!(
        h.tts.calls(),
        vec![("Hello\n World".to_string(), "en".to_string(), "42.wav".to_string())]
    );
    match &h.bot.events()[..] {
        [BotEvent::Voice { path, existed }] => {
            assert!(*existed);
            assert_eq!(path.extension().unwrap(), "ogg");
        }
        other => panic!("unexpected events {:?}", other),
    }
    for wav in h.tts.produced() {
        assert!(!wav.exists());
        assert!(!wav.with_extension("ogg").exists());
    }
    assert_eq!(
        h.history.reconstruct("42").await.unwrap(),
        vec![
            HistoryLine::new("user", "hi"),
            HistoryLine::new("assistant", "Hello. World."),
        ]
    );
}

/// **Test: Voice forbidden by privacy settings: hint, then the unmodified reply as Markdown.**
#[tokio::test]
async fn test_forbidden_voice_falls_back_to_verbatim_text() {
    let h = Harness::new(MockStt::new(vec![]));
    h.bot
        .fail_voice_with("A Telegram's error: VOICE_MESSAGES_FORBIDDEN");

    let outcome = h.text.respond(&message("hi", None), "hi", "en").await.unwrap();

    assert!(matches!(outcome, TextOutcome::Replied(d) if d.delivered_as == DeliveredAs::Text));
    assert_eq!(
        h.bot.replies(),
        vec![
            (VOICE_FORBIDDEN_HINT.to_string(), TextFormat::Plain),
            ("Hello. World.".to_string(), TextFormat::Markdown),
        ]
    );
    assert!(!h.tts.produced()[0].exists());
}

/// **Test: Synthesis failure falls back to text without the privacy hint.**
#[tokio::test]
async fn test_synthesis_failure_falls_back_to_text() {
    let h = Harness::new(MockStt::new(vec![]));
    *h.tts.fail.lock().unwrap() = true;

    let outcome = h.text.respond(&message("hi", None), "hi", "en").await.unwrap();

    assert!(matches!(outcome, TextOutcome::Replied(d) if d.delivered_as == DeliveredAs::Text));
    assert_eq!(
        h.bot.replies(),
        vec![("Hello. World.".to_string(), TextFormat::Markdown)]
    );
}

/// **Test: Model failure sends one apology and records nothing.**
#[tokio::test]
async fn test_model_failure_apologizes_without_recording() {
    let h = Harness::new(MockStt::new(vec![]));
    h.llm.push_failure("rate limited");

    let outcome = h.text.respond(&message("hi", None), "hi", "en").await.unwrap();

    assert_eq!(outcome, TextOutcome::Apologized);
    assert_eq!(h.bot.replies(), vec![(TEXT_APOLOGY.to_string(), TextFormat::Plain)]);
    assert!(h.tts.calls().is_empty());
    assert!(h.history.reconstruct("42").await.unwrap().is_empty());
}

/// **Test: An empty model reply is treated as a failure.**
#[tokio::test]
async fn test_empty_model_reply_apologizes() {
    let h = Harness::new(MockStt::new(vec![]));
    h.llm.push_reply("   ");

    let outcome = h.text.respond(&message("hi", None), "hi", "en").await.unwrap();

    assert_eq!(outcome, TextOutcome::Apologized);
    assert!(h.history.reconstruct("42").await.unwrap().is_empty());
}

/// **Test: Default persona uses the primary language subtag; history precedes the question.**
#[tokio::test]
async fn test_prompt_uses_default_persona_and_history() {
    let h = Harness::new(MockStt::new(vec![]));
    h.history.record_turn("42", "earlier", "answer").await.unwrap();

    h.text
        .respond(&message("now", None), "now", "de-DE")
        .await
        .unwrap();

    let calls = h.llm.calls();
    assert_eq!(
        calls[0],
        vec![
            ChatMessage::system(
                "Your name is Janet. You are a helpful AI assistant. Please respond in de language."
            ),
            ChatMessage::user("earlier"),
            ChatMessage::assistant("answer"),
            ChatMessage::user("now"),
        ]
    );
}

/// **Test: A profile system prompt replaces the persona and its seed lines come first.**
#[tokio::test]
async fn test_prompt_uses_profile_override() {
    let h = Harness::new(MockStt::new(vec![]));
    h.history
        .profiles()
        .save(
            "42",
            &Profile {
                system_prompt: Some("You are Kim.".to_string()),
                chat_history: vec![HistoryLine::new("system", "Be concise.")],
            },
        )
        .await
        .unwrap();

    h.text.respond(&message("q", None), "q", "en").await.unwrap();

    let sent = &h.llm.calls()[0];
    assert_eq!(sent[0], ChatMessage::system("You are Kim."));
    assert_eq!(sent[1].role, MessageRole::System);
    assert_eq!(sent[1].content, "Be concise.");
    assert_eq!(sent.last().unwrap(), &ChatMessage::user("q"));
}
