// src/respond/mod.rs
// Suggested-reply coordinator: one optional generative attempt, then a
// canned reply. Never fails, and shares no state with classification.

use std::sync::Arc;

use rand::seq::IndexedRandom;
use tracing::{info, warn};

use crate::classify::Label;
use crate::config::Config;

pub mod openai;

pub use openai::{GenerativeBackend, OpenAiBackend};

const SYSTEM_PROMPT: &str =
    "You are an assistant that responds to emails clearly and courteously.";
const REPLY_TEMPERATURE: f32 = 0.5;
const REPLY_MAX_TOKENS: u32 = 200;

/// Returned when the caller passes a label outside the closed set. That is
/// an upstream logic error, not user input, so it gets a sentinel rather
/// than an error.
pub const UNKNOWN_LABEL_REPLY: &str =
    "We could not generate an automatic reply for this email.";

const PRODUCTIVE_REPLIES: &[&str] = &[
    "Hello, thanks for reaching out! We are reviewing your request and will get back to you shortly.",
    "We received your email and are already working on your request. We will follow up with updates.",
];

const UNPRODUCTIVE_REPLIES: &[&str] = &[
    "Thank you for your email! Have a great day!",
    "We appreciate your message. We are here whenever you need us.",
];

/// Canned replies for a label. Non-empty and immutable at runtime.
pub fn candidate_replies(label: Label) -> &'static [&'static str] {
    match label {
        Label::Productive => PRODUCTIVE_REPLIES,
        Label::Unproductive => UNPRODUCTIVE_REPLIES,
    }
}

pub struct Responder {
    generative: Option<Arc<dyn GenerativeBackend>>,
}

impl Responder {
    pub fn new(generative: Option<Arc<dyn GenerativeBackend>>) -> Self {
        Self { generative }
    }

    /// The generative path is only wired up when an API key is configured.
    pub fn from_config(config: &Config) -> Self {
        let generative = match OpenAiBackend::new(config) {
            Ok(backend) => {
                info!(backend = backend.name(), "generative replies enabled");
                Some(Arc::new(backend) as Arc<dyn GenerativeBackend>)
            }
            Err(e) => {
                info!("generative replies disabled, using canned replies: {e}");
                None
            }
        };
        Self::new(generative)
    }

    /// Suggest a reply for a classified email. Never fails.
    ///
    /// The generative backend gets a single attempt, and only when it is
    /// configured, `use_generative` is set, and the original text is
    /// non-empty. Everything else lands on a canned reply.
    pub async fn suggest(&self, label: &str, original_text: &str, use_generative: bool) -> String {
        let Some(label) = Label::parse(label) else {
            return UNKNOWN_LABEL_REPLY.to_string();
        };

        let text = original_text.trim();
        if use_generative && !text.is_empty() {
            if let Some(backend) = &self.generative {
                match backend
                    .complete(SYSTEM_PROMPT, text, REPLY_TEMPERATURE, REPLY_MAX_TOKENS)
                    .await
                {
                    Ok(reply) if !reply.is_empty() => return reply,
                    Ok(_) => {
                        warn!(
                            backend = backend.name(),
                            "empty completion, using canned reply"
                        );
                    }
                    Err(e) => {
                        warn!(
                            backend = backend.name(),
                            "reply generation failed, using canned reply: {e:#}"
                        );
                    }
                }
            }
        }

        self.canned_reply(label)
    }

    fn canned_reply(&self, label: Label) -> String {
        let replies = candidate_replies(label);
        replies
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(UNKNOWN_LABEL_REPLY)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingBackend {
        calls: AtomicUsize,
        reply: Result<String, String>,
    }

    impl CountingBackend {
        fn ok(reply: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                reply: Ok(reply.to_string()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                reply: Err(message.to_string()),
            }
        }
    }

    #[async_trait]
    impl GenerativeBackend for CountingBackend {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn complete(&self, _: &str, _: &str, _: f32, _: u32) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(message) => Err(anyhow!("{message}")),
            }
        }
    }

    fn responder_with(backend: Arc<CountingBackend>) -> Responder {
        Responder::new(Some(backend as Arc<dyn GenerativeBackend>))
    }

    #[tokio::test]
    async fn unknown_label_returns_sentinel() {
        let responder = Responder::new(None);
        assert_eq!(responder.suggest("Unknown", "x", false).await, UNKNOWN_LABEL_REPLY);
        assert_eq!(responder.suggest("", "x", true).await, UNKNOWN_LABEL_REPLY);
    }

    #[tokio::test]
    async fn canned_reply_comes_from_label_table() {
        let responder = Responder::new(None);
        for _ in 0..10 {
            let reply = responder.suggest("Productive", "need help", false).await;
            assert!(PRODUCTIVE_REPLIES.contains(&reply.as_str()));

            let reply = responder.suggest("Unproductive", "thanks", false).await;
            assert!(UNPRODUCTIVE_REPLIES.contains(&reply.as_str()));
        }
    }

    #[tokio::test]
    async fn empty_text_skips_generative_path() {
        let backend = Arc::new(CountingBackend::ok("generated"));
        let responder = responder_with(backend.clone());

        let reply = responder.suggest("Productive", "", true).await;

        assert!(PRODUCTIVE_REPLIES.contains(&reply.as_str()));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn use_generative_false_skips_generative_path() {
        let backend = Arc::new(CountingBackend::ok("generated"));
        let responder = responder_with(backend.clone());

        let reply = responder.suggest("Unproductive", "thanks a lot", false).await;

        assert!(UNPRODUCTIVE_REPLIES.contains(&reply.as_str()));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn generative_success_is_returned_verbatim() {
        let backend = Arc::new(CountingBackend::ok("Sure, here is an update."));
        let responder = responder_with(backend.clone());

        let reply = responder
            .suggest("Productive", "any update on my ticket?", true)
            .await;

        assert_eq!(reply, "Sure, here is an update.");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn generation_failure_falls_back_to_canned_after_one_attempt() {
        let backend = Arc::new(CountingBackend::failing("quota exceeded"));
        let responder = responder_with(backend.clone());

        let reply = responder
            .suggest("Productive", "please check my invoice", true)
            .await;

        assert!(PRODUCTIVE_REPLIES.contains(&reply.as_str()));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reply_tables_are_non_empty() {
        for label in Label::ALL {
            assert!(!candidate_replies(label).is_empty());
        }
    }
}
