use crate::emotion::Emotion;
use crate::gateway::ChatMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How many trailing messages are sent as context with a completion request.
/// The relay endpoint truncates with the same constant, so client and server
/// see an identical window.
pub const CONTEXT_WINDOW: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    /// Role name this sender maps to in a completion request.
    pub fn as_role(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Ai => "assistant",
        }
    }
}

/// One entry in the transcript. Immutable once created; insertion order is
/// both the displayed order and the context order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub emotion: Option<Emotion>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>, emotion: Option<Emotion>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            sender,
            emotion,
            timestamp: Utc::now(),
        }
    }
}

/// Trailing window of the transcript in completion-request shape.
/// Order is preserved; emotion, id and timestamp are dropped.
pub fn build_context(history: &[Message]) -> Vec<ChatMessage> {
    let start = history.len().saturating_sub(CONTEXT_WINDOW);
    history[start..]
        .iter()
        .map(|m| ChatMessage {
            role: m.sender.as_role().to_string(),
            content: m.text.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(n: usize) -> Vec<Message> {
        (0..n)
            .map(|i| {
                let sender = if i % 2 == 0 { Sender::User } else { Sender::Ai };
                Message::new(sender, format!("message {}", i), None)
            })
            .collect()
    }

    #[test]
    fn test_build_context_truncates_to_window() {
        let msgs = history(10);
        let context = build_context(&msgs);

        assert_eq!(context.len(), CONTEXT_WINDOW);
        // Exactly the last 6, original order
        assert_eq!(context[0].content, "message 4");
        assert_eq!(context[5].content, "message 9");
    }

    #[test]
    fn test_build_context_short_history_kept_whole() {
        let msgs = history(3);
        let context = build_context(&msgs);

        assert_eq!(context.len(), 3);
        assert_eq!(context[0].role, "user");
        assert_eq!(context[1].role, "assistant");
        assert_eq!(context[2].role, "user");
        assert_eq!(context[2].content, "message 2");
    }

    #[test]
    fn test_build_context_empty_history() {
        assert!(build_context(&[]).is_empty());
    }

    #[test]
    fn test_role_mapping() {
        let msgs = vec![
            Message::new(Sender::Ai, "hello", None),
            Message::new(Sender::User, "hi", Some(Emotion::Happy)),
        ];
        let context = build_context(&msgs);
        assert_eq!(context[0].role, "assistant");
        assert_eq!(context[1].role, "user");
    }
}
