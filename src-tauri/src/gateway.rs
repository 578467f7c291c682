use crate::conversation::{build_context, Message};
use crate::emotion::Emotion;
use crate::logging;
use crate::templates;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const COMPLETION_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT_SECS: u64 = 30;

// Fixed generation parameters for empathetic replies
const MAX_REPLY_TOKENS: u32 = 300;
const REPLY_TEMPERATURE: f32 = 0.7;
const PRESENCE_PENALTY: f32 = 0.1;
const FREQUENCY_PENALTY: f32 = 0.1;

/// Read access to the completion credential. Injected so the gateway can be
/// pointed at the settings store, the host environment, or a test fake.
pub trait KeyStore: Send + Sync {
    fn api_key(&self) -> Option<String>;
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    presence_penalty: f32,
    frequency_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Model,
    Fallback,
}

/// What the gateway hands back to the session. Always displayable; the
/// `connection_issue` flag drives the optional non-blocking notice and is
/// only set when a network attempt actually failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayReply {
    pub text: String,
    pub source: ReplySource,
    pub connection_issue: bool,
}

/// Success-shaped envelope the relay endpoint returns even on internal
/// failure, so callers never have to branch on transport errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayEnvelope {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub struct CompletionGateway {
    client: Client,
    keys: Arc<dyn KeyStore>,
    rng: Mutex<StdRng>,
    api_url: String,
}

/// Full message list for a completion request: emotion-steered system prompt,
/// truncated history window, then the current user message.
fn build_messages(user_text: &str, emotion: Emotion, history: &[Message]) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage {
        role: "system".to_string(),
        content: templates::system_prompt(emotion),
    }];
    messages.extend(build_context(history));
    messages.push(ChatMessage {
        role: "user".to_string(),
        content: user_text.to_string(),
    });
    messages
}

impl CompletionGateway {
    pub fn new(keys: Arc<dyn KeyStore>) -> Self {
        Self::with_rng(keys, StdRng::from_os_rng())
    }

    /// Construct with an explicit RNG so fallback selection is seedable.
    pub fn with_rng(keys: Arc<dyn KeyStore>, rng: StdRng) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            keys,
            rng: Mutex::new(rng),
            api_url: OPENAI_API_URL.to_string(),
        }
    }

    /// Produce a reply for the user's message. Never fails outward: a missing
    /// credential skips the network entirely, and any transport failure,
    /// non-2xx status or empty completion degrades to a canned reply. At most
    /// one outbound call per invocation, no retries.
    pub async fn generate_reply(
        &self,
        user_text: &str,
        emotion: Emotion,
        history: &[Message],
    ) -> GatewayReply {
        let Some(api_key) = self.keys.api_key() else {
            logging::log_gateway("No API key configured, serving local reply");
            return self.local_reply(emotion, false);
        };

        match self
            .request_completion(&api_key, user_text, emotion, history)
            .await
        {
            Ok(text) => GatewayReply {
                text,
                source: ReplySource::Model,
                connection_issue: false,
            },
            Err(e) => {
                logging::log_error(&format!("Completion failed, falling back: {}", e));
                self.local_reply(emotion, true)
            }
        }
    }

    /// Server-side mirror of `generate_reply`: identical prompt construction
    /// and history truncation, but the caller-supplied failure surface is an
    /// `error` flag inside a normal envelope rather than a status code.
    pub async fn relay(
        &self,
        message: &str,
        emotion: Emotion,
        history: &[Message],
    ) -> RelayEnvelope {
        let Some(api_key) = self.keys.api_key() else {
            logging::log_error("Relay credential not configured");
            return RelayEnvelope {
                response: templates::RELAY_FALLBACK.to_string(),
                emotion: None,
                timestamp: None,
                error: true,
                message: Some("API key not configured".to_string()),
            };
        };

        match self
            .request_completion(&api_key, message, emotion, history)
            .await
        {
            Ok(text) => RelayEnvelope {
                response: text,
                emotion: Some(emotion),
                timestamp: Some(Utc::now().to_rfc3339()),
                error: false,
                message: None,
            },
            Err(e) => {
                logging::log_error(&format!("Relay completion failed: {}", e));
                RelayEnvelope {
                    response: templates::RELAY_FALLBACK.to_string(),
                    emotion: None,
                    timestamp: None,
                    error: true,
                    message: Some(e.to_string()),
                }
            }
        }
    }

    async fn request_completion(
        &self,
        api_key: &str,
        user_text: &str,
        emotion: Emotion,
        history: &[Message],
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let request = ChatCompletionRequest {
            model: COMPLETION_MODEL.to_string(),
            messages: build_messages(user_text, emotion, history),
            max_tokens: MAX_REPLY_TOKENS,
            temperature: REPLY_TEMPERATURE,
            presence_penalty: PRESENCE_PENALTY,
            frequency_penalty: FREQUENCY_PENALTY,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(format!("Completion endpoint error ({}): {}", status, error_text).into());
        }

        let completion: ChatCompletionResponse = response.json().await?;

        completion
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| "No reply text in completion response".into())
    }

    /// Validate a candidate API key with a minimal probe request.
    pub async fn validate_api_key(
        &self,
        api_key: &str,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let request = ChatCompletionRequest {
            model: COMPLETION_MODEL.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "Say 'ok'".to_string(),
            }],
            max_tokens: 5,
            temperature: 0.0,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(true)
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 401 {
                return Err("Invalid API key".into());
            } else if status.as_u16() == 429 {
                return Err("Rate limited - too many requests".into());
            }

            Err(format!("API error ({}): {}", status, error_text).into())
        }
    }

    fn local_reply(&self, emotion: Emotion, connection_issue: bool) -> GatewayReply {
        let mut rng = self.rng.lock().unwrap();
        GatewayReply {
            text: templates::local_reply(emotion, &mut *rng).to_string(),
            source: ReplySource::Fallback,
            connection_issue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Sender;

    struct FakeKeys(Option<&'static str>);

    impl KeyStore for FakeKeys {
        fn api_key(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    fn seeded_gateway(keys: FakeKeys) -> CompletionGateway {
        CompletionGateway::with_rng(Arc::new(keys), StdRng::seed_from_u64(1))
    }

    #[test]
    fn test_build_messages_shape() {
        let history: Vec<Message> = (0..10)
            .map(|i| Message::new(Sender::User, format!("m{}", i), None))
            .collect();

        let messages = build_messages("I feel anxious", Emotion::Anxious, &history);

        // System first, 6-message window, user text last
        assert_eq!(messages.len(), 8);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0]
            .content
            .contains(templates::system_guidance(Emotion::Anxious)));
        assert_eq!(messages[1].content, "m4");
        assert_eq!(messages[7].role, "user");
        assert_eq!(messages[7].content, "I feel anxious");
    }

    #[test]
    fn test_build_messages_empty_history() {
        let messages = build_messages("hello", Emotion::Neutral, &[]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
    }

    #[tokio::test]
    async fn test_missing_key_serves_local_reply_without_network() {
        let gateway = seeded_gateway(FakeKeys(None));

        let reply = gateway
            .generate_reply("I feel anxious", Emotion::Anxious, &[])
            .await;

        assert_eq!(reply.source, ReplySource::Fallback);
        assert!(!reply.connection_issue);
        assert!(templates::fallback_replies(Emotion::Anxious).contains(&reply.text.as_str()));
    }

    #[tokio::test]
    async fn test_transport_failure_falls_back() {
        let mut gateway = seeded_gateway(FakeKeys(Some("sk-test")));
        // Nothing listens here; the connection is refused immediately
        gateway.api_url = "http://127.0.0.1:9/v1/chat/completions".to_string();

        let reply = gateway
            .generate_reply("everything is overwhelming", Emotion::Anxious, &[])
            .await;

        assert_eq!(reply.source, ReplySource::Fallback);
        assert!(reply.connection_issue);
        assert!(!reply.text.is_empty());
        assert!(templates::fallback_replies(Emotion::Anxious).contains(&reply.text.as_str()));
    }

    #[tokio::test]
    async fn test_relay_failure_keeps_success_envelope() {
        let mut gateway = seeded_gateway(FakeKeys(Some("sk-test")));
        gateway.api_url = "http://127.0.0.1:9/v1/chat/completions".to_string();

        let envelope = gateway.relay("hi", Emotion::Sad, &[]).await;

        assert!(envelope.error);
        assert_eq!(envelope.response, templates::RELAY_FALLBACK);
        assert!(envelope.message.is_some());
        assert!(envelope.emotion.is_none());
    }

    #[tokio::test]
    async fn test_relay_without_credential() {
        let gateway = seeded_gateway(FakeKeys(None));

        let envelope = gateway.relay("hi", Emotion::Neutral, &[]).await;

        assert!(envelope.error);
        assert_eq!(envelope.response, templates::RELAY_FALLBACK);
    }
}
