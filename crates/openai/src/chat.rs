//! Minimal OpenAI chat-completions client.
//!
//! Only the single call the enhancement endpoint needs: a system message and
//! a user message in, the first choice's text out.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Public OpenAI API base URL.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";
/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Request parameters shared by every completion.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatConfig {
    /// Config with the default endpoint and generation parameters.
    pub fn new(api_key: String) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            temperature: 1.0,
            max_tokens: 200,
        }
    }
}

/// Errors from the chat-completions call.
#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the `error.message` field when present.
    #[error("OpenAI API error ({status}): {body}")]
    ApiError {
        status: u16,
        body: String,
        message: Option<String>,
    },

    /// 2xx response without any choice text.
    #[error("OpenAI response contained no completion text")]
    EmptyCompletion,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for `POST /chat/completions`.
#[derive(Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    config: ChatConfig,
}

impl ChatClient {
    pub fn new(mut config: ChatConfig) -> Self {
        config.api_url = config.api_url.trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send one system + user exchange and return the trimmed reply.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, OpenAiError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let message = serde_json::from_str::<Value>(&body).ok().and_then(|v| {
                v.pointer("/error/message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });
            tracing::warn!(status = status.as_u16(), model = %self.config.model, "Chat completion rejected");
            return Err(OpenAiError::ApiError {
                status: status.as_u16(),
                body,
                message,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(OpenAiError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> ChatClient {
        ChatClient::new(ChatConfig {
            api_url: server.uri(),
            ..ChatConfig::new("sk-test".to_string())
        })
    }

    #[tokio::test]
    async fn complete_sends_both_messages_and_returns_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "max_tokens": 200,
                "messages": [
                    { "role": "system", "content": "be vivid" },
                    { "role": "user", "content": "a cat" },
                ],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "  a luminous cat  " } }],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server)
            .complete("be vivid", "a cat")
            .await
            .unwrap();
        assert_eq!(text, "a luminous cat");
    }

    #[tokio::test]
    async fn error_body_message_is_extracted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "message": "Incorrect API key provided" },
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).complete("s", "u").await.unwrap_err();
        assert_matches!(
            err,
            OpenAiError::ApiError { status: 401, message: Some(ref m), .. } if m == "Incorrect API key provided"
        );
    }

    #[tokio::test]
    async fn missing_choices_is_empty_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let err = client_for(&server).complete("s", "u").await.unwrap_err();
        assert_matches!(err, OpenAiError::EmptyCompletion);
    }
}
