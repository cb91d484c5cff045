//! OpenAIApiAgent - Direct REST API implementation for OpenAI chat completions.
//!
//! Configuration priority: ~/.config/hexakin/secret.json > environment variables

use std::env;

use async_trait::async_trait;
use hexakin_core::config::ModelConfig;
use hexakin_infrastructure::storage::SecretStorage;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::chat_backend::{AgentError, ChatBackend, ChatCompletion};

/// Agent implementation that talks to an OpenAI-compatible HTTP API.
#[derive(Clone)]
pub struct OpenAIApiAgent {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: Option<u32>,
}

impl OpenAIApiAgent {
    /// Creates a new agent with the provided API key and model settings.
    pub fn new(api_key: impl Into<String>, config: &ModelConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: config.name.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_tokens: config.max_tokens,
        }
    }

    /// Loads the credential from `secret.json` or environment variables.
    ///
    /// Priority:
    /// 1. `secret.json` (`openai.api_key`, `openai.model_name`)
    /// 2. Environment variables (`OPENAI_API_KEY`, `OPENAI_MODEL_NAME`)
    ///
    /// The model name falls back to `config.name`.
    pub fn try_from_sources(
        secrets: &SecretStorage,
        config: &ModelConfig,
    ) -> Result<Self, AgentError> {
        if let Some(openai) = secrets.load_optional().and_then(|secret| secret.openai) {
            let agent = Self::new(openai.api_key, config);
            return Ok(match openai.model_name {
                Some(model) => agent.with_model(model),
                None => agent,
            });
        }

        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            AgentError::NotConfigured(format!(
                "OPENAI_API_KEY not found in {} or environment variables",
                secrets.path().display()
            ))
        })?;

        let agent = Self::new(api_key, config);
        Ok(match env::var("OPENAI_MODEL_NAME") {
            Ok(model) => agent.with_model(model),
            Err(_) => agent,
        })
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Points the agent at another OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_messages(completion: ChatCompletion) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = completion.system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: completion.user,
        });
        messages
    }

    async fn send_request(
        &self,
        body: &ChatCompletionRequest,
    ) -> Result<Option<String>, AgentError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| AgentError::Connection(format!("OpenAI API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            AgentError::InvalidResponse(format!("Failed to parse OpenAI response: {err}"))
        })?;

        Ok(extract_text_response(parsed))
    }
}

#[async_trait]
impl ChatBackend for OpenAIApiAgent {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, completion: ChatCompletion) -> Result<Option<String>, AgentError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            temperature: completion.temperature,
            max_tokens: self.max_tokens,
            messages: Self::build_messages(completion),
        };

        self.send_request(&request).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// First choice's content, trimmed; `None` when absent or blank.
fn extract_text_response(response: ChatCompletionResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}

fn map_http_error(status: StatusCode, body: String) -> AgentError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    AgentError::Http {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode as AxumStatus, routing::post};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    fn agent(base_url: &str) -> OpenAIApiAgent {
        OpenAIApiAgent::new("sk-test", &ModelConfig::default()).with_base_url(base_url)
    }

    fn completion() -> ChatCompletion {
        ChatCompletion {
            system: Some("You are an editor.".into()),
            user: "Fix this.".into(),
            temperature: 0.4,
        }
    }

    #[tokio::test]
    async fn test_complete_sends_messages_and_reads_content() {
        let seen: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
        let captured = seen.clone();
        let router = Router::new().route(
            "/v1/chat/completions",
            post(move |Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    *captured.lock().unwrap() = Some(body);
                    Json(json!({"choices": [{"message": {"content": "  Fixed.  "}}]}))
                }
            }),
        );
        let base = serve(router).await;

        let text = agent(&base).complete(completion()).await.unwrap();

        assert_eq!(text.as_deref(), Some("Fixed."));
        let body = seen.lock().unwrap().clone().unwrap();
        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Fix this.");
        assert!(body.get("max_tokens").is_none());
    }

    #[tokio::test]
    async fn test_missing_content_is_none() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({"choices": [{"message": {"content": null}}]})) }),
        );
        let base = serve(router).await;
        assert_eq!(agent(&base).complete(completion()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_http_error_message_is_extracted() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                (
                    AxumStatus::TOO_MANY_REQUESTS,
                    Json(json!({"error": {"message": "Rate limit reached", "type": "requests"}})),
                )
            }),
        );
        let base = serve(router).await;

        let err = agent(&base).complete(completion()).await.unwrap_err();
        assert_eq!(
            err,
            AgentError::Http {
                status: 429,
                message: "Rate limit reached".into()
            }
        );
    }

    #[tokio::test]
    async fn test_unreachable_provider() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = agent(&format!("http://{addr}/v1"))
            .complete(completion())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Connection(_)));
    }

    #[test]
    fn test_secret_file_wins_over_environment() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, r#"{"openai":{"api_key":"from-file","model_name":"gpt-4o"}}"#).unwrap();

        let agent = OpenAIApiAgent::try_from_sources(
            &SecretStorage::with_path(path),
            &ModelConfig::default(),
        )
        .unwrap();
        assert_eq!(agent.api_key, "from-file");
        assert_eq!(agent.model(), "gpt-4o");
    }
}
