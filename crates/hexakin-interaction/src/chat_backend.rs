//! The seam between the transform service and an LLM provider.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while talking to an LLM provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// No credential was found.
    #[error("{0}")]
    NotConfigured(String),

    /// The provider could not be reached (connection refused, timeout, DNS).
    #[error("Provider request failed: {0}")]
    Connection(String),

    /// The provider answered with a non-success status.
    #[error("Provider returned {status}: {message}")]
    Http { status: u16, message: String },

    /// The provider answered with a body that could not be read.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

/// A single-turn chat completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    pub system: Option<String>,
    pub user: String,
    pub temperature: f32,
}

/// An LLM chat-completion provider.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Model identifier, for logs.
    fn model(&self) -> &str;

    /// Runs the completion. `Ok(None)` means the provider answered without content.
    async fn complete(&self, completion: ChatCompletion) -> Result<Option<String>, AgentError>;
}
