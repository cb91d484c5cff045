//! Server-side transform handling: validation, prompt rendering and the
//! provider call.

use std::sync::Arc;

use async_trait::async_trait;
use hexakin_core::transform::{
    TextTransformClient, TransformFailure, TransformRequest, TransformResponse, TransformResult,
};

use crate::chat_backend::{AgentError, ChatBackend};
use crate::prompts::{PromptLibrary, fallback_text};

/// Detail reported when no provider credential was found at startup.
pub const UNCONFIGURED_DETAIL: &str =
    "No OpenAI API key found. Set OPENAI_API_KEY or add it to secret.json.";

impl From<AgentError> for TransformFailure {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::NotConfigured(detail) => TransformFailure::Unconfigured(detail),
            AgentError::Connection(detail) => TransformFailure::Unreachable(detail),
            err @ (AgentError::Http { .. } | AgentError::InvalidResponse(_)) => {
                TransformFailure::Upstream(err.to_string())
            }
        }
    }
}

/// Runs transform requests against a chat backend.
///
/// A service without a backend still validates requests, then answers every
/// valid one with [`TransformFailure::Unconfigured`].
pub struct TransformService {
    backend: Option<Arc<dyn ChatBackend>>,
    prompts: PromptLibrary,
}

impl TransformService {
    pub fn new(backend: Option<Arc<dyn ChatBackend>>) -> Result<Self, minijinja::Error> {
        Ok(Self {
            backend,
            prompts: PromptLibrary::new()?,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    pub async fn handle(
        &self,
        request: TransformRequest,
    ) -> Result<TransformResponse, TransformFailure> {
        let request = request.validated()?;

        let Some(backend) = &self.backend else {
            return Err(TransformFailure::Unconfigured(UNCONFIGURED_DETAIL.to_string()));
        };

        let completion = self.prompts.render(&request).map_err(|err| {
            tracing::error!("[TransformService] Failed to render {} prompt: {}", request.mode, err);
            TransformFailure::Upstream(format!("Failed to build prompt: {err}"))
        })?;

        tracing::debug!(
            "[TransformService] {} via {} (temperature {})",
            request.mode,
            backend.model(),
            completion.temperature
        );

        match backend.complete(completion).await {
            Ok(Some(result)) => Ok(TransformResponse { result }),
            Ok(None) => Ok(TransformResponse {
                result: fallback_text(request.mode).to_string(),
            }),
            Err(err) => {
                tracing::warn!("[TransformService] {} failed: {}", request.mode, err);
                Err(err.into())
            }
        }
    }
}

/// In-process [`TextTransformClient`] that skips the HTTP hop.
#[derive(Clone)]
pub struct LocalTransformClient {
    service: Arc<TransformService>,
}

impl LocalTransformClient {
    pub fn new(service: Arc<TransformService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl TextTransformClient for LocalTransformClient {
    async fn transform(
        &self,
        request: TransformRequest,
    ) -> Result<TransformResult, TransformFailure> {
        let response = self.service.handle(request).await?;
        Ok(TransformResult::or_placeholder(Some(response.result)))
    }
}
