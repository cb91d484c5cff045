//! HTTP client for a remote transform server.

use async_trait::async_trait;
use hexakin_core::transform::{
    ErrorResponse, TextTransformClient, TransformFailure, TransformRequest, TransformResult,
};
use reqwest::Client;
use serde::Deserialize;

/// Default address of a locally running `hexakin-server`.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Posts requests to `{base_url}/api/transform`.
#[derive(Clone)]
pub struct HttpTransformClient {
    client: Client,
    base_url: String,
}

/// Success body; `result` may be absent.
#[derive(Deserialize)]
struct ResultBody {
    result: Option<String>,
}

impl HttpTransformClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/api/transform", self.base_url)
    }
}

impl Default for HttpTransformClient {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}

#[async_trait]
impl TextTransformClient for HttpTransformClient {
    async fn transform(
        &self,
        request: TransformRequest,
    ) -> Result<TransformResult, TransformFailure> {
        let request = request.validated()?;

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|err| TransformFailure::Unreachable(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TransformFailure::Unreachable(err.to_string()))?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(ErrorResponse {
                    error,
                    kind: Some(kind),
                }) => TransformFailure::from_kind(kind, error),
                Ok(ErrorResponse { error, kind: None }) => TransformFailure::Upstream(error),
                Err(_) => TransformFailure::Upstream(format!("HTTP {}: {}", status.as_u16(), body)),
            });
        }

        let parsed: ResultBody = serde_json::from_str(&body)
            .map_err(|err| TransformFailure::Upstream(format!("Unreadable response: {err}")))?;

        Ok(TransformResult::or_placeholder(parsed.result))
    }
}
