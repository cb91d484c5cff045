//! The seam between the editing session and the transform service.

use async_trait::async_trait;

use super::failure::TransformFailure;
use super::request::TransformRequest;

/// Placeholder text for a successful response that carried no result.
pub const NO_RESPONSE_PLACEHOLDER: &str = "No response.";

/// Text transformed by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    pub text: String,
}

impl TransformResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Builds a result from an optional response field, substituting the
    /// placeholder when it is absent or blank.
    pub fn or_placeholder(text: Option<String>) -> Self {
        match text {
            Some(text) if !text.trim().is_empty() => Self { text },
            _ => Self::new(NO_RESPONSE_PLACEHOLDER),
        }
    }
}

/// Outbound calls to the rewriting service.
///
/// One attempt per call, no retry, no local state. Implementations validate
/// the request before any network traffic.
#[async_trait]
pub trait TextTransformClient: Send + Sync {
    async fn transform(&self, request: TransformRequest)
    -> Result<TransformResult, TransformFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_for_missing_or_blank() {
        assert_eq!(TransformResult::or_placeholder(None).text, "No response.");
        assert_eq!(
            TransformResult::or_placeholder(Some("  \n".into())).text,
            "No response."
        );
        assert_eq!(TransformResult::or_placeholder(Some("ok".into())).text, "ok");
    }
}
