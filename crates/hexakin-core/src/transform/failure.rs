//! Transform failure taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a transform did not produce text.
///
/// A success response without a result field is not a failure: clients turn
/// it into [`NO_RESPONSE_PLACEHOLDER`](super::NO_RESPONSE_PLACEHOLDER).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "lowercase")]
pub enum TransformFailure {
    /// A required field was missing; nothing was sent upstream.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The upstream credential is missing.
    #[error("Transform service is not configured: {0}")]
    Unconfigured(String),

    /// The transform service could not be reached.
    #[error("Transform service unreachable: {0}")]
    Unreachable(String),

    /// The transform service answered with an error or an unreadable body.
    #[error("Transform service error: {0}")]
    Upstream(String),
}

/// Wire discriminant of [`TransformFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Validation,
    Unconfigured,
    Unreachable,
    Upstream,
}

impl TransformFailure {
    /// Rebuilds a failure from its wire parts.
    pub fn from_kind(kind: FailureKind, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        match kind {
            FailureKind::Validation => Self::Validation(detail),
            FailureKind::Unconfigured => Self::Unconfigured(detail),
            FailureKind::Unreachable => Self::Unreachable(detail),
            FailureKind::Upstream => Self::Upstream(detail),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Validation(_) => FailureKind::Validation,
            Self::Unconfigured(_) => FailureKind::Unconfigured,
            Self::Unreachable(_) => FailureKind::Unreachable,
            Self::Upstream(_) => FailureKind::Upstream,
        }
    }

    /// The message without the kind prefix.
    pub fn detail(&self) -> &str {
        match self {
            Self::Validation(detail)
            | Self::Unconfigured(detail)
            | Self::Unreachable(detail)
            | Self::Upstream(detail) => detail,
        }
    }

    /// HTTP status the server answers with for this failure.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unconfigured(_) | Self::Unreachable(_) | Self::Upstream(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_kind() {
        let failure = TransformFailure::Unconfigured("OPENAI_API_KEY not set".into());
        let rebuilt = TransformFailure::from_kind(failure.kind(), failure.detail());
        assert_eq!(rebuilt, failure);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(TransformFailure::Validation("x".into()).http_status(), 400);
        assert_eq!(TransformFailure::Upstream("x".into()).http_status(), 500);
        assert_eq!(TransformFailure::Unconfigured("x".into()).http_status(), 500);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&FailureKind::Unreachable).unwrap();
        assert_eq!(json, "\"unreachable\"");
    }
}
