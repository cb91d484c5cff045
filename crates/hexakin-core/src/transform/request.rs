//! Transform request and response wire types.

use serde::{Deserialize, Serialize};

use super::failure::{FailureKind, TransformFailure};
use super::mode::TransformMode;
use crate::editing::{DEFAULT_REFINE_INSTRUCTION, EditingParameters, TargetTone};

/// A single request to the transform service.
///
/// Built by the editing session for its own submissions, or received as JSON
/// by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformRequest {
    pub mode: TransformMode,
    /// Text the transform applies to. Unused by chat.
    #[serde(default)]
    pub input_text: String,
    /// Span of `input_text` a refinement is scoped to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<EditingParameters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_tone: Option<TargetTone>,
    /// The user's chat message (chat mode only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Editorial insight framing a chat message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl TransformRequest {
    fn bare(mode: TransformMode, input_text: impl Into<String>) -> Self {
        Self {
            mode,
            input_text: input_text.into(),
            selection: None,
            instruction: None,
            parameters: None,
            target_tone: None,
            message: None,
            context: None,
        }
    }

    pub fn edit(input_text: impl Into<String>, parameters: EditingParameters) -> Self {
        Self {
            parameters: Some(parameters),
            ..Self::bare(TransformMode::Edit, input_text)
        }
    }

    /// Refinement of `text`, scoped to `selection` when it is non-blank.
    pub fn refine(
        text: impl Into<String>,
        selection: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        let selection = selection.into();
        Self {
            selection: (!selection.trim().is_empty()).then_some(selection),
            instruction: Some(instruction.into()),
            ..Self::bare(TransformMode::Refine, text)
        }
    }

    pub fn critique(text: impl Into<String>, parameters: Option<EditingParameters>) -> Self {
        Self {
            parameters,
            ..Self::bare(TransformMode::Critique, text)
        }
    }

    pub fn echo(text: impl Into<String>) -> Self {
        Self::bare(TransformMode::Echo, text)
    }

    pub fn tone(text: impl Into<String>, target_tone: Option<TargetTone>) -> Self {
        Self {
            target_tone,
            ..Self::bare(TransformMode::Tone, text)
        }
    }

    pub fn chat(message: impl Into<String>, context: Option<String>) -> Self {
        Self {
            message: Some(message.into()),
            context,
            ..Self::bare(TransformMode::Chat, String::new())
        }
    }

    /// Non-blank selection, if any.
    pub fn scoped_selection(&self) -> Option<&str> {
        self.selection
            .as_deref()
            .filter(|selection| !selection.trim().is_empty())
    }

    /// Instruction to use for a refinement, falling back to the default phrase.
    pub fn effective_instruction(&self) -> &str {
        self.instruction
            .as_deref()
            .map(str::trim)
            .filter(|instruction| !instruction.is_empty())
            .unwrap_or(DEFAULT_REFINE_INSTRUCTION)
    }

    /// Checks the request before anything is sent upstream.
    ///
    /// Returns the request with defaults filled in (the refine instruction).
    pub fn validated(mut self) -> Result<Self, TransformFailure> {
        match self.mode {
            TransformMode::Chat => {
                let has_message = self
                    .message
                    .as_deref()
                    .is_some_and(|message| !message.trim().is_empty());
                if !has_message {
                    return Err(TransformFailure::Validation(
                        "Missing or invalid message.".into(),
                    ));
                }
            }
            _ => {
                if self.input_text.trim().is_empty() {
                    return Err(TransformFailure::Validation(
                        "Missing or invalid input text.".into(),
                    ));
                }
            }
        }

        if self.mode == TransformMode::Refine {
            self.instruction = Some(self.effective_instruction().to_string());
        }

        Ok(self)
    }
}

/// Successful transform response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformResponse {
    pub result: String,
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
}

impl From<&TransformFailure> for ErrorResponse {
    fn from(failure: &TransformFailure) -> Self {
        Self {
            error: failure.detail().to_string(),
            kind: Some(failure.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refine_requires_input_text() {
        let err = TransformRequest::refine("   ", "cat", "x").validated().unwrap_err();
        assert_eq!(err.kind(), FailureKind::Validation);
    }

    #[test]
    fn test_refine_falls_back_to_default_instruction() {
        let request = TransformRequest::refine("The cat sat.", "", "  ")
            .validated()
            .unwrap();
        assert_eq!(request.instruction.as_deref(), Some("Refine the text."));
        assert_eq!(request.scoped_selection(), None);
    }

    #[test]
    fn test_chat_requires_message_not_input() {
        assert!(TransformRequest::chat("Hello?", None).validated().is_ok());
        let err = TransformRequest::chat(" ", None).validated().unwrap_err();
        assert_eq!(err.detail(), "Missing or invalid message.");
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let request = TransformRequest::refine("The cat sat.", "cat", "Make it a dog");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["mode"], "refine");
        assert_eq!(json["inputText"], "The cat sat.");
        assert_eq!(json["selection"], "cat");
        assert!(json.get("parameters").is_none());
    }

    #[test]
    fn test_deserialize_minimal_body() {
        let request: TransformRequest =
            serde_json::from_str(r#"{"mode":"echo","inputText":"again and again"}"#).unwrap();
        assert_eq!(request.mode, TransformMode::Echo);
        assert!(request.selection.is_none());
    }
}
