//! Transform modes.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// A named category of transform, selecting the prompt template and the
/// response-handling rule.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TransformMode {
    /// Full rewrite of the input text.
    Edit,
    /// Rewrite of the output text or of a selected span within it.
    Refine,
    /// Constructive critique of the output text.
    Critique,
    /// Repeated phrase / motif detection.
    Echo,
    /// Tone and formality analysis.
    Tone,
    /// Free-form conversation with the editorial assistant.
    Chat,
}

impl TransformMode {
    /// Analysis modes report into the message log and never touch the document.
    pub fn is_analysis(self) -> bool {
        matches!(self, Self::Critique | Self::Echo | Self::Tone)
    }

    /// Modes whose result is written to the output text.
    pub fn writes_output(self) -> bool {
        matches!(self, Self::Edit | Self::Refine)
    }
}
