//! Editing parameters and the closed option lists offered to the writer.
//!
//! The values are pass-through prompt context: the transform service only
//! sees their display strings.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// What the edit is for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Purpose {
    #[default]
    #[serde(rename = "Line Edit")]
    #[strum(serialize = "Line Edit")]
    LineEdit,
    #[serde(rename = "Paragraph Rewrite")]
    #[strum(serialize = "Paragraph Rewrite")]
    ParagraphRewrite,
    #[serde(rename = "Fiction Improve")]
    #[strum(serialize = "Fiction Improve")]
    FictionImprove,
    #[serde(rename = "Repetition Check")]
    #[strum(serialize = "Repetition Check")]
    RepetitionCheck,
}

/// Stylistic register the edit should aim for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Style {
    #[default]
    Default,
    Fantasy,
    Formal,
    Playful,
    #[serde(rename = "Science Fiction")]
    #[strum(serialize = "Science Fiction")]
    ScienceFiction,
    #[serde(rename = "Dark Thriller")]
    #[strum(serialize = "Dark Thriller")]
    DarkThriller,
}

/// The kind of editor persona to emulate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum EditorType {
    #[default]
    #[serde(rename = "Novel Editor")]
    #[strum(serialize = "Novel Editor")]
    Novel,
    #[serde(rename = "Email Editor")]
    #[strum(serialize = "Email Editor")]
    Email,
    #[serde(rename = "Report Editor")]
    #[strum(serialize = "Report Editor")]
    Report,
    #[serde(rename = "Education/Local Council Editor")]
    #[strum(serialize = "Education/Local Council Editor")]
    EducationCouncil,
}

/// Tone a tone analysis may suggest shifting towards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum TargetTone {
    Hopeful,
    Desperate,
    Detached,
    Warm,
    Clinical,
    Ironic,
    Introspective,
    Playful,
    Paranoid,
    Authoritative,
    Neutral,
}

/// Canned refinement instructions; anything else is a custom instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum RefinePreset {
    #[strum(serialize = "Make it more vivid")]
    MoreVivid,
    #[strum(serialize = "Soften the tone")]
    SoftenTone,
    #[strum(serialize = "Add emotional depth")]
    EmotionalDepth,
    #[strum(serialize = "Tighten the pacing")]
    TightenPacing,
    #[strum(serialize = "Make it humorous")]
    Humorous,
}

/// Instruction used when the writer picked no preset and typed nothing.
pub const DEFAULT_REFINE_INSTRUCTION: &str = "Refine the text.";

/// Resolves the refinement instruction from an optional preset and custom text.
///
/// Custom text wins when non-blank, then the preset, then the default phrase.
pub fn refine_instruction(preset: Option<RefinePreset>, custom: Option<&str>) -> String {
    match (custom.map(str::trim).filter(|c| !c.is_empty()), preset) {
        (Some(custom), _) => custom.to_string(),
        (None, Some(preset)) => preset.to_string(),
        (None, None) => DEFAULT_REFINE_INSTRUCTION.to_string(),
    }
}

/// Display strings of every variant, in declaration order.
pub fn option_labels<E: IntoEnumIterator + ToString>() -> Vec<String> {
    E::iter().map(|variant| variant.to_string()).collect()
}

/// Prompt context forwarded with edit requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditingParameters {
    pub purpose: Purpose,
    pub style: Style,
    pub editor_type: EditorType,
}

impl EditingParameters {
    pub fn new(purpose: Purpose, style: Style, editor_type: EditorType) -> Self {
        Self {
            purpose,
            style,
            editor_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_defaults_match_editor_defaults() {
        let params = EditingParameters::default();
        assert_eq!(params.purpose.to_string(), "Line Edit");
        assert_eq!(params.style.to_string(), "Default");
        assert_eq!(params.editor_type.to_string(), "Novel Editor");
    }

    #[test]
    fn test_parse_display_strings() {
        assert_eq!(Style::from_str("science fiction").unwrap(), Style::ScienceFiction);
        assert_eq!(
            EditorType::from_str("Education/Local Council Editor").unwrap(),
            EditorType::EducationCouncil
        );
        assert!(Purpose::from_str("Summarize").is_err());
    }

    #[test]
    fn test_serde_uses_display_strings() {
        let params = EditingParameters::new(Purpose::FictionImprove, Style::DarkThriller, EditorType::Email);
        let json = serde_json::to_value(params).unwrap();
        assert_eq!(json["purpose"], "Fiction Improve");
        assert_eq!(json["style"], "Dark Thriller");
        assert_eq!(json["editorType"], "Email Editor");

        let back: EditingParameters = serde_json::from_value(json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_refine_instruction_resolution() {
        assert_eq!(refine_instruction(None, None), "Refine the text.");
        assert_eq!(refine_instruction(None, Some("   ")), "Refine the text.");
        assert_eq!(
            refine_instruction(Some(RefinePreset::TightenPacing), None),
            "Tighten the pacing"
        );
        assert_eq!(
            refine_instruction(Some(RefinePreset::Humorous), Some("Use shorter words")),
            "Use shorter words"
        );
    }

    #[test]
    fn test_option_labels() {
        let tones = option_labels::<TargetTone>();
        assert_eq!(tones.len(), 11);
        assert_eq!(tones.first().map(String::as_str), Some("Hopeful"));
    }
}
