//! How transform results land in the session.

use crate::editing::TargetTone;
use crate::transform::TransformMode;

/// Chat message appended when the assistant could not answer.
pub const CHAT_FAILURE_MESSAGE: &str = "Error: failed to respond.";

/// How a refinement was applied to the output text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refinement {
    /// The first occurrence of the selection was replaced.
    Spliced,
    /// The whole output text was replaced.
    Replaced,
}

/// Applies a refinement result to `output`.
///
/// With a non-empty selection that still occurs verbatim in `output`, only
/// its first occurrence is replaced. Otherwise (no selection, or a stale one)
/// the whole text is replaced so a stale span never hits the wrong place.
pub fn apply_refinement(
    output: &str,
    selection: Option<&str>,
    replacement: &str,
) -> (String, Refinement) {
    match selection.filter(|s| !s.is_empty()) {
        Some(selection) if output.contains(selection) => (
            output.replacen(selection, replacement, 1),
            Refinement::Spliced,
        ),
        _ => (replacement.to_string(), Refinement::Replaced),
    }
}

/// Label prefixed to an analysis result in the message log.
pub fn analysis_label(mode: TransformMode, target_tone: Option<TargetTone>) -> Option<String> {
    match mode {
        TransformMode::Critique => Some("💡 Critique Result:".to_string()),
        TransformMode::Echo => Some("📊 Echo Analysis Result:".to_string()),
        TransformMode::Tone => Some(match target_tone {
            Some(tone) => format!("🎯 Tone Analysis (Target: {tone}):"),
            None => "🎯 Tone / Formality Analysis:".to_string(),
        }),
        _ => None,
    }
}

/// Analysis result as it appears in the message log.
pub fn format_analysis(mode: TransformMode, target_tone: Option<TargetTone>, text: &str) -> String {
    match analysis_label(mode, target_tone) {
        Some(label) => format!("{label}\n\n{text}"),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splices_first_occurrence() {
        let (out, how) = apply_refinement("The cat sat on the mat.", Some("cat"), "dog");
        assert_eq!(out, "The dog sat on the mat.");
        assert_eq!(how, Refinement::Spliced);

        let (out, _) = apply_refinement("cat and cat", Some("cat"), "dog");
        assert_eq!(out, "dog and cat");
    }

    #[test]
    fn test_stale_selection_replaces_everything() {
        let (out, how) = apply_refinement("The bird flew.", Some("cat"), "A dog ran.");
        assert_eq!(out, "A dog ran.");
        assert_eq!(how, Refinement::Replaced);
    }

    #[test]
    fn test_no_selection_replaces_everything() {
        let (out, how) = apply_refinement("Old text.", None, "New text.");
        assert_eq!(out, "New text.");
        assert_eq!(how, Refinement::Replaced);
        assert_eq!(apply_refinement("Old.", Some(""), "New.").1, Refinement::Replaced);
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            format_analysis(TransformMode::Critique, None, "Weak ending."),
            "💡 Critique Result:\n\nWeak ending."
        );
        assert_eq!(
            analysis_label(TransformMode::Tone, Some(TargetTone::Warm)).unwrap(),
            "🎯 Tone Analysis (Target: Warm):"
        );
        assert_eq!(
            analysis_label(TransformMode::Tone, None).unwrap(),
            "🎯 Tone / Formality Analysis:"
        );
        assert!(analysis_label(TransformMode::Edit, None).is_none());
    }
}
