//! Word-level diff between two versions of a text.

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

/// How a run of text differs between the two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffTag {
    Equal,
    Insert,
    Delete,
}

/// A contiguous run of text with the same tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSegment {
    pub tag: DiffTag,
    pub text: String,
}

/// Diffs `original` against `edited` word by word.
///
/// Adjacent changes with the same tag are merged, so the segments read as
/// phrases rather than single tokens. Whitespace is kept inside segments.
pub fn word_diff(original: &str, edited: &str) -> Vec<DiffSegment> {
    let diff = TextDiff::from_words(original, edited);
    let mut segments: Vec<DiffSegment> = Vec::new();

    for change in diff.iter_all_changes() {
        let tag = match change.tag() {
            ChangeTag::Equal => DiffTag::Equal,
            ChangeTag::Insert => DiffTag::Insert,
            ChangeTag::Delete => DiffTag::Delete,
        };
        match segments.last_mut() {
            Some(last) if last.tag == tag => last.text.push_str(change.value()),
            _ => segments.push(DiffSegment {
                tag,
                text: change.value().to_string(),
            }),
        }
    }

    segments
}

/// True when the texts are identical.
pub fn is_unchanged(segments: &[DiffSegment]) -> bool {
    segments.iter().all(|segment| segment.tag == DiffTag::Equal)
}
