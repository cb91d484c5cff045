//! Word and character counts over the draft.

use serde::Serialize;

use super::model::Document;

/// Counts for a single chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterCount {
    pub title: String,
    pub words: usize,
}

/// Summary of the whole draft.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DraftSummary {
    pub chapters: usize,
    pub total_words: usize,
    pub total_chars: usize,
    pub per_chapter: Vec<ChapterCount>,
}

impl DraftSummary {
    pub fn from_documents(documents: &[Document]) -> Self {
        let per_chapter: Vec<ChapterCount> = documents
            .iter()
            .map(|doc| ChapterCount {
                title: doc.title.clone(),
                words: word_count(&doc.content),
            })
            .collect();

        Self {
            chapters: documents.len(),
            total_words: per_chapter.iter().map(|c| c.words).sum(),
            total_chars: documents.iter().map(|doc| char_count(&doc.content)).sum(),
            per_chapter,
        }
    }
}

/// Whitespace-separated tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let docs = vec![
            Document::new("One", "The cat  sat.\n"),
            Document::new("Two", ""),
            Document::new("Three", "café au lait"),
        ];
        let summary = DraftSummary::from_documents(&docs);
        assert_eq!(summary.chapters, 3);
        assert_eq!(summary.total_words, 6);
        assert_eq!(summary.total_chars, 14 + 12);
        assert_eq!(summary.per_chapter[1].words, 0);
        assert_eq!(summary.per_chapter[2].title, "Three");
    }
}
