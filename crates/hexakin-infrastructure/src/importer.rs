//! Document import from plain-text and markdown files.

use std::path::Path;

use hexakin_core::document::{DocumentId, MultiDocumentStore};
use hexakin_core::{HexakinError, Result};
use pulldown_cmark::{Event, Parser, TagEnd};

/// A file read into a title and plain-text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedDocument {
    pub title: String,
    pub content: String,
}

/// Reads a `.txt` (as-is) or `.md` (rendered to plain text) file.
///
/// The file stem becomes the title. Other extensions are rejected.
pub async fn import_file(path: &Path) -> Result<ImportedDocument> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let title = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| HexakinError::validation(format!("Not a file: {}", path.display())))?;

    let raw = match extension.as_deref() {
        Some("txt") | Some("md") | Some("markdown") => tokio::fs::read_to_string(path).await?,
        _ => {
            return Err(HexakinError::validation(format!(
                "Unsupported file type: {} (expected .txt or .md)",
                path.display()
            )));
        }
    };

    let content = match extension.as_deref() {
        Some("txt") => raw,
        _ => markdown_to_text(&raw),
    };

    tracing::info!(
        "[Importer] Imported {} ({} chars)",
        path.display(),
        content.chars().count()
    );
    Ok(ImportedDocument { title, content })
}

/// Imports a file as a new document, which becomes active.
pub async fn import_into(store: &MultiDocumentStore, path: &Path) -> Result<DocumentId> {
    let imported = import_file(path).await?;
    store
        .add_document(Some(&imported.title), Some(&imported.content))
        .await
}

/// Renders markdown to plain text: block elements become paragraphs,
/// inline markup is dropped.
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak => text.push(' '),
            Event::HardBreak => text.push('\n'),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::CodeBlock) => {
                text.push_str("\n\n")
            }
            Event::End(TagEnd::Item) => text.push('\n'),
            Event::Rule => text.push_str("\n\n"),
            _ => {}
        }
    }

    collapse_blank_lines(text.trim())
}

fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;
    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(c);
            }
        } else {
            newlines = 0;
            out.push(c);
        }
    }
    out
}
