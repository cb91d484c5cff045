//! Coloured terminal rendering.

use colored::Colorize;
use hexakin_core::diff::{DiffSegment, DiffTag};
use hexakin_core::document::{Document, DocumentId, DraftSummary};
use hexakin_core::editing::{
    EditorType, Purpose, RefinePreset, Style, TargetTone, option_labels,
};
use hexakin_core::history::VersionEntry;
use hexakin_core::message::{ChatMessage, MessageRole};
use hexakin_core::session::{SessionSnapshot, SubmitOutcome, TransformStatus};
use hexakin_core::transform::TransformMode;

pub fn info(text: &str) {
    println!("{}", text.bright_black());
}

pub fn success(text: &str) {
    println!("{}", text.bright_green());
}

pub fn error(text: &str) {
    eprintln!("{}", text.red());
}

pub fn heading(text: &str) {
    println!("{}", text.bright_magenta().bold());
}

/// Prints a block of text, or a placeholder when it is empty.
pub fn text_block(label: &str, text: &str) {
    heading(label);
    if text.is_empty() {
        info("(empty)");
    } else {
        println!("{text}");
    }
}

pub fn message(index: usize, message: &ChatMessage) {
    match message.role {
        MessageRole::User => {
            println!("{}", format!("[{index}] You").green());
            for line in message.content.lines() {
                println!("{}", line.green());
            }
        }
        MessageRole::Assistant => {
            println!("{}", format!("[{index}] Assistant").bright_magenta());
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
    println!();
}

pub fn outcome(mode: TransformMode, outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Applied => success(&format!("{mode} done.")),
        SubmitOutcome::Failed(failure) => error(&format!("{mode} failed: {failure}")),
        SubmitOutcome::Discarded => info(&format!("{mode} result discarded (session changed).")),
        SubmitOutcome::Busy => info(&format!("{mode} is already running.")),
        SubmitOutcome::Ignored => info("Nothing to send."),
    }
}

pub fn status(snapshot: &SessionSnapshot) {
    let params = &snapshot.parameters;
    heading("Session");
    println!(
        "  Purpose: {}  Style: {}  Editor: {}",
        params.purpose.to_string().cyan(),
        params.style.to_string().cyan(),
        params.editor_type.to_string().cyan()
    );
    println!(
        "  Input: {} chars  Output: {} chars",
        snapshot.input_text.chars().count(),
        snapshot.output_text.chars().count()
    );
    match &snapshot.selection {
        Some(selection) => println!("  Selection: \"{}\"", selection.text.yellow()),
        None => println!("  Selection: {}", "(none)".bright_black()),
    }
    let instruction = if snapshot.custom_instruction.is_empty() {
        snapshot
            .refine_preset
            .map_or_else(|| "(default)".to_string(), |preset| preset.to_string())
    } else {
        snapshot.custom_instruction.clone()
    };
    println!("  Refine instruction: {instruction}");
    if let Some(tone) = snapshot.target_tone {
        println!("  Target tone: {tone}");
    }

    for (mode, status) in &snapshot.statuses {
        let label = match status {
            TransformStatus::Idle => continue,
            TransformStatus::Pending => "pending".yellow(),
            TransformStatus::Succeeded => "ok".green(),
            TransformStatus::Failed(failure) => format!("failed: {failure}").red(),
        };
        println!("  {mode}: {label}");
    }
}

pub fn parameter_options() {
    heading("Options");
    println!("  purpose: {}", option_labels::<Purpose>().join(", "));
    println!("  style:   {}", option_labels::<Style>().join(", "));
    println!("  editor:  {}", option_labels::<EditorType>().join(", "));
    println!("  tone:    {}", option_labels::<TargetTone>().join(", "));
    println!("  preset:  {}", option_labels::<RefinePreset>().join(", "));
}

pub fn history(entries: &[VersionEntry]) {
    if entries.is_empty() {
        info("No versions yet.");
        return;
    }
    heading("Versions (newest first)");
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "  {} {} / {} / {}: {}",
            format!("[{}]", i + 1).cyan(),
            entry.purpose,
            entry.style,
            entry.editor_type,
            preview(&entry.output, 60)
        );
    }
}

pub fn diff(segments: &[DiffSegment]) {
    let line: String = segments
        .iter()
        .map(|segment| match segment.tag {
            DiffTag::Equal => segment.text.normal().to_string(),
            DiffTag::Insert => segment.text.green().underline().to_string(),
            DiffTag::Delete => segment.text.red().strikethrough().to_string(),
        })
        .collect();
    println!("{line}");
}

pub fn chapters(documents: &[Document], active: Option<&DocumentId>) {
    if documents.is_empty() {
        info("No chapters. Use /chapter add.");
        return;
    }
    heading("Chapters");
    for (i, doc) in documents.iter().enumerate() {
        let marker = if Some(&doc.id) == active { "*" } else { " " };
        println!(
            " {marker}{} {} {}",
            format!("[{}]", i + 1).cyan(),
            doc.title,
            format!("({} words)", hexakin_core::document::word_count(&doc.content)).bright_black()
        );
    }
}

pub fn summary(summary: &DraftSummary) {
    heading("Draft summary");
    println!("  Chapters: {}", summary.chapters);
    println!("  Words: {}", summary.total_words);
    println!("  Characters: {}", summary.total_chars);
    for chapter in &summary.per_chapter {
        println!("  - {}: {} words", chapter.title, chapter.words);
    }
}

pub fn help() {
    heading("Commands");
    let lines = [
        ("/input [text]", "show or set the input text"),
        ("/output [text]", "show or set the output text"),
        ("/params [field value]", "show or set purpose / style / editor"),
        ("/edit", "rewrite the input text into the output"),
        ("/select <text>", "select a span of the output"),
        ("/collapse", "collapse the selection (keeps the last one)"),
        ("/preset <name|none>", "pick a refine preset"),
        ("/instruction [text]", "set a custom refine instruction"),
        ("/refine [instruction]", "refine the selection, or the whole output"),
        ("/critique, /echo", "analyse the output / input"),
        ("/tone [target]", "tone analysis of the input"),
        ("/chat <msg> or plain text", "talk to the editorial assistant"),
        ("/messages", "show the message log"),
        ("/inject [n]", "selection into chat, or message n into input"),
        ("/history, /restore <n>", "list or restore versions"),
        ("/diff", "word diff between input and output"),
        ("/clear", "clear the session"),
        ("/chapter [list|add|rename|delete|select|show|write|use]", "manage chapters"),
        ("/export [n] [file]", "export one chapter or the whole draft"),
        ("/import <file>", "import a .txt or .md file as a chapter"),
        ("/summary", "word counts for the draft"),
        ("/save <file>", "write the output text to a file"),
        ("quit", "exit"),
    ];
    for (usage, description) in lines {
        println!("  {:<34} {}", usage.cyan(), description.bright_black());
    }
}

fn preview(text: &str, width: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > width {
        let cut: String = flat.chars().take(width).collect();
        format!("{cut}…")
    } else {
        flat
    }
}
