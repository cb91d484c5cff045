//! Parsing of REPL input lines into commands.

use std::path::PathBuf;
use std::str::FromStr;

use hexakin_core::editing::{EditorType, Purpose, RefinePreset, Style, TargetTone};

/// Command names offered to completion and hints.
pub const COMMAND_NAMES: &[&str] = &[
    "/help",
    "/status",
    "/input",
    "/output",
    "/params",
    "/edit",
    "/select",
    "/collapse",
    "/preset",
    "/instruction",
    "/refine",
    "/critique",
    "/echo",
    "/tone",
    "/chat",
    "/messages",
    "/inject",
    "/history",
    "/restore",
    "/diff",
    "/clear",
    "/chapter",
    "/export",
    "/import",
    "/summary",
    "/save",
];

/// Which parameter a `/params` command sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamChange {
    Purpose(Purpose),
    Style(Style),
    EditorType(EditorType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectTarget {
    /// Tracked selection into the chat log.
    Selection,
    /// Message (1-based) into the input text.
    Message(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterCommand {
    List,
    Add(Option<String>),
    Rename(usize, String),
    Delete(usize),
    Select(usize),
    Show,
    /// Copies the output text into the active chapter.
    Write,
    /// Copies the active chapter into the input text.
    Use,
}

/// A parsed REPL command. Chapter and history indices are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Status,
    Input(Option<String>),
    Output(Option<String>),
    Params(Option<ParamChange>),
    Edit,
    Select(String),
    Collapse,
    Preset(Option<RefinePreset>),
    Instruction(String),
    Refine(Option<String>),
    Critique,
    Echo,
    Tone(Option<TargetTone>),
    Chat(String),
    Messages,
    Inject(InjectTarget),
    History,
    Restore(usize),
    Diff,
    Clear,
    Chapter(ChapterCommand),
    Export {
        chapter: Option<usize>,
        path: Option<PathBuf>,
    },
    Import(PathBuf),
    Summary,
    Save(PathBuf),
}

fn split_first(rest: &str) -> (&str, &str) {
    match rest.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (rest, ""),
    }
}

fn optional(rest: &str) -> Option<String> {
    (!rest.is_empty()).then(|| rest.to_string())
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("Usage: {usage}"))
    } else {
        Ok(rest)
    }
}

fn index(value: &str, usage: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Usage: {usage} (numbers start at 1)")),
    }
}

fn parse_option<T: FromStr>(value: &str, what: &str) -> Result<T, String> {
    T::from_str(value).map_err(|_| format!("Unknown {what}: {value}"))
}

fn parse_params(rest: &str) -> Result<Option<ParamChange>, String> {
    if rest.is_empty() {
        return Ok(None);
    }
    let usage = "/params <purpose|style|editor> <value>";
    let (field, value) = split_first(rest);
    let value = required(value, usage)?;
    let change = match field {
        "purpose" => ParamChange::Purpose(parse_option(value, "purpose")?),
        "style" => ParamChange::Style(parse_option(value, "style")?),
        "editor" => ParamChange::EditorType(parse_option(value, "editor type")?),
        _ => return Err(format!("Usage: {usage}")),
    };
    Ok(Some(change))
}

fn parse_chapter(rest: &str) -> Result<ChapterCommand, String> {
    let (action, args) = split_first(rest);
    Ok(match action {
        "" | "list" => ChapterCommand::List,
        "add" => ChapterCommand::Add(optional(args)),
        "rename" => {
            let usage = "/chapter rename <n> <title>";
            let (n, title) = split_first(args);
            ChapterCommand::Rename(index(n, usage)?, required(title, usage)?.to_string())
        }
        "delete" => ChapterCommand::Delete(index(args, "/chapter delete <n>")?),
        "select" => ChapterCommand::Select(index(args, "/chapter select <n>")?),
        "show" => ChapterCommand::Show,
        "write" => ChapterCommand::Write,
        "use" => ChapterCommand::Use,
        other => return Err(format!("Unknown chapter action: {other}")),
    })
}

fn parse_export(rest: &str) -> Result<Command, String> {
    let (first, tail) = split_first(rest);
    match first.parse::<usize>() {
        Ok(n) if n > 0 => Ok(Command::Export {
            chapter: Some(n),
            path: optional(tail).map(PathBuf::from),
        }),
        _ => Ok(Command::Export {
            chapter: None,
            path: optional(rest).map(PathBuf::from),
        }),
    }
}

impl FromStr for Command {
    type Err = String;

    /// Lines without a leading `/` are chat messages.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line == "quit" || line == "exit" {
            return Ok(Command::Quit);
        }
        let Some(body) = line.strip_prefix('/') else {
            return Ok(Command::Chat(line.to_string()));
        };

        let (name, rest) = split_first(body);
        Ok(match name {
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "status" => Command::Status,
            "input" => Command::Input(optional(rest)),
            "output" => Command::Output(optional(rest)),
            "params" => Command::Params(parse_params(rest)?),
            "edit" => Command::Edit,
            "select" => Command::Select(required(rest, "/select <text>")?.to_string()),
            "collapse" => Command::Collapse,
            "preset" => match rest {
                "" | "none" => Command::Preset(None),
                value => Command::Preset(Some(parse_option(value, "preset")?)),
            },
            "instruction" => Command::Instruction(rest.to_string()),
            "refine" => Command::Refine(optional(rest)),
            "critique" => Command::Critique,
            "echo" => Command::Echo,
            "tone" => match rest {
                "" => Command::Tone(None),
                value => Command::Tone(Some(parse_option(value, "tone")?)),
            },
            "chat" => Command::Chat(required(rest, "/chat <message>")?.to_string()),
            "messages" => Command::Messages,
            "inject" => match rest {
                "" | "selection" => Command::Inject(InjectTarget::Selection),
                n => Command::Inject(InjectTarget::Message(index(n, "/inject <message n>")?)),
            },
            "history" => Command::History,
            "restore" => Command::Restore(index(rest, "/restore <n>")?),
            "diff" => Command::Diff,
            "clear" => Command::Clear,
            "chapter" => Command::Chapter(parse_chapter(rest)?),
            "export" => parse_export(rest)?,
            "import" => Command::Import(PathBuf::from(required(rest, "/import <file>")?)),
            "summary" => Command::Summary,
            "save" => Command::Save(PathBuf::from(required(rest, "/save <file>")?)),
            other => return Err(format!("Unknown command: /{other}")),
        })
    }
}
