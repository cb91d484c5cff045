//! Command execution against the editing session and the document store.

use std::path::Path;

use anyhow::Result;
use hexakin_core::diff::{is_unchanged, word_diff};
use hexakin_core::document::{DocumentId, MultiDocumentStore};
use hexakin_core::message::ChatMessage;
use hexakin_core::session::EditingSession;
use hexakin_core::transform::TransformMode;
use hexakin_infrastructure::importer;
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::command::{ChapterCommand, Command, InjectTarget, ParamChange};
use crate::render;

/// Whether the loop should keep reading lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Repl {
    session: EditingSession,
    documents: MultiDocumentStore,
    incoming: broadcast::Receiver<ChatMessage>,
    /// Messages already printed; used to number new ones.
    shown: usize,
}

impl Repl {
    pub async fn new(session: EditingSession, documents: MultiDocumentStore) -> Self {
        let incoming = session.messages().subscribe();
        let shown = session.messages().len().await;
        Self {
            session,
            documents,
            incoming,
            shown,
        }
    }

    pub async fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => {
                render::help();
                render::parameter_options();
            }
            Command::Status => render::status(&self.session.snapshot().await),
            Command::Input(None) => render::text_block("Input", &self.session.input_text().await),
            Command::Input(Some(text)) => {
                self.session.set_input_text(text).await;
                render::success("Input set.");
            }
            Command::Output(None) => {
                render::text_block("Output", &self.session.output_text().await)
            }
            Command::Output(Some(text)) => {
                self.session.set_output_text(text).await;
                render::success("Output set.");
            }
            Command::Params(None) => {
                let params = self.session.parameters().await;
                render::info(&format!(
                    "Purpose: {} | Style: {} | Editor: {}",
                    params.purpose, params.style, params.editor_type
                ));
            }
            Command::Params(Some(change)) => {
                let mut params = self.session.parameters().await;
                match change {
                    ParamChange::Purpose(purpose) => params.purpose = purpose,
                    ParamChange::Style(style) => params.style = style,
                    ParamChange::EditorType(editor_type) => params.editor_type = editor_type,
                }
                self.session.set_parameters(params).await;
                render::success("Parameters updated.");
            }
            Command::Edit => {
                let params = self.session.parameters().await;
                self.submit(TransformMode::Edit, self.session.submit_edit(params)).await;
                if self.session.last_failure(TransformMode::Edit).await.is_none() {
                    render::text_block("Output", &self.session.output_text().await);
                }
            }
            Command::Select(text) => {
                let output = self.session.output_text().await;
                if !output.contains(text.trim()) {
                    render::info("Note: the selection does not occur in the output text.");
                }
                let source = self.documents.active_id().await;
                if self.session.observe_selection(&text, source).await {
                    render::success(&format!("Selected \"{}\".", text.trim()));
                }
            }
            Command::Collapse => {
                self.session.observe_selection("", None).await;
                let kept = self.session.current_selection().await;
                if kept.is_empty() {
                    render::info("No selection.");
                } else {
                    render::info(&format!("Selection kept: \"{kept}\""));
                }
            }
            Command::Preset(preset) => {
                self.session.set_refine_preset(preset).await;
                render::success("Refine preset updated.");
            }
            Command::Instruction(text) => {
                self.session.set_custom_instruction(text).await;
                render::success("Refine instruction updated.");
            }
            Command::Refine(instruction) => {
                self.submit(TransformMode::Refine, self.session.submit_refine(instruction))
                    .await;
                if self.session.last_failure(TransformMode::Refine).await.is_none() {
                    render::text_block("Output", &self.session.output_text().await);
                }
            }
            Command::Critique => {
                self.submit(TransformMode::Critique, self.session.submit_critique()).await
            }
            Command::Echo => self.submit(TransformMode::Echo, self.session.submit_echo()).await,
            Command::Tone(target) => {
                self.submit(TransformMode::Tone, self.session.submit_tone(target)).await
            }
            Command::Chat(message) => {
                self.submit(TransformMode::Chat, self.session.send_chat(&message)).await
            }
            Command::Messages => {
                let messages = self.session.messages().messages().await;
                if messages.is_empty() {
                    render::info("No messages yet.");
                }
                for (i, message) in messages.iter().enumerate() {
                    render::message(i + 1, message);
                }
            }
            Command::Inject(InjectTarget::Selection) => {
                if !self.session.inject_selection_into_chat().await {
                    render::info("No selection to inject.");
                }
            }
            Command::Inject(InjectTarget::Message(n)) => {
                if self.session.inject_message_into_input(n - 1).await {
                    render::success(&format!("Message {n} copied into the input text."));
                } else {
                    render::error(&format!("No message {n}."));
                }
            }
            Command::History => render::history(&self.session.history().entries().await),
            Command::Restore(n) => match self.session.restore(n - 1).await {
                Some(entry) => {
                    render::success(&format!("Restored version {n}."));
                    render::text_block("Output", &entry.output);
                }
                None => render::error(&format!("No version {n}.")),
            },
            Command::Diff => {
                let segments =
                    word_diff(&self.session.input_text().await, &self.session.output_text().await);
                if is_unchanged(&segments) {
                    render::info("No changes.");
                } else {
                    render::diff(&segments);
                }
            }
            Command::Clear => {
                self.session.clear().await?;
                render::success("Session cleared.");
            }
            Command::Chapter(action) => self.chapter(action).await?,
            Command::Export { chapter, path } => self.export(chapter, path.as_deref()).await?,
            Command::Import(path) => {
                let id = importer::import_into(&self.documents, &path).await?;
                let title = self
                    .documents
                    .get(&id)
                    .await
                    .map(|doc| doc.title)
                    .unwrap_or_default();
                render::success(&format!("Imported \"{title}\"."));
            }
            Command::Summary => render::summary(&self.documents.summary().await),
            Command::Save(path) => {
                tokio::fs::write(&path, self.session.output_text().await).await?;
                render::success(&format!("Output written to {}.", path.display()));
            }
        }

        self.print_new_messages();
        Ok(Flow::Continue)
    }

    async fn submit(
        &self,
        mode: TransformMode,
        submission: impl Future<Output = hexakin_core::session::SubmitOutcome>,
    ) {
        render::info(&format!("{mode}…"));
        let outcome = submission.await;
        render::outcome(mode, &outcome);
    }

    async fn chapter_id(&self, n: usize) -> Result<DocumentId> {
        match self.documents.at(n - 1).await {
            Some(doc) => Ok(doc.id),
            None => Err(anyhow::anyhow!("No chapter {n}.")),
        }
    }

    async fn active_or_err(&self) -> Result<hexakin_core::document::Document> {
        self.documents
            .active()
            .await
            .ok_or_else(|| anyhow::anyhow!("No active chapter."))
    }

    async fn chapter(&mut self, action: ChapterCommand) -> Result<()> {
        match action {
            ChapterCommand::List => {
                let active = self.documents.active_id().await;
                render::chapters(&self.documents.documents().await, active.as_ref());
            }
            ChapterCommand::Add(title) => {
                let id = self.documents.add_document(title.as_deref(), None).await?;
                if let Some(doc) = self.documents.get(&id).await {
                    render::success(&format!("Added \"{}\".", doc.title));
                }
            }
            ChapterCommand::Rename(n, title) => {
                let id = self.chapter_id(n).await?;
                self.documents.rename(&id, &title).await?;
                render::success(&format!("Chapter {n} renamed."));
            }
            ChapterCommand::Delete(n) => {
                let id = self.chapter_id(n).await?;
                self.documents.delete(&id).await?;
                render::success(&format!("Chapter {n} deleted."));
            }
            ChapterCommand::Select(n) => {
                let id = self.chapter_id(n).await?;
                self.documents.select(&id).await;
                render::success(&format!("Chapter {n} selected."));
            }
            ChapterCommand::Show => {
                let doc = self.active_or_err().await?;
                render::text_block(&doc.title, &doc.content);
            }
            ChapterCommand::Write => {
                let doc = self.active_or_err().await?;
                let output = self.session.output_text().await;
                self.documents.set_content(&doc.id, &output).await?;
                render::success(&format!("Output written to \"{}\".", doc.title));
            }
            ChapterCommand::Use => {
                let doc = self.active_or_err().await?;
                self.session.set_input_text(doc.content).await;
                render::success(&format!("\"{}\" loaded into the input text.", doc.title));
            }
        }
        Ok(())
    }

    async fn export(&self, chapter: Option<usize>, path: Option<&Path>) -> Result<()> {
        let text = match chapter {
            Some(n) => {
                let id = self.chapter_id(n).await?;
                self.documents.export_one(&id).await?
            }
            None => self.documents.export_all().await,
        };

        match path {
            Some(path) => {
                tokio::fs::write(path, text).await?;
                render::success(&format!("Exported to {}.", path.display()));
            }
            None => println!("{text}"),
        }
        Ok(())
    }

    /// Prints messages appended since the last command.
    fn print_new_messages(&mut self) {
        loop {
            match self.incoming.try_recv() {
                Ok(message) => {
                    self.shown += 1;
                    render::message(self.shown, &message);
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    self.shown += skipped as usize;
                    render::info(&format!("({skipped} messages skipped, see /messages)"));
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }
}
