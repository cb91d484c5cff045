use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;

use hexakin_core::config::AppConfig;
use hexakin_core::document::MultiDocumentStore;
use hexakin_core::history::VersionHistoryStore;
use hexakin_core::message::MessageLog;
use hexakin_core::session::EditingSession;
use hexakin_core::storage::{KeyValueStore, MemoryStore};
use hexakin_core::transform::TextTransformClient;
use hexakin_infrastructure::logging::{LogTarget, init_logging};
use hexakin_infrastructure::{ConfigStorage, HexakinPaths, JsonFileStore, SecretStorage};
use hexakin_interaction::{
    ChatBackend, HttpTransformClient, LocalTransformClient, OpenAIApiAgent, TransformService,
};

mod app;
mod command;
mod helper;
mod render;

use app::{Flow, Repl};
use command::Command;
use helper::CliHelper;

#[derive(Parser)]
#[command(name = "hexakin")]
#[command(about = "Hexakin - LLM-assisted writing and editing", long_about = None)]
struct Cli {
    /// Send transforms to a running hexakin-server instead of calling the model directly
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Root directory for config, secrets, store and logs (default ~/.config/hexakin)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep history and chapters in memory only
    #[arg(long)]
    ephemeral: bool,
}

fn build_client(
    cli: &Cli,
    paths: &HexakinPaths,
    config: &AppConfig,
) -> Result<Arc<dyn TextTransformClient>> {
    if let Some(url) = &cli.server {
        tracing::info!("[Repl] Using transform server at {}", url);
        return Ok(Arc::new(HttpTransformClient::new(url.clone())));
    }

    let backend: Option<Arc<dyn ChatBackend>> =
        match OpenAIApiAgent::try_from_sources(&SecretStorage::new(paths), &config.model) {
            Ok(agent) => Some(Arc::new(agent)),
            Err(err) => {
                tracing::warn!("[Repl] Transforms disabled: {}", err);
                println!("{}", format!("Warning: {err}").yellow());
                None
            }
        };
    let service = TransformService::new(backend)?;
    Ok(Arc::new(LocalTransformClient::new(Arc::new(service))))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = HexakinPaths::resolve(cli.data_dir.clone())?;
    paths.ensure_dirs()?;
    let _guard = init_logging(LogTarget::DailyFile(&paths.logs_dir()))?;

    let config = ConfigStorage::new(&paths).load()?;

    let storage: Arc<dyn KeyValueStore> = if cli.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(JsonFileStore::new(paths.store_dir()))
    };
    let history = VersionHistoryStore::load(storage.clone()).await;
    let documents = MultiDocumentStore::load(storage, config.documents).await;

    let session = EditingSession::new(
        build_client(&cli, &paths, &config)?,
        history,
        MessageLog::new(),
        config.session,
    );
    let mut repl = Repl::new(session, documents).await;

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Hexakin ===".bright_magenta().bold());
    println!(
        "{}",
        "Type '/help' for commands, plain text to chat, or 'quit' to exit.".bright_black()
    );
    println!();

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let command = match trimmed.parse::<Command>() {
                    Ok(command) => command,
                    Err(message) => {
                        render::error(&message);
                        continue;
                    }
                };

                match repl.execute(command).await {
                    Ok(Flow::Quit) => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Ok(Flow::Continue) => {}
                    Err(err) => {
                        tracing::warn!("[Repl] Command failed: {}", err);
                        render::error(&format!("Error: {err}"));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                render::error(&format!("Error: {err:?}"));
                break;
            }
        }
    }

    Ok(())
}
