use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use hexakin_core::config::AppConfig;
use hexakin_infrastructure::logging::{LogTarget, init_logging};
use hexakin_infrastructure::{ConfigStorage, HexakinPaths, SecretStorage};
use hexakin_interaction::{ChatBackend, OpenAIApiAgent, TransformService};

mod routes;

#[derive(Parser)]
#[command(name = "hexakin-server")]
#[command(about = "Hexakin transform API", long_about = None)]
struct Cli {
    /// Socket address to listen on (overrides config.toml)
    #[arg(long)]
    bind: Option<String>,

    /// Path to config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Root directory for config, secrets and logs (default ~/.config/hexakin)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn load_config(cli: &Cli, paths: &HexakinPaths) -> Result<AppConfig> {
    let storage = match &cli.config {
        Some(path) => ConfigStorage::with_path(path.clone()),
        None => ConfigStorage::new(paths),
    };
    storage
        .load()
        .with_context(|| format!("Failed to load {}", storage.path().display()))
}

/// Builds the provider backend; `None` when no credential is available.
fn build_backend(paths: &HexakinPaths, config: &AppConfig) -> Option<Arc<dyn ChatBackend>> {
    match OpenAIApiAgent::try_from_sources(&SecretStorage::new(paths), &config.model) {
        Ok(agent) => {
            tracing::info!("[Server] Using model {}", agent.model());
            let backend: Arc<dyn ChatBackend> = Arc::new(agent);
            Some(backend)
        }
        Err(err) => {
            tracing::warn!("[Server] Transforms disabled: {}", err);
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(LogTarget::Stderr)?;

    let paths = HexakinPaths::resolve(cli.data_dir.clone())?;
    let config = load_config(&cli, &paths)?;
    let bind = cli.bind.clone().unwrap_or_else(|| config.server.bind.clone());

    let service = TransformService::new(build_backend(&paths, &config))
        .context("Failed to compile prompt templates")?;
    let app = routes::router(Arc::new(service));

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    tracing::info!("[Server] Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
