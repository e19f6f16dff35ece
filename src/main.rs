use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use zspace::kernel::services::adapters::{
    load_settings, load_settings_from, AssistService, MemoryBackend, MemoryBlobStore,
    OpenAiCompatibleModel, ReaderExtractor, StaticTokenGate,
};
use zspace::kernel::services::ports::{MonotonicClock, Settings};
use zspace::kernel::WorkspaceStore;
use zspace::server::{self, AppState};

mod logging;

const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(name = "zspace", version, about = "Project workspace server with AI-assisted editing")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// Settings file; defaults to the per-user cache location.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Overrides `server.bind`.
        #[arg(long)]
        bind: Option<String>,
        /// Log to file only.
        #[arg(long)]
        quiet: bool,
    },
    /// Print the effective settings as JSON.
    PrintSettings {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn settings_from(config: Option<&PathBuf>) -> anyhow::Result<Settings> {
    match config {
        Some(path) => load_settings_from(path).context("loading settings"),
        None => Ok(load_settings()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve {
        config: None,
        bind: None,
        quiet: false,
    }) {
        Command::Serve {
            config,
            bind,
            quiet,
        } => {
            let _logging = logging::init(!quiet);
            let mut settings = settings_from(config.as_ref())?;
            if let Some(bind) = bind {
                settings.server.bind = bind;
            }
            run_server(settings).await
        }
        Command::PrintSettings { config } => {
            let settings = settings_from(config.as_ref())?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let http = reqwest::Client::builder()
        .connect_timeout(HTTP_CONNECT_TIMEOUT)
        .build()
        .context("building http client")?;

    let model = OpenAiCompatibleModel::from_settings(http.clone(), &settings.provider);
    tracing::info!(provider = ?settings.provider.kind, model = model.model(), "language model configured");
    let extractor = ReaderExtractor::from_settings(http, &settings.extractor);
    let assist = AssistService::new(
        Arc::new(model),
        Arc::new(extractor),
        settings.assist.url_fetch_timeout(),
    );

    let store = WorkspaceStore::new(
        Arc::new(MemoryBackend::new()),
        Arc::new(MemoryBlobStore::new()),
        Arc::new(MonotonicClock::new()),
    );

    let gate = StaticTokenGate::from_settings(&settings.auth);
    if gate.is_empty() {
        tracing::warn!("no auth tokens configured; every request will be rejected");
    }

    let state = AppState {
        gate: Arc::new(gate),
        assist: Arc::new(assist),
        store,
    };

    let listener = TcpListener::bind(&settings.server.bind)
        .await
        .with_context(|| format!("binding {}", settings.server.bind))?;
    server::serve(listener, state, shutdown_signal()).await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
