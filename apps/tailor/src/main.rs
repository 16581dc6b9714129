use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use tailor::config::Config;
use tailor::generation::generator::{tailor_resume, TailorRequest};
use tailor::llm_client::{self, LlmClient};
use tailor::profiles::{FileProfileStore, ProfileCache};
use tailor::state::AppState;

/// Tailor a stored applicant profile to a job description.
#[derive(Debug, Parser)]
#[command(name = "tailor", version, about)]
struct Cli {
    /// Applicant whose profile is loaded from PROFILE_DIR.
    #[arg(long)]
    user: Uuid,

    /// File containing the job description text.
    #[arg(long)]
    job: PathBuf,

    /// Write the tailored profile here instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Log at debug level regardless of RUST_LOG.
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    let level = if cli.verbose {
        "debug"
    } else {
        config.rust_log.as_str()
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), level))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting tailor v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let store = Arc::new(FileProfileStore::new(config.profile_dir.clone()));
    info!("Profile store at {}", config.profile_dir.display());

    let state = AppState {
        llm: Arc::new(llm),
        profiles: Arc::new(ProfileCache::new(store)),
        settings: config.stage_settings(),
    };

    let job_text = tokio::fs::read_to_string(&cli.job)
        .await
        .with_context(|| format!("Failed to read job description {}", cli.job.display()))?;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling");
            trigger.cancel();
        }
    });

    let request = TailorRequest {
        user_id: cli.user,
        job_text,
    };
    let tailored = match tailor_resume(&state, &request, &cancel).await {
        Ok(tailored) => tailored,
        Err(err) => {
            error!("Tailoring failed [{}]: {err}", err.code());
            return Err(anyhow!(err.public_message()));
        }
    };

    let json = serde_json::to_string_pretty(&tailored).context("Failed to encode result")?;
    match cli.output {
        Some(path) => {
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote tailored profile to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
