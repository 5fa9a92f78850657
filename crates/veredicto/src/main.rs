mod api;
mod config;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use veredicto_core::{ClaimAnalyzer, EvidenceStore};
use veredicto_logging::{LogFormat, Logger};
use veredicto_model::{Model, ModelConfig, OpenAiModel};

use config::ProjectConfig;

const DEFAULT_PORT: u16 = 8787;

#[derive(Parser, Debug)]
#[command(
    name = "veredicto",
    about = "Agentic fact-checking assistant",
    version,
    author
)]
struct Cli {
    /// Claim to analyze
    #[arg(short, long)]
    claim: Option<String>,

    /// Path to a file containing the claim
    #[arg(long)]
    claim_file: Option<PathBuf>,

    /// Run the HTTP API server instead of a one-shot analysis
    #[arg(long)]
    serve: bool,

    /// Port for the HTTP API
    #[arg(short, long)]
    port: Option<u16>,

    /// Model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long)]
    api_base: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormatChoice,

    /// Output final result as JSON
    #[arg(long)]
    json_output: bool,

    /// Dry run: show resolved configuration without calling the model
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let project = ProjectConfig::load(&working_dir)?.unwrap_or_default();

    let model_id = project.effective_model(cli.model.as_deref());
    let api_base_env = std::env::var("VEREDICTO_API_BASE").ok();
    let api_base = project.effective_api_base(cli.api_base.as_deref(), api_base_env.as_deref());
    let port = project.effective_port(cli.port, DEFAULT_PORT);

    let log_format: LogFormat = cli.log_format.into();
    veredicto_logging::init_tracing("info", log_format);
    let logger = Arc::new(Logger::new(log_format));

    if cli.dry_run {
        println!("=== Dry Run ===");
        println!("Model: {}", model_id);
        println!(
            "API base: {}",
            api_base.as_deref().unwrap_or("https://api.openai.com/v1")
        );
        if cli.serve {
            println!("Mode: serve on port {}", port);
        } else {
            println!("Mode: one-shot");
            if let Some(ref claim) = cli.claim {
                println!("Claim: {}", claim_preview(claim));
            }
        }
        return Ok(());
    }

    let api_key = std::env::var("OPENAI_API_KEY")
        .context("OPENAI_API_KEY is not set in the environment")?;

    let mut backend = OpenAiModel::new(api_key);
    if let Some(base) = api_base {
        backend = backend.with_api_base(base);
    }
    let model: Arc<dyn Model> = Arc::new(backend);
    let store = Arc::new(EvidenceStore::new());
    let model_config = ModelConfig::new(model_id);
    let analyzer = Arc::new(ClaimAnalyzer::new(model, store, model_config, logger));

    if cli.serve {
        let router = api::create_router(analyzer);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        info!(%addr, "API server listening");
        axum::serve(listener, router).await.context("Server error")?;
        return Ok(());
    }

    let claim = get_claim(&cli)?;
    let outcome = analyzer.analyze(&claim).await?;

    if cli.json_output {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", outcome.to_markdown());
    }

    Ok(())
}

/// Truncate a claim for display, counting characters rather than bytes
/// so accented text never splits mid-character
fn claim_preview(claim: &str) -> String {
    if claim.chars().count() > 100 {
        let truncated: String = claim.chars().take(100).collect();
        format!("{}...", truncated)
    } else {
        claim.to_string()
    }
}

fn get_claim(cli: &Cli) -> Result<String> {
    // Prefer --claim flag
    if let Some(ref claim) = cli.claim {
        return Ok(claim.clone());
    }

    if let Some(ref path) = cli.claim_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(content.trim().to_string());
    }

    anyhow::bail!("No claim provided. Use --claim or --claim-file.")
}
