//! Refguard CLI - govern refactoring suggestions from the terminal
//!
//! - Gate, flag and rank a batch of generated suggestions
//! - Record, list and verify a project's decision timeline
//! - Inspect and adjust a project's ranking weights

use clap::{Parser, Subcommand};
use refguard_governor::{GovernError, Governor, GovernorConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::{govern, timeline, tuning};

#[derive(Parser)]
#[command(name = "refguard")]
#[command(about = "Refguard - governance for automated refactoring suggestions", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "REFGUARD_CONFIG")]
    config: Option<String>,

    /// Data directory (overrides configuration)
    #[arg(long, env = "REFGUARD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Risk model artifact (overrides configuration)
    #[arg(long, env = "REFGUARD_MODEL_PATH")]
    model: Option<PathBuf>,

    /// Log level (overrides configuration)
    #[arg(long, env = "REFGUARD_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "REFGUARD_LOG_JSON")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Gate and rank suggestions read as a JSON request
    Govern(govern::GovernArgs),

    /// Project decision timeline
    Timeline {
        #[command(subcommand)]
        command: timeline::TimelineCommands,
    },

    /// Adaptive ranking weights
    Tuning {
        #[command(subcommand)]
        command: tuning::TuningCommands,
    },

    /// Guess a project's domain from its file layout
    DetectDomain {
        /// Project path
        path: PathBuf,
    },

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match GovernorConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(data_dir) = cli.data_dir.clone() {
        config.data_dir = data_dir;
    }
    if let Some(model) = cli.model.clone() {
        config.risk.model_path = Some(model);
    }
    if let Some(level) = cli.log_level.clone() {
        config.logging.level = level;
    }
    config.logging.json |= cli.json;

    init_tracing(&config);
    tracing::debug!(data_dir = %config.data_dir.display(), "configuration loaded");

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<GovernError>() {
                Some(governed) => match serde_json::to_string(&governed.body()) {
                    Ok(body) => eprintln!("{body}"),
                    Err(_) => eprintln!("{governed}"),
                },
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(config: &GovernorConfig) {
    // Logs go to stderr; stdout carries command output.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(command: Commands, config: &GovernorConfig) -> anyhow::Result<()> {
    let governor = || Governor::from_config(config);
    match command {
        Commands::Govern(args) => govern::execute(args, &governor()).await,
        Commands::Timeline { command } => timeline::execute(command, &governor()).await,
        Commands::Tuning { command } => tuning::execute(command, &governor()).await,
        Commands::DetectDomain { path } => govern::detect(path),
        Commands::Config => output::print_json(config),
    }
}
