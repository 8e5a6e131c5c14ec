//! Lectern CLI
//!
//! Main entry point for the lectern command-line tool: ingest course
//! material, ask grounded questions, and produce summaries and quizzes.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, IngestCommand, QuizCommand, StatsCommand, SummarizeCommand};
use lectern_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Lectern CLI - study assistant grounded in a private document corpus
#[derive(Parser, Debug)]
#[command(name = "lectern")]
#[command(about = "Grounded Q&A, summaries and quizzes over course material", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "LECTERN_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "LECTERN_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Generation model identifier
    #[arg(short, long, global = true, env = "LECTERN_MODEL")]
    model: Option<String>,

    /// Embedding model identifier
    #[arg(long, global = true, env = "LECTERN_EMBED_MODEL")]
    embed_model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Index documents into the vector store
    Ingest(IngestCommand),

    /// Ask a question grounded in the indexed corpus
    Ask(AskCommand),

    /// Summarize a text file
    Summarize(SummarizeCommand),

    /// Generate quiz questions from a text file
    Quiz(QuizCommand),

    /// Show index and store statistics
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.model,
        cli.embed_model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    config.validate()?;

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Lectern CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Generation model: {}", config.generation_model);
    tracing::debug!("Embedding model: {}", config.embedding_model);

    // Ensure .lectern directory exists
    config.ensure_lectern_dir()?;

    let command_name = match &cli.command {
        Commands::Ingest(_) => "ingest",
        Commands::Ask(_) => "ask",
        Commands::Summarize(_) => "summarize",
        Commands::Quiz(_) => "quiz",
        Commands::Stats(_) => "stats",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ingest(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Summarize(cmd) => cmd.execute(&config).await,
        Commands::Quiz(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
