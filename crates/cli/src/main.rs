//! codecritic CLI — the main entry point.
//!
//! One command: `review`, which runs the full orchestrated code review
//! over a single file and prints the final report.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "codecritic",
    about = "codecritic — an LLM-orchestrated code review loop",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Review a code file
    Review {
        /// The path to the code file to be reviewed
        file_path: String,

        /// Override the model for both tiers
        #[arg(short, long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Review { file_path, model } => commands::review::run(&file_path, model).await?,
    }

    Ok(())
}
