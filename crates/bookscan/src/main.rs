//! BookScan CLI - identify a book from a photo of its cover.
//!
//! BookScan reads the title and author off a cover image with a vision LLM,
//! looks the book up in Google Books, and generates a short summary.
//!
//! # Usage
//!
//! ```bash
//! # Scan a local photo
//! bookscan scan cover.jpg
//!
//! # Scan a remote image with OpenAI, JSON output
//! bookscan scan https://example.com/cover.jpg --llm openai --format json
//!
//! # View configuration
//! bookscan config show
//! ```

use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod cli;
mod logging;

/// BookScan - identify a book from its cover and summarize it.
#[derive(Parser, Debug)]
#[command(name = "bookscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a cover image and print the book's summary
    Scan(cli::scan::ScanArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match bookscan_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `bookscan config path`."
            );
            bookscan_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("BookScan v{}", bookscan_core::VERSION);

    match cli.command {
        Commands::Scan(args) => cli::scan::execute(args, config).await,
        Commands::Config(args) => {
            cli::config::execute(args).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
