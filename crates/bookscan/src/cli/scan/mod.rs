//! The `bookscan scan` command: analyze one cover image.

mod progress;
pub mod types;

pub use types::{Language, LlmProvider, OutputFormat};

use bookscan_core::{
    AnalysisError, Analyzer, BookSummary, Config, ImageRef, LlmProviderFactory, OutputWriter,
};
use clap::Args;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use progress::Spinner;

/// Arguments for the `scan` command.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Cover image: local path, file:// or http(s):// URL, or a data: URL
    #[arg(required = true)]
    pub image: String,

    /// LLM provider (defaults to `llm.provider` from the config file)
    #[arg(long, value_enum)]
    pub llm: Option<LlmProvider>,

    /// LLM model name (provider-specific)
    #[arg(long)]
    pub llm_model: Option<String>,

    /// Prompt and message language (defaults to `prompts.language`)
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// What `--format json` prints when the analysis fails.
#[derive(Serialize)]
struct FailureReport<'a> {
    status: &'static str,
    error: &'a str,
}

/// Execute the scan command. A failed analysis exits with status 1.
pub async fn execute(args: ScanArgs, mut config: Config) -> anyhow::Result<ExitCode> {
    apply_overrides(&args, &mut config);

    let provider_name = args
        .llm
        .map(|p| p.to_string())
        .unwrap_or_else(|| config.llm.provider.clone());
    let provider = LlmProviderFactory::create(
        &provider_name,
        &config.llm,
        args.llm_model.as_deref(),
        Duration::from_millis(config.limits.llm_timeout_ms),
    )?;
    tracing::debug!(
        "Using {} (timeout {:?})",
        provider.name(),
        provider.timeout()
    );

    if !provider.is_available().await {
        tracing::warn!(
            "LLM provider {} does not appear to be reachable; attempting anyway",
            provider.name()
        );
    }

    let analyzer = Analyzer::from_config(&config, provider);
    let spinner = Spinner::start(analyzer.subscribe());
    let outcome = analyzer.analyze(ImageRef::parse(&args.image)).await;
    spinner.finish();

    finish(&args, outcome, analyzer.language())
}

/// Render the outcome and pick the process exit status.
fn finish(
    args: &ScanArgs,
    outcome: Result<BookSummary, AnalysisError>,
    language: bookscan_core::Language,
) -> anyhow::Result<ExitCode> {
    match outcome {
        Ok(summary) => {
            write_summary(args, &summary)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            report_failure(args, &e, language)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Fold CLI flags into the loaded config.
fn apply_overrides(args: &ScanArgs, config: &mut Config) {
    if let Some(language) = args.language {
        config.prompts.language = language.into();
    }
}

fn open_output(args: &ScanArgs) -> anyhow::Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };
    Ok(writer)
}

fn write_summary(args: &ScanArgs, summary: &BookSummary) -> anyhow::Result<()> {
    let mut writer = OutputWriter::new(open_output(args)?, args.format.into(), args.pretty);
    writer.write_summary(summary)?;
    writer.flush()?;

    if let Some(path) = &args.output {
        tracing::info!("Summary written to {}", path.display());
    }
    Ok(())
}

/// Print the generic retry message. Details only go to the log.
fn report_failure(
    args: &ScanArgs,
    error: &AnalysisError,
    language: bookscan_core::Language,
) -> anyhow::Result<()> {
    let message = error.user_message(language);

    if args.format == OutputFormat::Json {
        let mut writer = OutputWriter::new(open_output(args)?, args.format.into(), args.pretty);
        writer.write_json(&FailureReport {
            status: "failed",
            error: message,
        })?;
        writer.flush()?;
    }

    eprintln!("{} {}", console::style("✗").red().bold(), message);
    Ok(())
}
