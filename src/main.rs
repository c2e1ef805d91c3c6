//! stacksniff CLI - guess a website's technology stack
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments, loading the environment and handling top-level errors.

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use dialoguer::Input;
use stacksniff::{pipeline, Config};
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stacksniff")]
#[command(author, version, about = "Guess a website's technology stack from its HTML", long_about = None)]
struct Cli {
    /// URL to analyze (prompted for when omitted)
    url: Option<String>,
    /// Path to a stacksniff.toml config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the LLM model
    #[arg(long)]
    model: Option<String>,
    /// Only print keyword clues, skip the LLM report
    #[arg(long)]
    clues_only: bool,
    /// Print the analysis as JSON
    #[arg(long)]
    json: bool,
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_env() {
    // Earlier files win: dotenvy never overrides a variable that is already set.
    for file in [".env.local", ".env"] {
        let _ = dotenvy::from_filename(file);
    }
}

/// Ask for the target URL: an interactive prompt on a terminal, otherwise
/// the first line of piped input.
fn prompt_url() -> anyhow::Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        let url: String = Input::new()
            .with_prompt("Enter website URL")
            .interact_text()
            .context("failed to read URL")?;
        Ok(url.trim().to_string())
    } else {
        read_url_line(stdin.lock()).context("failed to read URL")
    }
}

fn read_url_line<R: BufRead>(mut reader: R) -> io::Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(model) = cli.model {
        config.agent.model = model;
    }

    let url = match cli.url {
        Some(url) => url.trim().to_string(),
        None => prompt_url()?,
    };

    let summarize = !cli.clues_only;
    if summarize && config.api_key().is_none() {
        eprintln!(
            "{} GROQ_API_KEY is not set; no AI analysis will be produced.",
            "Warning:".yellow().bold()
        );
    }

    if cli.json {
        match pipeline::analyze(&url, &config, summarize).await {
            Ok(analysis) => println!("{}", serde_json::to_string_pretty(&analysis)?),
            Err(e) => println!("{}", e),
        }
        return Ok(());
    }

    let stdout = io::stdout();
    pipeline::run(&url, &config, summarize, &mut stdout.lock()).await?;

    Ok(())
}
