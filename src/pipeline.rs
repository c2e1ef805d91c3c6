//! The fetch → detect → summarize pipeline.

use crate::agent;
use crate::clues::{self, Clues};
use crate::config::Config;
use crate::scraper::{self, ScraperError};
use crate::summary::{Analysis, Report};
use std::io::Write;
use tracing::{debug, info};

/// How far a text-mode run got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The page could not be fetched; nothing else ran.
    FetchFailed,
    Completed,
}

/// Run every stage, printing the text report to `out` as each stage finishes.
///
/// Stage failures are printed in place of their output. Only a failed write
/// to `out` is returned as an error.
pub async fn run<W: Write>(
    url: &str,
    config: &Config,
    summarize: bool,
    out: &mut W,
) -> anyhow::Result<Outcome> {
    let page = match scraper::fetch_page(url, &config.fetch).await {
        Ok(page) => page,
        Err(e) => {
            debug!(error = %e, "fetch failed");
            writeln!(out, "{}", e)?;
            return Ok(Outcome::FetchFailed);
        }
    };

    let clues = clues::detect(&page.html);
    log_clues(&clues);
    writeln!(out, "\n[Detected Clues]")?;
    writeln!(out, "{}", clues.to_pretty_json()?)?;
    out.flush()?;

    if summarize {
        let report = match agent::summarize(&clues, url, &page.html, config).await {
            Ok(text) => text,
            Err(e) => {
                debug!(error = %e, "summarization failed");
                e.to_string()
            }
        };
        writeln!(out, "\n[AI Analysis]")?;
        writeln!(out, "{}", report)?;
    }

    writeln!(out, "\n[Analysis Complete]")?;
    Ok(Outcome::Completed)
}

/// Run every stage and collect the results instead of printing them.
pub async fn analyze(
    url: &str,
    config: &Config,
    summarize: bool,
) -> Result<Analysis, ScraperError> {
    let page = scraper::fetch_page(url, &config.fetch).await?;
    let clues = clues::detect(&page.html);
    log_clues(&clues);

    let report = if summarize {
        Report::from(agent::summarize(&clues, url, &page.html, config).await)
    } else {
        Report::Skipped
    };

    Ok(Analysis {
        url: page.url,
        title: page.title,
        clues,
        report,
    })
}

fn log_clues(clues: &Clues) {
    info!(total = clues.total(), "clue detection finished");
}
