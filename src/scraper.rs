//! Page retrieval.
//!
//! Uses reqwest for fetching and scraper for pulling the page title.

use crate::config::FetchConfig;
use crate::error::describe;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ScraperError {
    /// Carries the full cause chain of the failed request
    #[error("[Error fetching HTML: {0}]")]
    Fetch(String),
}

impl From<reqwest::Error> for ScraperError {
    fn from(e: reqwest::Error) -> Self {
        ScraperError::Fetch(describe(&e))
    }
}

/// A fetched page
#[derive(Debug, Clone)]
pub struct Page {
    /// The URL actually requested
    pub url: String,
    /// Page title, if one could be found
    pub title: Option<String>,
    /// Raw response body
    pub html: String,
}

/// Assume https when the URL carries no scheme.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Create a configured HTTP client for fetching pages
fn create_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
}

/// Fetch a single page. Any transport failure or non-2xx status is an error.
pub async fn fetch_page(url: &str, config: &FetchConfig) -> Result<Page, ScraperError> {
    let url = normalize_url(url);
    let client = create_client(config)?;

    info!(%url, "fetching page");
    let response = client.get(&url).send().await?.error_for_status()?;
    debug!(status = %response.status(), "page responded");

    let html = response.text().await?;
    let title = extract_title(&Html::parse_document(&html));
    debug!(bytes = html.len(), title = ?title, "page downloaded");

    Ok(Page { url, title, html })
}

/// Extract the page title from <title> or <h1>
fn extract_title(document: &Html) -> Option<String> {
    ["title", "h1"].into_iter().find_map(|tag| {
        let selector = Selector::parse(tag).ok()?;
        let element = document.select(&selector).next()?;
        let text: String = element.text().collect();
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        (!text.is_empty()).then_some(text)
    })
}
