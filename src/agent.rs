//! LLM agent module for stack summarization.
//!
//! Talks to Groq's OpenAI-compatible chat completion endpoint with reqwest.

use crate::clues::Clues;
use crate::config::Config;
use crate::error::describe;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, Serializer};
use std::io;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Characters of page source embedded in the prompt
pub const HTML_SAMPLE_CHARS: usize = 200_000;

/// Characters of serialized prompt input sent to the model
pub const PROMPT_INPUT_CHARS: usize = 100_000;

const SYSTEM_PROMPT: &str = "You are a senior software architect. Given tech clues from a website, \
infer the most likely stack. Only state what is supported by evidence; \
clearly mark items as 'likely' when inferred. Be concise and structured.";

const REPORT_INSTRUCTIONS: &str = "Return a clean, human-friendly report with sections:
Frontend, Styling (CSS/UI), Backend (language & framework), CMS/SSG,
Payments, Analytics/Tags, CDN/Performance, Auth, Build Tools, Database (likely),
Other Notable Services.

If unknown, say 'Not detected'.";

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("[Error] GROQ_API_KEY not set in environment.")]
    MissingApiKey,
    #[error("[LLM error] {0}")]
    Request(String),
}

impl From<reqwest::Error> for AgentError {
    fn from(e: reqwest::Error) -> Self {
        AgentError::Request(describe(&e))
    }
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// "system", "user" or "assistant"
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// What the model sees as `Input JSON`
#[derive(Serialize)]
struct PromptInput<'a> {
    url: &'a str,
    clues: &'a Clues,
    html_sample: &'a str,
}

/// Minimal client for an OpenAI-compatible chat completion API
#[derive(Clone)]
pub struct GroqClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl GroqClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AgentError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Send one chat completion and return the first choice's text.
    pub async fn chat_completion(&self, request: &ChatRequest) -> Result<String, AgentError> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                debug!(error = %e, "LLM request failed");
                AgentError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            debug!(status = %status, error = %error_text, "LLM API error");
            return Err(AgentError::Request(format!(
                "API returned {}: {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| {
                AgentError::Request(format!("failed to parse response: {}", describe(&e)))
            })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AgentError::Request("no choices in response".to_string()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "chat completion"
        );

        Ok(content)
    }
}

/// First `max` characters of `s`.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// JSON layout of Python's `json.dumps`: `", "` and `": "` separators and
/// every non-ASCII character escaped as `\uXXXX` (UTF-16 code units).
struct AsciiSpacedFormatter;

impl Formatter for AsciiSpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Serialize `value` the way the prompt input is laid out.
fn to_prompt_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    value.serialize(&mut Serializer::with_formatter(&mut buf, AsciiSpacedFormatter))?;
    // The formatter only ever emits ASCII.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn prompt_input<'a>(clues: &'a Clues, url: &'a str, html: &'a str) -> PromptInput<'a> {
    PromptInput {
        url,
        clues,
        html_sample: truncate_chars(html, HTML_SAMPLE_CHARS),
    }
}

/// Build the user message: report instructions followed by the JSON input.
pub fn build_user_prompt(clues: &Clues, url: &str, html: &str) -> String {
    // Serializing borrowed strings and a string-keyed map cannot fail.
    let json = to_prompt_json(&prompt_input(clues, url, html)).unwrap_or_default();

    format!(
        "{}\n\nInput JSON: {}",
        REPORT_INSTRUCTIONS,
        truncate_chars(&json, PROMPT_INPUT_CHARS)
    )
}

/// Assemble the full completion request for a page.
pub fn build_request(clues: &Clues, url: &str, html: &str, config: &Config) -> ChatRequest {
    ChatRequest {
        model: config.agent.model.clone(),
        messages: vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(build_user_prompt(clues, url, html)),
        ],
        temperature: config.agent.temperature,
        max_tokens: config.agent.max_tokens,
    }
}

/// Ask the model to summarize the detected stack of `url`.
///
/// Returns [`AgentError::MissingApiKey`] without touching the network when
/// no key is configured.
pub async fn summarize(
    clues: &Clues,
    url: &str,
    html: &str,
    config: &Config,
) -> Result<String, AgentError> {
    let api_key = config.api_key().ok_or(AgentError::MissingApiKey)?;

    let client = GroqClient::new(
        api_key,
        config.agent.base_url.as_str(),
        Duration::from_secs(config.agent.timeout_secs),
    )?;
    let request = build_request(clues, url, html, config);

    info!(model = %request.model, "requesting stack analysis");
    let reply = client.chat_completion(&request).await?;
    Ok(reply.trim().to_string())
}
