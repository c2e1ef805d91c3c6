//! # stacksniff
//!
//! A CLI for guessing the technology stack behind a web page.
//!
//! ## Features
//!
//! - **Keyword clues**: a fixed catalog of substring rules over the page source
//! - **LLM report**: findings plus an HTML sample are summarized by a Groq-hosted model
//! - **Typed failures**: fetch and LLM errors keep their familiar `[Error ...]` text

pub mod agent;
pub mod clues;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod scraper;
pub mod summary;

pub use clues::{detect, Category, Clues};
pub use config::Config;
pub use summary::Analysis;
