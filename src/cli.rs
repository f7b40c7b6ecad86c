//! Command-line interface definitions for Square Digest.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Credentials are taken from environment variables (usually via a `.env`
//! file); the scraping and recommendation knobs have spec'd defaults and can
//! be overridden with flags.

use clap::{Parser, ValueEnum};

/// Which output contract the AI is asked to follow, and therefore how its
/// response is parsed.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Strict JSON array of `{title, link, summary}` objects.
    Json,
    /// Line-based template; the response is passed through unparsed.
    Plain,
}

/// Command-line arguments for the Square Digest run.
///
/// One invocation performs one fetch/recommend/deliver cycle. Secrets are
/// required and sourced from the environment; everything else has a default.
///
/// # Examples
///
/// ```sh
/// # Defaults: 4 pages, up to 100 posts, JSON contract
/// square_digest
///
/// # Narrower crawl with a custom interest profile
/// square_digest --page-limit 2 --target-count 40 --interests "IT gear, AI"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: String,

    /// Sender email address (also the recipient)
    #[arg(long, env = "EMAIL_USER")]
    pub email_user: String,

    /// Sender app password for SMTP login
    #[arg(long, env = "EMAIL_PASS", hide_env_values = true)]
    pub email_pass: String,

    /// Maximum number of listing pages to fetch
    #[arg(long, default_value_t = 4)]
    pub page_limit: u32,

    /// Stop collecting once this many posts have been gathered
    #[arg(long, default_value_t = 100)]
    pub target_count: usize,

    /// Interest profile used to bias the AI's selection
    #[arg(long, default_value = "IT gadgets, NCT, the US, AI")]
    pub interests: String,

    /// AI output contract: strict JSON or opaque line template
    #[arg(long, value_enum, default_value_t = ResponseFormat::Json)]
    pub response_format: ResponseFormat,
}
