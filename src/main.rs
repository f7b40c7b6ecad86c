//! # Square Digest
//!
//! A scrape-and-summarize pipeline that collects post titles from the
//! theqoo square listing, asks Gemini to pick the posts matching a fixed
//! interest profile, and emails the resulting digest to the sender's own
//! address.
//!
//! ## Usage
//!
//! ```sh
//! GEMINI_API_KEY=... EMAIL_USER=me@gmail.com EMAIL_PASS=... square_digest
//! ```
//!
//! ## Architecture
//!
//! One invocation runs a strict three-stage sequence:
//! 1. **Fetch**: walk the paginated listing and collect title/link pairs
//! 2. **Recommend**: one Gemini call selects and summarizes up to 5 posts
//! 3. **Deliver**: render the digest and send one email over SMTP
//!
//! A fetch failure aborts the run; an AI failure degrades to an empty
//! digest; a delivery failure is logged and absorbed. Stage ordering is
//! part of the contract and is never parallelized.

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod models;
mod outputs;
mod recommender;
mod scrapers;

use api::GeminiClient;
use cli::Cli;
use models::DigestContent;
use outputs::email::Mailer;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    // .env is optional; deployments may set the environment directly.
    let _ = dotenvy::dotenv();

    let args = Cli::parse();
    debug!(
        page_limit = args.page_limit,
        target_count = args.target_count,
        response_format = ?args.response_format,
        "Parsed CLI arguments"
    );
    info!("square_digest starting up");

    // Build both external clients up front so bad configuration fails the
    // run before any scraping happens.
    let mailer = Mailer::new(&args.email_user, &args.email_pass)?;
    let ai = GeminiClient::new(args.gemini_api_key.clone())?;
    let http = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .build()?;

    // ---- Fetch ----
    let articles = scrapers::square::fetch_articles(
        &http,
        scrapers::square::BASE_URL,
        args.page_limit,
        args.target_count,
    )
    .await?;
    info!(count = articles.len(), "Articles collected");

    // ---- Recommend ----
    let digest = recommender::recommend(&ai, &articles, &args.interests, args.response_format).await;

    // Echo the digest to the log before mailing, like a run report.
    match &digest {
        DigestContent::Structured(items) => {
            for (i, item) in items.iter().enumerate() {
                info!(
                    pick = i + 1,
                    title = %item.title,
                    link = %item.link,
                    summary = %item.summary,
                    "Recommended post"
                );
            }
        }
        DigestContent::Raw(text) => info!(digest = %text, "Recommended posts"),
    }

    // ---- Deliver ----
    let outcome = mailer.deliver(&digest).await;
    info!(?outcome, "Delivery finished");

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
