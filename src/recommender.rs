//! Prompt construction and AI response parsing.
//!
//! The recommender takes the scraped article list and the interest profile,
//! builds a single prompt, makes one generation call through
//! [`GenerateAsync`], and parses the response according to the configured
//! contract:
//!
//! - **Json**: the model is told to answer with a strict JSON array of
//!   `{title, link, summary}` objects. Code fences are stripped before
//!   parsing.
//! - **Plain**: the model is told to answer with a numbered line template;
//!   the text is passed through untouched.
//!
//! Any call or parse failure degrades to an empty digest. The run never
//! aborts in this stage. Links in the response are not checked against the
//! input set.

use crate::api::GenerateAsync;
use crate::cli::ResponseFormat;
use crate::models::{Article, DigestContent, Recommendation};
use std::fmt::Write as _;
use tracing::{info, instrument, warn};

/// Upper bound on how many posts the model is asked to pick.
pub const MAX_PICKS: usize = 5;

/// Build the single prompt sent to the model.
///
/// Every article is enumerated with its link so the model can echo links
/// back verbatim instead of inventing them.
pub fn build_prompt(articles: &[Article], interests: &str, format: ResponseFormat) -> String {
    let mut listing = String::new();
    for (i, article) in articles.iter().enumerate() {
        let _ = writeln!(
            listing,
            "{}. title: {} / link: {}",
            i + 1,
            article.title,
            article.link
        );
    }

    let format_rules = match format {
        ResponseFormat::Json => format!(
            "Respond with ONLY a JSON array of at most {MAX_PICKS} objects, \
             each with exactly the fields \"title\", \"link\" and \"summary\". \
             The summary is one sentence guessing the gist of the post. \
             The link must be copied verbatim from the list. No other text."
        ),
        ResponseFormat::Plain => format!(
            "Strictly follow this template for each pick, at most {MAX_PICKS} picks, \
             and output nothing else:\n\
             N. [title]\n\
             - link: (the link copied verbatim from the list)\n\
             - summary: (one sentence guessing the gist of the post)"
        ),
    };

    format!(
        "You are a capable personal assistant. From the post list below, pick \
         the posts that match the user's interests.\n\n\
         [User interests]: {interests}\n\
         [Post list]:\n{listing}\n\
         [Output rules]:\n{format_rules}"
    )
}

/// Strip a surrounding Markdown code fence, with or without a language tag.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line, if any.
    match rest.split_once('\n') {
        Some((tag, body)) if tag.chars().all(|c| c.is_ascii_alphanumeric()) => body.trim(),
        _ => rest.trim(),
    }
}

fn parse_structured(raw: &str) -> Result<Vec<Recommendation>, serde_json::Error> {
    serde_json::from_str(strip_code_fences(raw))
}

/// Truncate a string for logging purposes.
fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Select and summarize articles through one generation call.
///
/// Returns the digest in the shape dictated by `format`. On any failure the
/// result is empty and the error is logged; the caller keeps going.
#[instrument(level = "info", skip_all, fields(articles = articles.len()))]
pub async fn recommend<G: GenerateAsync>(
    ai: &G,
    articles: &[Article],
    interests: &str,
    format: ResponseFormat,
) -> DigestContent {
    let prompt = build_prompt(articles, interests, format);

    let raw = match ai.generate(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "AI call failed; continuing with an empty digest");
            return empty_digest(format);
        }
    };

    match format {
        ResponseFormat::Plain => {
            let text = raw.trim().to_string();
            info!(bytes = text.len(), "Model returned line-based digest");
            DigestContent::Raw(text)
        }
        ResponseFormat::Json => match parse_structured(&raw) {
            Ok(mut items) => {
                items.truncate(MAX_PICKS);
                info!(count = items.len(), "Model returned structured digest");
                DigestContent::Structured(items)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    response_preview = %truncate_for_log(&raw, 300),
                    "Model returned non-conforming JSON; continuing with an empty digest"
                );
                DigestContent::Structured(Vec::new())
            }
        },
    }
}

fn empty_digest(format: ResponseFormat) -> DigestContent {
    match format {
        ResponseFormat::Json => DigestContent::Structured(Vec::new()),
        ResponseFormat::Plain => DigestContent::Raw(String::new()),
    }
}
