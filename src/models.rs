//! Data models for scraped posts and the AI-selected digest.
//!
//! This module defines the structures flowing through the pipeline:
//! - [`Article`]: a forum post's title and absolute link, as scraped
//! - [`Recommendation`]: an AI-selected article enriched with a summary
//! - [`DigestContent`]: what the recommender hands to the notifier, in
//!   either structured or opaque form

use serde::{Deserialize, Serialize};

/// A scraped forum post: title plus absolute link.
///
/// Produced by the listing scraper and consumed by the recommender.
/// Lives only for the duration of one run; there is no identity beyond
/// the two fields and nothing is persisted.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Article {
    /// The post title, whitespace-trimmed.
    pub title: String,
    /// Absolute URL of the post.
    pub link: String,
}

/// An AI-selected article with a one-sentence summary attached.
///
/// The link is taken verbatim from the model's response. It is expected to
/// match one of the input [`Article`] links but is not verified.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Recommendation {
    pub title: String,
    pub link: String,
    pub summary: String,
}

/// The recommender's output, shaped by the configured response format.
///
/// `Structured` carries parsed recommendations from the JSON contract;
/// `Raw` carries the model's text untouched when the line-based contract
/// is in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestContent {
    Structured(Vec<Recommendation>),
    Raw(String),
}

impl DigestContent {
    /// True when there is nothing worth mailing.
    pub fn is_empty(&self) -> bool {
        match self {
            DigestContent::Structured(items) => items.is_empty(),
            DigestContent::Raw(text) => text.trim().is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_roundtrip() {
        let article = Article {
            title: "Some post".to_string(),
            link: "https://theqoo.net/square/123".to_string(),
        };
        let json = serde_json::to_string(&article).unwrap();
        let back: Article = serde_json::from_str(&json).unwrap();
        assert_eq!(back, article);
    }

    #[test]
    fn test_recommendation_deserialization() {
        let json = r#"{
            "title": "A",
            "link": "https://x/1",
            "summary": "about A"
        }"#;

        let rec: Recommendation = serde_json::from_str(json).unwrap();
        assert_eq!(rec.title, "A");
        assert_eq!(rec.link, "https://x/1");
        assert_eq!(rec.summary, "about A");
    }

    #[test]
    fn test_digest_content_empty_structured() {
        assert!(DigestContent::Structured(vec![]).is_empty());
        assert!(
            !DigestContent::Structured(vec![Recommendation {
                title: "t".to_string(),
                link: "l".to_string(),
                summary: "s".to_string(),
            }])
            .is_empty()
        );
    }

    #[test]
    fn test_digest_content_empty_raw() {
        assert!(DigestContent::Raw(String::new()).is_empty());
        assert!(DigestContent::Raw("  \n ".to_string()).is_empty());
        assert!(!DigestContent::Raw("1. [A]".to_string()).is_empty());
    }
}
