//! Gemini API interaction.
//!
//! This module provides the single seam between the pipeline and the
//! generative-AI service:
//! - [`GenerateAsync`]: core trait for one-shot prompt completion, so the
//!   recommender can be exercised against a canned client in tests
//! - [`GeminiClient`]: reqwest-based implementation of the Gemini
//!   `generateContent` REST API
//!
//! One run performs exactly one generation call. There is no retry and no
//! streaming; a failed call surfaces as an error that the caller degrades
//! to an empty digest.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Default public endpoint for the Gemini REST API.
const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Model used for selection and summarization.
const GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Trait for one-shot async text generation.
///
/// Implementors take a prompt and return the model's full text response.
pub trait GenerateAsync {
    /// Send a prompt to the model and receive its text response.
    async fn generate(&self, prompt: &str) -> Result<String, Box<dyn Error>>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Client for the Gemini `generateContent` endpoint.
///
/// Holds a configured reqwest client plus the API key. The endpoint is
/// overridable so tests can point the client at a local mock server.
#[derive(Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    /// Build a client against the public Gemini endpoint.
    pub fn new(api_key: String) -> Result<Self, Box<dyn Error>> {
        Self::with_endpoint(api_key, GEMINI_ENDPOINT.to_string())
    }

    /// Build a client against a custom endpoint base URL.
    pub fn with_endpoint(api_key: String, endpoint: String) -> Result<Self, Box<dyn Error>> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            http,
            api_key,
            model: GEMINI_MODEL.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }
}

impl GenerateAsync for GeminiClient {
    #[instrument(level = "info", skip_all)]
    async fn generate(&self, prompt: &str) -> Result<String, Box<dyn Error>> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let t0 = Instant::now();
        let result = self
            .http
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .and_then(|resp| resp.error_for_status());
        let dt = t0.elapsed();

        let response = match result {
            Ok(resp) => resp,
            Err(e) => {
                warn!(elapsed_ms = dt.as_millis() as u128, error = %e, "Gemini call failed");
                return Err(Box::new(e));
            }
        };

        let body: GenerateResponse = response.json().await?;
        let text = body
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        info!(
            elapsed_ms = dt.as_millis() as u128,
            bytes = text.len(),
            "Gemini call succeeded"
        );
        Ok(text)
    }
}
