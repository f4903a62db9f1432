//! Remote lexicon-based sentiment scoring.
//!
//! [`TextProcessingClient`] posts text to a text-processing style sentiment
//! endpoint and reads the `probability` object from the reply:
//!
//! ```text
//! {"probability": {"neg": 0.31, "neutral": 0.85, "pos": 0.69}, "label": "neutral"}
//! ```

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use tweetsent_core::LexiconScores;

use crate::error::SentimentError;
use crate::retry::retry_with_backoff;

pub const DEFAULT_LEXICON_URL: &str = "http://text-processing.com/api/sentiment/";

/// Scores one cleaned text into a positive/neutral/negative distribution.
#[async_trait::async_trait]
pub trait LexiconScorer: Send + Sync {
    async fn score(&self, text: &str) -> Result<LexiconScores, SentimentError>;
}

#[derive(Deserialize)]
struct SentimentResponse {
    probability: Option<Probability>,
}

#[derive(Deserialize)]
struct Probability {
    pos: Option<ProbValue>,
    neutral: Option<ProbValue>,
    neg: Option<ProbValue>,
}

/// The service sends numbers; numeric strings are accepted as well.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProbValue {
    Number(f64),
    Text(String),
}

impl ProbValue {
    fn value(&self, field: &str) -> Result<f64, SentimentError> {
        let v = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().map_err(|e| {
                SentimentError::LexiconResponse(format!("probability.{field} '{s}': {e}"))
            })?,
        };
        if !(0.0..=1.0).contains(&v) {
            return Err(SentimentError::LexiconResponse(format!(
                "probability.{field} = {v} is outside [0, 1]"
            )));
        }
        Ok(v)
    }
}

/// Parses a service reply into [`LexiconScores`].
///
/// # Errors
///
/// Returns [`SentimentError::LexiconResponse`] when the body is not JSON,
/// lacks any of the three probabilities, or carries one outside `[0, 1]`.
pub fn parse_lexicon_response(body: &str) -> Result<LexiconScores, SentimentError> {
    let parsed: SentimentResponse = serde_json::from_str(body)
        .map_err(|e| SentimentError::LexiconResponse(format!("invalid JSON: {e}")))?;
    let probability = parsed
        .probability
        .ok_or_else(|| SentimentError::LexiconResponse("missing `probability`".to_string()))?;

    let field = |p: Option<&ProbValue>, name: &str| -> Result<f64, SentimentError> {
        p.ok_or_else(|| SentimentError::LexiconResponse(format!("missing probability.{name}")))?
            .value(name)
    };

    Ok(LexiconScores {
        positive: field(probability.pos.as_ref(), "pos")?,
        neutral: field(probability.neutral.as_ref(), "neutral")?,
        negative: field(probability.neg.as_ref(), "neg")?,
    })
}

/// HTTP client for the remote lexicon sentiment service.
pub struct TextProcessingClient {
    client: Client,
    url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl TextProcessingClient {
    /// Creates a client for the sentiment endpoint at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`SentimentError::InvalidUrl`] if `url` does not parse.
    pub fn new(url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SentimentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let parsed = Url::parse(url).map_err(|e| SentimentError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            url: parsed,
            max_retries: 0,
            backoff_base_ms: 1_000,
        })
    }

    /// Retries transient failures (timeouts, connect errors, 5xx) up to
    /// `max_retries` times with jittered exponential back-off.
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    async fn score_once(&self, text: &str) -> Result<LexiconScores, SentimentError> {
        let response = self
            .client
            .post(self.url.clone())
            .form(&[("text", text)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SentimentError::LexiconStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_lexicon_response(&body)
    }
}

#[async_trait::async_trait]
impl LexiconScorer for TextProcessingClient {
    async fn score(&self, text: &str) -> Result<LexiconScores, SentimentError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || self.score_once(text)).await
    }
}
