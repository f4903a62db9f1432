use thiserror::Error;
use tweetsent_timeline::TimelineError;

/// Failures from a sentiment scorer. Never replaced by a default score.
#[derive(Debug, Error)]
pub enum SentimentError {
    /// Network or TLS failure talking to the lexicon service.
    #[error("lexicon service HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("lexicon service returned HTTP {status}")]
    LexiconStatus { status: u16 },

    /// The body arrived but does not carry three usable probabilities.
    #[error("lexicon service response unusable: {0}")]
    LexiconResponse(String),

    #[error("invalid lexicon service URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Failure of one account's pipeline run.
///
/// Platform and scoring failures stay distinct so callers can choose to skip
/// the account or abort the whole batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("timeline fetch failed for {account}: {source}")]
    Timeline {
        account: String,
        #[source]
        source: TimelineError,
    },

    #[error("scoring failed for {account} at record {position}: {source}")]
    Scoring {
        account: String,
        position: usize,
        #[source]
        source: SentimentError,
    },

    /// A record reached the export boundary without every field populated.
    #[error("record {position} for {account} is incomplete: missing {missing}")]
    IncompleteRecord {
        account: String,
        position: usize,
        missing: &'static str,
    },
}

impl PipelineError {
    /// `true` when the failure came from a scorer rather than the platform.
    #[must_use]
    pub fn is_scoring_failure(&self) -> bool {
        matches!(self, Self::Scoring { .. })
    }

    #[must_use]
    pub fn account(&self) -> &str {
        match self {
            Self::Timeline { account, .. }
            | Self::Scoring { account, .. }
            | Self::IncompleteRecord { account, .. } => account,
        }
    }
}
