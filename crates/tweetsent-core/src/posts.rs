//! Post records as they move from the platform to the exported dataset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One post exactly as fetched from the platform timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPost {
    /// Platform post id, unique per post.
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub favorite_count: u64,
    pub retweet_count: u64,
    pub text: String,
}

/// Class probabilities returned by the remote lexicon service.
///
/// The three values are each in `[0.0, 1.0]` but are not required to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LexiconScores {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

/// Discretized sign of a continuous polarity value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum PolarityClass {
    Negative,
    Neutral,
    Positive,
}

impl PolarityClass {
    /// Maps a polarity value onto its class: `> 0` is positive, exactly `0`
    /// is neutral, `< 0` is negative. There is no dead-zone band.
    ///
    /// `NaN` compares neither greater nor less than zero and lands on
    /// [`PolarityClass::Negative`], matching the fall-through of the
    /// comparison chain.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn from_polarity(value: f64) -> Self {
        if value > 0.0 {
            Self::Positive
        } else if value == 0.0 {
            Self::Neutral
        } else {
            Self::Negative
        }
    }

    #[must_use]
    pub fn as_i8(self) -> i8 {
        match self {
            Self::Negative => -1,
            Self::Neutral => 0,
            Self::Positive => 1,
        }
    }
}

impl From<PolarityClass> for i8 {
    fn from(class: PolarityClass) -> Self {
        class.as_i8()
    }
}

impl TryFrom<i8> for PolarityClass {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Negative),
            0 => Ok(Self::Neutral),
            1 => Ok(Self::Positive),
            other => Err(format!("polarity class must be -1, 0 or 1, got {other}")),
        }
    }
}

impl std::fmt::Display for PolarityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}

/// A post with normalized text and both sentiment scores attached.
///
/// Every field is populated; records only reach this shape once all
/// enrichment passes have succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub date: DateTime<Utc>,
    pub favorite_count: u64,
    pub retweet_count: u64,
    pub text: String,
    pub lexicon_positive: f64,
    pub lexicon_neutral: f64,
    pub lexicon_negative: f64,
    pub polarity_class: PolarityClass,
}
