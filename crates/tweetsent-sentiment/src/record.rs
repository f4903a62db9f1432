//! Per-post state as it moves through the enrichment passes.

use chrono::{DateTime, Utc};
use tweetsent_core::{EnrichedRecord, LexiconScores, PolarityClass, RawPost};

use crate::normalize::normalize;

/// A post whose text has been cleaned, with scores attached as each pass
/// completes.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPost {
    pub id: String,
    pub date: DateTime<Utc>,
    pub favorite_count: u64,
    pub retweet_count: u64,
    pub text: String,
    pub lexicon: Option<LexiconScores>,
    pub polarity: Option<PolarityClass>,
}

impl From<RawPost> for NormalizedPost {
    fn from(raw: RawPost) -> Self {
        Self {
            id: raw.id,
            date: raw.created_at,
            favorite_count: raw.favorite_count,
            retweet_count: raw.retweet_count,
            text: normalize(&raw.text),
            lexicon: None,
            polarity: None,
        }
    }
}

/// Where a record is in the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordStage {
    Raw(RawPost),
    Normalized(NormalizedPost),
    Enriched(EnrichedRecord),
}

impl RecordStage {
    /// Cleans the text of a raw record. Later stages pass through unchanged.
    #[must_use]
    pub fn normalize(self) -> Self {
        match self {
            Self::Raw(raw) => Self::Normalized(raw.into()),
            other => other,
        }
    }

    /// Text the scorers should see, once normalized.
    #[must_use]
    pub fn scoring_text(&self) -> Option<&str> {
        match self {
            Self::Normalized(post) => Some(&post.text),
            Self::Raw(_) | Self::Enriched(_) => None,
        }
    }

    #[must_use]
    pub fn with_lexicon(self, scores: LexiconScores) -> Self {
        match self {
            Self::Normalized(mut post) => {
                post.lexicon = Some(scores);
                Self::Normalized(post).promote()
            }
            other => other,
        }
    }

    #[must_use]
    pub fn with_polarity(self, class: PolarityClass) -> Self {
        match self {
            Self::Normalized(mut post) => {
                post.polarity = Some(class);
                Self::Normalized(post).promote()
            }
            other => other,
        }
    }

    /// Moves a normalized record with every score present to `Enriched`.
    fn promote(self) -> Self {
        match self {
            Self::Normalized(NormalizedPost {
                date,
                favorite_count,
                retweet_count,
                text,
                lexicon: Some(lexicon),
                polarity: Some(polarity_class),
                ..
            }) => Self::Enriched(EnrichedRecord {
                date,
                favorite_count,
                retweet_count,
                text,
                lexicon_positive: lexicon.positive,
                lexicon_neutral: lexicon.neutral,
                lexicon_negative: lexicon.negative,
                polarity_class,
            }),
            other => other,
        }
    }

    /// Releases the fully-enriched record, or names the first missing piece.
    ///
    /// # Errors
    ///
    /// Returns the name of what is missing when the record has not been
    /// normalized or has not received both scores.
    pub fn into_enriched(self) -> Result<EnrichedRecord, &'static str> {
        match self {
            Self::Enriched(record) => Ok(record),
            Self::Raw(_) => Err("normalized text"),
            Self::Normalized(post) if post.lexicon.is_none() => Err("lexicon scores"),
            Self::Normalized(_) => Err("polarity class"),
        }
    }
}
