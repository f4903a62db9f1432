//! Sentiment enrichment pipeline for tweetsent.
//!
//! Normalizes post text, scores it with a remote lexicon service and a local
//! polarity analyzer, and merges both into one ordered record per post.

pub mod error;
pub mod lexicon;
pub mod normalize;
pub mod pipeline;
pub mod polarity;
pub mod record;

mod retry;

pub use error::{PipelineError, SentimentError};
pub use lexicon::{parse_lexicon_response, LexiconScorer, TextProcessingClient, DEFAULT_LEXICON_URL};
pub use normalize::normalize;
pub use pipeline::{Collection, CollectionPipeline, PipelineOptions};
pub use polarity::{PatternPolarity, PolarityScorer};
pub use record::{NormalizedPost, RecordStage};
