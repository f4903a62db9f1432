//! Collection pipeline orchestration.

use futures::stream::{self, StreamExt, TryStreamExt};
use tokio::sync::Semaphore;
use tweetsent_core::{EnrichedRecord, RawPost};
use tweetsent_timeline::{RateLimitedPaginator, Sleeper, TimelineSource};

use crate::error::PipelineError;
use crate::lexicon::LexiconScorer;
use crate::polarity::PolarityScorer;
use crate::record::RecordStage;

/// Tuning knobs for one pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Maximum lexicon-service calls in flight for one account. `1` scores
    /// strictly one record at a time.
    pub scoring_concurrency: usize,
    /// Maximum lexicon-service calls in flight across every account sharing
    /// this pipeline.
    pub lexicon_max_in_flight: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            scoring_concurrency: 1,
            lexicon_max_in_flight: 1,
        }
    }
}

/// Ordered, fully-enriched output for one account. `records[i]` derives from
/// the `i`-th fetched post.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub account: String,
    pub records: Vec<EnrichedRecord>,
}

impl Collection {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Fetches an account's posts and attaches both sentiment scores to each.
///
/// One pipeline is meant to be shared by every account of a batch: its
/// lexicon gate then bounds calls to the service, not just calls per account.
pub struct CollectionPipeline<S, Z, L, P> {
    paginator: RateLimitedPaginator<S, Z>,
    lexicon: L,
    polarity: P,
    options: PipelineOptions,
    lexicon_gate: Semaphore,
}

impl<S, Z, L, P> CollectionPipeline<S, Z, L, P>
where
    S: TimelineSource,
    Z: Sleeper,
    L: LexiconScorer,
    P: PolarityScorer,
{
    pub fn new(paginator: RateLimitedPaginator<S, Z>, lexicon: L, polarity: P) -> Self {
        Self {
            paginator,
            lexicon,
            polarity,
            options: PipelineOptions::default(),
            lexicon_gate: Semaphore::new(1),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.lexicon_gate = Semaphore::new(options.lexicon_max_in_flight.max(1));
        self.options = options;
        self
    }

    /// Runs the full pipeline for one account:
    ///
    /// 1. Fetch up to `limit` posts (sleeping through rate limits).
    /// 2. Normalize every post's text.
    /// 3. Attach lexicon-service probabilities, in position order.
    /// 4. Attach the discretized local polarity, in position order.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Timeline`] if fetching fails for any reason
    /// other than rate limiting, and [`PipelineError::Scoring`] on the first
    /// lexicon-service failure. No partial collection is returned.
    pub async fn run(&self, account: &str, limit: usize) -> Result<Collection, PipelineError> {
        let raw = self
            .paginator
            .fetch(account, limit)
            .await
            .map_err(|source| PipelineError::Timeline {
                account: account.to_owned(),
                source,
            })?;
        tracing::info!(account, fetched = raw.len(), limit, "timeline fetched");

        self.enrich(account, raw).await
    }

    /// Runs steps 2–4 on posts that were already fetched.
    ///
    /// # Errors
    ///
    /// See [`Self::run`].
    pub async fn enrich(
        &self,
        account: &str,
        raw: Vec<RawPost>,
    ) -> Result<Collection, PipelineError> {
        let normalized: Vec<RecordStage> = raw
            .into_iter()
            .map(|post| RecordStage::Raw(post).normalize())
            .collect();

        let scored = self.attach_lexicon(account, normalized).await?;

        let classified = scored.into_iter().map(|stage| {
            match stage.scoring_text().map(|text| self.polarity.classify(text)) {
                Some(class) => stage.with_polarity(class),
                None => stage,
            }
        });

        let records = classified
            .enumerate()
            .map(|(position, stage)| {
                stage
                    .into_enriched()
                    .map_err(|missing| PipelineError::IncompleteRecord {
                        account: account.to_owned(),
                        position,
                        missing,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(account, records = records.len(), "collection enriched");

        Ok(Collection {
            account: account.to_owned(),
            records,
        })
    }

    /// Scores every record with the lexicon service. Up to
    /// `scoring_concurrency` calls run at once; `buffered` yields results in
    /// input order so each score lands at its source position.
    async fn attach_lexicon(
        &self,
        account: &str,
        stages: Vec<RecordStage>,
    ) -> Result<Vec<RecordStage>, PipelineError> {
        let lexicon = &self.lexicon;
        let gate = &self.lexicon_gate;
        let concurrency = self.options.scoring_concurrency.max(1);

        stream::iter(stages.into_iter().enumerate())
            .map(move |(position, stage)| async move {
                let Some(text) = stage.scoring_text() else {
                    return Ok(stage);
                };
                // The gate is never closed, so `acquire` cannot fail.
                let permit = gate.acquire().await.ok();
                let result = lexicon.score(text).await;
                drop(permit);
                match result {
                    Ok(scores) => Ok(stage.with_lexicon(scores)),
                    Err(source) => {
                        tracing::error!(account, position, error = %source, "lexicon scoring failed");
                        Err(PipelineError::Scoring {
                            account: account.to_owned(),
                            position,
                            source,
                        })
                    }
                }
            })
            .buffered(concurrency)
            .try_collect()
            .await
    }
}
