//! Collection command handler for the CLI.
//!
//! Each selected account runs through the full pipeline and lands in its own
//! CSV file. Accounts are independent; up to `max_concurrent_accounts` run
//! at once.

use std::path::{Path, PathBuf};

use clap::Args;
use futures::stream::{self, StreamExt};
use tweetsent_core::{AccountGroups, AppConfig, CollectSettings};
use tweetsent_sentiment::{
    CollectionPipeline, LexiconScorer, PatternPolarity, PipelineError, PipelineOptions,
    PolarityScorer, TextProcessingClient,
};
use tweetsent_timeline::{
    CooldownPolicy, RateLimitedPaginator, Sleeper, TimelineSource, TokioSleeper, TwitterClient,
};

use crate::export;

#[derive(Debug, Args)]
pub(crate) struct CollectArgs {
    /// Restrict collection to one account group (by name)
    #[arg(long, conflicts_with = "account")]
    pub(crate) group: Option<String>,

    /// Collect only this handle; repeat for several
    #[arg(long, value_name = "HANDLE")]
    pub(crate) account: Vec<String>,

    /// Maximum posts per account (overrides TWEETSENT_ITEM_LIMIT)
    #[arg(long)]
    pub(crate) limit: Option<usize>,

    /// Account groups file (overrides TWEETSENT_ACCOUNTS_PATH)
    #[arg(long, value_name = "PATH")]
    pub(crate) accounts: Option<PathBuf>,

    /// Export directory (overrides TWEETSENT_OUTPUT_DIR)
    #[arg(long, value_name = "DIR")]
    pub(crate) output_dir: Option<PathBuf>,

    /// Log failed accounts and keep going instead of aborting the batch
    #[arg(long)]
    pub(crate) continue_on_error: bool,

    /// Print what would be collected without calling any remote service;
    /// platform credentials are not required
    #[arg(long)]
    pub(crate) dry_run: bool,
}

type LivePipeline = CollectionPipeline<TwitterClient, TokioSleeper, TextProcessingClient, PatternPolarity>;

/// What a `collect` invocation will do, after flags override settings.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct CollectPlan {
    pub handles: Vec<String>,
    pub limit: usize,
    pub output_dir: PathBuf,
}

/// Totals for one `collect` invocation.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub records: usize,
}

/// Resolves which handles to collect.
///
/// Explicit `--account` handles must be configured in some group; they are
/// returned in the configured spelling. Otherwise a `--group` selects that
/// group's handles, and with neither every configured handle is used once.
pub(crate) fn select_handles(
    groups: &AccountGroups,
    group: Option<&str>,
    explicit: &[String],
) -> anyhow::Result<Vec<String>> {
    let configured = groups.handles();

    if !explicit.is_empty() {
        let mut selected: Vec<String> = Vec::with_capacity(explicit.len());
        for wanted in explicit {
            let Some(found) = configured.iter().find(|h| h.eq_ignore_ascii_case(wanted)) else {
                anyhow::bail!("account '{wanted}' is not in any configured group");
            };
            if !selected.iter().any(|s| s == found) {
                selected.push((*found).to_string());
            }
        }
        return Ok(selected);
    }

    if let Some(name) = group {
        let found = groups
            .group(name)
            .ok_or_else(|| anyhow::anyhow!("account group '{name}' not found"))?;
        return Ok(found.accounts.clone());
    }

    Ok(configured.into_iter().map(str::to_string).collect())
}

/// Builds the production pipeline from configuration.
fn build_pipeline(config: &AppConfig) -> anyhow::Result<LivePipeline> {
    let twitter = TwitterClient::with_base_url(
        config.credentials.clone(),
        config.request_timeout_secs,
        &config.user_agent,
        &config.twitter_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build Twitter client: {e}"))?
    .with_page_size(config.page_size);

    let paginator = RateLimitedPaginator::new(
        twitter,
        CooldownPolicy::from_secs(config.rate_limit_cooldown_secs),
    );

    let lexicon = TextProcessingClient::new(
        &config.lexicon_url,
        config.request_timeout_secs,
        &config.user_agent,
    )
    .map_err(|e| anyhow::anyhow!("failed to build lexicon client: {e}"))?
    .with_retries(config.lexicon_max_retries, config.lexicon_retry_backoff_base_ms);

    Ok(
        CollectionPipeline::new(paginator, lexicon, PatternPolarity).with_options(PipelineOptions {
            scoring_concurrency: config.scoring_concurrency,
            lexicon_max_in_flight: config.lexicon_max_in_flight,
        }),
    )
}

/// Resolves handles, limit and output directory for a run.
///
/// # Errors
///
/// Returns an error if the account file is unusable or the selection is empty.
pub(crate) fn plan_collect(settings: &CollectSettings, args: &CollectArgs) -> anyhow::Result<CollectPlan> {
    let accounts_path = args
        .accounts
        .clone()
        .unwrap_or_else(|| settings.accounts_path.clone());
    let groups = tweetsent_core::load_account_groups(&accounts_path)?;
    let handles = select_handles(&groups, args.group.as_deref(), &args.account)?;
    if handles.is_empty() {
        anyhow::bail!("no accounts selected for collection");
    }

    Ok(CollectPlan {
        handles,
        limit: args.limit.unwrap_or(settings.item_limit),
        output_dir: args
            .output_dir
            .clone()
            .unwrap_or_else(|| settings.output_dir.clone()),
    })
}

pub(crate) fn describe_dry_run(plan: &CollectPlan) -> String {
    format!(
        "dry-run: would collect up to {} posts for {} accounts into {}: [{}]",
        plan.limit,
        plan.handles.len(),
        plan.output_dir.display(),
        plan.handles.join(", ")
    )
}

/// Runs `tweetsent collect --dry-run`. Needs no credentials and makes no
/// remote calls.
///
/// # Errors
///
/// See [`plan_collect`].
pub(crate) fn run_dry_run(settings: &CollectSettings, args: &CollectArgs) -> anyhow::Result<()> {
    let plan = plan_collect(settings, args)?;
    println!("{}", describe_dry_run(&plan));
    Ok(())
}

/// Runs `tweetsent collect`.
///
/// # Errors
///
/// Returns an error if planning fails, a client cannot be built, or the
/// batch fails (see [`run_accounts`]).
pub(crate) async fn run_collect(config: &AppConfig, args: &CollectArgs) -> anyhow::Result<()> {
    let plan = plan_collect(&config.collect_settings(), args)?;
    let pipeline = build_pipeline(config)?;
    let summary = run_accounts(
        &pipeline,
        &plan.handles,
        plan.limit,
        &plan.output_dir,
        config.max_concurrent_accounts,
        args.continue_on_error,
    )
    .await?;

    println!(
        "collected {} records for {} accounts ({} failed)",
        summary.records, summary.succeeded, summary.failed
    );
    Ok(())
}

/// Collects and exports every handle, at most `max_concurrent` at a time.
///
/// Without `continue_on_error` the first failed account aborts the batch and
/// in-flight accounts are dropped. With it, failures are logged and counted,
/// and the batch fails only if every account failed.
///
/// # Errors
///
/// See above.
pub(crate) async fn run_accounts<S, Z, L, P>(
    pipeline: &CollectionPipeline<S, Z, L, P>,
    handles: &[String],
    limit: usize,
    output_dir: &Path,
    max_concurrent: usize,
    continue_on_error: bool,
) -> anyhow::Result<BatchSummary>
where
    S: TimelineSource,
    Z: Sleeper,
    L: LexiconScorer,
    P: PolarityScorer,
{
    let mut outcomes = stream::iter(handles)
        .map(move |handle| async move {
            let result = collect_account(pipeline, handle, limit, output_dir).await;
            (handle, result)
        })
        .buffer_unordered(max_concurrent.max(1));

    let mut summary = BatchSummary::default();
    while let Some((handle, result)) = outcomes.next().await {
        match result {
            Ok(rows) => {
                summary.succeeded += 1;
                summary.records += rows;
            }
            Err(e) if !continue_on_error => {
                return Err(e.context(format!("collection aborted at account '{handle}'")));
            }
            Err(e) => {
                tracing::error!(account = %handle, error = %format!("{e:#}"), "account failed; continuing");
                summary.failed += 1;
            }
        }
    }

    if summary.failed > 0 {
        tracing::warn!(
            failed_accounts = summary.failed,
            total_accounts = handles.len(),
            "some accounts failed during collection"
        );
        if summary.failed == handles.len() {
            anyhow::bail!("all {} accounts failed collection", summary.failed);
        }
    }

    Ok(summary)
}

async fn collect_account<S, Z, L, P>(
    pipeline: &CollectionPipeline<S, Z, L, P>,
    handle: &str,
    limit: usize,
    output_dir: &Path,
) -> anyhow::Result<usize>
where
    S: TimelineSource,
    Z: Sleeper,
    L: LexiconScorer,
    P: PolarityScorer,
{
    println!("collecting posts for {handle}");
    tracing::info!(account = %handle, limit, "collecting posts");

    let collection = pipeline.run(handle, limit).await.inspect_err(|e: &PipelineError| {
        tracing::error!(
            account = %handle,
            scoring_failure = e.is_scoring_failure(),
            error = %e,
            "pipeline run failed"
        );
    })?;

    let path = export::export_collection(output_dir, &collection)?;
    tracing::info!(
        account = %handle,
        rows = collection.len(),
        path = %path.display(),
        "collection exported"
    );
    Ok(collection.len())
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;
