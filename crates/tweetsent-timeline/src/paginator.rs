//! Bounded, lazily-fetched, rate-limit tolerant timeline iteration.

use std::collections::VecDeque;

use tweetsent_core::RawPost;

use crate::error::TimelineError;
use crate::retry::{retry_on_rate_limit, CooldownPolicy, Sleeper, TokioSleeper};
use crate::types::{PageCursor, TimelinePage};

/// Abstraction over the platform's paginated timeline, enabling testability.
///
/// Implementations return [`TimelineError::RateLimited`] when the platform
/// asks for a back-off and an empty page when the timeline is exhausted.
#[async_trait::async_trait]
pub trait TimelineSource: Send + Sync {
    async fn fetch_page(
        &self,
        account: &str,
        cursor: Option<&PageCursor>,
    ) -> Result<TimelinePage, TimelineError>;
}

/// Wraps a [`TimelineSource`] and yields posts in fetch order, absorbing
/// rate-limit signals by sleeping and retrying the same cursor.
///
/// Holds no per-account state, so one paginator can serve concurrent
/// fetches for different accounts.
pub struct RateLimitedPaginator<S, Z = TokioSleeper> {
    source: S,
    policy: CooldownPolicy,
    sleeper: Z,
}

impl<S: TimelineSource> RateLimitedPaginator<S, TokioSleeper> {
    pub fn new(source: S, policy: CooldownPolicy) -> Self {
        Self::with_sleeper(source, policy, TokioSleeper)
    }
}

impl<S: TimelineSource, Z: Sleeper> RateLimitedPaginator<S, Z> {
    pub fn with_sleeper(source: S, policy: CooldownPolicy, sleeper: Z) -> Self {
        Self {
            source,
            policy,
            sleeper,
        }
    }

    pub fn policy(&self) -> CooldownPolicy {
        self.policy
    }

    /// Starts a lazy walk over `account`'s timeline. No request is made until
    /// the first [`TimelineCursor::next_post`] call.
    pub fn posts<'a>(&'a self, account: &'a str) -> TimelineCursor<'a, S, Z> {
        TimelineCursor {
            paginator: self,
            account,
            buffer: VecDeque::new(),
            next: None,
            exhausted: false,
        }
    }

    /// Collects up to `limit` posts for `account`, oldest cursor position
    /// first. Returns fewer when the timeline runs out; that is not an error.
    ///
    /// May block for multiples of the cooldown when the platform rate-limits.
    ///
    /// # Errors
    ///
    /// Returns any [`TimelineError`] other than `RateLimited`, e.g. a
    /// malformed post or an authorization failure.
    pub async fn fetch(&self, account: &str, limit: usize) -> Result<Vec<RawPost>, TimelineError> {
        let mut posts = Vec::with_capacity(limit.min(1_000));
        if limit == 0 {
            return Ok(posts);
        }

        let mut cursor = self.posts(account);
        while posts.len() < limit {
            match cursor.next_post().await? {
                Some(post) => posts.push(post),
                None => {
                    tracing::info!(
                        account,
                        fetched = posts.len(),
                        limit,
                        "timeline exhausted before limit"
                    );
                    break;
                }
            }
        }

        Ok(posts)
    }
}

/// A resumable position in one account's timeline.
pub struct TimelineCursor<'a, S, Z> {
    paginator: &'a RateLimitedPaginator<S, Z>,
    account: &'a str,
    buffer: VecDeque<RawPost>,
    next: Option<PageCursor>,
    exhausted: bool,
}

impl<S: TimelineSource, Z: Sleeper> TimelineCursor<'_, S, Z> {
    /// Returns the next post, fetching another page when the buffer is empty.
    ///
    /// `Ok(None)` marks the end of the timeline.
    ///
    /// # Errors
    ///
    /// Propagates non-rate-limit [`TimelineError`]s from the source.
    pub async fn next_post(&mut self) -> Result<Option<RawPost>, TimelineError> {
        loop {
            if let Some(post) = self.buffer.pop_front() {
                return Ok(Some(post));
            }
            if self.exhausted {
                return Ok(None);
            }
            self.fill().await?;
        }
    }

    async fn fill(&mut self) -> Result<(), TimelineError> {
        let p = self.paginator;
        let account = self.account;
        let cursor = self.next.clone();

        let page = retry_on_rate_limit(p.policy, &p.sleeper, account, || {
            p.source.fetch_page(account, cursor.as_ref())
        })
        .await?;

        tracing::debug!(
            account,
            cursor = cursor.as_ref().map(PageCursor::as_str),
            posts = page.posts.len(),
            "fetched timeline page"
        );

        if page.posts.is_empty() || page.next_cursor.is_none() {
            self.exhausted = true;
        }
        self.next = page.next_cursor;
        self.buffer.extend(page.posts);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use chrono::{TimeZone, Utc};

    use super::*;

    fn post(id: u64) -> RawPost {
        RawPost {
            id: id.to_string(),
            created_at: Utc.with_ymd_and_hms(2018, 8, 30, 19, 24, 47).unwrap(),
            favorite_count: id,
            retweet_count: 0,
            text: format!("post {id}"),
        }
    }

    /// Serves `total` posts in pages of `page_size`, with the cursor being the
    /// index of the next post. Pops one scripted rate-limit per matching call
    /// number.
    struct ScriptedSource {
        total: u64,
        page_size: u64,
        rate_limit_on_calls: Vec<usize>,
        calls: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedSource {
        fn new(total: u64, page_size: u64) -> Self {
            Self {
                total,
                page_size,
                rate_limit_on_calls: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl TimelineSource for ScriptedSource {
        async fn fetch_page(
            &self,
            account: &str,
            cursor: Option<&PageCursor>,
        ) -> Result<TimelinePage, TimelineError> {
            let call_no = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(cursor.map(|c| c.as_str().to_owned()));
                calls.len()
            };
            if self.rate_limit_on_calls.contains(&call_no) {
                return Err(TimelineError::RateLimited {
                    account: account.to_owned(),
                });
            }

            let start: u64 = cursor.map_or(0, |c| c.as_str().parse().unwrap());
            let end = (start + self.page_size).min(self.total);
            let posts: Vec<RawPost> = (start..end).map(post).collect();
            let next_cursor = (end < self.total).then(|| PageCursor::new(end.to_string()));
            Ok(TimelinePage { posts, next_cursor })
        }
    }

    #[derive(Default)]
    struct RecordingSleeper {
        slept: Mutex<Vec<Duration>>,
    }

    #[async_trait::async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.slept.lock().unwrap().push(duration);
        }
    }

    fn paginator(source: ScriptedSource) -> RateLimitedPaginator<ScriptedSource, RecordingSleeper> {
        RateLimitedPaginator::with_sleeper(source, CooldownPolicy::default(), RecordingSleeper::default())
    }

    fn ids(posts: &[RawPost]) -> Vec<String> {
        posts.iter().map(|p| p.id.clone()).collect()
    }

    #[tokio::test]
    async fn fetches_exactly_limit_across_pages() {
        let p = paginator(ScriptedSource::new(10, 3));
        let posts = p.fetch("ossoff", 7).await.unwrap();
        assert_eq!(ids(&posts), vec!["0", "1", "2", "3", "4", "5", "6"]);
        // 3 + 3 + 3 covers 7; no fourth page.
        assert_eq!(p.source.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn returns_partial_collection_when_source_runs_out() {
        let p = paginator(ScriptedSource::new(4, 3));
        let posts = p.fetch("ossoff", 500).await.unwrap();
        assert_eq!(posts.len(), 4);
        assert_eq!(ids(&posts), vec!["0", "1", "2", "3"]);
    }

    #[tokio::test]
    async fn empty_timeline_yields_empty_collection() {
        let p = paginator(ScriptedSource::new(0, 3));
        let posts = p.fetch("ossoff", 10).await.unwrap();
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn zero_limit_makes_no_requests() {
        let p = paginator(ScriptedSource::new(10, 3));
        let posts = p.fetch("ossoff", 0).await.unwrap();
        assert!(posts.is_empty());
        assert!(p.source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rate_limit_mid_pagination_neither_drops_nor_duplicates() {
        let baseline = paginator(ScriptedSource::new(9, 3))
            .fetch("ossoff", 9)
            .await
            .unwrap();

        let mut source = ScriptedSource::new(9, 3);
        source.rate_limit_on_calls = vec![2];
        let p = paginator(source);
        let posts = p.fetch("ossoff", 9).await.unwrap();

        assert_eq!(posts, baseline);
        assert_eq!(
            *p.sleeper.slept.lock().unwrap(),
            vec![Duration::from_secs(15 * 60)]
        );
        // The retried call reuses the cursor of the rate-limited one.
        let calls = p.source.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                None,
                Some("3".to_owned()),
                Some("3".to_owned()),
                Some("6".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn repeated_rate_limits_on_first_page_keep_waiting() {
        let mut source = ScriptedSource::new(2, 5);
        source.rate_limit_on_calls = vec![1, 2, 3];
        let p = paginator(source);
        let posts = p.fetch("ossoff", 5).await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(p.sleeper.slept.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn non_rate_limit_errors_propagate() {
        struct Failing;

        #[async_trait::async_trait]
        impl TimelineSource for Failing {
            async fn fetch_page(
                &self,
                _account: &str,
                _cursor: Option<&PageCursor>,
            ) -> Result<TimelinePage, TimelineError> {
                Err(TimelineError::MalformedRecord {
                    post_id: "9".to_owned(),
                    field: "text",
                })
            }
        }

        let p = RateLimitedPaginator::with_sleeper(
            Failing,
            CooldownPolicy::default(),
            RecordingSleeper::default(),
        );
        let err = p.fetch("ossoff", 3).await.unwrap_err();
        assert!(matches!(err, TimelineError::MalformedRecord { field: "text", .. }));
    }

    #[tokio::test]
    async fn cursor_is_lazy_until_polled() {
        let p = paginator(ScriptedSource::new(5, 2));
        let mut cursor = p.posts("ossoff");
        assert!(p.source.calls.lock().unwrap().is_empty());
        let first = cursor.next_post().await.unwrap().unwrap();
        assert_eq!(first.id, "0");
        assert_eq!(p.source.calls.lock().unwrap().len(), 1);
    }
}
