//! Wire types for the v1.1 `statuses/user_timeline` endpoint and the
//! page/cursor shapes the paginator works with.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tweetsent_core::RawPost;

use crate::error::TimelineError;

/// Timestamp layout used by v1.1 status objects, e.g.
/// `Wed Aug 29 17:12:58 +0000 2018`.
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Opaque resume position within a timeline.
///
/// For the v1.1 API this is the `max_id` of the next request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCursor(String);

impl PageCursor {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PageCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of posts, newest first, plus where the following page starts.
///
/// An empty `posts` vec means the timeline is exhausted. `next_cursor` is
/// `None` when the source knows there is nothing after this page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelinePage {
    pub posts: Vec<RawPost>,
    pub next_cursor: Option<PageCursor>,
}

/// A status object as returned by the platform. Every field is optional on
/// the wire so that a missing field surfaces as
/// [`TimelineError::MalformedRecord`] instead of failing the whole page.
#[derive(Debug, Deserialize)]
pub(crate) struct WireStatus {
    pub id: Option<u64>,
    pub id_str: Option<String>,
    pub created_at: Option<String>,
    pub favorite_count: Option<u64>,
    pub retweet_count: Option<u64>,
    pub text: Option<String>,
}

/// Error envelope: `{"errors": [{"code": 88, "message": "Rate limit exceeded"}]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct WireErrorBody {
    #[serde(default)]
    pub errors: Vec<WireError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Platform error code for "Rate limit exceeded".
pub(crate) const RATE_LIMIT_ERROR_CODE: i64 = 88;

impl WireStatus {
    /// Converts a wire status into a [`RawPost`], refusing to default any field.
    pub(crate) fn into_raw_post(self) -> Result<RawPost, TimelineError> {
        let id = self
            .id_str
            .filter(|s| !s.is_empty())
            .or_else(|| self.id.map(|n| n.to_string()))
            .ok_or_else(|| TimelineError::MalformedRecord {
                post_id: "<unknown>".to_string(),
                field: "id",
            })?;

        let malformed = |field: &'static str| TimelineError::MalformedRecord {
            post_id: id.clone(),
            field,
        };

        let created_at = self
            .created_at
            .as_deref()
            .and_then(parse_created_at)
            .ok_or_else(|| malformed("created_at"))?;
        let favorite_count = self
            .favorite_count
            .ok_or_else(|| malformed("favorite_count"))?;
        let retweet_count = self
            .retweet_count
            .ok_or_else(|| malformed("retweet_count"))?;
        let text = self.text.ok_or_else(|| malformed("text"))?;

        Ok(RawPost {
            id,
            created_at,
            favorite_count,
            retweet_count,
            text,
        })
    }
}

fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, CREATED_AT_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Cursor for the page after `posts`: one below the smallest numeric id.
pub(crate) fn next_cursor_after(posts: &[RawPost]) -> Option<PageCursor> {
    posts
        .iter()
        .filter_map(|p| p.id.parse::<u64>().ok())
        .min()
        .and_then(|min| min.checked_sub(1))
        .map(|max_id| PageCursor::new(max_id.to_string()))
}
