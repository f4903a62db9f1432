//! HTTP client for the platform's v1.1 user-timeline endpoint.
//!
//! Wraps `reqwest` with OAuth 1.0a signing, rate-limit detection, and typed
//! status deserialization. Implements [`TimelineSource`] so the paginator can
//! drive it.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use tweetsent_core::TwitterCredentials;

use crate::error::TimelineError;
use crate::oauth::OAuthSigner;
use crate::paginator::TimelineSource;
use crate::types::{
    next_cursor_after, PageCursor, TimelinePage, WireErrorBody, WireStatus,
    RATE_LIMIT_ERROR_CODE,
};

const DEFAULT_BASE_URL: &str = "https://api.twitter.com/1.1/";
const USER_TIMELINE_PATH: &str = "statuses/user_timeline.json";

/// Largest `count` the user-timeline endpoint honours.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Client for the platform REST API.
///
/// Use [`TwitterClient::new`] for production or
/// [`TwitterClient::with_base_url`] to point at a mock server in tests.
pub struct TwitterClient {
    client: Client,
    signer: OAuthSigner,
    base_url: Url,
    page_size: u32,
}

impl TwitterClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        credentials: TwitterCredentials,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, TimelineError> {
        Self::with_base_url(credentials, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`TimelineError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        credentials: TwitterCredentials,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, TimelineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends rather than replaces
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| TimelineError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            signer: OAuthSigner::new(credentials),
            base_url,
            page_size: MAX_PAGE_SIZE,
        })
    }

    /// Sets how many posts each page request asks for, clamped to `1..=200`.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Builds the user-timeline URL for `account`, resuming at `cursor`.
    fn timeline_url(&self, account: &str, cursor: Option<&PageCursor>) -> Result<Url, TimelineError> {
        let mut url = self
            .base_url
            .join(USER_TIMELINE_PATH)
            .map_err(|e| TimelineError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("screen_name", account);
            pairs.append_pair("count", &self.page_size.to_string());
            pairs.append_pair("include_entities", "true");
            pairs.append_pair("lang", "en");
            if let Some(c) = cursor {
                pairs.append_pair("max_id", c.as_str());
            }
        }
        Ok(url)
    }

    /// Sends one signed page request and classifies the response.
    async fn request_page(&self, account: &str, url: &Url) -> Result<Vec<WireStatus>, TimelineError> {
        let auth = self.signer.authorization_header("GET", url)?;
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::AUTHORIZATION, auth)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TimelineError::RateLimited {
                account: account.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(Self::classify_error(account, status, &body));
        }

        serde_json::from_str(&body).map_err(|e| TimelineError::Deserialize {
            context: format!("user_timeline(screen_name={account})"),
            source: e,
        })
    }

    /// Maps a non-2xx body to `RateLimited` when it carries error code 88,
    /// otherwise to [`TimelineError::Api`].
    fn classify_error(account: &str, status: StatusCode, body: &str) -> TimelineError {
        let parsed = serde_json::from_str::<WireErrorBody>(body).ok();
        let errors = parsed.map(|b| b.errors).unwrap_or_default();

        if errors.iter().any(|e| e.code == RATE_LIMIT_ERROR_CODE) {
            return TimelineError::RateLimited {
                account: account.to_owned(),
            };
        }

        let message = errors
            .first()
            .map_or_else(|| body.chars().take(200).collect(), |e| e.message.clone());

        TimelineError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait::async_trait]
impl TimelineSource for TwitterClient {
    async fn fetch_page(
        &self,
        account: &str,
        cursor: Option<&PageCursor>,
    ) -> Result<TimelinePage, TimelineError> {
        let url = self.timeline_url(account, cursor)?;
        let statuses = self.request_page(account, &url).await?;

        let posts = statuses
            .into_iter()
            .map(WireStatus::into_raw_post)
            .collect::<Result<Vec<_>, _>>()?;
        let next_cursor = next_cursor_after(&posts);

        Ok(TimelinePage { posts, next_cursor })
    }
}
