//! Platform timeline access for tweetsent.
//!
//! [`TwitterClient`] issues OAuth 1.0a signed `statuses/user_timeline`
//! requests and implements the [`TimelineSource`] seam.
//! [`RateLimitedPaginator`] turns any source into a bounded, ordered sequence
//! of posts, sleeping through rate-limit cooldowns and resuming at the same
//! cursor.

pub mod client;
pub mod error;
pub mod oauth;
pub mod paginator;
pub mod retry;
pub mod types;

pub use client::TwitterClient;
pub use error::TimelineError;
pub use oauth::OAuthSigner;
pub use paginator::{RateLimitedPaginator, TimelineCursor, TimelineSource};
pub use retry::{CooldownPolicy, Sleeper, TokioSleeper, DEFAULT_COOLDOWN};
pub use types::{PageCursor, TimelinePage};
