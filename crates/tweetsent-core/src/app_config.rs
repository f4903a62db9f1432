use std::path::PathBuf;

/// OAuth 1.0a user-context secrets for the platform API.
#[derive(Clone, PartialEq, Eq)]
pub struct TwitterCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl std::fmt::Debug for TwitterCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterCredentials")
            .field("consumer_key", &"[redacted]")
            .field("consumer_secret", &"[redacted]")
            .field("access_token", &"[redacted]")
            .field("access_token_secret", &"[redacted]")
            .finish()
    }
}

/// Settings a collection run needs before any remote service is involved.
/// Loadable without credentials, so `collect --dry-run` works on a fresh
/// checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectSettings {
    pub log_level: String,
    pub accounts_path: PathBuf,
    pub output_dir: PathBuf,
    pub item_limit: usize,
}

#[derive(Clone)]
pub struct AppConfig {
    pub credentials: TwitterCredentials,
    pub log_level: String,
    pub accounts_path: PathBuf,
    pub output_dir: PathBuf,
    pub item_limit: usize,
    pub twitter_base_url: String,
    pub page_size: u32,
    pub rate_limit_cooldown_secs: u64,
    pub lexicon_url: String,
    pub lexicon_max_retries: u32,
    pub lexicon_retry_backoff_base_ms: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_accounts: usize,
    pub scoring_concurrency: usize,
    pub lexicon_max_in_flight: usize,
}

impl AppConfig {
    #[must_use]
    pub fn collect_settings(&self) -> CollectSettings {
        CollectSettings {
            log_level: self.log_level.clone(),
            accounts_path: self.accounts_path.clone(),
            output_dir: self.output_dir.clone(),
            item_limit: self.item_limit,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("credentials", &self.credentials)
            .field("log_level", &self.log_level)
            .field("accounts_path", &self.accounts_path)
            .field("output_dir", &self.output_dir)
            .field("item_limit", &self.item_limit)
            .field("twitter_base_url", &self.twitter_base_url)
            .field("page_size", &self.page_size)
            .field("rate_limit_cooldown_secs", &self.rate_limit_cooldown_secs)
            .field("lexicon_url", &self.lexicon_url)
            .field("lexicon_max_retries", &self.lexicon_max_retries)
            .field(
                "lexicon_retry_backoff_base_ms",
                &self.lexicon_retry_backoff_base_ms,
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_concurrent_accounts", &self.max_concurrent_accounts)
            .field("scoring_concurrency", &self.scoring_concurrency)
            .field("lexicon_max_in_flight", &self.lexicon_max_in_flight)
            .finish()
    }
}
