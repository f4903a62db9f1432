use std::env::VarError;
use std::path::PathBuf;

use crate::app_config::{AppConfig, CollectSettings, TwitterCredentials};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load only the settings that do not involve platform credentials.
///
/// Calls `dotenvy::dotenv().ok()` first, like [`load_app_config`].
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if `TWEETSENT_ITEM_LIMIT` is not a number.
pub fn load_collect_settings() -> Result<CollectSettings, ConfigError> {
    dotenvy::dotenv().ok();
    build_collect_settings(&|key: &str| std::env::var(key))
}

fn build_collect_settings<F>(lookup: &F) -> Result<CollectSettings, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let or_default = |var: &str, default: &str| lookup(var).unwrap_or_else(|_| default.to_string());

    // A limit of zero is allowed: it yields empty collections.
    let item_limit = or_default("TWEETSENT_ITEM_LIMIT", "500")
        .parse::<usize>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "TWEETSENT_ITEM_LIMIT".to_string(),
            reason: e.to_string(),
        })?;

    Ok(CollectSettings {
        log_level: or_default("TWEETSENT_LOG_LEVEL", "info"),
        accounts_path: PathBuf::from(or_default(
            "TWEETSENT_ACCOUNTS_PATH",
            "./config/accounts.yaml",
        )),
        output_dir: PathBuf::from(or_default("TWEETSENT_OUTPUT_DIR", "./data")),
        item_limit,
    })
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a pure
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be at least 1".to_string()));
        }
        Ok(value)
    };

    let credentials = TwitterCredentials {
        consumer_key: require("TWITTER_CONSUMER_KEY")?,
        consumer_secret: require("TWITTER_CONSUMER_SECRET")?,
        access_token: require("TWITTER_ACCESS_TOKEN")?,
        access_token_secret: require("TWITTER_ACCESS_TOKEN_SECRET")?,
    };

    let CollectSettings {
        log_level,
        accounts_path,
        output_dir,
        item_limit,
    } = build_collect_settings(&lookup)?;

    let twitter_base_url = or_default(
        "TWEETSENT_TWITTER_BASE_URL",
        "https://api.twitter.com/1.1/",
    );

    let page_size = parse_u32("TWEETSENT_PAGE_SIZE", "200")?;
    if !(1..=200).contains(&page_size) {
        return Err(invalid(
            "TWEETSENT_PAGE_SIZE",
            format!("{page_size} is outside 1..=200"),
        ));
    }

    let rate_limit_cooldown_secs = parse_u64("TWEETSENT_RATE_LIMIT_COOLDOWN_SECS", "900")?;
    let lexicon_url = or_default(
        "TWEETSENT_LEXICON_URL",
        "http://text-processing.com/api/sentiment/",
    );
    let lexicon_max_retries = parse_u32("TWEETSENT_LEXICON_MAX_RETRIES", "2")?;
    let lexicon_retry_backoff_base_ms =
        parse_u64("TWEETSENT_LEXICON_RETRY_BACKOFF_BASE_MS", "1000")?;
    let request_timeout_secs = parse_u64("TWEETSENT_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("TWEETSENT_USER_AGENT", "tweetsent/0.1 (sentiment-research)");
    let max_concurrent_accounts = parse_positive_usize("TWEETSENT_MAX_CONCURRENT_ACCOUNTS", "1")?;
    let scoring_concurrency = parse_positive_usize("TWEETSENT_SCORING_CONCURRENCY", "1")?;
    let lexicon_max_in_flight = parse_positive_usize("TWEETSENT_LEXICON_MAX_IN_FLIGHT", "1")?;

    Ok(AppConfig {
        credentials,
        log_level,
        accounts_path,
        output_dir,
        item_limit,
        twitter_base_url,
        page_size,
        rate_limit_cooldown_secs,
        lexicon_url,
        lexicon_max_retries,
        lexicon_retry_backoff_base_ms,
        request_timeout_secs,
        user_agent,
        max_concurrent_accounts,
        scoring_concurrency,
        lexicon_max_in_flight,
    })
}
