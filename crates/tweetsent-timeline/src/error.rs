use thiserror::Error;

/// Errors returned by the platform timeline client and paginator.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform asked us to back off (HTTP 429 or error code 88).
    ///
    /// The paginator absorbs this by cooling down and retrying the same cursor.
    #[error("rate limited while fetching timeline for {account}")]
    RateLimited { account: String },

    /// Any other non-2xx response from the platform.
    #[error("platform API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A post arrived without a field every exported row needs.
    #[error("malformed post {post_id}: missing or invalid field `{field}`")]
    MalformedRecord {
        post_id: String,
        field: &'static str,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("request signing failed: {0}")]
    Signing(String),
}
