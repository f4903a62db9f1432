//! OAuth 1.0a request signing (HMAC-SHA1) for user-context API calls.

use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::Rng;
use reqwest::Url;
use sha1::Sha1;
use tweetsent_core::TwitterCredentials;

use crate::error::TimelineError;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters stay literal; everything else is encoded.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const NONCE_LEN: usize = 32;

fn encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

/// Builds `Authorization: OAuth ...` header values for signed requests.
#[derive(Clone)]
pub struct OAuthSigner {
    credentials: TwitterCredentials,
}

impl std::fmt::Debug for OAuthSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthSigner")
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl OAuthSigner {
    #[must_use]
    pub fn new(credentials: TwitterCredentials) -> Self {
        Self { credentials }
    }

    /// Signs a request to `url` (query parameters included in the signature)
    /// using a fresh nonce and the current time.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::Signing`] if the HMAC key cannot be built.
    pub fn authorization_header(&self, method: &str, url: &Url) -> Result<String, TimelineError> {
        let nonce: String = rand::rng()
            .sample_iter(rand::distr::Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect();
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let mut base_url = url.clone();
        base_url.set_query(None);
        base_url.set_fragment(None);

        let params: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        self.header_with(method, base_url.as_str(), &params, &nonce, &timestamp)
    }

    /// Deterministic core of [`Self::authorization_header`].
    pub(crate) fn header_with(
        &self,
        method: &str,
        base_url: &str,
        request_params: &[(String, String)],
        nonce: &str,
        timestamp: &str,
    ) -> Result<String, TimelineError> {
        let oauth_params = [
            ("oauth_consumer_key", self.credentials.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp),
            ("oauth_token", self.credentials.access_token.as_str()),
            ("oauth_version", "1.0"),
        ];

        let signature = self.signature(method, base_url, request_params, &oauth_params)?;

        let mut parts: Vec<String> = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect();
        parts.push(format!("oauth_signature=\"{}\"", encode(&signature)));
        parts.sort();

        Ok(format!("OAuth {}", parts.join(", ")))
    }

    fn signature(
        &self,
        method: &str,
        base_url: &str,
        request_params: &[(String, String)],
        oauth_params: &[(&str, &str)],
    ) -> Result<String, TimelineError> {
        let mut encoded: Vec<(String, String)> = request_params
            .iter()
            .map(|(k, v)| (encode(k), encode(v)))
            .chain(oauth_params.iter().map(|(k, v)| (encode(k), encode(v))))
            .collect();
        encoded.sort();

        let param_string = encoded
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let base_string = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            encode(base_url),
            encode(&param_string)
        );
        let signing_key = format!(
            "{}&{}",
            encode(&self.credentials.consumer_secret),
            encode(&self.credentials.access_token_secret)
        );

        let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
            .map_err(|e| TimelineError::Signing(e.to_string()))?;
        mac.update(base_string.as_bytes());
        let digest = mac.finalize().into_bytes();

        Ok(base64::engine::general_purpose::STANDARD.encode(digest))
    }
}
