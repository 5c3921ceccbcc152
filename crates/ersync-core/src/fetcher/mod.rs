//! Resource fetching
//!
//! [`ResourceFetcher`] is the seam between the sync flows and the network.
//! [`HttpFetcher`] talks to the real API and CDN; tests substitute an
//! in-memory fake.

mod http;

pub use http::HttpFetcher;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::identifier::ArchiveIdentifier;
use crate::{Error, Result};

/// Upstream resources a sync run reads.
pub trait ResourceFetcher {
    /// Name of the newest game-data archive, as listed in the CDN manifest.
    fn latest_game_data_version(&self) -> Result<String>;

    /// Download location of a game-data archive.
    fn game_data_url(&self, identifier: &ArchiveIdentifier) -> Result<String>;

    /// Fetch raw bytes. A non-2xx status is [`Error::HttpStatus`].
    fn download(&self, url: &str) -> Result<Vec<u8>>;

    /// Localization pointer for one language. Never fails on HTTP status;
    /// callers inspect [`ApiEnvelope::code`].
    fn localization(&self, language: &str) -> Result<ApiEnvelope<LocalizationPayload>>;

    /// Free-character rotation for one matching mode. Never fails on HTTP
    /// status; callers inspect [`ApiEnvelope::code`].
    fn free_characters(&self, matching_mode: &str) -> Result<ApiEnvelope<FreeCharactersPayload>>;
}

/// Embedded `code` the API uses for success.
pub const API_SUCCESS: i64 = 200;

/// A JSON API response: embedded status plus endpoint-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiEnvelope<T> {
    /// HTTP status of the response carrying the envelope
    pub status: u16,
    pub code: i64,
    pub message: String,
    pub payload: T,
}

impl<T> ApiEnvelope<T> {
    pub fn is_success(&self) -> bool {
        self.code == API_SUCCESS
    }
}

impl<T: DeserializeOwned + Default> ApiEnvelope<T> {
    /// Interpret a response body.
    ///
    /// A body without a numeric `code` is not an envelope; it becomes one
    /// whose `code` is the HTTP status (0 for a 2xx) and whose `message` is
    /// the raw body, so it is never mistaken for success.
    pub fn from_body(status: u16, body: &str) -> Self {
        let value: Option<Value> = serde_json::from_str(body).ok();
        let code = value
            .as_ref()
            .and_then(|v| v.get("code"))
            .and_then(Value::as_i64);

        let (Some(value), Some(code)) = (value, code) else {
            return Self {
                status,
                code: if (200..300).contains(&status) {
                    0
                } else {
                    i64::from(status)
                },
                message: body.to_string(),
                payload: T::default(),
            };
        };

        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let payload = match serde_json::from_value(value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(code, error = %e, "Unexpected payload shape");
                T::default()
            }
        };

        Self {
            status,
            code,
            message,
            payload,
        }
    }
}

/// Payload of `/v1/l10n/{language}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LocalizationPayload {
    #[serde(default)]
    pub data: Option<LocalizationPointer>,
}

/// Where a localization bundle can be downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocalizationPointer {
    #[serde(rename = "l10Path")]
    pub l10n_path: String,
}

/// Payload of `/v1/freeCharacters/{mode}`.
///
/// Kept as raw JSON; only a non-empty array is written.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FreeCharactersPayload {
    #[serde(rename = "freeCharacters", default)]
    pub free_characters: Option<Value>,
}

impl FreeCharactersPayload {
    /// The rotation, if it is a non-empty array.
    pub fn characters(&self) -> Option<&Vec<Value>> {
        self.free_characters
            .as_ref()
            .and_then(Value::as_array)
            .filter(|list| !list.is_empty())
    }
}

/// Resolve `path` against `base`, treating `base` as a directory.
pub fn join_url(base: &str, path: &str) -> Result<String> {
    let mut base_url = reqwest::Url::parse(base).map_err(|e| Error::InvalidUrl {
        url: base.to_string(),
        message: e.to_string(),
    })?;
    if !base_url.path().ends_with('/') {
        let dir = format!("{}/", base_url.path());
        base_url.set_path(&dir);
    }
    let joined = base_url.join(path).map_err(|e| Error::InvalidUrl {
        url: format!("{base} + {path}"),
        message: e.to_string(),
    })?;
    Ok(joined.to_string())
}

/// Path component of `url` without its leading `/`.
pub fn resource_path(url: &str) -> Result<String> {
    let parsed = reqwest::Url::parse(url).map_err(|e| Error::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    let path = parsed.path();
    Ok(path.strip_prefix('/').unwrap_or(path).to_string())
}
