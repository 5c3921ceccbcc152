//! Blocking HTTP implementation of [`ResourceFetcher`]

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;

use super::{ApiEnvelope, FreeCharactersPayload, LocalizationPayload, ResourceFetcher, join_url};
use crate::config::SyncConfig;
use crate::identifier::ArchiveIdentifier;
use crate::{Error, Result};

const API_KEY_HEADER: &str = "x-api-key";

/// Fetches from the upstream API and CDN with one shared client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    api_base_url: String,
    cdn_base_url: String,
    version_manifest: String,
    api_key: String,
}

impl HttpFetcher {
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ersync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::http(&config.api_base_url, e))?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.clone(),
            cdn_base_url: config.cdn_base_url.clone(),
            version_manifest: config.version_manifest.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// GET an authenticated API endpoint and interpret the body as an
    /// envelope regardless of HTTP status.
    fn api_get<T: DeserializeOwned + Default>(&self, path: &str) -> Result<ApiEnvelope<T>> {
        let url = join_url(&self.api_base_url, path)?;
        tracing::debug!(url = %url, "api.request");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .map_err(|e| Error::http(&url, e))?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| Error::http(&url, e))?;

        let envelope = ApiEnvelope::from_body(status, &body);
        if !envelope.is_success() {
            tracing::debug!(url = %url, status, body = %body, "api.response");
        }
        Ok(envelope)
    }
}

impl ResourceFetcher for HttpFetcher {
    fn latest_game_data_version(&self) -> Result<String> {
        let url = join_url(&self.cdn_base_url, &self.version_manifest)?;
        let bytes = self.download(&url)?;
        let version = String::from_utf8_lossy(&bytes).trim().to_string();
        tracing::info!(version = %version, "Latest game-data version");
        Ok(version)
    }

    fn game_data_url(&self, identifier: &ArchiveIdentifier) -> Result<String> {
        join_url(&self.cdn_base_url, identifier.as_str())
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::http(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(|e| Error::http(url, e))?;
        tracing::debug!(url = %url, bytes = bytes.len(), "Downloaded");
        Ok(bytes.to_vec())
    }

    fn localization(&self, language: &str) -> Result<ApiEnvelope<LocalizationPayload>> {
        self.api_get(&format!("v1/l10n/{language}"))
    }

    fn free_characters(&self, matching_mode: &str) -> Result<ApiEnvelope<FreeCharactersPayload>> {
        self.api_get(&format!("v1/freeCharacters/{matching_mode}"))
    }
}
