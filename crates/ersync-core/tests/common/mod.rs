//! Shared helpers for ersync-core integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use ersync_core::{
    ApiEnvelope, ArchiveIdentifier, Error, FreeCharactersPayload, LocalizationPayload,
    ResourceFetcher, Result, SyncConfig,
};

pub const CDN: &str = "https://cdn.test/";

/// In-memory upstream. Unknown API keys answer `{"code":404}`; unknown
/// downloads fail with HTTP 404.
#[derive(Default)]
pub struct FakeFetcher {
    pub version: String,
    pub downloads: HashMap<String, Vec<u8>>,
    pub localization: HashMap<String, String>,
    pub free_characters: HashMap<String, String>,
    api_calls: RefCell<Vec<(String, Instant)>>,
    download_calls: RefCell<Vec<String>>,
}

impl FakeFetcher {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            ..Self::default()
        }
    }

    /// Serve `bytes` for `gameDb/<name>`.
    pub fn with_archive(mut self, name: &str, bytes: Vec<u8>) -> Self {
        self.downloads.insert(format!("{CDN}gameDb/{name}"), bytes);
        self
    }

    /// Serve a localization pointer for `language` plus the bundle behind it.
    pub fn with_bundle(mut self, language: &str, path: &str, content: &str) -> Self {
        let url = format!("{CDN}{path}");
        self.localization.insert(
            language.to_string(),
            format!(r#"{{"code":200,"message":"Success","data":{{"l10Path":"{url}"}}}}"#),
        );
        self.downloads.insert(url, content.as_bytes().to_vec());
        self
    }

    pub fn with_localization_body(mut self, language: &str, body: &str) -> Self {
        self.localization
            .insert(language.to_string(), body.to_string());
        self
    }

    pub fn with_free_characters_body(mut self, mode: &str, body: &str) -> Self {
        self.free_characters
            .insert(mode.to_string(), body.to_string());
        self
    }

    /// API endpoints requested, in order, with the time of each request.
    pub fn api_calls(&self) -> Vec<(String, Instant)> {
        self.api_calls.borrow().clone()
    }

    pub fn download_calls(&self) -> Vec<String> {
        self.download_calls.borrow().clone()
    }

    fn api(&self, endpoint: String, body: Option<&String>) -> String {
        self.api_calls.borrow_mut().push((endpoint, Instant::now()));
        body.cloned()
            .unwrap_or_else(|| r#"{"code":404,"message":"Not Found"}"#.to_string())
    }
}

impl ResourceFetcher for FakeFetcher {
    fn latest_game_data_version(&self) -> Result<String> {
        Ok(self.version.clone())
    }

    fn game_data_url(&self, identifier: &ArchiveIdentifier) -> Result<String> {
        Ok(format!("{CDN}{identifier}"))
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        self.download_calls.borrow_mut().push(url.to_string());
        self.downloads
            .get(url)
            .cloned()
            .ok_or_else(|| Error::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
    }

    fn localization(&self, language: &str) -> Result<ApiEnvelope<LocalizationPayload>> {
        let body = self.api(
            format!("l10n/{language}"),
            self.localization.get(language),
        );
        Ok(ApiEnvelope::from_body(200, &body))
    }

    fn free_characters(&self, matching_mode: &str) -> Result<ApiEnvelope<FreeCharactersPayload>> {
        let body = self.api(
            format!("freeCharacters/{matching_mode}"),
            self.free_characters.get(matching_mode),
        );
        Ok(ApiEnvelope::from_body(200, &body))
    }
}

/// Config pointing at `repo`, with no languages or modes and no throttle
/// delay. Tests opt into the parts they exercise.
pub fn test_config(repo: &Path) -> SyncConfig {
    SyncConfig {
        repo_path: repo.to_path_buf(),
        cdn_base_url: CDN.to_string(),
        request_interval_ms: 0,
        languages: Vec::new(),
        matching_modes: Vec::new(),
        author_name: Some("Sync Bot".to_string()),
        author_email: Some("sync@example.com".to_string()),
        ..SyncConfig::default()
    }
}
