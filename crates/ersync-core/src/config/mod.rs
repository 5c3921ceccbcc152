//! Run configuration
//!
//! Read once at startup. Every field has a default so a bare invocation works;
//! an optional TOML file overrides them. The API key only ever comes from the
//! environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::FixedOffset;
use serde::Deserialize;

use ersync_fs::NormalizedPath;
use ersync_git::{Identity, RemoteSpec};

use crate::checkpoint::DEFAULT_CHECKPOINT_WINDOW;
use crate::{Error, Result};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "ersync.toml";

/// Environment variable holding the upstream API key.
pub const API_KEY_ENV: &str = "ER_API_KEY";

/// Languages with published localization bundles.
pub const DEFAULT_LANGUAGES: &[&str] = &[
    "Korean",
    "English",
    "Japanese",
    "ChineseSimplified",
    "ChineseTraditional",
    "French",
    "Spanish",
    "SpanishLatin",
    "Portuguese",
    "PortugueseLatin",
    "Indonesian",
    "German",
    "Russian",
    "Thai",
    "Vietnamese",
];

/// Matching modes with a free-character rotation: Normal, Rank, Cobalt.
pub const DEFAULT_MATCHING_MODES: &[&str] = &["2", "3", "6"];

/// Settings for one sync run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Authenticated JSON API root
    pub api_base_url: String,

    /// CDN root serving archives and the version manifest
    pub cdn_base_url: String,

    /// Manifest naming the latest game-data archive, relative to the CDN root
    pub version_manifest: String,

    /// Working copy the run writes to
    pub repo_path: PathBuf,

    pub remote: String,
    pub branch: String,

    /// Cloned into `repo_path` when no working copy exists yet
    pub remote_url: Option<String>,

    /// Commit identity override; git config is used when unset
    pub author_name: Option<String>,
    pub author_email: Option<String>,

    pub checkpoint_window: usize,

    /// Minimum gap between API requests
    pub request_interval_ms: u64,

    /// Zone the upstream timestamps are written in
    pub identifier_utc_offset_minutes: i32,

    pub languages: Vec<String>,
    pub matching_modes: Vec<String>,

    #[serde(skip)]
    pub api_key: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://open-api.bser.io/".to_string(),
            cdn_base_url: "https://d1wkxvul68bth9.cloudfront.net/".to_string(),
            version_manifest: "gameDb/gamedata-steam.txt".to_string(),
            repo_path: PathBuf::from("./repo"),
            remote: "origin".to_string(),
            branch: "master".to_string(),
            remote_url: None,
            author_name: None,
            author_email: None,
            checkpoint_window: DEFAULT_CHECKPOINT_WINDOW,
            request_interval_ms: 1000,
            identifier_utc_offset_minutes: 0,
            languages: DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect(),
            matching_modes: DEFAULT_MATCHING_MODES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            api_key: String::new(),
        }
    }
}

impl SyncConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// used if present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    tracing::debug!("No config file, using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = std::fs::read_to_string(&path).map_err(|e| Error::Config {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config { message, .. } => Error::Config {
                path: path.clone(),
                message,
            },
            other => other,
        })?;

        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config {
            path: PathBuf::new(),
            message: e.to_string(),
        })
    }

    /// Read the API key from [`API_KEY_ENV`].
    pub fn with_api_key_from_env(self) -> Self {
        self.with_api_key_from(|name| std::env::var(name).ok())
    }

    /// Read the API key through `lookup`. A missing key becomes an empty
    /// string; authenticated requests will then be rejected upstream.
    pub fn with_api_key_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(API_KEY_ENV) {
            Some(key) if !key.is_empty() => self.api_key = key,
            _ => {
                tracing::warn!(var = API_KEY_ENV, "API key not set, using empty key");
                self.api_key = String::new();
            }
        }
        self
    }

    pub fn repo_root(&self) -> NormalizedPath {
        NormalizedPath::new(&self.repo_path)
    }

    pub fn remote_spec(&self) -> RemoteSpec {
        RemoteSpec::new(&self.remote, &self.branch)
    }

    /// Commit identity override, if both name and email are configured.
    pub fn identity(&self) -> Option<Identity> {
        match (&self.author_name, &self.author_email) {
            (Some(name), Some(email)) => Some(Identity::new(name, email)),
            _ => None,
        }
    }

    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }

    /// Offset applied to upstream timestamps when deriving author dates.
    pub fn identifier_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.identifier_utc_offset_minutes * 60).ok_or_else(|| {
            Error::Config {
                path: PathBuf::from(DEFAULT_CONFIG_FILE),
                message: format!(
                    "identifier_utc_offset_minutes out of range: {}",
                    self.identifier_utc_offset_minutes
                ),
            }
        })
    }
}
