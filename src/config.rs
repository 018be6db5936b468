//! Configuration types for booru-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration
///
/// Works out of the box with zero configuration: the defaults target the
/// public Gelbooru dapi endpoint with anonymous access.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Board API settings
    #[serde(default)]
    pub board: BoardConfig,

    /// Bulk fetch behavior
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Archive naming and compression
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// Board API configuration (endpoint, credentials, search behavior)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Base URL of the board's dapi endpoint (default: "https://gelbooru.com/index.php")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key for authenticated requests (optional, anonymous works)
    #[serde(default)]
    pub api_key: Option<String>,

    /// User ID paired with the API key
    #[serde(default)]
    pub user_id: Option<String>,

    /// Timeout for one search request (default: 10 seconds)
    #[serde(default = "default_search_timeout", with = "duration_serde")]
    pub search_timeout: Duration,

    /// Results requested per page (default: 10)
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            user_id: None,
            search_timeout: default_search_timeout(),
            page_size: default_page_size(),
        }
    }
}

/// Bulk fetch configuration (concurrency, timeouts)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum concurrent image fetches (default: 10)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_fetches: usize,

    /// Timeout for one image fetch (default: 15 seconds)
    ///
    /// Each fetch gets exactly one attempt with this fixed timeout. There is
    /// no retry and no timeout renegotiation.
    #[serde(default = "default_fetch_timeout", with = "duration_serde")]
    pub fetch_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: default_max_concurrent(),
            fetch_timeout: default_fetch_timeout(),
        }
    }
}

/// Archive configuration (entry naming, compression, sidecars)
///
/// Entry names are derived from the resource ordinal alone:
/// `{entry_prefix}{ordinal}.{entry_extension}`. Used as a nested sub-config
/// within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Prefix for archive entry names (default: "gelbooru_")
    #[serde(default = "default_entry_prefix")]
    pub entry_prefix: String,

    /// Extension for archive entry names, without the dot (default: "jpg")
    #[serde(default = "default_entry_extension")]
    pub entry_extension: String,

    /// Deflate compression level, 0-9 (default: 6)
    #[serde(default = "default_compression_level")]
    pub compression_level: i32,

    /// Write a `.txt` sidecar entry with the post's tags next to each image
    /// (default: false)
    #[serde(default)]
    pub tag_sidecars: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            entry_prefix: default_entry_prefix(),
            entry_extension: default_entry_extension(),
            compression_level: default_compression_level(),
            tag_sidecars: false,
        }
    }
}

impl Config {
    /// Validate the configuration, returning a [`Error::Config`] naming the
    /// offending key on the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.max_concurrent_fetches == 0 {
            return Err(Error::Config {
                message: "max_concurrent_fetches must be at least 1".to_string(),
                key: Some("fetch.max_concurrent_fetches".to_string()),
            });
        }

        if self.archive.entry_prefix.is_empty() && self.archive.entry_extension.is_empty() {
            return Err(Error::Config {
                message: "entry_prefix and entry_extension cannot both be empty".to_string(),
                key: Some("archive.entry_prefix".to_string()),
            });
        }

        if !(0..=9).contains(&self.archive.compression_level) {
            return Err(Error::Config {
                message: format!(
                    "compression_level must be between 0 and 9, got {}",
                    self.archive.compression_level
                ),
                key: Some("archive.compression_level".to_string()),
            });
        }

        if self.board.base_url.is_empty() {
            return Err(Error::Config {
                message: "base_url cannot be empty".to_string(),
                key: Some("board.base_url".to_string()),
            });
        }

        Ok(())
    }
}

fn default_base_url() -> String {
    "https://gelbooru.com/index.php".to_string()
}

fn default_search_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_page_size() -> usize {
    10
}

fn default_max_concurrent() -> usize {
    10
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_entry_prefix() -> String {
    "gelbooru_".to_string()
}

fn default_entry_extension() -> String {
    "jpg".to_string()
}

fn default_compression_level() -> i32 {
    6
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
