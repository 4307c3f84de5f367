use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Smallest page the timeline endpoint accepts
pub const MIN_PAGE_SIZE: u32 = 5;
/// Largest page the timeline endpoint accepts
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory holding the deleted-set and fetched cache
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// File name of the deleted-set, relative to `data_dir`
    #[serde(default = "default_deleted_file")]
    pub deleted_file: String,
    /// File name of the fetched tweets cache, relative to `data_dir`
    #[serde(default = "default_fetched_file")]
    pub fetched_file: String,
    /// Log level used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            deleted_file: default_deleted_file(),
            fetched_file: default_fetched_file(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the v2 API
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    /// Number of recent tweets requested per run
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// Extra tweet fields requested alongside the id
    #[serde(default = "default_tweet_fields")]
    pub tweet_fields: Vec<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// HTTP proxy URL (e.g., "http://127.0.0.1:7890" or "socks5://127.0.0.1:1080")
    #[serde(default)]
    pub proxy_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            max_results: default_max_results(),
            tweet_fields: default_tweet_fields(),
            request_timeout_secs: default_timeout(),
            proxy_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Maximum successful deletions in one run
    #[serde(default = "default_max_deletions")]
    pub max_deletions: u32,
    /// Pause after each successful deletion, in milliseconds
    #[serde(default = "default_delete_delay")]
    pub delete_delay_ms: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            max_deletions: default_max_deletions(),
            delete_delay_ms: default_delete_delay(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Path to the exported archive (zip)
    #[serde(default = "default_archive_path")]
    pub path: PathBuf,
    /// Entry inside the archive that holds the tweets array
    #[serde(default = "default_archive_entry")]
    pub entry: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            path: default_archive_path(),
            entry: default_archive_entry(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_deleted_file() -> String {
    "deleted_tweets.json".to_string()
}

fn default_fetched_file() -> String {
    "fetched_tweets.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_api_base_url() -> String {
    "https://api.twitter.com/2".to_string()
}

fn default_max_results() -> u32 {
    100
}

fn default_tweet_fields() -> Vec<String> {
    vec!["created_at".to_string()]
}

fn default_timeout() -> u64 {
    30
}

fn default_max_deletions() -> u32 {
    17
}

fn default_delete_delay() -> u64 {
    1000
}

fn default_archive_path() -> PathBuf {
    PathBuf::from("tweet-archive.zip")
}

fn default_archive_entry() -> String {
    "data/tweets.js".to_string()
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default location, or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, or return defaults if it does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/tweetsweep/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("tweetsweep")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Path of the persisted deleted-set
    pub fn deleted_path(&self) -> PathBuf {
        self.data_dir().join(&self.general.deleted_file)
    }

    /// Path of the fetched tweets cache
    pub fn fetched_path(&self) -> PathBuf {
        self.data_dir().join(&self.general.fetched_file)
    }

    /// Archive path (with tilde expansion)
    pub fn archive_path(&self) -> PathBuf {
        expand_tilde(&self.archive.path)
    }

    /// Page size clamped to what the timeline endpoint accepts
    pub fn page_size(&self) -> u32 {
        self.api.max_results.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
    }
}
