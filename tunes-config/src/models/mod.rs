pub mod sources;

use std::path::PathBuf;
use std::time::Duration;

use tunes_core::{CatalogSettings, ImageCacheConfig};
use tunes_model::{ByteSize, MediaKind};
use url::Url;

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_IMAGE_CACHE_ENTRIES, DEFAULT_IMAGE_CACHE_MIB,
    DEFAULT_IMAGE_TIMEOUT, DEFAULT_RELATED_LIMIT, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_SEARCH_LIMIT, DEFAULT_USER_AGENT,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub api: ApiConfig,
    pub images: ImageConfig,
    pub search: SearchConfig,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn image_cache(&self) -> ImageCacheConfig {
        ImageCacheConfig::from(self)
    }

    pub fn catalog(&self) -> CatalogSettings {
        CatalogSettings::from(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: Url,
    pub request_timeout: Duration,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageConfig {
    pub fetch_timeout: Duration,
    pub max_entries: usize,
    pub max_mib: u64,
}

impl ImageConfig {
    pub fn max_bytes(&self) -> ByteSize {
        ByteSize::from_mib(self.max_mib)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub media: MediaKind,
    pub limit: u32,
    pub related_limit: u32,
}

/// Where the effective values came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_IMAGE_TIMEOUT,
            max_entries: DEFAULT_IMAGE_CACHE_ENTRIES,
            max_mib: DEFAULT_IMAGE_CACHE_MIB,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            media: MediaKind::default(),
            limit: DEFAULT_SEARCH_LIMIT,
            related_limit: DEFAULT_RELATED_LIMIT,
        }
    }
}

fn default_base_url() -> Url {
    match Url::parse(DEFAULT_BASE_URL) {
        Ok(url) => url,
        Err(err) => unreachable!("built-in base URL is invalid: {err}"),
    }
}

impl From<&Config> for ImageCacheConfig {
    fn from(config: &Config) -> Self {
        ImageCacheConfig {
            max_entries: config.images.max_entries,
            max_bytes: config.images.max_bytes(),
            fetch_timeout: config.images.fetch_timeout,
        }
    }
}

impl From<&Config> for CatalogSettings {
    fn from(config: &Config) -> Self {
        CatalogSettings {
            base_url: config.api.base_url.as_str().trim_end_matches('/').to_string(),
            request_timeout: config.api.request_timeout,
            related_works_limit: config.search.related_limit,
        }
    }
}
