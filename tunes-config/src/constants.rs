use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = tunes_core::CATALOG_BASE_URL;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = tunes_core::DEFAULT_REQUEST_TIMEOUT;
pub const DEFAULT_USER_AGENT: &str = concat!("tunes/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_IMAGE_TIMEOUT: Duration = tunes_core::DEFAULT_REQUEST_TIMEOUT;
pub const DEFAULT_IMAGE_CACHE_ENTRIES: usize = 256;
pub const DEFAULT_IMAGE_CACHE_MIB: u64 = 64;
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;
pub const DEFAULT_RELATED_LIMIT: u32 = tunes_core::DEFAULT_RELATED_WORKS_LIMIT;

/// Page sizes offered by the search screen.
pub const SEARCH_LIMIT_CHOICES: [u32; 3] = [20, 50, 100];
/// Largest page the catalog serves.
pub const MAX_SEARCH_LIMIT: u32 = 200;

/// Searched in order when no config path is given.
pub const DEFAULT_CONFIG_LOCATIONS: [&str; 2] = ["tunes.toml", "config/tunes.toml"];

pub mod env {
    pub const CONFIG_PATH: &str = "TUNES_CONFIG";
    pub const API_BASE_URL: &str = "TUNES_API_BASE_URL";
    pub const REQUEST_TIMEOUT: &str = "TUNES_REQUEST_TIMEOUT";
    pub const USER_AGENT: &str = "TUNES_USER_AGENT";
    pub const IMAGE_TIMEOUT: &str = "TUNES_IMAGE_TIMEOUT";
    pub const IMAGE_CACHE_ENTRIES: &str = "TUNES_IMAGE_CACHE_ENTRIES";
    pub const IMAGE_CACHE_MIB: &str = "TUNES_IMAGE_CACHE_MIB";
    pub const SEARCH_MEDIA: &str = "TUNES_SEARCH_MEDIA";
    pub const SEARCH_LIMIT: &str = "TUNES_SEARCH_LIMIT";
    pub const RELATED_LIMIT: &str = "TUNES_RELATED_LIMIT";
}
