use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tunes_model::MediaKind;

use crate::constants::env;
use crate::util::non_blank;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub api: FileApiConfig,
    #[serde(default)]
    pub images: FileImageConfig,
    #[serde(default)]
    pub search: FileSearchConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Humantime string, e.g. `"14s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileImageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_mib: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileSearchConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_limit: Option<u32>,
}

/// Environment-derived configuration values, still unparsed.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub api_base_url: Option<String>,
    pub request_timeout: Option<String>,
    pub user_agent: Option<String>,
    pub image_timeout: Option<String>,
    pub image_cache_entries: Option<String>,
    pub image_cache_mib: Option<String>,
    pub search_media: Option<String>,
    pub search_limit: Option<String>,
    pub related_limit: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the environment layer from any name lookup; blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| non_blank(lookup(name));
        Self {
            config_path: var(env::CONFIG_PATH).map(PathBuf::from),
            api_base_url: var(env::API_BASE_URL),
            request_timeout: var(env::REQUEST_TIMEOUT),
            user_agent: var(env::USER_AGENT),
            image_timeout: var(env::IMAGE_TIMEOUT),
            image_cache_entries: var(env::IMAGE_CACHE_ENTRIES),
            image_cache_mib: var(env::IMAGE_CACHE_MIB),
            search_media: var(env::SEARCH_MEDIA),
            search_limit: var(env::SEARCH_LIMIT),
            related_limit: var(env::RELATED_LIMIT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn file_config_reads_nested_sections() {
        let parsed: FileConfig = toml::from_str(
            r#"
            [api]
            base_url = "http://localhost:8080"
            request_timeout = "5s"

            [search]
            media = "musicVideo"
            limit = 50
            "#,
        )
        .expect("valid toml");

        assert_eq!(parsed.api.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(parsed.api.request_timeout.as_deref(), Some("5s"));
        assert_eq!(parsed.search.media, Some(MediaKind::MusicVideo));
        assert_eq!(parsed.search.limit, Some(50));
        assert!(parsed.images.max_entries.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let parsed = toml::from_str::<FileConfig>("[api]\nbase = \"x\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn env_lookup_skips_blank_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TUNES_SEARCH_LIMIT", "50"),
            ("TUNES_USER_AGENT", "  "),
        ]);
        let env = EnvConfig::from_lookup(|name| {
            vars.get(name).map(|value| value.to_string())
        });

        assert_eq!(env.search_limit.as_deref(), Some("50"));
        assert!(env.user_agent.is_none());
        assert!(env.api_base_url.is_none());
    }
}
