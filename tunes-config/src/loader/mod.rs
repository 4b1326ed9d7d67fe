pub mod error;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;
use tunes_model::MediaKind;
use url::Url;

use crate::constants::{DEFAULT_CONFIG_LOCATIONS, env as vars};
use crate::models::sources::{EnvConfig, FileConfig};
use crate::models::{ApiConfig, Config, ConfigMetadata, ImageConfig, SearchConfig};
use crate::util::{parse_duration, parse_value};
use crate::validation::{self, ConfigWarnings};
use error::ConfigLoadError;

/// A validated configuration plus anything worth telling the user about it.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Loads `.env`, the process environment and the config file, then
    /// composes and validates them.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let env_config = EnvConfig::gather();
        let (file_config, config_path) = self.load_file_config(&env_config)?;

        Self::compose(
            file_config,
            env_config,
            ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        )
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env_config.config_path.clone());

        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(found) => found,
                None => {
                    debug!("no tunes.toml found; using defaults and environment");
                    return Ok((None, None));
                }
            },
        };

        let file_config = read_file_config(&path)?;
        Ok((Some(file_config), Some(path)))
    }

    /// Layers `env` over `file` over the built-in defaults and validates the
    /// result. Does not touch the process environment.
    pub fn compose(
        file: Option<FileConfig>,
        env: EnvConfig,
        metadata: ConfigMetadata,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let FileConfig {
            api: file_api,
            images: file_images,
            search: file_search,
        } = file.unwrap_or_default();
        let defaults = Config::default();

        let base_url = match env.api_base_url.or(file_api.base_url) {
            Some(raw) => Url::parse(raw.trim()).map_err(|source| {
                ConfigLoadError::InvalidBaseUrl { value: raw, source }
            })?,
            None => defaults.api.base_url,
        };

        let api = ApiConfig {
            base_url,
            request_timeout: layered_duration(
                env.request_timeout,
                vars::REQUEST_TIMEOUT,
                file_api.request_timeout,
                "api.request_timeout",
            )?
            .unwrap_or(defaults.api.request_timeout),
            user_agent: env
                .user_agent
                .or(file_api.user_agent)
                .unwrap_or(defaults.api.user_agent),
        };

        let images = ImageConfig {
            fetch_timeout: layered_duration(
                env.image_timeout,
                vars::IMAGE_TIMEOUT,
                file_images.fetch_timeout,
                "images.fetch_timeout",
            )?
            .unwrap_or(defaults.images.fetch_timeout),
            max_entries: env_value(env.image_cache_entries, vars::IMAGE_CACHE_ENTRIES)?
                .or(file_images.max_entries)
                .unwrap_or(defaults.images.max_entries),
            max_mib: env_value(env.image_cache_mib, vars::IMAGE_CACHE_MIB)?
                .or(file_images.max_mib)
                .unwrap_or(defaults.images.max_mib),
        };

        let search = SearchConfig {
            media: env_value::<MediaKind>(env.search_media, vars::SEARCH_MEDIA)?
                .or(file_search.media)
                .unwrap_or(defaults.search.media),
            limit: env_value(env.search_limit, vars::SEARCH_LIMIT)?
                .or(file_search.limit)
                .unwrap_or(defaults.search.limit),
            related_limit: env_value(env.related_limit, vars::RELATED_LIMIT)?
                .or(file_search.related_limit)
                .unwrap_or(defaults.search.related_limit),
        };

        let config = Config {
            api,
            images,
            search,
            metadata,
        };
        let warnings = validation::apply_guard_rails(&config)?;

        Ok(ConfigLoad { config, warnings })
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn layered_duration(
    env_raw: Option<String>,
    env_key: &'static str,
    file_raw: Option<String>,
    file_key: &'static str,
) -> Result<Option<Duration>, ConfigLoadError> {
    match (env_raw, file_raw) {
        (Some(raw), _) => parse_duration(env_key, &raw).map(Some),
        (None, Some(raw)) => parse_duration(file_key, &raw).map(Some),
        (None, None) => Ok(None),
    }
}

fn env_value<T>(
    raw: Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigLoadError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|raw| parse_value(key, &raw)).transpose()
}
