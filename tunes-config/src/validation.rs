use std::time::Duration;

use thiserror::Error;

use crate::constants::{MAX_SEARCH_LIMIT, SEARCH_LIMIT_CHOICES};
use crate::models::Config;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigGuardRailError {
    #[error("API base URL must use http or https, got '{scheme}'")]
    UnsupportedScheme { scheme: String },
    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },
    #[error("{field} must be greater than zero")]
    ZeroCacheBound { field: &'static str },
    #[error("{field} must be within 1..={max}, got {value}")]
    LimitOutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    let scheme = config.api.base_url.scheme();
    match scheme {
        "https" => {}
        "http" => warnings.push_with_hint(
            format!("API base URL {} is not encrypted", config.api.base_url),
            "Use https:// unless this points at a local fake",
        ),
        other => {
            return Err(ConfigGuardRailError::UnsupportedScheme {
                scheme: other.to_string(),
            });
        }
    }

    require_timeout("api.request_timeout", config.api.request_timeout)?;
    require_timeout("images.fetch_timeout", config.images.fetch_timeout)?;

    if config.images.max_entries == 0 {
        return Err(ConfigGuardRailError::ZeroCacheBound {
            field: "images.max_entries",
        });
    }
    if config.images.max_mib == 0 {
        return Err(ConfigGuardRailError::ZeroCacheBound {
            field: "images.max_mib",
        });
    }

    require_limit("search.limit", config.search.limit)?;
    require_limit("search.related_limit", config.search.related_limit)?;

    if !SEARCH_LIMIT_CHOICES.contains(&config.search.limit) {
        warnings.push(format!(
            "search.limit {} is not one of the usual page sizes {:?}",
            config.search.limit, SEARCH_LIMIT_CHOICES
        ));
    }

    Ok(warnings)
}

fn require_timeout(
    field: &'static str,
    value: Duration,
) -> Result<(), ConfigGuardRailError> {
    if value.is_zero() {
        return Err(ConfigGuardRailError::ZeroTimeout { field });
    }
    Ok(())
}

fn require_limit(
    field: &'static str,
    value: u32,
) -> Result<(), ConfigGuardRailError> {
    if value == 0 || value > MAX_SEARCH_LIMIT {
        return Err(ConfigGuardRailError::LimitOutOfRange {
            field,
            value,
            max: MAX_SEARCH_LIMIT,
        });
    }
    Ok(())
}
