//! Configuration for the Tunes client.
//!
//! Values are layered: built-in defaults, then an optional `tunes.toml`,
//! then process environment (after an optional `.env`). The composed
//! [`Config`] is validated once and converts into the settings the core
//! library consumes.
#![allow(missing_docs)]

pub mod constants;
pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError};
pub use models::sources::{EnvConfig, FileConfig};
pub use models::{ApiConfig, Config, ConfigMetadata, ImageConfig, SearchConfig};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
