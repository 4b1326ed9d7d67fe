use std::collections::HashMap;
use std::fs;
use std::time::Duration;

use tempfile::TempDir;
use tunes_config::{
    ConfigGuardRailError, ConfigLoadError, ConfigLoader, ConfigMetadata,
    EnvConfig, FileConfig,
};
use tunes_model::MediaKind;

const SAMPLE: &str = r#"
[api]
base_url = "https://mirror.example.com/"
request_timeout = "5s"
user_agent = "tunes-test/1.0"

[images]
fetch_timeout = "2s"
max_entries = 32
max_mib = 8

[search]
media = "podcast"
limit = 50
related_limit = 3
"#;

fn env_from(pairs: &[(&str, &str)]) -> EnvConfig {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    EnvConfig::from_lookup(|name| vars.get(name).cloned())
}

fn sample_file() -> FileConfig {
    toml::from_str(SAMPLE).expect("sample parses")
}

#[test]
fn loads_explicit_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tunes.toml");
    fs::write(&path, SAMPLE).unwrap();

    let load = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_file(dir.path().join("missing.env"))
        .load()
        .expect("config loads");
    let config = load.config;

    assert_eq!(config.api.base_url.as_str(), "https://mirror.example.com/");
    assert_eq!(config.api.request_timeout, Duration::from_secs(5));
    assert_eq!(config.images.max_entries, 32);
    assert_eq!(config.search.media, MediaKind::Podcast);
    assert_eq!(config.metadata.config_path.as_deref(), Some(path.as_path()));
    assert!(!config.metadata.env_file_loaded);

    let catalog = config.catalog();
    assert_eq!(catalog.base_url, "https://mirror.example.com");
    assert_eq!(catalog.related_works_limit, 3);
    assert_eq!(config.image_cache().max_bytes.as_bytes(), 8 * 1024 * 1024);
}

#[test]
fn env_file_is_reported_when_present() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("tunes.toml");
    let env_path = dir.path().join(".env");
    fs::write(&config_path, "").unwrap();
    fs::write(&env_path, "TUNES_LOADER_TEST_MARKER=1\n").unwrap();

    let load = ConfigLoader::new()
        .with_config_path(&config_path)
        .with_env_file(&env_path)
        .load()
        .expect("config loads");

    assert!(load.config.metadata.env_file_loaded);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = ConfigLoader::new()
        .with_config_path(dir.path().join("nope.toml"))
        .with_env_file(dir.path().join("missing.env"))
        .load()
        .expect_err("must fail");
    assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
}

#[test]
fn malformed_file_reports_its_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tunes.toml");
    fs::write(&path, "[search\nlimit = ").unwrap();

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_file(dir.path().join("missing.env"))
        .load()
        .expect_err("must fail");
    match err {
        ConfigLoadError::Parse { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn environment_overrides_file_values() {
    let env = env_from(&[
        ("TUNES_REQUEST_TIMEOUT", "30s"),
        ("TUNES_SEARCH_MEDIA", "musicVideo"),
        ("TUNES_SEARCH_LIMIT", "100"),
        ("TUNES_IMAGE_CACHE_ENTRIES", "64"),
    ]);

    let load = ConfigLoader::compose(Some(sample_file()), env, ConfigMetadata::default())
        .expect("composes");
    let config = load.config;

    assert_eq!(config.api.request_timeout, Duration::from_secs(30));
    assert_eq!(config.api.user_agent, "tunes-test/1.0");
    assert_eq!(config.search.media, MediaKind::MusicVideo);
    assert_eq!(config.search.limit, 100);
    assert_eq!(config.images.max_entries, 64);
    assert_eq!(config.images.max_mib, 8);
    assert!(load.warnings.is_empty());
}

#[test]
fn defaults_apply_without_any_source() {
    let load = ConfigLoader::compose(None, EnvConfig::default(), ConfigMetadata::default())
        .expect("composes");
    assert_eq!(load.config.api.base_url.as_str(), "https://itunes.apple.com/");
    assert_eq!(load.config.api.request_timeout, Duration::from_secs(14));
    assert_eq!(load.config.images.max_entries, 256);
    assert_eq!(load.config.search.limit, 20);
    assert!(load.config.api.user_agent.starts_with("tunes/"));
}

#[test]
fn unparsable_environment_values_name_the_variable() {
    let env = env_from(&[("TUNES_REQUEST_TIMEOUT", "whenever")]);
    let err = ConfigLoader::compose(None, env, ConfigMetadata::default())
        .expect_err("must fail");
    assert!(matches!(
        err,
        ConfigLoadError::InvalidValue {
            key: "TUNES_REQUEST_TIMEOUT",
            ..
        }
    ));

    let env = env_from(&[("TUNES_SEARCH_MEDIA", "vinyl")]);
    let err = ConfigLoader::compose(None, env, ConfigMetadata::default())
        .expect_err("must fail");
    assert!(matches!(
        err,
        ConfigLoadError::InvalidValue {
            key: "TUNES_SEARCH_MEDIA",
            ..
        }
    ));
}

#[test]
fn base_url_must_parse_and_be_http() {
    let env = env_from(&[("TUNES_API_BASE_URL", "itunes.apple.com")]);
    assert!(matches!(
        ConfigLoader::compose(None, env, ConfigMetadata::default()),
        Err(ConfigLoadError::InvalidBaseUrl { .. })
    ));

    let env = env_from(&[("TUNES_API_BASE_URL", "ftp://itunes.apple.com")]);
    assert!(matches!(
        ConfigLoader::compose(None, env, ConfigMetadata::default()),
        Err(ConfigLoadError::GuardRail(
            ConfigGuardRailError::UnsupportedScheme { .. }
        ))
    ));
}

#[test]
fn out_of_range_limit_is_rejected() {
    let env = env_from(&[("TUNES_SEARCH_LIMIT", "0")]);
    assert!(matches!(
        ConfigLoader::compose(None, env, ConfigMetadata::default()),
        Err(ConfigLoadError::GuardRail(
            ConfigGuardRailError::LimitOutOfRange { value: 0, .. }
        ))
    ));
}
