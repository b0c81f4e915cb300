use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::infra::{
    config::{file_config::FileConfig, AppConfig},
    error::AppError,
};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

const CONNECTION_STRING_ENV: &str = "ACS_CONNECTION_STRING";
const ENDPOINT_ENV: &str = "ACS_ENDPOINT";
const LOG_LEVEL_ENV: &str = "ACS_CHAT_LOG";

pub fn load(path: Option<&Path>) -> Result<AppConfig, AppError> {
    load_internal(path, |name| env::var(name).ok())
}

/// Defaults, then the TOML file, then environment overrides read through
/// `lookup`.
pub(crate) fn load_internal(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig, AppError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = AppConfig::default();

    if config_path.exists() {
        let raw = fs::read_to_string(&config_path).map_err(|source| AppError::ConfigRead {
            path: config_path.clone(),
            source,
        })?;

        let file_config: FileConfig =
            toml::from_str(&raw).map_err(|source| AppError::ConfigParse {
                path: config_path.clone(),
                source,
            })?;

        file_config.merge_into(&mut config);
    } else if path.is_some() {
        tracing::debug!(path = %config_path.display(), "config file not found, using defaults");
    }

    apply_env_overrides(&mut config, lookup);
    config.validate()?;
    Ok(config)
}

fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(connection_string) = non_empty(CONNECTION_STRING_ENV) {
        config.service.connection_string = Some(connection_string);
    }

    if let Some(endpoint) = non_empty(ENDPOINT_ENV) {
        config.service.endpoint = Some(endpoint);
    }

    if let Some(level) = non_empty(LOG_LEVEL_ENV) {
        config.logging.level = level;
    }
}
