mod types;

pub use types::*;

use crate::{Error, Result};
use std::{collections::HashSet, env, path::Path};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

pub async fn load() -> Result<Config> {
    load_from(config_path(env::var("CONFIG_PATH").ok())).await
}

/// `CONFIG_PATH` when set and non-empty, else `config.yaml`.
pub fn config_path(from_env: Option<String>) -> String {
    from_env
        .filter(|path| !path.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

pub async fn load_from(config_path: impl AsRef<Path>) -> Result<Config> {
    let config_path = config_path.as_ref();
    debug!("Loading configuration from: {}", config_path.display());

    let config_str = tokio::fs::read_to_string(config_path).await?;
    parse(&config_str)
}

pub fn parse(config_str: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(config_str)?;
    validate(&config)?;
    Ok(config)
}

/// Accepts the level names understood by the log filter.
pub fn validate_log_level(level: &str) -> Result<()> {
    level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .map_err(|_| {
            Error::config(format!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                level
            ))
        })?;
    Ok(())
}

fn validate(config: &Config) -> Result<()> {
    validate_log_level(&config.server.logs.level)?;
    if config.server.api_key.trim().is_empty() {
        return Err(Error::config("server.api_key must not be empty"));
    }
    if config.predictors.models.is_empty() {
        return Err(Error::config("at least one predictor must be configured"));
    }
    if config.predictors.timeout_ms == 0 {
        return Err(Error::config("predictors.timeout_ms must be positive"));
    }

    let mut seen = HashSet::new();
    for model in &config.predictors.models {
        if model.name.trim().is_empty() {
            return Err(Error::config("predictor name must not be empty"));
        }
        if !seen.insert(model.name.as_str()) {
            return Err(Error::config(format!(
                "duplicate predictor name: {}",
                model.name
            )));
        }
        match model.predictor_type {
            PredictorType::Http if model.url.is_none() => {
                return Err(Error::config(format!(
                    "http predictor '{}' requires url field",
                    model.name
                )));
            }
            PredictorType::Static if model.label.is_none() => {
                return Err(Error::config(format!(
                    "static predictor '{}' requires label field",
                    model.name
                )));
            }
            _ => {}
        }
    }

    Ok(())
}
