pub mod types;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE_NAME: &str = ".gcp-apictl.toml";

/// Environment variable overriding the Service Usage origin
pub const ENV_SERVICE_USAGE_URL: &str = "GCP_APICTL_SERVICE_USAGE_URL";
/// Environment variable carrying an OAuth access token
pub const ENV_ACCESS_TOKEN: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";
/// Environment variable overriding the cache file location
pub const ENV_CACHE_FILE: &str = "GCP_APICTL_CACHE_FILE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the global config file path (~/.gcp-apictl.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Load configuration from file or use defaults
///
/// An explicit path must exist and parse. Otherwise the global config is
/// used when present, falling back to defaults. Environment overrides are
/// applied last.
pub fn load_config(explicit: Option<&Path>) -> Result<types::Config, ConfigError> {
    let mut config = match explicit {
        Some(path) => read_config(path)?,
        None => match global_config_path() {
            Some(global) if global.exists() => read_config(&global).unwrap_or_else(|e| {
                log::warn!("{}; using defaults", e);
                types::Config::default()
            }),
            _ => types::Config::default(),
        },
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn read_config(path: &Path) -> Result<types::Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env_overrides(config: &mut types::Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(origin) = var(ENV_SERVICE_USAGE_URL).filter(|v| !v.is_empty()) {
        config.api.service_usage_origin = origin;
    }
    if let Some(token) = var(ENV_ACCESS_TOKEN).filter(|v| !v.is_empty()) {
        config.api.access_token = Some(token);
    }
    if let Some(path) = var(ENV_CACHE_FILE).filter(|v| !v.is_empty()) {
        config.cache.path = Some(PathBuf::from(path));
    }
    if var(crate::telemetry::ENV_TELEMETRY).as_deref() == Some("false") {
        config.telemetry.enabled = false;
    }
}
