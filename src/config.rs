use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SERVER_URL_ENV: &str = "REANA_SERVER_URL";
pub const ACCESS_TOKEN_ENV: &str = "REANA_ACCESS_TOKEN";
pub const WORKON_ENV: &str = "REANA_WORKON";
pub const CONFIG_ENV: &str = "REANA_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("REANA server URL is not set. Please set the REANA_SERVER_URL environment variable")]
    MissingServerUrl,
    #[error(
        "Please provide your access token by using the -t/--access-token flag, or by setting the REANA_ACCESS_TOKEN environment variable"
    )]
    MissingAccessToken,
    #[error(
        "Workflow name must be provided either with the -w/--workflow flag or the REANA_WORKON environment variable"
    )]
    MissingWorkflow,
    #[error("Invalid REANA server URL '{url}': must start with http:// or https://")]
    InvalidServerUrl { url: String },
}

/// Settings read from the client config file.
///
/// Command-line flags and environment variables take precedence over every field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: Option<String>,
    pub access_token: Option<String>,
    pub workon: Option<String>,
    /// Accept self-signed server certificates
    pub insecure_tls: bool,
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Server URL from the flag/environment, falling back to the file
    pub fn server_url(&self, flag: Option<&str>) -> Result<String, ConfigError> {
        let url = pick(flag, self.server_url.as_deref()).ok_or(ConfigError::MissingServerUrl)?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidServerUrl { url });
        }
        Ok(url.trim_end_matches('/').to_string())
    }

    pub fn access_token(&self, flag: Option<&str>) -> Result<String, ConfigError> {
        pick(flag, self.access_token.as_deref()).ok_or(ConfigError::MissingAccessToken)
    }

    pub fn workflow(&self, flag: Option<&str>) -> Result<String, ConfigError> {
        pick(flag, self.workon.as_deref()).ok_or(ConfigError::MissingWorkflow)
    }
}

fn pick(primary: Option<&str>, fallback: Option<&str>) -> Option<String> {
    primary
        .filter(|v| !v.is_empty())
        .or(fallback.filter(|v| !v.is_empty()))
        .map(str::to_string)
}

/// Default config location, `<config dir>/reana/client.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("reana").join("client.toml"))
}

/// Load the config file.
///
/// An explicitly given path must exist; a missing default file yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    match path {
        Some(path) => load_config_from_path(path),
        None => match default_config_path() {
            Some(path) if path.exists() => load_config_from_path(&path),
            _ => Ok(ClientConfig::default()),
        },
    }
}

pub fn load_config_from_path(path: &Path) -> Result<ClientConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    toml::from_str::<ClientConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })
}
