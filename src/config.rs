use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const ENV_BASE_URL: &str = "YT_URL";
pub const ENV_TOKEN: &str = "YT_AUTH";
pub const ENV_DEBUG: &str = "YT_DEBUG";

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub youtrack: YouTrackConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct YouTrackConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Default)]
pub struct AppConfigOverrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub debug: Option<bool>,
}

/// Connection settings handed to the request builder.
///
/// The base URL never ends with `/`; resource paths always start with one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    base_url: String,
    token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting {0}; set the environment variable or add it to the config file")]
    Missing(&'static str),
    #[error("failed to resolve config path: HOME is not set and XDG_CONFIG_HOME is unset")]
    MissingHomeDirectory,
    #[error("failed to read config file at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse TOML config at {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        let token = token.into();

        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::Missing(ENV_BASE_URL));
        }
        let parsed = reqwest::Url::parse(trimmed)
            .map_err(|err| ConfigError::Invalid(format!("{ENV_BASE_URL} '{base_url}': {err}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::Invalid(format!(
                "{ENV_BASE_URL} must be an http(s) url: {base_url}"
            )));
        }

        let token = token.trim();
        if token.is_empty() {
            return Err(ConfigError::Missing(ENV_TOKEN));
        }

        Ok(Self {
            base_url: trimmed.to_string(),
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl AppConfigOverrides {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            base_url: lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()),
            token: lookup(ENV_TOKEN).filter(|v| !v.trim().is_empty()),
            debug: lookup(ENV_DEBUG).map(|v| {
                let normalized = v.trim().to_ascii_lowercase();
                normalized == "1" || normalized == "true" || normalized == "yes"
            }),
        }
    }
}

/// Loads the optional config file and layers the environment on top.
pub fn load() -> Result<AppConfig, ConfigError> {
    let mut cfg = match resolve_config_path() {
        Ok(path) => load_optional(&path)?,
        Err(ConfigError::MissingHomeDirectory) => AppConfig::default(),
        Err(err) => return Err(err),
    };
    cfg.apply_overrides(&AppConfigOverrides::from_env());
    Ok(cfg)
}

/// A missing file yields the defaults; an unreadable or malformed one is an error.
pub fn load_optional(path: &Path) -> Result<AppConfig, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::ReadFailed {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    toml::from_str::<AppConfig>(&raw).map_err(|source| ConfigError::ParseFailed {
        path: path.to_path_buf(),
        source,
    })
}

pub fn resolve_config_path() -> Result<PathBuf, ConfigError> {
    let xdg_config_home = std::env::var_os("XDG_CONFIG_HOME");
    let home = std::env::var_os("HOME");
    resolve_config_path_from_env(xdg_config_home, home)
}

fn resolve_config_path_from_env(
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = xdg_config_home.filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(dir).join("ytissues").join("config.toml"));
    }

    let home = home
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingHomeDirectory)?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("ytissues")
        .join("config.toml"))
}

impl AppConfig {
    pub fn apply_overrides(&mut self, overrides: &AppConfigOverrides) {
        if let Some(value) = &overrides.base_url {
            self.youtrack.base_url = Some(value.clone());
        }
        if let Some(value) = &overrides.token {
            self.youtrack.token = Some(value.clone());
        }
        if let Some(value) = overrides.debug {
            self.logging.debug = value;
        }
    }

    /// Fails with [`ConfigError::Missing`] when the URL or the token is unset.
    pub fn service(&self) -> Result<ServiceConfig, ConfigError> {
        let base_url = self
            .youtrack
            .base_url
            .clone()
            .ok_or(ConfigError::Missing(ENV_BASE_URL))?;
        let token = self
            .youtrack
            .token
            .clone()
            .ok_or(ConfigError::Missing(ENV_TOKEN))?;
        ServiceConfig::new(base_url, token)
    }
}
