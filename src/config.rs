//! Runtime configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file (behind the `config`
//! feature), then command-line overrides. Every layer is a [`ConfigLayer`] of optional
//! values; [`AppConfig::resolve`] folds them together and validates the result.

use crate::directory::DEFAULT_ENDPOINT;
use crate::error::{Result, UserlookError};
use crate::input::DEFAULT_QUIET_PERIOD_MS;
use crate::render::ui::ColorTheme;
use crate::render::ResponseOrdering;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// One source of settings. Unset fields fall through to the layer below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub endpoint: Option<String>,
    pub debounce_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub ordering: Option<ResponseOrdering>,
    pub theme: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl ConfigLayer {
    /// Overlay `other` on top of `self`; values set in `other` win.
    pub fn merge(self, other: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            endpoint: other.endpoint.or(self.endpoint),
            debounce_ms: other.debounce_ms.or(self.debounce_ms),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
            ordering: other.ordering.or(self.ordering),
            theme: other.theme.or(self.theme),
            log_file: other.log_file.or(self.log_file),
        }
    }
}

/// Fully resolved and validated settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub endpoint: Url,
    pub quiet_period: Duration,
    pub request_timeout: Duration,
    pub ordering: ResponseOrdering,
    pub theme: String,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            quiet_period: Duration::from_millis(DEFAULT_QUIET_PERIOD_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            ordering: ResponseOrdering::default(),
            theme: "default".to_string(),
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Apply `layer` over the defaults and validate the outcome.
    pub fn resolve(layer: ConfigLayer) -> Result<Self> {
        let defaults = Self::default();

        let endpoint = match layer.endpoint {
            Some(raw) => parse_endpoint(&raw)?,
            None => defaults.endpoint,
        };

        let quiet_period = match layer.debounce_ms {
            Some(0) => {
                return Err(UserlookError::invalid_argument(
                    "debounce must be at least 1 ms",
                ))
            }
            Some(ms) => Duration::from_millis(ms),
            None => defaults.quiet_period,
        };

        let request_timeout = match layer.request_timeout_secs {
            Some(0) => {
                return Err(UserlookError::invalid_argument(
                    "request timeout must be at least 1 second",
                ))
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.request_timeout,
        };

        let theme = layer.theme.unwrap_or(defaults.theme);
        if ColorTheme::from_name(&theme).is_none() {
            return Err(UserlookError::invalid_argument(format!(
                "unknown theme {theme:?} (expected default, monochrome or high-contrast)"
            )));
        }

        Ok(Self {
            endpoint,
            quiet_period,
            request_timeout,
            ordering: layer.ordering.unwrap_or(defaults.ordering),
            theme,
            log_file: layer.log_file,
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|err| UserlookError::invalid_argument(format!("endpoint {raw:?}: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(UserlookError::invalid_argument(format!(
            "endpoint must use http or https, got {other:?}"
        ))),
    }
}

/// Location of the per-user config file, e.g. `~/.config/userlook/config.toml`.
#[cfg(feature = "config")]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("userlook").join("config.toml"))
}

/// Read a TOML config layer from `path`.
#[cfg(feature = "config")]
pub fn load_config_file(path: &Path) -> Result<ConfigLayer> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| UserlookError::config(format!("{}: {}", path.display(), err)))?;
    toml::from_str(&raw).map_err(|err| UserlookError::config(format!("{}: {}", path.display(), err)))
}

/// Load the file layer: an explicit path must exist, the default path is optional.
#[cfg(feature = "config")]
pub fn load_file_layer(explicit: Option<&Path>) -> Result<ConfigLayer> {
    match explicit {
        Some(path) => load_config_file(path),
        None => match default_config_path() {
            Some(path) if path.is_file() => load_config_file(&path),
            _ => Ok(ConfigLayer::default()),
        },
    }
}

/// Without the `config` feature only an explicit path is an error; nothing is ever read.
#[cfg(not(feature = "config"))]
pub fn load_file_layer(explicit: Option<&Path>) -> Result<ConfigLayer> {
    match explicit {
        Some(path) => Err(UserlookError::config(format!(
            "{}: built without the `config` feature",
            path.display()
        ))),
        None => Ok(ConfigLayer::default()),
    }
}
