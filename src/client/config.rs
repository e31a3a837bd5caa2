//! Configuration for the HTTP datasource.
//!
//! With the `cli` feature, configuration is loaded from TOML with the
//! following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `<user config dir>/promql-assist/config.toml`
//! 3. built-in defaults

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Connection and lookup settings for [`PrometheusClient`](super::PrometheusClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL (default: `http://localhost:9090`).
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
    /// Skip all metadata fetching.
    pub lookups_disabled: bool,
    /// Whether the backend's label endpoints accept `match[]`.
    pub labels_match_api: bool,
    /// Per-endpoint result caps: `series`, `labels`, `label_values`,
    /// `metadata`. Missing keys mean unbounded.
    pub limits: HashMap<String, u64>,
    /// Metadata queries cover the last `lookback_secs` (default: 1 hour).
    pub lookback_secs: u64,
    /// Template variables substituted for `$name` and `${name}`.
    pub variables: HashMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9090".to_string(),
            timeout_secs: 30,
            lookups_disabled: false,
            labels_match_api: false,
            limits: HashMap::new(),
            lookback_secs: 3600,
            variables: HashMap::new(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn lookups_disabled(mut self, disabled: bool) -> Self {
        self.lookups_disabled = disabled;
        self
    }

    pub fn labels_match_api(mut self, supported: bool) -> Self {
        self.labels_match_api = supported;
        self
    }

    pub fn limit(mut self, key: impl Into<String>, limit: u64) -> Self {
        self.limits.insert(key.into(), limit);
        self
    }

    pub fn lookback_secs(mut self, secs: u64) -> Self {
        self.lookback_secs = secs;
        self
    }

    pub fn variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }
}

/// Replace `$name` and `${name}` with known variable values.
///
/// Unknown variables, such as `$__interval`, are left in place.
pub fn interpolate(value: &str, variables: &HashMap<String, String>) -> String {
    if variables.is_empty() || !value.contains('$') {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        match variables.get(name) {
            Some(replacement) if !name.is_empty() => {
                out.push_str(replacement);
                rest = &after[consumed..];
            }
            _ => {
                out.push('$');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// The CLI's configuration file.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub provider: crate::ProviderConfig,
}

#[cfg(feature = "cli")]
impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Without one, a missing user config
    /// falls back to defaults.
    pub fn load(explicit_path: Option<&std::path::Path>) -> crate::Result<Self> {
        use crate::AssistError;

        let path = match explicit_path {
            Some(path) if path.exists() => path.to_path_buf(),
            Some(path) => {
                return Err(AssistError::Configuration(format!(
                    "Config file not found: {path:?}"
                )));
            }
            None => match dirs::config_dir()
                .map(|dir| dir.join("promql-assist").join("config.toml"))
                .filter(|path| path.exists())
            {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&path).map_err(|e| {
            AssistError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            AssistError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }
}
