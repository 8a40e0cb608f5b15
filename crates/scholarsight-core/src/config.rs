//! Runtime configuration.
//!
//! Values are resolved with the precedence command-line flag > environment
//! variable > config file > built-in default. The API key has no default:
//! without one nothing can start.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::gemini::DEFAULT_ENDPOINT;

/// Environment variables checked for the API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

pub const DEFAULT_EXPLAIN_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_REPHRASE_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("API_KEY environment variable not set (also checked GEMINI_API_KEY and the config file)")]
    MissingApiKey,
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Contents of the optional `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub api_key: Option<String>,
    pub explain_model: Option<String>,
    pub rephrase_model: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// `<config_dir>/scholarsight/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("scholarsight").join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if given, otherwise the default location. A missing file
    /// at the default location is not an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(p) if p.exists() => Self::load(&p),
            _ => Ok(Self::default()),
        }
    }
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub explain_model: Option<String>,
    pub rephrase_model: Option<String>,
    pub endpoint: Option<String>,
}

/// Fully resolved configuration.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub explain_model: String,
    pub rephrase_model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("explain_model", &self.explain_model)
            .field("rephrase_model", &self.rephrase_model)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    /// Resolve from the process environment and the config file.
    pub fn load(overrides: Overrides, config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = ConfigFile::load_or_default(config_path)?;
        Self::resolve(overrides, file, |name| std::env::var(name).ok())
    }

    /// Resolve from explicit sources. `env` looks up an environment variable.
    pub fn resolve(
        overrides: Overrides,
        file: ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let env = |name: &str| present(env(name));

        let api_key = present(overrides.api_key)
            .or_else(|| API_KEY_VARS.iter().find_map(|name| env(*name)))
            .or_else(|| present(file.api_key))
            .ok_or(ConfigError::MissingApiKey)?;

        let explain_model = present(overrides.explain_model)
            .or_else(|| env("SCHOLARSIGHT_EXPLAIN_MODEL"))
            .or_else(|| present(file.explain_model))
            .unwrap_or_else(|| DEFAULT_EXPLAIN_MODEL.to_string());

        let rephrase_model = present(overrides.rephrase_model)
            .or_else(|| env("SCHOLARSIGHT_REPHRASE_MODEL"))
            .or_else(|| present(file.rephrase_model))
            .unwrap_or_else(|| DEFAULT_REPHRASE_MODEL.to_string());

        let endpoint = present(overrides.endpoint)
            .or_else(|| present(file.endpoint))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = match env("SCHOLARSIGHT_TIMEOUT") {
            Some(v) => parse_timeout("SCHOLARSIGHT_TIMEOUT", &v)?,
            None => match file.timeout_secs {
                Some(0) => {
                    return Err(ConfigError::InvalidValue {
                        name: "timeout_secs",
                        value: "0".to_string(),
                    });
                }
                Some(secs) => secs,
                None => DEFAULT_TIMEOUT_SECS,
            },
        };

        Ok(Self {
            api_key,
            explain_model,
            rephrase_model,
            endpoint,
            timeout_secs,
        })
    }
}

/// Trimmed value, or `None` when blank.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Timeout in whole seconds. Zero would fail every request.
fn parse_timeout(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn missing_key_is_fatal() {
        let err = Config::resolve(Overrides::default(), ConfigFile::default(), env_from(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let err = Config::resolve(
            Overrides::default(),
            ConfigFile::default(),
            env_from(&[("API_KEY", "   ")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn defaults_apply_when_only_key_given() {
        let config = Config::resolve(
            Overrides::default(),
            ConfigFile::default(),
            env_from(&[("API_KEY", "k")]),
        )
        .unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.explain_model, DEFAULT_EXPLAIN_MODEL);
        assert_eq!(config.rephrase_model, DEFAULT_REPHRASE_MODEL);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn precedence_is_flag_env_file() {
        let file = ConfigFile {
            api_key: Some("file-key".into()),
            explain_model: Some("file-model".into()),
            rephrase_model: Some("file-rephrase".into()),
            ..Default::default()
        };
        let env = env_from(&[
            ("GEMINI_API_KEY", "env-key"),
            ("SCHOLARSIGHT_EXPLAIN_MODEL", "env-model"),
        ]);
        let overrides = Overrides {
            api_key: Some("flag-key".into()),
            ..Default::default()
        };

        let config = Config::resolve(overrides, file, env).unwrap();
        assert_eq!(config.api_key, "flag-key");
        assert_eq!(config.explain_model, "env-model");
        assert_eq!(config.rephrase_model, "file-rephrase");
    }

    #[test]
    fn gemini_key_is_preferred_over_api_key() {
        let env = env_from(&[("GEMINI_API_KEY", "a"), ("API_KEY", "b")]);
        let config = Config::resolve(Overrides::default(), ConfigFile::default(), env).unwrap();
        assert_eq!(config.api_key, "a");
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let env = env_from(&[("API_KEY", "k"), ("SCHOLARSIGHT_TIMEOUT", "soon")]);
        let err = Config::resolve(Overrides::default(), ConfigFile::default(), env).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn endpoint_trailing_slash_is_trimmed() {
        let overrides = Overrides {
            api_key: Some("k".into()),
            endpoint: Some("http://localhost:8080/v1beta/".into()),
            ..Default::default()
        };
        let config = Config::resolve(overrides, ConfigFile::default(), env_from(&[])).unwrap();
        assert_eq!(config.endpoint, "http://localhost:8080/v1beta");
    }

    #[test]
    fn debug_output_hides_key() {
        let config = Config::resolve(
            Overrides::default(),
            ConfigFile::default(),
            env_from(&[("API_KEY", "secret-value")]),
        )
        .unwrap();
        assert!(!format!("{config:?}").contains("secret-value"));
    }

    #[test]
    fn loads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_key = \"from-file\"\nexplain_model = \"gemini-x\"\ntimeout_secs = 30\n",
        )
        .unwrap();

        let file = ConfigFile::load(&path).unwrap();
        assert_eq!(file.api_key.as_deref(), Some("from-file"));
        assert_eq!(file.timeout_secs, Some(30));

        let config = Config::resolve(Overrides::default(), file, env_from(&[])).unwrap();
        assert_eq!(config.explain_model, "gemini-x");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn unknown_keys_in_file_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "apikey = \"typo\"\n").unwrap();
        assert!(matches!(
            ConfigFile::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            ConfigFile::load_or_default(Some(&path)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn blank_flag_falls_back_to_environment() {
        let overrides = Overrides {
            api_key: Some("  ".into()),
            explain_model: Some(String::new()),
            ..Overrides::default()
        };
        let config = Config::resolve(
            overrides,
            ConfigFile::default(),
            env_from(&[("GEMINI_API_KEY", "env-key")]),
        )
        .unwrap();
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.explain_model, DEFAULT_EXPLAIN_MODEL);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Config::resolve(
            Overrides::default(),
            ConfigFile::default(),
            env_from(&[("API_KEY", "k"), ("SCHOLARSIGHT_TIMEOUT", "0")]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "SCHOLARSIGHT_TIMEOUT",
                ..
            }
        ));

        let file = ConfigFile {
            timeout_secs: Some(0),
            ..ConfigFile::default()
        };
        let err = Config::resolve(Overrides::default(), file, env_from(&[("API_KEY", "k")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "timeout_secs",
                ..
            }
        ));
    }
}
