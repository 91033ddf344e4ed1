use std::path::{Path, PathBuf};

use ehs_llm::providers::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE_PATH: &str = "config.toml";

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    /// Empty means no proxy.
    pub https_proxy: String,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            https_proxy: String::new(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    /// Read the config file, then apply environment overrides.
    ///
    /// An explicit `path` must exist; the default `config.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(CONFIG_FILE_PATH).exists() => {
                Self::from_file(Path::new(CONFIG_FILE_PATH))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay values from `lookup`, which is `std::env::var` outside of tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(api_key) = non_empty("GEMINI_API_KEY").or_else(|| non_empty("GOOGLE_API_KEY")) {
            self.api_key = Some(api_key);
        }
        if let Some(api_base) = non_empty("GEMINI_API_BASE") {
            self.api_base = api_base;
        }
        if let Some(model) = non_empty("GEMINI_MODEL") {
            self.model = model;
        }
        if let Some(proxy) = non_empty("HTTPS_PROXY") {
            self.https_proxy = proxy;
        }
        if let Some(limit) = non_empty("EHS_MAX_UPLOAD_BYTES") {
            match limit.trim().parse::<usize>() {
                Ok(limit) => self.max_upload_bytes = limit,
                Err(_) => log::warn!(
                    "Ignoring EHS_MAX_UPLOAD_BYTES={:?}, keeping {} bytes",
                    limit,
                    self.max_upload_bytes
                ),
            }
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_file_then_env_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "api_key = \"from-file\"\nmodel = \"gemini-1.5-pro\"\nmax_upload_bytes = 1024"
        )
        .unwrap();

        let mut config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.api_base, DEFAULT_BASE_URL);

        config.apply_env(env(&[
            ("GOOGLE_API_KEY", "from-google"),
            ("GEMINI_MODEL", "gemini-2.0-flash-lite"),
            ("EHS_MAX_UPLOAD_BYTES", "not-a-number"),
        ]));

        assert_eq!(config.api_key.as_deref(), Some("from-google"));
        assert_eq!(config.model, "gemini-2.0-flash-lite");
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn test_gemini_key_wins_over_google_key() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("GEMINI_API_KEY", "gemini"),
            ("GOOGLE_API_KEY", "google"),
            ("HTTPS_PROXY", "http://proxy.local:3128"),
            ("GEMINI_API_BASE", " "),
        ]));

        assert_eq!(config.api_key.as_deref(), Some("gemini"));
        assert_eq!(config.https_proxy, "http://proxy.local:3128");
        assert_eq!(config.api_base, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let error = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(error, ConfigError::Read { .. }));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_upload_bytes = \"lots\"").unwrap();

        let error = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
    }
}
