//! Provider settings: environment variables first, TOML settings file second.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{ApiHost, ApiToken, ValidationError};

pub const ENV_API_HOST: &str = "MIMO_API_HOST";
pub const ENV_API_TOKEN: &str = "MIMO_API_TOKEN";
pub const ENV_DATABASE: &str = "MIMO_DATABASE";
pub const ENV_TIMEOUT_SECS: &str = "MIMO_TIMEOUT_SECS";

/// Settings file read when no explicit path is given and the file exists.
pub const DEFAULT_SETTINGS_FILE: &str = "mimo.toml";

/// Database file used when neither source names one.
pub const DEFAULT_DATABASE: &str = "mimo.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} is not set in the environment or the settings file")]
    Missing { key: &'static str },

    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid setting: {0}")]
    Validation(#[from] ValidationError),
}

/// Raw contents of the TOML settings file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub api_host: Option<String>,
    pub api_token: Option<String>,
    pub database: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl FileSettings {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&raw)?)
    }
}

/// Resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_host: ApiHost,
    pub api_token: ApiToken,
    pub database: PathBuf,
    pub timeout: Option<Duration>,
}

impl Settings {
    /// Resolve settings from the process environment and an optional settings file.
    ///
    /// With `file = None`, [`DEFAULT_SETTINGS_FILE`] is read if it exists.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let file_settings = match file {
            Some(path) => FileSettings::read(path)?,
            None => {
                let default_path = Path::new(DEFAULT_SETTINGS_FILE);
                if default_path.is_file() {
                    FileSettings::read(default_path)?
                } else {
                    FileSettings::default()
                }
            }
        };
        Self::resolve(|key| std::env::var(key).ok(), file_settings)
    }

    /// Resolve each value from `env` first, falling back to `file`.
    pub fn resolve<F>(env: F, file: FileSettings) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let api_host = env(ENV_API_HOST)
            .or(file.api_host)
            .ok_or(ConfigError::Missing { key: ENV_API_HOST })?;
        let api_token = env(ENV_API_TOKEN)
            .or(file.api_token)
            .ok_or(ConfigError::Missing { key: ENV_API_TOKEN })?;
        let database = env(ENV_DATABASE)
            .map(PathBuf::from)
            .or(file.database)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));
        let timeout_secs = match env(ENV_TIMEOUT_SECS) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue {
                    key: ENV_TIMEOUT_SECS,
                    value: raw.clone(),
                }
            })?),
            None => file.timeout_secs,
        };

        Ok(Self {
            api_host: ApiHost::new(api_host)?,
            api_token: ApiToken::new(api_token)?,
            database,
            timeout: timeout_secs.map(Duration::from_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn file_with_credentials() -> FileSettings {
        FileSettings {
            api_host: Some("https://file.example.ao/v1/".to_owned()),
            api_token: Some("file-token".to_owned()),
            database: Some(PathBuf::from("file.db")),
            timeout_secs: Some(10),
        }
    }

    #[test]
    fn environment_overrides_settings_file() {
        let env = env_from(&[
            (ENV_API_HOST, "https://env.example.ao/v1/"),
            (ENV_API_TOKEN, "env-token"),
        ]);
        let settings = Settings::resolve(env, file_with_credentials()).unwrap();
        assert_eq!(settings.api_host.as_str(), "https://env.example.ao/v1/");
        assert_eq!(settings.api_token.as_str(), "env-token");
        assert_eq!(settings.database, PathBuf::from("file.db"));
        assert_eq!(settings.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn settings_file_fills_missing_environment() {
        let env = env_from(&[(ENV_API_TOKEN, "   ")]);
        let settings = Settings::resolve(env, file_with_credentials()).unwrap();
        assert_eq!(settings.api_host.as_str(), "https://file.example.ao/v1/");
        assert_eq!(settings.api_token.as_str(), "file-token");
    }

    #[test]
    fn missing_host_and_token_fail() {
        let err = Settings::resolve(env_from(&[]), FileSettings::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { key: ENV_API_HOST }));

        let env = env_from(&[(ENV_API_HOST, "https://env.example.ao")]);
        let err = Settings::resolve(env, FileSettings::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { key: ENV_API_TOKEN }));
    }

    #[test]
    fn defaults_apply_without_database_or_timeout() {
        let env = env_from(&[
            (ENV_API_HOST, "https://env.example.ao"),
            (ENV_API_TOKEN, "tok"),
        ]);
        let settings = Settings::resolve(env, FileSettings::default()).unwrap();
        assert_eq!(settings.database, PathBuf::from(DEFAULT_DATABASE));
        assert_eq!(settings.timeout, None);
    }

    #[test]
    fn invalid_timeout_is_reported() {
        let env = env_from(&[
            (ENV_API_HOST, "https://env.example.ao"),
            (ENV_API_TOKEN, "tok"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]);
        let err = Settings::resolve(env, FileSettings::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS,
                ..
            }
        ));
    }

    #[test]
    fn settings_file_is_parsed_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "api_host = \"https://file.example.ao/v1/\"\napi_token = \"file-token\"\ntimeout_secs = 5"
        )
        .unwrap();

        let parsed = FileSettings::read(file.path()).unwrap();
        assert_eq!(parsed.api_host.as_deref(), Some("https://file.example.ao/v1/"));
        assert_eq!(parsed.timeout_secs, Some(5));
        assert_eq!(parsed.database, None);
    }

    #[test]
    fn unreadable_settings_file_is_reported() {
        let err = FileSettings::read(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
