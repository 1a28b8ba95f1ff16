//! Application settings and connection-string resolution.
//!
//! # Responsibility
//! - Load the JSON settings document (`ConnectionStrings`, `Logging`).
//! - Resolve a named connection string to a SQLite database file.
//!
//! # Invariants
//! - Connection-string names are matched case-insensitively.
//! - Unknown settings sections are ignored.
//! - In-memory data sources are rejected; every repository call opens its
//!   own connection and would see an empty database.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Connection-string key used by every repository.
pub const DEFAULT_CONNECTION: &str = "DefaultConnection";

const ENV_CONNECTION_PREFIX: &str = "DOGGO_CONNECTIONSTRINGS__";
const DATA_SOURCE_KEYS: [&str; 3] = ["data source", "datasource", "filename"];

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    MissingConnectionString(String),
    InvalidConnectionString(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read settings `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid settings document: {err}"),
            Self::MissingConnectionString(name) => {
                write!(f, "connection string `{name}` is not configured")
            }
            Self::InvalidConnectionString(message) => {
                write!(f, "invalid connection string: {message}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::MissingConnectionString(_) => None,
            Self::InvalidConnectionString(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Settings document handed to repository constructors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    #[serde(rename = "ConnectionStrings", default)]
    pub connection_strings: BTreeMap<String, String>,
    #[serde(rename = "Logging", default)]
    pub logging: Option<LoggingSettings>,
}

/// Optional `Logging` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// One of `trace|debug|info|warn|error`. Build-mode default when absent.
    #[serde(rename = "Level", default)]
    pub level: Option<String>,
    /// Absolute directory for rolling log files.
    #[serde(rename = "Directory", default)]
    pub directory: Option<String>,
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a settings file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Sets (or replaces) one connection string.
    pub fn with_connection_string(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.set_connection_string(name.into(), value.into());
        self
    }

    /// Applies `DOGGO_CONNECTIONSTRINGS__<NAME>` process environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.apply_overrides(std::env::vars())
    }

    /// Applies overrides from `(variable, value)` pairs; variables without
    /// the connection-string prefix are ignored.
    pub fn apply_overrides<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_CONNECTION_PREFIX) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            self.set_connection_string(name.to_string(), value);
        }
        self
    }

    /// Looks up a raw connection string by name.
    pub fn connection_string(&self, name: &str) -> Option<&str> {
        self.connection_strings
            .get(name)
            .or_else(|| {
                self.connection_strings
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }

    /// Resolves a named connection string to the database file it points at.
    pub fn database_path(&self, name: &str) -> ConfigResult<PathBuf> {
        let raw = self
            .connection_string(name)
            .ok_or_else(|| ConfigError::MissingConnectionString(name.to_string()))?;
        parse_connection_string(raw)
    }

    fn set_connection_string(&mut self, name: String, value: String) {
        let existing = self
            .connection_strings
            .keys()
            .find(|key| key.eq_ignore_ascii_case(&name))
            .cloned();
        self.connection_strings
            .insert(existing.unwrap_or(name), value);
    }
}

/// Parses either a bare path or `key=value;...` pairs naming the data source.
///
/// The value is read as pairs only when one of its segments carries a data
/// source key, so a path such as `/data/run=1/doggo.db` stays a path.
pub fn parse_connection_string(raw: &str) -> ConfigResult<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidConnectionString(
            "connection string is empty".to_string(),
        ));
    }

    let source = find_data_source(trimmed)?.unwrap_or(trimmed);

    if source.eq_ignore_ascii_case(":memory:") {
        return Err(ConfigError::InvalidConnectionString(
            "in-memory databases cannot be shared across repository calls".to_string(),
        ));
    }

    Ok(PathBuf::from(source))
}

fn find_data_source(raw: &str) -> ConfigResult<Option<&str>> {
    for segment in raw.split(';') {
        let Some((key, value)) = segment.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        if !DATA_SOURCE_KEYS.contains(&key.as_str()) {
            continue;
        }
        let value = value.trim();
        if value.is_empty() {
            return Err(ConfigError::InvalidConnectionString(format!(
                "`{}` has no value",
                segment.trim()
            )));
        }
        return Ok(Some(value));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::{parse_connection_string, AppConfig, ConfigError, DEFAULT_CONNECTION};
    use std::path::PathBuf;

    const SETTINGS: &str = r#"{
        "Logging": { "Level": "debug", "Directory": "/var/log/doggo" },
        "AllowedHosts": "*",
        "ConnectionStrings": {
            "DefaultConnection": "Data Source=/srv/doggo/doggo.db;Mode=ReadWriteCreate"
        }
    }"#;

    #[test]
    fn parses_settings_document_and_ignores_unknown_sections() {
        let config = AppConfig::from_json_str(SETTINGS).unwrap();

        assert_eq!(
            config.database_path(DEFAULT_CONNECTION).unwrap(),
            PathBuf::from("/srv/doggo/doggo.db")
        );
        let logging = config.logging.expect("logging section");
        assert_eq!(logging.level.as_deref(), Some("debug"));
        assert_eq!(logging.directory.as_deref(), Some("/var/log/doggo"));
    }

    #[test]
    fn connection_string_lookup_is_case_insensitive() {
        let config = AppConfig::default().with_connection_string("DefaultConnection", "a.db");
        assert_eq!(config.connection_string("defaultconnection"), Some("a.db"));
        assert_eq!(config.connection_string("Other"), None);
    }

    #[test]
    fn missing_connection_string_is_reported_by_name() {
        let err = AppConfig::default()
            .database_path(DEFAULT_CONNECTION)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingConnectionString(name) if name == "DefaultConnection"));
    }

    #[test]
    fn env_overrides_replace_existing_key_regardless_of_case() {
        let config = AppConfig::default()
            .with_connection_string("DefaultConnection", "old.db")
            .apply_overrides([
                (
                    "DOGGO_CONNECTIONSTRINGS__DEFAULTCONNECTION".to_string(),
                    "Data Source=new.db".to_string(),
                ),
                ("PATH".to_string(), "/usr/bin".to_string()),
                ("DOGGO_CONNECTIONSTRINGS__".to_string(), "ignored".to_string()),
            ]);

        assert_eq!(config.connection_strings.len(), 1);
        assert_eq!(
            config.database_path(DEFAULT_CONNECTION).unwrap(),
            PathBuf::from("new.db")
        );
    }

    #[test]
    fn parse_connection_string_accepts_bare_paths_and_key_aliases() {
        assert_eq!(
            parse_connection_string(" ./data/doggo.db ").unwrap(),
            PathBuf::from("./data/doggo.db")
        );
        assert_eq!(
            parse_connection_string("Cache=Shared; datasource = x.db").unwrap(),
            PathBuf::from("x.db")
        );
        assert_eq!(
            parse_connection_string("Filename=y.db").unwrap(),
            PathBuf::from("y.db")
        );
    }

    #[test]
    fn parse_connection_string_keeps_paths_containing_equals_signs() {
        assert_eq!(
            parse_connection_string("/data/run=1/doggo.db").unwrap(),
            PathBuf::from("/data/run=1/doggo.db")
        );
        assert_eq!(
            parse_connection_string("Data Source=/data/run=1/doggo.db;Mode=ReadWriteCreate").unwrap(),
            PathBuf::from("/data/run=1/doggo.db")
        );
    }

    #[test]
    fn parse_connection_string_rejects_unusable_values() {
        for raw in ["", "   ", "Data Source=", "Cache=Shared;Filename= ", ":memory:", "Data Source=:memory:"] {
            let err = parse_connection_string(raw).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidConnectionString(_)),
                "`{raw}` should be rejected"
            );
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = AppConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
