//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Translate CRUD calls into one parameterized SQL statement each.
//! - Map result rows into `model` records.
//!
//! # Invariants
//! - Every call opens its own connection through `ConnectionSource` and drops
//!   it on every exit path.
//! - Driver errors propagate unmodified inside `RepoError::Db`.
//! - "Not found" on single-entity lookups is `Ok(None)`, never an error.
//! - No statement spans more than one call; there are no explicit
//!   transactions at this layer.

use crate::config::{AppConfig, ConfigError, DEFAULT_CONNECTION};
use crate::db::{open_db, DbError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod dog_repo;
pub mod neighborhood_repo;
pub mod owner_repo;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    /// Connection string could not be resolved at construction.
    Config(ConfigError),
    /// Database open, migration, or statement failure.
    Db(DbError),
}

impl RepoError {
    /// Whether the database rejected the statement on a constraint.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::Db(err) => err.is_constraint_violation(),
            Self::Config(_) => false,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<ConfigError> for RepoError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Resolved database location shared by the repositories.
///
/// Holds no connection; `connect` opens a fresh one per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSource {
    db_path: PathBuf,
}

impl ConnectionSource {
    /// Resolves the `DefaultConnection` connection string.
    pub fn from_config(config: &AppConfig) -> RepoResult<Self> {
        Self::from_config_key(config, DEFAULT_CONNECTION)
    }

    pub fn from_config_key(config: &AppConfig, name: &str) -> RepoResult<Self> {
        Ok(Self {
            db_path: config.database_path(name)?,
        })
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: path.into(),
        }
    }

    /// Opens a migrated connection for the duration of one operation.
    pub fn connect(&self) -> RepoResult<Connection> {
        Ok(open_db(&self.db_path)?)
    }
}
