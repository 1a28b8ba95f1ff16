//! Data-access layer for the DogGo pet-owner application.
//!
//! Repositories resolve their database from [`AppConfig`], open one SQLite
//! connection per call, and map rows into [`Owner`], [`Dog`] and
//! [`Neighborhood`] records.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use config::{AppConfig, ConfigError, LoggingSettings, DEFAULT_CONNECTION};
pub use db::{DbError, DbResult};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::dog::{Dog, DogId};
pub use model::neighborhood::{Neighborhood, NeighborhoodId};
pub use model::owner::{Owner, OwnerId};
pub use repo::dog_repo::{DogRepository, SqliteDogRepository};
pub use repo::neighborhood_repo::{NeighborhoodRepository, SqliteNeighborhoodRepository};
pub use repo::owner_repo::{OwnerRepository, SqliteOwnerRepository};
pub use repo::{ConnectionSource, RepoError, RepoResult};
