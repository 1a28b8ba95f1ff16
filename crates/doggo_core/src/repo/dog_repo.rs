//! Dog repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over the `Dog` table.
//! - Own dog row mapping, reused by the owner repository for its joined query.
//!
//! # Invariants
//! - `NULL` `Notes`/`ImageUrl` map to `None`.
//! - Lists are ordered by `Id ASC`.

use crate::config::AppConfig;
use crate::model::dog::{Dog, DogId};
use crate::model::owner::OwnerId;
use crate::repo::{ConnectionSource, RepoResult};
use log::{debug, warn};
use rusqlite::{params, Row};

const DOG_SELECT_SQL: &str = "SELECT
    Id,
    Name,
    Breed,
    Notes,
    ImageUrl,
    OwnerId
FROM Dog";

/// Result-set column names for dog fields.
///
/// Joined queries alias dog columns that collide with the other table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DogColumns {
    pub(crate) id: &'static str,
    pub(crate) name: &'static str,
    pub(crate) breed: &'static str,
    pub(crate) notes: &'static str,
    pub(crate) image_url: &'static str,
    pub(crate) owner_id: &'static str,
}

/// Column names of a plain `SELECT ... FROM Dog`.
pub(crate) const DOG_COLUMNS: DogColumns = DogColumns {
    id: "Id",
    name: "Name",
    breed: "Breed",
    notes: "Notes",
    image_url: "ImageUrl",
    owner_id: "OwnerId",
};

/// Repository interface for dog CRUD operations.
pub trait DogRepository {
    fn get_all_dogs(&self) -> RepoResult<Vec<Dog>>;
    fn get_dog_by_id(&self, id: DogId) -> RepoResult<Option<Dog>>;
    fn get_dogs_by_owner_id(&self, owner_id: OwnerId) -> RepoResult<Vec<Dog>>;
    /// Inserts `dog` and writes the generated id back onto it.
    fn add_dog(&self, dog: &mut Dog) -> RepoResult<()>;
    /// Full-row update by id. A missing id changes nothing.
    fn update_dog(&self, dog: &Dog) -> RepoResult<()>;
    fn delete_dog(&self, id: DogId) -> RepoResult<()>;
}

/// SQLite-backed dog repository.
#[derive(Debug, Clone)]
pub struct SqliteDogRepository {
    source: ConnectionSource,
}

impl SqliteDogRepository {
    /// Resolves `DefaultConnection` from `config`.
    pub fn new(config: &AppConfig) -> RepoResult<Self> {
        Ok(Self::from_source(ConnectionSource::from_config(config)?))
    }

    pub fn from_source(source: ConnectionSource) -> Self {
        Self { source }
    }

    fn query_dogs(&self, sql: &str, owner_id: Option<OwnerId>) -> RepoResult<Vec<Dog>> {
        let conn = self.source.connect()?;
        let mut stmt = conn.prepare(sql)?;
        let mut rows = match owner_id {
            Some(owner_id) => stmt.query([owner_id])?,
            None => stmt.query([])?,
        };

        let mut dogs = Vec::new();
        while let Some(row) = rows.next()? {
            dogs.push(map_dog_row(row, &DOG_COLUMNS)?);
        }
        Ok(dogs)
    }
}

impl DogRepository for SqliteDogRepository {
    fn get_all_dogs(&self) -> RepoResult<Vec<Dog>> {
        self.query_dogs(&format!("{DOG_SELECT_SQL} ORDER BY Id ASC;"), None)
    }

    fn get_dog_by_id(&self, id: DogId) -> RepoResult<Option<Dog>> {
        let conn = self.source.connect()?;
        let mut stmt = conn.prepare(&format!("{DOG_SELECT_SQL} WHERE Id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(map_dog_row(row, &DOG_COLUMNS)?));
        }
        Ok(None)
    }

    fn get_dogs_by_owner_id(&self, owner_id: OwnerId) -> RepoResult<Vec<Dog>> {
        self.query_dogs(
            &format!("{DOG_SELECT_SQL} WHERE OwnerId = ?1 ORDER BY Id ASC;"),
            Some(owner_id),
        )
    }

    fn add_dog(&self, dog: &mut Dog) -> RepoResult<()> {
        let conn = self.source.connect()?;
        let id: DogId = conn.query_row(
            "INSERT INTO Dog (Name, Breed, Notes, ImageUrl, OwnerId)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING Id;",
            params![
                dog.name.as_str(),
                dog.breed.as_str(),
                dog.notes.as_deref(),
                dog.image_url.as_deref(),
                dog.owner_id,
            ],
            |row| row.get(0),
        )?;

        dog.id = id;
        debug!(
            "event=dog_add module=repo status=ok dog_id={id} owner_id={}",
            dog.owner_id
        );
        Ok(())
    }

    fn update_dog(&self, dog: &Dog) -> RepoResult<()> {
        let conn = self.source.connect()?;
        let changed = conn.execute(
            "UPDATE Dog
             SET
                Name = ?1,
                Breed = ?2,
                Notes = ?3,
                ImageUrl = ?4,
                OwnerId = ?5
             WHERE Id = ?6;",
            params![
                dog.name.as_str(),
                dog.breed.as_str(),
                dog.notes.as_deref(),
                dog.image_url.as_deref(),
                dog.owner_id,
                dog.id,
            ],
        )?;

        if changed == 0 {
            warn!("event=dog_update module=repo status=noop dog_id={}", dog.id);
        }
        Ok(())
    }

    fn delete_dog(&self, id: DogId) -> RepoResult<()> {
        let conn = self.source.connect()?;
        let changed = conn.execute("DELETE FROM Dog WHERE Id = ?1;", [id])?;

        if changed == 0 {
            warn!("event=dog_delete module=repo status=noop dog_id={id}");
        }
        Ok(())
    }
}

/// Maps one dog from `row` using the given column names.
pub(crate) fn map_dog_row(row: &Row<'_>, columns: &DogColumns) -> rusqlite::Result<Dog> {
    Ok(Dog {
        id: row.get(columns.id)?,
        name: row.get(columns.name)?,
        breed: row.get(columns.breed)?,
        notes: row.get(columns.notes)?,
        image_url: row.get(columns.image_url)?,
        owner_id: row.get(columns.owner_id)?,
    })
}

/// Maps the dog side of an outer join; `None` when the dog id is `NULL`.
pub(crate) fn map_joined_dog_row(
    row: &Row<'_>,
    columns: &DogColumns,
) -> rusqlite::Result<Option<Dog>> {
    match row.get::<_, Option<DogId>>(columns.id)? {
        Some(_) => map_dog_row(row, columns).map(Some),
        None => Ok(None),
    }
}
