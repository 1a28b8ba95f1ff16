//! Owner repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over the `Owner` table.
//! - Load one owner together with its dogs through a single outer join.
//!
//! # Invariants
//! - Only `get_owner_by_id` populates `Owner::dogs`; list and email lookups
//!   return owners with an empty collection.
//! - Email lookup uses the column collation (`BINARY`, case-sensitive).
//! - Deleting an owner that still has dogs is rejected by the foreign key; no
//!   cascade happens here.

use crate::config::AppConfig;
use crate::model::owner::{Owner, OwnerId};
use crate::repo::dog_repo::{map_joined_dog_row, DogColumns};
use crate::repo::{ConnectionSource, RepoResult};
use log::{debug, warn};
use rusqlite::{params, Row};

const OWNER_SELECT_SQL: &str = "SELECT
    Id,
    Email,
    Name,
    Address,
    NeighborhoodId,
    Phone
FROM Owner";

// `Owner.Name` and `Dog.Name` (and both `Id`s) collide, so every column is aliased.
const OWNER_WITH_DOGS_SQL: &str = "SELECT
    Owner.Id AS oId,
    Owner.Email AS Email,
    Owner.Name AS oName,
    Owner.Address AS Address,
    Owner.NeighborhoodId AS NeighborhoodId,
    Owner.Phone AS Phone,
    Dog.Id AS dId,
    Dog.Name AS dName,
    Dog.Breed AS Breed,
    Dog.Notes AS Notes,
    Dog.ImageUrl AS ImageUrl,
    Dog.OwnerId AS OwnerId
FROM Owner
    LEFT JOIN Dog ON Dog.OwnerId = Owner.Id
WHERE Owner.Id = ?1
ORDER BY Dog.Id ASC;";

#[derive(Debug, Clone, Copy)]
struct OwnerColumns {
    id: &'static str,
    name: &'static str,
}

const OWNER_COLUMNS: OwnerColumns = OwnerColumns {
    id: "Id",
    name: "Name",
};

const JOINED_OWNER_COLUMNS: OwnerColumns = OwnerColumns {
    id: "oId",
    name: "oName",
};

const JOINED_DOG_COLUMNS: DogColumns = DogColumns {
    id: "dId",
    name: "dName",
    breed: "Breed",
    notes: "Notes",
    image_url: "ImageUrl",
    owner_id: "OwnerId",
};

/// Repository interface for owner CRUD operations.
pub trait OwnerRepository {
    /// All owners ordered by id, without dogs.
    fn get_all_owners(&self) -> RepoResult<Vec<Owner>>;
    /// One owner with its dogs eagerly loaded.
    fn get_owner_by_id(&self, id: OwnerId) -> RepoResult<Option<Owner>>;
    /// One owner by exact email, without dogs.
    fn get_owner_by_email(&self, email: &str) -> RepoResult<Option<Owner>>;
    /// Inserts `owner` and writes the generated id back onto it.
    fn add_owner(&self, owner: &mut Owner) -> RepoResult<()>;
    /// Full-row update by id, last write wins. A missing id changes nothing.
    fn update_owner(&self, owner: &Owner) -> RepoResult<()>;
    /// Unconditional delete by id. A missing id changes nothing.
    fn delete_owner(&self, id: OwnerId) -> RepoResult<()>;
}

/// SQLite-backed owner repository.
#[derive(Debug, Clone)]
pub struct SqliteOwnerRepository {
    source: ConnectionSource,
}

impl SqliteOwnerRepository {
    /// Resolves `DefaultConnection` from `config`.
    pub fn new(config: &AppConfig) -> RepoResult<Self> {
        Ok(Self::from_source(ConnectionSource::from_config(config)?))
    }

    pub fn from_source(source: ConnectionSource) -> Self {
        Self { source }
    }
}

impl OwnerRepository for SqliteOwnerRepository {
    fn get_all_owners(&self) -> RepoResult<Vec<Owner>> {
        let conn = self.source.connect()?;
        let mut stmt = conn.prepare(&format!("{OWNER_SELECT_SQL} ORDER BY Id ASC;"))?;
        let mut rows = stmt.query([])?;

        let mut owners = Vec::new();
        while let Some(row) = rows.next()? {
            owners.push(map_owner_row(row, &OWNER_COLUMNS)?);
        }
        Ok(owners)
    }

    fn get_owner_by_id(&self, id: OwnerId) -> RepoResult<Option<Owner>> {
        let conn = self.source.connect()?;
        let mut stmt = conn.prepare(OWNER_WITH_DOGS_SQL)?;
        let mut rows = stmt.query([id])?;

        let mut owner: Option<Owner> = None;
        while let Some(row) = rows.next()? {
            if owner.is_none() {
                owner = Some(map_owner_row(row, &JOINED_OWNER_COLUMNS)?);
            }
            let dog = map_joined_dog_row(row, &JOINED_DOG_COLUMNS)?;
            if let (Some(current), Some(dog)) = (owner.as_mut(), dog) {
                current.dogs.push(dog);
            }
        }

        Ok(owner)
    }

    fn get_owner_by_email(&self, email: &str) -> RepoResult<Option<Owner>> {
        let conn = self.source.connect()?;
        let mut stmt = conn.prepare(&format!("{OWNER_SELECT_SQL} WHERE Email = ?1;"))?;
        let mut rows = stmt.query([email])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(map_owner_row(row, &OWNER_COLUMNS)?));
        }
        Ok(None)
    }

    fn add_owner(&self, owner: &mut Owner) -> RepoResult<()> {
        let conn = self.source.connect()?;
        let id: OwnerId = conn.query_row(
            "INSERT INTO Owner (Name, Email, Phone, Address, NeighborhoodId)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING Id;",
            params![
                owner.name.as_str(),
                owner.email.as_str(),
                owner.phone.as_str(),
                owner.address.as_str(),
                owner.neighborhood_id,
            ],
            |row| row.get(0),
        )?;

        owner.id = id;
        debug!("event=owner_add module=repo status=ok owner_id={id}");
        Ok(())
    }

    fn update_owner(&self, owner: &Owner) -> RepoResult<()> {
        let conn = self.source.connect()?;
        let changed = conn.execute(
            "UPDATE Owner
             SET
                Name = ?1,
                Email = ?2,
                Address = ?3,
                Phone = ?4,
                NeighborhoodId = ?5
             WHERE Id = ?6;",
            params![
                owner.name.as_str(),
                owner.email.as_str(),
                owner.address.as_str(),
                owner.phone.as_str(),
                owner.neighborhood_id,
                owner.id,
            ],
        )?;

        if changed == 0 {
            warn!(
                "event=owner_update module=repo status=noop owner_id={}",
                owner.id
            );
        }
        Ok(())
    }

    fn delete_owner(&self, id: OwnerId) -> RepoResult<()> {
        let conn = self.source.connect()?;
        let changed = conn.execute("DELETE FROM Owner WHERE Id = ?1;", [id])?;

        if changed == 0 {
            warn!("event=owner_delete module=repo status=noop owner_id={id}");
        } else {
            debug!("event=owner_delete module=repo status=ok owner_id={id}");
        }
        Ok(())
    }
}

fn map_owner_row(row: &Row<'_>, columns: &OwnerColumns) -> rusqlite::Result<Owner> {
    Ok(Owner {
        id: row.get(columns.id)?,
        email: row.get("Email")?,
        name: row.get(columns.name)?,
        address: row.get("Address")?,
        neighborhood_id: row.get("NeighborhoodId")?,
        phone: row.get("Phone")?,
        dogs: Vec::new(),
    })
}
