//! Neighborhood repository: the rows `Owner.NeighborhoodId` points at.

use crate::config::AppConfig;
use crate::model::neighborhood::{Neighborhood, NeighborhoodId};
use crate::repo::{ConnectionSource, RepoResult};
use log::debug;
use rusqlite::Row;

pub trait NeighborhoodRepository {
    fn get_all_neighborhoods(&self) -> RepoResult<Vec<Neighborhood>>;
    fn get_neighborhood_by_id(&self, id: NeighborhoodId) -> RepoResult<Option<Neighborhood>>;
    /// Inserts `neighborhood` and writes the generated id back onto it.
    fn add_neighborhood(&self, neighborhood: &mut Neighborhood) -> RepoResult<()>;
}

#[derive(Debug, Clone)]
pub struct SqliteNeighborhoodRepository {
    source: ConnectionSource,
}

impl SqliteNeighborhoodRepository {
    pub fn new(config: &AppConfig) -> RepoResult<Self> {
        Ok(Self::from_source(ConnectionSource::from_config(config)?))
    }

    pub fn from_source(source: ConnectionSource) -> Self {
        Self { source }
    }
}

impl NeighborhoodRepository for SqliteNeighborhoodRepository {
    fn get_all_neighborhoods(&self) -> RepoResult<Vec<Neighborhood>> {
        let conn = self.source.connect()?;
        let mut stmt = conn.prepare("SELECT Id, Name FROM Neighborhood ORDER BY Id ASC;")?;
        let mut rows = stmt.query([])?;

        let mut neighborhoods = Vec::new();
        while let Some(row) = rows.next()? {
            neighborhoods.push(map_neighborhood_row(row)?);
        }
        Ok(neighborhoods)
    }

    fn get_neighborhood_by_id(&self, id: NeighborhoodId) -> RepoResult<Option<Neighborhood>> {
        let conn = self.source.connect()?;
        let mut stmt = conn.prepare("SELECT Id, Name FROM Neighborhood WHERE Id = ?1;")?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(map_neighborhood_row(row)?));
        }
        Ok(None)
    }

    fn add_neighborhood(&self, neighborhood: &mut Neighborhood) -> RepoResult<()> {
        let conn = self.source.connect()?;
        let id: NeighborhoodId = conn.query_row(
            "INSERT INTO Neighborhood (Name) VALUES (?1) RETURNING Id;",
            [neighborhood.name.as_str()],
            |row| row.get(0),
        )?;

        neighborhood.id = id;
        debug!("event=neighborhood_add module=repo status=ok neighborhood_id={id}");
        Ok(())
    }
}

fn map_neighborhood_row(row: &Row<'_>) -> rusqlite::Result<Neighborhood> {
    Ok(Neighborhood {
        id: row.get("Id")?,
        name: row.get("Name")?,
    })
}
