//! SQLite implementation of [`ProjectStore`].
//!
//! [`SqliteStore`] persists projects in a SQLite database with WAL mode,
//! a transaction around every multi-statement write, and automatic schema
//! migrations. Contracts are stored as JSON TEXT with their content hash.

use rusqlite::{params, Connection, OptionalExtension};
use solcanvas_core::EthereumContract;

use crate::error::StorageError;
use crate::hash::{decode_contract, encode_contract};
use crate::traits::ProjectStore;
use crate::types::{Project, ProjectId, ProjectSummary};

/// SQLite-backed implementation of [`ProjectStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Verifies a project exists, returning an error if not.
    fn assert_project_exists(&self, id: ProjectId) -> Result<(), StorageError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE id = ?1)",
            params![id.0],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StorageError::ProjectNotFound(id.0));
        }
        Ok(())
    }

    fn stored_hash(&self, id: ProjectId, name: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .conn
            .query_row(
                "SELECT content_hash FROM contracts WHERE project_id = ?1 AND name = ?2",
                params![id.0, name],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn contract_names(&self, id: ProjectId) -> Result<Vec<String>, StorageError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT name FROM contracts WHERE project_id = ?1 ORDER BY seq")?;
        let rows = stmt.query_map(params![id.0], |row| row.get(0))?;
        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }

    fn current(&self) -> Result<Option<(ProjectId, String)>, StorageError> {
        let row: (Option<i64>, Option<String>) = self.conn.query_row(
            "SELECT project_id, contract_name FROM session WHERE id = 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(match row {
            (Some(project), Some(name)) => Some((ProjectId(project), name)),
            _ => None,
        })
    }
}

fn contract_not_found(id: ProjectId, name: &str) -> StorageError {
    StorageError::ContractNotFound {
        project: id.0,
        name: name.to_string(),
    }
}

impl ProjectStore for SqliteStore {
    fn create_project(&mut self, name: &str) -> Result<ProjectId, StorageError> {
        if name.trim().is_empty() {
            return Err(StorageError::InvalidName {
                reason: "project name must not be empty".to_string(),
            });
        }
        self.conn
            .execute("INSERT INTO projects (name) VALUES (?1)", params![name])?;
        let id = ProjectId(self.conn.last_insert_rowid());
        tracing::info!(project = id.0, name, "created project");
        Ok(id)
    }

    fn list_projects(&self) -> Result<Vec<ProjectSummary>, StorageError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name FROM projects ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            let id: i64 = row.get(0)?;
            let name: String = row.get(1)?;
            Ok((ProjectId(id), name))
        })?;
        let mut result = Vec::new();
        for row in rows {
            let (id, name) = row?;
            result.push(ProjectSummary {
                id,
                name,
                contracts: self.contract_names(id)?,
            });
        }
        Ok(result)
    }

    fn get_project(&self, id: ProjectId) -> Result<Project, StorageError> {
        let name: String = self
            .conn
            .query_row(
                "SELECT name FROM projects WHERE id = ?1",
                params![id.0],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(StorageError::ProjectNotFound(id.0))?;

        let mut stmt = self
            .conn
            .prepare_cached("SELECT body FROM contracts WHERE project_id = ?1 ORDER BY seq")?;
        let rows = stmt.query_map(params![id.0], |row| row.get::<_, String>(0))?;
        let mut contracts = Vec::new();
        for row in rows {
            contracts.push(decode_contract(&row?)?);
        }
        Ok(Project {
            id,
            name,
            contracts,
        })
    }

    fn delete_project(&mut self, id: ProjectId) -> Result<(), StorageError> {
        self.assert_project_exists(id)?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE session SET project_id = NULL, contract_name = NULL WHERE project_id = ?1",
            params![id.0],
        )?;
        // Contracts go with the project (ON DELETE CASCADE).
        tx.execute("DELETE FROM projects WHERE id = ?1", params![id.0])?;
        tx.commit()?;
        tracing::info!(project = id.0, "deleted project");
        Ok(())
    }

    fn add_contract_to_project(
        &mut self,
        id: ProjectId,
        contract: &EthereumContract,
    ) -> Result<(), StorageError> {
        let encoded = encode_contract(contract)?;
        self.assert_project_exists(id)?;
        if self.stored_hash(id, &encoded.name)?.is_some() {
            return Err(StorageError::DuplicateContract {
                project: id.0,
                name: encoded.name,
            });
        }
        self.conn.execute(
            "INSERT INTO contracts (project_id, name, seq, body, content_hash)
             VALUES (?1, ?2,
                     (SELECT COALESCE(MAX(seq), 0) + 1 FROM contracts WHERE project_id = ?1),
                     ?3, ?4)",
            params![id.0, encoded.name, encoded.body, encoded.hash],
        )?;
        tracing::debug!(project = id.0, contract = %encoded.name, "added contract");
        Ok(())
    }

    fn update_contract(
        &mut self,
        id: ProjectId,
        contract: &EthereumContract,
    ) -> Result<bool, StorageError> {
        let encoded = encode_contract(contract)?;
        self.assert_project_exists(id)?;
        let stored = self
            .stored_hash(id, &encoded.name)?
            .ok_or_else(|| contract_not_found(id, &encoded.name))?;
        if stored == encoded.hash {
            tracing::debug!(project = id.0, contract = %encoded.name, "contract unchanged");
            return Ok(false);
        }
        self.conn.execute(
            "UPDATE contracts
             SET body = ?3, content_hash = ?4,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
             WHERE project_id = ?1 AND name = ?2",
            params![id.0, encoded.name, encoded.body, encoded.hash],
        )?;
        tracing::debug!(project = id.0, contract = %encoded.name, hash = %encoded.hash, "updated contract");
        Ok(true)
    }

    fn get_contract(&self, id: ProjectId, name: &str) -> Result<EthereumContract, StorageError> {
        self.assert_project_exists(id)?;
        let body: String = self
            .conn
            .query_row(
                "SELECT body FROM contracts WHERE project_id = ?1 AND name = ?2",
                params![id.0, name],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| contract_not_found(id, name))?;
        decode_contract(&body)
    }

    fn remove_contract(&mut self, id: ProjectId, name: &str) -> Result<(), StorageError> {
        self.assert_project_exists(id)?;
        let tx = self.conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM contracts WHERE project_id = ?1 AND name = ?2",
            params![id.0, name],
        )?;
        if removed == 0 {
            return Err(contract_not_found(id, name));
        }
        tx.execute(
            "UPDATE session SET project_id = NULL, contract_name = NULL
             WHERE project_id = ?1 AND contract_name = ?2",
            params![id.0, name],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn set_current_contract(&mut self, id: ProjectId, name: &str) -> Result<(), StorageError> {
        self.assert_project_exists(id)?;
        if self.stored_hash(id, name)?.is_none() {
            return Err(contract_not_found(id, name));
        }
        self.conn.execute(
            "UPDATE session SET project_id = ?1, contract_name = ?2 WHERE id = 1",
            params![id.0, name],
        )?;
        Ok(())
    }

    fn get_current_project(&self) -> Result<Option<Project>, StorageError> {
        match self.current()? {
            Some((id, _)) => self.get_project(id).map(Some),
            None => Ok(None),
        }
    }

    fn get_current_contract(&self) -> Result<Option<EthereumContract>, StorageError> {
        match self.current()? {
            Some((id, name)) => self.get_contract(id, &name).map(Some),
            None => Ok(None),
        }
    }
}
