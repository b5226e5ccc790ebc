//! SqliteModelStore - durable model store on a single SQLite file.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension};

use super::{Model, ModelError, ModelStore, Versioned};

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS models (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    version INTEGER NOT NULL CHECK (version > 0),
    body TEXT NOT NULL,
    UNIQUE (collection, id)
);
";

fn init_schema(conn: &Connection) -> Result<(), ModelError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = FULL;
        PRAGMA busy_timeout = 5000;
    ",
    )
    .map_err(storage_err)?;
    conn.execute_batch(SCHEMA_SQL).map_err(storage_err)?;
    Ok(())
}

fn storage_err(e: rusqlite::Error) -> ModelError {
    ModelError::Storage(e.to_string())
}

fn decode<M: Model>(body: &str, version: i64) -> Result<Versioned<M>, ModelError> {
    let data: M = serde_json::from_str(body).map_err(|e| ModelError::Serde(e.to_string()))?;
    Ok(Versioned {
        data,
        version: version as u64,
    })
}

/// Model store persisted to SQLite. Each write is its own committed
/// transaction, so a returned `Ok` means the row is on disk.
pub struct SqliteModelStore {
    conn: Mutex<Connection>,
}

impl SqliteModelStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let conn = Connection::open(path).map_err(storage_err)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, ModelError> {
        let conn = Connection::open_in_memory().map_err(storage_err)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, ModelError> {
        self.conn
            .lock()
            .map_err(|_| ModelError::Storage("connection lock poisoned".into()))
    }
}

fn current_version(
    conn: &Connection,
    collection: &str,
    id: &str,
) -> Result<Option<u64>, ModelError> {
    conn.query_row(
        "SELECT version FROM models WHERE collection = ?1 AND id = ?2",
        rusqlite::params![collection, id],
        |row| row.get::<_, i64>(0),
    )
    .optional()
    .map(|v| v.map(|v| v as u64))
    .map_err(storage_err)
}

impl ModelStore for SqliteModelStore {
    fn get_model<M: Model>(&self, id: &str) -> Result<Option<Versioned<M>>, ModelError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT body, version FROM models WHERE collection = ?1 AND id = ?2",
                rusqlite::params![M::COLLECTION, id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()
            .map_err(storage_err)?;

        match row {
            Some((body, version)) => Ok(Some(decode(&body, version)?)),
            None => Ok(None),
        }
    }

    fn list_models<M: Model>(&self) -> Result<Vec<Versioned<M>>, ModelError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT body, version FROM models WHERE collection = ?1 ORDER BY seq")
            .map_err(storage_err)?;
        let rows = stmt
            .query_map(rusqlite::params![M::COLLECTION], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })
            .map_err(storage_err)?;

        let mut result = Vec::new();
        for row in rows {
            let (body, version) = row.map_err(storage_err)?;
            result.push(decode(&body, version)?);
        }
        Ok(result)
    }

    fn insert_model<M: Model>(&self, model: &M) -> Result<Versioned<M>, ModelError> {
        let body = serde_json::to_string(model).map_err(|e| ModelError::Serde(e.to_string()))?;
        let id = model.id();
        let conn = self.conn()?;

        let result = conn.execute(
            "INSERT INTO models (collection, id, version, body) VALUES (?1, ?2, 1, ?3)",
            rusqlite::params![M::COLLECTION, id, body],
        );
        match result {
            Ok(_) => Ok(Versioned {
                data: model.clone(),
                version: 1,
            }),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                let actual = current_version(&conn, M::COLLECTION, &id)?.unwrap_or_default();
                Err(ModelError::ConcurrencyConflict {
                    collection: M::COLLECTION.to_string(),
                    id,
                    expected: 0,
                    actual,
                })
            }
            Err(e) => Err(storage_err(e)),
        }
    }

    fn update_model<M: Model>(
        &self,
        model: &M,
        expected_version: u64,
    ) -> Result<Versioned<M>, ModelError> {
        let body = serde_json::to_string(model).map_err(|e| ModelError::Serde(e.to_string()))?;
        let id = model.id();
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(storage_err)?;

        let actual = current_version(&tx, M::COLLECTION, &id)?.ok_or_else(|| {
            ModelError::NotFound {
                collection: M::COLLECTION.to_string(),
                id: id.clone(),
            }
        })?;
        if actual != expected_version {
            return Err(ModelError::ConcurrencyConflict {
                collection: M::COLLECTION.to_string(),
                id,
                expected: expected_version,
                actual,
            });
        }

        tx.execute(
            "UPDATE models SET body = ?1, version = version + 1 WHERE collection = ?2 AND id = ?3",
            rusqlite::params![body, M::COLLECTION, id],
        )
        .map_err(storage_err)?;
        tx.commit().map_err(storage_err)?;

        Ok(Versioned {
            data: model.clone(),
            version: actual + 1,
        })
    }

    fn delete_model<M: Model>(&self, id: &str) -> Result<bool, ModelError> {
        let conn = self.conn()?;
        let removed = conn
            .execute(
                "DELETE FROM models WHERE collection = ?1 AND id = ?2",
                rusqlite::params![M::COLLECTION, id],
            )
            .map_err(storage_err)?;
        Ok(removed > 0)
    }
}
