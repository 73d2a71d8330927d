//! SQLite storage handle and schema migrations.
//!
//! The `Database` handle is created once by process bootstrap and passed into every
//! access-layer call. Clones share the same connection.

use crate::{ClinicError, ClinicResult};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../migrations/001_initial.sql"))];

/// Shared handle to the clinic database.
#[derive(Clone, Debug)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (creating if needed) the database at `path` and runs pending migrations.
    pub fn open(path: &Path) -> ClinicResult<Self> {
        tracing::info!("opening database at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens a private in-memory database with the full schema.
    pub fn open_in_memory() -> ClinicResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> ClinicResult<Self> {
        configure_pragmas(&conn)?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` with exclusive access to the connection.
    ///
    /// Callers open their own transaction inside `f` when they write.
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> ClinicResult<T>,
    ) -> ClinicResult<T> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| ClinicError::ConnectionPoisoned)?;
        f(&mut conn)
    }
}

fn configure_pragmas(conn: &Connection) -> ClinicResult<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys=ON;
         PRAGMA busy_timeout=5000;",
    )?;
    Ok(())
}

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> ClinicResult<()> {
    let current_version = current_version(conn)?;

    for &(version, sql) in MIGRATIONS {
        if version > current_version {
            tracing::info!("running migration v{version}");
            conn.execute_batch(&format!("BEGIN;\n{sql}\nCOMMIT;"))
                .map_err(|e| {
                    // Leave the schema as it was before this migration.
                    let _ = conn.execute_batch("ROLLBACK;");
                    ClinicError::MigrationFailed {
                        version,
                        reason: e.to_string(),
                    }
                })?;
        }
    }

    Ok(())
}

/// Current schema version, 0 for a fresh database.
///
/// Only a missing `schema_version` table counts as version 0; any other failure is
/// returned to the caller.
pub fn current_version(conn: &Connection) -> ClinicResult<i64> {
    let has_table: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
        [],
        |row| row.get(0),
    )?;
    if !has_table {
        return Ok(0);
    }

    let version = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, Option<i64>>(0)
    })?;
    Ok(version.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare(
                "SELECT name FROM sqlite_master
                 WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_in_memory_database_has_schema() {
        let db = Database::open_in_memory().unwrap();
        db.with_connection(|conn| {
            assert_eq!(
                table_names(conn),
                vec!["appointments", "doctors", "patients", "schema_version"]
            );
            assert_eq!(current_version(conn)?, 1);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_current_version_of_fresh_connection_is_zero() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(current_version(&conn).unwrap(), 0);
    }

    #[test]
    fn test_current_version_propagates_query_errors() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE schema_version (applied_at TEXT)")
            .unwrap();
        assert!(matches!(
            current_version(&conn),
            Err(ClinicError::Storage(_))
        ));
        assert!(run_migrations(&conn).is_err());
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let db = Database::open_in_memory().unwrap();
        let fk: i64 = db
            .with_connection(|conn| Ok(conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn test_migrations_are_idempotent_on_reopen() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("clinic.db");

        Database::open(&path).expect("first open should succeed");
        let db = Database::open(&path).expect("reopen should not rerun migrations");

        let versions: i64 = db
            .with_connection(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn test_schema_rejects_orphan_appointment() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .with_connection(|conn| {
                conn.execute(
                    "INSERT INTO appointments (patient_id, doctor_id, date) VALUES (1, 1, '2024-01-01 09:00:00')",
                    [],
                )?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, ClinicError::ForeignKeyViolation));
    }
}
