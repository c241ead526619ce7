//! Connection management: one serialized writer, one reader.

pub mod pragmas;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use assurance_core::constants::DEFAULT_BUSY_TIMEOUT_MS;
use assurance_core::errors::{AssuranceResult, PersistenceError};
use rusqlite::{Connection, OpenFlags};

use self::pragmas::{apply_pragmas, apply_read_pragmas};
use crate::migrations;

/// Owns the write connection and, for on-disk databases, a read connection.
///
/// In-memory databases cannot be shared between connections, so reads go
/// through the writer there.
pub struct DatabaseManager {
    writer: Mutex<Connection>,
    reader: Option<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl DatabaseManager {
    /// Open a database at `path` with the default busy timeout.
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT_MS)
    }

    /// Open a database at `path`, apply pragmas, run migrations.
    pub fn open_with_timeout(path: &Path, busy_timeout_ms: u64) -> Result<Self, PersistenceError> {
        let writer = Connection::open(path).map_err(sqlite_error)?;
        apply_pragmas(&writer, busy_timeout_ms)?;
        migrations::run_migrations(&writer)?;

        let reader = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(sqlite_error)?;
        apply_read_pragmas(&reader, busy_timeout_ms)?;

        tracing::debug!(path = %path.display(), "opened assurance database");

        Ok(Self {
            writer: Mutex::new(writer),
            reader: Some(Mutex::new(reader)),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        let writer = Connection::open_in_memory().map_err(sqlite_error)?;
        apply_pragmas(&writer, DEFAULT_BUSY_TIMEOUT_MS)?;
        migrations::run_migrations(&writer)?;

        Ok(Self {
            writer: Mutex::new(writer),
            reader: None,
            path: None,
        })
    }

    /// Run `f` with the serialized writer connection.
    pub fn with_writer<F, T>(&self, f: F) -> AssuranceResult<T>
    where
        F: FnOnce(&Connection) -> AssuranceResult<T>,
    {
        let guard = self
            .writer
            .lock()
            .map_err(|_| PersistenceError::LockPoisoned)?;
        f(&guard)
    }

    /// Run `f` with a read connection.
    pub fn with_reader<F, T>(&self, f: F) -> AssuranceResult<T>
    where
        F: FnOnce(&Connection) -> AssuranceResult<T>,
    {
        match &self.reader {
            Some(reader) => {
                let guard = reader.lock().map_err(|_| PersistenceError::LockPoisoned)?;
                f(&guard)
            }
            None => self.with_writer(f),
        }
    }

    /// Database file path; `None` for in-memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

pub(crate) fn sqlite_error(e: rusqlite::Error) -> PersistenceError {
    PersistenceError::SqliteError {
        message: e.to_string(),
    }
}
