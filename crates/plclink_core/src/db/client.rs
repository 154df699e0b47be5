//! Process-scoped storage client.
//!
//! # Responsibility
//! - Validate storage reachability and schema once at startup.
//! - Hand out one fresh connection per unit of work.
//!
//! # Invariants
//! - A `Database` only exists for a path whose schema is fully migrated.
//! - No connection is shared between concurrent callers; isolation is
//!   delegated to SQLite locking.

use super::{open_db, DbResult};
use log::info;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Storage client injected into request handlers.
///
/// Holds only the database location. Cloning is cheap and every clone refers
/// to the same underlying database file.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Opens the database at `path`, applying pending migrations.
    ///
    /// Fails fast when the file cannot be opened or carries a schema newer
    /// than this binary supports.
    pub fn open(path: impl Into<PathBuf>) -> DbResult<Self> {
        let path = path.into();
        let conn = open_db(&path)?;
        drop(conn);
        info!(
            "event=db_client_init module=db status=ok path={}",
            path.display()
        );
        Ok(Self { path })
    }

    /// Acquires a new connection for a single request.
    pub fn connect(&self) -> DbResult<Connection> {
        open_db(&self.path)
    }

    /// Returns the database file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ends the client's lifetime at process shutdown.
    ///
    /// Connections are opened per request and dropped with it, so no handle
    /// is held here; consuming `self` only keeps the client from being
    /// reused after shutdown and records the event.
    pub fn close(self) {
        info!(
            "event=db_client_close module=db status=ok path={}",
            self.path.display()
        );
    }
}
