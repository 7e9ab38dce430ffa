//! Connection management
//!
//! One `Database` owns one SQLite connection for the lifetime of the store
//! that holds it. Nothing here is shared across threads or processes.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::Result;
use crate::config;

pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Open `<root>/databases/<name>.db`, creating the directory and file if needed
    pub fn open(root: &Path, name: &str) -> Result<Self> {
        let path = config::database_path_in(root, name);
        config::ensure_db_dir(&path)?;
        let conn = Connection::open(&path)?;
        tracing::debug!("Opened {}", path.display());
        Ok(Self { conn, path: Some(path) })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, path: None })
    }

    /// Backing file, `None` when in memory
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
