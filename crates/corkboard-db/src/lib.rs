pub mod error;
pub mod migrations;
pub mod models;
pub mod queries;

pub use error::DbError;

use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::{error, info};

/// Handle to the document store. A failed open leaves the handle degraded:
/// the process keeps serving, and every store operation returns
/// [`DbError::Unavailable`] until restart.
pub struct Database {
    conn: Mutex<Option<Connection>>,
}

impl Database {
    pub fn open(path: &Path) -> Self {
        match Self::connect(path) {
            Ok(conn) => {
                info!("Document store opened at {}", path.display());
                Self {
                    conn: Mutex::new(Some(conn)),
                }
            }
            Err(e) => {
                error!("Failed to open document store at {}: {}", path.display(), e);
                Self {
                    conn: Mutex::new(None),
                }
            }
        }
    }

    fn connect(path: &Path) -> Result<Connection, DbError> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        // Startup ping
        conn.query_row("SELECT 1", [], |_| Ok(()))?;

        migrations::run(&conn)?;
        Ok(conn)
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Connection) -> Result<T, DbError>,
    {
        let guard = self.conn.lock().map_err(|_| DbError::Unavailable)?;
        let conn = guard.as_ref().ok_or(DbError::Unavailable)?;
        f(conn)
    }
}
