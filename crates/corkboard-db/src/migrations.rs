use rusqlite::Connection;
use tracing::info;

use crate::error::DbError;

pub fn run(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS posts (
            id           TEXT PRIMARY KEY,
            author_id    TEXT REFERENCES users(id),
            author_name  TEXT NOT NULL,
            message      TEXT NOT NULL,
            created_at   TEXT NOT NULL DEFAULT (datetime('now')),
            modified_at  TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_posts_created
            ON posts(created_at);

        CREATE INDEX IF NOT EXISTS idx_posts_author
            ON posts(author_id, created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
