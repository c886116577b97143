use chrono::{SecondsFormat, Utc};
use rusqlite::Connection;

use crate::models::{PostRow, UserRow};
use crate::{Database, DbError};

/// RFC 3339 UTC with microseconds: lexicographic order of the stored TEXT
/// matches chronological order.
fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl Database {
    // -- Users --

    pub fn create_user(&self, id: &str, email: &str, password_hash: &str) -> Result<(), DbError> {
        let created_at = now_stamp();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, email, password, created_at) VALUES (?1, ?2, ?3, ?4)",
                (id, email, password_hash, created_at.as_str()),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>, DbError> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>, DbError> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    // -- Posts --

    pub fn insert_post(
        &self,
        id: &str,
        author_id: Option<&str>,
        author_name: &str,
        message: &str,
    ) -> Result<(), DbError> {
        let created_at = now_stamp();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO posts (id, author_id, author_name, message, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, author_id, author_name, message, created_at],
            )?;
            Ok(())
        })
    }

    pub fn list_posts(&self) -> Result<Vec<PostRow>, DbError> {
        self.with_conn(query_posts_recent)
    }

    pub fn list_posts_by_author(&self, author_id: &str) -> Result<Vec<PostRow>, DbError> {
        self.with_conn(|conn| query_posts_by_author(conn, author_id))
    }

    pub fn get_post(&self, id: &str) -> Result<Option<PostRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, author_id, author_name, message, created_at, modified_at
                 FROM posts WHERE id = ?1",
            )?;
            let row = stmt.query_row([id], map_post_row).optional()?;
            Ok(row)
        })
    }

    /// Replaces the message and stamps `modified_at`. A missing id is a
    /// silent no-op.
    pub fn update_post(&self, id: &str, message: &str) -> Result<(), DbError> {
        let modified_at = now_stamp();
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE posts SET message = ?2, modified_at = ?3 WHERE id = ?1",
                rusqlite::params![id, message, modified_at],
            )?;
            Ok(())
        })
    }

    /// Idempotent: deleting an absent id is a no-op.
    pub fn delete_post(&self, id: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;
            Ok(())
        })
    }
}

fn query_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>, DbError> {
    let mut stmt =
        conn.prepare("SELECT id, email, password, created_at FROM users WHERE email = ?1")?;

    let row = stmt
        .query_row([email], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                email: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>, DbError> {
    let mut stmt =
        conn.prepare("SELECT id, email, password, created_at FROM users WHERE id = ?1")?;

    let row = stmt
        .query_row([id], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                email: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_posts_recent(conn: &Connection) -> Result<Vec<PostRow>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT id, author_id, author_name, message, created_at, modified_at
         FROM posts
         ORDER BY created_at DESC",
    )?;

    let rows = stmt
        .query_map([], map_post_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_posts_by_author(conn: &Connection, author_id: &str) -> Result<Vec<PostRow>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT id, author_id, author_name, message, created_at, modified_at
         FROM posts
         WHERE author_id = ?1
         ORDER BY created_at DESC",
    )?;

    let rows = stmt
        .query_map([author_id], map_post_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn map_post_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        author_id: row.get(1)?,
        author_name: row.get(2)?,
        message: row.get(3)?,
        created_at: row.get(4)?,
        modified_at: row.get(5)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, DbError>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, DbError> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
