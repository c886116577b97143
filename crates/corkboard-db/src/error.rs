use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The store never came up, or the connection lock is poisoned.
    #[error("document store unavailable")]
    Unavailable,
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}
