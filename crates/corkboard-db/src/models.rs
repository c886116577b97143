/// Database row types mapping directly to SQLite rows.
/// Kept distinct from the corkboard-types models so the DB layer stays
/// independent.

pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
}

pub struct PostRow {
    pub id: String,
    pub author_id: Option<String>,
    pub author_name: String,
    pub message: String,
    pub created_at: String,
    pub modified_at: Option<String>,
}
