use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A board post. `author_id` is a snapshot reference taken at creation:
/// later changes to the user do not rewrite existing posts. Anonymous
/// submissions carry the free-text `author_name` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Option<Uuid>,
    pub author_name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// The identity attached to a request once the session cookie has been
/// resolved. Handlers read this from request extensions.
#[derive(Debug, Clone)]
pub enum Identity {
    Anonymous,
    Known(User),
}

impl Identity {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Known(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Identity::Known(user) => Some(user),
            Identity::Anonymous => None,
        }
    }
}
