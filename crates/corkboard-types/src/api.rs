use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- Session claims --

/// Token claims shared between the auth handlers (issue) and the session
/// middleware (decode). Canonical definition lives here in corkboard-types
/// to eliminate duplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: usize,
}

// -- Auth forms --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

// -- Post forms --

#[derive(Debug, Deserialize)]
pub struct CreatePostForm {
    #[serde(alias = "name")]
    pub fname: String,
    #[serde(alias = "message")]
    pub fmessage: String,
}

#[derive(Debug, Deserialize)]
pub struct EditPostForm {
    #[serde(alias = "message")]
    pub fmessage: String,
}
