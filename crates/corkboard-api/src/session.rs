use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, NaiveDateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::warn;
use uuid::Uuid;

use corkboard_db::models::UserRow;
use corkboard_types::api::Claims;
use corkboard_types::models::{Identity, User};

use crate::auth::AppState;
use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "corkboard_session";
const FLASH_COOKIE: &str = "flash";

/// Resolve the inbound session cookie to an [`Identity`] and attach it to
/// the request. Runs once per request; handlers read the extension, so the
/// resolution is stable for the rest of the request. Never fails the
/// request: anything short of a valid token for an existing user is
/// Anonymous.
pub async fn resolve_identity(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let identity = current_identity(&state, &jar);
    req.extensions_mut().insert(identity);
    next.run(req).await
}

fn current_identity(state: &AppState, jar: &CookieJar) -> Identity {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Identity::Anonymous;
    };
    let Some(claims) = decode_token(&state.session_secret, cookie.value()) else {
        return Identity::Anonymous;
    };

    match state.db.get_user_by_id(&claims.sub.to_string()) {
        Ok(Some(row)) => match user_from_row(row) {
            Some(user) => Identity::Known(user),
            None => Identity::Anonymous,
        },
        Ok(None) => Identity::Anonymous,
        Err(e) => {
            warn!("Session lookup failed: {}", e);
            Identity::Anonymous
        }
    }
}

/// As the resolved identity, but Anonymous becomes
/// [`ApiError::Unauthorized`], which answers with a redirect to the login
/// form.
pub fn require_authenticated(identity: &Identity) -> Result<&User, ApiError> {
    identity.user().ok_or(ApiError::Unauthorized)
}

pub fn issue_token(secret: &str, user_id: Uuid, email: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn decode_token(secret: &str, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

/// Mark the session authenticated: set the session cookie for this browser
/// session.
pub fn login(jar: CookieJar, token: String) -> CookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Back to Anonymous: drop the session cookie.
pub fn logout(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Queue a one-shot notice for the next rendered page. The value is a
/// short machine code; `views::flash_text` turns it into copy.
pub fn set_flash(jar: CookieJar, code: &'static str) -> CookieJar {
    jar.add(Cookie::build((FLASH_COOKIE, code)).path("/"))
}

/// Read and clear the pending flash, if any.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<String>) {
    match jar.get(FLASH_COOKIE) {
        Some(cookie) => {
            let code = cookie.value().to_string();
            (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), Some(code))
        }
        None => (jar, None),
    }
}

pub(crate) fn user_from_row(row: UserRow) -> Option<User> {
    let id = match row.id.parse::<Uuid>() {
        Ok(id) => id,
        Err(e) => {
            warn!("Corrupt user id '{}': {}", row.id, e);
            return None;
        }
    };
    let created_at = parse_stamp("created_at", &row.id, &row.created_at);
    Some(User {
        id,
        email: row.email,
        created_at,
    })
}

/// Rows written by this app carry RFC 3339 timestamps; SQLite's own
/// `datetime('now')` defaults are "YYYY-MM-DD HH:MM:SS" without a
/// timezone. Accept both, as naive UTC for the latter.
pub(crate) fn parse_stamp(field: &str, id: &str, raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt {} '{}' on '{}': {}", field, raw, id, e);
            DateTime::default()
        })
}
