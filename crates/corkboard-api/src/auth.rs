use std::sync::Arc;

use anyhow::anyhow;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::{SaltString, rand_core::OsRng}};
use axum::{
    Extension, Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use corkboard_db::Database;
use corkboard_types::api::{LoginForm, SignupForm};
use corkboard_types::models::Identity;

use crate::error::ApiError;
use crate::session;
use crate::views;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub session_secret: String,
}

/// Hash a plaintext credential with Argon2id under a fresh random salt.
/// The PHC string output is safe to store.
pub fn hash_password(plaintext: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(anyhow!("password hashing failed: {}", e)))?
        .to_string();
    Ok(hash)
}

/// True iff `plaintext` verifies against the stored PHC string.
/// A malformed stored hash verifies as false.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

pub async fn signup_page(
    Extension(identity): Extension<Identity>,
    jar: CookieJar,
) -> Response {
    if identity.is_authenticated() {
        return Redirect::to("/").into_response();
    }
    let (jar, flash) = session::take_flash(jar);
    (jar, Html(views::signup_page(flash.as_deref()))).into_response()
}

pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Result<impl IntoResponse, ApiError> {
    // Validate input
    if !form.email.contains('@') {
        return Err(ApiError::InvalidInput("invalid-email"));
    }
    if form.password.len() < 8 {
        return Err(ApiError::InvalidInput("password-too-short"));
    }

    // Check if the email is already registered. Not atomic with the insert;
    // the UNIQUE column catches the losing racer.
    if state.db.get_user_by_email(&form.email)?.is_some() {
        return Err(ApiError::DuplicateIdentity);
    }

    let password_hash = hash_password(&form.password)?;
    let user_id = Uuid::new_v4();

    state
        .db
        .create_user(&user_id.to_string(), &form.email, &password_hash)?;

    // Auto-login the fresh account
    let token = session::issue_token(&state.session_secret, user_id, &form.email)
        .map_err(ApiError::Internal)?;

    Ok((session::login(jar, token), Redirect::to("/")))
}

pub async fn login_page(
    Extension(identity): Extension<Identity>,
    jar: CookieJar,
) -> Response {
    if identity.is_authenticated() {
        return Redirect::to("/").into_response();
    }
    let (jar, flash) = session::take_flash(jar);
    (jar, Html(views::login_page(flash.as_deref()))).into_response()
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .get_user_by_email(&form.email)?
        .ok_or(ApiError::InvalidCredential)?;

    if !verify_password(&form.password, &user.password) {
        return Err(ApiError::InvalidCredential);
    }

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|e| ApiError::Internal(anyhow!("corrupt user id '{}': {}", user.id, e)))?;

    let token = session::issue_token(&state.session_secret, user_id, &user.email)
        .map_err(ApiError::Internal)?;

    Ok((session::login(jar, token), Redirect::to("/")))
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (session::logout(jar), Redirect::to("/"))
}
