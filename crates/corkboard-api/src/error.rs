use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use thiserror::Error;
use tracing::error;

use corkboard_db::DbError;

use crate::session;
use crate::views;

/// Everything a handler can fail with, mapped to a browser-facing response
/// in one place: flash-and-redirect for the user-correctable cases, a
/// rendered error page for the rest.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("document store unavailable")]
    StoreUnavailable,
    #[error("the requested document does not exist")]
    NotFound,
    #[error("an account with that email already exists")]
    DuplicateIdentity,
    #[error("incorrect email or password")]
    InvalidCredential,
    #[error("authentication required")]
    Unauthorized,
    #[error("invalid signup input: {0}")]
    InvalidInput(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Unavailable => ApiError::StoreUnavailable,
            DbError::Sqlite(e) => ApiError::Internal(e.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => Redirect::to("/login").into_response(),
            ApiError::DuplicateIdentity => {
                let jar = session::set_flash(CookieJar::new(), "duplicate-identity");
                (jar, Redirect::to("/login")).into_response()
            }
            ApiError::InvalidCredential => {
                let jar = session::set_flash(CookieJar::new(), "invalid-credential");
                (jar, Redirect::to("/login")).into_response()
            }
            ApiError::InvalidInput(code) => {
                let jar = session::set_flash(CookieJar::new(), code);
                (jar, Redirect::to("/signup")).into_response()
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Html(views::error_page(&self.to_string())),
            )
                .into_response(),
            ApiError::StoreUnavailable | ApiError::Internal(_) => {
                error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::error_page(&self.to_string())),
                )
                    .into_response()
            }
        }
    }
}
