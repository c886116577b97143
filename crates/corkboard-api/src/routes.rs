use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{self, AppState};
use crate::error::ApiError;
use crate::posts;
use crate::session;

/// The full route table. Identity resolution runs once for every route,
/// including the not-found fallback, so every page can render the nav for
/// the current visitor.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(posts::home))
        .route("/create", post(posts::create_post))
        .route("/edit/{id}", get(posts::edit_page).post(posts::edit_post))
        .route("/delete/{id}", get(posts::delete_post).post(posts::delete_post))
        .route("/user/{id}", get(posts::user_profile))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/protected", get(posts::protected))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::resolve_identity,
        ))
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}
