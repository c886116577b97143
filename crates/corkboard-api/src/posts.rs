use anyhow::anyhow;
use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, warn};
use uuid::Uuid;

use corkboard_db::models::PostRow;
use corkboard_types::api::{CreatePostForm, EditPostForm};
use corkboard_types::models::{Identity, Post};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::session::{self, parse_stamp, require_authenticated, user_from_row};
use crate::views;

pub async fn home(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    // Run blocking store work off the async runtime
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_posts())
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow!("listing task failed"))
        })??;

    let posts: Vec<Post> = rows.into_iter().map(post_from_row).collect();
    let (jar, flash) = session::take_flash(jar);
    Ok((jar, Html(views::home_page(&identity, flash.as_deref(), &posts))))
}

/// Anonymous submissions are accepted; an authenticated submitter is
/// stamped as the author snapshot so profile pages can find the post.
pub async fn create_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Form(form): Form<CreatePostForm>,
) -> Result<Redirect, ApiError> {
    let post_id = Uuid::new_v4();
    let author_id = identity.user().map(|u| u.id.to_string());
    let author_name = if form.fname.trim().is_empty() {
        identity.user().map(|u| u.email.clone()).unwrap_or_default()
    } else {
        form.fname
    };

    let db = state.clone();
    tokio::task::spawn_blocking(move || {
        db.db.insert_post(
            &post_id.to_string(),
            author_id.as_deref(),
            &author_name,
            &form.fmessage,
        )
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(anyhow!("create task failed"))
    })??;

    Ok(Redirect::to("/"))
}

pub async fn edit_page(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_post(&id.to_string()))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow!("edit lookup task failed"))
        })??
        .ok_or(ApiError::NotFound)?;

    let post = post_from_row(row);
    Ok(Html(views::edit_page(&identity, &post)))
}

/// No ownership check: any caller can edit any post. A missing id is a
/// silent no-op.
pub async fn edit_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<EditPostForm>,
) -> Result<Redirect, ApiError> {
    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.update_post(&id.to_string(), &form.fmessage))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow!("edit task failed"))
        })??;

    Ok(Redirect::to("/"))
}

/// Idempotent, unchecked, answers GET and POST alike.
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Redirect, ApiError> {
    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.delete_post(&id.to_string()))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow!("delete task failed"))
        })??;

    Ok(Redirect::to("/"))
}

pub async fn user_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let (user_row, rows) = tokio::task::spawn_blocking(move || {
        let user = db.db.get_user_by_id(&id.to_string())?;
        let rows = db.db.list_posts_by_author(&id.to_string())?;
        Ok::<_, ApiError>((user, rows))
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(anyhow!("profile task failed"))
    })??;

    let user = user_row.and_then(user_from_row).ok_or(ApiError::NotFound)?;
    let posts: Vec<Post> = rows.into_iter().map(post_from_row).collect();
    Ok(Html(views::profile_page(&identity, &user, &posts)))
}

pub async fn protected(
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, ApiError> {
    let user = require_authenticated(&identity)?;
    Ok(Html(views::protected_page(&identity, user)))
}

fn post_from_row(row: PostRow) -> Post {
    let id = row.id.parse().unwrap_or_else(|e| {
        warn!("Corrupt post id '{}': {}", row.id, e);
        Uuid::default()
    });
    let author_id = row.author_id.as_deref().and_then(|raw| match raw.parse::<Uuid>() {
        Ok(author_id) => Some(author_id),
        Err(e) => {
            warn!("Corrupt author_id '{}' on post '{}': {}", raw, row.id, e);
            None
        }
    });
    let created_at = parse_stamp("created_at", &row.id, &row.created_at);
    let modified_at = row
        .modified_at
        .as_deref()
        .map(|raw| parse_stamp("modified_at", &row.id, raw));

    Post {
        id,
        author_id,
        author_name: row.author_name,
        message: row.message,
        created_at,
        modified_at,
    }
}
