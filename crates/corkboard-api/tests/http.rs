use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use corkboard_api::auth::{AppState, AppStateInner};
use corkboard_api::routes::router;
use corkboard_db::Database;

fn test_app() -> (AppState, Router) {
    let state: AppState = Arc::new(AppStateInner {
        db: Database::open(Path::new(":memory:")),
        session_secret: "test-secret".into(),
    });
    (state.clone(), router(state))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// First `name=value` pair from the response's Set-Cookie header.
fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
}

#[tokio::test]
async fn empty_board_renders_posts_heading() {
    let (_state, app) = test_app();

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Posts"));
    assert!(body.contains("<header>"));
    assert!(body.contains("<footer>"));
}

#[tokio::test]
async fn created_post_shows_on_home() {
    let (_state, app) = test_app();

    let response = app
        .clone()
        .oneshot(form_post("/create", "fname=Test+name&fmessage=Test+message"))
        .await
        .unwrap();
    assert!(response.status().is_redirection());

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Test name"));
    assert!(body.contains("Test message"));
}

#[tokio::test]
async fn edit_and_delete_roundtrip() {
    let (state, app) = test_app();

    app.clone()
        .oneshot(form_post("/create", "fname=Someone&fmessage=Original"))
        .await
        .unwrap();
    let id = state.db.list_posts().unwrap()[0].id.clone();

    let response = app
        .clone()
        .oneshot(form_post(&format!("/edit/{}", id), "fmessage=Edited"))
        .await
        .unwrap();
    assert!(response.status().is_redirection());

    let body = body_text(app.clone().oneshot(get("/")).await.unwrap()).await;
    assert!(body.contains("Edited"));
    assert!(!body.contains("Original"));

    let response = app
        .clone()
        .oneshot(get(&format!("/delete/{}", id)))
        .await
        .unwrap();
    assert!(response.status().is_redirection());

    let body = body_text(app.oneshot(get("/")).await.unwrap()).await;
    assert!(!body.contains("Edited"));
}

#[tokio::test]
async fn edit_form_for_missing_post_is_not_found() {
    let (_state, app) = test_app();

    let response = app
        .oneshot(get("/edit/00000000-0000-0000-0000-000000000042"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unmatched_path_is_not_found() {
    let (_state, app) = test_app();

    let response = app.oneshot(get("/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn signup_sets_session_and_protected_admits() {
    let (_state, app) = test_app();

    let response = app
        .clone()
        .oneshot(form_post(
            "/signup",
            "email=ada%40example.com&password=longenough",
        ))
        .await
        .unwrap();
    assert!(response.status().is_redirection());

    let cookie = set_cookie(&response).expect("signup should set a session cookie");
    assert!(cookie.starts_with("corkboard_session="));

    let response = app
        .clone()
        .oneshot(get_with_cookie("/protected", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("ada@example.com"));

    // no cookie: back to the login form
    let response = app.oneshot(get("/protected")).await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn duplicate_signup_flashes_and_redirects_to_login() {
    let (state, app) = test_app();

    app.clone()
        .oneshot(form_post(
            "/signup",
            "email=ada%40example.com&password=longenough",
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(form_post(
            "/signup",
            "email=ada%40example.com&password=different1",
        ))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    assert_eq!(
        set_cookie(&response).as_deref(),
        Some("flash=duplicate-identity")
    );

    // the first record survives untouched
    let user = state.db.get_user_by_email("ada@example.com").unwrap();
    assert!(user.is_some());
}

#[tokio::test]
async fn login_with_wrong_password_flashes_invalid_credential() {
    let (_state, app) = test_app();

    app.clone()
        .oneshot(form_post(
            "/signup",
            "email=ada%40example.com&password=longenough",
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(form_post(
            "/login",
            "email=ada%40example.com&password=wrongwrong",
        ))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    assert_eq!(
        set_cookie(&response).as_deref(),
        Some("flash=invalid-credential")
    );
}

#[tokio::test]
async fn login_issues_session_for_valid_credential() {
    let (_state, app) = test_app();

    app.clone()
        .oneshot(form_post(
            "/signup",
            "email=ada%40example.com&password=longenough",
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(form_post(
            "/login",
            "email=ada%40example.com&password=longenough",
        ))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

    let cookie = set_cookie(&response).unwrap();
    assert!(cookie.starts_with("corkboard_session="));
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let (_state, app) = test_app();

    let response = app
        .clone()
        .oneshot(form_post(
            "/signup",
            "email=ada%40example.com&password=longenough",
        ))
        .await
        .unwrap();
    let cookie = set_cookie(&response).unwrap();

    let response = app
        .oneshot(get_with_cookie("/logout", &cookie))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

    // removal cookie: empty value
    assert_eq!(set_cookie(&response).as_deref(), Some("corkboard_session="));
}

#[tokio::test]
async fn signup_page_redirects_when_already_authenticated() {
    let (_state, app) = test_app();

    let response = app
        .clone()
        .oneshot(form_post(
            "/signup",
            "email=ada%40example.com&password=longenough",
        ))
        .await
        .unwrap();
    let cookie = set_cookie(&response).unwrap();

    let response = app
        .oneshot(get_with_cookie("/signup", &cookie))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
}

#[tokio::test]
async fn short_password_flashes_back_to_signup() {
    let (_state, app) = test_app();

    let response = app
        .oneshot(form_post("/signup", "email=ada%40example.com&password=short"))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/signup");
    assert_eq!(
        set_cookie(&response).as_deref(),
        Some("flash=password-too-short")
    );
}

#[tokio::test]
async fn authenticated_post_links_to_the_author_profile() {
    let (state, app) = test_app();

    let response = app
        .clone()
        .oneshot(form_post(
            "/signup",
            "email=ada%40example.com&password=longenough",
        ))
        .await
        .unwrap();
    let cookie = set_cookie(&response).unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/create")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::COOKIE, &cookie)
        .body(Body::from("fname=Ada&fmessage=Signed+post"))
        .unwrap();
    app.clone().oneshot(request).await.unwrap();

    let user_id = state.db.get_user_by_email("ada@example.com").unwrap().unwrap().id;
    let response = app
        .oneshot(get(&format!("/user/{}", user_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("ada@example.com"));
    assert!(body.contains("Signed post"));
}
