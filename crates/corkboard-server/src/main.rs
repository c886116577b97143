use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;

use corkboard_api::auth::{AppState, AppStateInner};
use corkboard_api::routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "corkboard_server=debug,corkboard_api=debug,corkboard_db=debug,tower_http=debug"
                    .into()
            }),
        )
        .init();

    // Config, read once at startup and never reloaded
    let session_secret = std::env::var("CORKBOARD_SESSION_SECRET")
        .unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("CORKBOARD_DB_PATH").unwrap_or_else(|_| "corkboard.db".into());
    let host = std::env::var("CORKBOARD_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("CORKBOARD_PORT")
        .unwrap_or_else(|_| "8080".into())
        .parse()?;

    // Open the document store. A failed open logs and leaves the store
    // degraded rather than aborting startup.
    let db = corkboard_db::Database::open(&PathBuf::from(&db_path));

    let state: AppState = Arc::new(AppStateInner { db, session_secret });

    let app = routes::router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Corkboard listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
