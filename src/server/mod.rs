// HTTP server.
// Shared application state, router construction, and error-to-response mapping.

pub mod routes;
pub mod session;

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::blog::BlogStore;
use crate::cache::RepoCache;
use crate::error::{FolioError, Result};

pub use session::{DEFAULT_SESSION_TTL, SessionStore};

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub repos: Arc<RepoCache>,
    pub blog: Arc<dyn BlogStore>,
    pub sessions: Arc<SessionStore>,
    pub admin_password: Arc<str>,
}

impl AppState {
    pub fn new(
        repos: Arc<RepoCache>,
        blog: Arc<dyn BlogStore>,
        sessions: SessionStore,
        admin_password: &str,
    ) -> Self {
        Self {
            repos,
            blog,
            sessions: Arc::new(sessions),
            admin_password: Arc::from(admin_password),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/admin/login", get(routes::login_page).post(routes::login))
        .route("/admin/logout", get(routes::logout))
        .route("/blog", get(routes::list_posts).post(routes::create_post))
        .route("/blog/{id}", get(routes::show_post))
        .route("/blog/{id}/delete", post(routes::delete_post))
        .route("/blog/{id}/comments", post(routes::add_comment))
        .route("/healthz", get(routes::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

impl IntoResponse for FolioError {
    fn into_response(self) -> Response {
        let status = match &self {
            FolioError::Unauthorized => return Redirect::to("/admin/login").into_response(),
            FolioError::NotFound(_) => StatusCode::NOT_FOUND,
            FolioError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => {
                error!(error = %self, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
