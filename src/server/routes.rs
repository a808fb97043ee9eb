// HTTP route handlers.
// Home page, admin login/logout, and blog CRUD rendered as JSON view models.

use std::convert::Infallible;

use axum::Json;
use axum::extract::{Form, FromRequest, FromRequestParts, Path, Query, Request, State};
use axum::http::header::{CONTENT_TYPE, SET_COOKIE};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::blog::{BlogPost, Comment, NewComment, NewPost, PostId};
use crate::error::{FolioError, Result};
use crate::github::RepoSummary;

use super::AppState;
use super::session::{clear_session_cookie, session_cookie, session_token};

/// Who is making the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct Viewer {
    pub token: Option<Uuid>,
    pub is_admin: bool,
}

impl Viewer {
    fn require_admin(&self) -> Result<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(FolioError::Unauthorized)
        }
    }
}

impl FromRequestParts<AppState> for Viewer {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers);
        let is_admin = match token {
            Some(token) => state.sessions.is_admin(token).await,
            None => false,
        };
        Ok(Self { token, is_admin })
    }
}

/// Request body accepted either as JSON or as an urlencoded form, chosen by `Content-Type`.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| {
            let mime = mime.trim();
            mime == "application/json" || mime.ends_with("+json")
        })
}

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = FolioError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        if is_json(&req) {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| FolioError::InvalidInput(e.body_text()))?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| FolioError::InvalidInput(e.body_text()))?;
            Ok(Self(value))
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HomeView {
    pub is_admin: bool,
    pub repos: Vec<RepoSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginView {
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BlogView {
    pub posts: Vec<BlogPost>,
    pub is_admin: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostView {
    pub post: BlogPost,
    pub comments: Vec<Comment>,
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
}

/// Post ids in paths are UUIDs; anything else names no post.
fn parse_post_id(raw: &str) -> Result<PostId> {
    Uuid::parse_str(raw).map_err(|_| FolioError::NotFound(format!("blog post {}", raw)))
}

pub async fn home(State(state): State<AppState>, viewer: Viewer) -> Json<HomeView> {
    let repos = state.repos.get_repos().await;
    Json(HomeView {
        is_admin: viewer.is_admin,
        repos,
    })
}

pub async fn login_page(viewer: Viewer, Query(query): Query<LoginQuery>) -> Response {
    if viewer.is_admin {
        return Redirect::to("/blog").into_response();
    }
    Json(LoginView { error: query.error }).into_response()
}

pub async fn login(
    State(state): State<AppState>,
    Payload(form): Payload<LoginForm>,
) -> Response {
    if form.password != *state.admin_password {
        warn!("rejected admin login");
        return Redirect::to("/admin/login?error=1").into_response();
    }

    let token = state.sessions.create().await;
    info!("admin logged in");
    let cookie = session_cookie(token, state.sessions.ttl());
    ([(SET_COOKIE, cookie)], Redirect::to("/blog")).into_response()
}

pub async fn logout(State(state): State<AppState>, viewer: Viewer) -> Response {
    if let Some(token) = viewer.token {
        state.sessions.destroy(token).await;
    }
    ([(SET_COOKIE, clear_session_cookie())], Redirect::to("/blog")).into_response()
}

pub async fn list_posts(State(state): State<AppState>, viewer: Viewer) -> Result<Json<BlogView>> {
    let posts = state.blog.list_posts().await?;
    Ok(Json(BlogView {
        posts,
        is_admin: viewer.is_admin,
    }))
}

pub async fn show_post(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<String>,
) -> Result<Json<PostView>> {
    let id = parse_post_id(&id)?;
    let post = state.blog.get_post(id).await?;
    let comments = state.blog.list_comments(post.id).await?;
    Ok(Json(PostView {
        post,
        comments,
        is_admin: viewer.is_admin,
    }))
}

/// The admin gate runs before the body is looked at, so anonymous callers are
/// redirected to login whatever they send.
pub async fn create_post(
    State(state): State<AppState>,
    viewer: Viewer,
    payload: std::result::Result<Payload<NewPost>, FolioError>,
) -> Result<Redirect> {
    viewer.require_admin()?;
    let Payload(post) = payload?;
    state.blog.create_post(post).await?;
    Ok(Redirect::to("/blog"))
}

pub async fn delete_post(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<String>,
) -> Result<Redirect> {
    viewer.require_admin()?;
    let id = parse_post_id(&id)?;
    state.blog.delete_post(id).await?;
    Ok(Redirect::to("/blog"))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(comment): Payload<NewComment>,
) -> Result<Redirect> {
    let post_id = parse_post_id(&id)?;
    state.blog.add_comment(post_id, comment).await?;
    Ok(Redirect::to(&format!("/blog/{}", post_id)))
}

pub async fn healthz() -> &'static str {
    "ok"
}
