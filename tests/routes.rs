//! Router tests: drives the axum app in-process with `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use folio::blog::{BlogStore, MemoryBlogStore, NewPost};
use folio::cache::{ManualClock, RepoCache, RepoSource};
use folio::github::{GitHubRepo, ListReposParams};
use folio::server::{AppState, SessionStore, router};
use folio::{FolioError, Result};
use tower::ServiceExt;

const PASSWORD: &str = "correct horse";

struct FixedSource {
    repos: Option<Vec<GitHubRepo>>,
}

#[async_trait]
impl RepoSource for FixedSource {
    async fn fetch_repos(&self, _params: ListReposParams) -> Result<Vec<GitHubRepo>> {
        self.repos
            .clone()
            .ok_or_else(|| FolioError::Other("GitHub is down".to_string()))
    }
}

fn repo(name: &str, stars: u64) -> GitHubRepo {
    GitHubRepo {
        name: name.to_string(),
        fork: false,
        stargazers_count: stars,
        description: None,
        language: Some("Rust".to_string()),
        html_url: format!("https://github.com/RikoxCode/{}", name),
        topics: None,
    }
}

struct Harness {
    app: Router,
    blog: Arc<MemoryBlogStore>,
}

fn harness(repos: Option<Vec<GitHubRepo>>) -> Harness {
    let clock = Arc::new(ManualClock::default());
    let cache = Arc::new(RepoCache::new(
        Arc::new(FixedSource { repos }),
        clock.clone(),
        Duration::from_secs(600),
        8,
    ));
    let blog = Arc::new(MemoryBlogStore::new(clock.clone()));
    let sessions = SessionStore::new(clock, Duration::from_secs(3600));
    let state = AppState::new(cache, blog.clone(), sessions, PASSWORD);
    Harness {
        app: router(state),
        blog,
    }
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.expect("infallible")
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login(app: &Router) -> String {
    let response = send(app, post_form("/admin/login", "password=correct+horse", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/blog");

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("session cookie");
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn test_home_lists_ranked_repos() {
    let h = harness(Some(vec![repo("small", 1), repo("big", 10)]));

    let response = send(&h.app, get("/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    assert_eq!(body["is_admin"], false);
    assert_eq!(body["repos"][0]["name"], "big");
    assert_eq!(body["repos"][1]["name"], "small");
    assert_eq!(body["repos"][0]["description"], "No description available");
}

#[tokio::test]
async fn test_home_survives_upstream_failure() {
    let h = harness(None);

    let response = send(&h.app, get("/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["repos"], serde_json::json!([]));
}

#[tokio::test]
async fn test_wrong_password_redirects_with_error() {
    let h = harness(Some(vec![]));

    let response = send(&h.app, post_form("/admin/login", "password=nope", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/login?error=1");
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let page = send(&h.app, get("/admin/login?error=1", None)).await;
    assert_eq!(json(page).await["error"], "1");
}

#[tokio::test]
async fn test_login_page_redirects_admin() {
    let h = harness(Some(vec![]));
    let cookie = login(&h.app).await;

    let response = send(&h.app, get("/admin/login", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/blog");

    let home = send(&h.app, get("/", Some(&cookie))).await;
    assert_eq!(json(home).await["is_admin"], true);
}

#[tokio::test]
async fn test_admin_creates_and_deletes_post() {
    let h = harness(Some(vec![]));
    let cookie = login(&h.app).await;

    let response = send(
        &h.app,
        post_form("/blog", "title=Hello&content=First+post", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/blog");

    let listing = json(send(&h.app, get("/blog", Some(&cookie))).await).await;
    assert_eq!(listing["is_admin"], true);
    assert_eq!(listing["posts"][0]["title"], "Hello");
    let id = listing["posts"][0]["id"].as_str().unwrap().to_string();

    let response = send(
        &h.app,
        post_form(&format!("/blog/{}/delete", id), "", Some(&cookie)),
    )
    .await;
    assert_eq!(location(&response), "/blog");
    assert!(h.blog.list_posts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_anonymous_cannot_manage_posts() {
    let h = harness(Some(vec![]));
    let post = h
        .blog
        .create_post(NewPost {
            title: "Keep".to_string(),
            content: "me".to_string(),
        })
        .await
        .unwrap();

    let response = send(&h.app, post_form("/blog", "title=x&content=y", None)).await;
    assert_eq!(location(&response), "/admin/login");

    let response = send(
        &h.app,
        post_form(&format!("/blog/{}/delete", post.id), "", None),
    )
    .await;
    assert_eq!(location(&response), "/admin/login");
    assert_eq!(h.blog.list_posts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let h = harness(Some(vec![]));
    let cookie = login(&h.app).await;

    let response = send(&h.app, get("/admin/logout", Some(&cookie))).await;
    assert_eq!(location(&response), "/blog");

    let listing = json(send(&h.app, get("/blog", Some(&cookie))).await).await;
    assert_eq!(listing["is_admin"], false);
}

#[tokio::test]
async fn test_anonymous_comment_flow() {
    let h = harness(Some(vec![]));
    let post = h
        .blog
        .create_post(NewPost {
            title: "Talk".to_string(),
            content: "to me".to_string(),
        })
        .await
        .unwrap();

    let response = send(
        &h.app,
        post_form(&format!("/blog/{}/comments", post.id), "text=great+read", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/blog/{}", post.id));

    let view = json(send(&h.app, get(&format!("/blog/{}", post.id), None)).await).await;
    assert_eq!(view["post"]["title"], "Talk");
    assert_eq!(view["comments"][0]["text"], "great read");
    assert_eq!(view["is_admin"], false);
}

#[tokio::test]
async fn test_unknown_post_is_404() {
    let h = harness(Some(vec![]));

    let response = send(&h.app, get("/blog/not-a-uuid", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &h.app,
        get("/blog/00000000-0000-0000-0000-000000000000", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_comment_is_rejected() {
    let h = harness(Some(vec![]));
    let post = h
        .blog
        .create_post(NewPost {
            title: "t".to_string(),
            content: "c".to_string(),
        })
        .await
        .unwrap();

    let response = send(
        &h.app,
        post_form(&format!("/blog/{}/comments", post.id), "text=", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_json_login_sets_session() {
    let h = harness(Some(vec![]));

    let response = send(
        &h.app,
        post_json("/admin/login", serde_json::json!({ "password": PASSWORD }), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/blog");
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("session cookie")
        .to_string();

    let listing = json(send(&h.app, get("/blog", Some(&cookie))).await).await;
    assert_eq!(listing["is_admin"], true);

    let response = send(
        &h.app,
        post_json("/admin/login", serde_json::json!({ "password": "nope" }), None),
    )
    .await;
    assert_eq!(location(&response), "/admin/login?error=1");
}

#[tokio::test]
async fn test_anonymous_json_post_redirects_to_login() {
    let h = harness(Some(vec![]));

    let body = serde_json::json!({ "title": "sneaky", "content": "post" });
    let response = send(&h.app, post_json("/blog", body, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/login");

    // An unparseable body from an anonymous caller still hits the gate first.
    let request = Request::builder()
        .method("POST")
        .uri("/blog")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = send(&h.app, request).await;
    assert_eq!(location(&response), "/admin/login");
    assert!(h.blog.list_posts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_json_post_and_comment() {
    let h = harness(Some(vec![]));
    let cookie = login(&h.app).await;

    let body = serde_json::json!({ "title": "Via JSON", "content": "works" });
    let response = send(&h.app, post_json("/blog", body, Some(&cookie))).await;
    assert_eq!(location(&response), "/blog");

    let posts = h.blog.list_posts().await.unwrap();
    assert_eq!(posts[0].title, "Via JSON");

    let uri = format!("/blog/{}/comments", posts[0].id);
    let body = serde_json::json!({ "text": "json hi" });
    let response = send(&h.app, post_json(&uri, body, None)).await;
    assert_eq!(location(&response), format!("/blog/{}", posts[0].id));
    let comments = h.blog.list_comments(posts[0].id).await.unwrap();
    assert_eq!(comments[0].text, "json hi");
}

#[tokio::test]
async fn test_admin_malformed_json_is_bad_request() {
    let h = harness(Some(vec![]));
    let cookie = login(&h.app).await;

    let request = Request::builder()
        .method("POST")
        .uri("/blog")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, &cookie)
        .body(Body::from("{not json"))
        .unwrap();
    let response = send(&h.app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_healthz() {
    let h = harness(Some(vec![]));
    let response = send(&h.app, get("/healthz", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}
