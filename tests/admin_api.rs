mod support;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use atelier::application::auth::AuthService;
use atelier::application::images::ImageService;
use atelier::application::posts::PostService;
use atelier::application::render::RenderService;
use atelier::infra::http::{AdminState, PublicState, build_admin_router, build_public_router};

use support::{MemoryContent, MemoryMediaStore, StubGenerator};

const EMAIL: &str = "editor@example.com";
const PASSWORD: &str = "service-password";

struct Harness {
    admin: Router,
    public: Router,
    content: Arc<MemoryContent>,
}

fn harness() -> Harness {
    let content = Arc::new(MemoryContent::default());
    let media = Arc::new(MemoryMediaStore::default());
    let generator = Arc::new(StubGenerator::default());
    let renderer = Arc::new(RenderService::new());

    let posts = Arc::new(PostService::new(
        content.clone(),
        content.clone(),
        renderer.clone(),
        false,
    ));
    let images = Arc::new(ImageService::new(
        content.clone(),
        content.clone(),
        media.clone(),
        generator,
    ));
    let auth = Arc::new(AuthService::new(
        EMAIL,
        PASSWORD,
        Duration::from_secs(3600),
    ));

    let admin = build_admin_router(
        AdminState {
            posts: posts.clone(),
            images,
            auth,
        },
        1024 * 1024,
    );
    let public = build_public_router(PublicState {
        posts,
        renderer,
        media,
    });

    Harness {
        admin,
        public,
        content,
    }
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn bare_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn sign_in(admin: &Router) -> String {
    let response = admin
        .clone()
        .oneshot(json_request(
            "POST",
            "/admin/session",
            None,
            &json!({"email": EMAIL, "password": PASSWORD}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    body["token"].as_str().expect("token").to_string()
}

#[tokio::test]
async fn sign_in_with_bad_credentials_is_rejected() {
    let h = harness();

    let response = h
        .admin
        .oneshot(json_request(
            "POST",
            "/admin/session",
            None,
            &json!({"email": EMAIL, "password": "wrong"}),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "invalid_credentials");
    assert_eq!(body["error"]["message"], "invalid credentials");
}

#[tokio::test]
async fn admin_routes_require_a_session() {
    let h = harness();

    let response = h
        .admin
        .oneshot(bare_request("GET", "/admin/posts", None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn post_crud_flow_over_http() {
    let h = harness();
    let token = sign_in(&h.admin).await;

    // Create with a comma-separated tag field, the classic form shape.
    let response = h
        .admin
        .clone()
        .oneshot(json_request(
            "POST",
            "/admin/posts",
            Some(&token),
            &json!({
                "title": "Hello",
                "excerpt": "Summary",
                "content_markdown": "# Hi",
                "tags": "a, ,b,",
            }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["tags"], json!(["a", "b"]));
    assert_eq!(created["author"], "Atelier Studio");
    assert_eq!(created["publish_state"]["state"], "draft");
    let id = created["id"].as_str().expect("id").to_string();

    // Toggle to published.
    let response = h
        .admin
        .clone()
        .oneshot(bare_request(
            "POST",
            &format!("/admin/posts/{id}/publish"),
            Some(&token),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let published = body_json(response).await;
    assert_eq!(published["publish_state"]["state"], "published");

    // Preview renders the markdown.
    let response = h
        .admin
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!("/admin/posts/{id}/preview"),
            Some(&token),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let preview = body_json(response).await;
    assert!(preview["html"].as_str().expect("html").contains("<h1>"));

    // Delete, then the post is gone.
    let response = h
        .admin
        .clone()
        .oneshot(bare_request(
            "DELETE",
            &format!("/admin/posts/{id}"),
            Some(&token),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = h
        .admin
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!("/admin/posts/{id}"),
            Some(&token),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn validation_failures_are_bad_requests() {
    let h = harness();
    let token = sign_in(&h.admin).await;

    let response = h
        .admin
        .oneshot(json_request(
            "POST",
            "/admin/posts",
            Some(&token),
            &json!({"title": "  ", "excerpt": "E"}),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "validation");
}

#[tokio::test]
async fn generate_and_save_image_over_http() {
    let h = harness();
    let token = sign_in(&h.admin).await;

    let response = h
        .admin
        .clone()
        .oneshot(json_request(
            "POST",
            "/admin/images/generate",
            Some(&token),
            &json!({
                "prompt": "a calm workspace",
                "model": "flux-schnell",
                "size": "landscape_16_9",
            }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let generated = body_json(response).await;
    let url = generated["url"].as_str().expect("url").to_string();

    let response = h
        .admin
        .clone()
        .oneshot(json_request(
            "POST",
            "/admin/images/save-generated",
            Some(&token),
            &json!({"url": url, "prompt": "a calm workspace"}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let saved = body_json(response).await;
    assert_eq!(saved["source"], "generated");
    assert_eq!(saved["prompt"], "a calm workspace");

    let response = h
        .admin
        .oneshot(bare_request("GET", "/admin/images", Some(&token)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn empty_prompt_is_rejected_with_validation_code() {
    let h = harness();
    let token = sign_in(&h.admin).await;

    let response = h
        .admin
        .oneshot(json_request(
            "POST",
            "/admin/images/generate",
            Some(&token),
            &json!({"prompt": " ", "model": "sdxl", "size": "square"}),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn public_listing_and_post_view() {
    let h = harness();
    let now = time::OffsetDateTime::now_utc();

    let visible = h.content.seed_post("Visible", Some(true), Some(now));
    h.content.seed_post("Hidden", Some(false), Some(now));
    let legacy = h.content.seed_post("Legacy", None, Some(now));

    let response = h
        .public
        .clone()
        .oneshot(bare_request("GET", "/api/posts", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    let ids: Vec<String> = listed
        .as_array()
        .expect("array")
        .iter()
        .map(|post| post["id"].as_str().expect("id").to_string())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&visible.to_string()));
    assert!(ids.contains(&legacy.to_string()));

    let response = h
        .public
        .clone()
        .oneshot(bare_request("GET", &format!("/api/posts/{visible}"), None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let post = body_json(response).await;
    assert_eq!(post["title"], "Visible");
    assert!(post["html"].is_string());

    let response = h
        .public
        .oneshot(bare_request(
            "GET",
            &format!("/api/posts/{}", uuid::Uuid::new_v4()),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "post not found");
}

#[tokio::test]
async fn sign_out_revokes_the_session() {
    let h = harness();
    let token = sign_in(&h.admin).await;

    let response = h
        .admin
        .clone()
        .oneshot(bare_request("DELETE", "/admin/session", Some(&token)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = h
        .admin
        .oneshot(bare_request("GET", "/admin/posts", Some(&token)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
