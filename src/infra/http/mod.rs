//! HTTP surfaces: the public read API and the session-gated admin API.

pub mod admin;
pub mod public;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use axum::routing::{delete, get, post};

use crate::application::auth::AuthService;
use crate::application::images::ImageService;
use crate::application::posts::PostService;
use crate::application::render::RenderService;
use crate::application::repos::MediaStore;

#[derive(Clone)]
pub struct PublicState {
    pub posts: Arc<PostService>,
    pub renderer: Arc<RenderService>,
    pub media: Arc<dyn MediaStore>,
}

#[derive(Clone)]
pub struct AdminState {
    pub posts: Arc<PostService>,
    pub images: Arc<ImageService>,
    pub auth: Arc<AuthService>,
}

pub fn build_public_router(state: PublicState) -> Router {
    Router::new()
        .route("/api/posts", get(public::list_posts))
        .route("/api/posts/{id}", get(public::get_post))
        .route(
            "/media/st_blog/library/{filename}",
            get(public::serve_media),
        )
        .with_state(state)
}

pub fn build_admin_router(state: AdminState, upload_body_limit: usize) -> Router {
    // Sign-in must stay reachable without a token, so the session endpoints
    // authenticate inline instead of sitting behind the middleware.
    let session_routes = Router::new()
        .route(
            "/admin/session",
            post(admin::session::sign_in)
                .get(admin::session::current_session)
                .delete(admin::session::sign_out),
        )
        .with_state(state.clone());

    let gated = Router::new()
        .route(
            "/admin/posts",
            get(admin::posts::list_posts).post(admin::posts::create_post),
        )
        .route(
            "/admin/posts/{id}",
            get(admin::posts::get_post)
                .put(admin::posts::update_post)
                .delete(admin::posts::delete_post),
        )
        .route(
            "/admin/posts/{id}/publish",
            post(admin::posts::toggle_publish),
        )
        .route("/admin/posts/{id}/preview", get(admin::posts::preview_post))
        .route("/admin/images", get(admin::images::list_images))
        .route(
            "/admin/images/generate",
            post(admin::images::generate_image),
        )
        .route(
            "/admin/images/save-generated",
            post(admin::images::save_generated_image),
        )
        .route(
            "/admin/images/upload",
            post(admin::images::upload_image).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route("/admin/images/{id}", delete(admin::images::delete_image))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            admin::middleware::require_session,
        ))
        .with_state(state);

    session_routes.merge(gated)
}
