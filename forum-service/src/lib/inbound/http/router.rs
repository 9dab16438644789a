use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::change_password::change_password;
use super::handlers::create_post::create_post;
use super::handlers::get_post::get_post;
use super::handlers::like_status::like_status;
use super::handlers::list_posts::list_posts;
use super::handlers::login::login;
use super::handlers::me::me;
use super::handlers::register::register;
use super::handlers::toggle_like::toggle_like;
use super::middleware::authenticate;
use super::middleware::authenticate_optional;
use crate::domain::like::ports::LikeRepository;
use crate::domain::like::ports::LikeServicePort;
use crate::domain::like::service::LikeService;
use crate::domain::post::ports::PostRepository;
use crate::domain::post::ports::PostServicePort;
use crate::domain::post::service::PostService;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::domain::user::service::UserService;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub post_service: Arc<dyn PostServicePort>,
    pub like_service: Arc<dyn LikeServicePort>,
    pub authenticator: Arc<Authenticator>,
}

impl AppState {
    /// Wire the domain services over a set of repositories.
    pub fn from_repositories<UR, PR, LR>(
        users: Arc<UR>,
        posts: Arc<PR>,
        likes: Arc<LR>,
        authenticator: Arc<Authenticator>,
    ) -> Self
    where
        UR: UserRepository,
        PR: PostRepository,
        LR: LikeRepository,
    {
        Self {
            user_service: Arc::new(UserService::new(users, Arc::clone(&authenticator))),
            post_service: Arc::new(PostService::new(posts)),
            like_service: Arc::new(LikeService::new(likes)),
            authenticator,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login));

    let protected_routes = Router::new()
        .route("/api/users/me", get(me))
        .route("/api/users/me/password", patch(change_password))
        .route("/api/posts", post(create_post))
        .route("/api/posts/:post_id/like", post(toggle_like))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.authenticator),
            authenticate,
        ));

    let guest_routes = Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:post_id", get(get_post))
        .route("/api/posts/:post_id/like", get(like_status))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.authenticator),
            authenticate_optional,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(guest_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
