use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::require_session;
use crate::state::AppState;

const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Full application with permissive CORS and request tracing
pub fn router(state: AppState) -> Router {
    build(state, CorsLayer::permissive(), DEFAULT_BODY_LIMIT, true)
}

/// Application wired from runtime configuration
pub fn router_from_config(state: AppState, config: &AppConfig) -> Router {
    build(
        state,
        cors_layer(&config.security.cors_origins),
        config.api.max_request_size_bytes,
        config.api.enable_request_logging,
    )
}

fn build(state: AppState, cors: CorsLayer, body_limit: usize, trace: bool) -> Router {
    let app = Router::new()
        // Public
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .merge(auth_public_routes())
        // Protected
        .merge(protected_routes(state.clone()))
        .fallback(not_found)
        .with_state(state)
        // Global middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors);

    if trace {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    }
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{bookmarks, collection_bookmarks, collections, session};

    Router::new()
        .route("/api/auth/user", get(session::current_user))
        .route("/api/bookmarks", get(bookmarks::list).post(bookmarks::create))
        .route(
            "/api/bookmarks/:id",
            get(bookmarks::get).put(bookmarks::update).delete(bookmarks::delete),
        )
        .route("/api/collections", get(collections::list).post(collections::create))
        .route("/api/collections/:id", get(collections::get).delete(collections::delete))
        .route(
            "/api/collections/:id/bookmarks",
            get(collection_bookmarks::list).post(collection_bookmarks::create),
        )
        .route(
            "/api/collections/:id/bookmarks/:bookmark_id",
            axum::routing::put(collection_bookmarks::update).delete(collection_bookmarks::delete),
        )
        // Unmatched paths fall through to the 404 fallback without a session check
        .route_layer(middleware::from_fn_with_state(state, require_session))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

/// `*` allows any origin; otherwise only the listed origins, with credentials
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
