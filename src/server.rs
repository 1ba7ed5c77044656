use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::DatabaseManager;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Full application router with shared state applied
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let protected = protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    let mut router = Router::new()
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .merge(auth_public_routes())
        .merge(content_public_routes())
        .merge(protected)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if let Some(cors) = cors_layer(&config.security) {
        router = router.layer(cors);
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

/// Connect, migrate and serve until the listener fails
pub async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config.database).await?;
    let state = AppState::new(pool, config);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Campus API listening on http://{}", bind_addr);
    println!("🚀 Campus API server listening on http://{}", bind_addr);

    axum::serve(listener, app(state, config)).await?;
    Ok(())
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/signup", post(auth::signup_post))
        .route("/api/auth/login", post(auth::login_post))
}

fn content_public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/posts", get(public::posts::posts_get))
        .route("/api/posts/:id", get(public::posts::post_get))
        .route("/api/communities", get(public::communities::communities_get))
}

fn protected_routes() -> Router<AppState> {
    use axum::routing::delete;

    Router::new()
        .route("/api/auth/me", get(protected::auth::me_get))
        .route("/api/posts", post(protected::posts::post_create))
        .route("/api/posts/:id", delete(protected::posts::post_delete))
        .route("/api/posts/:id/comments", post(protected::comments::comment_create))
        .route("/api/communities", post(protected::communities::community_create))
        .route(
            "/api/communities/:id/membership",
            put(protected::communities::membership_put),
        )
        .route("/api/communities/:id/join", post(protected::communities::join_post))
}

/// Permissive when no origins (or "*") are configured, otherwise an explicit allow list
fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
