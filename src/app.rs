use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::{DatabaseManager, MemoryStore, PgStore, Store};
use crate::error::ApiError;
use crate::handlers::public;
use crate::middleware::{token_auth_middleware, ApiResponse, ApiResult};

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Postgres when a database URL is configured, otherwise (or when
    /// `force_memory` is set) the in-memory store.
    pub async fn from_config(config: &AppConfig, force_memory: bool) -> anyhow::Result<Self> {
        if force_memory || config.database.url.is_none() {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            return Ok(Self::in_memory());
        }
        let pool = DatabaseManager::connect(&config.database).await?;
        Ok(Self::new(Arc::new(PgStore::new(pool))))
    }
}

pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(user_public_routes())
        // Protected
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(cors_layer(security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn user_public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(public::register))
        .route("/api/users/login", post(public::login))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use axum::routing::delete;
    use crate::handlers::protected::{addresses, contacts, users};

    Router::new()
        // Current user
        .route("/api/users/current", get(users::current).patch(users::update))
        .route("/api/users/logout", delete(users::logout))
        // Contacts
        .route("/api/contacts", get(contacts::search).post(contacts::create))
        .route(
            "/api/contacts/:id",
            get(contacts::get).put(contacts::update).delete(contacts::delete),
        )
        // Addresses of a contact
        .route(
            "/api/contacts/:contact_id/addresses",
            get(addresses::list).post(addresses::create),
        )
        .route(
            "/api/contacts/:contact_id/addresses/:address_id",
            get(addresses::get).put(addresses::update).delete(addresses::delete),
        )
        // route_layer keeps unknown paths at 404 instead of 401
        .route_layer(from_fn_with_state(state, token_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "name": "Contact Book API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "users": "/api/users, /api/users/login (public); /api/users/current, /api/users/logout (protected)",
            "contacts": "/api/contacts[/:id] (protected)",
            "addresses": "/api/contacts/:contact_id/addresses[/:address_id] (protected)",
        }
    })))
}

async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    match state.store.ping().await {
        Ok(()) => Ok(ApiResponse::success(json!({
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }))),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Err(ApiError::service_unavailable("database unavailable"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn security() -> SecurityConfig {
        SecurityConfig {
            enable_cors: true,
            cors_origins: vec!["*".into()],
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            argon2_parallelism: 1,
        }
    }

    async fn call(uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().uri(uri);
        if let Some(token) = token {
            request = request.header("Authorization", token);
        }
        let response = app(AppState::in_memory(), &security())
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn health_reports_ok_for_memory_store() {
        let (status, body) = call("/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let (status, body) = call("/api/contacts", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "errors": { "message": ["Unauthorized"] } }));

        let (status, _) = call("/api/users/current", Some("salah")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_paths_stay_not_found() {
        let (status, _) = call("/api/nothing-here", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
