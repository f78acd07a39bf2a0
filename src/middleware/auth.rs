use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::Authenticator;
use crate::error::ApiError;

pub use crate::auth::AuthUser;

/// Resolves the `Authorization` header to a user and injects it into the
/// request extensions for the handlers behind this layer.
pub async fn token_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_headers(&headers);
    let auth_user = Authenticator::new(state.store.clone())
        .resolve(token.as_deref())
        .await?;

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

/// The header carries the raw token; a `Bearer ` prefix is tolerated.
fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
