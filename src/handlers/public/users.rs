use axum::extract::State;

use crate::api::format::UserResource;
use crate::api::requests::{LoginRequest, RegisterRequest};
use crate::app::AppState;
use crate::auth::Authenticator;
use crate::middleware::{ApiResponse, ApiResult, Payload};

/// POST /api/users - register a new account
pub async fn register(
    State(state): State<AppState>,
    Payload(body): Payload<RegisterRequest>,
) -> ApiResult<UserResource> {
    let user = Authenticator::new(state.store.clone()).register(body).await?;
    Ok(ApiResponse::created(UserResource::from_user(&user)))
}

/// POST /api/users/login - exchange credentials for a fresh token
pub async fn login(
    State(state): State<AppState>,
    Payload(body): Payload<LoginRequest>,
) -> ApiResult<UserResource> {
    let user = Authenticator::new(state.store.clone()).login(body).await?;
    Ok(ApiResponse::success(UserResource::with_token(&user)))
}
