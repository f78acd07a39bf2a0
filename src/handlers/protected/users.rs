use axum::extract::{Extension, State};

use crate::api::format::UserResource;
use crate::api::requests::UserUpdateRequest;
use crate::app::AppState;
use crate::auth::{AuthUser, Authenticator};
use crate::middleware::response::deleted;
use crate::middleware::{ApiResponse, ApiResult, Payload};

/// GET /api/users/current
pub async fn current(Extension(auth_user): Extension<AuthUser>) -> ApiResult<UserResource> {
    Ok(ApiResponse::success(UserResource::from_user(auth_user.user())))
}

/// PATCH /api/users/current - change name and/or password
pub async fn update(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Payload(body): Payload<UserUpdateRequest>,
) -> ApiResult<UserResource> {
    let user = Authenticator::new(state.store.clone())
        .update(&auth_user, body)
        .await?;
    Ok(ApiResponse::success(UserResource::from_user(&user)))
}

/// DELETE /api/users/logout - drop the current token
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<bool> {
    Authenticator::new(state.store.clone()).logout(&auth_user).await?;
    Ok(deleted())
}
