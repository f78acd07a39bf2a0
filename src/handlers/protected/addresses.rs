use axum::extract::{Extension, Path, State};

use crate::api::format::AddressResource;
use crate::api::requests::AddressRequest;
use crate::app::AppState;
use crate::auth::AuthUser;
use crate::handlers::route_id;
use crate::middleware::response::deleted;
use crate::middleware::{ApiResponse, ApiResult, Payload};
use crate::services::AddressService;

/// POST /api/contacts/:contact_id/addresses
pub async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(contact_id): Path<String>,
    Payload(body): Payload<AddressRequest>,
) -> ApiResult<AddressResource> {
    let address = AddressService::new(state.store.clone())
        .create(&auth_user, route_id(&contact_id), body)
        .await?;
    Ok(ApiResponse::created(AddressResource::from(&address)))
}

/// GET /api/contacts/:contact_id/addresses
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(contact_id): Path<String>,
) -> ApiResult<Vec<AddressResource>> {
    let addresses = AddressService::new(state.store.clone())
        .list(&auth_user, route_id(&contact_id))
        .await?;
    Ok(ApiResponse::success(addresses.iter().map(AddressResource::from).collect()))
}

/// GET /api/contacts/:contact_id/addresses/:address_id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((contact_id, address_id)): Path<(String, String)>,
) -> ApiResult<AddressResource> {
    let address = AddressService::new(state.store.clone())
        .get(&auth_user, route_id(&contact_id), route_id(&address_id))
        .await?;
    Ok(ApiResponse::success(AddressResource::from(&address)))
}

/// PUT /api/contacts/:contact_id/addresses/:address_id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((contact_id, address_id)): Path<(String, String)>,
    Payload(body): Payload<AddressRequest>,
) -> ApiResult<AddressResource> {
    let address = AddressService::new(state.store.clone())
        .update(&auth_user, route_id(&contact_id), route_id(&address_id), body)
        .await?;
    Ok(ApiResponse::success(AddressResource::from(&address)))
}

/// DELETE /api/contacts/:contact_id/addresses/:address_id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((contact_id, address_id)): Path<(String, String)>,
) -> ApiResult<bool> {
    AddressService::new(state.store.clone())
        .delete(&auth_user, route_id(&contact_id), route_id(&address_id))
        .await?;
    Ok(deleted())
}
