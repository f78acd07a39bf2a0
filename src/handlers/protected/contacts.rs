use axum::extract::{Extension, Path, Query, State};

use crate::api::format::{ContactResource, PageMeta};
use crate::api::requests::{ContactRequest, ContactSearchQuery};
use crate::app::AppState;
use crate::auth::AuthUser;
use crate::handlers::route_id;
use crate::middleware::response::deleted;
use crate::middleware::{ApiResponse, ApiResult, Payload};
use crate::services::ContactService;

/// POST /api/contacts
pub async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Payload(body): Payload<ContactRequest>,
) -> ApiResult<ContactResource> {
    let contact = ContactService::new(state.store.clone())
        .create(&auth_user, body)
        .await?;
    Ok(ApiResponse::created(ContactResource::from(&contact)))
}

/// GET /api/contacts/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<ContactResource> {
    let contact = ContactService::new(state.store.clone())
        .get(&auth_user, route_id(&id))
        .await?;
    Ok(ApiResponse::success(ContactResource::from(&contact)))
}

/// PUT /api/contacts/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    Payload(body): Payload<ContactRequest>,
) -> ApiResult<ContactResource> {
    let contact = ContactService::new(state.store.clone())
        .update(&auth_user, route_id(&id), body)
        .await?;
    Ok(ApiResponse::success(ContactResource::from(&contact)))
}

/// DELETE /api/contacts/:id - also removes the contact's addresses
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<bool> {
    ContactService::new(state.store.clone())
        .delete(&auth_user, route_id(&id))
        .await?;
    Ok(deleted())
}

/// GET /api/contacts?name=&email=&phone=&page=&size=
pub async fn search(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<ContactSearchQuery>,
) -> ApiResult<Vec<ContactResource>> {
    let page = ContactService::new(state.store.clone())
        .search(&auth_user, query)
        .await?;
    let meta = PageMeta::from(&page);
    let data = page.items.iter().map(ContactResource::from).collect();
    Ok(ApiResponse::success(data).with_meta(meta))
}
