use std::sync::Arc;

use crate::api::requests::{ContactRequest, ContactSearchQuery};
use crate::auth::AuthUser;
use crate::config::{self, PaginationConfig};
use crate::database::models::{Contact, NewContact};
use crate::database::{ContactSearch, Page, Store};
use crate::error::ApiError;

use super::ownership::find_owned_contact;

/// Contacts of the calling user
pub struct ContactService {
    store: Arc<dyn Store>,
    pagination: PaginationConfig,
}

fn filter(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Normalizes the raw query string: blank filters are dropped, `page` falls
/// back to 1 and `size` to the default, capped at the configured maximum.
pub fn search_params(query: ContactSearchQuery, pagination: &PaginationConfig) -> ContactSearch {
    let page = query
        .page
        .and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1);
    let size = query
        .size
        .and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|s| *s >= 1)
        .unwrap_or(pagination.default_size)
        .min(pagination.max_size.max(1));

    ContactSearch {
        name: filter(query.name),
        email: filter(query.email),
        phone: filter(query.phone),
        page,
        size,
    }
}

impl ContactService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_pagination(store, config::config().pagination.clone())
    }

    pub fn with_pagination(store: Arc<dyn Store>, pagination: PaginationConfig) -> Self {
        Self { store, pagination }
    }

    pub async fn create(&self, identity: &AuthUser, request: ContactRequest) -> Result<Contact, ApiError> {
        request.validate()?;
        let first_name = request
            .first_name
            .into_option()
            .ok_or_else(|| ApiError::bad_request("first_name is required"))?;

        let contact = self
            .store
            .insert_contact(NewContact {
                user_id: identity.id(),
                first_name,
                last_name: request.last_name.into_option(),
                email: request.email.into_option(),
                phone: request.phone.into_option(),
            })
            .await?;

        tracing::info!("User {} created contact {}", identity.id(), contact.id);
        Ok(contact)
    }

    pub async fn get(&self, identity: &AuthUser, contact_id: i64) -> Result<Contact, ApiError> {
        find_owned_contact(self.store.as_ref(), identity, contact_id).await
    }

    /// Overwrites the fields present in the body; absent fields keep their value
    pub async fn update(
        &self,
        identity: &AuthUser,
        contact_id: i64,
        request: ContactRequest,
    ) -> Result<Contact, ApiError> {
        request.validate()?;
        let mut contact = find_owned_contact(self.store.as_ref(), identity, contact_id).await?;

        if let Some(first_name) = request.first_name.into_option() {
            contact.first_name = first_name;
        }
        if let Some(last_name) = request.last_name.into_patch() {
            contact.last_name = last_name;
        }
        if let Some(email) = request.email.into_patch() {
            contact.email = email;
        }
        if let Some(phone) = request.phone.into_patch() {
            contact.phone = phone;
        }

        let contact = self.store.update_contact(&contact).await?;
        tracing::info!("User {} updated contact {}", identity.id(), contact.id);
        Ok(contact)
    }

    pub async fn delete(&self, identity: &AuthUser, contact_id: i64) -> Result<bool, ApiError> {
        let contact = find_owned_contact(self.store.as_ref(), identity, contact_id).await?;
        self.store.delete_contact(contact.id).await?;

        tracing::info!("User {} deleted contact {}", identity.id(), contact.id);
        Ok(true)
    }

    pub async fn search(&self, identity: &AuthUser, query: ContactSearchQuery) -> Result<Page<Contact>, ApiError> {
        let search = search_params(query, &self.pagination);
        let page = self.store.search_contacts(identity.id(), &search).await?;
        tracing::debug!(
            "User {} searched contacts: {} of {} on page {}",
            identity.id(),
            page.items.len(),
            page.total,
            page.page
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Authenticator;
    use crate::database::models::NewUser;
    use crate::database::MemoryStore;
    use crate::validation::Field;

    fn pagination() -> PaginationConfig {
        PaginationConfig { default_size: 10, max_size: 100 }
    }

    async fn setup() -> (Arc<MemoryStore>, ContactService, AuthUser) {
        let store = Arc::new(MemoryStore::new());
        let user = store
            .insert_user(NewUser { username: "test".into(), name: "test".into(), password: "x".into() })
            .await
            .unwrap();
        store.set_token(user.id, Some("test")).await.unwrap();
        let identity = Authenticator::new(store.clone()).resolve(Some("test")).await.unwrap();
        let service = ContactService::with_pagination(store.clone(), pagination());
        (store, service, identity)
    }

    fn request(first: &str, last: Field<String>, email: Field<String>, phone: Field<String>) -> ContactRequest {
        ContactRequest { first_name: Field::Value(first.into()), last_name: last, email, phone }
    }

    #[test]
    fn search_params_defaults_and_clamps() {
        let params = search_params(ContactSearchQuery::default(), &pagination());
        assert_eq!((params.page, params.size), (1, 10));
        assert_eq!(params.name, None);

        let params = search_params(
            ContactSearchQuery {
                name: Some("  ".into()),
                email: Some(" pzn ".into()),
                page: Some("0".into()),
                size: Some("5000".into()),
                ..Default::default()
            },
            &pagination(),
        );
        assert_eq!(params.name, None);
        assert_eq!(params.email.as_deref(), Some("pzn"));
        assert_eq!((params.page, params.size), (1, 100));

        let params = search_params(
            ContactSearchQuery { page: Some("abc".into()), size: Some("-3".into()), ..Default::default() },
            &pagination(),
        );
        assert_eq!((params.page, params.size), (1, 10));
    }

    #[tokio::test]
    async fn create_rejects_missing_first_name() {
        let (_, service, identity) = setup().await;
        let err = service.create(&identity, ContactRequest::default()).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_json()["errors"]["first_name"][0], "The first name field is required.");
    }

    #[tokio::test]
    async fn update_leaves_absent_fields_alone() {
        let (_, service, identity) = setup().await;
        let created = service
            .create(
                &identity,
                request("ahmad", Field::Value("ihsan".into()), Field::Value("ahmad@gmail.com".into()), Field::Value("111111".into())),
            )
            .await
            .unwrap();

        let updated = service
            .update(&identity, created.id, request("hanif", Field::Missing, Field::Null, Field::Missing))
            .await
            .unwrap();
        assert_eq!(updated.first_name, "hanif");
        assert_eq!(updated.last_name.as_deref(), Some("ihsan"));
        assert_eq!(updated.email, None);
        assert_eq!(updated.phone.as_deref(), Some("111111"));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let (_, service, identity) = setup().await;
        let created = service
            .create(&identity, request("ahmad", Field::Missing, Field::Missing, Field::Missing))
            .await
            .unwrap();

        assert!(service.delete(&identity, created.id).await.unwrap());
        let err = service.get(&identity, created.id).await.unwrap_err();
        assert_eq!(err.message(), "not found");
        assert_eq!(service.delete(&identity, created.id).await.unwrap_err().status_code(), 404);
    }

    #[tokio::test]
    async fn search_only_sees_own_contacts() {
        let (store, service, identity) = setup().await;
        let other = store
            .insert_user(NewUser { username: "test2".into(), name: "test2".into(), password: "x".into() })
            .await
            .unwrap();
        for i in 0..3 {
            store
                .insert_contact(NewContact {
                    user_id: other.id,
                    first_name: format!("first {i}"),
                    last_name: None,
                    email: None,
                    phone: None,
                })
                .await
                .unwrap();
        }
        service
            .create(&identity, request("first mine", Field::Missing, Field::Missing, Field::Missing))
            .await
            .unwrap();

        let page = service
            .search(&identity, ContactSearchQuery { name: Some("first".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].first_name, "first mine");
    }
}
