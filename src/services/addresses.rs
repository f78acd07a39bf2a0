use std::sync::Arc;

use crate::api::requests::AddressRequest;
use crate::auth::AuthUser;
use crate::database::models::{Address, NewAddress};
use crate::database::{DatabaseError, Store};
use crate::error::{ApiError, MSG_ADDRESS_NOT_FOUND};

use super::ownership::{find_owned_address, find_owned_contact};

/// A row that vanished between the ownership check and the write is still an
/// address miss, not a contact miss.
fn address_write_error(err: DatabaseError) -> ApiError {
    match err {
        DatabaseError::NotFound(_) => ApiError::not_found(MSG_ADDRESS_NOT_FOUND),
        other => ApiError::from(other),
    }
}

/// Addresses of one of the caller's contacts. Every call resolves the contact
/// through the caller first, then the address through that contact.
pub struct AddressService {
    store: Arc<dyn Store>,
}

impl AddressService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        identity: &AuthUser,
        contact_id: i64,
        request: AddressRequest,
    ) -> Result<Address, ApiError> {
        request.validate()?;
        let contact = find_owned_contact(self.store.as_ref(), identity, contact_id).await?;
        let country = request
            .country
            .into_option()
            .ok_or_else(|| ApiError::bad_request("country is required"))?;

        let address = self
            .store
            .insert_address(NewAddress {
                contact_id: contact.id,
                street: request.street.into_option(),
                city: request.city.into_option(),
                province: request.province.into_option(),
                country,
                postal_code: request.postal_code.into_option(),
            })
            .await?;

        tracing::info!("Created address {} for contact {}", address.id, contact.id);
        Ok(address)
    }

    pub async fn get(&self, identity: &AuthUser, contact_id: i64, address_id: i64) -> Result<Address, ApiError> {
        let contact = find_owned_contact(self.store.as_ref(), identity, contact_id).await?;
        find_owned_address(self.store.as_ref(), &contact, address_id).await
    }

    pub async fn update(
        &self,
        identity: &AuthUser,
        contact_id: i64,
        address_id: i64,
        request: AddressRequest,
    ) -> Result<Address, ApiError> {
        request.validate()?;
        let contact = find_owned_contact(self.store.as_ref(), identity, contact_id).await?;
        let mut address = find_owned_address(self.store.as_ref(), &contact, address_id).await?;

        if let Some(street) = request.street.into_patch() {
            address.street = street;
        }
        if let Some(city) = request.city.into_patch() {
            address.city = city;
        }
        if let Some(province) = request.province.into_patch() {
            address.province = province;
        }
        if let Some(country) = request.country.into_option() {
            address.country = country;
        }
        if let Some(postal_code) = request.postal_code.into_patch() {
            address.postal_code = postal_code;
        }

        let address = self
            .store
            .update_address(&address)
            .await
            .map_err(address_write_error)?;
        tracing::info!("Updated address {} of contact {}", address.id, contact.id);
        Ok(address)
    }

    pub async fn delete(&self, identity: &AuthUser, contact_id: i64, address_id: i64) -> Result<bool, ApiError> {
        let contact = find_owned_contact(self.store.as_ref(), identity, contact_id).await?;
        let address = find_owned_address(self.store.as_ref(), &contact, address_id).await?;
        if !self.store.delete_address(address.id).await? {
            return Err(ApiError::not_found(MSG_ADDRESS_NOT_FOUND));
        }

        tracing::info!("Deleted address {} of contact {}", address.id, contact.id);
        Ok(true)
    }

    pub async fn list(&self, identity: &AuthUser, contact_id: i64) -> Result<Vec<Address>, ApiError> {
        let contact = find_owned_contact(self.store.as_ref(), identity, contact_id).await?;
        Ok(self.store.list_addresses(contact.id).await?)
    }
}
