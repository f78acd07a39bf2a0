//! Ownership scoping: a contact is only reachable through its user, and an
//! address only through a contact that was already resolved this way.

use crate::auth::AuthUser;
use crate::database::models::{Address, Contact};
use crate::database::Store;
use crate::error::{ApiError, MSG_ADDRESS_NOT_FOUND, MSG_CONTACT_NOT_FOUND};

/// Returns the contact iff it belongs to `identity`. A contact owned by
/// someone else is reported exactly like one that does not exist.
pub async fn find_owned_contact(
    store: &dyn Store,
    identity: &AuthUser,
    contact_id: i64,
) -> Result<Contact, ApiError> {
    match store.find_contact(identity.id(), contact_id).await? {
        Some(contact) => Ok(contact),
        None => {
            tracing::debug!("Contact {} not visible to user {}", contact_id, identity.id());
            Err(ApiError::not_found(MSG_CONTACT_NOT_FOUND))
        }
    }
}

/// Returns the address iff it belongs to `contact`, which must itself come
/// from [`find_owned_contact`].
pub async fn find_owned_address(
    store: &dyn Store,
    contact: &Contact,
    address_id: i64,
) -> Result<Address, ApiError> {
    match store.find_address(contact.id, address_id).await? {
        Some(address) => Ok(address),
        None => {
            tracing::debug!("Address {} not found under contact {}", address_id, contact.id);
            Err(ApiError::not_found(MSG_ADDRESS_NOT_FOUND))
        }
    }
}
