use serde::Serialize;

use crate::database::models::{Address, Contact, User};
use crate::database::store::Page;

/// Public projection of a user: never the password hash
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserResource {
    pub username: String,
    pub name: String,
    /// Only present in the login response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl UserResource {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            name: user.name.clone(),
            token: None,
        }
    }

    pub fn with_token(user: &User) -> Self {
        Self {
            token: user.token.clone(),
            ..Self::from_user(user)
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContactResource {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<&Contact> for ContactResource {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id,
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AddressResource {
    pub id: i64,
    pub street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: String,
    pub postal_code: Option<String>,
}

impl From<&Address> for AddressResource {
    fn from(address: &Address) -> Self {
        Self {
            id: address.id,
            street: address.street.clone(),
            city: address.city.clone(),
            province: address.province.clone(),
            country: address.country.clone(),
            postal_code: address.postal_code.clone(),
        }
    }
}

/// Pagination block returned next to `data` by `GET /contacts`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageMeta {
    pub current_page: u32,
    pub per_page: u32,
    pub total: u64,
    pub last_page: u32,
    pub from: Option<u64>,
    pub to: Option<u64>,
}

impl<T> From<&Page<T>> for PageMeta {
    fn from(page: &Page<T>) -> Self {
        Self {
            current_page: page.page,
            per_page: page.size,
            total: page.total,
            last_page: page.last_page(),
            from: page.from(),
            to: page.to(),
        }
    }
}
