use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{Address, Contact, NewAddress, NewContact, NewUser, User};

/// Filters and page window for listing a user's contacts.
///
/// `name` matches either `first_name` or `last_name`; `email` and `phone`
/// match their own columns. All matches are case-insensitive substrings and
/// every supplied filter must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSearch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// 1-indexed
    pub page: u32,
    pub size: u32,
}

impl ContactSearch {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.size)
    }

    /// In-process evaluation of the filters, used by the memory store
    pub fn matches(&self, contact: &Contact) -> bool {
        fn contains(haystack: Option<&str>, needle: &str) -> bool {
            haystack
                .map(|h| h.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false)
        }

        if let Some(name) = &self.name {
            if !contains(Some(&contact.first_name), name) && !contains(contact.last_name.as_deref(), name) {
                return false;
            }
        }
        if let Some(email) = &self.email {
            if !contains(contact.email.as_deref(), email) {
                return false;
            }
        }
        if let Some(phone) = &self.phone {
            if !contains(contact.phone.as_deref(), phone) {
                return false;
            }
        }
        true
    }
}

/// One page of results plus the total number of matching rows
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    pub fn last_page(&self) -> u32 {
        if self.total == 0 || self.size == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(u64::from(self.size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// 1-based position of the first item on this page, if any
    pub fn from(&self) -> Option<u64> {
        if self.items.is_empty() {
            return None;
        }
        Some(u64::from(self.page.saturating_sub(1)) * u64::from(self.size) + 1)
    }

    pub fn to(&self) -> Option<u64> {
        self.from().map(|from| from + self.items.len() as u64 - 1)
    }
}

/// Relational store for users, contacts and addresses.
///
/// Contact and address lookups always take the owning id alongside the row
/// id, so a row is never fetched outside its owner.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;
    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, DatabaseError>;
    /// Overwrites the supplied profile columns; the token is never touched
    async fn update_profile(
        &self,
        user_id: i64,
        name: Option<&str>,
        password: Option<&str>,
    ) -> Result<User, DatabaseError>;
    /// Replaces or clears the token and nothing else
    async fn set_token(&self, user_id: i64, token: Option<&str>) -> Result<User, DatabaseError>;

    async fn insert_contact(&self, contact: NewContact) -> Result<Contact, DatabaseError>;
    async fn find_contact(&self, user_id: i64, contact_id: i64) -> Result<Option<Contact>, DatabaseError>;
    async fn update_contact(&self, contact: &Contact) -> Result<Contact, DatabaseError>;
    /// Deletes the contact and every address it owns
    async fn delete_contact(&self, contact_id: i64) -> Result<bool, DatabaseError>;
    async fn search_contacts(&self, user_id: i64, search: &ContactSearch) -> Result<Page<Contact>, DatabaseError>;

    async fn insert_address(&self, address: NewAddress) -> Result<Address, DatabaseError>;
    async fn find_address(&self, contact_id: i64, address_id: i64) -> Result<Option<Address>, DatabaseError>;
    async fn update_address(&self, address: &Address) -> Result<Address, DatabaseError>;
    async fn delete_address(&self, address_id: i64) -> Result<bool, DatabaseError>;
    async fn list_addresses(&self, contact_id: i64) -> Result<Vec<Address>, DatabaseError>;
}
