use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{Address, Contact, NewAddress, NewContact, NewUser, User};
use crate::database::store::{ContactSearch, Page, Store};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    contacts: BTreeMap<i64, Contact>,
    addresses: BTreeMap<i64, Address>,
    next_user_id: i64,
    next_contact_id: i64,
    next_address_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// In-process store with the same constraints as the Postgres schema:
/// unique usernames and tokens, ascending ids, cascading deletes.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(DatabaseError::UniqueViolation("username"));
        }

        let now = Utc::now();
        let id = next_id(&mut tables.next_user_id);
        let row = User {
            id,
            username: user.username,
            name: user.name,
            password: user.password,
            token: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(id, row.clone());
        Ok(row)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.token.as_deref() == Some(token))
            .cloned())
    }

    async fn update_profile(
        &self,
        user_id: i64,
        name: Option<&str>,
        password: Option<&str>,
    ) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user_id)))?;
        if let Some(name) = name {
            row.name = name.to_string();
        }
        if let Some(password) = password {
            row.password = password.to_string();
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn set_token(&self, user_id: i64, token: Option<&str>) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if let Some(token) = token {
            if tables
                .users
                .values()
                .any(|u| u.id != user_id && u.token.as_deref() == Some(token))
            {
                return Err(DatabaseError::UniqueViolation("token"));
            }
        }

        let row = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user_id)))?;
        row.token = token.map(str::to_string);
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn insert_contact(&self, contact: NewContact) -> Result<Contact, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&contact.user_id) {
            return Err(DatabaseError::NotFound(format!("user {}", contact.user_id)));
        }

        let now = Utc::now();
        let id = next_id(&mut tables.next_contact_id);
        let row = Contact {
            id,
            user_id: contact.user_id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone: contact.phone,
            created_at: now,
            updated_at: now,
        };
        tables.contacts.insert(id, row.clone());
        Ok(row)
    }

    async fn find_contact(&self, user_id: i64, contact_id: i64) -> Result<Option<Contact>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .contacts
            .get(&contact_id)
            .filter(|c| c.user_id == user_id)
            .cloned())
    }

    async fn update_contact(&self, contact: &Contact) -> Result<Contact, DatabaseError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .contacts
            .get_mut(&contact.id)
            .ok_or_else(|| DatabaseError::NotFound(format!("contact {}", contact.id)))?;
        row.first_name = contact.first_name.clone();
        row.last_name = contact.last_name.clone();
        row.email = contact.email.clone();
        row.phone = contact.phone.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_contact(&self, contact_id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.contacts.remove(&contact_id).is_none() {
            return Ok(false);
        }
        tables.addresses.retain(|_, a| a.contact_id != contact_id);
        Ok(true)
    }

    async fn search_contacts(&self, user_id: i64, search: &ContactSearch) -> Result<Page<Contact>, DatabaseError> {
        let tables = self.tables.read().await;
        let matching: Vec<&Contact> = tables
            .contacts
            .values()
            .filter(|c| c.user_id == user_id && search.matches(c))
            .collect();

        let offset = usize::try_from(search.offset()).unwrap_or(usize::MAX);
        let items = matching
            .iter()
            .skip(offset)
            .take(search.size as usize)
            .map(|c| (*c).clone())
            .collect();

        Ok(Page {
            items,
            total: matching.len() as u64,
            page: search.page,
            size: search.size,
        })
    }

    async fn insert_address(&self, address: NewAddress) -> Result<Address, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.contacts.contains_key(&address.contact_id) {
            return Err(DatabaseError::NotFound(format!("contact {}", address.contact_id)));
        }

        let now = Utc::now();
        let id = next_id(&mut tables.next_address_id);
        let row = Address {
            id,
            contact_id: address.contact_id,
            street: address.street,
            city: address.city,
            province: address.province,
            country: address.country,
            postal_code: address.postal_code,
            created_at: now,
            updated_at: now,
        };
        tables.addresses.insert(id, row.clone());
        Ok(row)
    }

    async fn find_address(&self, contact_id: i64, address_id: i64) -> Result<Option<Address>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .addresses
            .get(&address_id)
            .filter(|a| a.contact_id == contact_id)
            .cloned())
    }

    async fn update_address(&self, address: &Address) -> Result<Address, DatabaseError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .addresses
            .get_mut(&address.id)
            .ok_or_else(|| DatabaseError::NotFound(format!("address {}", address.id)))?;
        row.street = address.street.clone();
        row.city = address.city.clone();
        row.province = address.province.clone();
        row.country = address.country.clone();
        row.postal_code = address.postal_code.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_address(&self, address_id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.addresses.remove(&address_id).is_some())
    }

    async fn list_addresses(&self, contact_id: i64) -> Result<Vec<Address>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .addresses
            .values()
            .filter(|a| a.contact_id == contact_id)
            .cloned()
            .collect())
    }
}
