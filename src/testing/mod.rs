//! Fixture data for tests and local runs.
//!
//! Users `test` and `test2` log in with their username as password and carry
//! their username as token, so requests can be signed without a login round
//! trip.

use anyhow::Context;

use crate::auth::password::hash_password;
use crate::config::SecurityConfig;
use crate::database::models::{Address, Contact, NewAddress, NewContact, NewUser, User};
use crate::database::Store;

pub const TEST_TOKEN: &str = "test";
pub const OTHER_TOKEN: &str = "test2";

/// Inserts a user whose password and token both equal `username`
pub async fn seed_user(store: &dyn Store, username: &str, security: &SecurityConfig) -> anyhow::Result<User> {
    let password = hash_password(username, security).context("failed to hash fixture password")?;
    let user = store
        .insert_user(NewUser {
            username: username.to_string(),
            name: username.to_string(),
            password,
        })
        .await
        .with_context(|| format!("failed to insert fixture user '{}'", username))?;

    Ok(store.set_token(user.id, Some(username)).await?)
}

pub async fn seed_contact(store: &dyn Store, user: &User) -> anyhow::Result<Contact> {
    Ok(store
        .insert_contact(NewContact {
            user_id: user.id,
            first_name: "test".into(),
            last_name: Some("test".into()),
            email: Some("test@pzn.com".into()),
            phone: Some("111111".into()),
        })
        .await?)
}

/// Twenty contacts: "first N", "last N", "testN@pzn.com", "11111N"
pub async fn seed_contacts(store: &dyn Store, user: &User) -> anyhow::Result<Vec<Contact>> {
    let mut contacts = Vec::with_capacity(20);
    for i in 0..20 {
        let contact = store
            .insert_contact(NewContact {
                user_id: user.id,
                first_name: format!("first {i}"),
                last_name: Some(format!("last {i}")),
                email: Some(format!("test{i}@pzn.com")),
                phone: Some(format!("11111{i}")),
            })
            .await?;
        contacts.push(contact);
    }
    Ok(contacts)
}

pub async fn seed_address(store: &dyn Store, contact: &Contact) -> anyhow::Result<Address> {
    Ok(store
        .insert_address(NewAddress {
            contact_id: contact.id,
            street: Some("test".into()),
            city: Some("test".into()),
            province: Some("test".into()),
            country: "test".into(),
            postal_code: Some("11111".into()),
        })
        .await?)
}
