use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::manager::DatabaseError;
use crate::database::models::{Address, Contact, NewAddress, NewContact, NewUser, User};
use crate::database::store::{ContactSearch, Page, Store};

const USER_COLUMNS: &str = "id, username, name, password, token, created_at, updated_at";
const CONTACT_COLUMNS: &str = "id, user_id, first_name, last_name, email, phone, created_at, updated_at";
const ADDRESS_COLUMNS: &str =
    "id, contact_id, street, city, province, country, postal_code, created_at, updated_at";

/// Postgres-backed store over the `users`, `contacts` and `addresses` tables
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Turns user input into an ILIKE substring pattern, escaping wildcards
fn like_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Appends `WHERE user_id = $1 [AND ...]` for a contact search
fn push_search_filters(builder: &mut QueryBuilder<'_, Postgres>, user_id: i64, search: &ContactSearch) {
    builder.push(" WHERE user_id = ").push_bind(user_id);

    if let Some(name) = &search.name {
        let pattern = like_pattern(name);
        builder
            .push(" AND (first_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR last_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(email) = &search.email {
        builder.push(" AND email ILIKE ").push_bind(like_pattern(email));
    }
    if let Some(phone) = &search.phone {
        builder.push(" AND phone ILIKE ").push_bind(like_pattern(phone));
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (username, name, password) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.name)
            .bind(&user.password)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE token = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_profile(
        &self,
        user_id: i64,
        name: Option<&str>,
        password: Option<&str>,
    ) -> Result<User, DatabaseError> {
        let sql = format!(
            "UPDATE users SET name = COALESCE($2, name), password = COALESCE($3, password), \
             updated_at = now() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .bind(name)
            .bind(password)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user_id)))
    }

    async fn set_token(&self, user_id: i64, token: Option<&str>) -> Result<User, DatabaseError> {
        let sql = format!(
            "UPDATE users SET token = $2, updated_at = now() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user_id)))
    }

    async fn insert_contact(&self, contact: NewContact) -> Result<Contact, DatabaseError> {
        let sql = format!(
            "INSERT INTO contacts (user_id, first_name, last_name, email, phone) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            CONTACT_COLUMNS
        );
        let row = sqlx::query_as::<_, Contact>(&sql)
            .bind(contact.user_id)
            .bind(&contact.first_name)
            .bind(&contact.last_name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_contact(&self, user_id: i64, contact_id: i64) -> Result<Option<Contact>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM contacts WHERE user_id = $1 AND id = $2",
            CONTACT_COLUMNS
        );
        let row = sqlx::query_as::<_, Contact>(&sql)
            .bind(user_id)
            .bind(contact_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_contact(&self, contact: &Contact) -> Result<Contact, DatabaseError> {
        let sql = format!(
            "UPDATE contacts SET first_name = $2, last_name = $3, email = $4, phone = $5, \
             updated_at = now() WHERE id = $1 RETURNING {}",
            CONTACT_COLUMNS
        );
        sqlx::query_as::<_, Contact>(&sql)
            .bind(contact.id)
            .bind(&contact.first_name)
            .bind(&contact.last_name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("contact {}", contact.id)))
    }

    async fn delete_contact(&self, contact_id: i64) -> Result<bool, DatabaseError> {
        // addresses go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(contact_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn search_contacts(&self, user_id: i64, search: &ContactSearch) -> Result<Page<Contact>, DatabaseError> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM contacts");
        push_search_filters(&mut count_query, user_id, search);
        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut select_query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM contacts", CONTACT_COLUMNS));
        push_search_filters(&mut select_query, user_id, search);
        select_query
            .push(" ORDER BY id ASC LIMIT ")
            .push_bind(i64::from(search.size))
            .push(" OFFSET ")
            .push_bind(i64::try_from(search.offset()).unwrap_or(i64::MAX));
        let items = select_query
            .build_query_as::<Contact>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            items,
            total: u64::try_from(total).unwrap_or(0),
            page: search.page,
            size: search.size,
        })
    }

    async fn insert_address(&self, address: NewAddress) -> Result<Address, DatabaseError> {
        let sql = format!(
            "INSERT INTO addresses (contact_id, street, city, province, country, postal_code) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            ADDRESS_COLUMNS
        );
        let row = sqlx::query_as::<_, Address>(&sql)
            .bind(address.contact_id)
            .bind(&address.street)
            .bind(&address.city)
            .bind(&address.province)
            .bind(&address.country)
            .bind(&address.postal_code)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_address(&self, contact_id: i64, address_id: i64) -> Result<Option<Address>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM addresses WHERE contact_id = $1 AND id = $2",
            ADDRESS_COLUMNS
        );
        let row = sqlx::query_as::<_, Address>(&sql)
            .bind(contact_id)
            .bind(address_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_address(&self, address: &Address) -> Result<Address, DatabaseError> {
        let sql = format!(
            "UPDATE addresses SET street = $2, city = $3, province = $4, country = $5, \
             postal_code = $6, updated_at = now() WHERE id = $1 RETURNING {}",
            ADDRESS_COLUMNS
        );
        sqlx::query_as::<_, Address>(&sql)
            .bind(address.id)
            .bind(&address.street)
            .bind(&address.city)
            .bind(&address.province)
            .bind(&address.country)
            .bind(&address.postal_code)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("address {}", address.id)))
    }

    async fn delete_address(&self, address_id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(address_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_addresses(&self, contact_id: i64) -> Result<Vec<Address>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM addresses WHERE contact_id = $1 ORDER BY id ASC",
            ADDRESS_COLUMNS
        );
        let rows = sqlx::query_as::<_, Address>(&sql)
            .bind(contact_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
