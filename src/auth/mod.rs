//! Credential lifecycle: registration, login, token resolution, profile
//! updates and logout.

pub mod password;

use once_cell::sync::Lazy;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::requests::{LoginRequest, RegisterRequest, UserUpdateRequest};
use crate::config::{self, SecurityConfig};
use crate::database::models::{NewUser, User};
use crate::database::Store;
use crate::error::{ApiError, MSG_BAD_CREDENTIALS, MSG_UNAUTHORIZED, MSG_USERNAME_TAKEN};

use password::{hash_password, verify_password};

/// The user a request's token resolved to
#[derive(Clone, Debug)]
pub struct AuthUser(User);

impl AuthUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn user(&self) -> &User {
        &self.0
    }
}

/// Verified against when the username is unknown, so a miss costs the same
/// as a wrong password.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("dummy-password", &config::config().security).ok());

async fn hash_blocking(password: String, security: SecurityConfig) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash_password(&password, &security))
        .await
        .map_err(|e| {
            tracing::error!("Password hashing task failed: {}", e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })?
        .map_err(|e| {
            tracing::error!("Password hashing failed: {}", e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })
}

async fn verify_blocking(hash: String, password: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || verify_password(&hash, &password))
        .await
        .map_err(|e| {
            tracing::error!("Password verification task failed: {}", e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })
}

pub struct Authenticator {
    store: Arc<dyn Store>,
    security: SecurityConfig,
}

impl Authenticator {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_security(store, config::config().security.clone())
    }

    pub fn with_security(store: Arc<dyn Store>, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<User, ApiError> {
        request.validate()?;
        let (Some(username), Some(name), Some(password)) = (
            request.username.into_option(),
            request.name.into_option(),
            request.password.into_option(),
        ) else {
            return Err(ApiError::bad_request("username, name and password are required"));
        };

        if self.store.find_user_by_username(&username).await?.is_some() {
            return Err(ApiError::conflict("username", MSG_USERNAME_TAKEN));
        }

        let password = hash_blocking(password, self.security.clone()).await?;
        // A concurrent registration can still win the race; the unique
        // constraint surfaces as the same conflict.
        let user = self
            .store
            .insert_user(NewUser { username, name, password })
            .await?;

        tracing::info!("Registered user '{}' (id {})", user.username, user.id);
        Ok(user)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<User, ApiError> {
        request.validate()?;
        let (Some(username), Some(password)) =
            (request.username.into_option(), request.password.into_option())
        else {
            return Err(ApiError::unauthorized(MSG_BAD_CREDENTIALS));
        };

        let Some(user) = self.store.find_user_by_username(&username).await? else {
            if let Some(dummy) = DUMMY_HASH.clone() {
                verify_blocking(dummy, password).await?;
            }
            tracing::warn!("Login failed: bad credentials");
            return Err(ApiError::unauthorized(MSG_BAD_CREDENTIALS));
        };

        if !verify_blocking(user.password.clone(), password).await? {
            tracing::warn!("Login failed: bad credentials");
            return Err(ApiError::unauthorized(MSG_BAD_CREDENTIALS));
        }

        let token = Uuid::new_v4().to_string();
        let user = self.store.set_token(user.id, Some(&token)).await?;

        tracing::info!("User '{}' logged in", user.username);
        Ok(user)
    }

    /// Resolves a raw token to its user. Absent, blank and unknown tokens all
    /// fail the same way.
    pub async fn resolve(&self, token: Option<&str>) -> Result<AuthUser, ApiError> {
        let token = token.map(str::trim).filter(|t| !t.is_empty()).ok_or_else(|| {
            tracing::warn!("Request without token");
            ApiError::unauthorized(MSG_UNAUTHORIZED)
        })?;

        match self.store.find_user_by_token(token).await? {
            Some(user) => Ok(AuthUser(user)),
            None => {
                tracing::warn!("Request with unknown token");
                Err(ApiError::unauthorized(MSG_UNAUTHORIZED))
            }
        }
    }

    pub async fn update(&self, identity: &AuthUser, request: UserUpdateRequest) -> Result<User, ApiError> {
        request.validate()?;
        let name = request.name.into_option();
        let password = match request.password.into_option() {
            Some(password) => Some(hash_blocking(password, self.security.clone()).await?),
            None => None,
        };

        // Token is owned by login/logout
        let user = self
            .store
            .update_profile(identity.id(), name.as_deref(), password.as_deref())
            .await?;
        tracing::info!("Updated profile of user '{}'", user.username);
        Ok(user)
    }

    pub async fn logout(&self, identity: &AuthUser) -> Result<bool, ApiError> {
        let user = self.store.set_token(identity.id(), None).await?;

        tracing::info!("User '{}' logged out", user.username);
        Ok(true)
    }
}
