#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use contact_book_api::config::SecurityConfig;
use contact_book_api::database::models::{Address, Contact, User};
use contact_book_api::database::MemoryStore;
use contact_book_api::{app, testing, AppState};

pub use contact_book_api::testing::{OTHER_TOKEN, TEST_TOKEN};

/// One server per test: the router runs in-process on the test's runtime,
/// backed by its own `MemoryStore`.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    client: reqwest::Client,
}

pub fn cheap_security() -> SecurityConfig {
    SecurityConfig {
        enable_cors: true,
        cors_origins: vec!["*".into()],
        argon2_memory_kib: 1024,
        argon2_iterations: 1,
        argon2_parallelism: 1,
    }
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(MemoryStore::new());
        let router = app(AppState::new(store.clone()), &cheap_security());
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self { port, base_url, store, client: reqwest::Client::new() })
    }

    /// User `test` with token `test`
    pub async fn seed_user(&self) -> Result<User> {
        testing::seed_user(&*self.store, "test", &cheap_security()).await
    }

    /// User `test2` with token `test2`
    pub async fn seed_other_user(&self) -> Result<User> {
        testing::seed_user(&*self.store, "test2", &cheap_security()).await
    }

    pub async fn seed_contact(&self, user: &User) -> Result<Contact> {
        testing::seed_contact(&*self.store, user).await
    }

    pub async fn seed_contacts(&self, user: &User) -> Result<Vec<Contact>> {
        testing::seed_contacts(&*self.store, user).await
    }

    pub async fn seed_address(&self, contact: &Contact) -> Result<Address> {
        testing::seed_address(&*self.store, contact).await
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut request = self.client.request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = token {
            request = request.header("Authorization", token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let res = request.send().await?;
        let status = res.status();
        let text = res.text().await?;
        let body = if text.is_empty() { Value::Null } else { serde_json::from_str(&text)? };
        Ok((status, body))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, path, token, Some(body)).await
    }

    pub async fn patch(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PATCH, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, path, token, None).await
    }
}
