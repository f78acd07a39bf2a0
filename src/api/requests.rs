//! Request bodies and their validation rules

use serde::Deserialize;

use crate::validation::{untrimmed, Field, FieldErrors, Validator};

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Field<String>,
    #[serde(default)]
    pub name: Field<String>,
    #[serde(default, deserialize_with = "untrimmed")]
    pub password: Field<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        v.required("username", &self.username).max("username", &self.username, 100);
        v.required("password", &self.password).max("password", &self.password, 100);
        v.required("name", &self.name).max("name", &self.name, 100);
        v.finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Field<String>,
    #[serde(default, deserialize_with = "untrimmed")]
    pub password: Field<String>,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        v.required("username", &self.username).max("username", &self.username, 100);
        v.required("password", &self.password).max("password", &self.password, 100);
        v.finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserUpdateRequest {
    #[serde(default)]
    pub name: Field<String>,
    #[serde(default, deserialize_with = "untrimmed")]
    pub password: Field<String>,
}

impl UserUpdateRequest {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        v.max("name", &self.name, 100);
        v.max("password", &self.password, 100);
        v.finish()
    }
}

/// Body for both `POST /contacts` and `PUT /contacts/{id}`
#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub first_name: Field<String>,
    #[serde(default)]
    pub last_name: Field<String>,
    #[serde(default)]
    pub email: Field<String>,
    #[serde(default)]
    pub phone: Field<String>,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        v.required("first_name", &self.first_name).max("first_name", &self.first_name, 200);
        v.max("last_name", &self.last_name, 200);
        v.max("email", &self.email, 200).email("email", &self.email);
        v.max("phone", &self.phone, 20);
        v.finish()
    }
}

/// Body for both `POST .../addresses` and `PUT .../addresses/{id}`
#[derive(Debug, Default, Deserialize)]
pub struct AddressRequest {
    #[serde(default)]
    pub street: Field<String>,
    #[serde(default)]
    pub city: Field<String>,
    #[serde(default)]
    pub province: Field<String>,
    #[serde(default)]
    pub country: Field<String>,
    #[serde(default)]
    pub postal_code: Field<String>,
}

impl AddressRequest {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        v.max("street", &self.street, 200);
        v.max("city", &self.city, 100);
        v.max("province", &self.province, 100);
        v.required("country", &self.country).max("country", &self.country, 100);
        v.max("postal_code", &self.postal_code, 10);
        v.finish()
    }
}

/// Query string of `GET /contacts`
#[derive(Debug, Default, Deserialize)]
pub struct ContactSearchQuery {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
}
