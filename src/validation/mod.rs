//! Request validation producing per-field error messages.
//!
//! Each request shape has an explicit `validate` function that collects every
//! failure into a [`FieldErrors`] map keyed by field name.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Field name -> list of messages, ordered by field name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// A JSON body field that distinguishes "not sent" from "sent as null".
///
/// Strings are trimmed and an empty string counts as null, matching how
/// HTML forms submit cleared inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Field<T> {
    #[default]
    Missing,
    Null,
    Value(T),
}

impl<'de> Deserialize<'de> for Field<String> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(match value {
            None => Field::Null,
            Some(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Field::Null
                } else {
                    Field::Value(trimmed.to_string())
                }
            }
        })
    }
}

/// Deserializer for password fields: empty still means null, but surrounding
/// whitespace is kept as part of the secret.
pub fn untrimmed<'de, D>(deserializer: D) -> Result<Field<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(match value {
        Some(s) if !s.is_empty() => Field::Value(s),
        _ => Field::Null,
    })
}

impl<T> Field<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    /// `None` when absent (leave untouched), `Some(None)` when cleared
    pub fn into_patch(self) -> Option<Option<T>> {
        match self {
            Field::Missing => None,
            Field::Null => Some(None),
            Field::Value(v) => Some(Some(v)),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// Accumulates rule failures for one request
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

/// "first_name" -> "first name" for use in messages
fn attribute(field: &str) -> String {
    field.replace('_', " ")
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_default().push(message.into());
    }

    /// Field must be present with a non-empty value
    pub fn required(&mut self, field: &str, value: &Field<String>) -> &mut Self {
        if value.value().is_none() {
            self.add(field, format!("The {} field is required.", attribute(field)));
        }
        self
    }

    pub fn max(&mut self, field: &str, value: &Field<String>, max: usize) -> &mut Self {
        if let Some(v) = value.value() {
            if v.chars().count() > max {
                self.add(
                    field,
                    format!("The {} field must not be greater than {} characters.", attribute(field), max),
                );
            }
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &Field<String>) -> &mut Self {
        if let Some(v) = value.value() {
            if !EMAIL_PATTERN.is_match(v) {
                self.add(field, format!("The {} field must be a valid email address.", attribute(field)));
            }
        }
        self
    }

    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
