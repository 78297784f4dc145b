//! Provider user -> local user normalization

use chrono::{DateTime, Utc};
use log::debug;
use serde_json::{Map, Value};

use crate::models::{LocalUser, ProviderUser, FIXED_USER_FIELDS};
use crate::session::field_map::FieldMap;
use crate::strapi::ProviderError;

impl LocalUser {
    /// Build the fixed local fields from a provider user
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Malformed` when `id`, `email`, `createdAt` or
    /// `updatedAt` is missing or has the wrong type
    pub fn from_provider_user(provider_user: &ProviderUser) -> Result<Self, ProviderError> {
        let id = match provider_user.get("id") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            _ => return Err(malformed("id")),
        };
        let email = provider_user
            .get("email")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("email"))?
            .to_string();

        Ok(Self {
            id,
            email,
            name: provider_user
                .get("username")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            email_verified: provider_user
                .get("confirmed")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            image: Value::Null,
            created_at: timestamp(provider_user, "createdAt")?,
            updated_at: timestamp(provider_user, "updatedAt")?,
            extra: Map::new(),
        })
    }

    /// Overlay every resolvable mapped field onto this user
    pub fn apply_field_map(&mut self, field_map: &FieldMap, provider_user: &ProviderUser) {
        for (field, value) in field_map.resolve_all(provider_user) {
            self.set_field(&field, value);
        }
    }

    /// Assign a value by its serialized (camelCase) field name
    ///
    /// A value that fits a fixed field's type is stored there. Anything else,
    /// including an ill-typed value for a fixed name, is kept verbatim in
    /// `extra` and takes precedence when the user is serialized.
    pub fn set_field(&mut self, field: &str, value: Value) {
        let assigned = match (field, &value) {
            ("id", Value::String(s)) => {
                self.id.clone_from(s);
                true
            }
            ("email", Value::String(s)) => {
                self.email.clone_from(s);
                true
            }
            ("name", Value::String(s)) => {
                self.name.clone_from(s);
                true
            }
            ("emailVerified", Value::Bool(b)) => {
                self.email_verified = *b;
                true
            }
            ("image", v) => {
                self.image = v.clone();
                true
            }
            ("createdAt" | "updatedAt", v) => match parse_date(v) {
                Some(date) if field == "createdAt" => {
                    self.created_at = date;
                    true
                }
                Some(date) => {
                    self.updated_at = date;
                    true
                }
                None => false,
            },
            _ => false,
        };

        if assigned {
            self.extra.remove(field);
        } else {
            if FIXED_USER_FIELDS.contains(&field) {
                debug!("Keeping provider value for '{field}' as-is: {value}");
            }
            self.extra.insert(field.to_string(), value);
        }
    }
}

fn malformed(field: &str) -> ProviderError {
    ProviderError::Malformed(format!("provider user has no usable '{field}'"))
}

fn timestamp(provider_user: &ProviderUser, field: &str) -> Result<DateTime<Utc>, ProviderError> {
    provider_user
        .get(field)
        .and_then(parse_date)
        .ok_or_else(|| malformed(field))
}

fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
}
