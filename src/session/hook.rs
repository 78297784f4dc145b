//! Session transform hook
//!
//! A hook receives the freshly assembled `{ session, user }` pair before the
//! cookie is sealed and returns the pair that replaces it.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::models::SessionPayload;

#[async_trait]
pub trait SessionHook: Send + Sync {
    /// Transform the pair; the returned value fully replaces the input
    ///
    /// # Errors
    ///
    /// An error aborts session issuance
    async fn transform(&self, payload: SessionPayload) -> Result<SessionPayload>;
}

/// Returns the pair unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityHook;

#[async_trait]
impl SessionHook for IdentityHook {
    async fn transform(&self, payload: SessionPayload) -> Result<SessionPayload> {
        Ok(payload)
    }
}

/// Adds a fixed set of fields to every user, e.g. deployment-wide claims
#[derive(Debug, Clone, Default)]
pub struct StaticFieldsHook {
    fields: Map<String, Value>,
}

impl StaticFieldsHook {
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

#[async_trait]
impl SessionHook for StaticFieldsHook {
    async fn transform(&self, mut payload: SessionPayload) -> Result<SessionPayload> {
        for (field, value) in &self.fields {
            payload.user.set_field(field, value.clone());
        }
        Ok(payload)
    }
}
