//! Session assembly: provider credentials -> local `{ user, session }` + sealed cookie
//!
//! Steps, in order: optional enrichment of the provider user, base
//! normalization, field-mapping overlay, session construction, session hook,
//! cookie sealing. Only enrichment is allowed to fail silently.

use actix_web::{cookie::Cookie, HttpRequest};
use chrono::{Duration, Utc};
use log::info;
use std::sync::Arc;

use crate::error::BridgeError;
use crate::models::{
    LocalSession, LocalUser, ProviderCredentialResult, SessionPayload, SessionResponse,
};
use crate::session::cookie::{CookieFactory, SESSION_TTL_SECONDS};
use crate::session::enrichment::enrich_provider_user;
use crate::session::field_map::FieldMap;
use crate::session::hook::{IdentityHook, SessionHook, StaticFieldsHook};
use crate::settings::BridgeSettings;
use crate::strapi::StrapiClient;
use crate::utils::crypto::generate_session_id;
use crate::utils::headers::extract_client_info;

/// Result of a successful assembly
///
/// `cookie` must be attached to the outgoing response; it is the only
/// response mutation assembly performs.
pub struct AssembledSession {
    pub response: SessionResponse,
    pub cookie: Cookie<'static>,
}

#[derive(Clone)]
pub struct SessionAssembler {
    client: StrapiClient,
    field_map: Option<FieldMap>,
    hook: Arc<dyn SessionHook>,
    cookie_factory: CookieFactory,
}

impl SessionAssembler {
    #[must_use]
    pub fn new(client: StrapiClient, cookie_factory: CookieFactory) -> Self {
        Self {
            client,
            field_map: None,
            hook: Arc::new(IdentityHook),
            cookie_factory,
        }
    }

    /// Build an assembler wired from settings
    ///
    /// The hook is a `StaticFieldsHook` when `session.extra_user_fields` is
    /// configured, the identity hook otherwise.
    #[must_use]
    pub fn from_settings(settings: &BridgeSettings, client: StrapiClient) -> Self {
        let cookie_factory = CookieFactory::new(
            settings.session.session_secret.as_bytes(),
            settings.cookies.secure,
        );
        let mut assembler = Self::new(client, cookie_factory);

        if let Some(map) = &settings.strapi.user_fields_map {
            assembler = assembler.with_field_map(map.clone());
        }
        if let Some(fields) = &settings.session.extra_user_fields {
            assembler = assembler.with_hook(Arc::new(StaticFieldsHook::new(fields.clone())));
        }
        assembler
    }

    #[must_use]
    pub fn with_field_map(mut self, field_map: FieldMap) -> Self {
        self.field_map = Some(field_map).filter(|m| !m.is_empty());
        self
    }

    #[must_use]
    pub fn with_hook(mut self, hook: Arc<dyn SessionHook>) -> Self {
        self.hook = hook;
        self
    }

    #[must_use]
    pub fn cookie_factory(&self) -> &CookieFactory {
        &self.cookie_factory
    }

    /// Turn provider credentials into a local user/session pair and its cookie
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::Provider` for a malformed provider user and
    /// `BridgeError::Session` if the hook or cookie sealing fails
    pub async fn assemble(
        &self,
        credentials: ProviderCredentialResult,
        req: &HttpRequest,
    ) -> Result<AssembledSession, BridgeError> {
        let ProviderCredentialResult {
            user: mut provider_user,
            jwt: provider_jwt,
        } = credentials;

        if let Some(field_map) = &self.field_map {
            provider_user =
                enrich_provider_user(&self.client, field_map, &provider_jwt, provider_user).await;
        }

        let mut user = LocalUser::from_provider_user(&provider_user)?;
        if let Some(field_map) = &self.field_map {
            user.apply_field_map(field_map, &provider_user);
        }

        let session = build_session(&user, &provider_jwt, req);
        let sealed = self
            .hook
            .transform(SessionPayload {
                session: session.clone(),
                user: user.clone(),
            })
            .await?;
        let cookie = self.cookie_factory.create_session_cookie(&sealed)?;
        info!("Issued session for user {}", user.id);

        // The hook shapes the cookie only; callers get the pair as assembled
        Ok(AssembledSession {
            response: SessionResponse {
                user,
                session,
                provider_jwt,
            },
            cookie,
        })
    }
}

fn build_session(user: &LocalUser, provider_jwt: &str, req: &HttpRequest) -> LocalSession {
    let token = generate_session_id();
    let now = Utc::now();
    let (ip_address, user_agent) = extract_client_info(req);

    LocalSession {
        id: token.clone(),
        token,
        user_id: user.id.clone(),
        created_at: now,
        updated_at: now,
        expires_at: now + Duration::seconds(SESSION_TTL_SECONDS),
        ip_address,
        user_agent,
        provider_jwt: provider_jwt.to_string(),
    }
}
