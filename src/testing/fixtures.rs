//! Pre-built provider records, settings and app wiring

use actix_web::web;
use serde_json::{json, Value};

use super::constants::{
    TEST_EMAIL, TEST_PROVIDER_ID, TEST_PROVIDER_JWT, TEST_SERVICE_TOKEN, TEST_SESSION_SECRET,
    TEST_USERNAME,
};
use crate::handlers::configure_services;
use crate::session::{CookieFactory, SessionAssembler};
use crate::settings::BridgeSettings;
use crate::strapi::StrapiClient;

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Provider user record as Strapi returns it
    #[must_use]
    pub fn strapi_user() -> Value {
        json!({
            "id": TEST_PROVIDER_ID,
            "username": TEST_USERNAME,
            "email": TEST_EMAIL,
            "provider": "local",
            "confirmed": true,
            "blocked": false,
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z"
        })
    }

    /// Successful `{ user, jwt }` provider body
    #[must_use]
    pub fn credentials_body() -> Value {
        json!({
            "jwt": TEST_PROVIDER_JWT,
            "user": Self::strapi_user()
        })
    }

    /// Strapi v4 style error body
    #[must_use]
    pub fn strapi_error(status: u16, name: &str, message: &str) -> Value {
        json!({
            "data": null,
            "error": {
                "status": status,
                "name": name,
                "message": message,
                "details": {}
            }
        })
    }

    /// Settings pointed at a provider base URL, with insecure cookies and a fixed secret
    #[must_use]
    pub fn settings(strapi_url: &str) -> BridgeSettings {
        let mut settings = BridgeSettings::default();
        settings.strapi.url = strapi_url.to_string();
        settings.strapi.token = Some(TEST_SERVICE_TOKEN.to_string());
        settings.session.session_secret = TEST_SESSION_SECRET.to_string();
        settings.cookies.secure = false;
        settings
    }

    /// Cookie factory matching [`TestFixtures::settings`]
    #[must_use]
    pub fn cookie_factory() -> CookieFactory {
        CookieFactory::new(TEST_SESSION_SECRET.as_bytes(), false)
    }

    /// Wire the client, assembler and settings into an app, then register all routes
    pub fn bridge_services(settings: BridgeSettings) -> impl FnOnce(&mut web::ServiceConfig) {
        let client = StrapiClient::from_settings(&settings.strapi);
        let assembler = SessionAssembler::from_settings(&settings, client.clone());
        Self::bridge_services_with(settings, client, assembler)
    }

    /// Same as [`TestFixtures::bridge_services`] with a caller-built assembler
    pub fn bridge_services_with(
        settings: BridgeSettings,
        client: StrapiClient,
        assembler: SessionAssembler,
    ) -> impl FnOnce(&mut web::ServiceConfig) {
        move |cfg: &mut web::ServiceConfig| {
            cfg.app_data(web::Data::new(client))
                .app_data(web::Data::new(assembler))
                .app_data(web::Data::new(settings));
            configure_services(cfg);
        }
    }
}
