use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    HttpRequest,
};
use anyhow::Result;
use serde::Serialize;

use crate::models::SessionPayload;
use crate::utils::crypto::{decrypt_data, derive_encryption_key, encrypt_data};

/// Name of the sealed session cookie
pub const COOKIE_NAME: &str = "strapi_auth_session";

/// Session and cookie lifetime in seconds (7 days)
pub const SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Options for cookie creation
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age: Duration,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            http_only: true,
            secure: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age: Duration::seconds(SESSION_TTL_SECONDS),
        }
    }
}

/// Seals `{ session, user }` payloads into cookies and opens them again
#[derive(Clone)]
pub struct CookieFactory {
    encryption_key: [u8; 32],
    cookie_secure: bool,
}

impl CookieFactory {
    #[must_use]
    pub fn new(secret: &[u8], cookie_secure: bool) -> Self {
        Self {
            encryption_key: derive_encryption_key(secret),
            cookie_secure,
        }
    }

    /// Generic method to create a cookie with encrypted data
    ///
    /// # Errors
    ///
    /// Returns an error if encryption fails
    pub fn create_cookie<T: Serialize>(
        &self,
        name: &str,
        data: &T,
        options: CookieOptions,
    ) -> Result<Cookie<'static>> {
        let value = encrypt_data(data, &self.encryption_key)?;

        Ok(Cookie::build(name.to_owned(), value)
            .http_only(options.http_only)
            .secure(self.cookie_secure && options.secure)
            .same_site(options.same_site)
            .path(options.path)
            .max_age(options.max_age)
            .finish())
    }

    /// Seal a session payload into the session cookie
    ///
    /// # Errors
    ///
    /// Returns an error if encryption fails
    pub fn create_session_cookie(&self, payload: &SessionPayload) -> Result<Cookie<'static>> {
        self.create_cookie(COOKIE_NAME, payload, CookieOptions::default())
    }

    /// Cookie that clears the session cookie
    #[must_use]
    pub fn create_expired_cookie(&self) -> Cookie<'static> {
        Cookie::build(COOKIE_NAME, "")
            .http_only(true)
            .secure(self.cookie_secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(Duration::seconds(-1))
            .finish()
    }

    /// Open the session cookie of a request
    ///
    /// Returns `None` when the cookie is absent or cannot be decrypted.
    /// Expiry is not checked here.
    #[must_use]
    pub fn session_from_request(&self, req: &HttpRequest) -> Option<SessionPayload> {
        let cookie = req.cookie(COOKIE_NAME)?;
        match decrypt_data::<SessionPayload>(cookie.value(), &self.encryption_key) {
            Ok(payload) => Some(payload),
            Err(e) => {
                log::warn!("Failed to decrypt session cookie: {e}");
                None
            }
        }
    }
}
