//! Testing utilities shared by unit and integration tests
//!
//! - [`fixtures`] - Provider records, settings and app wiring pointed at a mock provider
//! - [`requests`] - Request builders and response helpers for handler tests
//!
//! ```rust,ignore
//! use strapi_auth_bridge::testing::{fixtures::TestFixtures, requests::json_post};
//!
//! let server = wiremock::MockServer::start().await;
//! let settings = TestFixtures::settings(&server.uri());
//! let app = actix_web::test::init_service(
//!     actix_web::App::new().configure(TestFixtures::bridge_services(settings)),
//! )
//! .await;
//! ```

pub mod fixtures;
pub mod requests;

pub use fixtures::TestFixtures;

/// Common test constants
pub mod constants {
    /// Email of the fixture provider user
    pub const TEST_EMAIL: &str = "a@b.com";

    /// Username of the fixture provider user
    pub const TEST_USERNAME: &str = "ab";

    /// Provider id of the fixture user
    pub const TEST_PROVIDER_ID: u64 = 7;

    /// JWT the mock provider hands out
    pub const TEST_PROVIDER_JWT: &str = "PJWT";

    /// Service token configured for the provider
    pub const TEST_SERVICE_TOKEN: &str = "service-token";

    /// Secret the session cookie is sealed with
    pub const TEST_SESSION_SECRET: &str = "test_key_32_bytes_long_for_test_";

    /// Default test client IP
    pub const TEST_CLIENT_IP: &str = "192.168.1.1";

    /// Default test user agent string
    pub const TEST_USER_AGENT: &str =
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";
}
