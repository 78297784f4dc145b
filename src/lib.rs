#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the bridge
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod handlers;
pub mod models;
pub mod session;
pub mod settings;
pub mod strapi;
pub mod utils;

// Make test utilities available for both unit tests and integration tests
#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use error::BridgeError;
pub use handlers::configure_services;
pub use models::{LocalSession, LocalUser, SessionResponse};
pub use session::{SessionAssembler, SessionHook};
pub use settings::BridgeSettings;
pub use strapi::{ProviderError, StrapiClient};
