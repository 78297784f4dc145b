// HTTP request handlers for the Strapi session bridge
pub mod health;
pub mod password;
pub mod session;
pub mod sign_in;
pub mod sign_up;

use actix_web::{error::JsonPayloadError, web, HttpRequest};
use log::debug;
use serde_json::Value;

use crate::error::BridgeError;

// Re-export the main handler functions
pub use health::health;
pub use password::{forgot_password, update_password};
pub use session::{get_session, sign_out};
pub use sign_in::sign_in;
pub use sign_up::sign_up;

/// Route prefix shared by all bridge endpoints
pub const ROUTE_PREFIX: &str = "/strapi-auth";

/// Register all bridge routes
pub fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::scope(ROUTE_PREFIX)
                .route("/sign-up", web::post().to(sign_up))
                .route("/sign-in", web::post().to(sign_in))
                .route("/update-password", web::post().to(update_password))
                .route("/forgot-password", web::post().to(forgot_password))
                .route("/get-session", web::get().to(get_session))
                .route("/sign-out", web::post().to(sign_out)),
        )
        .route("/ping", web::get().to(health));
}

/// JSON extractor config that reports unreadable bodies in the bridge's error format
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!("Rejected request body: {err}");
    BridgeError::BadRequest {
        message: err.to_string(),
        detail: Value::Null,
    }
    .into()
}
