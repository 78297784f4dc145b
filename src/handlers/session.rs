// Session inspection and sign-out
use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, info};
use serde_json::json;

use crate::session::SessionAssembler;
use crate::utils::responses::ResponseBuilder;

/// `GET /strapi-auth/get-session`
///
/// Returns the sealed `{ session, user }` pair, or `null` when there is no
/// usable session. An expired session cookie is cleared.
pub async fn get_session(
    req: HttpRequest,
    assembler: web::Data<SessionAssembler>,
) -> HttpResponse {
    let factory = assembler.cookie_factory();
    match factory.session_from_request(&req) {
        Some(payload) if !payload.session.is_expired() => ResponseBuilder::ok_json(&payload),
        Some(payload) => {
            debug!("Session for user {} has expired", payload.user.id);
            ResponseBuilder::ok_json_with_cookies(
                &serde_json::Value::Null,
                vec![factory.create_expired_cookie()],
            )
        }
        None => ResponseBuilder::ok_json(&serde_json::Value::Null),
    }
}

/// `POST /strapi-auth/sign-out`
pub async fn sign_out(req: HttpRequest, assembler: web::Data<SessionAssembler>) -> HttpResponse {
    let factory = assembler.cookie_factory();
    if let Some(payload) = factory.session_from_request(&req) {
        info!("Signed out user {}", payload.user.id);
    }
    ResponseBuilder::ok_json_with_cookies(
        &json!({"success": true}),
        vec![factory.create_expired_cookie()],
    )
}
