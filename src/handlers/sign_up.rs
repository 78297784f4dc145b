// Sign-up handler: provider registration followed by local session issuance
use actix_web::{web, HttpRequest, HttpResponse};
use log::error;
use serde_json::Value;

use crate::error::BridgeError;
use crate::session::SessionAssembler;
use crate::strapi::StrapiClient;
use crate::utils::responses::ResponseBuilder;

/// `POST /strapi-auth/sign-up`
///
/// The body is forwarded verbatim; the provider decides which registration
/// fields are required.
///
/// # Errors
///
/// Returns an unauthorized error carrying the provider's error payload when
/// registration is rejected, or a server error if the session cannot be issued
pub async fn sign_up(
    req: HttpRequest,
    body: web::Json<Value>,
    client: web::Data<StrapiClient>,
    assembler: web::Data<SessionAssembler>,
) -> Result<HttpResponse, BridgeError> {
    let credentials = client.register(&body).await.map_err(|e| {
        error!("Strapi sign-up error: {e}");
        BridgeError::unauthorized_from(e)
    })?;

    let assembled = assembler.assemble(credentials, &req).await?;
    Ok(ResponseBuilder::ok_json_with_cookies(
        &assembled.response,
        vec![assembled.cookie],
    ))
}
