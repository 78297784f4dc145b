// Sign-in handler
use actix_web::{web, HttpRequest, HttpResponse};
use log::error;

use crate::error::BridgeError;
use crate::models::SignInRequest;
use crate::session::SessionAssembler;
use crate::strapi::StrapiClient;
use crate::utils::responses::ResponseBuilder;

/// `POST /strapi-auth/sign-in` with `{ identifier, password }`
///
/// # Errors
///
/// Returns an unauthorized error when the provider rejects the credentials,
/// or a server error if the session cannot be issued
pub async fn sign_in(
    req: HttpRequest,
    body: web::Json<SignInRequest>,
    client: web::Data<StrapiClient>,
    assembler: web::Data<SessionAssembler>,
) -> Result<HttpResponse, BridgeError> {
    let credentials = client.login(&body).await.map_err(|e| {
        error!("Strapi sign-in error: {e}");
        BridgeError::unauthorized_from(e)
    })?;

    let assembled = assembler.assemble(credentials, &req).await?;
    Ok(ResponseBuilder::ok_json_with_cookies(
        &assembled.response,
        vec![assembled.cookie],
    ))
}
