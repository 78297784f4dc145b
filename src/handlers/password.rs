// Password reset handlers
use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, warn};
use serde_json::Value;

use crate::error::BridgeError;
use crate::models::{ForgotPasswordRequest, ProviderCredentialResult, UpdatePasswordRequest};
use crate::session::SessionAssembler;
use crate::settings::BridgeSettings;
use crate::strapi::{ProviderError, StrapiClient};
use crate::utils::responses::ResponseBuilder;

/// `POST /strapi-auth/update-password` with `{ code, password, passwordConfirmation }`
///
/// A local session is issued only when `sign_in_after_reset` is enabled and
/// the provider reports the account as confirmed. Otherwise the provider body
/// is returned unchanged and no cookie is set.
///
/// # Errors
///
/// Returns a bad-request error carrying the provider's error payload when the
/// reset is rejected, or a server error if the session cannot be issued
pub async fn update_password(
    req: HttpRequest,
    body: web::Json<UpdatePasswordRequest>,
    client: web::Data<StrapiClient>,
    assembler: web::Data<SessionAssembler>,
    settings: web::Data<BridgeSettings>,
) -> Result<HttpResponse, BridgeError> {
    let provider_body = client.reset_password(&body).await.map_err(|e| {
        warn!("Strapi password reset error: {e}");
        BridgeError::bad_request_from(e)
    })?;

    if !(settings.strapi.sign_in_after_reset && is_confirmed(&provider_body)) {
        debug!("Password reset completed without sign-in");
        return Ok(ResponseBuilder::ok_json(&provider_body));
    }

    let credentials: ProviderCredentialResult = serde_json::from_value(provider_body)
        .map_err(|e| ProviderError::Malformed(format!("expected {{ user, jwt }}: {e}")))?;
    let assembled = assembler.assemble(credentials, &req).await?;
    Ok(ResponseBuilder::ok_json_with_cookies(
        &assembled.response,
        vec![assembled.cookie],
    ))
}

/// `POST /strapi-auth/forgot-password` with `{ email }`
///
/// # Errors
///
/// Returns a bad-request error carrying the provider's error payload when the
/// provider rejects the request
pub async fn forgot_password(
    body: web::Json<ForgotPasswordRequest>,
    client: web::Data<StrapiClient>,
) -> Result<HttpResponse, BridgeError> {
    let provider_body = client.forgot_password(&body).await.map_err(|e| {
        warn!("Strapi forgot-password error: {e}");
        BridgeError::bad_request_from(e)
    })?;
    Ok(ResponseBuilder::ok_json(&provider_body))
}

fn is_confirmed(provider_body: &Value) -> bool {
    provider_body
        .pointer("/user/confirmed")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}
