use log::debug;
use reqwest::{header, Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;

use crate::models::{
    ForgotPasswordRequest, ProviderCredentialResult, ProviderUser, SignInRequest,
    UpdatePasswordRequest,
};
use crate::settings::StrapiSettings;
use crate::strapi::error::ProviderError;

const REGISTER_PATH: &str = "/api/auth/local/register";
const LOGIN_PATH: &str = "/api/auth/local";
const RESET_PASSWORD_PATH: &str = "/api/auth/reset-password";
const FORGOT_PASSWORD_PATH: &str = "/api/auth/forgot-password";
const CURRENT_USER_PATH: &str = "/api/users/me";

/// HTTP client for the Strapi users-permissions API
///
/// Every call is a single request: no retries, no timeout beyond what the
/// underlying HTTP stack imposes.
#[derive(Clone)]
pub struct StrapiClient {
    http_client: Client,
    base_url: String,
    service_token: Option<String>,
}

impl StrapiClient {
    #[must_use]
    pub fn new(base_url: &str, service_token: Option<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_token,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &StrapiSettings) -> Self {
        Self::new(&settings.url, settings.token.clone())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attach the service token, when one is configured
    fn with_service_token(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.service_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ProviderError> {
        let url = self.endpoint(path);
        debug!("POST {url}");

        let request = self
            .http_client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(body);

        let response = self.with_service_token(request).send().await?;
        read_json(response).await
    }

    /// Register a new account; the payload is forwarded verbatim
    ///
    /// # Errors
    ///
    /// Returns `Rejected` for a non-success status, `Transport` if the provider
    /// is unreachable, `Malformed` if the success body is not `{ user, jwt }`
    pub async fn register(
        &self,
        payload: &Value,
    ) -> Result<ProviderCredentialResult, ProviderError> {
        let body = self.post_json(REGISTER_PATH, payload).await?;
        parse_credentials(body)
    }

    /// Log in with identifier and password
    ///
    /// # Errors
    ///
    /// Same failure modes as [`StrapiClient::register`]
    pub async fn login(
        &self,
        request: &SignInRequest,
    ) -> Result<ProviderCredentialResult, ProviderError> {
        let body = self.post_json(LOGIN_PATH, request).await?;
        parse_credentials(body)
    }

    /// Submit a password reset; returns the provider body unchanged
    ///
    /// # Errors
    ///
    /// Returns `Rejected` for a non-success status or `Transport` if the provider is unreachable
    pub async fn reset_password(
        &self,
        request: &UpdatePasswordRequest,
    ) -> Result<Value, ProviderError> {
        self.post_json(RESET_PASSWORD_PATH, request).await
    }

    /// Ask the provider to send a reset code; returns the provider body unchanged
    ///
    /// # Errors
    ///
    /// Returns `Rejected` for a non-success status or `Transport` if the provider is unreachable
    pub async fn forgot_password(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<Value, ProviderError> {
        self.post_json(FORGOT_PASSWORD_PATH, request).await
    }

    /// Fetch the current user on behalf of a user JWT, populating the given relations
    ///
    /// # Errors
    ///
    /// Returns `Rejected`, `Transport`, or `Malformed` if the body is not a JSON object
    pub async fn fetch_current_user(
        &self,
        user_jwt: &str,
        populate: &[String],
    ) -> Result<ProviderUser, ProviderError> {
        let url = self.endpoint(CURRENT_USER_PATH);
        let query: Vec<(String, &str)> = populate
            .iter()
            .enumerate()
            .map(|(index, field)| (format!("populate[{index}]"), field.as_str()))
            .collect();
        debug!("GET {url} populate={populate:?}");

        let response = self
            .http_client
            .get(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(user_jwt)
            .query(&query)
            .send()
            .await?;

        match read_json(response).await? {
            Value::Object(user) => Ok(user),
            other => Err(ProviderError::Malformed(format!(
                "expected a user object from {CURRENT_USER_PATH}, got {other}"
            ))),
        }
    }
}

/// Turn a response into JSON, mapping non-success statuses to `Rejected`
async fn read_json(response: Response) -> Result<Value, ProviderError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        return Err(ProviderError::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&text)
        .map_err(|e| ProviderError::Malformed(format!("response is not JSON: {e}")))
}

fn parse_credentials(body: Value) -> Result<ProviderCredentialResult, ProviderError> {
    serde_json::from_value(body)
        .map_err(|e| ProviderError::Malformed(format!("expected {{ user, jwt }}: {e}")))
}
