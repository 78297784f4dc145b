//! Local error type surfaced by the HTTP handlers

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::Value;
use thiserror::Error;

use crate::strapi::ProviderError;
use crate::utils::responses::ResponseBuilder;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// Provider rejected a sign-up or sign-in
    #[error("{message}")]
    Unauthorized { message: String, detail: Value },

    /// Provider rejected a password operation, or the request body was invalid
    #[error("{message}")]
    BadRequest { message: String, detail: Value },

    /// Provider unreachable or answered with an unexpected shape
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Session hook or cookie sealing failed
    #[error("session issuance failed: {0}")]
    Session(#[from] anyhow::Error),
}

impl BridgeError {
    /// Convert a provider failure into an unauthorized error when it is a rejection
    #[must_use]
    pub fn unauthorized_from(err: ProviderError) -> Self {
        match err.error_payload().cloned() {
            Some(detail) => Self::Unauthorized {
                message: err.message(),
                detail,
            },
            None => Self::Provider(err),
        }
    }

    /// Convert a provider failure into a bad-request error when it is a rejection
    #[must_use]
    pub fn bad_request_from(err: ProviderError) -> Self {
        match err.error_payload().cloned() {
            Some(detail) => Self::BadRequest {
                message: err.message(),
                detail,
            },
            None => Self::Provider(err),
        }
    }
}

impl ResponseError for BridgeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Provider(ProviderError::Transport(_)) => StatusCode::BAD_GATEWAY,
            Self::Provider(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Unauthorized { message, detail } => ResponseBuilder::unauthorized()
                .with_message(message)
                .with_details(detail.clone())
                .build(),
            Self::BadRequest { message, detail } => ResponseBuilder::bad_request()
                .with_message(message)
                .with_details(detail.clone())
                .build(),
            Self::Provider(ProviderError::Transport(e)) => {
                log::error!("Identity provider unreachable: {e}");
                ResponseBuilder::bad_gateway().build()
            }
            Self::Provider(e) => {
                log::error!("Unexpected identity provider response: {e}");
                ResponseBuilder::internal_server_error().build()
            }
            Self::Session(e) => {
                log::error!("Failed to issue session: {e}");
                ResponseBuilder::internal_server_error().build()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use serde_json::json;

    fn rejection(status: u16) -> ProviderError {
        ProviderError::Rejected {
            status,
            body: json!({"error": {"status": status, "message": "Email already taken"}}),
        }
    }

    #[actix_web::test]
    async fn test_unauthorized_from_rejection() {
        let err = BridgeError::unauthorized_from(rejection(409));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Email already taken");

        let bytes = to_bytes(err.error_response().into_body()).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "unauthorized");
        assert_eq!(body["message"], "Email already taken");
        assert_eq!(body["details"]["status"], 409);
    }

    #[test]
    fn test_bad_request_from_rejection() {
        let err = BridgeError::bad_request_from(rejection(400));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_malformed_is_internal_error() {
        let err = BridgeError::unauthorized_from(ProviderError::Malformed("no user".to_string()));
        assert!(matches!(err, BridgeError::Provider(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_session_error_is_internal_error() {
        let err = BridgeError::from(anyhow::anyhow!("sealing failed"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
