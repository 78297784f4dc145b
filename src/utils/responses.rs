//! HTTP response handling
//!
//! Consistent JSON bodies for errors and for successful responses that carry
//! the session cookie.

use actix_web::{cookie::Cookie, http::header, HttpResponse};
use serde::Serialize;
use serde_json::{json, Value};

/// Unified response builder
pub struct ResponseBuilder;

impl ResponseBuilder {
    /// Create a `BadRequest` (400) error response with optional customization
    #[must_use]
    pub fn bad_request() -> ErrorResponseBuilder {
        ErrorResponseBuilder::new(ErrorType::BadRequest)
    }

    /// Create an `Unauthorized` (401) error response with optional customization
    #[must_use]
    pub fn unauthorized() -> ErrorResponseBuilder {
        ErrorResponseBuilder::new(ErrorType::Unauthorized)
    }

    /// Create an `InternalServerError` (500) error response with optional customization
    #[must_use]
    pub fn internal_server_error() -> ErrorResponseBuilder {
        ErrorResponseBuilder::new(ErrorType::InternalServerError)
    }

    /// Create a `BadGateway` (502) error response with optional customization
    #[must_use]
    pub fn bad_gateway() -> ErrorResponseBuilder {
        ErrorResponseBuilder::new(ErrorType::BadGateway)
    }

    /// 200 with a JSON body
    #[must_use]
    pub fn ok_json<T: Serialize>(data: &T) -> HttpResponse {
        HttpResponse::Ok().json(data)
    }

    /// 200 with a JSON body and cookies
    #[must_use]
    pub fn ok_json_with_cookies<T: Serialize>(
        data: &T,
        cookies: Vec<Cookie<'static>>,
    ) -> HttpResponse {
        let mut builder = HttpResponse::Ok();
        for cookie in cookies {
            builder.cookie(cookie);
        }
        builder.json(data)
    }
}

/// Builder for error responses with fluent interface
pub struct ErrorResponseBuilder {
    error_type: ErrorType,
    message: Option<String>,
    details: Option<Value>,
}

/// Supported HTTP error response types
#[derive(Clone, Copy)]
enum ErrorType {
    BadRequest,
    Unauthorized,
    InternalServerError,
    BadGateway,
}

impl ErrorResponseBuilder {
    fn new(error_type: ErrorType) -> Self {
        Self {
            error_type,
            message: None,
            details: None,
        }
    }

    /// Set a custom error message
    #[must_use]
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    /// Attach a structured payload, typically the provider's error object
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Build the final `HttpResponse`
    #[must_use]
    pub fn build(self) -> HttpResponse {
        let body = json!({
            "error": self.error_type.error_code(),
            "message": self.message.unwrap_or_else(|| self.error_type.default_message().to_string()),
            "details": self.details.unwrap_or(Value::Null),
        });

        let mut response = match self.error_type {
            ErrorType::BadRequest => HttpResponse::BadRequest(),
            ErrorType::Unauthorized => HttpResponse::Unauthorized(),
            ErrorType::InternalServerError => HttpResponse::InternalServerError(),
            ErrorType::BadGateway => HttpResponse::BadGateway(),
        };

        response
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .json(body)
    }
}

impl ErrorType {
    fn error_code(self) -> &'static str {
        match self {
            Self::BadRequest => "invalid_request",
            Self::Unauthorized => "unauthorized",
            Self::InternalServerError => "server_error",
            Self::BadGateway => "bad_gateway",
        }
    }

    fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "The request is malformed or invalid",
            Self::Unauthorized => "Authentication is required to access this resource",
            Self::InternalServerError => "An internal server error occurred",
            Self::BadGateway => "Failed to connect to the identity provider",
        }
    }
}
