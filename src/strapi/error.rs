use serde_json::Value;
use thiserror::Error;

/// Failure of a single provider call
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status
    #[error("provider rejected the request with status {status}: {}", rejection_message(.body))]
    Rejected { status: u16, body: Value },

    /// The provider could not be reached or the response could not be read
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered successfully but not with the expected shape
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// The provider's error payload: the `error` member when present, else the whole body
    #[must_use]
    pub fn error_payload(&self) -> Option<&Value> {
        match self {
            Self::Rejected { body, .. } => Some(body.get("error").unwrap_or(body)),
            _ => None,
        }
    }

    /// Human readable message for a rejection, taken verbatim from the provider
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Rejected { body, .. } => rejection_message(body),
            other => other.to_string(),
        }
    }
}

/// Extract `error.message` from a Strapi error body, falling back to the serialized payload
fn rejection_message(body: &Value) -> String {
    let payload = body.get("error").unwrap_or(body);
    match payload {
        Value::String(message) => message.clone(),
        _ => payload
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| payload.to_string(), ToString::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_from_strapi_error_body() {
        let err = ProviderError::Rejected {
            status: 400,
            body: json!({
                "data": null,
                "error": {"status": 400, "name": "ApplicationError", "message": "Email already taken", "details": {}}
            }),
        };
        assert_eq!(err.message(), "Email already taken");
        assert_eq!(err.error_payload().unwrap()["name"], "ApplicationError");
        assert!(err.to_string().contains("status 400"));
    }

    #[test]
    fn test_message_falls_back_to_payload() {
        let err = ProviderError::Rejected {
            status: 500,
            body: json!({"error": {"code": 42}}),
        };
        assert_eq!(err.message(), r#"{"code":42}"#);

        let plain = ProviderError::Rejected {
            status: 502,
            body: json!("Bad Gateway"),
        };
        assert_eq!(plain.message(), "Bad Gateway");
        assert_eq!(plain.error_payload(), Some(&json!("Bad Gateway")));
    }

    #[test]
    fn test_malformed_has_no_payload() {
        let err = ProviderError::Malformed("missing user".to_string());
        assert!(err.error_payload().is_none());
        assert_eq!(err.message(), "malformed provider response: missing user");
    }
}
