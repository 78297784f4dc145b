//! Request header helpers

use actix_web::{http::header, HttpRequest};

/// Header carrying the client address when running behind a proxy
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Read a header as a string, empty when absent or not valid UTF-8
#[must_use]
pub fn header_or_empty(req: &HttpRequest, name: impl header::AsHeaderName) -> String {
    req.headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Client address and user agent as recorded on a session
///
/// The forwarded-for header is taken verbatim, including any proxy chain.
#[must_use]
pub fn extract_client_info(req: &HttpRequest) -> (String, String) {
    (
        header_or_empty(req, FORWARDED_FOR),
        header_or_empty(req, header::USER_AGENT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_extract_client_info_present() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.9, 10.0.0.1"))
            .insert_header(("User-Agent", "Mozilla/5.0"))
            .to_http_request();

        let (ip, agent) = extract_client_info(&req);
        assert_eq!(ip, "203.0.113.9, 10.0.0.1");
        assert_eq!(agent, "Mozilla/5.0");
    }

    #[test]
    fn test_extract_client_info_absent() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(extract_client_info(&req), (String::new(), String::new()));
    }
}
