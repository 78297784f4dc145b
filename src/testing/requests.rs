//! Request builders and response helpers for handler tests

use actix_web::{cookie::Cookie, dev::ServiceResponse, test::TestRequest};
use serde::Serialize;

use super::constants::{TEST_CLIENT_IP, TEST_USER_AGENT};
use crate::session::COOKIE_NAME;

/// JSON POST carrying the default client headers
#[must_use]
pub fn json_post<T: Serialize>(uri: &str, body: &T) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .insert_header(("x-forwarded-for", TEST_CLIENT_IP))
        .insert_header(("user-agent", TEST_USER_AGENT))
        .set_json(body)
}

/// Session cookies set by a response
#[must_use]
pub fn session_cookies<B>(resp: &ServiceResponse<B>) -> Vec<Cookie<'static>> {
    resp.response()
        .cookies()
        .filter(|c| c.name() == COOKIE_NAME)
        .map(Cookie::into_owned)
        .collect()
}
