// Integration tests for the sign-up endpoint against a mock Strapi
use actix_web::{http::StatusCode, test, App};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use strapi_auth_bridge::session::FieldMap;
use strapi_auth_bridge::testing::constants::{
    TEST_CLIENT_IP, TEST_PROVIDER_JWT, TEST_SERVICE_TOKEN, TEST_USER_AGENT,
};
use strapi_auth_bridge::testing::requests::{json_post, session_cookies};
use strapi_auth_bridge::testing::TestFixtures;

const SIGN_UP_URI: &str = "/strapi-auth/sign-up";

fn registration() -> Value {
    json!({"email": "a@b.com", "username": "ab", "password": "x"})
}

#[actix_web::test]
async fn test_sign_up_issues_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/local/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {
                "id": 7,
                "email": "a@b.com",
                "username": "ab",
                "confirmed": false,
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z"
            },
            "jwt": "PJWT"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = test::init_service(
        App::new().configure(TestFixtures::bridge_services(TestFixtures::settings(
            &server.uri(),
        ))),
    )
    .await;
    let resp = test::call_service(&app, json_post(SIGN_UP_URI, &registration()).to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let cookies = session_cookies(&resp);
    assert_eq!(cookies.len(), 1);
    assert_eq!(cookies[0].http_only(), Some(true));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["providerJwt"], "PJWT");

    let user = &body["user"];
    assert_eq!(user["id"], "7");
    assert_eq!(user["email"], "a@b.com");
    assert_eq!(user["name"], "ab");
    assert_eq!(user["emailVerified"], false);
    assert!(user["image"].is_null());
    assert_eq!(user["createdAt"], "2024-01-01T00:00:00Z");

    let session = &body["session"];
    assert_eq!(session["providerJwt"], "PJWT");
    assert_eq!(session["userId"], "7");
    assert_eq!(session["ipAddress"], TEST_CLIENT_IP);
    assert_eq!(session["userAgent"], TEST_USER_AGENT);
    assert_eq!(session["id"], session["token"]);
}

#[actix_web::test]
async fn test_sign_up_rejection_is_unauthorized_without_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/local/register"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": {"message": "Email already taken"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let mut settings = TestFixtures::settings(&server.uri());
    settings.strapi.user_fields_map = Some(FieldMap::new(vec![(
        "bio".to_string(),
        "profile.bio".to_string(),
    )]));

    let app =
        test::init_service(App::new().configure(TestFixtures::bridge_services(settings))).await;
    let resp = test::call_service(&app, json_post(SIGN_UP_URI, &registration()).to_request()).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookies(&resp).is_empty());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Email already taken");
    assert_eq!(body["details"]["message"], "Email already taken");
}

#[actix_web::test]
async fn test_sign_up_forwards_body_verbatim_with_service_token() {
    let server = MockServer::start().await;
    let payload = json!({
        "email": "a@b.com",
        "username": "ab",
        "password": "x",
        "newsletter": true
    });
    Mock::given(method("POST"))
        .and(path("/api/auth/local/register"))
        .and(header("authorization", format!("Bearer {TEST_SERVICE_TOKEN}").as_str()))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(200).set_body_json(TestFixtures::credentials_body()))
        .expect(1)
        .mount(&server)
        .await;

    let app = test::init_service(
        App::new().configure(TestFixtures::bridge_services(TestFixtures::settings(
            &server.uri(),
        ))),
    )
    .await;
    let resp = test::call_service(&app, json_post(SIGN_UP_URI, &payload).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_sign_up_enriches_mapped_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/local/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(TestFixtures::credentials_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(query_param("populate[0]", "avatar"))
        .and(header("authorization", format!("Bearer {TEST_PROVIDER_JWT}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "avatar": {"url": "/uploads/ab.png"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut settings = TestFixtures::settings(&server.uri());
    settings.strapi.user_fields_map = Some(FieldMap::new(vec![
        ("image".to_string(), "avatar.url".to_string()),
        ("handle".to_string(), "username".to_string()),
    ]));

    let app =
        test::init_service(App::new().configure(TestFixtures::bridge_services(settings))).await;
    let resp = test::call_service(&app, json_post(SIGN_UP_URI, &registration()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["image"], "/uploads/ab.png");
    assert_eq!(body["user"]["handle"], "ab");
}

#[actix_web::test]
async fn test_sign_up_provider_unreachable_is_bad_gateway() {
    // Nothing listens on the discard port
    let settings = TestFixtures::settings("http://127.0.0.1:9");
    let app =
        test::init_service(App::new().configure(TestFixtures::bridge_services(settings))).await;
    let resp = test::call_service(&app, json_post(SIGN_UP_URI, &registration()).to_request()).await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert!(session_cookies(&resp).is_empty());
}

#[actix_web::test]
async fn test_sign_up_mapped_media_and_null_values_are_kept() {
    let server = MockServer::start().await;
    let mut body = TestFixtures::credentials_body();
    body["user"]["avatar"] = json!({"id": 3, "url": "/uploads/ab.png"});
    body["user"]["nickname"] = Value::Null;
    Mock::given(method("POST"))
        .and(path("/api/auth/local/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let mut settings = TestFixtures::settings(&server.uri());
    settings.strapi.user_fields_map = Some(FieldMap::new(vec![
        ("image".to_string(), "avatar".to_string()),
        ("name".to_string(), "nickname".to_string()),
    ]));

    let app =
        test::init_service(App::new().configure(TestFixtures::bridge_services(settings))).await;
    let resp = test::call_service(&app, json_post(SIGN_UP_URI, &registration()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["image"], json!({"id": 3, "url": "/uploads/ab.png"}));
    assert!(body["user"]["name"].is_null());
    assert!(body["user"].as_object().unwrap().contains_key("name"));
}
