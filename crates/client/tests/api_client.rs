//! HTTP behaviour of `ApiClient` against a mock platform.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use blockcity_client::{ApiClient, Credentials, Endpoint, Error, RemotePayload};
use blockcity_signing::{BizParams, KeyMaterial, request_sign};
use common::Secret;
use rsa::RsaPrivateKey;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::Verifier;
use serde_json::{Value, json};
use sha2::Sha256;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const PRIVATE_KEY: &str = include_str!("../../signing/tests/fixtures/private_key.pem");

fn client_for(server: &MockServer) -> ApiClient {
    let credentials = Credentials::new(
        server.uri(),
        format!("{}/api/oauth/token", server.uri()),
        "abc",
        Secret::new("s3cret".into()),
        KeyMaterial::from_pem(PRIVATE_KEY),
    );
    ApiClient::new(reqwest::Client::new(), credentials)
}

fn form_fields(request: &Request) -> BTreeMap<String, String> {
    let decode = |s: &str| urlencoding::decode(&s.replace('+', " ")).unwrap().into_owned();
    std::str::from_utf8(&request.body)
        .unwrap()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap();
            (decode(k), decode(v))
        })
        .collect()
}

async fn only_request(server: &MockServer) -> Request {
    let mut requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests.remove(0)
}

fn remote(err: Error) -> (Endpoint, RemotePayload) {
    match err {
        Error::Remote { endpoint, payload } => (endpoint, payload),
        other => panic!("expected Remote, got {other:?}"),
    }
}

// ============================================================================
// fetch_user
// ============================================================================

#[tokio::test]
async fn fetch_user_sends_signed_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openapi/user/baseinfo"))
        .and(body_string_contains("method=user.baseinfo"))
        .and(body_string_contains("access_token=tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": {"uid": "u-1", "nickname": "alice"}
        })))
        .mount(&server)
        .await;

    let user = client_for(&server)
        .fetch_user("tok123", &format!("{}/openapi/user/baseinfo", server.uri()))
        .await
        .unwrap();
    assert_eq!(user, json!({"uid": "u-1", "nickname": "alice"}));

    let fields = form_fields(&only_request(&server).await);
    assert_eq!(fields["client_id"], "abc");
    assert!(!fields.contains_key("client_secret"), "secret must not be sent");
    assert!(fields["timestamp"].chars().all(|c| c.is_ascii_digit()));

    let unsigned: BizParams = fields
        .iter()
        .filter(|(k, _)| k.as_str() != "sign")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    assert_eq!(fields["sign"], request_sign(&unsigned, "s3cret"));
}

#[tokio::test]
async fn fetch_user_nonzero_code_is_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 1,
            "errorCode": "ACCESS_TOKEN_INVALID"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_user("expired", &server.uri())
        .await
        .unwrap_err();
    assert_eq!(
        remote(err),
        (
            Endpoint::UserInfo,
            RemotePayload::ErrorCode("ACCESS_TOKEN_INVALID".into())
        )
    );
}

#[tokio::test]
async fn http_status_does_not_override_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"code": "0", "data": 7})))
        .mount(&server)
        .await;

    let data = client_for(&server)
        .fetch_user("tok", &server.uri())
        .await
        .unwrap();
    assert_eq!(data, json!(7));
}

// ============================================================================
// create_pay_order
// ============================================================================

#[tokio::test]
async fn create_pay_order_sends_rsa_signed_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/blockpay/api/gateway"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"trade_no": "BP20231114001"}
        })))
        .mount(&server)
        .await;

    let biz = r#"{"out_trade_no":"T1001","total_amount":"9.90","subject":"tea"}"#;
    let data = client_for(&server)
        .create_pay_order(biz, "https://shop.example/notify")
        .await
        .unwrap();
    assert_eq!(data, json!({"trade_no": "BP20231114001"}));

    let request = only_request(&server).await;
    let content_length: usize = request.headers["content-length"]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(content_length, request.body.len());

    let body: Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body["app_id"], "abc");
    assert_eq!(body["method"], "blockpay.trade.app.pay");
    assert_eq!(body["version"], "1.0");
    assert_eq!(body["pay_expire"], "30m");
    assert_eq!(body["notify_url"], "https://shop.example/notify");
    assert_eq!(body["biz_content"], biz);
    assert!(body["timestamp"].is_f64(), "timestamp travels as a float");

    let signed = format!("{biz}{:.0}", body["timestamp"].as_f64().unwrap());
    let sign = STANDARD.decode(body["sign"].as_str().unwrap()).unwrap();
    let public_key = RsaPrivateKey::from_pkcs8_pem(PRIVATE_KEY)
        .unwrap()
        .to_public_key();
    VerifyingKey::<Sha256>::new(public_key)
        .verify(
            signed.as_bytes(),
            &Signature::try_from(sign.as_slice()).unwrap(),
        )
        .expect("sign must cover biz_content followed by timestamp");
}

#[tokio::test]
async fn create_pay_order_failure_carries_error_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "errorCode": "OUT_TRADE_NO_USED",
            "message": "duplicate order"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_pay_order("{}", "https://shop.example/notify")
        .await
        .unwrap_err();
    assert_eq!(
        remote(err),
        (
            Endpoint::PayOrder,
            RemotePayload::ErrorCode("OUT_TRADE_NO_USED".into())
        )
    );
}

#[tokio::test]
async fn create_pay_order_with_bad_key_sends_nothing() {
    let server = MockServer::start().await;
    let credentials = Credentials::new(
        server.uri(),
        server.uri(),
        "abc",
        Secret::new("s3cret".into()),
        KeyMaterial::from_pem("not a key"),
    );
    let err = ApiClient::new(reqwest::Client::new(), credentials)
        .create_pay_order("{}", "https://shop.example/notify")
        .await
        .unwrap_err();

    assert!(
        matches!(err, Error::Signing(blockcity_signing::Error::KeyLoad(_))),
        "got {err:?}"
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_pay_order_uses_configured_expiry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let credentials = Credentials::new(
        server.uri(),
        server.uri(),
        "abc",
        Secret::new("s3cret".into()),
        KeyMaterial::from_pem(PRIVATE_KEY),
    )
    .with_pay_expire("2h");
    ApiClient::new(reqwest::Client::new(), credentials)
        .create_pay_order("{}", "https://shop.example/notify")
        .await
        .unwrap();

    let body: Value = serde_json::from_slice(&only_request(&server).await.body).unwrap();
    assert_eq!(body["pay_expire"], "2h");
}

// ============================================================================
// exchange_token
// ============================================================================

#[tokio::test]
async fn exchange_token_posts_unsigned_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"access_token": "tok123", "expires_in": 7200}
        })))
        .mount(&server)
        .await;

    let token = client_for(&server).exchange_token("code-1").await.unwrap();
    assert_eq!(token["access_token"], "tok123");

    let fields = form_fields(&only_request(&server).await);
    assert_eq!(fields.len(), 3);
    assert_eq!(fields["client_id"], "abc");
    assert_eq!(fields["client_secret"], "s3cret");
    assert_eq!(fields["code"], "code-1");
}

#[tokio::test]
async fn exchange_token_failure_carries_whole_body() {
    let server = MockServer::start().await;
    let body = r#"{"success":false,"message":"authorization code expired"}"#;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let err = client_for(&server).exchange_token("stale").await.unwrap_err();
    // Unlike the other endpoints there is no errorCode to report
    assert_eq!(
        remote(err),
        (Endpoint::Token, RemotePayload::Body(body.into()))
    );
}

// ============================================================================
// Transport and parsing failures
// ============================================================================

#[tokio::test]
async fn non_json_response_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).exchange_token("code").await.unwrap_err();
    match err {
        Error::InvalidResponse { endpoint, body } => {
            assert_eq!(endpoint, Endpoint::Token);
            assert_eq!(body, "<html>Bad Gateway</html>");
        }
        other => panic!("expected InvalidResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn connection_failure_is_http_error() {
    let credentials = Credentials::new(
        "http://127.0.0.1:9",
        "http://127.0.0.1:9/token",
        "abc",
        Secret::new("s3cret".into()),
        KeyMaterial::from_pem(PRIVATE_KEY),
    );
    let err = ApiClient::new(reqwest::Client::new(), credentials)
        .exchange_token("code")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Http(_)), "got {err:?}");
}
