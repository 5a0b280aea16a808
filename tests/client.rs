use std::net::TcpListener;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zalo_otp::{
    AccessToken, HttpVerb, MessageStatusRequest, SendOtpRequest, ZaloClient, ZaloConfig,
    ZaloError, into_params,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config_for(server: &MockServer) -> ZaloConfig {
    ZaloConfig::new("app-id", "app-secret")
        .with_base_urls(format!("{}/v4/", server.uri()), format!("{}/", server.uri()))
}

fn client_for(server: &MockServer) -> ZaloClient {
    init_logging();
    ZaloClient::new(config_for(server)).expect("client")
}

fn ok_body() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "error": 0,
        "message": "Success",
        "data": { "msg_id": "m1" }
    }))
}

#[tokio::test]
async fn send_otp_posts_formatted_phone_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/message/template"))
        .and(header("content-type", "application/json; charset=utf-8"))
        .and(header("access_token", "oa-token"))
        .and(body_json(json!({ "phone": "84912345678", "template_id": "t1" })))
        .respond_with(ok_body())
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.set_authorization("oa-token");

    let response = client
        .send_otp(into_params(json!({ "phone": "0912345678", "template_id": "t1" })).unwrap())
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.error_code(), Some(0));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn send_otp_falls_back_to_configured_template() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/message/template"))
        .and(body_json(json!({
            "phone": "84987654321",
            "template_data": { "otp": "123456" },
            "tracking_id": "track-1",
            "template_id": "default-tpl"
        })))
        .respond_with(ok_body())
        .expect(1)
        .mount(&server)
        .await;

    init_logging();
    let client =
        ZaloClient::new(config_for(&server).with_template_id("default-tpl")).expect("client");

    let mut request = SendOtpRequest::new("0987654321").tracking_id("track-1");
    request.template_data = Some(json!({ "otp": "123456" }));

    client
        .send_otp(request.into_params().unwrap())
        .await
        .expect("response")
        .error_for_status()
        .expect("success");
}

#[tokio::test]
async fn get_status_message_sends_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/message/status"))
        .and(query_param("message_id", "m1"))
        .and(query_param("phone", "84912345678"))
        .respond_with(ok_body())
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .get_status_message(MessageStatusRequest::new("m1", "0912345678").into_params().unwrap())
        .await
        .expect("response");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), Some("message_id=m1&phone=84912345678"));
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn refresh_token_posts_form_to_oauth_host() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v4/oa/access_token"))
        .and(header("secret_key", "app-secret"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string(
            "app_id=app-id&grant_type=refresh_token&refresh_token=refresh-1",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-2",
            "refresh_token": "refresh-2",
            "expires_in": "90000"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.set_refresh_token("refresh-1");

    let token: AccessToken = client
        .refresh_token()
        .await
        .expect("response")
        .json()
        .expect("token");

    assert_eq!(token.access_token, "access-2");
    assert_eq!(token.refresh_token, "refresh-2");
    assert_eq!(token.expires_in, Some(90000));
}

#[tokio::test]
async fn refresh_token_without_token_sends_nothing() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let err = client.refresh_token().await.unwrap_err();

    assert!(matches!(err, ZaloError::Configuration(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn refresh_headers_do_not_leak_into_later_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ok_body())
        .expect(2)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.set_refresh_token("refresh-1");
    client.refresh_token().await.expect("refresh");
    client
        .send_otp(into_params(json!({ "phone": "0912345678" })).unwrap())
        .await
        .expect("send");

    let requests = server.received_requests().await.unwrap();
    let send = &requests[1];
    assert_eq!(send.url.path(), "/message/template");
    assert_eq!(
        send.headers.get("content-type").unwrap().to_str().unwrap(),
        "application/json; charset=utf-8"
    );
    assert!(send.headers.get("secret_key").is_none());
    assert!(client.state().params.is_empty());
}

#[tokio::test]
async fn get_otp_info_queries_with_app_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/otp/info"))
        .and(query_param("app_id", "app-id"))
        .and(query_param("app_secret", "app-secret"))
        .and(query_param("phone", "84912345678"))
        .respond_with(ok_body())
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).get_otp_info("0912345678").await.expect("response");
}

#[tokio::test]
async fn generic_verb_without_url_is_invalid() {
    let server = MockServer::start().await;
    let mut client = client_for(&server);

    for verb in [HttpVerb::Get, HttpVerb::Post, HttpVerb::Put, HttpVerb::Patch] {
        let err = client.execute(verb, None, None).await.unwrap_err();
        assert!(matches!(err, ZaloError::InvalidRequest(_)), "{:?}", err);
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn generic_post_uses_request_url_and_accumulated_params() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/message/template"))
        .and(body_json(json!({ "phone": "84912345678", "mode": "development" })))
        .respond_with(ok_body())
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client
        .set_request_url("message/template", true)
        .set_params(into_params(json!({ "phone": "84912345678" })).unwrap());

    client
        .post(None, Some(into_params(json!({ "mode": "development" })).unwrap()))
        .await
        .expect("response");

    assert_eq!(client.state().params.len(), 2);
}

#[tokio::test]
async fn generic_form_post_and_relative_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v4/oa/profile"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("name=Shop+A&tags%5B0%5D=x"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client
        .set_request_url("oa", false)
        .set_headers([("Content-Type", "application/x-www-form-urlencoded")]);

    let response = client
        .put(
            Some("/profile"),
            Some(into_params(json!({ "name": "Shop A", "tags": ["x"] })).unwrap()),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn generic_get_puts_params_in_query_and_patch_takes_absolute_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/message/status"))
        .and(query_param("message_id", "m9"))
        .respond_with(ok_body())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/elsewhere"))
        .respond_with(ok_body())
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.set_request_url("message/status", true);
    client
        .get(None, Some(into_params(json!({ "message_id": "m9" })).unwrap()))
        .await
        .expect("get");

    client.flush_params();
    client
        .patch(Some(&format!("{}/elsewhere", server.uri())), None)
        .await
        .expect("patch");

    let requests = server.received_requests().await.unwrap();
    assert!(requests[1].body.is_empty());
}

#[tokio::test]
async fn upstream_errors_are_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": -124,
            "message": "Access token is invalid"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let response = client
        .send_otp(into_params(json!({ "phone": "0912345678" })).unwrap())
        .await
        .expect("raw response");
    assert!(response.is_success());
    let err = response.error_for_status().unwrap_err();
    assert_eq!(err.zalo_code(), Some(-124));

    let response = client
        .get_status_message(into_params(json!({ "message_id": "m1" })).unwrap())
        .await
        .expect("raw response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body(), "boom");
}

#[tokio::test]
async fn transport_failures_propagate() {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = format!("http://{}/", addr);
    let client =
        ZaloClient::new(ZaloConfig::new("app-id", "app-secret").with_base_urls(&base, &base))
            .expect("client");

    let err = client
        .send_otp(into_params(json!({ "phone": "0912345678" })).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, ZaloError::Transport(_)), "{:?}", err);
}

#[tokio::test]
async fn configured_timeout_is_enforced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ok_body().set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    init_logging();
    let client = ZaloClient::new(config_for(&server).with_timeout(1)).expect("client");

    match client.get_otp_info("0912345678").await {
        Err(ZaloError::Transport(e)) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {:?}", other),
    }
}
