//! Router-level tests for the HTTP adapter
//!
//! Requests are driven through the assembled router with
//! `tower::ServiceExt::oneshot`, so no socket is opened.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use textforge_server::{build_app_router, ApiState, CorsConfig, ServerConfig};
use tower::ServiceExt;

fn router() -> Router {
    router_with(ServerConfig::default(), ApiState::default())
}

fn router_with(config: ServerConfig, state: ApiState) -> Router {
    build_app_router(&config, state).expect("router builds")
}

async fn send(router: Router, request: Request<Body>) -> Response {
    router.oneshot(request).await.expect("request succeeds")
}

async fn get(router: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds");
    send(router, request).await
}

async fn post_json(router: Router, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds");
    send(router, request).await
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body is readable");
    String::from_utf8(bytes.to_vec()).expect("body is utf-8")
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).expect("body is json")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let response = get(router(), "/healthz").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn classic_defaults_to_upper() {
    let response = get(router(), "/classic/hello").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .expect("content type present")
        .to_str()
        .expect("content type ascii")
        .to_string();
    assert!(content_type.starts_with("text/plain"));
    assert_eq!(body_text(response).await, "HELLO");
}

#[tokio::test]
async fn classic_applies_transforms_in_order() {
    let response = get(
        router(),
        "/classic/HELLO%20WORLD?transforms=lower,capitalize",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Hello world");

    let response = get(
        router(),
        "/classic/HELLO%20WORLD?transforms=capitalize,lower",
    )
    .await;
    assert_eq!(body_text(response).await, "hello world");
}

#[tokio::test]
async fn classic_accepts_repeated_parameters() {
    let response = get(
        router(),
        "/classic/np.%2021%20kot?transforms=expand&transforms=numbertotext",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "na przykład dwadzieścia jeden kot");
}

#[tokio::test]
async fn classic_decodes_unicode_path() {
    let response = get(router(), "/classic/za%C5%BC%C3%B3%C5%82%C4%87").await;
    assert_eq!(body_text(response).await, "ZAŻÓŁĆ");
}

#[tokio::test]
async fn classic_empty_parameter_uses_defaults() {
    let state = ApiState::new(["lower"]).expect("known default");
    let response = get(
        router_with(ServerConfig::default(), state),
        "/classic/ABC?transforms=",
    )
    .await;
    assert_eq!(body_text(response).await, "abc");
}

#[tokio::test]
async fn classic_rejects_unknown_transformation() {
    let response = get(router(), "/classic/abc?transforms=upper,frobnicate").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({
            "error": "unknown transformation `frobnicate`",
            "transformation": "frobnicate"
        })
    );
}

#[tokio::test]
async fn formatted_returns_transformed_text() {
    let response = post_json(
        router(),
        "/formatted/transform",
        r#"{"text": "Tom & Jerry 2", "transforms": ["numbertotext", "latex"]}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "transformedText": r"Tom \& Jerry dwa" })
    );
}

#[tokio::test]
async fn formatted_missing_transforms_uses_defaults() {
    let response = post_json(router(), "/formatted/transform", r#"{"text": "abc"}"#).await;
    assert_eq!(body_json(response).await, json!({ "transformedText": "ABC" }));
}

#[tokio::test]
async fn formatted_empty_transforms_is_identity() {
    let response = post_json(
        router(),
        "/formatted/transform",
        r#"{"text": "abc", "transforms": []}"#,
    )
    .await;
    assert_eq!(body_json(response).await, json!({ "transformedText": "abc" }));
}

#[tokio::test]
async fn formatted_legacy_path_is_served() {
    let response = post_json(
        router(),
        "/formated/transform",
        r#"{"text": "Hello Ma", "transforms": ["inverse"]}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "transformedText": "Am ollEh" })
    );
}

#[tokio::test]
async fn formatted_rejects_unknown_transformation() {
    let response = post_json(
        router(),
        "/formatted/transform",
        r#"{"text": "abc", "transforms": ["uppercase"]}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["transformation"], "uppercase");
    assert_eq!(body["error"], "unknown transformation `uppercase`");
}

#[tokio::test]
async fn formatted_rejects_malformed_json() {
    let response = post_json(router(), "/formatted/transform", "{\"text\": ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn formatted_rejects_missing_text_field() {
    let response = post_json(router(), "/formatted/transform", r#"{"transforms": []}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn formatted_requires_json_content_type() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/formatted/transform")
        .body(Body::from(r#"{"text": "abc"}"#))
        .expect("request builds");
    let response = send(router(), request).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn formatted_enforces_body_limit() {
    let config = ServerConfig {
        max_body_bytes: 16,
        ..ServerConfig::default()
    };
    let response = post_json(
        router_with(config, ApiState::default()),
        "/formatted/transform",
        r#"{"text": "far too long for the configured limit"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let response = get(router(), "/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "resource `/nope` not found");
}

#[tokio::test]
async fn wrong_method_is_not_allowed() {
    let response = get(router(), "/formatted/transform").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "method `GET` not allowed for `/formatted/transform`"
    );
}

#[tokio::test]
async fn request_id_is_generated_and_propagated() {
    let response = get(router(), "/healthz").await;
    assert!(response.headers().get("x-request-id").is_some());

    let request = Request::builder()
        .uri("/healthz")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .expect("request builds");
    let response = send(router(), request).await;
    assert_eq!(
        response.headers().get("x-request-id").expect("echoed id"),
        "abc-123"
    );
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let request = Request::builder()
        .uri("/classic/abc")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .expect("request builds");
    let response = send(router(), request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .expect("ACAO header present by default"),
        "*"
    );
}

#[tokio::test]
async fn cors_disabled_yields_no_headers() {
    let config = ServerConfig {
        cors: CorsConfig {
            enabled: false,
            ..CorsConfig::default()
        },
        ..ServerConfig::default()
    };
    let request = Request::builder()
        .uri("/healthz")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .expect("request builds");
    let response = send(router_with(config, ApiState::default()), request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn cors_enabled_allows_explicit_origin() {
    let origin = "http://localhost:5173";
    let config = ServerConfig {
        cors: CorsConfig {
            enabled: true,
            allow_origins: vec![origin.to_string()],
            ..CorsConfig::default()
        },
        ..ServerConfig::default()
    };
    let router = router_with(config, ApiState::default());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/formatted/transform")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .expect("request builds");
    let response = send(router, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .expect("ACAO header present when enabled"),
        origin
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_MAX_AGE)
            .expect("max-age header present"),
        "600"
    );
}
