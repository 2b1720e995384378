//! HTTP entrypoints for the transformation pipeline.

use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Extension, Json, Router,
    body::Body,
    extract::{DefaultBodyLimit, MatchedPath, Path, Query, rejection::JsonRejection},
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use textforge_core::{Pipeline, PipelineBuilder, TransformKind};
use thiserror::Error;
use tokio::{net::TcpListener, sync::watch};
use tower_http::{
    add_extension::AddExtensionLayer,
    classify::ServerErrorsFailureClass,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer, ExposeHeaders},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{CorsConfig, ServerConfig};

const HEALTHZ_PATH: &str = "/healthz";
const CLASSIC_PATH: &str = "/classic/{text}";
const FORMATTED_PATH: &str = "/formatted/transform";
const FORMATTED_LEGACY_PATH: &str = "/formated/transform";
const HEALTHZ_STATUS: &str = "ok";
const TRANSFORMS_PARAM: &str = "transforms";
const REQUEST_ID_HEADER: &str = "x-request-id";
const ANY_ORIGIN: &str = "*";
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize, Copy, Clone, PartialEq, Eq)]
struct HealthzResponse {
    status: &'static str,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ShutdownEvent {
    Pending,
    CtrlC,
    SigTerm,
    ListenerFailed,
}

#[derive(Debug, Deserialize)]
struct TransformRequest {
    text: String,
    #[serde(default)]
    transforms: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransformResponse {
    transformed_text: String,
}

type ApiStateHandle = Arc<ApiState>;

/// Shared, read-only request state
#[derive(Debug, Clone)]
pub struct ApiState {
    defaults: Pipeline,
}

impl ApiState {
    /// Build the state, resolving the default transformation list up front
    pub fn new<I, S>(default_transforms: I) -> Result<Self, ServerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let defaults = Pipeline::resolve(default_transforms)
            .map_err(|source| ServerError::DefaultTransforms { source })?;
        Ok(Self { defaults })
    }

    /// Pipeline used when a request names no transformations
    pub fn defaults(&self) -> &Pipeline {
        &self.defaults
    }

    fn resolve_or_default(&self, names: Vec<String>) -> Result<Pipeline, ApiError> {
        if names.is_empty() {
            return Ok(self.defaults.clone());
        }
        Ok(PipelineBuilder::new().names(names).build()?)
    }
}

impl Default for ApiState {
    fn default() -> Self {
        Self {
            defaults: Pipeline::new(vec![TransformKind::Upper]),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ApiErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    transformation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<String>,
}

#[derive(Debug, Clone)]
struct ApiError {
    status: StatusCode,
    body: ApiErrorBody,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("listen address may not be empty")]
    EmptyListenAddr,
    #[error("invalid listen address `{address}`: {source}")]
    InvalidListenAddr {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to determine local address: {source}")]
    LocalAddr {
        #[source]
        source: std::io::Error,
    },
    #[error("axum server error: {source}")]
    Serve {
        #[source]
        source: std::io::Error,
    },
    #[error("invalid default transformations: {source}")]
    DefaultTransforms {
        #[source]
        source: textforge_core::Error,
    },
    #[error("invalid CORS configuration: {reason}")]
    CorsConfig { reason: String },
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            body: ApiErrorBody {
                error: message.into(),
                transformation: None,
                request_id: None,
            },
        }
    }

    fn with_request_id(mut self, request_id: Option<&str>) -> Self {
        if let Some(id) = request_id {
            debug_assert!(!id.is_empty());
            self.body.request_id = Some(id.to_string());
        }
        self
    }

    fn resource_not_found(path: &str) -> Self {
        debug_assert!(path.starts_with('/'));
        ApiError::new(
            StatusCode::NOT_FOUND,
            format!("resource `{path}` not found"),
        )
    }

    fn method_not_allowed(method: &str, path: &str) -> Self {
        debug_assert!(!method.is_empty());
        ApiError::new(
            StatusCode::METHOD_NOT_ALLOWED,
            format!("method `{method}` not allowed for `{path}`"),
        )
    }
}

impl From<textforge_core::Error> for ApiError {
    fn from(error: textforge_core::Error) -> Self {
        tracing::warn!(%error, "rejected transformation request");
        let mut api = ApiError::new(StatusCode::BAD_REQUEST, error.to_string());
        api.body.transformation = error.transformation_name().map(str::to_string);
        api
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match &rejection {
            JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
                StatusCode::BAD_REQUEST
            }
            other => other.status(),
        };
        ApiError::new(status, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn expand_csv(values: Vec<String>) -> Vec<String> {
    let mut out = Vec::new();
    for value in values {
        for part in value.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            out.push(trimmed.to_string());
        }
    }
    out
}

pub fn build_api_router() -> Router {
    debug_assert!(CLASSIC_PATH.ends_with("{text}"));

    Router::new()
        .route(
            HEALTHZ_PATH,
            get(healthz).fallback(method_not_allowed_handler),
        )
        .route(
            CLASSIC_PATH,
            get(classic_transform).fallback(method_not_allowed_handler),
        )
        .route(
            FORMATTED_PATH,
            post(formatted_transform).fallback(method_not_allowed_handler),
        )
        .route(
            FORMATTED_LEGACY_PATH,
            post(formatted_transform).fallback(method_not_allowed_handler),
        )
}

pub async fn serve(config: ServerConfig, state: ApiState) -> Result<(), ServerError> {
    let listen_addr = parse_listen_addr(&config.listen_addr)?;
    let app = build_app_router(&config, state)?;

    let listener = bind_listener(listen_addr).await?;

    let local_addr = listener
        .local_addr()
        .map_err(|source| ServerError::LocalAddr { source })?;
    tracing::info!(%local_addr, "textforge server listening");

    let (shutdown_tx, shutdown_rx) = watch::channel(ShutdownEvent::Pending);

    let shutdown_future = broadcast_shutdown(shutdown_tx);

    let mut server_future = Box::pin(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_future)
            .await
    });

    let drain_rx = shutdown_rx.clone();
    let mut drain_timeout = Box::pin(drain_timeout_future(drain_rx));

    tokio::select! {
        result = server_future.as_mut() => {
            if let Err(source) = result {
                return Err(ServerError::Serve { source });
            }
        }
        _ = drain_timeout.as_mut() => {
            // Dropping the server future forces termination.
        }
    }

    let final_event = *shutdown_rx.borrow();
    if final_event == ShutdownEvent::Pending {
        tracing::info!("server stopped without external shutdown signal");
    } else {
        tracing::info!(?final_event, "server shutdown complete");
    }

    Ok(())
}

/// Assemble the full application: routes, fallbacks and middleware
pub fn build_app_router(config: &ServerConfig, state: ApiState) -> Result<Router, ServerError> {
    let mut router = Router::new()
        .merge(build_api_router())
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(config.max_body_bytes));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            let path = matched_path_or_uri(request);
            let request_id =
                header_request_id(request.headers()).unwrap_or_else(|| "-".to_string());
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                path = %path,
                request_id = %request_id
            )
        })
        .on_response(
            |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                let status = response.status().as_u16();
                let latency_ms = latency.as_millis().min(u128::from(u64::MAX)) as u64;
                tracing::info!(parent: span, status, latency_ms, "request completed");
            },
        )
        .on_failure(
            |error: ServerErrorsFailureClass, latency: Duration, span: &tracing::Span| {
                let latency_ms = latency.as_millis().min(u128::from(u64::MAX)) as u64;
                tracing::error!(parent: span, latency_ms, error = %error, "request failed");
            },
        );

    if config.cors.enabled {
        let cors_layer = build_cors_layer(&config.cors)?;
        router = router.layer(cors_layer);
    }

    router = router.layer(trace_layer);

    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let make_request_id = MakeRequestUuid;
    router = router
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, make_request_id));

    let state: ApiStateHandle = Arc::new(state);
    Ok(router.layer(AddExtensionLayer::new(state)))
}

fn build_cors_layer(config: &CorsConfig) -> Result<CorsLayer, ServerError> {
    let any_origin =
        config.allow_origins.is_empty() || config.allow_origins.iter().any(|o| o == ANY_ORIGIN);
    if any_origin && config.allow_credentials {
        return Err(ServerError::CorsConfig {
            reason: "allow_credentials requires an explicit allow_origins list".to_string(),
        });
    }

    let allow_origin = if any_origin {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allow_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|err| ServerError::CorsConfig {
                    reason: format!("origin `{origin}` is not a valid header value: {err}"),
                })
            })
            .collect::<Result<_, _>>()?;
        AllowOrigin::list(origins)
    };

    let methods: Vec<Method> = config
        .allow_methods
        .iter()
        .map(|method| {
            Method::from_bytes(method.as_bytes()).map_err(|_| ServerError::CorsConfig {
                reason: format!("method `{method}` is not a valid HTTP method"),
            })
        })
        .collect::<Result<_, _>>()?;

    let allow_headers: Vec<HeaderName> = config
        .allow_headers
        .iter()
        .map(|name| {
            HeaderName::from_bytes(name.as_bytes()).map_err(|err| ServerError::CorsConfig {
                reason: format!("header `{name}` is invalid: {err}"),
            })
        })
        .collect::<Result<_, _>>()?;

    let expose_headers: Vec<HeaderName> = config
        .expose_headers
        .iter()
        .map(|name| {
            HeaderName::from_bytes(name.as_bytes()).map_err(|err| ServerError::CorsConfig {
                reason: format!("expose-header `{name}` is invalid: {err}"),
            })
        })
        .collect::<Result<_, _>>()?;

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::list(methods))
        .allow_credentials(config.allow_credentials)
        .max_age(Duration::from_secs(config.max_age_secs));

    if !allow_headers.is_empty() {
        cors = cors.allow_headers(AllowHeaders::list(allow_headers));
    }

    if !expose_headers.is_empty() {
        cors = cors.expose_headers(ExposeHeaders::list(expose_headers));
    }

    Ok(cors)
}

async fn classic_transform(
    Extension(state): Extension<ApiStateHandle>,
    Path(text): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<String, ApiError> {
    let names = expand_csv(
        params
            .into_iter()
            .filter(|(key, _)| key == TRANSFORMS_PARAM)
            .map(|(_, value)| value)
            .collect(),
    );
    tracing::debug!(%text, transforms = ?names, "classic transform request");

    let pipeline = state.resolve_or_default(names)?;
    Ok(pipeline.apply(&text))
}

async fn formatted_transform(
    Extension(state): Extension<ApiStateHandle>,
    payload: Result<Json<TransformRequest>, JsonRejection>,
) -> Result<Json<TransformResponse>, ApiError> {
    let Json(request) = payload?;
    tracing::debug!(text = %request.text, transforms = ?request.transforms, "formatted transform request");

    // An explicit empty list is the identity pipeline; only a missing list falls back
    let pipeline = match request.transforms {
        Some(names) => Pipeline::resolve(names)?,
        None => state.defaults().clone(),
    };

    Ok(Json(TransformResponse {
        transformed_text: pipeline.apply(&request.text),
    }))
}

async fn healthz() -> impl IntoResponse {
    Json(HealthzResponse {
        status: HEALTHZ_STATUS,
    })
}

async fn method_not_allowed_handler(request: Request<Body>) -> axum::response::Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let request_id = header_request_id(request.headers());
    ApiError::method_not_allowed(&method, &path)
        .with_request_id(request_id.as_deref())
        .into_response()
}

async fn not_found_handler(request: Request<Body>) -> axum::response::Response {
    let path = request.uri().path().to_string();
    let request_id = header_request_id(request.headers());
    ApiError::resource_not_found(&path)
        .with_request_id(request_id.as_deref())
        .into_response()
}

fn matched_path_or_uri<B>(request: &Request<B>) -> String {
    if let Some(path) = request.extensions().get::<MatchedPath>() {
        return path.as_str().to_string();
    }
    request.uri().path().to_string()
}

fn header_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string())
}

async fn wait_for_shutdown() -> ShutdownEvent {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => ShutdownEvent::CtrlC,
            Err(error) => {
                tracing::warn!(%error, "failed to capture Ctrl+C signal");
                ShutdownEvent::ListenerFailed
            }
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => match term.recv().await {
                Some(_) => ShutdownEvent::SigTerm,
                None => ShutdownEvent::ListenerFailed,
            },
            Err(error) => {
                tracing::warn!(%error, "failed to capture SIGTERM");
                ShutdownEvent::ListenerFailed
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending();

    tokio::select! {
        event = ctrl_c => event,
        event = sigterm => event,
    }
}

fn parse_listen_addr(addr: &str) -> Result<SocketAddr, ServerError> {
    let trimmed = addr.trim();
    if trimmed.is_empty() {
        return Err(ServerError::EmptyListenAddr);
    }

    trimmed
        .parse()
        .map_err(|source| ServerError::InvalidListenAddr {
            address: trimmed.to_string(),
            source,
        })
}

async fn bind_listener(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            address: addr.to_string(),
            source,
        })
}

fn broadcast_shutdown(
    sender: watch::Sender<ShutdownEvent>,
) -> impl Future<Output = ()> + Send + 'static {
    async move {
        let event = wait_for_shutdown().await;
        debug_assert!(event != ShutdownEvent::Pending);
        if let Err(error) = sender.send(event) {
            tracing::warn!(?event, %error, "failed to broadcast shutdown event");
        }
    }
}

fn drain_timeout_future(
    mut receiver: watch::Receiver<ShutdownEvent>,
) -> impl Future<Output = ()> + Send + 'static {
    async move {
        if receiver.changed().await.is_ok() {
            let event = *receiver.borrow_and_update();
            tracing::info!(?event, "shutdown signal received; draining connections");
            tokio::time::sleep(DRAIN_TIMEOUT).await;
            tracing::warn!(
                ?event,
                seconds = DRAIN_TIMEOUT.as_secs(),
                "graceful shutdown timed out; continuing shutdown"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_csv_splits_commas() {
        let values = vec!["lower, capitalize".to_string(), ",latex,".to_string()];
        assert_eq!(expand_csv(values), vec!["lower", "capitalize", "latex"]);
        assert!(expand_csv(vec![String::new()]).is_empty());
    }

    #[test]
    fn parse_listen_addr_rejects_empty_and_garbage() {
        assert!(matches!(
            parse_listen_addr("   "),
            Err(ServerError::EmptyListenAddr)
        ));
        assert!(matches!(
            parse_listen_addr("localhost"),
            Err(ServerError::InvalidListenAddr { .. })
        ));
        let addr = parse_listen_addr(" 127.0.0.1:8080 ").expect("valid address");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn api_state_rejects_unknown_default() {
        let error = ApiState::new(["upper", "bogus"]).expect_err("unknown default must fail");
        match error {
            ServerError::DefaultTransforms { source } => {
                assert_eq!(source.transformation_name(), Some("bogus"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn api_state_default_is_upper() {
        let state = ApiState::default();
        assert_eq!(state.defaults().names(), vec!["upper"]);
    }

    #[test]
    fn api_state_default_matches_default_transforms() {
        let resolved = ApiState::new(textforge_core::DEFAULT_TRANSFORMS)
            .expect("default transformations resolve");
        assert_eq!(ApiState::default().defaults(), resolved.defaults());
    }

    #[test]
    fn unknown_transformation_maps_to_bad_request() {
        let api = ApiError::from(textforge_core::Error::unknown_transformation("nope"));
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.body.error, "unknown transformation `nope`");
        assert_eq!(api.body.transformation.as_deref(), Some("nope"));
    }

    #[test]
    fn cors_credentials_require_explicit_origins() {
        let cors = CorsConfig {
            enabled: true,
            allow_credentials: true,
            ..CorsConfig::default()
        };
        assert!(matches!(
            build_cors_layer(&cors),
            Err(ServerError::CorsConfig { .. })
        ));
    }

    #[test]
    fn cors_rejects_invalid_method() {
        let cors = CorsConfig {
            enabled: true,
            allow_methods: vec!["GE T".to_string()],
            ..CorsConfig::default()
        };
        assert!(build_cors_layer(&cors).is_err());
    }
}
