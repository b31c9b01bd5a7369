use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info_span, Span};

use crate::handlers::{
    create_url_handler, delete_url_handler, health_handler, login_handler, redirect_handler,
    register_handler,
};
use crate::state::AppState;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Self::router_with_timeout(state, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Builds the router. Requests running longer than `request_timeout` are
    /// dropped with `408 Request Timeout`.
    ///
    /// Every request carries an `x-request-id`, generated unless the client
    /// sent one, which is recorded on its trace span and echoed on the
    /// response.
    pub fn router_with_timeout(state: AppState, request_timeout: Duration) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/url", post(create_url_handler))
            .route("/login", post(login_handler))
            .route("/register", post(register_handler))
            .route(
                "/{alias}",
                get(redirect_handler).delete(delete_url_handler),
            )
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(request_span))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::with_status_code(
                        StatusCode::REQUEST_TIMEOUT,
                        request_timeout,
                    )),
            )
    }
}

fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or_default();

    info_span!(
        "http.request",
        method = %request.method(),
        uri = %request.uri(),
        request_id,
    )
}
