//! Request logging middleware
//!
//! HTTP request spans and latency logging on top of `tower_http::trace`.

use std::time::Duration;

use axum::http::{Request, Response};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{MakeSpan, OnResponse, TraceLayer};
use tracing::{info, warn, Span};
use crate::utils::helpers::generate_compact_id;

/// Opens one span per request tagged with a short request id
#[derive(Clone, Debug, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = &generate_compact_id()[..12];
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

/// Logs status and latency; 5xx responses are logged as warnings
#[derive(Clone, Debug, Default)]
pub struct ResponseLogger;

impl<B> OnResponse<B> for ResponseLogger {
    fn on_response(self, response: &Response<B>, latency: Duration, _span: &Span) {
        let status = response.status().as_u16();
        let latency_ms = latency.as_millis() as u64;

        if response.status().is_server_error() {
            warn!(status = status, latency_ms = latency_ms, "Request failed");
        } else {
            info!(status = status, latency_ms = latency_ms, "Request completed");
        }
    }
}

pub type HttpTraceLayer = TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan, tower_http::trace::DefaultOnRequest, ResponseLogger>;

/// Tracing layer used by the router
pub fn trace_layer() -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_response(ResponseLogger)
}
