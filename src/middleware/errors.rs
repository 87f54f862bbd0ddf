//! The error boundary.
//!
//! Handlers and extractors turn an [`AppError`] into a response through
//! [`AppError::classify`], which leaves the [`ErrorRecord`] in the response
//! extensions. This middleware picks it up, logs it with the request's
//! context and, in development mode, re-renders the body with the internal
//! detail attached.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use intervue_core::{AppError, ErrorRecord};

use crate::logging::RequestId;
use crate::metrics::{route_label, track_api_error};
use crate::state::AppState;

pub async fn error_boundary(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let route = route_label(&req);
    let request_id = req.extensions().get::<RequestId>().copied();
    let remote_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let mut response = next.run(req).await;

    let Some(record) = response.extensions_mut().remove::<ErrorRecord>() else {
        return response;
    };

    log_error(&record, &method, &path, request_id, remote_addr);
    track_api_error(record.kind.as_str(), &route);

    if state.expose_error_detail() {
        return record.into_response(true);
    }

    response
}

fn log_error(
    record: &ErrorRecord,
    method: &Method,
    path: &str,
    request_id: Option<RequestId>,
    remote_addr: Option<SocketAddr>,
) {
    let request_id = request_id.map(|id| id.to_string()).unwrap_or_default();
    let remote_addr = remote_addr.map(|addr| addr.to_string()).unwrap_or_default();

    if record.operational {
        warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            remote_addr = %remote_addr,
            kind = record.kind.as_str(),
            status = record.status.as_u16(),
            "{}",
            record.message
        );
    } else {
        error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            remote_addr = %remote_addr,
            kind = record.kind.as_str(),
            status = record.status.as_u16(),
            detail = record.detail.as_deref().unwrap_or_default(),
            backtrace = record.backtrace.as_deref().unwrap_or_default(),
            "Unhandled internal error"
        );
    }
}

/// Unmatched routes.
pub async fn fallback(method: Method, uri: axum::http::Uri) -> impl IntoResponse {
    AppError::not_found(format!("Route {method} {} not found", uri.path()))
}

/// Known paths requested with an unsupported method.
pub async fn method_not_allowed(method: Method, uri: axum::http::Uri) -> impl IntoResponse {
    AppError::method_not_allowed(method.as_str(), uri.path())
}
