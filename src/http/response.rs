//! Responses of the reference dispatcher.
//!
//! The echo servlet answers with its own name, which is what the path-mapping
//! integration tests assert on. Mapping details travel in headers.

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::deployment::ServletMatch;

pub const X_SERVLET_PATH: &str = "x-servlet-path";
pub const X_PATH_INFO: &str = "x-path-info";
pub const X_MATCH_KIND: &str = "x-match-kind";

pub fn servlet_response(m: &ServletMatch) -> Response {
    let mut response = (StatusCode::OK, m.servlet.clone()).into_response();
    let headers = response.headers_mut();

    if let Ok(value) = HeaderValue::from_str(&m.servlet_path) {
        headers.insert(X_SERVLET_PATH, value);
    }
    if let Some(value) = m.path_info.as_deref().and_then(|p| HeaderValue::from_str(p).ok()) {
        headers.insert(X_PATH_INFO, value);
    }
    headers.insert(X_MATCH_KIND, HeaderValue::from_static(m.kind.as_str()));
    response
}

pub fn bad_request() -> Response {
    (StatusCode::BAD_REQUEST, "Malformed request path").into_response()
}

pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "No servlet mapped for path").into_response()
}

pub fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Path mapping failed").into_response()
}
