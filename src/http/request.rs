//! Request ID propagation and path decoding.
//!
//! # Responsibilities
//! - Reuse the client's `x-request-id`, or generate a UUID v4
//! - Expose the ID to handlers through request extensions
//! - Echo the ID on the response
//! - Percent-decode the request path before it reaches the mapping tables
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An encoded slash (`%2F`) stays encoded so it never creates a segment

use std::string::FromUtf8Error;

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Correlation ID attached to each request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Read the request ID installed by [`request_id_middleware`].
pub trait RequestIdExt {
    fn request_id(&self) -> &str;
}

impl<B> RequestIdExt for axum::http::Request<B> {
    fn request_id(&self) -> &str {
        self.extensions()
            .get::<RequestId>()
            .map(|id| id.0.as_str())
            .unwrap_or("unknown")
    }
}

pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(id.clone()));
    let mut response = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}

/// Percent-decode a raw URI path, leaving `%2F` / `%2f` untouched.
///
/// Fails when the decoded bytes are not UTF-8.
pub fn decode_path(raw: &str) -> Result<String, FromUtf8Error> {
    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = find_encoded_slash(rest) {
        decoded.push_str(&urlencoding::decode(&rest[..pos])?);
        decoded.push_str(&rest[pos..pos + 3]);
        rest = &rest[pos + 3..];
    }
    decoded.push_str(&urlencoding::decode(rest)?);
    Ok(decoded)
}

fn find_encoded_slash(s: &str) -> Option<usize> {
    s.as_bytes()
        .windows(3)
        .position(|w| w[0] == b'%' && w[1] == b'2' && (w[2] == b'F' || w[2] == b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/servletContext/%61a").unwrap(), "/servletContext/aa");
        assert_eq!(decode_path("/a%20b/c").unwrap(), "/a b/c");
        assert_eq!(decode_path("/caf%C3%A9").unwrap(), "/café");
        assert_eq!(decode_path("/plain/path").unwrap(), "/plain/path");
    }

    #[test]
    fn test_decode_path_keeps_encoded_slash() {
        assert_eq!(decode_path("/a%2Fb").unwrap(), "/a%2Fb");
        assert_eq!(decode_path("/%61%2f%62").unwrap(), "/a%2fb");
        assert_eq!(decode_path("/a%252F").unwrap(), "/a%2F");
    }

    #[test]
    fn test_decode_path_rejects_invalid_utf8() {
        assert!(decode_path("/bad%FF").is_err());
    }
}
