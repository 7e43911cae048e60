//! Shared fixtures for integration tests.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use tower::ServiceExt;

use servlet_router::config::{ContainerConfig, DeploymentConfig, ServletConfig};
use servlet_router::deployment::Container;
use servlet_router::http::build_router;

/// Servlets named after their own mapping, mounted at `/servletContext`.
pub fn servlet_context() -> DeploymentConfig {
    DeploymentConfig {
        name: "servletContext.war".into(),
        context_path: "/servletContext".into(),
        servlets: vec![
            ServletConfig::new("/a/*", &["/a/*"]),
            ServletConfig::new("/aa", &["/aa"]),
            ServletConfig::new("/aa/*", &["/aa/*"]),
            ServletConfig::new("/a/b/*", &["/a/b/*"]),
            ServletConfig::new("/", &["/"]),
            ServletConfig::new("contextRoot", &[""]),
        ],
    }
}

pub fn container_config(deployments: Vec<DeploymentConfig>) -> ContainerConfig {
    ContainerConfig {
        deployments,
        ..ContainerConfig::default()
    }
}

pub fn router_for(container: Arc<Container>) -> Router {
    build_router(container, Duration::from_secs(5))
}

/// Send a GET through the router and return status, headers and body text.
pub async fn get(app: &Router, uri: &str) -> (StatusCode, Response<()>, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let status = parts.status;
    (
        status,
        Response::from_parts(parts, ()),
        String::from_utf8(bytes.to_vec()).unwrap(),
    )
}
