//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the servlet
//! container. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the container.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContainerConfig {
    /// Listener configuration (bind address, limits).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Deployed applications, each with its own url-pattern table.
    pub deployments: Vec<DeploymentConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// One deployed application.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeploymentConfig {
    /// Deployment identifier (e.g., "servletContext.war").
    pub name: String,

    /// Context path the deployment is mounted under; `""` for the root context.
    #[serde(default)]
    pub context_path: String,

    /// Servlets and their url-patterns.
    #[serde(default)]
    pub servlets: Vec<ServletConfig>,
}

/// A servlet and the url-patterns mapped to it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServletConfig {
    /// Servlet name, unique within the deployment.
    pub name: String,

    /// Url-patterns as written in deployment metadata.
    #[serde(default)]
    pub mappings: Vec<String>,
}

impl ServletConfig {
    pub fn new(name: impl Into<String>, mappings: &[&str]) -> Self {
        Self {
            name: name.into(),
            mappings: mappings.iter().map(|m| m.to_string()).collect(),
        }
    }
}
