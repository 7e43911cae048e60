//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check deployment names and context paths are unique and well-formed
//! - Check every url-pattern is well-formed and not mapped twice
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ContainerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::{ContainerConfig, DeploymentConfig};
use crate::routing::{MappingError, Pattern};

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid listener bind address {0:?}")]
    InvalidBindAddress(String),

    #[error("deployment name must not be empty")]
    EmptyDeploymentName,

    #[error("deployment {0:?} is defined more than once")]
    DuplicateDeploymentName(String),

    #[error(
        "deployment {deployment:?}: context path {context_path:?} must be empty or start with '/' and not end with '/'"
    )]
    InvalidContextPath { deployment: String, context_path: String },

    #[error("context path {0:?} is used by more than one deployment")]
    DuplicateContextPath(String),

    #[error("deployment {deployment:?}: servlet {servlet:?} is defined more than once")]
    DuplicateServletName { deployment: String, servlet: String },

    #[error("deployment {deployment:?}, servlet {servlet:?}: {error}")]
    Mapping { deployment: String, servlet: String, error: MappingError },
}

/// Validate the whole configuration, collecting every problem found.
pub fn validate_config(config: &ContainerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let mut names = HashSet::new();
    let mut context_paths = HashSet::new();
    for deployment in &config.deployments {
        if deployment.name.is_empty() {
            errors.push(ValidationError::EmptyDeploymentName);
        } else if !names.insert(deployment.name.as_str()) {
            errors.push(ValidationError::DuplicateDeploymentName(deployment.name.clone()));
        }

        if !is_valid_context_path(&deployment.context_path) {
            errors.push(ValidationError::InvalidContextPath {
                deployment: deployment.name.clone(),
                context_path: deployment.context_path.clone(),
            });
        } else if !context_paths.insert(deployment.context_path.as_str()) {
            errors.push(ValidationError::DuplicateContextPath(
                deployment.context_path.clone(),
            ));
        }

        validate_deployment(deployment, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_deployment(deployment: &DeploymentConfig, errors: &mut Vec<ValidationError>) {
    let mut servlets = HashSet::new();
    let mut patterns = HashSet::new();

    for servlet in &deployment.servlets {
        if !servlets.insert(servlet.name.as_str()) {
            errors.push(ValidationError::DuplicateServletName {
                deployment: deployment.name.clone(),
                servlet: servlet.name.clone(),
            });
        }

        for raw in &servlet.mappings {
            let error = match Pattern::parse(raw) {
                Err(e) => e,
                Ok(_) if !patterns.insert(raw.as_str()) => MappingError::DuplicatePattern {
                    pattern: raw.clone(),
                },
                Ok(_) => continue,
            };
            errors.push(ValidationError::Mapping {
                deployment: deployment.name.clone(),
                servlet: servlet.name.clone(),
                error,
            });
        }
    }
}

/// `""` (root context) or `/name...` without a trailing slash.
pub fn is_valid_context_path(path: &str) -> bool {
    path.is_empty() || (path.starts_with('/') && !path.ends_with('/') && !path.contains('*'))
}
