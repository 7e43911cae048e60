//! Deployment build errors.

use thiserror::Error;

use crate::routing::MappingError;

/// Errors that reject a deployment (or a whole container) at build time.
#[derive(Debug, Error)]
pub enum DeploymentError {
    /// A servlet's url-pattern could not be registered.
    #[error("deployment {deployment:?}, servlet {servlet:?}: {source}")]
    Mapping {
        deployment: String,
        servlet: String,
        #[source]
        source: MappingError,
    },

    #[error("deployment {deployment:?}: invalid context path {context_path:?}")]
    InvalidContextPath {
        deployment: String,
        context_path: String,
    },

    #[error("deployment {0:?} is defined more than once")]
    DuplicateDeployment(String),

    #[error("context path {0:?} is used by more than one deployment")]
    DuplicateContextPath(String),
}
