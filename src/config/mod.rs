//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, url-pattern syntax)
//!     → ContainerConfig (validated, immutable)
//!     → deployment::Container builds one MappingTable per deployment
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → Container::reload swaps each deployment's table atomically
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ContainerConfig, DeploymentConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    ServletConfig, TimeoutConfig,
};
