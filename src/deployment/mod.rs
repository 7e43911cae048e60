//! Deployment subsystem.
//!
//! # Data Flow
//! ```text
//! ContainerConfig.deployments[]
//!     → context.rs (one MappingTable per deployment, behind ArcSwap)
//!     → container.rs (ordered by context path length)
//!
//! Incoming request path
//!     → container.rs select (longest context path, strip it)
//!     → context.rs resolve (mapping table lookup)
//!     → ServletMatch or NoMatch
//! ```
//!
//! # Design Decisions
//! - Each deployment owns exactly one table; no process-wide registry
//! - Reload builds new tables first, then swaps; never mutates in place
//! - Adding or removing deployments requires a restart

pub mod container;
pub mod context;
pub mod error;

pub use container::{apply_updates, Container};
pub use context::{build_table, Deployment, ServletMatch, ServletTable};
pub use error::DeploymentError;
