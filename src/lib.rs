//! Servlet path-mapping resolver and reference servlet container front end.

pub mod config;
pub mod deployment;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::ContainerConfig;
pub use deployment::{Container, Deployment};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{MappingTable, MappingTableBuilder, Pattern, Resolution};
