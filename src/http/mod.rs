//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup)
//!     → request.rs (add request ID, percent-decode path)
//!     → deployment::Container (select context, resolve servlet)
//!     → response.rs (echo servlet name, mapping headers)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{decode_path, RequestId, RequestIdExt, X_REQUEST_ID};
pub use server::{build_router, HttpServer};
