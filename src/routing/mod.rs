//! Servlet path-mapping subsystem.
//!
//! # Data Flow
//! ```text
//! Table Compilation (at deployment):
//!     (url-pattern, handler)[]
//!     → matcher.rs (classify: exact / prefix / extension / default / context root)
//!     → router.rs (reject duplicates, partition, sort prefixes by length)
//!     → Freeze as immutable MappingTable
//!
//! Incoming request path (decoded, no query, context path stripped)
//!     → router.rs (exact → context root → longest prefix → extension → default)
//!     → Return: PathMatch or NoMatch
//! ```
//!
//! # Design Decisions
//! - Tables compiled once, immutable at runtime
//! - No regex in hot path (prefix/suffix/equality only)
//! - Deterministic: same input always matches same entry
//! - Precedence is by rule family, never by registration order

pub mod error;
pub mod matcher;
pub mod router;

pub use error::MappingError;
pub use matcher::{MatchKind, Pattern};
pub use router::{MappingEntry, MappingTable, MappingTableBuilder, PathMatch, Resolution};
