//! rejestr.io API access
//!
//! - **catalog**: the static tool table (path templates, arguments)
//! - **query**: argument validation and URL substitution
//! - **client**: the HTTP client issuing one GET per call

mod catalog;
mod client;
mod query;

pub use catalog::{Arg, HttpMethod, Segment, ToolKind, ToolSpec, KRS_CHAPTERS};
pub use client::{RejestrClient, RAW_BODY_FIELD};
pub use query::RemoteQuery;
