//! Common code shared by the resolver and client assembly.
//!
//! Contains output types and Java naming utilities.

pub mod java;
pub mod types;

// Re-export common types
pub use types::{FileRole, RenderedFile};
