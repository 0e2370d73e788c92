//! Command implementations.
//!
//! Each command has an `execute` function returning a serializable report
//! and a `run` function that prints it and picks the exit code.

pub mod common;
pub mod generate;
pub mod versions;
