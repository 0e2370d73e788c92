//! Core types, feature matrix, and errors for client SDK generation.
//!
//! This crate provides the foundational types used across the generator
//! workspace.
//!
//! # Architecture
//!
//! The core consists of:
//! - Capability flags and their mutual-exclusion groups
//! - Target versions and the read-only feature matrix
//! - The normalized API description handed over by the OpenAPI parser
//! - Naming parameters and auth defaults for generated clients
//! - Error hierarchy with contextual information

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod auth;
mod config;
mod error;
mod version;

pub mod api;
pub mod flags;
pub mod matrix;

pub use api::{
    ApiDescription, CrudAction, EntitySchema, ErrorResponse, FieldSpec, FieldType, HttpVerb,
    OperationSpec, ParameterLocation, ParameterSpec,
};
pub use auth::AuthConfig;
pub use config::{ClientSettings, validate_identifier};
pub use error::{Error, Result};
pub use flags::{CapabilityFlag, ExclusiveGroup, FlagSet};
pub use matrix::{FeatureMatrix, FeatureMatrixBuilder, MatrixRow};
pub use version::TargetVersion;
