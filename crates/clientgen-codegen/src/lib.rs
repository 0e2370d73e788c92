//! Version-aware client SDK generation.
//!
//! Renders a Spring Cloud Feign client (models, API interfaces, a
//! properties class, header helpers and integration tests) for one target
//! application version, choosing between incompatible code shapes through
//! capability flags instead of per-version template copies.
//!
//! # Architecture
//!
//! - [`template`]: fragment templates with `#%` conditional directives,
//!   parsed and checked once into a [`TemplateLibrary`]
//! - [`resolver`]: keeps the conditional blocks a flag set selects and
//!   renders the survivors against [`Bindings`]
//! - [`assembly`]: resolves every fragment of a client, checks that they
//!   agree, and groups them into a [`ResolvedUnit`]
//! - [`run`]: the generation lifecycle and the shared [`Generator`]
//!
//! # Examples
//!
//! ```
//! use clientgen_codegen::{FileRole, Generator};
//! use clientgen_core::{ApiDescription, ClientSettings};
//!
//! let generator = Generator::builtin().unwrap();
//! let unit = generator
//!     .run("modern-5", &ApiDescription::default(), &ClientSettings::default())
//!     .unwrap();
//! assert!(unit.file("ApiClientProperties").is_some());
//! assert!(unit.text(FileRole::Support).contains("class HeaderUtil"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod assembly;
pub mod bindings;
pub mod common;
pub mod headers;
pub mod properties;
pub mod resolver;
pub mod run;
pub mod template;
pub mod template_engine;

pub use assembly::{ClientAssembler, ExceptionFamily, Fingerprint, ResolvedParts, ResolvedUnit};
pub use bindings::Bindings;
pub use common::{FileRole, RenderedFile};
pub use resolver::{FragmentResolver, ResolvedFragment, Selections};
pub use run::{GenerationRun, Generator, RunOutcome, RunState};
pub use template::{
    ConditionalBlock, FragmentScope, FragmentTemplate, LiteralText, Requirement, Segment,
    TemplateLibrary, TemplateLibraryBuilder,
};
