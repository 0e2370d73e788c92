//! Generation runs and their lifecycle.
//!
//! A [`GenerationRun`] drives one target version through
//! `Idle → MatrixLoaded → ResolvingEntities → Assembling → Done`. Any error
//! moves the run to `Failed`; no partial unit is ever returned. A run
//! executes once.
//!
//! [`Generator`] owns the shared, read-only matrix and template library and
//! starts runs against them. Independent runs share nothing mutable, so
//! [`Generator::run_many`] executes them concurrently.
//!
//! # Examples
//!
//! ```
//! use clientgen_codegen::{Generator, RunState};
//! use clientgen_core::{ApiDescription, ClientSettings};
//!
//! let generator = Generator::builtin().unwrap();
//! let api = ApiDescription::default();
//! let settings = ClientSettings::default();
//!
//! let mut run = generator.start("modern-5");
//! let unit = run.execute(&api, &settings).unwrap();
//! assert_eq!(run.state(), RunState::Done);
//! assert_eq!(unit.target().id(), "modern-5");
//! ```

use crate::assembly::{ClientAssembler, ResolvedUnit};
use crate::template::TemplateLibrary;
use clientgen_core::{ApiDescription, ClientSettings, Error, FeatureMatrix, Result};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Lifecycle state of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunState {
    /// Created, not yet executed
    Idle,
    /// Target version looked up
    MatrixLoaded,
    /// Fragments being resolved
    ResolvingEntities,
    /// Consistency check and file grouping
    Assembling,
    /// Unit produced
    Done,
    /// Aborted by an error
    Failed,
}

impl RunState {
    /// Returns the kebab-case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::MatrixLoaded => "matrix-loaded",
            Self::ResolvingEntities => "resolving-entities",
            Self::Assembling => "assembling",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns `true` for `Done` and `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One execution of the generator for one target version.
#[derive(Debug)]
pub struct GenerationRun<'a> {
    version: String,
    matrix: &'a FeatureMatrix,
    library: &'a TemplateLibrary,
    state: RunState,
    trail: Vec<RunState>,
}

impl<'a> GenerationRun<'a> {
    /// Creates an idle run.
    #[must_use]
    pub fn new(
        matrix: &'a FeatureMatrix,
        library: &'a TemplateLibrary,
        version: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            matrix,
            library,
            state: RunState::Idle,
            trail: vec![RunState::Idle],
        }
    }

    /// Returns the requested target version id.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Returns every state the run has been in, oldest first.
    #[must_use]
    pub fn trail(&self) -> &[RunState] {
        &self.trail
    }

    /// Executes the run to completion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the run already executed. Any other
    /// error aborts the run, leaving it in [`RunState::Failed`].
    pub fn execute(
        &mut self,
        api: &ApiDescription,
        settings: &ClientSettings,
    ) -> Result<ResolvedUnit> {
        if self.state != RunState::Idle {
            return Err(Error::InvalidState {
                message: format!(
                    "run for '{}' cannot execute from state {}",
                    self.version, self.state
                ),
            });
        }

        match self.drive(api, settings) {
            Ok(unit) => {
                self.transition(RunState::Done);
                Ok(unit)
            }
            Err(e) => {
                error!(version = %self.version, state = %self.state, error = %e, "Generation run failed");
                self.transition(RunState::Failed);
                Err(e)
            }
        }
    }

    fn drive(&mut self, api: &ApiDescription, settings: &ClientSettings) -> Result<ResolvedUnit> {
        let target = self.matrix.target(&self.version)?.clone();
        self.transition(RunState::MatrixLoaded);

        let assembler = ClientAssembler::new(self.library);
        self.transition(RunState::ResolvingEntities);
        let parts = assembler.resolve_entities(api, &target, settings)?;

        self.transition(RunState::Assembling);
        assembler.finish(&target, parts)
    }

    fn transition(&mut self, next: RunState) {
        debug!(version = %self.version, from = %self.state, to = %next, "Run state transition");
        self.state = next;
        self.trail.push(next);
    }
}

/// Result of one run started by [`Generator::run_many`].
#[derive(Debug)]
pub struct RunOutcome {
    /// Requested target version id
    pub version: String,
    /// Produced unit or the error that aborted the run
    pub result: Result<ResolvedUnit>,
}

/// Shared entry point for generation runs.
///
/// Cloning is cheap; clones share the matrix and library.
#[derive(Debug, Clone)]
pub struct Generator {
    matrix: Arc<FeatureMatrix>,
    library: Arc<TemplateLibrary>,
}

impl Generator {
    /// Creates a generator over a matrix and a template library.
    #[must_use]
    pub const fn new(matrix: Arc<FeatureMatrix>, library: Arc<TemplateLibrary>) -> Self {
        Self { matrix, library }
    }

    /// Creates a generator over the built-in matrix and templates.
    ///
    /// # Errors
    ///
    /// Returns an error if either built-in resource fails to load.
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(
            Arc::new(FeatureMatrix::builtin()?),
            Arc::new(TemplateLibrary::builtin()?),
        ))
    }

    /// Returns the feature matrix.
    #[must_use]
    pub fn matrix(&self) -> &FeatureMatrix {
        &self.matrix
    }

    /// Returns the template library.
    #[must_use]
    pub fn library(&self) -> &TemplateLibrary {
        &self.library
    }

    /// Starts an idle run for a target version.
    #[must_use]
    pub fn start(&self, version: &str) -> GenerationRun<'_> {
        GenerationRun::new(&self.matrix, &self.library, version)
    }

    /// Generates the client for one target version.
    ///
    /// # Errors
    ///
    /// Returns the error that aborted the run.
    pub fn run(
        &self,
        version: &str,
        api: &ApiDescription,
        settings: &ClientSettings,
    ) -> Result<ResolvedUnit> {
        info!(version, entities = api.entities.len(), operations = api.operations.len(), "Generating client");
        self.start(version).execute(api, settings)
    }

    /// Generates clients for several target versions.
    ///
    /// Outcomes are returned in the order of `versions`; one failing run does
    /// not affect the others.
    pub fn run_many<S>(
        &self,
        versions: &[S],
        api: &ApiDescription,
        settings: &ClientSettings,
    ) -> Vec<RunOutcome>
    where
        S: AsRef<str> + Sync,
    {
        let outcome = |version: &S| RunOutcome {
            version: version.as_ref().to_string(),
            result: self.run(version.as_ref(), api, settings),
        };

        #[cfg(feature = "parallel")]
        let outcomes = versions.par_iter().map(outcome).collect();

        #[cfg(not(feature = "parallel"))]
        let outcomes = versions.iter().map(outcome).collect();

        outcomes
    }
}
