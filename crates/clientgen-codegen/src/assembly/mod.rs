//! Client Assembly.
//!
//! Resolves every fragment a client needs and joins the results into one
//! [`ResolvedUnit`]:
//!
//! - unit-scoped fragments (properties, test utilities, header helpers)
//!   once per client,
//! - Model fragments once per entity referenced by an operation, closed
//!   over `ref` fields,
//! - Operation and Test fragments once per entity that owns operations,
//!   with operation-scoped fragments repeated for every emitted operation.
//!
//! Assembly runs in two steps so a driver can observe them separately:
//! [`ClientAssembler::resolve_entities`] renders all fragments (entities in
//! parallel with the `parallel` feature) and [`ClientAssembler::finish`]
//! runs the consistency check and groups fragments into files.

pub mod consistency;
pub mod context;
pub mod unit;

pub use consistency::{ExceptionFamily, Fingerprint};
pub use unit::ResolvedUnit;

use crate::Bindings;
use crate::common::java::to_pascal_case;
use crate::common::{FileRole, RenderedFile};
use crate::resolver::{FragmentResolver, ResolvedFragment};
use crate::template::{FragmentScope, TemplateLibrary};
use clientgen_core::{
    ApiDescription, CapabilityFlag, ClientSettings, EntitySchema, Error, OperationSpec, Result,
    TargetVersion, validate_identifier,
};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Fragments of one unit, resolved but not yet checked.
#[derive(Debug, Clone)]
pub struct ResolvedParts {
    parts: Vec<(ResolvedFragment, Option<String>)>,
    has_operations: bool,
}

impl ResolvedParts {
    /// Returns the number of resolved fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns `true` if nothing was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Iterates the resolved fragments in resolution order.
    pub fn fragments(&self) -> impl Iterator<Item = &ResolvedFragment> {
        self.parts.iter().map(|(fragment, _)| fragment)
    }
}

/// Entity with the operations emitted for it.
#[derive(Debug)]
struct EntityJob<'a> {
    schema: &'a EntitySchema,
    owns_operations: bool,
    operations: Vec<&'a OperationSpec>,
}

/// Composes resolved fragments into a [`ResolvedUnit`].
#[derive(Debug, Clone, Copy)]
pub struct ClientAssembler<'a> {
    library: &'a TemplateLibrary,
}

impl<'a> ClientAssembler<'a> {
    /// Creates an assembler over a loaded library.
    #[must_use]
    pub const fn new(library: &'a TemplateLibrary) -> Self {
        Self { library }
    }

    /// Resolves and checks a complete unit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] for invalid settings or IR
    /// references, and any error of [`ClientAssembler::resolve_entities`] or
    /// [`ClientAssembler::finish`].
    pub fn assemble(
        &self,
        api: &ApiDescription,
        target: &TargetVersion,
        settings: &ClientSettings,
    ) -> Result<ResolvedUnit> {
        let parts = self.resolve_entities(api, target, settings)?;
        self.finish(target, parts)
    }

    /// Renders every fragment of the unit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] if the settings are invalid or the
    /// IR references an unknown entity, [`Error::MissingBinding`] or
    /// [`Error::AmbiguousConditional`] from the resolver.
    pub fn resolve_entities(
        &self,
        api: &ApiDescription,
        target: &TargetVersion,
        settings: &ClientSettings,
    ) -> Result<ResolvedParts> {
        settings.validate()?;
        let jobs = plan(api, target)?;
        let unit = context::unit_bindings(target, settings);
        let resolver = FragmentResolver::new(self.library.engine());

        let mut parts = Vec::new();
        for role in FileRole::ALL {
            for fragment in self.library.fragments_for(role) {
                if fragment.scope == FragmentScope::Unit {
                    let resolved = resolver.resolve_fragment(fragment, target.flags(), &unit)?;
                    parts.push((resolved, None));
                }
            }
        }

        #[cfg(feature = "parallel")]
        let resolved: Vec<Result<Vec<ResolvedFragment>>> = jobs
            .par_iter()
            .map(|job| self.resolve_entity(job, target, &unit))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let resolved: Vec<Result<Vec<ResolvedFragment>>> = jobs
            .iter()
            .map(|job| self.resolve_entity(job, target, &unit))
            .collect();

        for (job, fragments) in jobs.iter().zip(resolved) {
            let entity = to_pascal_case(&job.schema.name);
            parts.extend(fragments?.into_iter().map(|f| (f, Some(entity.clone()))));
        }

        debug!(
            target = %target.id(),
            entities = jobs.len(),
            fragments = parts.len(),
            "Resolved unit fragments"
        );
        Ok(ResolvedParts {
            parts,
            has_operations: jobs.iter().any(|job| !job.operations.is_empty()),
        })
    }

    /// Checks consistency and groups fragments into files.
    ///
    /// Fragments naming the same artifact within a role are concatenated in
    /// resolution order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InconsistentUnit`] if the fragments disagree; no
    /// unit is produced in that case.
    pub fn finish(&self, target: &TargetVersion, parts: ResolvedParts) -> Result<ResolvedUnit> {
        let fragments: Vec<ResolvedFragment> = parts.fragments().cloned().collect();
        let fingerprint = consistency::verify_unit(target, &fragments, parts.has_operations)?;

        let mut ordered = parts.parts;
        ordered.sort_by_key(|(fragment, _)| fragment.role);

        let mut files: Vec<RenderedFile> = Vec::new();
        let mut index: HashMap<(FileRole, String), usize> = HashMap::new();
        for (fragment, entity) in ordered {
            match index.entry((fragment.role, fragment.artifact.clone())) {
                Entry::Occupied(slot) => files[*slot.get()].content.push_str(&fragment.text),
                Entry::Vacant(slot) => {
                    slot.insert(files.len());
                    files.push(RenderedFile {
                        role: fragment.role,
                        name: fragment.artifact,
                        entity,
                        content: fragment.text,
                    });
                }
            }
        }

        info!(
            target = %target.id(),
            files = files.len(),
            fingerprint = %fingerprint,
            "Assembled client unit"
        );
        Ok(ResolvedUnit::new(target.clone(), files, fingerprint))
    }

    fn resolve_entity(
        &self,
        job: &EntityJob<'_>,
        target: &TargetVersion,
        unit: &Bindings,
    ) -> Result<Vec<ResolvedFragment>> {
        let resolver = FragmentResolver::new(self.library.engine());
        let bindings = unit.overlay(&context::entity_bindings(job.schema, &job.operations));
        let mut out = Vec::new();

        for role in FileRole::ALL {
            if role != FileRole::Model && !job.owns_operations {
                continue;
            }
            for fragment in self.library.fragments_for(role) {
                if fragment.scope == FragmentScope::Unit {
                    continue;
                }
                if let Some(missing) = fragment
                    .requires
                    .iter()
                    .find(|r| !context::requirement_met(**r, job.schema, &job.operations))
                {
                    warn!(
                        entity = %job.schema.name,
                        fragment = %fragment.qualified_name(),
                        requirement = %missing,
                        "Skipping fragment: entity does not meet requirement"
                    );
                    continue;
                }

                if fragment.scope == FragmentScope::Operation {
                    for op in &job.operations {
                        let mut op_bindings = context::operation_bindings(op);
                        if let Some(action) = fragment.for_action {
                            let Some(extra) = context::action_bindings(action, job.schema, op)
                            else {
                                continue;
                            };
                            op_bindings = op_bindings.overlay(&extra);
                        }
                        let bindings = bindings.overlay(&op_bindings);
                        out.push(resolver.resolve_fragment(fragment, target.flags(), &bindings)?);
                    }
                } else {
                    out.push(resolver.resolve_fragment(fragment, target.flags(), &bindings)?);
                }
            }
        }

        Ok(out)
    }
}

fn unknown_entity(field: String, name: &str) -> Error {
    Error::ValidationError {
        field,
        reason: format!("references unknown entity '{name}'"),
    }
}

/// Picks the entities of a unit and the operations emitted for each.
fn plan<'a>(api: &'a ApiDescription, target: &TargetVersion) -> Result<Vec<EntityJob<'a>>> {
    let mut wanted: HashSet<&str> = HashSet::new();
    let mut pending: Vec<&str> = Vec::new();

    for (i, op) in api.operations.iter().enumerate() {
        if api.entity(&op.entity).is_none() {
            return Err(unknown_entity(format!("operations[{i}].entity"), &op.entity));
        }
        pending.push(&op.entity);

        let signature = op
            .parameters
            .iter()
            .map(|p| &p.schema)
            .chain(op.returns.as_ref());
        for schema in signature {
            if let Some(name) = schema.referenced_entity() {
                if api.entity(name).is_none() {
                    return Err(unknown_entity(format!("operations[{i}]"), name));
                }
                pending.push(name);
            }
        }
    }

    while let Some(name) = pending.pop() {
        if !wanted.insert(name) {
            continue;
        }
        let Some(schema) = api.entity(name) else {
            continue;
        };
        validate_identifier("entities.name", &to_pascal_case(&schema.name))?;
        for field in &schema.fields {
            if let Some(target_name) = field.schema.referenced_entity() {
                if api.entity(target_name).is_none() {
                    return Err(unknown_entity(
                        format!("entities.{}.{}", schema.name, field.name),
                        target_name,
                    ));
                }
                pending.push(target_name);
            }
        }
    }

    let jobs = api
        .entities
        .iter()
        .filter(|schema| wanted.contains(schema.name.as_str()))
        .map(|schema| {
            let owned: Vec<&OperationSpec> = api.operations_for(&schema.name).collect();
            EntityJob {
                schema,
                owns_operations: !owned.is_empty(),
                operations: owned
                    .into_iter()
                    .filter(|op| emitted(op, target))
                    .collect(),
            }
        })
        .collect();
    Ok(jobs)
}

fn emitted(op: &OperationSpec, target: &TargetVersion) -> bool {
    if op.is_multipart() && !target.has(CapabilityFlag::MultipartUploadSupported) {
        warn!(
            operation = %op.name,
            target = %target.id(),
            "Skipping multipart operation: target does not support multipart upload"
        );
        return false;
    }
    true
}
