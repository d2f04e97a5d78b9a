//! Per-unit graph construction.
//!
//! A [`GraphBuilder`] accumulates one compilation unit's declarations while
//! the host front-end scans that unit's requirement annotations, then seals
//! them into an immutable [`UnitGraph`]. The builder validates eagerly:
//! conflicting re-declarations and edges to undeclared resources are caught
//! here, at build time, where the developer can still fix them. It never
//! checks for cycles, though: a cycle can span units that compile
//! independently, so cycle handling belongs to resolution.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::registry::{InsertOutcome, SpecTable};
use crate::core::{AssetGraphError, RequirerId, ResourceId, ResourceSpec};
use crate::diagnostics::Diagnostic;

/// What to do when one unit declares the same identity twice with
/// conflicting specs.
///
/// Equal re-declarations are always idempotent and never consult the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Keep the first declaration, record a [`Diagnostic::DuplicateIdentity`],
    /// and let the build continue. The default.
    #[default]
    WarnKeepFirst,
    /// Fail the build with [`AssetGraphError::DuplicateIdentity`].
    Fail,
}

/// Options controlling per-unit graph construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Policy for conflicting re-declarations within the unit.
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

/// Accumulates one compilation unit's resource declarations and edges.
///
/// # Examples
///
/// ```rust
/// use asset_graph::core::{RequirerId, ResourceId, ResourceSpec};
/// use asset_graph::graph::GraphBuilder;
///
/// # fn main() -> Result<(), asset_graph::core::AssetGraphError> {
/// let mut builder = GraphBuilder::new("widgets");
///
/// let grid = ResourceId::new("Acme.Widgets.Grid");
/// let core = ResourceId::new("Acme.Widgets.Core");
/// builder.declare(core.clone(), ResourceSpec::single("scripts/core.js"))?;
/// builder.declare(grid.clone(), ResourceSpec::single("scripts/grid.js"))?;
///
/// // The grid script needs the core script rendered first.
/// builder.add_dependency(grid.clone(), core)?;
/// // The dashboard page type uses the grid.
/// builder.add_requirement(RequirerId::new("Acme.Pages.Dashboard"), grid)?;
///
/// let (unit, diagnostics) = builder.build();
/// assert_eq!(unit.resources().len(), 2);
/// assert!(diagnostics.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GraphBuilder {
    unit: String,
    options: BuildOptions,
    resources: SpecTable,
    requirements: Vec<(RequirerId, ResourceId)>,
    dependencies: Vec<(ResourceId, ResourceId)>,
    requirement_seen: HashSet<(RequirerId, ResourceId)>,
    dependency_seen: HashSet<(ResourceId, ResourceId)>,
    diagnostics: Vec<Diagnostic>,
}

impl GraphBuilder {
    /// Create a builder for the named compilation unit with default options.
    pub fn new(unit: impl Into<String>) -> Self {
        Self::with_options(unit, BuildOptions::default())
    }

    /// Create a builder with explicit options.
    pub fn with_options(unit: impl Into<String>, options: BuildOptions) -> Self {
        Self {
            unit: unit.into(),
            options,
            resources: SpecTable::new(),
            requirements: Vec::new(),
            dependencies: Vec::new(),
            requirement_seen: HashSet::new(),
            dependency_seen: HashSet::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Register a resource declaration.
    ///
    /// Re-declaring an identity with a structurally equal spec is idempotent.
    /// A conflicting re-declaration follows [`DuplicatePolicy`]: under
    /// [`WarnKeepFirst`] the first spec is kept and a diagnostic recorded,
    /// under [`Fail`] the call returns
    /// [`AssetGraphError::DuplicateIdentity`].
    ///
    /// [`WarnKeepFirst`]: DuplicatePolicy::WarnKeepFirst
    /// [`Fail`]: DuplicatePolicy::Fail
    pub fn declare(
        &mut self,
        id: ResourceId,
        spec: ResourceSpec,
    ) -> Result<(), AssetGraphError> {
        match self.resources.insert(id.clone(), spec.clone()) {
            InsertOutcome::Inserted | InsertOutcome::Identical => Ok(()),
            InsertOutcome::Conflict => match self.options.duplicates {
                DuplicatePolicy::Fail => Err(AssetGraphError::DuplicateIdentity {
                    id,
                }),
                DuplicatePolicy::WarnKeepFirst => {
                    let kept = self
                        .resources
                        .get(&id)
                        .cloned()
                        .unwrap_or_else(|| spec.clone());
                    tracing::warn!(
                        unit = %self.unit,
                        resource = %id,
                        "duplicate declaration with conflicting spec; keeping the first"
                    );
                    self.diagnostics.push(Diagnostic::DuplicateIdentity {
                        id,
                        kept,
                        ignored: spec,
                    });
                    Ok(())
                }
            },
        }
    }

    /// Add a requirement edge: `requirer` needs `resource`.
    ///
    /// Requirers need no prior declaration (any program unit may carry
    /// requirements), but the resource must already be declared in this
    /// unit. Duplicate edges collapse silently.
    pub fn add_requirement(
        &mut self,
        requirer: RequirerId,
        resource: ResourceId,
    ) -> Result<(), AssetGraphError> {
        if !self.resources.contains(&resource) {
            return Err(AssetGraphError::UnknownIdentity {
                id: resource,
                referenced_by: format!("requirement from '{requirer}'"),
            });
        }
        if self.requirement_seen.insert((requirer.clone(), resource.clone())) {
            self.requirements.push((requirer, resource));
        }
        Ok(())
    }

    /// Add a dependency edge: `dependent` needs `dependency`, so the
    /// dependency renders strictly before the dependent.
    ///
    /// Both endpoints must already be declared in this unit. A unit that
    /// depends on another unit's resource declares that foreign resource too
    /// (with the spec it can see); the merge step collapses the copies.
    /// Duplicate edges collapse silently. Cycles are not checked here.
    pub fn add_dependency(
        &mut self,
        dependent: ResourceId,
        dependency: ResourceId,
    ) -> Result<(), AssetGraphError> {
        if !self.resources.contains(&dependent) {
            return Err(AssetGraphError::UnknownIdentity {
                id: dependent,
                referenced_by: format!("dependency edge to '{dependency}'"),
            });
        }
        if !self.resources.contains(&dependency) {
            return Err(AssetGraphError::UnknownIdentity {
                id: dependency,
                referenced_by: format!("dependency edge from '{dependent}'"),
            });
        }
        if self.dependency_seen.insert((dependent.clone(), dependency.clone())) {
            self.dependencies.push((dependent, dependency));
        }
        Ok(())
    }

    /// Diagnostics recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Seal the accumulated declarations into an immutable [`UnitGraph`],
    /// yielding the diagnostics recorded along the way.
    pub fn build(self) -> (UnitGraph, Vec<Diagnostic>) {
        tracing::debug!(
            unit = %self.unit,
            resources = self.resources.len(),
            requirements = self.requirements.len(),
            dependencies = self.dependencies.len(),
            "sealed unit graph"
        );
        (
            UnitGraph {
                unit: self.unit,
                resources: self.resources,
                requirements: self.requirements,
                dependencies: self.dependencies,
            },
            self.diagnostics,
        )
    }
}

/// One compilation unit's declarations, sealed and immutable.
///
/// Built once at compile time, persisted alongside the unit (see
/// [`load`]/[`save`]), and merged with every other loaded unit at process
/// start. Equality compares units structurally (same name, same specs, same
/// edges in the same declaration order), which is exactly the persistence
/// round-trip contract.
///
/// [`load`]: UnitGraph::load
/// [`save`]: UnitGraph::save
#[derive(Debug, Clone, PartialEq)]
pub struct UnitGraph {
    pub(crate) unit: String,
    pub(crate) resources: SpecTable,
    pub(crate) requirements: Vec<(RequirerId, ResourceId)>,
    pub(crate) dependencies: Vec<(ResourceId, ResourceId)>,
}

impl UnitGraph {
    /// Name of the compilation unit this graph was built from.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// The declared resources, in declaration order.
    #[must_use]
    pub fn resources(&self) -> &SpecTable {
        &self.resources
    }

    /// Requirement edges (`requirer` needs `resource`), in declaration order.
    #[must_use]
    pub fn requirements(&self) -> &[(RequirerId, ResourceId)] {
        &self.requirements
    }

    /// Dependency edges (`dependent` needs `dependency`), in declaration
    /// order.
    #[must_use]
    pub fn dependencies(&self) -> &[(ResourceId, ResourceId)] {
        &self.dependencies
    }

    /// Whether the unit declared nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.requirements.is_empty() && self.dependencies.is_empty()
    }
}
