//! Requirement resolution over the merged asset graph.
//!
//! Resolution answers one question for a rendering pass: given the requirers
//! active on the current page, which resources must be emitted, and in what
//! order? The answer is the minimal reachable set (nothing unrequired is
//! ever emitted) in a dependency-first topological order, computed by a
//! depth-first walk from the requirer roots.
//!
//! Resolution never fails the caller. A cyclic declaration cannot be ordered
//! strictly, so the resolver drops the edge that closes the cycle, reports
//! the cycle as a [`Diagnostic::CyclicDependency`], and keeps going. The
//! page still renders; the broken ordering is the declarer's bug to fix.
//!
//! # Determinism
//!
//! For the same merged graph and the same roots in the same order, the
//! output order is identical across runs and platforms:
//!
//! - roots are walked in caller order,
//! - each requirer's resources are walked in declaration order,
//! - each resource's dependencies are walked in declaration order,
//! - a shared resource is emitted once, at its first discovery,
//! - the edge dropped to break a cycle is always the first back edge the
//!   walk encounters.
//!
//! No step iterates a hash map, so there is no hidden order to vary.

use std::collections::HashMap;

use crate::core::{RequirerId, ResourceId};
use crate::diagnostics::Diagnostic;
use crate::merge::MergedGraph;

/// Visit states for the depth-first walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Currently on the walk stack.
    Gray,
    /// Fully emitted.
    Black,
}

/// Outcome of a resolution pass: the emission order plus any diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    /// Resources to emit, dependencies strictly before their dependents
    /// (except where a reported cycle made that impossible).
    pub order: Vec<ResourceId>,
    /// Cycles broken during the walk.
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    /// Whether nothing needs to be emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of resources to emit.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether `id` is part of the emission set.
    #[must_use]
    pub fn contains(&self, id: &ResourceId) -> bool {
        self.order.iter().any(|r| r == id)
    }
}

/// Resolve the requirements of `roots` against the merged graph.
///
/// Returns the minimal set of resources reachable from the roots, ordered so
/// every dependency precedes its dependents. A root with no recorded
/// requirements contributes nothing; that is normal for program units that
/// never declared any and is only logged at debug level.
///
/// # Examples
///
/// ```rust
/// use asset_graph::core::{RequirerId, ResourceId, ResourceSpec};
/// use asset_graph::graph::GraphBuilder;
/// use asset_graph::merge::Merger;
/// use asset_graph::resolver::resolve;
///
/// # fn main() -> anyhow::Result<()> {
/// let mut builder = GraphBuilder::new("widgets");
/// builder.declare(ResourceId::new("Core"), ResourceSpec::single("core.js"))?;
/// builder.declare(ResourceId::new("Grid"), ResourceSpec::single("grid.js"))?;
/// builder.add_dependency(ResourceId::new("Grid"), ResourceId::new("Core"))?;
/// builder.add_requirement(RequirerId::new("Dashboard"), ResourceId::new("Grid"))?;
///
/// let mut merger = Merger::new();
/// merger.add_unit(&builder.build().0);
/// let (merged, _) = merger.finish();
///
/// let resolution = resolve(&[RequirerId::new("Dashboard")], &merged);
/// assert_eq!(resolution.order, [ResourceId::new("Core"), ResourceId::new("Grid")]);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn resolve(roots: &[RequirerId], graph: &MergedGraph) -> Resolution {
    let mut walk = Walk {
        graph,
        colors: HashMap::new(),
        path: Vec::new(),
        order: Vec::new(),
        diagnostics: Vec::new(),
    };

    for root in roots {
        if !graph.has_requirer(root) {
            tracing::debug!(requirer = %root, "root has no recorded requirements");
            continue;
        }
        for resource in graph.requirements_of(root) {
            walk.visit(&resource);
        }
    }

    tracing::debug!(
        roots = roots.len(),
        resources = walk.order.len(),
        cycles = walk.diagnostics.len(),
        "resolved requirements"
    );

    Resolution {
        order: walk.order,
        diagnostics: walk.diagnostics,
    }
}

struct Walk<'a> {
    graph: &'a MergedGraph,
    colors: HashMap<ResourceId, Color>,
    path: Vec<ResourceId>,
    order: Vec<ResourceId>,
    diagnostics: Vec<Diagnostic>,
}

impl Walk<'_> {
    fn visit(&mut self, resource: &ResourceId) {
        match self.colors.get(resource) {
            Some(Color::Black) => return,
            Some(Color::Gray) => {
                // The edge we just followed closes a cycle. Drop it, report
                // the members, and let the walk continue without it.
                self.report_cycle(resource);
                return;
            }
            None => {}
        }

        self.colors.insert(resource.clone(), Color::Gray);
        self.path.push(resource.clone());

        for dependency in self.graph.dependencies_of(resource) {
            self.visit(&dependency);
        }

        self.path.pop();
        self.colors.insert(resource.clone(), Color::Black);
        self.order.push(resource.clone());
    }

    fn report_cycle(&mut self, reentered: &ResourceId) {
        let Some(start) = self.path.iter().position(|r| r == reentered) else {
            return;
        };
        let members = self.path[start..].to_vec();
        tracing::warn!(
            cycle = %members
                .iter()
                .map(ResourceId::as_str)
                .collect::<Vec<_>>()
                .join(" -> "),
            "breaking cyclic dependency"
        );
        self.diagnostics.push(Diagnostic::CyclicDependency {
            members,
        });
    }
}
