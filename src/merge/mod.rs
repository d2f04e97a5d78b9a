//! Merging unit graphs into the process-wide asset graph.
//!
//! At application start every deployed compilation unit's graph is loaded and
//! folded into one [`MergedGraph`]. Identities are global, so two units that
//! declare the same resource with equal specs collapse into a single node.
//! Conflicting specs never abort the merge: a [`MergePolicy`] picks the
//! winner and the loser is reported as a [`Diagnostic::MergeConflict`] for
//! the host to log.
//!
//! Merging is deterministic for a fixed unit order: node order is first
//! appearance, edge order is declaration order across units, and policy
//! outcomes depend only on the sequence of [`Merger::add_unit`] calls. Hosts
//! that want stable output across restarts feed units in a stable order
//! (deployment directory sort order works).

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::core::{RequirerId, ResourceId, ResourceSpec};
use crate::diagnostics::Diagnostic;
use crate::graph::{SpecTable, UnitGraph};

/// Which spec wins when two units declare the same identity with
/// conflicting specs.
///
/// Equal specs always collapse silently and never consult the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// The unit merged later wins. The default: a locally deployed unit can
    /// shadow a library's declaration by being loaded after it.
    #[default]
    LastWins,
    /// The unit merged earlier wins.
    FirstWins,
}

/// Options controlling the merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOptions {
    /// Conflict policy for identities declared by more than one unit.
    #[serde(default)]
    pub policy: MergePolicy,
}

/// A node in the merged graph.
///
/// Requirers and resources share one graph: a requirement edge runs from a
/// [`Requirer`] node to a [`Resource`] node, a dependency edge between two
/// [`Resource`] nodes. Keeping both in the same graph lets resolution walk
/// from a requirer root without special-casing the first hop.
///
/// [`Requirer`]: GraphNode::Requirer
/// [`Resource`]: GraphNode::Resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphNode {
    /// A program unit that carries requirements.
    Requirer(RequirerId),
    /// A declared resource.
    Resource(ResourceId),
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requirer(id) => write!(f, "{id}"),
            Self::Resource(id) => write!(f, "{id}"),
        }
    }
}

/// The process-wide asset graph, produced by [`Merger::finish`].
///
/// Immutable once built. Holds every declared resource's spec, the unit that
/// supplied it, and the union of all requirement and dependency edges.
#[derive(Debug, Default)]
pub struct MergedGraph {
    resources: SpecTable,
    /// Unit that supplied the current spec for each resource.
    origins: HashMap<ResourceId, String>,
    graph: DiGraph<GraphNode, ()>,
    node_map: HashMap<GraphNode, NodeIndex>,
}

impl MergedGraph {
    /// All merged resources, in first-appearance order.
    #[must_use]
    pub fn resources(&self) -> &SpecTable {
        &self.resources
    }

    /// The spec merged for `id`, if any unit declared it.
    #[must_use]
    pub fn spec(&self, id: &ResourceId) -> Option<&ResourceSpec> {
        self.resources.get(id)
    }

    /// The unit whose spec won for `id`.
    #[must_use]
    pub fn origin(&self, id: &ResourceId) -> Option<&str> {
        self.origins.get(id).map(String::as_str)
    }

    /// Resources required directly by `requirer`, in declaration order.
    #[must_use]
    pub fn requirements_of(&self, requirer: &RequirerId) -> Vec<ResourceId> {
        self.targets_of_node(&GraphNode::Requirer(requirer.clone()))
    }

    /// Direct dependencies of `resource`, in declaration order.
    #[must_use]
    pub fn dependencies_of(&self, resource: &ResourceId) -> Vec<ResourceId> {
        self.targets_of_node(&GraphNode::Resource(resource.clone()))
    }

    /// Whether any unit recorded a requirement for `requirer`.
    #[must_use]
    pub fn has_requirer(&self, requirer: &RequirerId) -> bool {
        self.node_map.contains_key(&GraphNode::Requirer(requirer.clone()))
    }

    /// Total node count, requirers included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Total edge count across both edge kinds.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether nothing was merged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0 && self.resources.is_empty()
    }

    /// Build a human-readable tree of everything reachable from `root`.
    ///
    /// Repeated nodes are expanded once; a revisit prints a circular
    /// reference marker instead of recursing forever.
    #[must_use]
    pub fn tree_string(&self, root: &RequirerId) -> String {
        let mut result = String::new();
        let mut visited = HashSet::new();
        self.build_tree_string(
            &GraphNode::Requirer(root.clone()),
            &mut result,
            "",
            true,
            &mut visited,
        );
        result
    }

    fn build_tree_string(
        &self,
        node: &GraphNode,
        result: &mut String,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<GraphNode>,
    ) {
        let connector = if is_last {
            "└── "
        } else {
            "├── "
        };
        result.push_str(&format!("{prefix}{connector}{node}\n"));

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };

        if !visited.insert(node.clone()) {
            result.push_str(&format!("{child_prefix}└── (circular reference)\n"));
            return;
        }

        let children = self.targets_of_node(node);
        for (i, child) in children.iter().enumerate() {
            let is_last_child = i == children.len() - 1;
            self.build_tree_string(
                &GraphNode::Resource(child.clone()),
                result,
                &child_prefix,
                is_last_child,
                visited,
            );
        }
    }

    fn targets_of_node(&self, node: &GraphNode) -> Vec<ResourceId> {
        let Some(&index) = self.node_map.get(node) else {
            return Vec::new();
        };
        // petgraph yields neighbors in reverse insertion order; reverse back
        // so callers see declaration order.
        let mut targets: Vec<ResourceId> = self
            .graph
            .neighbors(index)
            .filter_map(|idx| match &self.graph[idx] {
                GraphNode::Resource(id) => Some(id.clone()),
                GraphNode::Requirer(_) => None,
            })
            .collect();
        targets.reverse();
        targets
    }
}

/// Folds unit graphs into a [`MergedGraph`].
///
/// # Examples
///
/// ```rust
/// use asset_graph::core::{RequirerId, ResourceId, ResourceSpec};
/// use asset_graph::graph::GraphBuilder;
/// use asset_graph::merge::Merger;
///
/// # fn main() -> anyhow::Result<()> {
/// let mut builder = GraphBuilder::new("widgets");
/// builder.declare(ResourceId::new("Acme.Core"), ResourceSpec::single("core.js"))?;
/// builder.add_requirement(RequirerId::new("Acme.Pages.Home"), ResourceId::new("Acme.Core"))?;
/// let (unit, _) = builder.build();
///
/// let mut merger = Merger::new();
/// merger.add_unit(&unit);
/// let (merged, diagnostics) = merger.finish();
/// assert_eq!(merged.resources().len(), 1);
/// assert!(diagnostics.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Merger {
    options: MergeOptions,
    merged: MergedGraph,
    diagnostics: Vec<Diagnostic>,
}

impl Merger {
    /// Create a merger with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a merger with explicit options.
    #[must_use]
    pub fn with_options(options: MergeOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Fold one unit's graph into the merge.
    ///
    /// Never fails: spec conflicts are settled by the policy and surfaced as
    /// [`Diagnostic::MergeConflict`]. Re-adding an already merged unit is a
    /// no-op because equal specs collapse and duplicate edges are dropped.
    pub fn add_unit(&mut self, unit: &UnitGraph) {
        for (id, spec) in unit.resources().iter() {
            self.merge_spec(unit.unit(), id, spec);
        }
        for (requirer, resource) in unit.requirements() {
            self.add_edge(
                GraphNode::Requirer(requirer.clone()),
                GraphNode::Resource(resource.clone()),
            );
        }
        for (dependent, dependency) in unit.dependencies() {
            self.add_edge(
                GraphNode::Resource(dependent.clone()),
                GraphNode::Resource(dependency.clone()),
            );
        }
        tracing::debug!(
            unit = %unit.unit(),
            resources = unit.resources().len(),
            "merged unit graph"
        );
    }

    /// Diagnostics recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Seal the merge, yielding the merged graph and all recorded
    /// diagnostics.
    pub fn finish(self) -> (MergedGraph, Vec<Diagnostic>) {
        tracing::debug!(
            resources = self.merged.resources.len(),
            nodes = self.merged.graph.node_count(),
            edges = self.merged.graph.edge_count(),
            "sealed merged graph"
        );
        (self.merged, self.diagnostics)
    }

    fn merge_spec(&mut self, unit: &str, id: &ResourceId, spec: &ResourceSpec) {
        match self.merged.resources.get(id) {
            None => {
                self.merged.resources.replace(id, spec.clone());
                self.merged.origins.insert(id.clone(), unit.to_string());
                self.ensure_node(GraphNode::Resource(id.clone()));
            }
            Some(existing) if existing == spec => {}
            Some(existing) => {
                let existing = existing.clone();
                let prior_unit = self
                    .merged
                    .origins
                    .get(id)
                    .cloned()
                    .unwrap_or_default();
                let diagnostic = match self.options.policy {
                    MergePolicy::LastWins => {
                        self.merged.resources.replace(id, spec.clone());
                        self.merged.origins.insert(id.clone(), unit.to_string());
                        Diagnostic::MergeConflict {
                            id: id.clone(),
                            kept: spec.clone(),
                            discarded: existing,
                            winning_unit: unit.to_string(),
                            losing_unit: prior_unit,
                        }
                    }
                    MergePolicy::FirstWins => Diagnostic::MergeConflict {
                        id: id.clone(),
                        kept: existing,
                        discarded: spec.clone(),
                        winning_unit: prior_unit,
                        losing_unit: unit.to_string(),
                    },
                };
                tracing::warn!(
                    resource = %id,
                    unit = %unit,
                    policy = ?self.options.policy,
                    "conflicting declarations across units"
                );
                self.diagnostics.push(diagnostic);
            }
        }
    }

    fn ensure_node(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(&index) = self.merged.node_map.get(&node) {
            index
        } else {
            let index = self.merged.graph.add_node(node.clone());
            self.merged.node_map.insert(node, index);
            index
        }
    }

    fn add_edge(&mut self, from: GraphNode, to: GraphNode) {
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);

        // Units re-declare shared resources, so the same edge can arrive
        // from several units.
        if !self.merged.graph.contains_edge(from_idx, to_idx) {
            self.merged.graph.add_edge(from_idx, to_idx, ());
        }
    }
}

/// Merge a slice of unit graphs in order with the given options.
pub fn merge_units(units: &[UnitGraph], options: MergeOptions) -> (MergedGraph, Vec<Diagnostic>) {
    let mut merger = Merger::with_options(options);
    for unit in units {
        merger.add_unit(unit);
    }
    merger.finish()
}
