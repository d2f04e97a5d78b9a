//! Non-fatal diagnostics for graph construction, merge, and resolution.
//!
//! A diagnostic reports a condition the developer should fix but the system
//! can live with: a duplicate declaration resolved by policy, a cross-unit
//! spec conflict resolved by policy, a dependency cycle broken at resolve
//! time. Diagnostics travel on the value path (builder output, merged graph,
//! resolution) so callers decide where they end up: build log, debug page,
//! telemetry. Nothing in this module can fail a page render.

use std::fmt;

use crate::core::{ResourceId, ResourceSpec};

/// A non-fatal condition observed while building, merging, or resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// One unit declared the same identity twice with conflicting specs and
    /// the duplicate policy kept the first declaration.
    DuplicateIdentity {
        /// The re-declared identity.
        id: ResourceId,
        /// The spec that was kept (the first declaration).
        kept: ResourceSpec,
        /// The conflicting spec that was ignored.
        ignored: ResourceSpec,
    },

    /// Two merged units declared the same identity with conflicting specs and
    /// the merge policy picked a winner.
    ///
    /// This is the expected shape of the "library declares a default, the
    /// application overrides it" configuration, which is why it is a
    /// diagnostic rather than an error.
    MergeConflict {
        /// The identity declared by both units.
        id: ResourceId,
        /// The spec that won under the merge policy.
        kept: ResourceSpec,
        /// The spec that lost.
        discarded: ResourceSpec,
        /// Name of the unit whose spec won.
        winning_unit: String,
        /// Name of the unit whose spec lost.
        losing_unit: String,
    },

    /// A dependency cycle was found during resolution and broken at the edge
    /// that closed it.
    ///
    /// The members are listed in traversal order starting at the node the
    /// back-edge returned to. Every member still appears exactly once in the
    /// resolved output; only the closing edge's ordering constraint is
    /// dropped.
    CyclicDependency {
        /// The resources participating in the cycle, in traversal order.
        members: Vec<ResourceId>,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateIdentity {
                id,
                kept,
                ignored,
            } => {
                write!(
                    f,
                    "duplicate declaration of '{id}': kept {kept}, ignored {ignored}"
                )
            }
            Self::MergeConflict {
                id,
                kept,
                discarded,
                winning_unit,
                losing_unit,
            } => {
                write!(
                    f,
                    "conflicting specs for '{id}': kept {kept} from unit '{winning_unit}', \
                     discarded {discarded} from unit '{losing_unit}'"
                )
            }
            Self::CyclicDependency {
                members,
            } => {
                let mut path =
                    members.iter().map(ToString::to_string).collect::<Vec<_>>().join(" → ");
                if let Some(first) = members.first() {
                    path.push_str(" → ");
                    path.push_str(first.as_str());
                }
                write!(f, "cyclic dependency broken: {path}")
            }
        }
    }
}
