//! Resource specifications: the render-time parameters attached to an identity.
//!
//! A spec describes *what* a resource renders as, not *when*; ordering is the
//! graph's concern. Structural equality of specs is the criterion for both
//! idempotent re-declaration within a unit and deduplication across merged
//! units, so the variants deliberately carry plain owned data and derive
//! [`PartialEq`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Render-time parameters for one declared resource.
///
/// Serialized with an external variant tag, which keeps the persisted form
/// self-describing and lets new variants be added without renumbering.
///
/// # Examples
///
/// ```rust
/// use asset_graph::core::ResourceSpec;
///
/// let single = ResourceSpec::single("scripts/core.js");
/// let bundle = ResourceSpec::with_subpaths(
///     "https://cdn.example.com/ui",
///     ["grid.js", "grid-theme.css"],
/// );
/// assert_ne!(single, bundle);
/// assert_eq!(single, ResourceSpec::single("scripts/core.js"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceSpec {
    /// One path string.
    ///
    /// At render time the path is matched against the host's embedded-file
    /// table; when nothing matches it is used verbatim as an absolute URL.
    /// The graph itself never touches the filesystem.
    SinglePath {
        /// Declared path or absolute URL.
        path: String,
    },

    /// A base path plus an ordered sequence of subpaths.
    ///
    /// Each subpath yields one render unit, emitted in declared order. The
    /// whole group participates in the graph as a single node: the resolver
    /// may move the node relative to unrelated resources but never reorders
    /// the subpaths within it.
    WithSubpaths {
        /// Base URL or path the subpaths are joined onto.
        base: String,
        /// Relative subpaths, in render order.
        subpaths: Vec<String>,
    },

    /// An opaque render capability.
    ///
    /// The graph treats this as a black box: no path resolution, no override
    /// lookup. `renderer` names the host-side renderer by its fully-qualified
    /// identity; the host's renderer registry does the rest.
    Custom {
        /// Fully-qualified name of the host renderer.
        renderer: String,
    },
}

impl ResourceSpec {
    /// Spec for a single declared path.
    pub fn single(path: impl Into<String>) -> Self {
        Self::SinglePath {
            path: path.into(),
        }
    }

    /// Spec for a base path with ordered subpaths.
    pub fn with_subpaths<I, S>(base: impl Into<String>, subpaths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::WithSubpaths {
            base: base.into(),
            subpaths: subpaths.into_iter().map(Into::into).collect(),
        }
    }

    /// Spec for an opaque custom renderer.
    pub fn custom(renderer: impl Into<String>) -> Self {
        Self::Custom {
            renderer: renderer.into(),
        }
    }

    /// Number of render units this spec expands to.
    #[must_use]
    pub fn render_unit_count(&self) -> usize {
        match self {
            Self::SinglePath {
                ..
            }
            | Self::Custom {
                ..
            } => 1,
            Self::WithSubpaths {
                subpaths, ..
            } => subpaths.len(),
        }
    }
}

impl fmt::Display for ResourceSpec {
    /// Short one-line description used by diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SinglePath {
                path,
            } => write!(f, "path '{path}'"),
            Self::WithSubpaths {
                base,
                subpaths,
            } => {
                write!(f, "base '{base}' with {} subpath(s)", subpaths.len())
            }
            Self::Custom {
                renderer,
            } => write!(f, "custom renderer '{renderer}'"),
        }
    }
}
