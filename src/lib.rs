//! asset-graph - static dependency resolution for client asset resources
//!
//! Web applications built from independently compiled units (component
//! libraries, application assemblies, plugins) each declare the client-side
//! assets their components need: scripts, stylesheets, themes, custom
//! inline markup. This crate turns those declarations into a process-wide
//! dependency graph and answers, per page render, the only question that
//! matters at runtime: which assets must be emitted, in what order.
//!
//! # Architecture Overview
//!
//! The pipeline has a compile-time half and a runtime half:
//!
//! 1. **Build**: while compiling a unit, the host front-end feeds every
//!    declaration to a [`graph::GraphBuilder`]. Declarations are validated
//!    eagerly (conflicting duplicates, edges to undeclared identities) and
//!    sealed into an immutable [`graph::UnitGraph`].
//! 2. **Persist**: the unit graph is saved next to the unit's build output
//!    as a versioned TOML file and travels with it ([`graph::UnitGraph::save`]).
//! 3. **Merge**: at application start, every deployed unit's graph is loaded
//!    once and folded into a [`merge::MergedGraph`]. Identities are global;
//!    equal re-declarations collapse, conflicting ones are settled by a
//!    [`merge::MergePolicy`] and reported, never fatal.
//! 4. **Resolve**: per page render, [`resolver::resolve`] walks the merged
//!    graph from the page's requirer roots and returns the minimal required
//!    set in a deterministic, dependency-first order. Cycles are broken
//!    deterministically and reported; resolution never fails the page.
//! 5. **Plan**: [`render::plan`] maps the ordered identities to concrete
//!    render targets, consulting the host's embedded-asset table,
//!    configuration overrides, and cache-busting policy through narrow
//!    traits.
//!
//! The merged graph is built once, single-threaded, before the first
//! request, and is strictly read-only afterwards; any number of concurrent
//! `resolve` calls may share it without locking.
//!
//! # Core Modules
//!
//! - [`core`] - identities, resource specs, and the error taxonomy
//! - [`diagnostics`] - non-fatal findings reported by merge and resolve
//! - [`graph`] - per-unit graph construction and persistence
//! - [`merge`] - folding unit graphs into the process-wide graph
//! - [`resolver`] - minimal-set computation and deterministic ordering
//! - [`render`] - collaborator traits and render-target planning
//! - [`utils`] - file system helpers
//!
//! # Example
//!
//! ```rust
//! use asset_graph::core::{RequirerId, ResourceId, ResourceSpec};
//! use asset_graph::graph::GraphBuilder;
//! use asset_graph::merge::Merger;
//! use asset_graph::render::{RenderContext, plan};
//! use asset_graph::resolver::resolve;
//!
//! # fn main() -> anyhow::Result<()> {
//! // Build time, inside the widget library's compilation:
//! let mut builder = GraphBuilder::new("acme-widgets");
//! builder.declare(ResourceId::new("Acme.Core"), ResourceSpec::single("core.js"))?;
//! builder.declare(ResourceId::new("Acme.Grid"), ResourceSpec::single("grid.js"))?;
//! builder.add_dependency(ResourceId::new("Acme.Grid"), ResourceId::new("Acme.Core"))?;
//! builder.add_requirement(RequirerId::new("Acme.Pages.Dashboard"), ResourceId::new("Acme.Grid"))?;
//! let (unit, _) = builder.build();
//!
//! // Process start:
//! let mut merger = Merger::new();
//! merger.add_unit(&unit);
//! let (merged, _) = merger.finish();
//!
//! // Page render:
//! let resolution = resolve(&[RequirerId::new("Acme.Pages.Dashboard")], &merged);
//! let units = plan(&resolution, &merged, &RenderContext::bare());
//! assert_eq!(units.len(), 2); // core.js before grid.js
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod diagnostics;
pub mod graph;
pub mod merge;
pub mod render;
pub mod resolver;
pub mod utils;
