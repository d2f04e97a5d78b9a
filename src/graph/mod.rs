//! Per-unit dependency graph construction and persistence.
//!
//! This module covers the compile-time half of the pipeline: a host
//! front-end walks one compilation unit's resource annotations, feeds them
//! to a [`GraphBuilder`], and persists the sealed [`UnitGraph`] beside the
//! unit's build output. The runtime half (merging units and resolving
//! requirements) lives in [`crate::merge`] and [`crate::resolver`].
//!
//! # Lifecycle
//!
//! 1. [`GraphBuilder::declare`] registers each resource declaration.
//! 2. [`GraphBuilder::add_requirement`] / [`GraphBuilder::add_dependency`]
//!    record the unit's edges, validated against the declarations.
//! 3. [`GraphBuilder::build`] seals the unit into an immutable [`UnitGraph`].
//! 4. [`UnitGraph::save`] / [`UnitGraph::load`] round-trip the graph through
//!    a versioned TOML file.

pub mod builder;
pub mod registry;

mod io;

pub use builder::{BuildOptions, DuplicatePolicy, GraphBuilder, UnitGraph};
pub use registry::{InsertOutcome, SpecTable};
