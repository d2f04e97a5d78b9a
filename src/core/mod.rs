//! Core types for the asset graph.
//!
//! This module is the foundation of the crate's type system: identities,
//! resource specifications, and error handling. Everything else (the
//! per-unit builder, the merger, the resolver, render planning) is expressed
//! in terms of these types.
//!
//! # Overview
//!
//! - [`ResourceId`] / [`RequirerId`]: opaque fully-qualified identities.
//!   Resources are the renderable declarations; requirers are the program
//!   units that need them. Both use the documented textual key format
//!   (dot-separated namespaces, `+` for nested containers).
//! - [`ResourceSpec`]: the render-time parameters attached to a resource,
//!   either a single path, a base path with ordered subpaths, or an opaque
//!   custom renderer. Structural equality of specs drives deduplication.
//! - [`AssetGraphError`] / [`ErrorContext`]: typed build/load errors plus
//!   user-facing guidance for the developer reading build output.
//!
//! # Design Principles
//!
//! - **Errors only where the build can act on them.** Declaration and graph
//!   file problems are typed errors; everything a live page render could hit
//!   degrades to diagnostics instead (see [`crate::diagnostics`]).
//! - **Identity is textual and stable.** Identities compare by their full
//!   name, never by declaration site, which is what lets independently
//!   compiled units agree on a resource.

pub mod error;
pub mod identity;
pub mod spec;

pub use error::{contextualize, AssetGraphError, ErrorContext};
pub use identity::{RequirerId, ResourceId};
pub use spec::ResourceSpec;
