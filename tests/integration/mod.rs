//! Integration test suite for asset-graph
//!
//! End-to-end tests that exercise the public API the way a host framework
//! would: building unit graphs at compile time, persisting them, merging at
//! process start, resolving per page render, and planning render output.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! Tests are organized by functionality area:
//! - **lifecycle**: full build, save, load, merge, resolve, plan pipeline
//! - **merging**: cross-unit deduplication and conflict policies
//! - **ordering**: minimality, completeness, ordering, and determinism
//! - **persistence**: graph file round-trips and format validation
//! - **rendering**: collaborator traits and render-target planning

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

// Integration tests
mod lifecycle;
mod persistence;
mod rendering;
