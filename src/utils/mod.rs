//! Shared utilities.
//!
//! # Modules
//!
//! - [`fs`] - File system operations with atomic writes

pub mod fs;
