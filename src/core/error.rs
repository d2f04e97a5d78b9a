//! Error handling for the asset graph.
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`AssetGraphError`]) for precise handling in
//!    the build front-end that drives declaration scanning.
//! 2. **User-friendly reporting** ([`ErrorContext`]) with actionable
//!    suggestions, since build-time graph errors are ultimately read by the
//!    developer who wrote the declaration.
//!
//! Only build-time and load-time failures are errors. Resolve-time conditions
//! (cycles, conflicting merged specs) are deliberately *not* represented here:
//! they degrade to best-effort output plus a [`Diagnostic`], because a broken
//! resource list must never prevent a page from rendering.
//!
//! [`Diagnostic`]: crate::diagnostics::Diagnostic

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use super::identity::ResourceId;

/// Errors surfaced while building or loading dependency graphs.
///
/// # Error Categories
///
/// - **Declaration**: [`DuplicateIdentity`], [`UnknownIdentity`], raised by
///   the per-unit builder while the front-end registers declarations.
/// - **Graph files**: [`GraphFileParse`], [`GraphFileVersion`],
///   [`GraphFileInvalid`], raised when loading a serialized unit graph.
/// - **I/O**: [`Io`], a wrapped [`std::io::Error`] from the file boundary.
///
/// [`DuplicateIdentity`]: AssetGraphError::DuplicateIdentity
/// [`UnknownIdentity`]: AssetGraphError::UnknownIdentity
/// [`GraphFileParse`]: AssetGraphError::GraphFileParse
/// [`GraphFileVersion`]: AssetGraphError::GraphFileVersion
/// [`GraphFileInvalid`]: AssetGraphError::GraphFileInvalid
/// [`Io`]: AssetGraphError::Io
#[derive(Error, Debug)]
pub enum AssetGraphError {
    /// The same identity was declared twice with conflicting specs in one
    /// compilation unit.
    ///
    /// Re-declaring an identity with a structurally equal spec is idempotent
    /// and never an error. This variant is returned only under
    /// [`DuplicatePolicy::Fail`]; the default policy keeps the first spec and
    /// records a diagnostic instead.
    ///
    /// [`DuplicatePolicy::Fail`]: crate::graph::DuplicatePolicy::Fail
    #[error("resource '{id}' declared twice with conflicting specs")]
    DuplicateIdentity {
        /// The identity that was re-declared.
        id: ResourceId,
    },

    /// An edge references a resource identity that was never declared.
    ///
    /// This is fatal to the build: it means a requirement or dependency names
    /// a resource the declaring unit cannot see, which is a broken reference
    /// in the host program.
    #[error("unknown resource '{id}' referenced by {referenced_by}")]
    UnknownIdentity {
        /// The undeclared identity the edge points at.
        id: ResourceId,
        /// What referenced it, e.g. `dependency edge from 'Acme.Grid'`.
        referenced_by: String,
    },

    /// A graph file exists but its contents could not be parsed.
    #[error("invalid graph file syntax in {file}")]
    GraphFileParse {
        /// Path to the file that failed to parse.
        file: String,
        /// Parser output explaining the failure.
        reason: String,
    },

    /// A graph file was written by a newer format revision than this build
    /// understands.
    #[error("graph file {file} uses format version {found}, but only {supported} is supported")]
    GraphFileVersion {
        /// Path to the offending file.
        file: String,
        /// Version recorded in the file.
        found: u32,
        /// The newest version this build can read.
        supported: u32,
    },

    /// A graph file parsed but is structurally inconsistent, e.g. an edge
    /// index outside the resource table or a duplicated identity row.
    #[error("corrupt graph file {file}: {reason}")]
    GraphFileInvalid {
        /// Path to the offending file.
        file: String,
        /// What was inconsistent.
        reason: String,
    },

    /// An I/O error from reading or writing a graph file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Wraps an [`AssetGraphError`] with user-facing guidance.
///
/// Build front-ends print these to the developer whose declarations produced
/// the error. The suggestion is the actionable part; details explain why the
/// condition matters.
///
/// # Examples
///
/// ```rust
/// use asset_graph::core::{AssetGraphError, ErrorContext, ResourceId};
///
/// let context = ErrorContext::new(AssetGraphError::UnknownIdentity {
///     id: ResourceId::new("Acme.Web.Assets.Grid"),
///     referenced_by: "requirement from 'Acme.Web.Pages.Home'".to_string(),
/// })
/// .with_suggestion("declare the resource before adding edges that target it")
/// .with_details("edges may only reference resources visible to the declaring unit");
///
/// let message = context.to_string();
/// assert!(message.contains("Suggestion"));
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error.
    pub error: AssetGraphError,
    /// Optional actionable suggestion for resolving the error.
    pub suggestion: Option<String>,
    /// Optional additional details about the error.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with no suggestion or details yet.
    #[must_use]
    pub const fn new(error: AssetGraphError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add an actionable suggestion, shown in green on terminals.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add explanatory details, shown in yellow on terminals.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details, and suggestion to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Attach default guidance to an error, based on its variant.
///
/// Used by build front-ends that want consistent suggestions without writing
/// them at every call site.
#[must_use]
pub fn contextualize(error: AssetGraphError) -> ErrorContext {
    match &error {
        AssetGraphError::DuplicateIdentity {
            id,
        } => {
            let leaf = id.leaf().to_string();
            ErrorContext::new(error)
                .with_details(
                    "an identity maps to exactly one spec within a compilation unit; \
                     re-declaring with an equal spec is allowed",
                )
                .with_suggestion(format!(
                    "rename one of the conflicting '{leaf}' declarations, or make their specs equal"
                ))
        }
        AssetGraphError::UnknownIdentity {
            ..
        } => ErrorContext::new(error)
            .with_details("edges may only reference resources declared in the same unit")
            .with_suggestion("declare the resource before adding edges that target it"),
        AssetGraphError::GraphFileVersion {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("update this library to a release that understands the newer format"),
        AssetGraphError::GraphFileParse {
            ..
        }
        | AssetGraphError::GraphFileInvalid {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("regenerate the graph file by rebuilding the unit that produced it"),
        AssetGraphError::Io(_) => ErrorContext::new(error),
    }
}
