//! Identity types for resources and requirers.
//!
//! Both identities are opaque, globally unique keys. Their textual form is a
//! fully-qualified name: dot-separated namespace segments, with `+` separating
//! nested container names (e.g. `Acme.Web.Assets+TreeView.Styles`). The crate
//! never interprets that structure beyond the helpers here; the format matters
//! to hosts because it is the lookup key for configuration overrides.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one declared resource.
///
/// A `ResourceId` is stable across compilation units: two units declaring the
/// same fully-qualified name refer to the same resource, which is what makes
/// merge-time deduplication possible. Equality and hashing are on the full
/// textual name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Create an identity from its fully-qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The full textual name, exactly as declared.
    ///
    /// This is the key hosts use for configuration override lookup.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last segment of the name, after the final `.` or `+`.
    ///
    /// Used in diagnostics where the full name would drown the message.
    #[must_use]
    pub fn leaf(&self) -> &str {
        match self.0.rfind(['.', '+']) {
            Some(pos) => &self.0[pos + 1..],
            None => &self.0,
        }
    }

    /// Everything before the last segment, or `None` for a bare name.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.0.rfind(['.', '+']).map(|pos| &self.0[..pos])
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ResourceId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Identity of a declarable unit that can carry requirement edges.
///
/// A requirer is a type, member, module, or whole assembly in the host
/// language: anything the declaration front-end allows to say "I need these
/// resources". Requirers are never rendered and need no prior declaration;
/// an unknown requirer at resolve time simply has no requirements.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirerId(String);

impl RequirerId {
    /// Create an identity from its fully-qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The full textual name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequirerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequirerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for RequirerId {
    fn from(name: String) -> Self {
        Self(name)
    }
}
