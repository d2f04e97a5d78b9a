//! Render planning: from a resolved order to concrete render targets.
//!
//! The resolver produces an ordered list of resource identities; this module
//! turns each into the thing a host renderer actually emits. Three external
//! collaborators participate, each behind a narrow trait so hosts plug in
//! their own machinery:
//!
//! - [`EmbeddedLookup`] maps a declared path to a framework-extracted file
//!   and mime type, when the asset ships inside a compiled unit.
//! - [`OverrideLookup`] lets host configuration replace a resource's
//!   computed path with an explicit URL, keyed by the resource's qualified
//!   name. Lookup failures are swallowed here and treated as "no override";
//!   a malformed config entry must not break page rendering.
//! - [`CacheBuster`] appends a query-string suffix to locally served paths
//!   so deployments can invalidate client caches. External and overridden
//!   URLs are never cache-busted.
//!
//! [`plan`] applies them in that precedence (override, then embedding, then
//! verbatim) and expands multi-subpath resources into one render unit per
//! subpath, preserving both the resolved resource order and the declared
//! subpath order.

use anyhow::Result;
use std::collections::HashMap;

use crate::core::{ResourceId, ResourceSpec};
use crate::merge::MergedGraph;
use crate::resolver::Resolution;

/// A framework-embedded asset matched by declared path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedAsset {
    /// Path the asset was extracted to, relative to the served root.
    pub path: String,
    /// Mime type recorded at embedding time.
    pub mime_type: String,
}

/// Resolves declared paths against the host's embedded-file table.
pub trait EmbeddedLookup {
    /// The embedded asset for `path`, or `None` when the path is served
    /// verbatim as an absolute URL.
    fn embedded(&self, path: &str) -> Option<EmbeddedAsset>;
}

/// Host-configuration override lookup.
///
/// Keys are qualified resource names: dot-separated namespaces, with `+`
/// separating nested container names (`Acme.Widgets.Grid+Toolbar`).
pub trait OverrideLookup {
    /// Optional replacement URL for the qualified name.
    ///
    /// Errors are legal here (host config may be malformed) but the caller
    /// swallows them: a failed lookup degrades to "no override".
    fn url_for(&self, qualified_name: &str) -> Result<Option<String>>;
}

/// Appends cache-busting query suffixes to locally served paths.
pub trait CacheBuster {
    /// Query-string suffix for `path` (without the leading `?`), or `None`
    /// to leave the path untouched.
    fn suffix_for(&self, path: &str) -> Option<String>;
}

/// Embedded lookup that matches nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEmbedded;

impl EmbeddedLookup for NoEmbedded {
    fn embedded(&self, _path: &str) -> Option<EmbeddedAsset> {
        None
    }
}

/// Override lookup that overrides nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl OverrideLookup for NoOverrides {
    fn url_for(&self, _qualified_name: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Cache buster that appends nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCacheBust;

impl CacheBuster for NoCacheBust {
    fn suffix_for(&self, _path: &str) -> Option<String> {
        None
    }
}

/// In-memory embedded-file table, mostly useful for hosts with a static
/// asset manifest and for tests.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedTable {
    entries: HashMap<String, EmbeddedAsset>,
}

impl EmbeddedTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a declared path to an extracted file and mime type.
    pub fn insert(
        &mut self,
        declared: impl Into<String>,
        extracted: impl Into<String>,
        mime_type: impl Into<String>,
    ) {
        self.entries.insert(
            declared.into(),
            EmbeddedAsset {
                path: extracted.into(),
                mime_type: mime_type.into(),
            },
        );
    }
}

impl EmbeddedLookup for EmbeddedTable {
    fn embedded(&self, path: &str) -> Option<EmbeddedAsset> {
        self.entries.get(path).cloned()
    }
}

/// Override table parsed from a JSON object of qualified name to URL.
///
/// # Examples
///
/// ```rust
/// use asset_graph::render::{OverrideLookup, StaticOverrides};
///
/// # fn main() -> anyhow::Result<()> {
/// let overrides = StaticOverrides::from_json_str(
///     r#"{"Acme.Widgets.Grid": "https://cdn.example.com/grid.js"}"#,
/// )?;
/// assert_eq!(
///     overrides.url_for("Acme.Widgets.Grid")?.as_deref(),
///     Some("https://cdn.example.com/grid.js")
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticOverrides {
    entries: HashMap<String, String>,
}

impl StaticOverrides {
    /// Parse a JSON object mapping qualified names to replacement URLs.
    pub fn from_json_str(json: &str) -> Result<Self> {
        use anyhow::Context;
        let entries: HashMap<String, String> =
            serde_json::from_str(json).context("Failed to parse override table from JSON")?;
        Ok(Self {
            entries,
        })
    }
}

impl OverrideLookup for StaticOverrides {
    fn url_for(&self, qualified_name: &str) -> Result<Option<String>> {
        Ok(self.entries.get(qualified_name).cloned())
    }
}

/// Cache buster that appends one fixed suffix to every local path.
#[derive(Debug, Clone)]
pub struct StaticCacheBust {
    suffix: String,
}

impl StaticCacheBust {
    /// Use `suffix` (without the leading `?`) for every path.
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl CacheBuster for StaticCacheBust {
    fn suffix_for(&self, _path: &str) -> Option<String> {
        Some(self.suffix.clone())
    }
}

/// The external collaborators a planning pass consults.
pub struct RenderContext<'a> {
    embedded: &'a dyn EmbeddedLookup,
    overrides: &'a dyn OverrideLookup,
    cache_bust: &'a dyn CacheBuster,
}

impl<'a> RenderContext<'a> {
    /// Bundle the three collaborators.
    pub fn new(
        embedded: &'a dyn EmbeddedLookup,
        overrides: &'a dyn OverrideLookup,
        cache_bust: &'a dyn CacheBuster,
    ) -> Self {
        Self {
            embedded,
            overrides,
            cache_bust,
        }
    }

    /// A context with no embedding, no overrides, and no cache busting.
    /// Every path-bearing resource resolves to its declared path verbatim.
    #[must_use]
    pub fn bare() -> RenderContext<'static> {
        RenderContext {
            embedded: &NoEmbedded,
            overrides: &NoOverrides,
            cache_bust: &NoCacheBust,
        }
    }
}

/// Where one render unit's content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    /// Declared path used verbatim as an absolute URL. Never cache-busted.
    ExternalUrl {
        /// The URL to emit.
        url: String,
    },
    /// Host configuration replaced the computed path. Never cache-busted.
    OverrideUrl {
        /// The replacement URL.
        url: String,
    },
    /// Locally served extracted file; cache-bust suffix already applied.
    LocalFile {
        /// Served path, including any cache-bust query suffix.
        path: String,
        /// Mime type recorded at embedding time.
        mime_type: String,
    },
    /// Opaque custom renderer; the host invokes it by qualified name.
    Custom {
        /// Qualified name of the renderer implementation.
        renderer: String,
    },
}

/// One emittable unit: a resource identity plus its resolved target.
///
/// A multi-subpath resource contributes several units that share the same
/// `resource`, in declared subpath order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderUnit {
    /// Identity of the resource this unit belongs to.
    pub resource: ResourceId,
    /// What to emit for it.
    pub target: ResolvedTarget,
}

/// Turn a resolved order into concrete render units.
///
/// Precedence per resource: a configuration override replaces the computed
/// path entirely (for multi-subpath resources it replaces the base);
/// otherwise the declared path is matched against the embedded table; an
/// unmatched path is emitted verbatim as an external URL. Cache busting
/// applies only to locally served files.
///
/// Never fails: override lookup errors are logged and treated as "no
/// override", and a resource without a merged spec is skipped. The output
/// preserves the resolution order, so it is duplicate-free per resource and
/// dependency-correct.
#[must_use]
pub fn plan(
    resolution: &Resolution,
    graph: &MergedGraph,
    ctx: &RenderContext<'_>,
) -> Vec<RenderUnit> {
    let mut units = Vec::with_capacity(resolution.order.len());

    for id in &resolution.order {
        let Some(spec) = graph.spec(id) else {
            tracing::debug!(resource = %id, "resolved resource has no merged spec; skipping");
            continue;
        };

        let override_url = match ctx.overrides.url_for(id.as_str()) {
            Ok(url) => url,
            Err(error) => {
                tracing::warn!(
                    resource = %id,
                    %error,
                    "override lookup failed; using the computed path"
                );
                None
            }
        };

        match spec {
            ResourceSpec::Custom {
                renderer,
            } => units.push(RenderUnit {
                resource: id.clone(),
                target: ResolvedTarget::Custom {
                    renderer: renderer.clone(),
                },
            }),
            ResourceSpec::SinglePath {
                path,
            } => units.push(RenderUnit {
                resource: id.clone(),
                target: match override_url {
                    Some(url) => ResolvedTarget::OverrideUrl {
                        url,
                    },
                    None => path_target(path, ctx),
                },
            }),
            ResourceSpec::WithSubpaths {
                base,
                subpaths,
            } => {
                let base = override_url.as_deref().unwrap_or(base);
                for subpath in subpaths {
                    let full = join_paths(base, subpath);
                    let target = if override_url.is_some() {
                        ResolvedTarget::OverrideUrl {
                            url: full,
                        }
                    } else {
                        path_target(&full, ctx)
                    };
                    units.push(RenderUnit {
                        resource: id.clone(),
                        target,
                    });
                }
            }
        }
    }

    units
}

fn path_target(path: &str, ctx: &RenderContext<'_>) -> ResolvedTarget {
    match ctx.embedded.embedded(path) {
        Some(asset) => {
            let path = match ctx.cache_bust.suffix_for(&asset.path) {
                Some(suffix) => format!("{}?{}", asset.path, suffix),
                None => asset.path,
            };
            ResolvedTarget::LocalFile {
                path,
                mime_type: asset.mime_type,
            }
        }
        None => ResolvedTarget::ExternalUrl {
            url: path.to_string(),
        },
    }
}

fn join_paths(base: &str, subpath: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        subpath.trim_start_matches('/')
    )
}
