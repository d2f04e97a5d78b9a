//! I/O operations for unit graph persistence.
//!
//! Each compilation unit's sealed graph is written next to the unit's build
//! output as a versioned TOML document and read back when the application
//! starts. The contract is a strict round-trip: loading a saved graph yields
//! a value equal to the original, with the same specs and edges in the same
//! declaration order.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::core::{AssetGraphError, RequirerId, ResourceId, ResourceSpec};
use crate::utils::fs::atomic_write;

use super::UnitGraph;
use super::builder::{BuildOptions, DuplicatePolicy, GraphBuilder};

/// Current graph file format version.
const GRAPH_FILE_VERSION: u32 = 1;

/// On-disk form of a [`UnitGraph`].
///
/// Resources and requirers are each stored once, in declaration order; edges
/// reference them by table index so repeated identities never bloat the
/// file. The array-of-tables field comes last so the document serializes as
/// valid TOML.
#[derive(Debug, Serialize, Deserialize)]
struct GraphFile {
    version: u32,
    unit: String,
    #[serde(default)]
    requirers: Vec<RequirerId>,
    /// `(requirer index, resource index)` pairs.
    #[serde(default)]
    requirements: Vec<(usize, usize)>,
    /// `(dependent index, dependency index)` pairs.
    #[serde(default)]
    dependencies: Vec<(usize, usize)>,
    #[serde(default)]
    resources: Vec<ResourceEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ResourceEntry {
    id: ResourceId,
    spec: ResourceSpec,
}

impl GraphFile {
    fn from_graph(graph: &UnitGraph) -> Self {
        let resource_index: HashMap<&ResourceId, usize> =
            graph.resources.ids().enumerate().map(|(i, id)| (id, i)).collect();

        let mut requirers: Vec<RequirerId> = Vec::new();
        let mut requirer_index: HashMap<&RequirerId, usize> = HashMap::new();
        let mut requirements = Vec::with_capacity(graph.requirements.len());
        for (requirer, resource) in &graph.requirements {
            let r = *requirer_index.entry(requirer).or_insert_with(|| {
                requirers.push(requirer.clone());
                requirers.len() - 1
            });
            requirements.push((r, resource_index[resource]));
        }

        let dependencies = graph
            .dependencies
            .iter()
            .map(|(dependent, dependency)| {
                (resource_index[dependent], resource_index[dependency])
            })
            .collect();

        Self {
            version: GRAPH_FILE_VERSION,
            unit: graph.unit.clone(),
            requirers,
            requirements,
            dependencies,
            resources: graph
                .resources
                .iter()
                .map(|(id, spec)| ResourceEntry {
                    id: id.clone(),
                    spec: spec.clone(),
                })
                .collect(),
        }
    }

    /// Rebuild the in-memory graph, running the file contents back through a
    /// strict builder so a corrupt file cannot smuggle in a graph the builder
    /// would have rejected.
    fn into_graph(self, path: &Path) -> Result<UnitGraph, AssetGraphError> {
        let file = path.display().to_string();
        let invalid = |reason: String| AssetGraphError::GraphFileInvalid {
            file: file.clone(),
            reason,
        };

        let mut builder = GraphBuilder::with_options(
            self.unit,
            BuildOptions {
                duplicates: DuplicatePolicy::Fail,
            },
        );

        for entry in &self.resources {
            builder
                .declare(entry.id.clone(), entry.spec.clone())
                .map_err(|e| invalid(e.to_string()))?;
        }

        let resource = |index: usize| -> Result<&ResourceEntry, AssetGraphError> {
            self.resources
                .get(index)
                .ok_or_else(|| invalid(format!("resource index {index} out of range")))
        };

        for &(requirer, res) in &self.requirements {
            let requirer = self
                .requirers
                .get(requirer)
                .ok_or_else(|| invalid(format!("requirer index {requirer} out of range")))?;
            builder
                .add_requirement(requirer.clone(), resource(res)?.id.clone())
                .map_err(|e| invalid(e.to_string()))?;
        }

        for &(dependent, dependency) in &self.dependencies {
            builder
                .add_dependency(resource(dependent)?.id.clone(), resource(dependency)?.id.clone())
                .map_err(|e| invalid(e.to_string()))?;
        }

        // A strict builder records no diagnostics, so nothing is dropped here.
        let (graph, _) = builder.build();
        Ok(graph)
    }
}

impl UnitGraph {
    /// Load a unit graph from disk with format validation.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the graph file written by [`save`](Self::save)
    ///
    /// # Returns
    ///
    /// * `Ok(UnitGraph)` - Successfully loaded and validated graph
    /// * `Err(anyhow::Error)` - Read failure, parse error, or version
    ///   incompatibility
    ///
    /// # Error Handling
    ///
    /// - **File missing or unreadable**: an error with guidance (a missing
    ///   graph file usually means the unit was built without graph emission)
    /// - **TOML parse errors**: [`AssetGraphError::GraphFileParse`]
    /// - **Newer format version**: [`AssetGraphError::GraphFileVersion`]
    /// - **Internally inconsistent contents**:
    ///   [`AssetGraphError::GraphFileInvalid`]
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use std::path::Path;
    /// use asset_graph::graph::UnitGraph;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let graph = UnitGraph::load(Path::new("widgets.assetgraph"))?;
    /// println!("loaded {} resources", graph.resources().len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| {
            format!(
                "Cannot read graph file: {}\n\n\
                    Possible causes:\n\
                    - The unit was built without graph emission\n\
                    - Permission denied (check file ownership)\n\
                    - The file was removed after the unit was built",
                path.display()
            )
        })?;

        if content.trim().is_empty() {
            return Err(AssetGraphError::GraphFileParse {
                file: path.display().to_string(),
                reason: "file is empty".to_string(),
            }
            .into());
        }

        let file: GraphFile =
            toml::from_str(&content).map_err(|e| AssetGraphError::GraphFileParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?;

        if file.version == 0 {
            return Err(AssetGraphError::GraphFileInvalid {
                file: path.display().to_string(),
                reason: "format version 0 is not valid".to_string(),
            }
            .into());
        }
        if file.version > GRAPH_FILE_VERSION {
            return Err(AssetGraphError::GraphFileVersion {
                file: path.display().to_string(),
                found: file.version,
                supported: GRAPH_FILE_VERSION,
            })
            .context(
                "The graph file was produced by a newer toolchain. \
                    Rebuild the unit with this toolchain, or upgrade.",
            );
        }

        let graph = file.into_graph(path)?;
        tracing::debug!(
            unit = %graph.unit,
            path = %path.display(),
            resources = graph.resources.len(),
            "loaded unit graph"
        );
        Ok(graph)
    }

    /// Save the unit graph to disk atomically.
    ///
    /// The graph is serialized to TOML and written to a temporary file that
    /// is renamed into place, so the file is never observed half-written.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use std::path::Path;
    /// use asset_graph::graph::{GraphBuilder, UnitGraph};
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let (graph, _) = GraphBuilder::new("widgets").build();
    /// graph.save(Path::new("widgets.assetgraph"))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn save(&self, path: &Path) -> Result<()> {
        let body = toml::to_string_pretty(&GraphFile::from_graph(self))
            .context("Failed to serialize unit graph to TOML")?;
        let content = format!(
            "# Auto-generated asset graph for unit '{}' - DO NOT EDIT\n{}",
            self.unit, body
        );

        atomic_write(path, content.as_bytes())
            .with_context(|| format!("Failed to write graph file: {}", path.display()))?;
        tracing::debug!(unit = %self.unit, path = %path.display(), "saved unit graph");
        Ok(())
    }
}
