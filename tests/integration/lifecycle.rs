//! The full pipeline: build unit graphs, persist them, load and merge at
//! process start, resolve per page, and plan render output.

use std::path::PathBuf;
use tempfile::TempDir;

use asset_graph::core::ResourceSpec;
use asset_graph::graph::{GraphBuilder, UnitGraph};
use asset_graph::merge::Merger;
use asset_graph::render::{
    EmbeddedTable, RenderContext, ResolvedTarget, StaticCacheBust, StaticOverrides, plan,
};
use asset_graph::resolver::resolve;

use super::common::{init_test_logging, req, rid, widget_library_unit};

/// A second deployable unit: the application itself, which reuses the
/// widget library's grid and ships one page-specific script.
fn application_unit() -> UnitGraph {
    let mut builder = GraphBuilder::new("acme-app");
    builder
        .declare(rid("Acme.Widgets.Grid"), ResourceSpec::single("scripts/grid.js"))
        .unwrap();
    builder
        .declare(rid("Acme.App.Startup"), ResourceSpec::single("scripts/startup.js"))
        .unwrap();
    builder
        .add_dependency(rid("Acme.App.Startup"), rid("Acme.Widgets.Grid"))
        .unwrap();
    builder
        .add_requirement(req("Acme.Pages.Home"), rid("Acme.App.Startup"))
        .unwrap();
    builder.build().0
}

fn save_all(dir: &TempDir, units: &[UnitGraph]) -> Vec<PathBuf> {
    units
        .iter()
        .map(|unit| {
            let path = dir.path().join(format!("{}.assetgraph", unit.unit()));
            unit.save(&path).unwrap();
            path
        })
        .collect()
}

#[test]
fn test_build_save_load_merge_resolve_plan() {
    init_test_logging();
    let dir = TempDir::new().unwrap();

    // Build time: each unit seals and persists its own graph.
    let paths = save_all(&dir, &[widget_library_unit(), application_unit()]);

    // Process start: load every deployed graph and merge.
    let mut merger = Merger::new();
    for path in &paths {
        let unit = UnitGraph::load(path).unwrap();
        merger.add_unit(&unit);
    }
    let (merged, diagnostics) = merger.finish();
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");

    // Page render: the home page pulls the whole grid chain through the
    // cross-unit re-declaration.
    let resolution = resolve(&[req("Acme.Pages.Home")], &merged);
    assert_eq!(
        resolution.order,
        [
            rid("Acme.Widgets.Core"),
            rid("Acme.Widgets.Theme"),
            rid("Acme.Widgets.Grid"),
            rid("Acme.App.Startup"),
        ]
    );

    // Plan with the full collaborator set.
    let mut embedded = EmbeddedTable::new();
    embedded.insert("scripts/core.js", "/assets/core.js", "text/javascript");
    embedded.insert("scripts/grid.js", "/assets/grid.js", "text/javascript");
    let overrides = StaticOverrides::from_json_str(
        r#"{"Acme.App.Startup": "https://cdn.example.com/startup.js"}"#,
    )
    .unwrap();
    let buster = StaticCacheBust::new("v=7");
    let ctx = RenderContext::new(&embedded, &overrides, &buster);

    let units = plan(&resolution, &merged, &ctx);
    // Theme expands to three subpath units: 3 + core + grid + startup.
    assert_eq!(units.len(), 6);

    assert_eq!(
        units[0].target,
        ResolvedTarget::LocalFile {
            path: "/assets/core.js?v=7".to_string(),
            mime_type: "text/javascript".to_string(),
        }
    );
    assert!(matches!(
        units[1].target,
        ResolvedTarget::ExternalUrl { ref url } if url == "theme/reset.css"
    ));
    assert_eq!(
        units[5].target,
        ResolvedTarget::OverrideUrl {
            url: "https://cdn.example.com/startup.js".to_string(),
        }
    );
}

#[test]
fn test_pages_see_only_their_own_requirements() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let paths = save_all(&dir, &[widget_library_unit(), application_unit()]);

    let mut merger = Merger::new();
    for path in &paths {
        merger.add_unit(&UnitGraph::load(path).unwrap());
    }
    let (merged, _) = merger.finish();

    // The reports page never pulls the app startup script or the grid.
    let resolution = resolve(&[req("Acme.Pages.Reports")], &merged);
    assert_eq!(
        resolution.order,
        [rid("Acme.Widgets.Core"), rid("Acme.Widgets.Chart")]
    );
}

#[test]
fn test_merged_graph_serves_many_pages_from_one_build() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let paths = save_all(&dir, &[widget_library_unit(), application_unit()]);

    let mut merger = Merger::new();
    for path in &paths {
        merger.add_unit(&UnitGraph::load(path).unwrap());
    }
    let (merged, _) = merger.finish();

    // Different pages, same graph, independent resolutions.
    let home = resolve(&[req("Acme.Pages.Home")], &merged);
    let dashboard = resolve(&[req("Acme.Pages.Dashboard")], &merged);
    assert!(home.contains(&rid("Acme.App.Startup")));
    assert!(!dashboard.contains(&rid("Acme.App.Startup")));

    // The graph is untouched by resolution; a re-run reproduces the output.
    assert_eq!(resolve(&[req("Acme.Pages.Home")], &merged), home);
}
