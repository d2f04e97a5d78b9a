//! Graph file round-trips and format validation through the public API.

use std::fs;
use tempfile::TempDir;

use asset_graph::core::AssetGraphError;
use asset_graph::graph::UnitGraph;

use super::common::{init_test_logging, unit_graph, widget_library_unit};

#[test]
fn test_round_trip_covers_every_spec_kind() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("widgets.assetgraph");

    let graph = widget_library_unit();
    graph.save(&path).unwrap();
    let loaded = UnitGraph::load(&path).unwrap();

    assert_eq!(loaded, graph);
    assert_eq!(loaded.unit(), "acme-widgets");
}

#[test]
fn test_round_trip_preserves_edge_order() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ordered.assetgraph");

    let graph = unit_graph(
        "ordered",
        &["A", "B", "C", "D"],
        &[("A", "D"), ("A", "B"), ("A", "C")],
        &[("P", "A"), ("Q", "A")],
    );
    graph.save(&path).unwrap();
    let loaded = UnitGraph::load(&path).unwrap();

    assert_eq!(loaded.dependencies(), graph.dependencies());
    assert_eq!(loaded.requirements(), graph.requirements());
}

#[test]
fn test_save_overwrites_previous_file() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unit.assetgraph");

    unit_graph("unit", &["A"], &[], &[]).save(&path).unwrap();
    let bigger = unit_graph("unit", &["A", "B"], &[("A", "B")], &[]);
    bigger.save(&path).unwrap();

    assert_eq!(UnitGraph::load(&path).unwrap(), bigger);
}

#[test]
fn test_newer_format_version_is_refused() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unit.assetgraph");

    unit_graph("unit", &["A"], &[], &[]).save(&path).unwrap();
    let bumped = fs::read_to_string(&path).unwrap().replace("version = 1", "version = 2");
    fs::write(&path, bumped).unwrap();

    let err = UnitGraph::load(&path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AssetGraphError>(),
        Some(AssetGraphError::GraphFileVersion {
            found: 2,
            supported: 1,
            ..
        })
    ));
}

#[test]
fn test_tampered_edge_target_is_refused() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unit.assetgraph");

    // A dependency edge pointing at a resource index that does not exist,
    // as a corrupted or hand-edited file might contain.
    fs::write(
        &path,
        "version = 1\n\
         unit = \"unit\"\n\
         dependencies = [[0, 9]]\n\n\
         [[resources]]\n\
         id = \"A\"\n\
         [resources.spec.single-path]\n\
         path = \"A.js\"\n",
    )
    .unwrap();

    let err = UnitGraph::load(&path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AssetGraphError>(),
        Some(AssetGraphError::GraphFileInvalid { .. })
    ));
}

#[test]
fn test_graph_files_are_self_describing_toml() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unit.assetgraph");

    widget_library_unit().save(&path).unwrap();
    let content = fs::read_to_string(&path).unwrap();

    assert!(content.starts_with("# Auto-generated asset graph"));
    assert!(content.contains("version = 1"));
    assert!(content.contains("unit = \"acme-widgets\""));
    assert!(content.contains("Acme.Widgets.Grid"));
}
