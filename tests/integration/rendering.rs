//! Render planning with the external collaborators a host plugs in.

use anyhow::Result;

use asset_graph::core::ResourceSpec;
use asset_graph::graph::GraphBuilder;
use asset_graph::merge::Merger;
use asset_graph::render::{
    EmbeddedTable, NoCacheBust, NoEmbedded, NoOverrides, OverrideLookup, RenderContext,
    ResolvedTarget, StaticCacheBust, StaticOverrides, plan,
};
use asset_graph::resolver::resolve;

use super::common::{init_test_logging, merged_clean, req, rid, widget_library_unit};

#[test]
fn test_subpaths_stay_in_declared_order_even_when_node_is_reordered() {
    init_test_logging();
    // The theme node sits in the middle of the resolved order (grid depends
    // on it), but its subpath units are always f1, f2, f3.
    let graph = merged_clean(&[widget_library_unit()]);
    let resolution = resolve(&[req("Acme.Pages.Dashboard")], &graph);

    let units = plan(&resolution, &graph, &RenderContext::bare());
    let theme_urls: Vec<&str> = units
        .iter()
        .filter(|u| u.resource == rid("Acme.Widgets.Theme"))
        .map(|u| match &u.target {
            ResolvedTarget::ExternalUrl {
                url,
            } => url.as_str(),
            other => panic!("unexpected target: {other:?}"),
        })
        .collect();
    assert_eq!(
        theme_urls,
        ["theme/reset.css", "theme/layout.css", "theme/colors.css"]
    );
}

#[test]
fn test_plan_output_follows_resolution_order() {
    init_test_logging();
    let graph = merged_clean(&[widget_library_unit()]);
    let resolution = resolve(&[req("Acme.Pages.Dashboard")], &graph);

    let units = plan(&resolution, &graph, &RenderContext::bare());
    let mut seen = Vec::new();
    for unit in &units {
        if seen.last() != Some(&unit.resource) {
            seen.push(unit.resource.clone());
        }
    }
    assert_eq!(seen, resolution.order);
}

#[test]
fn test_override_applies_per_identity_not_per_path() {
    init_test_logging();
    // Two resources share a declared path; only the overridden identity is
    // redirected.
    let mut builder = GraphBuilder::new("unit");
    builder.declare(rid("First"), ResourceSpec::single("shared.js")).unwrap();
    builder.declare(rid("Second"), ResourceSpec::single("shared.js")).unwrap();
    builder.add_requirement(req("Page"), rid("First")).unwrap();
    builder.add_requirement(req("Page"), rid("Second")).unwrap();
    let mut merger = Merger::new();
    merger.add_unit(&builder.build().0);
    let (graph, _) = merger.finish();

    let overrides =
        StaticOverrides::from_json_str(r#"{"Second": "https://cdn.example.com/two.js"}"#).unwrap();
    let ctx = RenderContext::new(&NoEmbedded, &overrides, &NoCacheBust);

    let resolution = resolve(&[req("Page")], &graph);
    let units = plan(&resolution, &graph, &ctx);
    assert_eq!(
        units[0].target,
        ResolvedTarget::ExternalUrl {
            url: "shared.js".to_string(),
        }
    );
    assert_eq!(
        units[1].target,
        ResolvedTarget::OverrideUrl {
            url: "https://cdn.example.com/two.js".to_string(),
        }
    );
}

#[test]
fn test_nested_container_names_are_valid_override_keys() {
    init_test_logging();
    // Qualified names use `+` for nested containers; the lookup key is the
    // identity text verbatim.
    let mut builder = GraphBuilder::new("unit");
    builder
        .declare(rid("Acme.Widgets.Grid+Toolbar"), ResourceSpec::single("toolbar.js"))
        .unwrap();
    builder.add_requirement(req("Page"), rid("Acme.Widgets.Grid+Toolbar")).unwrap();
    let mut merger = Merger::new();
    merger.add_unit(&builder.build().0);
    let (graph, _) = merger.finish();

    let overrides = StaticOverrides::from_json_str(
        r#"{"Acme.Widgets.Grid+Toolbar": "https://cdn.example.com/toolbar.js"}"#,
    )
    .unwrap();
    let ctx = RenderContext::new(&NoEmbedded, &overrides, &NoCacheBust);

    let resolution = resolve(&[req("Page")], &graph);
    let units = plan(&resolution, &graph, &ctx);
    assert_eq!(
        units[0].target,
        ResolvedTarget::OverrideUrl {
            url: "https://cdn.example.com/toolbar.js".to_string(),
        }
    );
}

#[test]
fn test_cache_bust_only_touches_embedded_files() {
    init_test_logging();
    let mut builder = GraphBuilder::new("unit");
    builder.declare(rid("Local"), ResourceSpec::single("local.js")).unwrap();
    builder.declare(rid("Remote"), ResourceSpec::single("https://cdn.example.com/r.js")).unwrap();
    builder.add_requirement(req("Page"), rid("Local")).unwrap();
    builder.add_requirement(req("Page"), rid("Remote")).unwrap();
    let mut merger = Merger::new();
    merger.add_unit(&builder.build().0);
    let (graph, _) = merger.finish();

    let mut embedded = EmbeddedTable::new();
    embedded.insert("local.js", "/assets/local.js", "text/javascript");
    let buster = StaticCacheBust::new("v=3");
    let ctx = RenderContext::new(&embedded, &NoOverrides, &buster);

    let resolution = resolve(&[req("Page")], &graph);
    let units = plan(&resolution, &graph, &ctx);
    assert_eq!(
        units[0].target,
        ResolvedTarget::LocalFile {
            path: "/assets/local.js?v=3".to_string(),
            mime_type: "text/javascript".to_string(),
        }
    );
    assert_eq!(
        units[1].target,
        ResolvedTarget::ExternalUrl {
            url: "https://cdn.example.com/r.js".to_string(),
        }
    );
}

#[test]
fn test_custom_resources_ignore_all_collaborators() {
    init_test_logging();
    let mut builder = GraphBuilder::new("unit");
    builder.declare(rid("Map"), ResourceSpec::custom("Acme.MapRenderer")).unwrap();
    builder.add_requirement(req("Page"), rid("Map")).unwrap();
    let mut merger = Merger::new();
    merger.add_unit(&builder.build().0);
    let (graph, _) = merger.finish();

    // Even a context that would rewrite everything leaves customs alone.
    struct OverrideEverything;
    impl OverrideLookup for OverrideEverything {
        fn url_for(&self, _qualified_name: &str) -> Result<Option<String>> {
            Ok(Some("https://cdn.example.com/wrong.js".to_string()))
        }
    }
    let buster = StaticCacheBust::new("v=1");
    let ctx = RenderContext::new(&NoEmbedded, &OverrideEverything, &buster);

    let resolution = resolve(&[req("Page")], &graph);
    let units = plan(&resolution, &graph, &ctx);
    assert_eq!(
        units[0].target,
        ResolvedTarget::Custom {
            renderer: "Acme.MapRenderer".to_string(),
        }
    );
}

#[test]
fn test_broken_override_config_never_breaks_the_page() {
    init_test_logging();
    struct FailingLookup;
    impl OverrideLookup for FailingLookup {
        fn url_for(&self, _qualified_name: &str) -> Result<Option<String>> {
            anyhow::bail!("override store unavailable")
        }
    }

    let graph = merged_clean(&[widget_library_unit()]);
    let resolution = resolve(&[req("Acme.Pages.Dashboard")], &graph);
    let ctx = RenderContext::new(&NoEmbedded, &FailingLookup, &NoCacheBust);

    // Every resource still planned, all on their computed paths.
    let units = plan(&resolution, &graph, &ctx);
    assert_eq!(units.len(), 6);
    assert!(units.iter().all(|u| !matches!(u.target, ResolvedTarget::OverrideUrl { .. })));
}
