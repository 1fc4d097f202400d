use super::*;
use crate::core::{ArrowStyle, FeatureId, SplineOptions};
use approx::assert_relative_eq;

fn line_feature(id: FeatureId) -> Feature {
    Feature::new(
        id,
        Geometry::LineString(vec![DVec2::ZERO, DVec2::new(750.0, 0.0)]),
    )
}

fn square_feature(id: FeatureId) -> Feature {
    Feature::new(
        id,
        Geometry::rectangle(DVec2::ZERO, DVec2::new(100.0, 100.0)),
    )
}

fn three_layer_style() -> FeatureStyle {
    let mut style = FeatureStyle::default_polygon();
    style.push_template_layer();
    style.push_template_layer();
    style
}

fn detailed_zoom() -> ZoomSettings {
    ZoomSettings {
        enabled: false,
        ..ZoomSettings::default()
    }
}

fn kinds(primitives: &[DrawPrimitive]) -> Vec<PrimitiveKind> {
    primitives.iter().map(|p| p.kind).collect()
}

#[test]
fn lod_branch_emits_single_primitive_regardless_of_layers() {
    let mut resolver = StyleResolver::new();
    let mut styles = StyleTable::new();
    let feature = square_feature(1);
    styles.set(1, &three_layer_style());

    let zoom = ZoomSettings::default();
    let out = resolver.resolve(
        &feature,
        zoom.threshold + 1.0,
        &zoom,
        &styles,
        &LayerOrderTable::new(),
    );

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].kind, PrimitiveKind::Simplified);
    let stroke = out[0].stroke.as_ref().expect("Strich erwartet");
    assert_eq!(stroke.color, Rgba::new(0, 0, 255, 1.0));
    assert_eq!(stroke.width, zoom.style.stroke_width);
    assert_eq!(
        out[0].fill,
        Some(FillStyle::Solid(Rgba::new(0, 0, 255, 0.5)))
    );
}

#[test]
fn lod_cache_is_shared_and_reset_on_settings_change() {
    let mut resolver = StyleResolver::new();
    let styles = StyleTable::new();
    let orders = LayerOrderTable::new();
    let mut zoom = ZoomSettings::default();

    resolver.resolve(&line_feature(1), 500.0, &zoom, &styles, &orders);
    resolver.resolve(&line_feature(2), 500.0, &zoom, &styles, &orders);
    assert_eq!(resolver.cache_len(), 1, "gleiche Farben teilen den Eintrag");

    resolver.resolve(&square_feature(3), 500.0, &zoom, &styles, &orders);
    assert_eq!(resolver.cache_len(), 2);

    zoom.style.stroke_width = 4.0;
    let out = resolver.resolve(&line_feature(1), 500.0, &zoom, &styles, &orders);
    assert_eq!(resolver.cache_len(), 1);
    assert_eq!(out[0].stroke.as_ref().map(|s| s.width), Some(4.0));
}

#[test]
fn lod_global_override_uses_settings_colors() {
    let mut resolver = StyleResolver::new();
    let zoom = ZoomSettings {
        automatic_color: false,
        ..ZoomSettings::default()
    };
    let out = resolver.resolve(
        &square_feature(1),
        500.0,
        &zoom,
        &StyleTable::new(),
        &LayerOrderTable::new(),
    );
    assert_eq!(out.len(), 1);
    let stroke = out[0].stroke.as_ref().expect("Strich erwartet");
    assert_eq!(stroke.color, Rgba::new(0x33, 0x88, 0xff, 1.0));
    assert_eq!(
        out[0].fill,
        Some(FillStyle::Solid(Rgba::new(51, 136, 255, 0.3)))
    );
}

#[test]
fn detailed_branch_paint_z_increases_with_layer_index() {
    let mut resolver = StyleResolver::new();
    let mut styles = StyleTable::new();
    styles.set(1, &three_layer_style());
    let zoom = ZoomSettings::default();

    let out = resolver.resolve(
        &square_feature(1),
        zoom.threshold,
        &zoom,
        &styles,
        &LayerOrderTable::new(),
    );

    let paint: Vec<&DrawPrimitive> = out
        .iter()
        .filter(|p| matches!(p.kind, PrimitiveKind::Paint(_)))
        .collect();
    assert_eq!(paint.len(), 3);
    assert!(paint.windows(2).all(|w| w[0].z_index < w[1].z_index));
    assert_eq!(paint[0].z_index, Z_PAINT_BASE);
}

#[test]
fn selected_feature_gets_halo_and_vertices_below_paint() {
    let mut resolver = StyleResolver::new();
    let mut feature = square_feature(1);
    feature.properties.selected = true;

    let out = resolver.resolve(
        &feature,
        1.0,
        &detailed_zoom(),
        &StyleTable::new(),
        &LayerOrderTable::new(),
    );

    assert_eq!(out[0].kind, PrimitiveKind::Halo);
    let halo_stroke = out[0].stroke.as_ref().expect("Halo-Strich erwartet");
    assert_eq!(halo_stroke.width, 2.0 + 8.0);
    assert_eq!(out[0].fill, Some(FillStyle::Solid(SELECT_HALO_FILL)));

    let vertices = out
        .iter()
        .filter(|p| p.kind == PrimitiveKind::Vertex)
        .count();
    assert_eq!(vertices, 4, "Außenring ohne Schlusspunkt");

    let max_below = out
        .iter()
        .filter(|p| matches!(p.kind, PrimitiveKind::Halo | PrimitiveKind::Vertex))
        .map(|p| p.z_index)
        .max();
    let min_paint = out
        .iter()
        .filter(|p| matches!(p.kind, PrimitiveKind::Paint(_)))
        .map(|p| p.z_index)
        .min();
    assert!(max_below < min_paint);
}

#[test]
fn hovered_only_gets_thin_halo_without_vertices() {
    let mut resolver = StyleResolver::new();
    let mut feature = line_feature(1);
    feature.properties.hovered = true;

    let out = resolver.resolve(
        &feature,
        1.0,
        &detailed_zoom(),
        &StyleTable::new(),
        &LayerOrderTable::new(),
    );

    assert_eq!(kinds(&out), vec![PrimitiveKind::Halo, PrimitiveKind::Paint(0)]);
    let halo = out[0].stroke.as_ref().expect("Halo-Strich erwartet");
    assert_eq!(halo.color, HOVER_HALO);
    assert_eq!(halo.width, 5.0 + 6.0);
    assert!(out[0].fill.is_none());
}

#[test]
fn spline_is_expanded_but_markers_use_control_points() {
    let mut resolver = StyleResolver::new();
    let control = vec![
        DVec2::ZERO,
        DVec2::new(10.0, 10.0),
        DVec2::new(20.0, 0.0),
    ];
    let mut feature = Feature::new(7, Geometry::LineString(control.clone())).with_spline(
        SplineOptions {
            tension: 0.5,
            points_per_seg: 4,
            normalize: false,
        },
    );
    feature.properties.selected = true;

    let out = resolver.resolve(
        &feature,
        1.0,
        &detailed_zoom(),
        &StyleTable::new(),
        &LayerOrderTable::new(),
    );

    let paint = out
        .iter()
        .find(|p| p.kind == PrimitiveKind::Paint(0))
        .expect("Paint-Layer erwartet");
    match paint.geometry.as_ref() {
        Geometry::LineString(curve) => assert_eq!(curve.len(), 2 * 4 + 1),
        other => panic!("LineString erwartet, war {}", other.type_name()),
    }

    let markers: Vec<&DrawPrimitive> = out
        .iter()
        .filter(|p| p.kind == PrimitiveKind::Vertex)
        .collect();
    assert_eq!(markers.len(), control.len());
    match &markers[0].symbol {
        Some(Symbol::Circle { radius, fill, .. }) => {
            assert_eq!(*radius, 6.0);
            assert_eq!(*fill, SPLINE_VERTEX);
        }
        other => panic!("Kreis-Symbol erwartet: {other:?}"),
    }
}

#[test]
fn two_point_spline_falls_back_to_straight_line() {
    let mut resolver = StyleResolver::new();
    let feature = line_feature(1).with_spline(SplineOptions::default());
    let out = resolver.resolve(
        &feature,
        1.0,
        &detailed_zoom(),
        &StyleTable::new(),
        &LayerOrderTable::new(),
    );
    assert_eq!(out.len(), 1);
    assert!(Arc::ptr_eq(&out[0].geometry, &feature.geometry));
}

#[test]
fn arrows_are_topmost_and_along_path_follows_spacing() {
    let mut resolver = StyleResolver::new();
    let mut styles = StyleTable::new();
    let mut style = FeatureStyle::default_line();
    style.arrows.enabled = true;
    style.arrows.at_end = true;
    style.arrows.at_start = true;
    style.arrows.along_path = true;
    style.arrows.spacing = 150.0;
    style.arrows.style = ArrowStyle::Chevron;
    styles.set(1, &style);

    let out = resolver.resolve(
        &line_feature(1),
        1.0,
        &detailed_zoom(),
        &styles,
        &LayerOrderTable::new(),
    );

    let arrows: Vec<&DrawPrimitive> = out
        .iter()
        .filter(|p| p.kind == PrimitiveKind::Arrow)
        .collect();
    assert_eq!(arrows.len(), 1 + 1 + 4);
    assert!(arrows.iter().all(|a| a.z_index >= Z_ARROW_MIN));
    match &arrows[0].symbol {
        Some(Symbol::Arrow { scale, style, .. }) => {
            assert_relative_eq!(*scale, 12.0 / 20.0);
            assert_eq!(*style, ArrowStyle::Chevron);
        }
        other => panic!("Pfeil-Symbol erwartet: {other:?}"),
    }
}

#[test]
fn along_path_spacing_scales_with_resolution() {
    let mut resolver = StyleResolver::new();
    let mut styles = StyleTable::new();
    let mut style = FeatureStyle::default_line();
    style.arrows.enabled = true;
    style.arrows.at_end = false;
    style.arrows.along_path = true;
    style.arrows.spacing = 75.0;
    styles.set(1, &style);

    // 75 px × 2 m/px = 150 m Abstand auf 750 m Linie
    let out = resolver.resolve(
        &line_feature(1),
        2.0,
        &detailed_zoom(),
        &styles,
        &LayerOrderTable::new(),
    );
    let count = out.iter().filter(|p| p.kind == PrimitiveKind::Arrow).count();
    assert_eq!(count, 4);
}

#[test]
fn offset_layer_shifts_line_by_resolution() {
    let mut resolver = StyleResolver::new();
    let mut styles = StyleTable::new();
    let mut style = FeatureStyle::default_line();
    style.layers[0].offset = 3.0;
    styles.set(1, &style);

    let out = resolver.resolve(
        &line_feature(1),
        2.0,
        &detailed_zoom(),
        &styles,
        &LayerOrderTable::new(),
    );
    match out[0].geometry.as_ref() {
        Geometry::LineString(coords) => {
            assert_relative_eq!(coords[0].y, 6.0);
            assert_relative_eq!(coords[1].y, 6.0);
        }
        other => panic!("LineString erwartet, war {}", other.type_name()),
    }
}

#[test]
fn pattern_and_dash_are_carried_malformed_pattern_is_skipped() {
    let mut resolver = StyleResolver::new();
    let mut styles = StyleTable::new();
    let mut style = three_layer_style();
    style.layers[0].fill_pattern.kind = PatternType::Hatch;
    style.layers[1].dashed = true;
    style.layers[2].fill_pattern.kind = PatternType::Dot;
    style.layers[2].fill_pattern.spacing = -1.0;
    styles.set(1, &style);

    let out = resolver.resolve(
        &square_feature(1),
        1.0,
        &detailed_zoom(),
        &styles,
        &LayerOrderTable::new(),
    );

    assert_eq!(
        kinds(&out),
        vec![PrimitiveKind::Paint(0), PrimitiveKind::Paint(1)]
    );
    assert!(matches!(out[0].fill, Some(FillStyle::Pattern { .. })));
    let dash = out[1].stroke.as_ref().and_then(|s| s.line_dash);
    assert_eq!(dash, Some([10.0, 5.0]));
}

#[test]
fn hidden_and_invalid_features_resolve_to_nothing() {
    let mut resolver = StyleResolver::new();
    let styles = StyleTable::new();
    let orders = LayerOrderTable::new();
    let zoom = detailed_zoom();

    let mut hidden = line_feature(1);
    hidden.properties.layer_visible = false;
    assert!(resolver.resolve(&hidden, 1.0, &zoom, &styles, &orders).is_empty());

    let broken = Feature::new(2, Geometry::LineString(vec![DVec2::new(f64::NAN, 0.0)]));
    assert!(resolver.resolve(&broken, 1.0, &zoom, &styles, &orders).is_empty());
}

#[test]
fn layer_order_is_copied_into_every_primitive() {
    let mut resolver = StyleResolver::new();
    let mut orders = LayerOrderTable::new();
    orders.insert(1, 5);
    let mut feature = line_feature(1);
    feature.properties.selected = true;

    let out = resolver.resolve(&feature, 1.0, &detailed_zoom(), &StyleTable::new(), &orders);
    assert!(!out.is_empty());
    assert!(out.iter().all(|p| p.layer_order == 5));
}
