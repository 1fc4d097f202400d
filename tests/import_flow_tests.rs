use vector_style_editor::app::LayerType;
use vector_style_editor::{
    AppCommand, AppController, AppIntent, AppState, FeatureStyle, Geometry, NoticeLevel,
};

const THREE_FEATURES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "properties": {"name": "Weg"},
         "geometry": {"type": "LineString", "coordinates": [[10.0, 50.0], [10.1, 50.1]]}},
        {"type": "Feature", "properties": {"name": "Feld"},
         "geometry": {"type": "Polygon", "coordinates": [[[10.0, 50.0], [10.2, 50.0], [10.2, 50.2], [10.0, 50.0]]]}},
        {"type": "Feature", "properties": {},
         "geometry": {"type": "LineString", "coordinates": [[10.3, 50.3], [10.4, 50.3], [10.5, 50.4], [10.6, 50.3]]}}
    ]
}"#;

const SHAPES_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
    <rect x="10" y="10" width="30" height="20" fill="#00ff00" stroke="#000000"/>
    <circle cx="70" cy="70" r="10"/>
    <polyline points="0,90 20,80 40,90" stroke="#ff0000" stroke-width="2" fill="none"/>
</svg>"##;

fn send(controller: &mut AppController, state: &mut AppState, intent: AppIntent) {
    controller
        .handle_intent(state, intent)
        .expect("Intent sollte ohne Fehler durchlaufen");
}

#[test]
fn geojson_import_creates_ordered_layers_with_default_styles() {
    let mut controller = AppController::new();
    let mut state = AppState::new();

    send(
        &mut controller,
        &mut state,
        AppIntent::FileDropped {
            name: "karte.geojson".to_string(),
            contents: Ok(THREE_FEATURES.to_string()),
        },
    );

    assert!(matches!(
        state.command_log.entries().last(),
        Some(AppCommand::ImportGeoJson { .. })
    ));
    assert_eq!(state.source.len(), 3);
    assert_eq!(state.layers.len(), 3);

    let layers: Vec<_> = state.layers.state().layers.values().cloned().collect();
    let orders: Vec<_> = layers.iter().map(|l| l.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
    assert_eq!(
        layers.iter().map(|l| l.kind).collect::<Vec<_>>(),
        vec![LayerType::Line, LayerType::Polygon, LayerType::Line]
    );

    let ids = state.source.ids();
    assert_eq!(state.styles.get(ids[0]), Some(&FeatureStyle::default_line()));
    assert_eq!(
        state.styles.get(ids[1]),
        Some(&FeatureStyle::default_polygon())
    );
    assert_eq!(
        state.source.get(ids[0]).and_then(|f| f.properties.name.clone()),
        Some("Weg".to_string())
    );

    // Ansicht wurde auf die Importe eingepasst
    let extent = state.source.extent().expect("Ausdehnung erwartet");
    let center = extent.center();
    assert!((state.view.center - center).length() < 1.0);
}

#[test]
fn import_is_one_undo_step() {
    let mut controller = AppController::new();
    let mut state = AppState::new();

    send(
        &mut controller,
        &mut state,
        AppIntent::GeoJsonImportRequested {
            text: THREE_FEATURES.to_string(),
        },
    );
    assert!(state.can_undo());

    send(&mut controller, &mut state, AppIntent::UndoRequested);
    assert_eq!(state.source.len(), 0);
    assert!(state.layers.is_empty());
    assert!(!state.can_undo());

    send(&mut controller, &mut state, AppIntent::RedoRequested);
    assert_eq!(state.source.len(), 3);
    assert_eq!(state.layers.len(), 3);
    for id in state.source.ids() {
        assert!(state.layers.layer_for_feature(id).is_some());
        assert!(state.styles.get(id).is_some());
    }
}

#[test]
fn svg_import_keeps_element_colors() {
    let mut controller = AppController::new();
    let mut state = AppState::new();

    send(
        &mut controller,
        &mut state,
        AppIntent::FileDropped {
            name: "Formen.SVG".to_string(),
            contents: Ok(SHAPES_SVG.to_string()),
        },
    );

    assert_eq!(state.source.len(), 3);
    let ids = state.source.ids();

    let rect = state.source.get(ids[0]).expect("Rechteck");
    assert!(matches!(rect.geometry.as_ref(), Geometry::Polygon(_)));
    let rect_style = state.styles.get(ids[0]).expect("Rechteck-Style");
    assert_eq!(rect_style.layers[0].fill_color, "#00ff00");
    assert_eq!(rect_style.layers[0].stroke_color, "#000000");

    let circle = state.source.get(ids[1]).expect("Kreis");
    assert!(matches!(circle.geometry.as_ref(), Geometry::Circle { .. }));

    let line_style = state.styles.get(ids[2]).expect("Linien-Style");
    assert_eq!(line_style.layers[0].stroke_color, "#ff0000");
    assert_eq!(line_style.layers[0].stroke_width, 2.0);
    assert_eq!(
        state.layers.layer_for_feature(ids[1]).map(|l| l.kind),
        Some(LayerType::Circle)
    );
}

#[test]
fn broken_or_unknown_files_only_report_notices() {
    let mut controller = AppController::new();
    let mut state = AppState::new();

    send(
        &mut controller,
        &mut state,
        AppIntent::FileDropped {
            name: "kaputt.json".to_string(),
            contents: Ok("{ nicht json".to_string()),
        },
    );
    send(
        &mut controller,
        &mut state,
        AppIntent::FileDropped {
            name: "bild.png".to_string(),
            contents: Ok(String::new()),
        },
    );
    send(
        &mut controller,
        &mut state,
        AppIntent::FileDropped {
            name: "weg.geojson".to_string(),
            contents: Err("Zugriff verweigert".to_string()),
        },
    );

    let levels: Vec<_> = state.ui.take_notices().iter().map(|n| n.level).collect();
    assert_eq!(
        levels,
        vec![NoticeLevel::Error, NoticeLevel::Warning, NoticeLevel::Error]
    );
    assert_eq!(state.source.len(), 0);
    assert!(!state.can_undo());
}
