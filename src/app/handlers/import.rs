//! Handler für SVG- und GeoJSON-Importe.

use crate::app::state::NoticeLevel;
use crate::app::AppState;
use crate::core::{EditorError, Feature};
use crate::import::{self, ImportedFeature};

/// Importiert SVG-Elemente als Features.
pub fn import_svg(state: &mut AppState, text: &str) {
    let result = import::svg::parse(text, &state.options.svg_import);
    insert_all(state, result, "SVG");
}

/// Importiert GeoJSON-Features.
pub fn import_geojson(state: &mut AppState, text: &str) {
    let result = import::geojson::parse(text);
    insert_all(state, result, "GeoJSON");
}

/// Fügt alle Features in einem Undo-Schritt ein und passt die Ansicht an.
fn insert_all(
    state: &mut AppState,
    result: Result<Vec<ImportedFeature>, EditorError>,
    format: &str,
) {
    let Some(imported) = state.ui.report(result) else {
        return;
    };
    state.record_undo_snapshot();

    let count = imported.len();
    for item in imported {
        let id = state.source.allocate_id();
        let class = item.geometry.class();
        let mut feature = Feature::new(id, item.geometry);
        if let Some(options) = item.spline {
            feature = feature.with_spline(options);
        }
        feature.properties.name = item.name;
        feature.properties.source = Some(item.source.to_string());
        state.source.insert(feature);

        match &item.style {
            Some(style) => state.styles.set(id, style),
            None => state.styles.assign_default(id, class),
        }
        if let Some(feature) = state.source.get(id) {
            state.layers.add_layer_from_feature(feature, &state.styles);
        }
    }

    if let Some(extent) = state.source.extent() {
        state.view.fit(&extent, state.options.fit_padding_px);
    }
    state.interaction.sync(&state.source, &state.selection);
    state.ui.notify(
        NoticeLevel::Info,
        format!("{} Features aus {} importiert", count, format),
    );
}
