//! Builder für Render-Szenen aus dem AppState.

use crate::app::AppState;
use crate::render::RenderScene;

/// Baut eine RenderScene aus dem aktuellen AppState.
///
/// Alle Features werden mit der aktuellen Auflösung aufgelöst und stabil
/// nach (Layer-Reihenfolge, Z) sortiert; gleiche Schlüssel behalten die
/// Einfügereihenfolge der Quelle.
pub fn build(state: &mut AppState) -> RenderScene {
    let resolution = state.view.resolution();
    let orders = state.layers.layer_order_table();

    let mut primitives = Vec::new();
    for feature in state.source.iter() {
        primitives.extend(state.resolver.resolve(
            feature,
            resolution,
            &state.options.zoom,
            &state.styles,
            &orders,
        ));
    }
    primitives.sort_by_key(|p| (p.layer_order, p.z_index));

    RenderScene {
        primitives,
        overlays: state.interaction.overlays(&state.source, &state.view),
        resolution,
        revision: state.source.revision(),
    }
}

#[cfg(test)]
mod tests {
    use super::build;
    use crate::app::layer_registry::LayerAction;
    use crate::app::AppState;
    use crate::core::{Geometry, GeometryClass};
    use glam::DVec2;

    fn add_line(state: &mut AppState, y: f64) -> u64 {
        let id = state.source.add(Geometry::LineString(vec![
            DVec2::new(0.0, y),
            DVec2::new(100.0, y),
        ]));
        state.styles.assign_default(id, GeometryClass::Line);
        if let Some(feature) = state.source.get(id) {
            state.layers.add_layer_from_feature(feature, &state.styles);
        }
        id
    }

    #[test]
    fn primitives_follow_layer_order() {
        let mut state = AppState::new();
        state.view.set_resolution(1.0);
        let a = add_line(&mut state, 0.0);
        let b = add_line(&mut state, 10.0);

        let scene = build(&mut state);
        assert_eq!(scene.primitives.first().and_then(|p| p.feature_id), Some(a));
        assert_eq!(scene.primitives.last().and_then(|p| p.feature_id), Some(b));

        state.layers.dispatch(LayerAction::ReorderLayers(vec![
            format!("layer-{b}"),
            format!("layer-{a}"),
        ]));
        let scene = build(&mut state);
        assert_eq!(scene.primitives.first().and_then(|p| p.feature_id), Some(b));
        assert_eq!(scene.revision, state.source.revision());
    }

    #[test]
    fn hidden_layer_is_not_drawn() {
        let mut state = AppState::new();
        state.view.set_resolution(1.0);
        let a = add_line(&mut state, 0.0);

        state
            .layers
            .dispatch(LayerAction::ToggleLayerVisibility(format!("layer-{a}")));
        state.layers.sync_feature_visibility(&mut state.source);

        assert!(build(&mut state).primitives.is_empty());
    }
}
