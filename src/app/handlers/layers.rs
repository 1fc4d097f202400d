//! Handler für das Layer-Panel: Layer, Gruppen, Sichtbarkeit, Reihenfolge.

use crate::app::layer_registry::{GroupId, GroupPatch, LayerAction, LayerId, LayerPatch};
use crate::app::{AppState, NoticeLevel};

/// Layer-Selektion → Karten-Selektion.
///
/// Die Karten-Selektion wird direkt gesetzt, ohne Rückmeldung an das Panel.
pub fn select_layers(state: &mut AppState, layer_ids: Vec<LayerId>) {
    let feature_ids = state.layers.feature_ids_for_layers(&layer_ids);
    state
        .layers
        .dispatch(LayerAction::SetSelectedLayers(layer_ids));
    if state.selection.replace(&mut state.source, &feature_ids) {
        state.interaction.sync(&state.source, &state.selection);
    }
}

/// Schaltet die Sichtbarkeit eines Layers um.
pub fn toggle_visibility(state: &mut AppState, layer_id: LayerId) {
    state
        .layers
        .dispatch(LayerAction::ToggleLayerVisibility(layer_id));
    state.layers.sync_feature_visibility(&mut state.source);
}

/// Sperrt bzw. entsperrt einen Layer.
pub fn toggle_lock(state: &mut AppState, layer_id: LayerId) {
    let Some(locked) = state.layers.layer(&layer_id).map(|l| l.locked) else {
        log::debug!("Layer '{}' unbekannt", layer_id);
        return;
    };
    state.layers.dispatch(LayerAction::UpdateLayer {
        id: layer_id,
        patch: LayerPatch {
            locked: Some(!locked),
            ..LayerPatch::default()
        },
    });
}

/// Benennt einen Layer um. Leere Namen werden ignoriert.
pub fn rename(state: &mut AppState, layer_id: LayerId, name: String) {
    let name = name.trim();
    if name.is_empty() {
        return;
    }
    state.layers.dispatch(LayerAction::UpdateLayer {
        id: layer_id,
        patch: LayerPatch {
            name: Some(name.to_string()),
            ..LayerPatch::default()
        },
    });
}

/// Löscht einen Layer samt Feature und Style (ein Undo-Schritt).
pub fn delete(state: &mut AppState, layer_id: LayerId) {
    let Some((feature_id, locked)) = state
        .layers
        .layer(&layer_id)
        .map(|l| (l.feature_id, l.locked))
    else {
        log::debug!("Layer '{}' unbekannt", layer_id);
        return;
    };
    if locked {
        state.ui.notify(
            NoticeLevel::Warning,
            format!("Layer '{}' ist gesperrt", layer_id),
        );
        return;
    }
    state.record_undo_snapshot();
    state.source.remove(feature_id);
    state.styles.remove(feature_id);
    if state.selection.remove(&mut state.source, feature_id) {
        let ids = state.selection.to_vec();
        state.selection_sync.schedule(state.event_time, ids);
    }
    state
        .layers
        .dispatch(LayerAction::DeleteLayer(layer_id.clone()));
    state.interaction.sync(&state.source, &state.selection);
    log::info!("Layer '{}' gelöscht", layer_id);
}

/// Vergibt die Reihenfolge neu (Index = Render-Reihenfolge).
pub fn reorder(state: &mut AppState, layer_ids: Vec<LayerId>) {
    state
        .layers
        .dispatch(LayerAction::ReorderLayers(layer_ids));
}

/// Verschiebt einen Layer in eine Gruppe (`None` = lösen).
pub fn move_to_group(state: &mut AppState, layer_id: LayerId, group_id: Option<GroupId>) {
    state
        .layers
        .dispatch(LayerAction::MoveToGroup { layer_id, group_id });
}

/// Legt eine leere Gruppe an.
pub fn create_group(state: &mut AppState, name: Option<String>) {
    let id = state.layers.create_group(name);
    log::info!("Gruppe '{}' angelegt", id);
}

/// Benennt eine Gruppe um. Leere Namen werden ignoriert.
pub fn rename_group(state: &mut AppState, group_id: GroupId, name: String) {
    let name = name.trim();
    if name.is_empty() {
        return;
    }
    state.layers.dispatch(LayerAction::UpdateGroup {
        id: group_id,
        patch: GroupPatch {
            name: Some(name.to_string()),
            ..GroupPatch::default()
        },
    });
}

/// Klappt eine Gruppe ein oder aus.
pub fn toggle_group_collapsed(state: &mut AppState, group_id: GroupId) {
    let Some(collapsed) = state.layers.group(&group_id).map(|g| g.collapsed) else {
        return;
    };
    state.layers.dispatch(LayerAction::UpdateGroup {
        id: group_id,
        patch: GroupPatch {
            collapsed: Some(!collapsed),
            ..GroupPatch::default()
        },
    });
}

/// Schaltet eine Gruppe samt Mitgliedern sichtbar/unsichtbar.
pub fn toggle_group_visibility(state: &mut AppState, group_id: GroupId) {
    state
        .layers
        .dispatch(LayerAction::ToggleGroupVisibility(group_id));
    state.layers.sync_feature_visibility(&mut state.source);
}

/// Löscht eine Gruppe; ihre Layer bleiben ungruppiert erhalten.
pub fn delete_group(state: &mut AppState, group_id: GroupId) {
    state
        .layers
        .dispatch(LayerAction::DeleteGroup(group_id.clone()));
    log::info!("Gruppe '{}' gelöscht", group_id);
}
