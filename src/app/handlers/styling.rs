//! Handler für den Style-Editor: Stile anwenden, kopieren, Paint-Layer.
//!
//! Bearbeitet wird immer der Style des ersten selektierten Features; das
//! Ergebnis geht als eigene Kopie an alle selektierten Features.

use crate::app::layer_registry::{layer_id_for, LayerAction, LayerPatch};
use crate::app::state::NoticeLevel;
use crate::app::AppState;
use crate::core::{ArrowConfig, EditorError, FeatureId, FeatureStyle, StyleLayer};

fn selected_ids(state: &AppState) -> Result<Vec<FeatureId>, EditorError> {
    let ids: Vec<FeatureId> = state
        .selection
        .ids()
        .iter()
        .copied()
        .filter(|id| state.source.contains(*id))
        .collect();
    if ids.is_empty() {
        return Err(EditorError::NoFeaturesSelected);
    }
    Ok(ids)
}

/// Style des ersten selektierten Features (Typ-Standard ohne Eintrag).
pub(crate) fn current_style(state: &AppState) -> Result<FeatureStyle, EditorError> {
    let id = state
        .primary_selection()
        .ok_or(EditorError::NoFeaturesSelected)?;
    let feature = state.source.get(id).ok_or(EditorError::NoFeaturesSelected)?;
    Ok(state
        .styles
        .get_or_default(id, feature.geometry.class())
        .into_owned())
}

/// Schreibt den Style in Tabelle und Layer-Spiegel (ein Undo-Schritt).
pub(crate) fn assign_style(state: &mut AppState, ids: &[FeatureId], style: &FeatureStyle) {
    state.record_undo_snapshot();
    for id in ids {
        state.styles.set(*id, style);
        state.layers.dispatch(LayerAction::UpdateLayer {
            id: layer_id_for(*id),
            patch: LayerPatch {
                style: Some(style.clone()),
                ..LayerPatch::default()
            },
        });
    }
    state.source.changed();
}

/// Wendet einen Style auf alle selektierten Features an.
pub fn apply_style(state: &mut AppState, style: &FeatureStyle) {
    let result = style.validate().and_then(|_| selected_ids(state));
    let Some(ids) = state.ui.report(result) else {
        return;
    };
    assign_style(state, &ids, style);
    log::info!("Style auf {} Feature(s) angewendet", ids.len());
}

/// Parst Style-JSON und wendet es an. Ungültiges JSON ändert nichts.
pub fn apply_json(state: &mut AppState, json: &str) {
    let Some(style) = state.ui.report(FeatureStyle::from_json(json)) else {
        return;
    };
    apply_style(state, &style);
}

/// Legt den Style der Selektion als JSON in die Zwischenablage.
pub fn copy_style(state: &mut AppState) {
    let result = current_style(state).and_then(|s| s.to_json_pretty());
    let Some(json) = state.ui.report(result) else {
        return;
    };
    state.ui.clipboard_text = Some(json);
    state.ui.notify(NoticeLevel::Info, "Style kopiert");
}

/// Fügt Style-JSON aus der Zwischenablage ein.
pub fn paste_style(state: &mut AppState, clipboard: Result<String, String>) {
    let Some(json) = state.ui.report(clipboard.map_err(EditorError::Clipboard)) else {
        return;
    };
    apply_json(state, &json);
}

/// Ändert den aktuellen Style und verteilt ihn auf die Selektion.
fn edit_current_style(state: &mut AppState, edit: impl FnOnce(&mut FeatureStyle) -> bool) {
    let result = current_style(state).and_then(|s| selected_ids(state).map(|ids| (s, ids)));
    let Some((mut style, ids)) = state.ui.report(result) else {
        return;
    };
    if !edit(&mut style) {
        log::debug!("Style-Bearbeitung ohne Änderung");
        return;
    }
    if state.ui.report(style.validate()).is_none() {
        return;
    }
    assign_style(state, &ids, &style);
}

/// Hängt einen Paint-Layer aus der Vorlage an.
pub fn add_paint_layer(state: &mut AppState) {
    edit_current_style(state, |style| {
        style.push_template_layer();
        true
    });
}

/// Entfernt einen Paint-Layer (der letzte bleibt).
pub fn remove_paint_layer(state: &mut AppState, layer_id: &str) {
    edit_current_style(state, |style| style.remove_layer(layer_id));
}

/// Verschiebt einen Paint-Layer um eine Position.
pub fn move_paint_layer(state: &mut AppState, layer_id: &str, up: bool) {
    edit_current_style(state, |style| style.move_layer(layer_id, up));
}

/// Ersetzt den Paint-Layer mit gleicher ID.
pub fn update_paint_layer(state: &mut AppState, layer: StyleLayer) {
    edit_current_style(state, |style| {
        match style.layers.iter_mut().find(|l| l.id == layer.id) {
            Some(slot) => {
                *slot = layer;
                true
            }
            None => false,
        }
    });
}

/// Setzt die Pfeil-Konfiguration.
pub fn set_arrows(state: &mut AppState, arrows: ArrowConfig) {
    edit_current_style(state, |style| {
        if style.arrows == arrows {
            return false;
        }
        style.arrows = arrows;
        true
    });
}
