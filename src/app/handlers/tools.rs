//! Handler für Werkzeug-Eingaben und die Auswertung ihrer Folgen.

use crate::app::tools::{EditEvent, EditorTool, InputEvent};
use crate::app::AppState;
use std::time::Instant;

/// Reicht ein Eingabe-Ereignis an das aktive Werkzeug weiter.
pub fn input(state: &mut AppState, event: InputEvent) {
    let ((), events) = state.with_tools(|tools, ctx| tools.handle_event(ctx, &event));
    apply_edit_events(state, events);
}

/// Wechselt das Werkzeug (Selektion wird geleert).
pub fn set_tool(state: &mut AppState, tool: EditorTool) {
    let (changed, events) = state.with_tools(|tools, ctx| tools.set_tool(ctx, tool));
    if !changed {
        log::debug!("Werkzeug '{}' bereits aktiv", tool.name());
    }
    apply_edit_events(state, events);
}

/// Überträgt Werkzeug-Folgen auf Layer-Verwaltung und Selektions-Sync.
pub(crate) fn apply_edit_events(state: &mut AppState, events: Vec<EditEvent>) {
    if events.is_empty() {
        return;
    }
    for event in events {
        match event {
            EditEvent::FeatureAdded(id) => {
                if let Some(feature) = state.source.get(id) {
                    let layer_id = state.layers.add_layer_from_feature(feature, &state.styles);
                    log::debug!("Layer '{}' für Feature {} angelegt", layer_id, id);
                }
            }
            EditEvent::FeatureRemoved(id) => state.layers.remove_layer_for_feature(id),
            EditEvent::GeometryChanged(id) => {
                log::debug!("Geometrie von Feature {} geändert", id);
            }
            EditEvent::SelectionChanged => {
                let ids = state.selection.to_vec();
                state.selection_sync.schedule(state.event_time, ids);
            }
        }
    }
    state.layers.sync_feature_visibility(&mut state.source);
    state.interaction.sync(&state.source, &state.selection);
}

/// Gibt eine fällige Selektion an die Layer-Verwaltung weiter.
///
/// Gibt `true` zurück, wenn die Layer-Selektion aktualisiert wurde.
pub fn flush_selection_sync(state: &mut AppState, now: Instant) -> bool {
    let Some(ids) = state.selection_sync.poll(now) else {
        return false;
    };
    state.layers.select_layers_from_features(&ids);
    log::debug!("Layer-Selektion synchronisiert ({} Features)", ids.len());
    true
}
