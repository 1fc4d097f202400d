//! Handler für Undo/Redo-Operationen.

use super::tools::apply_edit_events;
use crate::app::history::Snapshot;
use crate::app::AppState;

/// Führt einen Undo-Schritt aus, falls vorhanden.
pub fn undo(state: &mut AppState) {
    cancel_gesture(state);
    let current = Snapshot::from_state(state);
    if let Some(prev) = state.history.undo(current) {
        restore(state, prev);
        log::info!("Undo ausgeführt");
    } else {
        log::debug!("Undo: nichts zu tun");
    }
}

/// Führt einen Redo-Schritt aus, falls vorhanden.
pub fn redo(state: &mut AppState) {
    cancel_gesture(state);
    let current = Snapshot::from_state(state);
    if let Some(next) = state.history.redo(current) {
        restore(state, next);
        log::info!("Redo ausgeführt");
    } else {
        log::debug!("Redo: nichts zu tun");
    }
}

/// Verwirft den gesamten Verlauf.
pub fn clear_history(state: &mut AppState) {
    state.history.clear_history();
    log::info!("Undo-Verlauf geleert");
}

fn cancel_gesture(state: &mut AppState) {
    let ((), events) = state.with_tools(|tools, ctx| tools.cancel_gesture(ctx));
    apply_edit_events(state, events);
}

/// Spielt einen Snapshot ein und gleicht abhängige Zustände ab.
///
/// Die Selektion wird dabei verworfen.
fn restore(state: &mut AppState, snapshot: Snapshot) {
    snapshot.restore(&mut state.source, &mut state.styles);
    state.selection.reset(&mut state.source);
    state.source.clear_hover();
    state.layers.reconcile(&state.source, &state.styles);
    state.selection_sync.schedule(state.event_time, Vec::new());
    state.layers.sync_feature_visibility(&mut state.source);
    state.interaction.sync(&state.source, &state.selection);
}
