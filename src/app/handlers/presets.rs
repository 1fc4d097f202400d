//! Handler für Style-Presets.

use super::styling;
use crate::app::state::NoticeLevel;
use crate::app::AppState;
use crate::core::EditorError;
use std::path::Path;

/// Speichert den Style der Selektion als Session-Preset.
pub fn save(state: &mut AppState, name: &str) {
    let style = styling::current_style(state);
    let Some(style) = state.ui.report(style) else {
        return;
    };
    let result = state.presets.save(name, &style);
    if state.ui.report(result).is_some() {
        state
            .ui
            .notify(NoticeLevel::Info, format!("Preset '{}' gespeichert", name.trim()));
    }
}

/// Wendet ein Preset auf die Selektion an (eigene Kopie je Feature).
pub fn apply(state: &mut AppState, name: &str) {
    let style = state
        .presets
        .get(name)
        .map(|p| p.style.clone())
        .ok_or_else(|| EditorError::PresetNotFound(name.to_string()));
    let Some(style) = state.ui.report(style) else {
        return;
    };
    styling::apply_style(state, &style);
}

/// Löscht ein Session-Preset; Datei-Presets sind geschützt.
pub fn delete(state: &mut AppState, name: &str) {
    let result = state.presets.delete(name);
    if state.ui.report(result).is_some() {
        log::info!("Preset '{}' gelöscht", name);
    }
}

/// Lädt Datei-Presets (schreibgeschützt).
pub fn load_file(state: &mut AppState, path: &str) {
    match state.presets.load_file(Path::new(path)) {
        Ok(count) => state
            .ui
            .notify(NoticeLevel::Info, format!("{} Presets geladen", count)),
        Err(e) => state.ui.notify(NoticeLevel::Error, format!("{:#}", e)),
    }
}
