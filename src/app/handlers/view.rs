//! Handler für Kartenansicht und Zoom-Einstellungen.

use crate::app::AppState;
use crate::shared::ZoomSettings;
use glam::DVec2;

/// Verschiebt die Ansicht um ein Delta in Karteneinheiten.
pub fn pan(state: &mut AppState, delta: DVec2) {
    state.view.pan(delta);
}

/// Ändert die Zoomstufe relativ.
pub fn zoom(state: &mut AppState, delta: f64) {
    state.view.zoom_by(delta);
    log::debug!("Zoom: {:.2}", state.view.zoom);
}

/// Aktualisiert die Viewport-Größe in Pixeln.
pub fn set_viewport_size(state: &mut AppState, size: DVec2) {
    state.view.viewport_size = size;
}

/// Passt die Ansicht an alle Features an.
pub fn fit_to_features(state: &mut AppState) {
    match state.source.extent() {
        Some(extent) => state.view.fit(&extent, state.options.fit_padding_px),
        None => log::debug!("Einpassen: keine Features"),
    }
}

/// Übernimmt neue LOD-Einstellungen und verwirft den Resolver-Cache.
pub fn set_zoom_settings(state: &mut AppState, settings: ZoomSettings) {
    state.options.zoom = settings;
    state.resolver.invalidate();
    log::info!(
        "Zoom-Einstellungen: aktiv={}, Schwelle={}",
        state.options.zoom.enabled,
        state.options.zoom.threshold
    );
}
