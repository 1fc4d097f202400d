//! Fehlertypen für Benutzereingaben und fehlende Erweiterungen.

use thiserror::Error;

/// Fehler, die der Editor als Hinweis an den Benutzer meldet.
///
/// Der Zustand bleibt bei all diesen Fehlern unverändert.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EditorError {
    /// Style-JSON ist syntaktisch kaputt
    #[error("ungültiges Style-JSON: {0}")]
    InvalidStyleJson(String),
    /// Style-JSON ist gültig, verletzt aber Wertebereiche
    #[error("ungültiger Style: {0}")]
    InvalidStyle(String),
    /// Preset ohne Namen
    #[error("Preset-Name darf nicht leer sein")]
    EmptyPresetName,
    /// Preset-Name bereits vergeben
    #[error("Preset '{0}' existiert bereits")]
    DuplicatePresetName(String),
    /// Preset nicht gefunden
    #[error("Preset '{0}' nicht gefunden")]
    PresetNotFound(String),
    /// Datei-Presets sind schreibgeschützt
    #[error("Preset '{0}' kann nicht gelöscht werden")]
    PresetNotDeletable(String),
    /// Aktion braucht eine Selektion
    #[error("keine Features selektiert")]
    NoFeaturesSelected,
    /// SVG konnte nicht gelesen werden
    #[error("SVG-Import fehlgeschlagen: {0}")]
    SvgImport(String),
    /// GeoJSON konnte nicht gelesen werden
    #[error("GeoJSON-Import fehlgeschlagen: {0}")]
    GeoJsonImport(String),
    /// Import lieferte keine Features
    #[error("keine Features in {0} gefunden")]
    EmptyImport(&'static str),
    /// Zwischenablage nicht verfügbar
    #[error("Zwischenablage nicht lesbar: {0}")]
    Clipboard(String),
    /// Optionale Host-Erweiterung fehlt
    #[error("Erweiterung '{0}' nicht verfügbar")]
    MissingCapability(&'static str),
}
