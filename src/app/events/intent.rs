use crate::app::tools::{EditorTool, InputEvent, Key, Modifiers};
use crate::core::{ArrowConfig, FeatureStyle, StyleLayer};
use crate::shared::ZoomSettings;

/// App-Intent und App-Command Events.
/// Intents sind Eingaben aus UI/System ohne direkte Mutationslogik.
#[derive(Debug, Clone)]
pub enum AppIntent {
    // ── Karte & Werkzeuge ──
    /// Zeiger-/Klick-Ereignis auf der Karte (Kartenkoordinaten)
    MapInput { event: InputEvent },
    /// Taste gedrückt (global)
    KeyPressed { key: Key, modifiers: Modifiers },
    /// Werkzeug in der Toolbar gewählt
    ToolSelected { tool: EditorTool },

    // ── Verlauf ──
    /// Undo: Letzte Aktion rückgängig machen
    UndoRequested,
    /// Redo: Rückgängig gemachte Aktion wiederherstellen
    RedoRequested,
    /// Verlauf verwerfen
    ClearHistoryRequested,

    // ── Style-Editor ──
    /// Kompletter Style für die Selektion übernommen
    StyleEdited { style: FeatureStyle },
    /// Style-JSON aus dem Textfeld anwenden
    StyleJsonApplied { json: String },
    /// Style der Selektion kopieren
    CopyStyleRequested,
    /// Inhalt der Zwischenablage einfügen (Fehler: Zugriff verweigert)
    PasteStyleRequested { clipboard: Result<String, String> },
    /// Neuen Paint-Layer anhängen
    PaintLayerAdded,
    /// Paint-Layer entfernen
    PaintLayerRemoved { layer_id: String },
    /// Paint-Layer eine Position nach oben/unten
    PaintLayerMoved { layer_id: String, up: bool },
    /// Paint-Layer geändert
    PaintLayerEdited { layer: StyleLayer },
    /// Pfeil-Konfiguration geändert
    ArrowsEdited { arrows: ArrowConfig },

    // ── Presets ──
    /// Style der Selektion als Preset speichern
    PresetSaveRequested { name: String },
    /// Preset auf die Selektion anwenden
    PresetApplied { name: String },
    /// Session-Preset löschen
    PresetDeleteRequested { name: String },
    /// Preset-Datei ausgewählt
    PresetFileSelected { path: String },

    // ── Import ──
    /// Datei auf die Karte gezogen (Inhalt bereits gelesen)
    FileDropped {
        name: String,
        contents: Result<String, String>,
    },
    /// SVG-Text importieren
    SvgImportRequested { text: String },
    /// GeoJSON-Text importieren
    GeoJsonImportRequested { text: String },

    // ── Layer-Panel ──
    /// Layer im Panel selektiert
    LayersSelected { layer_ids: Vec<String> },
    /// Sichtbarkeit eines Layers umschalten
    LayerVisibilityToggled { layer_id: String },
    /// Sperre eines Layers umschalten
    LayerLockToggled { layer_id: String },
    /// Layer umbenennen
    LayerRenamed { layer_id: String, name: String },
    /// Layer löschen (inkl. Feature)
    LayerDeleteRequested { layer_id: String },
    /// Neue Reihenfolge per Drag & Drop
    LayersReordered { layer_ids: Vec<String> },
    /// Layer in Gruppe verschieben (`None` = lösen)
    LayerMovedToGroup {
        layer_id: String,
        group_id: Option<String>,
    },
    /// Neue Gruppe anlegen
    GroupCreateRequested { name: Option<String> },
    /// Gruppe umbenennen
    GroupRenamed { group_id: String, name: String },
    /// Gruppe ein-/ausklappen
    GroupCollapseToggled { group_id: String },
    /// Sichtbarkeit einer Gruppe umschalten
    GroupVisibilityToggled { group_id: String },
    /// Gruppe löschen (Layer bleiben)
    GroupDeleteRequested { group_id: String },

    // ── Ansicht ──
    /// Ansicht verschieben (Karteneinheiten)
    ViewPanned { delta: glam::DVec2 },
    /// Zoomstufe relativ ändern
    ViewZoomed { delta: f64 },
    /// Viewport-Größe hat sich geändert
    ViewportResized { size: glam::DVec2 },
    /// Ansicht auf alle Features einpassen
    FitToFeaturesRequested,
    /// LOD-Einstellungen geändert
    ZoomSettingsChanged { settings: ZoomSettings },
}
