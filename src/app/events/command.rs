use crate::app::state::NoticeLevel;
use crate::app::tools::{EditorTool, InputEvent};
use crate::core::{ArrowConfig, FeatureStyle, StyleLayer};
use crate::shared::ZoomSettings;

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone)]
pub enum AppCommand {
    // ── Werkzeuge ──
    /// Eingabe an das aktive Werkzeug
    ToolInput { event: InputEvent },
    /// Werkzeug wechseln
    SetTool { tool: EditorTool },

    // ── Verlauf ──
    /// Undo
    Undo,
    /// Redo
    Redo,
    /// Verlauf verwerfen
    ClearHistory,

    // ── Styling ──
    /// Style auf alle selektierten Features anwenden (eigene Kopien)
    ApplyStyle { style: FeatureStyle },
    /// Style aus JSON anwenden
    ApplyStyleJson { json: String },
    /// Style des ersten selektierten Features kopieren
    CopyStyle,
    /// Style aus der Zwischenablage einfügen
    PasteStyle { clipboard: Result<String, String> },
    /// Paint-Layer anhängen
    AddPaintLayer,
    /// Paint-Layer entfernen
    RemovePaintLayer { layer_id: String },
    /// Paint-Layer verschieben
    MovePaintLayer { layer_id: String, up: bool },
    /// Paint-Layer ersetzen (gleiche ID)
    UpdatePaintLayer { layer: StyleLayer },
    /// Pfeil-Konfiguration setzen
    SetArrows { arrows: ArrowConfig },

    // ── Presets ──
    /// Session-Preset speichern
    SavePreset { name: String },
    /// Preset anwenden
    ApplyPreset { name: String },
    /// Session-Preset löschen
    DeletePreset { name: String },
    /// Datei-Presets laden
    LoadPresetFile { path: String },

    // ── Import ──
    /// SVG importieren
    ImportSvg { text: String },
    /// GeoJSON importieren
    ImportGeoJson { text: String },
    /// Hinweis ohne Zustandsänderung
    ReportNotice { level: NoticeLevel, message: String },

    // ── Layer-Verwaltung ──
    /// Panel-Selektion → Karten-Selektion
    SelectLayers { layer_ids: Vec<String> },
    /// Layer-Sichtbarkeit umschalten
    ToggleLayerVisibility { layer_id: String },
    /// Layer-Sperre umschalten
    ToggleLayerLock { layer_id: String },
    /// Layer umbenennen
    RenameLayer { layer_id: String, name: String },
    /// Layer samt Feature löschen
    DeleteLayer { layer_id: String },
    /// Reihenfolge neu vergeben
    ReorderLayers { layer_ids: Vec<String> },
    /// Layer in Gruppe verschieben
    MoveLayerToGroup {
        layer_id: String,
        group_id: Option<String>,
    },
    /// Gruppe anlegen
    CreateGroup { name: Option<String> },
    /// Gruppe umbenennen
    RenameGroup { group_id: String, name: String },
    /// Gruppe ein-/ausklappen
    ToggleGroupCollapsed { group_id: String },
    /// Gruppen-Sichtbarkeit umschalten
    ToggleGroupVisibility { group_id: String },
    /// Gruppe löschen
    DeleteGroup { group_id: String },

    // ── Ansicht ──
    /// Ansicht verschieben
    PanView { delta: glam::DVec2 },
    /// Zoomstufe relativ ändern
    ZoomView { delta: f64 },
    /// Viewport-Größe setzen
    SetViewportSize { size: glam::DVec2 },
    /// Auf alle Features einpassen
    FitToFeatures,
    /// LOD-Einstellungen setzen
    SetZoomSettings { settings: ZoomSettings },
}
