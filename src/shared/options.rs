//! Zentrale Konfiguration für den Vector Style Editor.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use crate::core::SplineOptions;
use serde::{Deserialize, Serialize};

// ── Ansicht ─────────────────────────────────────────────────────────

/// Zoomstufe beim Start.
pub const DEFAULT_ZOOM: f64 = 2.0;
/// Rand in Pixeln beim Einpassen importierter Daten.
pub const FIT_PADDING_PX: f64 = 50.0;

// ── Level of Detail ────────────────────────────────────────────────

/// Auflösung (Meter/Pixel), ab der vereinfacht gezeichnet wird.
pub const LOD_THRESHOLD: f64 = 100.0;

// ── Interaktion ─────────────────────────────────────────────────────

/// Pick-Toleranz für Features in Screen-Pixeln.
pub const HIT_TOLERANCE_PX: f64 = 6.0;
/// Greif-Radius für Stützpunkte und Move-Handle in Screen-Pixeln.
pub const VERTEX_TOLERANCE_PX: f64 = 10.0;
/// Entprellung der Selektions-Synchronisation in Millisekunden.
pub const SELECTION_SYNC_DEBOUNCE_MS: u64 = 50;
/// Mindest-Zugweite in Pixeln, ab der ein Klick als Ziehen gilt.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

// ── Verlauf ─────────────────────────────────────────────────────────

/// Maximale Anzahl Undo-Schritte.
pub const UNDO_MAX_DEPTH: usize = 50;

// ── SVG-Import ──────────────────────────────────────────────────────

/// Längengrad, um den importierte SVGs zentriert werden.
pub const SVG_ORIGIN_LON: f64 = 121.505639;
/// Breitengrad, um den importierte SVGs zentriert werden.
pub const SVG_ORIGIN_LAT: f64 = -30.777457;
/// Ausdehnung eines importierten SVGs in Grad.
pub const SVG_EXTENT_DEG: f64 = 0.01;

/// Vereinfachter Style für die LOD-Darstellung.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedStyle {
    /// Globale Strichfarbe (CSS)
    pub stroke_color: String,
    /// Strichbreite in Pixeln (gilt auch im automatischen Farbmodus)
    pub stroke_width: f64,
    /// Globale Füllfarbe (CSS)
    pub fill_color: String,
}

impl Default for SimplifiedStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#3388ff".to_string(),
            stroke_width: 2.0,
            fill_color: "rgba(51, 136, 255, 0.3)".to_string(),
        }
    }
}

/// Einstellungen der Level-of-Detail-Vereinfachung.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomSettings {
    /// LOD aktiv
    pub enabled: bool,
    /// Auflösungsgrenze (Meter/Pixel); darüber wird vereinfacht
    pub threshold: f64,
    /// Farbe aus dem ersten Paint-Layer statt globaler Farbe
    pub automatic_color: bool,
    /// Vereinfachter Style
    #[serde(default)]
    pub style: SimplifiedStyle,
    /// Start-Zoomstufe
    pub default_zoom: f64,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: LOD_THRESHOLD,
            automatic_color: true,
            style: SimplifiedStyle::default(),
            default_zoom: DEFAULT_ZOOM,
        }
    }
}

/// SVG-Import: Zielposition und Ausdehnung.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvgImportOptions {
    /// Längengrad des Zentrums
    pub origin_lon: f64,
    /// Breitengrad des Zentrums
    pub origin_lat: f64,
    /// Ausdehnung in Grad (Breite = Höhe)
    pub extent_deg: f64,
    /// Spline-Parameter für geschwungene Pfade
    #[serde(default = "default_svg_spline")]
    pub spline: SplineOptions,
}

fn default_svg_spline() -> SplineOptions {
    SplineOptions {
        points_per_seg: 8,
        ..SplineOptions::default()
    }
}

impl Default for SvgImportOptions {
    fn default() -> Self {
        Self {
            origin_lon: SVG_ORIGIN_LON,
            origin_lat: SVG_ORIGIN_LAT,
            extent_deg: SVG_EXTENT_DEG,
            spline: default_svg_spline(),
        }
    }
}

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `vector_style_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorOptions {
    // ── Level of Detail ─────────────────────────────────────────
    /// LOD-Einstellungen
    #[serde(default)]
    pub zoom: ZoomSettings,

    // ── Interaktion ─────────────────────────────────────────────
    /// Pick-Toleranz für Features in Screen-Pixeln
    pub hit_tolerance_px: f64,
    /// Greif-Radius für Stützpunkte und Move-Handle in Screen-Pixeln
    pub vertex_tolerance_px: f64,
    /// Mindest-Zugweite, ab der ein Klick als Ziehen gilt
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold_px: f64,
    /// Entprellung der Selektions-Synchronisation (ms)
    pub selection_sync_debounce_ms: u64,

    // ── Werkzeuge ───────────────────────────────────────────────
    /// Spline-Parameter neuer Bezier-Kurven
    #[serde(default)]
    pub bezier_spline: SplineOptions,

    // ── Verlauf ─────────────────────────────────────────────────
    /// Maximale Undo-Tiefe
    pub undo_max_depth: usize,

    // ── Import ──────────────────────────────────────────────────
    /// SVG-Import
    #[serde(default)]
    pub svg_import: SvgImportOptions,
    /// Rand beim Einpassen importierter Daten (Pixel)
    #[serde(default = "default_fit_padding")]
    pub fit_padding_px: f64,
}

fn default_drag_threshold() -> f64 {
    DRAG_THRESHOLD_PX
}

fn default_fit_padding() -> f64 {
    FIT_PADDING_PX
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            zoom: ZoomSettings::default(),

            hit_tolerance_px: HIT_TOLERANCE_PX,
            vertex_tolerance_px: VERTEX_TOLERANCE_PX,
            drag_threshold_px: DRAG_THRESHOLD_PX,
            selection_sync_debounce_ms: SELECTION_SYNC_DEBOUNCE_MS,

            bezier_spline: SplineOptions::default(),

            undo_max_depth: UNDO_MAX_DEPTH,

            svg_import: SvgImportOptions::default(),
            fit_padding_px: FIT_PADDING_PX,
        }
    }
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("vector_style_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("vector_style_editor.toml")
    }
}
