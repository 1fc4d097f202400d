//! Style-Modell: Paint-Layer, Füllmuster, Pfeile und die JSON-Darstellung.
//!
//! Reine Daten ohne Verhalten. Feldnamen folgen dem JSON-Schema (camelCase).

use super::error::EditorError;
use super::geometry::GeometryClass;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

// ── Füllmuster ──────────────────────────────────────────────────────

/// Musterart einer Flächenfüllung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    /// Nur Vollfarbe
    #[default]
    None,
    /// Parallele Schraffur
    Hatch,
    /// Kreuzschraffur
    Cross,
    /// Gefüllte Punkte
    Dot,
    /// Kreisringe
    Circle,
    /// Quadrate
    Square,
}

/// Konfiguration eines Füllmusters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillPatternConfig {
    /// Musterart
    #[serde(rename = "type")]
    pub kind: PatternType,
    /// Musterfarbe (Hex)
    pub color: String,
    /// Strich-/Punktgröße in Pixeln
    pub size: f64,
    /// Abstand der Wiederholung in Pixeln
    pub spacing: f64,
    /// Drehwinkel in Grad
    pub angle: f64,
}

impl FillPatternConfig {
    /// Kein Muster, mit gegebener Größe/Abstand als Vorbelegung.
    pub fn none(size: f64, spacing: f64) -> Self {
        Self {
            kind: PatternType::None,
            color: "#000000".to_string(),
            size,
            spacing,
            angle: 0.0,
        }
    }
}

impl Default for FillPatternConfig {
    fn default() -> Self {
        Self::none(3.0, 8.0)
    }
}

// ── Paint-Layer ─────────────────────────────────────────────────────

fn default_dash_pattern() -> [f64; 2] {
    [10.0, 5.0]
}

/// Eine Strich/Füll-Konfiguration. Mehrere Layer werden übereinander gemalt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleLayer {
    /// Layer-ID (eindeutig innerhalb eines Styles)
    pub id: String,
    /// Strichfarbe (Hex)
    pub stroke_color: String,
    /// Strichbreite in Pixeln
    pub stroke_width: f64,
    /// Strich-Deckkraft [0, 1]
    pub stroke_opacity: f64,
    /// Füllfarbe (Hex)
    pub fill_color: String,
    /// Füll-Deckkraft [0, 1]
    pub fill_opacity: f64,
    /// Füllmuster
    #[serde(default)]
    pub fill_pattern: FillPatternConfig,
    /// Seitlicher Versatz in Pixeln (nur Linien, positiv = links)
    #[serde(default)]
    pub offset: f64,
    /// Gestrichelte Linie
    #[serde(default)]
    pub dashed: bool,
    /// Strichlänge und Lücke in Pixeln
    #[serde(default = "default_dash_pattern")]
    pub dash_pattern: [f64; 2],
}

static LAYER_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Erzeugt eine neue, prozessweit eindeutige Layer-ID.
pub fn next_layer_id() -> String {
    format!("layer{}", LAYER_COUNTER.fetch_add(1, Ordering::Relaxed))
}

impl StyleLayer {
    /// Vorlage für einen neu hinzugefügten Paint-Layer.
    pub fn template() -> Self {
        Self {
            id: next_layer_id(),
            stroke_color: "#000000".to_string(),
            stroke_width: 2.0,
            stroke_opacity: 1.0,
            fill_color: "#000000".to_string(),
            fill_opacity: 0.4,
            fill_pattern: FillPatternConfig::none(3.0, 8.0),
            offset: 0.0,
            dashed: false,
            dash_pattern: default_dash_pattern(),
        }
    }
}

// ── Pfeile ──────────────────────────────────────────────────────────

/// Pfeilform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowStyle {
    /// Gefülltes Dreieck
    #[default]
    Triangle,
    /// Offener Winkel
    Chevron,
}

/// Pfeil-Dekoration entlang von Linien.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowConfig {
    /// Pfeile aktiv
    pub enabled: bool,
    /// Pfeil am Linienanfang
    pub at_start: bool,
    /// Pfeil am Linienende
    pub at_end: bool,
    /// Wiederholte Pfeile entlang der Linie
    pub along_path: bool,
    /// Pfeilfarbe (Hex)
    pub color: String,
    /// Pfeilgröße in Pixeln
    pub size: f64,
    /// Pfeilform
    pub style: ArrowStyle,
    /// Abstand der Pfeile entlang der Linie in Pixeln
    pub spacing: f64,
}

impl ArrowConfig {
    fn disabled(at_end: bool) -> Self {
        Self {
            enabled: false,
            at_start: false,
            at_end,
            along_path: false,
            color: "#ff0000".to_string(),
            size: 12.0,
            style: ArrowStyle::Triangle,
            spacing: 150.0,
        }
    }
}

impl Default for ArrowConfig {
    fn default() -> Self {
        Self::disabled(false)
    }
}

// ── Feature-Style ───────────────────────────────────────────────────

/// Vollständiger Style eines Features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStyle {
    /// Paint-Layer, unten nach oben
    pub layers: Vec<StyleLayer>,
    /// Pfeil-Konfiguration
    #[serde(default)]
    pub arrows: ArrowConfig,
}

impl FeatureStyle {
    /// Standard-Style für Polygone und Kreise.
    pub fn default_polygon() -> Self {
        Self {
            layers: vec![StyleLayer {
                id: "layer1".to_string(),
                stroke_color: "#0000ff".to_string(),
                stroke_width: 2.0,
                stroke_opacity: 1.0,
                fill_color: "#0000ff".to_string(),
                fill_opacity: 0.5,
                fill_pattern: FillPatternConfig::none(3.0, 8.0),
                offset: 0.0,
                dashed: false,
                dash_pattern: default_dash_pattern(),
            }],
            arrows: ArrowConfig::disabled(false),
        }
    }

    /// Standard-Style für Linien (und Splines).
    pub fn default_line() -> Self {
        Self {
            layers: vec![StyleLayer {
                id: "layer1".to_string(),
                stroke_color: "#0000ff".to_string(),
                stroke_width: 5.0,
                stroke_opacity: 1.0,
                fill_color: "#0000ff".to_string(),
                fill_opacity: 0.4,
                fill_pattern: FillPatternConfig::none(1.0, 5.0),
                offset: 0.0,
                dashed: false,
                dash_pattern: default_dash_pattern(),
            }],
            arrows: ArrowConfig::disabled(true),
        }
    }

    /// Typgerechter Standard-Style.
    pub fn default_for(class: GeometryClass) -> Self {
        match class {
            GeometryClass::Area => Self::default_polygon(),
            GeometryClass::Line | GeometryClass::Point => Self::default_line(),
        }
    }

    /// Breiteste Strichbreite, mindestens 1.
    pub fn max_stroke_width(&self) -> f64 {
        self.layers
            .iter()
            .map(|l| l.stroke_width)
            .fold(1.0, f64::max)
    }

    /// Hängt einen neuen Layer aus der Vorlage oben an.
    pub fn push_template_layer(&mut self) {
        self.layers.push(StyleLayer::template());
    }

    /// Entfernt einen Layer. Der letzte verbleibende Layer bleibt erhalten.
    pub fn remove_layer(&mut self, layer_id: &str) -> bool {
        if self.layers.len() <= 1 {
            return false;
        }
        let before = self.layers.len();
        self.layers.retain(|l| l.id != layer_id);
        self.layers.len() != before
    }

    /// Tauscht einen Layer mit seinem Nachbarn (`up` = Richtung Listenanfang).
    pub fn move_layer(&mut self, layer_id: &str, up: bool) -> bool {
        let Some(index) = self.layers.iter().position(|l| l.id == layer_id) else {
            return false;
        };
        let target = if up {
            match index.checked_sub(1) {
                Some(t) => t,
                None => return false,
            }
        } else {
            index + 1
        };
        if target >= self.layers.len() {
            return false;
        }
        self.layers.swap(index, target);
        true
    }

    /// Prüft Wertebereiche; liefert den ersten Verstoß.
    pub fn validate(&self) -> Result<(), EditorError> {
        if self.layers.is_empty() {
            return Err(EditorError::InvalidStyle(
                "mindestens ein Layer erforderlich".to_string(),
            ));
        }
        for layer in &self.layers {
            let unit = 0.0..=1.0;
            if !unit.contains(&layer.stroke_opacity) || !unit.contains(&layer.fill_opacity) {
                return Err(EditorError::InvalidStyle(format!(
                    "Deckkraft außerhalb [0, 1] in Layer '{}'",
                    layer.id
                )));
            }
            if !layer.stroke_width.is_finite() || layer.stroke_width < 0.0 {
                return Err(EditorError::InvalidStyle(format!(
                    "ungültige Strichbreite in Layer '{}'",
                    layer.id
                )));
            }
            if !layer.offset.is_finite() {
                return Err(EditorError::InvalidStyle(format!(
                    "ungültiger Versatz in Layer '{}'",
                    layer.id
                )));
            }
        }
        Ok(())
    }

    /// Menschenlesbares JSON (eingerückt).
    pub fn to_json_pretty(&self) -> Result<String, EditorError> {
        serde_json::to_string_pretty(self).map_err(|e| EditorError::InvalidStyleJson(e.to_string()))
    }

    /// Liest und validiert einen Style aus JSON.
    pub fn from_json(text: &str) -> Result<Self, EditorError> {
        let style: FeatureStyle =
            serde_json::from_str(text).map_err(|e| EditorError::InvalidStyleJson(e.to_string()))?;
        style.validate()?;
        Ok(style)
    }
}
