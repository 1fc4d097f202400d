//! Zeichen-Primitive: Ausgabe des Style-Resolvers, Eingabe des Hosts.

use crate::core::{ArrowStyle, FeatureId, Geometry, Rgba};
use glam::DVec2;
use std::collections::HashMap;
use std::sync::Arc;

use super::pattern::PatternTile;

/// Logische Layer-Reihenfolge je Feature (aus der Layer-Verwaltung).
pub type LayerOrderTable = HashMap<FeatureId, usize>;

// ── Z-Ordnung innerhalb eines Features ──────────────────────────────

/// Halo unter allem anderen.
pub const Z_HALO: i32 = 0;
/// Stützpunkt-Marker über dem Halo.
pub const Z_VERTEX: i32 = 1;
/// Basis der Paint-Layer (`Z_PAINT_BASE + Layer-Index`).
pub const Z_PAINT_BASE: i32 = 10;
/// Mindest-Z der Pfeile.
pub const Z_ARROW_MIN: i32 = 100;

/// Strichdefinition.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    /// Farbe inkl. Deckkraft
    pub color: Rgba,
    /// Breite in Pixeln
    pub width: f64,
    /// Strich/Lücke in Pixeln (None = durchgezogen)
    pub line_dash: Option<[f64; 2]>,
}

impl StrokeStyle {
    /// Durchgezogener Strich.
    pub fn solid(color: Rgba, width: f64) -> Self {
        Self {
            color,
            width,
            line_dash: None,
        }
    }
}

/// Flächenfüllung.
#[derive(Debug, Clone, PartialEq)]
pub enum FillStyle {
    /// Vollfarbe
    Solid(Rgba),
    /// Musterkachel über einer Hintergrundfarbe
    Pattern {
        /// Musterkachel
        tile: PatternTile,
        /// Hintergrund unter dem Muster
        background: Rgba,
    },
}

/// Punktsymbol (Stützpunkte, Pfeile).
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    /// Kreis mit Rand
    Circle {
        /// Radius in Pixeln
        radius: f64,
        /// Füllfarbe
        fill: Rgba,
        /// Randstrich
        stroke: StrokeStyle,
    },
    /// Pfeil-Icon (20×20-Vorlage, skaliert)
    Arrow {
        /// Form
        style: ArrowStyle,
        /// Farbe (Hex aus dem Style)
        color: String,
        /// Drehung in Radiant (mathematisch, gegen den Uhrzeigersinn)
        rotation: f64,
        /// Skalierung der 20px-Vorlage
        scale: f64,
    },
}

/// Art eines Primitivs (für Tests, Debugging und Hosts).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// Selektions- oder Hover-Halo
    Halo,
    /// Stützpunkt-Marker
    Vertex,
    /// Paint-Layer mit Index
    Paint(usize),
    /// Pfeil
    Arrow,
    /// Vereinfachte LOD-Darstellung
    Simplified,
    /// Temporäre Werkzeug-Vorschau
    Overlay,
}

/// Ein konkretes Zeichen-Primitiv.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawPrimitive {
    /// Herkunfts-Feature (None bei Werkzeug-Overlays)
    pub feature_id: Option<FeatureId>,
    /// Zu zeichnende Geometrie
    pub geometry: Arc<Geometry>,
    /// Strich
    pub stroke: Option<StrokeStyle>,
    /// Füllung (nur Flächen)
    pub fill: Option<FillStyle>,
    /// Punktsymbol (nur Punkt-Geometrien)
    pub symbol: Option<Symbol>,
    /// Z-Ordnung innerhalb des Features
    pub z_index: i32,
    /// Logische Layer-Reihenfolge des Features
    pub layer_order: usize,
    /// Art des Primitivs
    pub kind: PrimitiveKind,
}

impl DrawPrimitive {
    /// Punkt-Primitiv mit Symbol.
    pub fn point(
        feature_id: Option<FeatureId>,
        position: DVec2,
        symbol: Symbol,
        z_index: i32,
        kind: PrimitiveKind,
    ) -> Self {
        Self {
            feature_id,
            geometry: Arc::new(Geometry::Point(position)),
            stroke: None,
            fill: None,
            symbol: Some(symbol),
            z_index,
            layer_order: 0,
            kind,
        }
    }
}

/// Read-only Daten für einen Render-Frame.
#[derive(Debug, Clone, Default)]
pub struct RenderScene {
    /// Feature-Primitive, sortiert nach (Layer-Reihenfolge, Z)
    pub primitives: Vec<DrawPrimitive>,
    /// Werkzeug-Overlays (über allen Features)
    pub overlays: Vec<DrawPrimitive>,
    /// Auflösung, mit der aufgelöst wurde
    pub resolution: f64,
    /// Änderungszähler der Feature-Quelle
    pub revision: u64,
}

impl RenderScene {
    /// Anzahl aller Primitive inkl. Overlays.
    pub fn len(&self) -> usize {
        self.primitives.len() + self.overlays.len()
    }

    /// `true` wenn nichts zu zeichnen ist.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty() && self.overlays.is_empty()
    }

    /// Primitive eines Features.
    pub fn for_feature(&self, id: FeatureId) -> impl Iterator<Item = &DrawPrimitive> {
        self.primitives
            .iter()
            .filter(move |p| p.feature_id == Some(id))
    }
}
