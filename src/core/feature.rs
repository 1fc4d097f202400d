//! Feature = Geometrie + Laufzeit-Properties.

use super::geometry::Geometry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Eindeutige, stabile Feature-ID (vom `VectorSource` vergeben).
pub type FeatureId = u64;

/// Parameter der Spline-Interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplineOptions {
    /// Spannung (0 = Catmull-Rom, 1 = gerade Verbindungen)
    pub tension: f64,
    /// Zwischenpunkte pro Segment
    pub points_per_seg: usize,
    /// Zwischenpunkte gleichmäßig nach Bogenlänge verteilen
    pub normalize: bool,
}

impl Default for SplineOptions {
    fn default() -> Self {
        Self {
            tension: 0.5,
            points_per_seg: 10,
            normalize: false,
        }
    }
}

/// Laufzeit-Flags eines Features.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureProperties {
    /// Teil der aktuellen Selektion
    pub selected: bool,
    /// Unter dem Mauszeiger
    pub hovered: bool,
    /// Geometrie sind Kontrollpunkte einer Spline
    pub is_spline: bool,
    /// Spline-Parameter (nur bei `is_spline`)
    pub spline_options: Option<SplineOptions>,
    /// Sichtbarkeit aus der Layer-Verwaltung
    pub layer_visible: bool,
    /// Anzeigename (z.B. aus Importen)
    pub name: Option<String>,
    /// Herkunft (`"svg"`, `"geojson"`, …)
    pub source: Option<String>,
}

impl Default for FeatureProperties {
    fn default() -> Self {
        Self {
            selected: false,
            hovered: false,
            is_spline: false,
            spline_options: None,
            layer_visible: true,
            name: None,
            source: None,
        }
    }
}

/// Ein Feature auf der Karte.
///
/// Die Geometrie liegt hinter einem `Arc`, damit Render-Primitive sie ohne
/// Kopie teilen können. Mutationen laufen über `geometry_mut()` (CoW).
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Feature-ID
    pub id: FeatureId,
    /// Geometrie (bei Splines: Kontrollpunkte)
    pub geometry: Arc<Geometry>,
    /// Laufzeit-Properties
    pub properties: FeatureProperties,
}

impl Feature {
    /// Erstellt ein Feature mit Standard-Properties.
    pub fn new(id: FeatureId, geometry: Geometry) -> Self {
        Self {
            id,
            geometry: Arc::new(geometry),
            properties: FeatureProperties::default(),
        }
    }

    /// Markiert das Feature als Spline mit den gegebenen Optionen.
    pub fn with_spline(mut self, options: SplineOptions) -> Self {
        self.properties.is_spline = true;
        self.properties.spline_options = Some(options);
        self
    }

    /// Mutable Geometrie (klont nur bei geteiltem `Arc`).
    pub fn geometry_mut(&mut self) -> &mut Geometry {
        Arc::make_mut(&mut self.geometry)
    }

    /// Spline nur bei LineString-Geometrie wirksam.
    pub fn is_spline_line(&self) -> bool {
        self.properties.is_spline && matches!(*self.geometry, Geometry::LineString(_))
    }

    /// Spline-Optionen oder Standardwerte.
    pub fn spline_options(&self) -> SplineOptions {
        self.properties.spline_options.unwrap_or_default()
    }
}
