//! Optionale Host-Erweiterungen für das Offset-Werkzeug.
//!
//! Fehlt eine Erweiterung, wird das Werkzeug zum No-op mit Warnung.

use crate::core::Geometry;
use crate::shared::spline_geometry::offset_coords;
use glam::DVec2;

/// Parallele Kopie von Linien.
pub trait OffsetCapability {
    /// Versetzt einen Linienzug um `distance` Karteneinheiten (positiv = links).
    fn offset_line(&self, coords: &[DVec2], distance: f64) -> Option<Vec<DVec2>>;
}

/// Skalieren/Strecken von Flächen.
pub trait TransformCapability {
    /// Skaliert eine Geometrie um `anchor` mit Faktor je Achse.
    fn scale(&self, geometry: &Geometry, anchor: DVec2, factor: DVec2) -> Geometry;
}

/// Eingebauter Versatz mit Gehrungsecken.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineOffset;

impl OffsetCapability for LineOffset {
    fn offset_line(&self, coords: &[DVec2], distance: f64) -> Option<Vec<DVec2>> {
        offset_coords(coords, distance)
    }
}

/// Eingebaute affine Skalierung.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScaleTransform;

impl TransformCapability for ScaleTransform {
    fn scale(&self, geometry: &Geometry, anchor: DVec2, factor: DVec2) -> Geometry {
        let mut scaled = geometry.clone();
        scaled.scale_about(anchor, factor);
        scaled
    }
}

/// Verfügbare Erweiterungen.
pub struct Extensions {
    /// Versatz von Linien
    pub offset: Option<Box<dyn OffsetCapability>>,
    /// Transformation von Flächen
    pub transform: Option<Box<dyn TransformCapability>>,
}

impl Extensions {
    /// Keine Erweiterungen geladen.
    pub fn none() -> Self {
        Self {
            offset: None,
            transform: None,
        }
    }
}

impl Default for Extensions {
    fn default() -> Self {
        Self {
            offset: Some(Box::new(LineOffset)),
            transform: Some(Box::new(ScaleTransform)),
        }
    }
}
