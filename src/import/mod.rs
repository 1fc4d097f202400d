//! Importer für SVG- und GeoJSON-Dateien.
//!
//! Beide liefern fertige Geometrien in Web Mercator plus optionale
//! Style- und Spline-Vorgaben. Das Einfügen in den Editor übernimmt der
//! App-Layer (ein Undo-Schritt pro Import).

pub mod geojson;
pub mod svg;

use crate::core::{FeatureStyle, Geometry, SplineOptions};

/// Ein importiertes, noch nicht eingefügtes Feature.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedFeature {
    /// Geometrie in Web Mercator
    pub geometry: Geometry,
    /// Style aus der Quelle (`None` = Typ-Standard)
    pub style: Option<FeatureStyle>,
    /// Spline-Parameter, falls die Geometrie geglättet werden soll
    pub spline: Option<SplineOptions>,
    /// Anzeigename
    pub name: Option<String>,
    /// Herkunft (`"svg"`, `"geojson"`)
    pub source: &'static str,
}
