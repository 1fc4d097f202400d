//! Core-Domänentypen: Geometrie, Features, Styles, Presets, Kartenansicht.

pub mod color;
pub mod error;
pub mod feature;
/// Geometrie-Modell
///
/// Alle Koordinaten in Web Mercator (Meter):
/// - Geometry: Punkt, Linie, Polygon, Kreis, Multi-Varianten
/// - Extent: achsenparalleles Begrenzungsrechteck
pub mod geometry;
pub mod map_view;
pub mod preset;
pub mod projection;
pub mod spatial;
pub mod style;
pub mod style_table;
pub mod vector_source;

pub use color::Rgba;
pub use error::EditorError;
pub use feature::{Feature, FeatureId, FeatureProperties, SplineOptions};
pub use geometry::{Extent, Geometry, GeometryClass};
pub use map_view::MapView;
pub use preset::{Preset, PresetStore};
pub use projection::{lon_lat_to_mercator, mercator_to_lon_lat};
pub use spatial::{VertexIndex, VertexMatch};
pub use style::{
    ArrowConfig, ArrowStyle, FeatureStyle, FillPatternConfig, PatternType, StyleLayer,
};
pub use style_table::StyleTable;
pub use vector_source::VectorSource;
