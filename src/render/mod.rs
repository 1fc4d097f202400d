//! Style-Auflösung: Feature-Styles → Zeichen-Primitive für den Host-Renderer.
//!
//! Kein eigenes Zeichnen: die Ausgabe ist eine flache, sortierbare Liste
//! von Primitiven, die ein Karten-Host (oder ein Test) konsumiert.

pub mod arrows;
pub mod pattern;
mod style_resolver;
mod types;

pub use arrows::{arrow_svg, ArrowPlacement};
pub use pattern::{PatternShape, PatternTile};
pub use style_resolver::StyleResolver;
pub use types::{
    DrawPrimitive, FillStyle, LayerOrderTable, PrimitiveKind, RenderScene, StrokeStyle, Symbol,
    Z_ARROW_MIN, Z_HALO, Z_PAINT_BASE, Z_VERTEX,
};
