//! Layer-übergreifende Verträge und Hilfsfunktionen.
//!
//! Wird von `render` und `app` gleichermaßen genutzt, damit sich diese
//! Layer nicht gegenseitig importieren müssen.

pub mod options;
pub mod spline_geometry;

pub use options::{EditorOptions, SimplifiedStyle, SvgImportOptions, ZoomSettings};
