//! Vector Style Editor Library.
//! Kern eines Vektor-Feature-Editors als Library: Style-Modell und
//! Style-Auflösung, Werkzeug-Zustandsmaschine, Layer-Verwaltung,
//! Undo/Redo und Importe.

pub mod app;
pub mod core;
pub mod import;
pub mod render;
pub mod shared;

pub use app::{
    build_render_scene, AppCommand, AppController, AppIntent, AppState, EditorTool, InputEvent,
    Key, Modifiers, Notice, NoticeLevel, UiState,
};
pub use core::{
    EditorError, Extent, Feature, FeatureId, FeatureStyle, Geometry, GeometryClass, MapView,
    PresetStore, StyleLayer, StyleTable, VectorSource,
};
pub use render::{DrawPrimitive, RenderScene, StyleResolver};
pub use shared::{EditorOptions, ZoomSettings};
