//! Application-Layer: Controller, State, Events, Werkzeuge und Handler.

pub mod command_log;
pub mod controller;
pub mod events;
pub mod handlers;
pub mod history;
mod intent_mapping;
pub mod layer_registry;
pub mod render_scene;
pub mod selection;
/// Application State
///
/// Dieses Modul verwaltet den Zustand der Anwendung (Features, Styles,
/// Layer, Verlauf, Ansicht) und die Hinweise an den Benutzer.
pub mod state;
pub mod tools;

pub use command_log::CommandLog;
pub use controller::AppController;
pub use events::{AppCommand, AppIntent};
pub use history::{Snapshot, UndoRedo};
pub use layer_registry::{LayerAction, LayerId, LayerRegistry, LayerType};
pub use render_scene::build as build_render_scene;
pub use selection::{SelectionState, SelectionSync};
pub use state::{AppState, Notice, NoticeLevel, UiState};
pub use tools::{EditorTool, InputEvent, Key, Modifiers};
