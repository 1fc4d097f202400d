//! Application State: zentrale Datenhaltung.

use super::history::{Snapshot, UndoRedo};
use super::layer_registry::LayerRegistry;
use super::selection::{SelectionState, SelectionSync};
use super::tools::{EditEvent, Extensions, InteractionController, ToolContext};
use super::CommandLog;
use crate::core::{EditorError, FeatureId, MapView, PresetStore, StyleTable, VectorSource};
use crate::render::StyleResolver;
use crate::shared::EditorOptions;
use std::time::Instant;

/// Schweregrad eines Hinweises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Bestätigung
    Info,
    /// Aktion nicht ausgeführt
    Warning,
    /// Fehlgeschlagene Benutzereingabe
    Error,
}

/// Transienter Hinweis für den Benutzer (Toast im Host).
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Schweregrad
    pub level: NoticeLevel,
    /// Anzeigetext
    pub message: String,
}

/// UI-bezogener Anwendungszustand
#[derive(Debug, Default)]
pub struct UiState {
    /// Noch nicht angezeigte Hinweise
    pub notices: Vec<Notice>,
    /// Zuletzt kopiertes Style-JSON (für Host-Zwischenablage)
    pub clipboard_text: Option<String>,
}

impl UiState {
    /// Erstellt den Standard-UI-Zustand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hängt einen Hinweis an.
    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            NoticeLevel::Info => log::info!("{}", message),
            NoticeLevel::Warning => log::warn!("{}", message),
            NoticeLevel::Error => log::error!("{}", message),
        }
        self.notices.push(Notice { level, message });
    }

    /// Meldet einen Benutzerfehler; `Ok` wird durchgereicht.
    pub fn report<T>(&mut self, result: Result<T, EditorError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.notify(NoticeLevel::Error, e.to_string());
                None
            }
        }
    }

    /// Entnimmt alle offenen Hinweise.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

/// Hauptzustand der Anwendung
pub struct AppState {
    /// Features der Karte
    pub source: VectorSource,
    /// Feature-ID → Style
    pub styles: StyleTable,
    /// Style-Presets (Datei + Session)
    pub presets: PresetStore,
    /// Logische Layer und Gruppen
    pub layers: LayerRegistry,
    /// Undo/Redo-Koordinator
    pub history: UndoRedo,
    /// Werkzeug-Zustandsmaschine
    pub interaction: InteractionController,
    /// Karten-Selektion
    pub selection: SelectionState,
    /// Entprellte Weitergabe Karte → Layer-Verwaltung
    pub selection_sync: SelectionSync,
    /// Optionale Host-Erweiterungen
    pub extensions: Extensions,
    /// Kartenansicht
    pub view: MapView,
    /// Laufzeit-Optionen
    pub options: EditorOptions,
    /// Style-Resolver mit LOD-Cache
    pub resolver: StyleResolver,
    /// UI-State
    pub ui: UiState,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Zeitpunkt des gerade verarbeiteten Intents
    pub event_time: Instant,
}

impl AppState {
    /// Erstellt einen neuen, leeren App-State
    pub fn new() -> Self {
        Self::with_options(EditorOptions::default())
    }

    /// App-State mit gegebenen Optionen.
    pub fn with_options(options: EditorOptions) -> Self {
        Self {
            source: VectorSource::new(),
            styles: StyleTable::new(),
            presets: PresetStore::new(),
            layers: LayerRegistry::new(),
            history: UndoRedo::with_snapshot_stack(options.undo_max_depth),
            interaction: InteractionController::new(),
            selection: SelectionState::new(),
            selection_sync: SelectionSync::new(options.selection_sync_debounce_ms),
            extensions: Extensions::default(),
            view: MapView::new(options.zoom.default_zoom),
            resolver: StyleResolver::new(),
            ui: UiState::new(),
            command_log: CommandLog::new(),
            event_time: Instant::now(),
            options,
        }
    }

    /// Anzahl der Features (für UI-Anzeige)
    pub fn feature_count(&self) -> usize {
        self.source.len()
    }

    /// Undo/Redo helpers
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Gibt zurück, ob ein Redo-Schritt verfügbar ist.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Erstellt einen Undo-Snapshot des aktuellen Zustands.
    pub fn record_undo_snapshot(&mut self) {
        let snap = Snapshot::from_state(self);
        self.history.record(snap);
    }

    /// Erste selektierte Feature-ID (Quelle für Style-Editor und Presets).
    pub fn primary_selection(&self) -> Option<FeatureId> {
        self.selection.ids().first().copied()
    }

    /// Ruft `f` mit dem Werkzeug-Controller und einem frischen Kontext auf.
    ///
    /// Gibt die gesammelten `EditEvent`s zurück; der Aufrufer wertet sie aus.
    pub fn with_tools<R>(
        &mut self,
        f: impl FnOnce(&mut InteractionController, &mut ToolContext<'_>) -> R,
    ) -> (R, Vec<EditEvent>) {
        let mut events = Vec::new();
        let mut ctx = ToolContext {
            source: &mut self.source,
            styles: &mut self.styles,
            selection: &mut self.selection,
            history: &mut self.history,
            view: &self.view,
            options: &self.options,
            extensions: &self.extensions,
            events: &mut events,
        };
        let result = f(&mut self.interaction, &mut ctx);
        (result, events)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
