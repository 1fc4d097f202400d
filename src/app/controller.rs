//! Application Controller für zentrale Event-Verarbeitung.

use super::render_scene;
use super::{AppCommand, AppIntent, AppState};
use crate::render::RenderScene;
use std::time::Instant;

/// Orchestriert UI-Events und Handler auf den AppState.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    pub fn handle_intent(&mut self, state: &mut AppState, intent: AppIntent) -> anyhow::Result<()> {
        self.handle_intent_at(state, intent, Instant::now())
    }

    /// Wie `handle_intent`, mit explizitem Ereigniszeitpunkt (Entprellung).
    pub fn handle_intent_at(
        &mut self,
        state: &mut AppState,
        intent: AppIntent,
        now: Instant,
    ) -> anyhow::Result<()> {
        state.event_time = now;
        let commands = self.map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, command)?;
        }

        Ok(())
    }

    fn map_intent_to_commands(&self, state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
        super::intent_mapping::map_intent_to_commands(state, intent)
    }

    /// Führt mutierende Commands auf dem AppState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);
        use super::handlers;

        match command {
            // === Werkzeuge ===
            AppCommand::ToolInput { event } => handlers::tools::input(state, event),
            AppCommand::SetTool { tool } => handlers::tools::set_tool(state, tool),

            // === Undo/Redo ===
            AppCommand::Undo => handlers::history::undo(state),
            AppCommand::Redo => handlers::history::redo(state),
            AppCommand::ClearHistory => handlers::history::clear_history(state),

            // === Style-Editor ===
            AppCommand::ApplyStyle { style } => handlers::styling::apply_style(state, &style),
            AppCommand::ApplyStyleJson { json } => handlers::styling::apply_json(state, &json),
            AppCommand::CopyStyle => handlers::styling::copy_style(state),
            AppCommand::PasteStyle { clipboard } => {
                handlers::styling::paste_style(state, clipboard)
            }
            AppCommand::AddPaintLayer => handlers::styling::add_paint_layer(state),
            AppCommand::RemovePaintLayer { layer_id } => {
                handlers::styling::remove_paint_layer(state, &layer_id)
            }
            AppCommand::MovePaintLayer { layer_id, up } => {
                handlers::styling::move_paint_layer(state, &layer_id, up)
            }
            AppCommand::UpdatePaintLayer { layer } => {
                handlers::styling::update_paint_layer(state, layer)
            }
            AppCommand::SetArrows { arrows } => handlers::styling::set_arrows(state, arrows),

            // === Presets ===
            AppCommand::SavePreset { name } => handlers::presets::save(state, &name),
            AppCommand::ApplyPreset { name } => handlers::presets::apply(state, &name),
            AppCommand::DeletePreset { name } => handlers::presets::delete(state, &name),
            AppCommand::LoadPresetFile { path } => handlers::presets::load_file(state, &path),

            // === Import ===
            AppCommand::ImportSvg { text } => handlers::import::import_svg(state, &text),
            AppCommand::ImportGeoJson { text } => handlers::import::import_geojson(state, &text),
            AppCommand::ReportNotice { level, message } => state.ui.notify(level, message),

            // === Layer-Panel ===
            AppCommand::SelectLayers { layer_ids } => {
                handlers::layers::select_layers(state, layer_ids)
            }
            AppCommand::ToggleLayerVisibility { layer_id } => {
                handlers::layers::toggle_visibility(state, layer_id)
            }
            AppCommand::ToggleLayerLock { layer_id } => {
                handlers::layers::toggle_lock(state, layer_id)
            }
            AppCommand::RenameLayer { layer_id, name } => {
                handlers::layers::rename(state, layer_id, name)
            }
            AppCommand::DeleteLayer { layer_id } => handlers::layers::delete(state, layer_id),
            AppCommand::ReorderLayers { layer_ids } => {
                handlers::layers::reorder(state, layer_ids)
            }
            AppCommand::MoveLayerToGroup { layer_id, group_id } => {
                handlers::layers::move_to_group(state, layer_id, group_id)
            }

            // === Gruppen ===
            AppCommand::CreateGroup { name } => handlers::layers::create_group(state, name),
            AppCommand::RenameGroup { group_id, name } => {
                handlers::layers::rename_group(state, group_id, name)
            }
            AppCommand::ToggleGroupCollapsed { group_id } => {
                handlers::layers::toggle_group_collapsed(state, group_id)
            }
            AppCommand::ToggleGroupVisibility { group_id } => {
                handlers::layers::toggle_group_visibility(state, group_id)
            }
            AppCommand::DeleteGroup { group_id } => {
                handlers::layers::delete_group(state, group_id)
            }

            // === Kartenansicht ===
            AppCommand::PanView { delta } => handlers::view::pan(state, delta),
            AppCommand::ZoomView { delta } => handlers::view::zoom(state, delta),
            AppCommand::SetViewportSize { size } => handlers::view::set_viewport_size(state, size),
            AppCommand::FitToFeatures => handlers::view::fit_to_features(state),
            AppCommand::SetZoomSettings { settings } => {
                handlers::view::set_zoom_settings(state, settings)
            }
        }

        Ok(())
    }

    /// Zeitgesteuerte Arbeit (entprellte Selektions-Synchronisation).
    ///
    /// Gibt `true` zurück, wenn sich der Zustand geändert hat.
    pub fn tick(&mut self, state: &mut AppState, now: Instant) -> bool {
        super::handlers::tools::flush_selection_sync(state, now)
    }

    /// Baut die Render-Szene aus dem aktuellen AppState.
    pub fn build_render_scene(&self, state: &mut AppState) -> RenderScene {
        render_scene::build(state)
    }
}
