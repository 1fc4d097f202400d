//! Mapping von UI-Intents auf mutierende App-Commands.

use super::state::NoticeLevel;
use super::tools::{InputEvent, Key, Modifiers};
use super::{AppCommand, AppIntent, AppState};

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
    match intent {
        AppIntent::MapInput { event } => vec![AppCommand::ToolInput { event }],
        AppIntent::KeyPressed { key, modifiers } => vec![map_key(key, modifiers)],
        AppIntent::ToolSelected { tool } => vec![AppCommand::SetTool { tool }],

        AppIntent::UndoRequested => vec![AppCommand::Undo],
        AppIntent::RedoRequested => vec![AppCommand::Redo],
        AppIntent::ClearHistoryRequested => vec![AppCommand::ClearHistory],

        AppIntent::StyleEdited { style } => vec![AppCommand::ApplyStyle { style }],
        AppIntent::StyleJsonApplied { json } => vec![AppCommand::ApplyStyleJson { json }],
        AppIntent::CopyStyleRequested => vec![AppCommand::CopyStyle],
        AppIntent::PasteStyleRequested { clipboard } => {
            vec![AppCommand::PasteStyle { clipboard }]
        }
        AppIntent::PaintLayerAdded => vec![AppCommand::AddPaintLayer],
        AppIntent::PaintLayerRemoved { layer_id } => {
            vec![AppCommand::RemovePaintLayer { layer_id }]
        }
        AppIntent::PaintLayerMoved { layer_id, up } => {
            vec![AppCommand::MovePaintLayer { layer_id, up }]
        }
        AppIntent::PaintLayerEdited { layer } => vec![AppCommand::UpdatePaintLayer { layer }],
        AppIntent::ArrowsEdited { arrows } => vec![AppCommand::SetArrows { arrows }],

        AppIntent::PresetSaveRequested { name } => vec![AppCommand::SavePreset { name }],
        AppIntent::PresetApplied { name } => vec![AppCommand::ApplyPreset { name }],
        AppIntent::PresetDeleteRequested { name } => vec![AppCommand::DeletePreset { name }],
        AppIntent::PresetFileSelected { path } => vec![AppCommand::LoadPresetFile { path }],

        AppIntent::FileDropped { name, contents } => vec![map_dropped_file(&name, contents)],
        AppIntent::SvgImportRequested { text } => vec![AppCommand::ImportSvg { text }],
        AppIntent::GeoJsonImportRequested { text } => vec![AppCommand::ImportGeoJson { text }],

        AppIntent::LayersSelected { layer_ids } => vec![AppCommand::SelectLayers { layer_ids }],
        AppIntent::LayerVisibilityToggled { layer_id } => {
            vec![AppCommand::ToggleLayerVisibility { layer_id }]
        }
        AppIntent::LayerLockToggled { layer_id } => vec![AppCommand::ToggleLayerLock { layer_id }],
        AppIntent::LayerRenamed { layer_id, name } => {
            vec![AppCommand::RenameLayer { layer_id, name }]
        }
        AppIntent::LayerDeleteRequested { layer_id } => {
            // Gesperrte Layer werden nicht gelöscht
            match state.layers.layer(&layer_id) {
                Some(layer) if layer.locked => vec![AppCommand::ReportNotice {
                    level: NoticeLevel::Warning,
                    message: format!("Layer '{}' ist gesperrt", layer.name),
                }],
                _ => vec![AppCommand::DeleteLayer { layer_id }],
            }
        }
        AppIntent::LayersReordered { layer_ids } => {
            vec![AppCommand::ReorderLayers { layer_ids }]
        }
        AppIntent::LayerMovedToGroup { layer_id, group_id } => {
            vec![AppCommand::MoveLayerToGroup { layer_id, group_id }]
        }
        AppIntent::GroupCreateRequested { name } => vec![AppCommand::CreateGroup { name }],
        AppIntent::GroupRenamed { group_id, name } => {
            vec![AppCommand::RenameGroup { group_id, name }]
        }
        AppIntent::GroupCollapseToggled { group_id } => {
            vec![AppCommand::ToggleGroupCollapsed { group_id }]
        }
        AppIntent::GroupVisibilityToggled { group_id } => {
            vec![AppCommand::ToggleGroupVisibility { group_id }]
        }
        AppIntent::GroupDeleteRequested { group_id } => vec![AppCommand::DeleteGroup { group_id }],

        AppIntent::ViewPanned { delta } => vec![AppCommand::PanView { delta }],
        AppIntent::ViewZoomed { delta } => vec![AppCommand::ZoomView { delta }],
        AppIntent::ViewportResized { size } => vec![AppCommand::SetViewportSize { size }],
        AppIntent::FitToFeaturesRequested => vec![AppCommand::FitToFeatures],
        AppIntent::ZoomSettingsChanged { settings } => {
            vec![AppCommand::SetZoomSettings { settings }]
        }
    }
}

/// Globale Tastenkürzel; alles andere geht an das aktive Werkzeug.
fn map_key(key: Key, modifiers: Modifiers) -> AppCommand {
    match key {
        Key::Char('z') if modifiers.ctrl && modifiers.shift => AppCommand::Redo,
        Key::Char('z') if modifiers.ctrl => AppCommand::Undo,
        Key::Char('y') if modifiers.ctrl => AppCommand::Redo,
        _ => AppCommand::ToolInput {
            event: InputEvent::Key { key, modifiers },
        },
    }
}

/// Wählt den Importer anhand der Dateiendung.
fn map_dropped_file(name: &str, contents: Result<String, String>) -> AppCommand {
    let text = match contents {
        Ok(text) => text,
        Err(e) => {
            return AppCommand::ReportNotice {
                level: NoticeLevel::Error,
                message: format!("Datei '{}' nicht lesbar: {}", name, e),
            }
        }
    };
    let extension = std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("svg") => AppCommand::ImportSvg { text },
        Some("geojson") | Some("json") => AppCommand::ImportGeoJson { text },
        _ => AppCommand::ReportNotice {
            level: NoticeLevel::Warning,
            message: format!("Dateityp von '{}' wird nicht unterstützt", name),
        },
    }
}

#[cfg(test)]
mod tests;
