//! Style-Presets: benannte, wiederverwendbare Styles.

use super::error::EditorError;
use super::style::FeatureStyle;
use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn deletable_default() -> bool {
    true
}

/// Ein benanntes Preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// Eindeutiger Name
    pub name: String,
    /// Eigene Kopie des Styles
    pub style: FeatureStyle,
    /// Datei-Presets sind nicht löschbar
    #[serde(default = "deletable_default")]
    pub is_deletable: bool,
}

/// Namensgeordnete Preset-Sammlung (Einfügereihenfolge).
#[derive(Debug, Clone, Default)]
pub struct PresetStore {
    presets: IndexMap<String, Preset>,
}

impl PresetStore {
    /// Leere Sammlung.
    pub fn new() -> Self {
        Self::default()
    }

    /// Übernimmt Datei-Presets aus einem JSON-Array.
    ///
    /// Alle werden schreibgeschützt markiert; doppelte Namen werden
    /// übersprungen. Rückgabe: Anzahl übernommener Presets.
    pub fn load_file_presets(&mut self, json: &str) -> Result<usize, EditorError> {
        let parsed: Vec<Preset> =
            serde_json::from_str(json).map_err(|e| EditorError::InvalidStyleJson(e.to_string()))?;
        let mut added = 0;
        for mut preset in parsed {
            if self.presets.contains_key(&preset.name) {
                log::warn!("Datei-Preset '{}' doppelt, übersprungen", preset.name);
                continue;
            }
            if let Err(e) = preset.style.validate() {
                log::warn!("Datei-Preset '{}' ungültig: {}", preset.name, e);
                continue;
            }
            preset.is_deletable = false;
            self.presets.insert(preset.name.clone(), preset);
            added += 1;
        }
        Ok(added)
    }

    /// Liest Datei-Presets von der Platte.
    pub fn load_file(&mut self, path: &Path) -> anyhow::Result<usize> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Preset-Datei nicht lesbar: {}", path.display()))?;
        let added = self.load_file_presets(&content)?;
        log::info!("{} Presets geladen aus: {}", added, path.display());
        Ok(added)
    }

    /// Speichert einen Session-Preset (löschbar) mit eigener Style-Kopie.
    pub fn save(&mut self, name: &str, style: &FeatureStyle) -> Result<(), EditorError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditorError::EmptyPresetName);
        }
        if self.presets.contains_key(name) {
            return Err(EditorError::DuplicatePresetName(name.to_string()));
        }
        self.presets.insert(
            name.to_string(),
            Preset {
                name: name.to_string(),
                style: style.clone(),
                is_deletable: true,
            },
        );
        Ok(())
    }

    /// Löscht einen Session-Preset.
    pub fn delete(&mut self, name: &str) -> Result<Preset, EditorError> {
        match self.presets.get(name) {
            None => Err(EditorError::PresetNotFound(name.to_string())),
            Some(p) if !p.is_deletable => Err(EditorError::PresetNotDeletable(name.to_string())),
            Some(_) => self
                .presets
                .shift_remove(name)
                .ok_or_else(|| EditorError::PresetNotFound(name.to_string())),
        }
    }

    /// Preset per Name.
    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }

    /// Alle Presets in Einfügereihenfolge.
    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.values()
    }

    /// Anzahl der Presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// `true` wenn keine Presets vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
