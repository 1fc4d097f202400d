//! Zuordnung Feature-ID → Style.

use super::feature::FeatureId;
use super::geometry::GeometryClass;
use super::style::FeatureStyle;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

/// Style-Tabelle aller Features.
///
/// Jeder Eintrag gehört genau einem Feature: `set()` speichert immer eine
/// eigene Kopie, Leser bekommen nur geliehene Referenzen. Die Map liegt
/// hinter einem `Arc`, damit Undo-Snapshots O(1) bleiben.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    styles: Arc<HashMap<FeatureId, FeatureStyle>>,
}

impl StyleTable {
    /// Leere Tabelle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Style eines Features, falls gesetzt.
    pub fn get(&self, id: FeatureId) -> Option<&FeatureStyle> {
        self.styles.get(&id)
    }

    /// Style eines Features oder der typgerechte Standard.
    pub fn get_or_default(&self, id: FeatureId, class: GeometryClass) -> Cow<'_, FeatureStyle> {
        match self.styles.get(&id) {
            Some(style) => Cow::Borrowed(style),
            None => Cow::Owned(FeatureStyle::default_for(class)),
        }
    }

    /// Speichert eine Kopie des Styles für das Feature.
    pub fn set(&mut self, id: FeatureId, style: &FeatureStyle) {
        Arc::make_mut(&mut self.styles).insert(id, style.clone());
    }

    /// Setzt den typgerechten Standard-Style.
    pub fn assign_default(&mut self, id: FeatureId, class: GeometryClass) {
        Arc::make_mut(&mut self.styles).insert(id, FeatureStyle::default_for(class));
    }

    /// Entfernt den Eintrag eines Features.
    pub fn remove(&mut self, id: FeatureId) -> Option<FeatureStyle> {
        if !self.styles.contains_key(&id) {
            return None;
        }
        Arc::make_mut(&mut self.styles).remove(&id)
    }

    /// Anzahl der Einträge.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// `true` wenn keine Einträge vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// O(1)-Snapshot.
    pub fn snapshot(&self) -> Arc<HashMap<FeatureId, FeatureStyle>> {
        Arc::clone(&self.styles)
    }

    /// Stellt einen Snapshot wieder her.
    pub fn restore(&mut self, styles: Arc<HashMap<FeatureId, FeatureStyle>>) {
        self.styles = styles;
    }
}
