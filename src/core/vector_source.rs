//! Feature-Speicher der Karte mit Änderungszähler.

use super::feature::{Feature, FeatureId};
use super::geometry::{Extent, Geometry};
use glam::DVec2;
use indexmap::IndexMap;
use std::sync::Arc;

/// Geordneter Feature-Speicher (Einfügereihenfolge bleibt erhalten).
///
/// Die Map liegt hinter einem `Arc`: `snapshot()` ist O(1), die eigentliche
/// Kopie passiert erst beim nächsten schreibenden Zugriff.
#[derive(Debug, Clone, Default)]
pub struct VectorSource {
    features: Arc<IndexMap<FeatureId, Feature>>,
    next_id: FeatureId,
    revision: u64,
}

impl VectorSource {
    /// Erstellt eine leere Quelle. IDs beginnen bei 1.
    pub fn new() -> Self {
        Self {
            features: Arc::new(IndexMap::new()),
            next_id: 1,
            revision: 0,
        }
    }

    fn features_mut(&mut self) -> &mut IndexMap<FeatureId, Feature> {
        Arc::make_mut(&mut self.features)
    }

    /// Reserviert eine neue Feature-ID.
    pub fn allocate_id(&mut self) -> FeatureId {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    /// Fügt eine Geometrie als neues Feature hinzu.
    pub fn add(&mut self, geometry: Geometry) -> FeatureId {
        let id = self.allocate_id();
        self.insert(Feature::new(id, geometry));
        id
    }

    /// Fügt ein fertiges Feature ein (ersetzt bei gleicher ID).
    pub fn insert(&mut self, feature: Feature) {
        self.next_id = self.next_id.max(feature.id + 1);
        self.features_mut().insert(feature.id, feature);
        self.changed();
    }

    /// Entfernt ein Feature; Reihenfolge der übrigen bleibt erhalten.
    pub fn remove(&mut self, id: FeatureId) -> Option<Feature> {
        if !self.features.contains_key(&id) {
            return None;
        }
        let removed = self.features_mut().shift_remove(&id);
        self.changed();
        removed
    }

    /// Feature per ID.
    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(&id)
    }

    /// Mutable Feature-Referenz (CoW auf der Map).
    pub fn get_mut(&mut self, id: FeatureId) -> Option<&mut Feature> {
        if !self.features.contains_key(&id) {
            return None;
        }
        self.features_mut().get_mut(&id)
    }

    /// Prüft ob ein Feature existiert.
    pub fn contains(&self, id: FeatureId) -> bool {
        self.features.contains_key(&id)
    }

    /// Ersetzt die Geometrie eines Features.
    pub fn set_geometry(&mut self, id: FeatureId, geometry: Geometry) -> bool {
        match self.get_mut(id) {
            Some(feature) => {
                feature.geometry = Arc::new(geometry);
                self.changed();
                true
            }
            None => false,
        }
    }

    /// Iteriert in Einfügereihenfolge.
    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    /// Alle IDs in Einfügereihenfolge.
    pub fn ids(&self) -> Vec<FeatureId> {
        self.features.keys().copied().collect()
    }

    /// Anzahl der Features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// `true` wenn keine Features vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Setzt das `selected`-Flag; Rückgabe: ob sich etwas geändert hat.
    pub fn set_selected(&mut self, id: FeatureId, selected: bool) -> bool {
        self.update_flag(id, |f| &mut f.properties.selected, selected)
    }

    /// Setzt das `hovered`-Flag; Rückgabe: ob sich etwas geändert hat.
    pub fn set_hovered(&mut self, id: FeatureId, hovered: bool) -> bool {
        self.update_flag(id, |f| &mut f.properties.hovered, hovered)
    }

    /// Setzt das `layerVisible`-Flag; Rückgabe: ob sich etwas geändert hat.
    pub fn set_layer_visible(&mut self, id: FeatureId, visible: bool) -> bool {
        self.update_flag(id, |f| &mut f.properties.layer_visible, visible)
    }

    fn update_flag(
        &mut self,
        id: FeatureId,
        field: impl Fn(&mut Feature) -> &mut bool,
        value: bool,
    ) -> bool {
        if !self.features.contains_key(&id) {
            return false;
        }
        let mut changed = false;
        if let Some(feature) = self.features_mut().get_mut(&id) {
            let flag = field(feature);
            changed = *flag != value;
            *flag = value;
        }
        if changed {
            self.changed();
        }
        changed
    }

    /// Entfernt `hovered` von allen Features.
    pub fn clear_hover(&mut self) {
        let hovered: Vec<FeatureId> = self
            .iter()
            .filter(|f| f.properties.hovered)
            .map(|f| f.id)
            .collect();
        for id in hovered {
            self.set_hovered(id, false);
        }
    }

    /// Signalisiert eine Änderung (erzwingt Neuaufbau der Render-Szene).
    pub fn changed(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Aktueller Änderungszähler.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Gesamtausdehnung aller Features.
    pub fn extent(&self) -> Option<Extent> {
        self.iter()
            .filter_map(|f| f.geometry.extent())
            .reduce(|a, b| a.union(&b))
    }

    /// Nächstes sichtbares Feature innerhalb der Toleranz.
    ///
    /// Bei gleichem Abstand gewinnt das zuletzt eingefügte (oberste) Feature.
    pub fn hit_test(&self, pos: DVec2, tolerance: f64) -> Option<FeatureId> {
        let mut best: Option<(FeatureId, f64)> = None;
        for feature in self.iter().filter(|f| f.properties.layer_visible) {
            let d = feature.geometry.distance_to(pos);
            if d > tolerance {
                continue;
            }
            if best.is_none_or(|(_, best_d)| d <= best_d) {
                best = Some((feature.id, d));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Sichtbare Features, deren Ausdehnung das Rechteck schneidet.
    pub fn features_in_extent(&self, extent: &Extent) -> Vec<FeatureId> {
        self.iter()
            .filter(|f| f.properties.layer_visible)
            .filter(|f| f.geometry.extent().is_some_and(|e| e.intersects(extent)))
            .map(|f| f.id)
            .collect()
    }

    /// O(1)-Snapshot des Feature-Bestands.
    pub fn snapshot(&self) -> Arc<IndexMap<FeatureId, Feature>> {
        Arc::clone(&self.features)
    }

    /// Stellt einen Snapshot wieder her.
    pub fn restore(&mut self, features: Arc<IndexMap<FeatureId, Feature>>) {
        let max_id = features.keys().copied().max().unwrap_or(0);
        self.next_id = self.next_id.max(max_id + 1);
        self.features = features;
        self.changed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x: f64) -> Geometry {
        Geometry::LineString(vec![DVec2::new(x, 0.0), DVec2::new(x, 10.0)])
    }

    #[test]
    fn ids_are_unique_and_ordered() {
        let mut source = VectorSource::new();
        let a = source.add(line(0.0));
        let b = source.add(line(5.0));
        assert!(b > a);
        assert_eq!(source.ids(), vec![a, b]);
    }

    #[test]
    fn hit_test_ignores_hidden_features() {
        let mut source = VectorSource::new();
        let a = source.add(line(0.0));
        assert_eq!(source.hit_test(DVec2::new(0.5, 5.0), 1.0), Some(a));
        source.set_layer_visible(a, false);
        assert_eq!(source.hit_test(DVec2::new(0.5, 5.0), 1.0), None);
    }

    #[test]
    fn snapshot_is_not_affected_by_later_writes() {
        let mut source = VectorSource::new();
        let a = source.add(line(0.0));
        let snap = source.snapshot();
        source.remove(a);
        assert!(source.is_empty());
        assert_eq!(snap.len(), 1);
        source.restore(snap);
        assert!(source.contains(a));
        let c = source.add(line(1.0));
        assert!(c > a, "restore darf keine ID doppelt vergeben");
    }

    #[test]
    fn flag_update_bumps_revision_only_on_change() {
        let mut source = VectorSource::new();
        let a = source.add(line(0.0));
        let rev = source.revision();
        assert!(source.set_selected(a, true));
        assert!(source.revision() > rev);
        let rev = source.revision();
        assert!(!source.set_selected(a, true));
        assert_eq!(source.revision(), rev);
    }
}
