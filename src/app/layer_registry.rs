//! Logische Layer-Verwaltung: ein Layer pro Feature, optionale Gruppen.
//!
//! Der Zustand wird ausschließlich über `reduce(state, action)` verändert.
//! Jede Aktion erzeugt neue Maps (Arc-Tausch); alte Zustände bleiben als
//! Snapshots gültig.

use crate::core::{Feature, FeatureId, FeatureStyle, Geometry, StyleTable, VectorSource};
use crate::render::LayerOrderTable;
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;
use std::time::SystemTime;

/// Layer-ID (`layer-{featureId}`).
pub type LayerId = String;
/// Gruppen-ID (`group-{n}`).
pub type GroupId = String;

/// Typ eines logischen Layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerType {
    /// Linie (auch Punkte und Mehrfachlinien)
    Line,
    /// Polygon oder Multipolygon
    Polygon,
    /// Kreis
    Circle,
    /// Spline aus Kontrollpunkten
    Bezier,
}

impl LayerType {
    /// Layer-Typ eines Features.
    pub fn of_feature(feature: &Feature) -> Self {
        if feature.properties.is_spline {
            return LayerType::Bezier;
        }
        match feature.geometry.as_ref() {
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => LayerType::Polygon,
            Geometry::Circle { .. } => LayerType::Circle,
            _ => LayerType::Line,
        }
    }

    /// Anzeigename des Typs.
    pub fn label(self) -> &'static str {
        match self {
            LayerType::Line => "Line",
            LayerType::Polygon => "Polygon",
            LayerType::Circle => "Circle",
            LayerType::Bezier => "Bezier Curve",
        }
    }
}

/// Layer-ID zu einer Feature-ID.
pub fn layer_id_for(feature_id: FeatureId) -> LayerId {
    format!("layer-{feature_id}")
}

/// Ein logischer Layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Layer-ID
    pub id: LayerId,
    /// Anzeigename
    pub name: String,
    /// Zugehöriges Feature (schwache Referenz)
    pub feature_id: FeatureId,
    /// Sichtbar
    pub visible: bool,
    /// Gesperrt
    pub locked: bool,
    /// Render-Reihenfolge
    pub order: usize,
    /// Gruppe, falls zugeordnet
    pub group_id: Option<GroupId>,
    /// Typ
    pub kind: LayerType,
    /// Kopie des Feature-Styles zum Erstellungszeitpunkt
    pub style: FeatureStyle,
    /// Erstellungszeitpunkt
    pub created: SystemTime,
}

/// Eine Layer-Gruppe.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGroup {
    /// Gruppen-ID
    pub id: GroupId,
    /// Anzeigename
    pub name: String,
    /// Sichtbar
    pub visible: bool,
    /// Im Panel eingeklappt
    pub collapsed: bool,
    /// Reihenfolge unter den Gruppen
    pub order: usize,
    /// Mitglieder in Reihenfolge (ohne Duplikate)
    pub layer_ids: IndexSet<LayerId>,
    /// Erstellungszeitpunkt
    pub created: SystemTime,
}

/// Teil-Update eines Layers (nur gesetzte Felder werden übernommen).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerPatch {
    /// Neuer Name
    pub name: Option<String>,
    /// Neue Sichtbarkeit
    pub visible: Option<bool>,
    /// Neue Sperre
    pub locked: Option<bool>,
    /// Neue Reihenfolge
    pub order: Option<usize>,
    /// Neuer Style
    pub style: Option<FeatureStyle>,
}

/// Teil-Update einer Gruppe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupPatch {
    /// Neuer Name
    pub name: Option<String>,
    /// Neue Sichtbarkeit (ohne Weitergabe an Mitglieder)
    pub visible: Option<bool>,
    /// Ein-/Ausklappen
    pub collapsed: Option<bool>,
    /// Neue Reihenfolge
    pub order: Option<usize>,
}

/// Alle Zustandsübergänge der Layer-Verwaltung.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerAction {
    /// Layer hinzufügen (oder ersetzen)
    AddLayer(Layer),
    /// Layer teilweise aktualisieren
    UpdateLayer {
        /// Ziel
        id: LayerId,
        /// Änderungen
        patch: LayerPatch,
    },
    /// Layer entfernen
    DeleteLayer(LayerId),
    /// Reihenfolge neu vergeben (`order = Index`)
    ReorderLayers(Vec<LayerId>),
    /// Gruppe hinzufügen
    AddGroup(LayerGroup),
    /// Gruppe teilweise aktualisieren
    UpdateGroup {
        /// Ziel
        id: GroupId,
        /// Änderungen
        patch: GroupPatch,
    },
    /// Gruppe entfernen (Mitglieder bleiben)
    DeleteGroup(GroupId),
    /// Layer in Gruppe verschieben (`None` = aus Gruppe lösen)
    MoveToGroup {
        /// Layer
        layer_id: LayerId,
        /// Zielgruppe
        group_id: Option<GroupId>,
    },
    /// Sichtbarkeit eines Layers umschalten
    ToggleLayerVisibility(LayerId),
    /// Sichtbarkeit einer Gruppe umschalten (überschreibt Mitglieder)
    ToggleGroupVisibility(GroupId),
    /// Selektierte Layer setzen
    SetSelectedLayers(Vec<LayerId>),
}

/// Zustand der Layer-Verwaltung.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerState {
    /// Layer nach ID (Einfügereihenfolge bricht Gleichstände)
    pub layers: Arc<IndexMap<LayerId, Layer>>,
    /// Gruppen nach ID
    pub groups: Arc<IndexMap<GroupId, LayerGroup>>,
    /// Selektierte Layer in Reihenfolge
    pub selected_layer_ids: Arc<IndexSet<LayerId>>,
    /// Nächste freie Reihenfolge (wächst monoton)
    pub next_order: usize,
}

/// Eintrag der Render-Reihenfolge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderedEntry<'a> {
    /// Ungruppierter Layer
    Layer(&'a Layer),
    /// Gruppe (Mitglieder werden separat gelistet)
    Group(&'a LayerGroup),
}

impl LayerState {
    /// Ungruppierte Layer nach `order`, danach Gruppen nach `order`.
    pub fn ordered_layers(&self) -> Vec<OrderedEntry<'_>> {
        let mut ungrouped: Vec<&Layer> = self
            .layers
            .values()
            .filter(|l| l.group_id.is_none())
            .collect();
        ungrouped.sort_by_key(|l| l.order);

        let mut groups: Vec<&LayerGroup> = self.groups.values().collect();
        groups.sort_by_key(|g| g.order);

        ungrouped
            .into_iter()
            .map(OrderedEntry::Layer)
            .chain(groups.into_iter().map(OrderedEntry::Group))
            .collect()
    }

    /// Mitglieds-Layer einer Gruppe in Listenreihenfolge.
    pub fn group_members(&self, group_id: &str) -> Vec<&Layer> {
        self.groups
            .get(group_id)
            .map(|g| {
                g.layer_ids
                    .iter()
                    .filter_map(|id| self.layers.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Reiner Zustandsübergang: alter Zustand + Aktion → neuer Zustand.
///
/// Unbekannte IDs machen die Aktion zum No-op.
pub fn reduce(state: &LayerState, action: LayerAction) -> LayerState {
    let mut next = state.clone();
    match action {
        LayerAction::AddLayer(mut layer) => {
            let mut layers = (*state.layers).clone();
            let mut groups = (*state.groups).clone();
            next.next_order = state.next_order.max(layer.order + 1);
            match layer.group_id.as_ref().and_then(|g| groups.get_mut(g)) {
                Some(group) => {
                    group.layer_ids.insert(layer.id.clone());
                }
                None => layer.group_id = None,
            }
            layers.insert(layer.id.clone(), layer);
            next.layers = Arc::new(layers);
            next.groups = Arc::new(groups);
        }

        LayerAction::UpdateLayer { id, patch } => {
            if let Some(existing) = state.layers.get(&id) {
                let mut layer = existing.clone();
                if let Some(name) = patch.name {
                    layer.name = name;
                }
                if let Some(visible) = patch.visible {
                    layer.visible = visible;
                }
                if let Some(locked) = patch.locked {
                    layer.locked = locked;
                }
                if let Some(order) = patch.order {
                    layer.order = order;
                }
                if let Some(style) = patch.style {
                    layer.style = style;
                }
                let mut layers = (*state.layers).clone();
                layers.insert(id, layer);
                next.layers = Arc::new(layers);
            }
        }

        LayerAction::DeleteLayer(id) => {
            let mut layers = (*state.layers).clone();
            if let Some(layer) = layers.shift_remove(&id) {
                if let Some(group_id) = &layer.group_id {
                    let mut groups = (*state.groups).clone();
                    if let Some(group) = groups.get_mut(group_id) {
                        group.layer_ids.shift_remove(&id);
                    }
                    next.groups = Arc::new(groups);
                }
                next.layers = Arc::new(layers);
            }
            if state.selected_layer_ids.contains(&id) {
                let mut selected = (*state.selected_layer_ids).clone();
                selected.shift_remove(&id);
                next.selected_layer_ids = Arc::new(selected);
            }
        }

        LayerAction::ReorderLayers(ids) => {
            let mut layers = (*state.layers).clone();
            let mut sequence: Vec<LayerId> = Vec::with_capacity(layers.len());
            for id in ids {
                if layers.contains_key(&id) && !sequence.contains(&id) {
                    sequence.push(id);
                }
            }
            // Nicht genannte Layer folgen in bisheriger Reihenfolge
            let mut rest: Vec<&Layer> = state
                .layers
                .values()
                .filter(|l| !sequence.contains(&l.id))
                .collect();
            rest.sort_by_key(|l| l.order);
            sequence.extend(rest.into_iter().map(|l| l.id.clone()));

            for (index, id) in sequence.iter().enumerate() {
                if let Some(layer) = layers.get_mut(id) {
                    layer.order = index;
                }
            }
            next.next_order = state.next_order.max(sequence.len());
            next.layers = Arc::new(layers);
        }

        LayerAction::AddGroup(group) => {
            let mut groups = (*state.groups).clone();
            groups.insert(group.id.clone(), group);
            next.groups = Arc::new(groups);
        }

        LayerAction::UpdateGroup { id, patch } => {
            if let Some(existing) = state.groups.get(&id) {
                let mut group = existing.clone();
                if let Some(name) = patch.name {
                    group.name = name;
                }
                if let Some(visible) = patch.visible {
                    group.visible = visible;
                }
                if let Some(collapsed) = patch.collapsed {
                    group.collapsed = collapsed;
                }
                if let Some(order) = patch.order {
                    group.order = order;
                }
                let mut groups = (*state.groups).clone();
                groups.insert(id, group);
                next.groups = Arc::new(groups);
            }
        }

        LayerAction::DeleteGroup(id) => {
            let mut groups = (*state.groups).clone();
            if let Some(group) = groups.shift_remove(&id) {
                let mut layers = (*state.layers).clone();
                for layer_id in &group.layer_ids {
                    if let Some(layer) = layers.get_mut(layer_id) {
                        layer.group_id = None;
                    }
                }
                next.layers = Arc::new(layers);
                next.groups = Arc::new(groups);
            }
        }

        LayerAction::MoveToGroup { layer_id, group_id } => {
            let target_missing = group_id
                .as_ref()
                .is_some_and(|g| !state.groups.contains_key(g));
            if target_missing {
                log::debug!("MoveToGroup: Gruppe {:?} existiert nicht", group_id);
                return next;
            }
            if let Some(existing) = state.layers.get(&layer_id) {
                let mut groups = (*state.groups).clone();
                if let Some(old) = existing.group_id.as_ref().and_then(|g| groups.get_mut(g)) {
                    old.layer_ids.shift_remove(&layer_id);
                }
                if let Some(new) = group_id.as_ref().and_then(|g| groups.get_mut(g)) {
                    new.layer_ids.insert(layer_id.clone());
                }
                let mut layer = existing.clone();
                layer.group_id = group_id;
                let mut layers = (*state.layers).clone();
                layers.insert(layer_id, layer);
                next.layers = Arc::new(layers);
                next.groups = Arc::new(groups);
            }
        }

        LayerAction::ToggleLayerVisibility(id) => {
            if let Some(existing) = state.layers.get(&id) {
                let mut layers = (*state.layers).clone();
                let visible = !existing.visible;
                if let Some(layer) = layers.get_mut(&id) {
                    layer.visible = visible;
                }
                next.layers = Arc::new(layers);
            }
        }

        LayerAction::ToggleGroupVisibility(id) => {
            if let Some(existing) = state.groups.get(&id) {
                let visible = !existing.visible;
                let mut groups = (*state.groups).clone();
                let mut layers = (*state.layers).clone();
                if let Some(group) = groups.get_mut(&id) {
                    group.visible = visible;
                }
                for layer_id in &existing.layer_ids {
                    if let Some(layer) = layers.get_mut(layer_id) {
                        layer.visible = visible;
                    }
                }
                next.groups = Arc::new(groups);
                next.layers = Arc::new(layers);
            }
        }

        LayerAction::SetSelectedLayers(ids) => {
            next.selected_layer_ids = Arc::new(ids.into_iter().collect());
        }
    }
    next
}

// ── Fassade ─────────────────────────────────────────────────────────

/// Layer-Verwaltung mit Feature-bezogenen Hilfsoperationen.
///
/// Hält den aktuellen `LayerState` und dispatcht alle Änderungen über
/// `reduce`, damit es genau einen Mutationspfad gibt.
#[derive(Debug, Clone, Default)]
pub struct LayerRegistry {
    state: LayerState,
    next_group: u64,
}

impl LayerRegistry {
    /// Leere Verwaltung.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aktueller Zustand (O(1)-Snapshot per Clone).
    pub fn state(&self) -> &LayerState {
        &self.state
    }

    /// Wendet eine Aktion an.
    pub fn dispatch(&mut self, action: LayerAction) {
        self.state = reduce(&self.state, action);
    }

    /// Layer nach ID.
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.state.layers.get(id)
    }

    /// Layer eines Features.
    pub fn layer_for_feature(&self, feature_id: FeatureId) -> Option<&Layer> {
        self.state.layers.get(&layer_id_for(feature_id))
    }

    /// Gruppe nach ID.
    pub fn group(&self, id: &str) -> Option<&LayerGroup> {
        self.state.groups.get(id)
    }

    /// Anzahl Layer.
    pub fn len(&self) -> usize {
        self.state.layers.len()
    }

    /// `true` ohne Layer.
    pub fn is_empty(&self) -> bool {
        self.state.layers.is_empty()
    }

    /// Legt den Layer zu einem neuen Feature an (Reihenfolge `next_order`).
    pub fn add_layer_from_feature(&mut self, feature: &Feature, styles: &StyleTable) -> LayerId {
        let kind = LayerType::of_feature(feature);
        let order = self.state.next_order;
        let id = layer_id_for(feature.id);
        let style = styles
            .get_or_default(feature.id, feature.geometry.class())
            .into_owned();
        self.dispatch(LayerAction::AddLayer(Layer {
            id: id.clone(),
            name: format!("{} {}", kind.label(), order + 1),
            feature_id: feature.id,
            visible: true,
            locked: false,
            order,
            group_id: None,
            kind,
            style,
            created: SystemTime::now(),
        }));
        id
    }

    /// Entfernt den Layer eines gelöschten Features.
    pub fn remove_layer_for_feature(&mut self, feature_id: FeatureId) {
        self.dispatch(LayerAction::DeleteLayer(layer_id_for(feature_id)));
    }

    /// Legt eine neue, leere Gruppe hinter allen bestehenden an.
    pub fn create_group(&mut self, name: Option<String>) -> GroupId {
        self.next_group += 1;
        let id = format!("group-{}", self.next_group);
        let order = self
            .state
            .groups
            .values()
            .map(|g| g.order + 1)
            .max()
            .unwrap_or(0);
        let name = name.unwrap_or_else(|| format!("Group {}", self.next_group));
        self.dispatch(LayerAction::AddGroup(LayerGroup {
            id: id.clone(),
            name,
            visible: true,
            collapsed: false,
            order,
            layer_ids: IndexSet::new(),
            created: SystemTime::now(),
        }));
        id
    }

    /// Render-Reihenfolge je Feature für den Style-Resolver.
    pub fn layer_order_table(&self) -> LayerOrderTable {
        self.state
            .layers
            .values()
            .map(|l| (l.feature_id, l.order))
            .collect()
    }

    /// Überträgt die Layer-Sichtbarkeit auf die Features (`layerVisible`).
    pub fn sync_feature_visibility(&self, source: &mut VectorSource) {
        for layer in self.state.layers.values() {
            source.set_layer_visible(layer.feature_id, layer.visible);
        }
    }

    /// Karten-Selektion → Layer-Selektion.
    pub fn select_layers_from_features(&mut self, feature_ids: &[FeatureId]) {
        let ids = feature_ids.iter().map(|id| layer_id_for(*id)).collect();
        self.dispatch(LayerAction::SetSelectedLayers(ids));
    }

    /// Features zu Layer-IDs (unbekannte Layer werden übergangen).
    pub fn feature_ids_for_layers(&self, layer_ids: &[LayerId]) -> Vec<FeatureId> {
        layer_ids
            .iter()
            .filter_map(|id| self.state.layers.get(id))
            .map(|l| l.feature_id)
            .collect()
    }

    /// Gleicht die Layer mit den vorhandenen Features ab (nach Undo/Redo).
    ///
    /// Layer verschwundener Features werden entfernt, Features ohne Layer
    /// bekommen einen neuen. Gibt `true` zurück, wenn sich etwas geändert hat.
    pub fn reconcile(&mut self, source: &VectorSource, styles: &StyleTable) -> bool {
        let orphaned: Vec<FeatureId> = self
            .state
            .layers
            .values()
            .map(|l| l.feature_id)
            .filter(|id| !source.contains(*id))
            .collect();
        let missing: Vec<FeatureId> = source
            .iter()
            .map(|f| f.id)
            .filter(|id| self.layer_for_feature(*id).is_none())
            .collect();

        for id in &orphaned {
            self.remove_layer_for_feature(*id);
        }
        for id in &missing {
            if let Some(feature) = source.get(*id) {
                self.add_layer_from_feature(feature, styles);
            }
        }
        if !orphaned.is_empty() || !missing.is_empty() {
            log::debug!(
                "Layer abgeglichen: {} entfernt, {} ergänzt",
                orphaned.len(),
                missing.len()
            );
        }
        !orphaned.is_empty() || !missing.is_empty()
    }
}
