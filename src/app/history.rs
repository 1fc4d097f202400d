//! Undo/Redo: Snapshots, austauschbarer Command-Stack und Koordinator.
//!
//! Der Koordinator (`UndoRedo`) kennt den eigentlichen Stack nur als
//! optionales Trait-Objekt. Ohne angehängten Stack sind alle Operationen
//! No-ops und `can_undo`/`can_redo` bleiben `false`.

use crate::core::{Feature, FeatureId, FeatureStyle, StyleTable, VectorSource};
use indexmap::IndexMap;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Snapshot der undo-relevanten Dokumentteile (Features + Styles).
///
/// Beide Maps liegen hinter `Arc`: das Erstellen ist O(1), die Kopie
/// passiert erst beim nächsten schreibenden Zugriff (Copy-on-Write).
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Feature-Bestand
    pub features: Arc<IndexMap<FeatureId, Feature>>,
    /// Style-Tabelle
    pub styles: Arc<HashMap<FeatureId, FeatureStyle>>,
}

impl Snapshot {
    /// Erstellt einen O(1)-Snapshot aus Quelle und Style-Tabelle.
    pub fn capture(source: &VectorSource, styles: &StyleTable) -> Self {
        Self {
            features: source.snapshot(),
            styles: styles.snapshot(),
        }
    }

    /// Erstellt einen Snapshot des Dokuments im AppState.
    pub fn from_state(state: &crate::app::AppState) -> Self {
        Self::capture(&state.source, &state.styles)
    }

    /// Stellt den Snapshot wieder her (O(1) Arc-Zuweisung).
    pub fn restore(self, source: &mut VectorSource, styles: &mut StyleTable) {
        source.restore(self.features);
        styles.restore(self.styles);
    }

    /// Anzahl Features im Snapshot.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

// ── Command-Stack ───────────────────────────────────────────────────

/// Schnittstelle eines Undo/Redo-Stacks.
///
/// `pop_undo`/`pop_redo` bekommen den aktuellen Zustand, damit der Stack
/// ihn auf die Gegenseite legen kann; zurück kommt der anzuwendende Zustand.
pub trait CommandStack {
    /// Legt einen Zustand vor einer Änderung ab (leert Redo).
    fn record(&mut self, snapshot: Snapshot);
    /// Undo: liefert den vorherigen Zustand.
    fn pop_undo(&mut self, current: Snapshot) -> Option<Snapshot>;
    /// Redo: liefert den rückgängig gemachten Zustand.
    fn pop_redo(&mut self, current: Snapshot) -> Option<Snapshot>;
    /// Verwirft beide Stacks.
    fn clear(&mut self);
    /// Länge des Undo-Stacks.
    fn undo_len(&self) -> usize;
    /// Länge des Redo-Stacks.
    fn redo_len(&self) -> usize;
    /// Beginnt einen Block: alle Änderungen bis `end_block` sind ein Schritt.
    fn start_block(&mut self);
    /// Beendet einen Block.
    fn end_block(&mut self);
}

/// Eingebauter Snapshot-Stack mit begrenzter Tiefe.
///
/// Blöcke sind verschachtelbar; innerhalb eines Blocks zählt nur die erste
/// Aufzeichnung (der Zustand vor dem ersten Schritt der Geste).
#[derive(Default)]
pub struct SnapshotStack {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: VecDeque<Snapshot>,
    max_depth: usize,
    block_depth: usize,
    block_recorded: bool,
}

impl SnapshotStack {
    /// Erstellt einen Stack mit maximaler Tiefe (mindestens 1).
    pub fn new_with_capacity(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            undo_stack: VecDeque::with_capacity(max_depth),
            redo_stack: VecDeque::with_capacity(max_depth),
            max_depth,
            block_depth: 0,
            block_recorded: false,
        }
    }

    fn push_bounded(stack: &mut VecDeque<Snapshot>, snap: Snapshot, max_depth: usize) {
        while stack.len() >= max_depth {
            stack.pop_front();
        }
        stack.push_back(snap);
    }
}

impl CommandStack for SnapshotStack {
    fn record(&mut self, snapshot: Snapshot) {
        if self.block_depth > 0 {
            if self.block_recorded {
                return;
            }
            self.block_recorded = true;
        }
        Self::push_bounded(&mut self.undo_stack, snapshot, self.max_depth);
        self.redo_stack.clear();
    }

    fn pop_undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let prev = self.undo_stack.pop_back()?;
        Self::push_bounded(&mut self.redo_stack, current, self.max_depth);
        Some(prev)
    }

    fn pop_redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop_back()?;
        Self::push_bounded(&mut self.undo_stack, current, self.max_depth);
        Some(next)
    }

    fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    fn start_block(&mut self) {
        if self.block_depth == 0 {
            self.block_recorded = false;
        }
        self.block_depth += 1;
    }

    fn end_block(&mut self) {
        self.block_depth = self.block_depth.saturating_sub(1);
        if self.block_depth == 0 {
            self.block_recorded = false;
        }
    }
}

// ── Koordinator ─────────────────────────────────────────────────────

/// Undo/Redo-Koordinator über einem optionalen Command-Stack.
///
/// Der Stack kann nach der Konstruktion angehängt werden (spätes Laden).
/// `can_undo`/`can_redo` werden nach jeder Stack-Änderung neu berechnet.
#[derive(Default)]
pub struct UndoRedo {
    stack: Option<Box<dyn CommandStack>>,
    can_undo: bool,
    can_redo: bool,
}

impl UndoRedo {
    /// Koordinator ohne Stack (alle Operationen No-ops).
    pub fn detached() -> Self {
        Self::default()
    }

    /// Koordinator mit eingebautem Snapshot-Stack.
    pub fn with_snapshot_stack(max_depth: usize) -> Self {
        let mut history = Self::default();
        history.attach(Box::new(SnapshotStack::new_with_capacity(max_depth)));
        history
    }

    /// Hängt einen Stack an (ersetzt einen vorhandenen).
    pub fn attach(&mut self, stack: Box<dyn CommandStack>) {
        self.stack = Some(stack);
        self.refresh();
        log::debug!("Undo/Redo-Stack angehängt");
    }

    /// `true` wenn ein Stack angehängt ist.
    pub fn is_attached(&self) -> bool {
        self.stack.is_some()
    }

    /// Undo möglich.
    pub fn can_undo(&self) -> bool {
        self.can_undo
    }

    /// Redo möglich.
    pub fn can_redo(&self) -> bool {
        self.can_redo
    }

    fn refresh(&mut self) {
        let (undo, redo) = self
            .stack
            .as_ref()
            .map(|s| (s.undo_len(), s.redo_len()))
            .unwrap_or((0, 0));
        self.can_undo = undo > 0;
        self.can_redo = redo > 0;
    }

    /// Zeichnet den Zustand vor einer Änderung auf.
    pub fn record(&mut self, snapshot: Snapshot) {
        if let Some(stack) = self.stack.as_mut() {
            stack.record(snapshot);
            self.refresh();
        }
    }

    /// Undo: liefert den wiederherzustellenden Zustand (Aufrufer wendet an).
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let prev = self.stack.as_mut()?.pop_undo(current);
        self.refresh();
        prev
    }

    /// Redo: liefert den wiederherzustellenden Zustand (Aufrufer wendet an).
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.stack.as_mut()?.pop_redo(current);
        self.refresh();
        next
    }

    /// Verwirft den gesamten Verlauf.
    pub fn clear_history(&mut self) {
        if let Some(stack) = self.stack.as_mut() {
            stack.clear();
            self.refresh();
        }
    }

    /// Beginnt einen zusammenhängenden Undo-Schritt.
    pub fn start_block(&mut self) {
        if let Some(stack) = self.stack.as_mut() {
            stack.start_block();
        }
    }

    /// Beendet einen zusammenhängenden Undo-Schritt.
    pub fn end_block(&mut self) {
        if let Some(stack) = self.stack.as_mut() {
            stack.end_block();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Geometry;
    use glam::DVec2;

    fn snapshot_with_feature_count(count: usize) -> Snapshot {
        let mut source = VectorSource::new();
        for i in 0..count {
            source.add(Geometry::Point(DVec2::splat(i as f64)));
        }
        Snapshot::capture(&source, &StyleTable::new())
    }

    #[test]
    fn detached_coordinator_is_inert() {
        let mut history = UndoRedo::detached();
        history.record(snapshot_with_feature_count(1));
        history.start_block();
        history.end_block();
        assert!(history.undo(snapshot_with_feature_count(2)).is_none());
        assert!(history.redo(snapshot_with_feature_count(2)).is_none());
        history.clear_history();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(!history.is_attached());
    }

    #[test]
    fn late_attach_enables_history() {
        let mut history = UndoRedo::detached();
        history.attach(Box::new(SnapshotStack::new_with_capacity(10)));
        history.record(snapshot_with_feature_count(1));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_then_redo_swaps_states() {
        let mut history = UndoRedo::with_snapshot_stack(10);
        history.record(snapshot_with_feature_count(2));

        let restored = history
            .undo(snapshot_with_feature_count(5))
            .expect("undo vorhanden");
        assert_eq!(restored.feature_count(), 2);
        assert!(!history.can_undo());
        assert!(history.can_redo());

        let redone = history
            .redo(snapshot_with_feature_count(2))
            .expect("redo vorhanden");
        assert_eq!(redone.feature_count(), 5);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn new_record_clears_redo_stack() {
        let mut history = UndoRedo::with_snapshot_stack(10);
        history.record(snapshot_with_feature_count(1));
        let _ = history.undo(snapshot_with_feature_count(3));
        assert!(history.can_redo());

        history.record(snapshot_with_feature_count(7));
        assert!(!history.can_redo());
    }

    #[test]
    fn respects_max_depth() {
        let mut stack = SnapshotStack::new_with_capacity(3);
        for i in 1..=5 {
            stack.record(snapshot_with_feature_count(i));
        }
        assert_eq!(stack.undo_len(), 3);
        let oldest_kept = (0..3)
            .filter_map(|_| stack.pop_undo(snapshot_with_feature_count(99)))
            .last()
            .expect("drei Undo-Schritte");
        assert_eq!(oldest_kept.feature_count(), 3);
    }

    #[test]
    fn long_sessions_keep_newest_snapshots() {
        let mut stack = SnapshotStack::new_with_capacity(50);
        for i in 1..=200 {
            stack.record(snapshot_with_feature_count(i));
        }
        assert_eq!(stack.undo_len(), 50);

        let popped: Vec<usize> = std::iter::from_fn(|| {
            stack
                .pop_undo(snapshot_with_feature_count(0))
                .map(|s| s.feature_count())
        })
        .collect();
        assert_eq!(popped.first(), Some(&200));
        assert_eq!(popped.last(), Some(&151));
        assert_eq!(stack.redo_len(), 50);
    }

    #[test]
    fn block_keeps_only_first_record() {
        let mut history = UndoRedo::with_snapshot_stack(10);
        history.start_block();
        history.record(snapshot_with_feature_count(1));
        history.record(snapshot_with_feature_count(2));
        history.start_block();
        history.record(snapshot_with_feature_count(3));
        history.end_block();
        history.record(snapshot_with_feature_count(4));
        history.end_block();

        let restored = history
            .undo(snapshot_with_feature_count(9))
            .expect("ein Undo-Schritt");
        assert_eq!(restored.feature_count(), 1);
        assert!(!history.can_undo());

        history.record(snapshot_with_feature_count(5));
        history.record(snapshot_with_feature_count(6));
        assert!(history.can_undo());
        let _ = history.undo(snapshot_with_feature_count(9));
        assert!(history.can_undo(), "außerhalb von Blöcken zählt jede Aufzeichnung");
    }

    #[test]
    fn restore_replaces_features_and_styles() {
        let mut source = VectorSource::new();
        let mut styles = StyleTable::new();
        let id = source.add(Geometry::Point(DVec2::ZERO));
        styles.assign_default(id, crate::core::GeometryClass::Point);
        let snap = Snapshot::capture(&source, &styles);

        source.remove(id);
        styles.remove(id);
        snap.restore(&mut source, &mut styles);

        assert!(source.contains(id));
        assert!(styles.get(id).is_some());
    }
}
