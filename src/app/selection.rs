//! Karten-Selektion und ihre entprellte Weitergabe an die Layer-Verwaltung.

use crate::core::{FeatureId, VectorSource};
use indexmap::IndexSet;
use std::time::{Duration, Instant};

/// Geordnete Menge selektierter Features.
///
/// Jede Änderung setzt zugleich das `selected`-Flag an den Features, damit
/// Resolver und Selektion nie auseinanderlaufen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    ids: IndexSet<FeatureId>,
}

impl SelectionState {
    /// Leere Selektion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selektierte IDs in Reihenfolge.
    pub fn ids(&self) -> &IndexSet<FeatureId> {
        &self.ids
    }

    /// Kopie als Vec.
    pub fn to_vec(&self) -> Vec<FeatureId> {
        self.ids.iter().copied().collect()
    }

    /// `true` wenn die ID selektiert ist.
    pub fn contains(&self, id: FeatureId) -> bool {
        self.ids.contains(&id)
    }

    /// Anzahl selektierter Features.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// `true` ohne Selektion.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Die einzige selektierte ID (Move-Handle).
    pub fn single(&self) -> Option<FeatureId> {
        match self.ids.len() {
            1 => self.ids.first().copied(),
            _ => None,
        }
    }

    /// Ersetzt die Selektion. Unbekannte IDs werden übergangen.
    pub fn replace(&mut self, source: &mut VectorSource, ids: &[FeatureId]) -> bool {
        let next: IndexSet<FeatureId> = ids.iter().copied().filter(|id| source.contains(*id)).collect();
        if next == self.ids {
            return false;
        }
        for id in self.ids.iter().filter(|id| !next.contains(*id)) {
            source.set_selected(*id, false);
        }
        for id in &next {
            source.set_selected(*id, true);
        }
        self.ids = next;
        true
    }

    /// Fügt IDs hinzu (Box-Selektion erweitert immer).
    pub fn extend(&mut self, source: &mut VectorSource, ids: &[FeatureId]) -> bool {
        let known: Vec<FeatureId> = ids
            .iter()
            .copied()
            .filter(|id| source.contains(*id))
            .collect();
        let mut changed = false;
        for id in known {
            if self.ids.insert(id) {
                source.set_selected(id, true);
                changed = true;
            }
        }
        changed
    }

    /// Schaltet eine ID um (Shift-Klick).
    pub fn toggle(&mut self, source: &mut VectorSource, id: FeatureId) -> bool {
        if self.ids.shift_remove(&id) {
            source.set_selected(id, false);
            true
        } else if source.contains(id) {
            self.ids.insert(id);
            source.set_selected(id, true);
            true
        } else {
            false
        }
    }

    /// Entfernt eine ID (z.B. nach dem Löschen des Features).
    pub fn remove(&mut self, source: &mut VectorSource, id: FeatureId) -> bool {
        let removed = self.ids.shift_remove(&id);
        if removed {
            source.set_selected(id, false);
        }
        removed
    }

    /// Leert die Selektion.
    pub fn clear(&mut self, source: &mut VectorSource) -> bool {
        if self.ids.is_empty() {
            return false;
        }
        for id in self.ids.drain(..) {
            source.set_selected(id, false);
        }
        true
    }

    /// Leert die Selektion und entfernt verwaiste `selected`-Flags
    /// (nach dem Wiederherstellen eines Snapshots).
    pub fn reset(&mut self, source: &mut VectorSource) {
        self.ids.clear();
        let flagged: Vec<FeatureId> = source
            .iter()
            .filter(|f| f.properties.selected)
            .map(|f| f.id)
            .collect();
        for id in flagged {
            source.set_selected(id, false);
        }
    }
}

// ── Entprellte Synchronisation ──────────────────────────────────────

#[derive(Debug, Clone)]
struct PendingSync {
    deadline: Instant,
    ids: Vec<FeatureId>,
}

/// Einweg-Synchronisation Karte → Layer-Verwaltung mit einem Timer.
///
/// Jede neue Selektion startet den Timer neu; erst nach Ablauf liefert
/// `poll` die zuletzt gemeldete Selektion genau einmal aus.
#[derive(Debug, Clone)]
pub struct SelectionSync {
    debounce: Duration,
    pending: Option<PendingSync>,
}

impl SelectionSync {
    /// Erstellt die Synchronisation mit Entprellzeit in Millisekunden.
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            debounce: Duration::from_millis(debounce_ms),
            pending: None,
        }
    }

    /// Meldet eine Selektionsänderung an (Timer startet neu).
    pub fn schedule(&mut self, now: Instant, ids: Vec<FeatureId>) {
        self.pending = Some(PendingSync {
            deadline: now + self.debounce,
            ids,
        });
    }

    /// Liefert die Selektion, sobald die Entprellzeit abgelaufen ist.
    pub fn poll(&mut self, now: Instant) -> Option<Vec<FeatureId>> {
        match &self.pending {
            Some(p) if now >= p.deadline => self.pending.take().map(|p| p.ids),
            _ => None,
        }
    }

    /// `true` solange eine Meldung aussteht.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for SelectionSync {
    fn default() -> Self {
        Self::new(crate::shared::options::SELECTION_SYNC_DEBOUNCE_MS)
    }
}
