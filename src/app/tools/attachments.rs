//! Registrierung der Eingabe-Handler mit garantiertem Abbau (RAII).
//!
//! Jede aktive Interaktion (Select, Draw, Modify, …) ist ein Eintrag in der
//! gemeinsamen `AttachmentRegistry`. Der Eintrag lebt genau so lange wie sein
//! `AttachmentGuard`; Drop entfernt ihn. Eine Mode-Session besitzt ihre
//! Guards, das Verwerfen der Session baut also alles ab.

use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Art eines angehängten Handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    /// Klick-Selektion
    Select,
    /// Shift-Ziehen für Box-Selektion
    DragBox,
    /// Stützpunkte verschieben
    Modify,
    /// Move-Handle (ganze Geometrie verschieben)
    Translate,
    /// Hover-Hervorhebung
    Hover,
    /// Zeichnen (Linie, Polygon, Rechteck, Kreis, Bezier)
    Draw,
    /// Parallele Kopie von Linien
    Offset,
    /// Skalieren/Strecken von Flächen
    Transform,
    /// Löschen per Klick
    Delete,
    /// Temporäre Vorschau-Ebene
    PreviewOverlay,
    /// Tastatur (global)
    Keyboard,
}

/// Gemeinsam genutzte Registry (single-threaded).
pub type SharedAttachments = Rc<RefCell<AttachmentRegistry>>;

/// Buchführung über alle aktuell angehängten Handler.
#[derive(Debug, Default)]
pub struct AttachmentRegistry {
    next_handle: u64,
    active: IndexMap<u64, AttachmentKind>,
}

impl AttachmentRegistry {
    /// Neue, leere Registry zum Teilen.
    pub fn shared() -> SharedAttachments {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Hängt einen Handler an; der Guard baut ihn beim Drop wieder ab.
    pub fn attach(registry: &SharedAttachments, kind: AttachmentKind) -> AttachmentGuard {
        let handle = {
            let mut reg = registry.borrow_mut();
            reg.next_handle += 1;
            let handle = reg.next_handle;
            reg.active.insert(handle, kind);
            handle
        };
        log::trace!("Handler angehängt: {:?} (#{})", kind, handle);
        AttachmentGuard {
            registry: Rc::downgrade(registry),
            handle,
            kind,
        }
    }

    /// Anzahl aktiver Handler.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// `true` ohne aktive Handler.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Anzahl aktiver Handler einer Art.
    pub fn count(&self, kind: AttachmentKind) -> usize {
        self.active.values().filter(|k| **k == kind).count()
    }

    /// Aktive Arten in Anhänge-Reihenfolge.
    pub fn kinds(&self) -> Vec<AttachmentKind> {
        self.active.values().copied().collect()
    }
}

/// Besitz eines angehängten Handlers.
#[derive(Debug)]
pub struct AttachmentGuard {
    registry: Weak<RefCell<AttachmentRegistry>>,
    handle: u64,
    kind: AttachmentKind,
}

impl AttachmentGuard {
    /// Art des Handlers.
    pub fn kind(&self) -> AttachmentKind {
        self.kind
    }
}

impl Drop for AttachmentGuard {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        match registry.try_borrow_mut() {
            Ok(mut reg) => {
                reg.active.shift_remove(&self.handle);
                log::trace!("Handler abgebaut: {:?} (#{})", self.kind, self.handle);
            }
            Err(_) => log::error!(
                "Handler {:?} (#{}) konnte nicht abgebaut werden: Registry belegt",
                self.kind,
                self.handle
            ),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_drop_detaches() {
        let registry = AttachmentRegistry::shared();
        let a = AttachmentRegistry::attach(&registry, AttachmentKind::Select);
        let b = AttachmentRegistry::attach(&registry, AttachmentKind::Select);
        assert_eq!(registry.borrow().count(AttachmentKind::Select), 2);

        drop(a);
        assert_eq!(registry.borrow().count(AttachmentKind::Select), 1);
        assert_eq!(b.kind(), AttachmentKind::Select);
        drop(b);
        assert!(registry.borrow().is_empty());
    }

    #[test]
    fn guard_outliving_registry_is_harmless() {
        let registry = AttachmentRegistry::shared();
        let guard = AttachmentRegistry::attach(&registry, AttachmentKind::Draw);
        drop(registry);
        drop(guard);
    }

    #[test]
    fn guard_drop_with_borrowed_registry_keeps_entry() {
        let registry = AttachmentRegistry::shared();
        let guard = AttachmentRegistry::attach(&registry, AttachmentKind::Modify);
        {
            let reader = registry.borrow();
            drop(guard);
            assert_eq!(reader.count(AttachmentKind::Modify), 1);
        }
        assert_eq!(registry.borrow().count(AttachmentKind::Modify), 1);
    }
}
