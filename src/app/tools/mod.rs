//! Interaktions-Controller: Werkzeug-Zustandsmaschine über abstrakten Eingaben.
//!
//! Jedes Werkzeug ist ein `ToolMode`. Die aktive `ModeSession` besitzt die
//! RAII-Guards ihrer Handler; ein Werkzeugwechsel bricht die laufende Geste
//! ab, verwirft die Session (Abbau aller Handler), leert die Selektion und
//! öffnet erst dann die neue Session. Fehler eines Modus werden geloggt und
//! brechen den Zyklus nie ab.

/// RAII-Registrierung der Eingabe-Handler.
pub mod attachments;
/// Bezier-Werkzeug: Kontrollpunkte per Mehrfachklick.
mod bezier;
/// Lösch-Werkzeug mit Hover-Warnung.
mod delete;
/// Zeichenwerkzeuge für Linie, Polygon, Rechteck und Kreis.
mod draw;
/// Optionale Offset-/Transform-Erweiterungen.
pub mod extensions;
/// Parallele Kopie (Linien) und Skalierung (Flächen).
mod offset;
/// Select-Modus mit Box-Selektion, Modify und Move-Handle.
mod select;

pub use attachments::{AttachmentGuard, AttachmentKind, AttachmentRegistry, SharedAttachments};
pub use extensions::{
    Extensions, LineOffset, OffsetCapability, ScaleTransform, TransformCapability,
};

use super::history::{Snapshot, UndoRedo};
use super::selection::SelectionState;
use crate::core::{Feature, FeatureId, FeatureStyle, Geometry, MapView, Rgba, StyleTable, VectorSource};
use crate::render::{DrawPrimitive, FillStyle, PrimitiveKind, StrokeStyle, Symbol};
use crate::shared::EditorOptions;
use glam::DVec2;
use std::sync::Arc;

// ── Typen ────────────────────────────────────────────────────────

/// Aktives Editor-Werkzeug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTool {
    /// Selektieren, Stützpunkte und Features verschieben
    #[default]
    Select,
    /// Linie zeichnen
    DrawLine,
    /// Polygon zeichnen
    DrawPolygon,
    /// Rechteck aufziehen
    DrawRectangle,
    /// Kreis aufziehen
    DrawCircle,
    /// Bezier-Kurve aus Kontrollpunkten
    DrawBezier,
    /// Parallele Kopie / Skalieren
    Offset,
    /// Features löschen
    Delete,
}

impl EditorTool {
    /// Alle Werkzeuge in Toolbar-Reihenfolge.
    pub const ALL: [EditorTool; 8] = [
        EditorTool::Select,
        EditorTool::DrawLine,
        EditorTool::DrawPolygon,
        EditorTool::DrawRectangle,
        EditorTool::DrawCircle,
        EditorTool::DrawBezier,
        EditorTool::Offset,
        EditorTool::Delete,
    ];

    /// Kurzname (wie in der Toolbar)
    pub fn name(self) -> &'static str {
        match self {
            EditorTool::Select => "select",
            EditorTool::DrawLine => "draw-line",
            EditorTool::DrawPolygon => "draw-polygon",
            EditorTool::DrawRectangle => "draw-rectangle",
            EditorTool::DrawCircle => "draw-circle",
            EditorTool::DrawBezier => "draw-bezier",
            EditorTool::Offset => "offset",
            EditorTool::Delete => "delete",
        }
    }

    /// Werkzeug zum Kurznamen.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

/// Gedrückte Modifier-Tasten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Shift
    pub shift: bool,
    /// Ctrl/Cmd
    pub ctrl: bool,
}

impl Modifiers {
    /// Nur Shift.
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
    };
    /// Nur Ctrl.
    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
    };
}

/// Relevante Tasten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Zurück zu Select (global)
    Escape,
    /// Zeichnung abschließen
    Enter,
    /// Letzten Punkt entfernen
    Backspace,
    /// Sonstiges Zeichen (Kleinbuchstabe)
    Char(char),
}

/// Eingabe-Ereignis in Kartenkoordinaten.
///
/// Ein Klick ohne Bewegung kommt als `PointerDown`, `PointerUp`, `Click`;
/// ein Doppelklick zusätzlich gefolgt von `DoubleClick`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Taste gedrückt auf der Karte
    PointerDown {
        /// Position (Karte)
        pos: DVec2,
        /// Modifier
        modifiers: Modifiers,
    },
    /// Zeiger bewegt
    PointerMove {
        /// Position (Karte)
        pos: DVec2,
        /// Modifier
        modifiers: Modifiers,
    },
    /// Taste losgelassen
    PointerUp {
        /// Position (Karte)
        pos: DVec2,
        /// Modifier
        modifiers: Modifiers,
    },
    /// Einfacher Klick
    Click {
        /// Position (Karte)
        pos: DVec2,
        /// Modifier
        modifiers: Modifiers,
    },
    /// Doppelklick
    DoubleClick {
        /// Position (Karte)
        pos: DVec2,
        /// Modifier
        modifiers: Modifiers,
    },
    /// Tastendruck
    Key {
        /// Taste
        key: Key,
        /// Modifier
        modifiers: Modifiers,
    },
}

impl InputEvent {
    /// Klick ohne Modifier.
    pub fn click(pos: DVec2) -> Self {
        InputEvent::Click {
            pos,
            modifiers: Modifiers::default(),
        }
    }

    /// Tastendruck ohne Modifier.
    pub fn key(key: Key) -> Self {
        InputEvent::Key {
            key,
            modifiers: Modifiers::default(),
        }
    }
}

/// Fachliche Folgen einer Eingabe, ausgewertet vom App-Layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditEvent {
    /// Neues Feature (bekommt einen Layer)
    FeatureAdded(FeatureId),
    /// Feature gelöscht (Layer entfernen)
    FeatureRemoved(FeatureId),
    /// Geometrie nach abgeschlossener Geste geändert
    GeometryChanged(FeatureId),
    /// Karten-Selektion geändert (entprellt an die Layer-Verwaltung)
    SelectionChanged,
}

// ── Kontext ─────────────────────────────────────────────────────

/// Alles, was ein Werkzeug während eines Ereignisses anfassen darf.
pub struct ToolContext<'a> {
    /// Feature-Quelle
    pub source: &'a mut VectorSource,
    /// Style-Tabelle
    pub styles: &'a mut StyleTable,
    /// Karten-Selektion
    pub selection: &'a mut SelectionState,
    /// Undo/Redo
    pub history: &'a mut UndoRedo,
    /// Kartenansicht (für Pixel-Toleranzen)
    pub view: &'a MapView,
    /// Laufzeit-Optionen
    pub options: &'a EditorOptions,
    /// Optionale Erweiterungen
    pub extensions: &'a Extensions,
    /// Gesammelte Folgen
    pub events: &'a mut Vec<EditEvent>,
}

impl ToolContext<'_> {
    /// Pick-Toleranz für Features in Karteneinheiten.
    pub fn hit_tolerance(&self) -> f64 {
        self.view.pixels_to_map(self.options.hit_tolerance_px)
    }

    /// Greif-Radius für Stützpunkte und Move-Handle in Karteneinheiten.
    pub fn vertex_tolerance(&self) -> f64 {
        self.view.pixels_to_map(self.options.vertex_tolerance_px)
    }

    /// Mindest-Zugweite in Karteneinheiten.
    pub fn drag_threshold(&self) -> f64 {
        self.view.pixels_to_map(self.options.drag_threshold_px)
    }

    /// Legt den aktuellen Dokumentzustand im Verlauf ab.
    pub fn record_snapshot(&mut self) {
        self.history
            .record(Snapshot::capture(self.source, self.styles));
    }

    /// Fügt ein fertiges Feature ein und vergibt den Style.
    ///
    /// Ohne Vorlage bekommt es den typgerechten Standard. Der Style wird
    /// immer kopiert.
    pub fn commit_feature(&mut self, feature: Feature, style: Option<&FeatureStyle>) -> FeatureId {
        let id = feature.id;
        let class = feature.geometry.class();
        self.source.insert(feature);
        match style {
            Some(style) => self.styles.set(id, style),
            None => self.styles.assign_default(id, class),
        }
        self.events.push(EditEvent::FeatureAdded(id));
        id
    }

    /// Meldet eine Selektionsänderung.
    pub fn selection_changed(&mut self) {
        self.events.push(EditEvent::SelectionChanged);
    }
}

/// Setzt `hovered` genau auf `hit` (alle anderen verlieren das Flag).
pub(crate) fn set_hover(source: &mut VectorSource, hit: Option<FeatureId>) {
    let stale: Vec<FeatureId> = source
        .iter()
        .filter(|f| f.properties.hovered && Some(f.id) != hit)
        .map(|f| f.id)
        .collect();
    for id in stale {
        source.set_hovered(id, false);
    }
    if let Some(id) = hit {
        source.set_hovered(id, true);
    }
}

// ── Overlays ─────────────────────────────────────────────────────

const SKETCH_STROKE: Rgba = Rgba::new(0, 153, 255, 1.0);
const SKETCH_FILL: Rgba = Rgba::new(255, 255, 255, 0.4);

/// Vorschau-Primitiv (nicht zu einem Feature gehörig).
pub(crate) fn overlay(geometry: Geometry, stroke: StrokeStyle, fill: Option<Rgba>) -> DrawPrimitive {
    let fill = fill.filter(|_| geometry.is_area()).map(FillStyle::Solid);
    DrawPrimitive {
        feature_id: None,
        geometry: Arc::new(geometry),
        stroke: Some(stroke),
        fill,
        symbol: None,
        z_index: 0,
        layer_order: 0,
        kind: PrimitiveKind::Overlay,
    }
}

/// Skizze im Standard-Zeichenstil.
pub(crate) fn sketch_overlay(geometry: Geometry) -> DrawPrimitive {
    overlay(geometry, StrokeStyle::solid(SKETCH_STROKE, 2.0), Some(SKETCH_FILL))
}

/// Punkt-Markierung im Zeichenstil (Stützpunkte der Skizze, Handles).
pub(crate) fn marker_overlay(pos: DVec2, radius: f64, fill: Rgba) -> DrawPrimitive {
    DrawPrimitive::point(
        None,
        pos,
        Symbol::Circle {
            radius,
            fill,
            stroke: StrokeStyle::solid(Rgba::WHITE, 2.0),
        },
        0,
        PrimitiveKind::Overlay,
    )
}

// ── ToolMode ─────────────────────────────────────────────────────

/// Schnittstelle aller Werkzeug-Modi.
pub trait ToolMode {
    /// Zugehöriges Werkzeug.
    fn tool(&self) -> EditorTool;

    /// Handler, die für die Dauer der Session angehängt werden.
    fn attachments(&self) -> &'static [AttachmentKind];

    /// Verarbeitet ein Eingabe-Ereignis.
    fn handle(&mut self, ctx: &mut ToolContext<'_>, event: &InputEvent) -> anyhow::Result<()>;

    /// Bricht eine laufende Geste ab (ohne sie zu übernehmen).
    fn cancel(&mut self, ctx: &mut ToolContext<'_>);

    /// Hat der Modus angefangene Eingaben?
    fn has_pending_input(&self) -> bool {
        false
    }

    /// Abgleich nach Selektions- oder Dokumentänderungen von außen.
    fn sync(&mut self, _source: &VectorSource, _selection: &SelectionState) {}

    /// Vorschau-Primitive (Skizzen, Handles, Hervorhebungen).
    fn overlays(&self, _source: &VectorSource, _view: &MapView) -> Vec<DrawPrimitive> {
        Vec::new()
    }
}

fn open_mode(tool: EditorTool, registry: &SharedAttachments) -> Box<dyn ToolMode> {
    match tool {
        EditorTool::Select => Box::new(select::SelectMode::new(registry)),
        EditorTool::DrawLine => Box::new(draw::DrawMode::new(draw::DrawKind::Line)),
        EditorTool::DrawPolygon => Box::new(draw::DrawMode::new(draw::DrawKind::Polygon)),
        EditorTool::DrawRectangle => Box::new(draw::DrawMode::new(draw::DrawKind::Rectangle)),
        EditorTool::DrawCircle => Box::new(draw::DrawMode::new(draw::DrawKind::Circle)),
        EditorTool::DrawBezier => Box::new(bezier::BezierMode::new(registry)),
        EditorTool::Offset => Box::new(offset::OffsetMode::new()),
        EditorTool::Delete => Box::new(delete::DeleteMode::new()),
    }
}

/// Aktiver Modus samt seiner Handler-Guards.
pub struct ModeSession {
    mode: Box<dyn ToolMode>,
    _guards: Vec<AttachmentGuard>,
}

impl ModeSession {
    fn open(tool: EditorTool, registry: &SharedAttachments) -> Self {
        let mode = open_mode(tool, registry);
        let guards = mode
            .attachments()
            .iter()
            .map(|kind| AttachmentRegistry::attach(registry, *kind))
            .collect();
        log::debug!("Modus '{}' aktiviert", tool.name());
        Self {
            mode,
            _guards: guards,
        }
    }

    /// Werkzeug der Session.
    pub fn tool(&self) -> EditorTool {
        self.mode.tool()
    }
}

// ── InteractionController ────────────────────────────────────────

/// Zustandsmaschine über dem aktiven Werkzeug.
pub struct InteractionController {
    registry: SharedAttachments,
    session: Option<ModeSession>,
    _keyboard: AttachmentGuard,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    /// Startet im Select-Modus mit globalem Tastatur-Handler.
    pub fn new() -> Self {
        let registry = AttachmentRegistry::shared();
        let keyboard = AttachmentRegistry::attach(&registry, AttachmentKind::Keyboard);
        let session = ModeSession::open(EditorTool::Select, &registry);
        Self {
            registry,
            session: Some(session),
            _keyboard: keyboard,
        }
    }

    /// Aktives Werkzeug.
    pub fn active_tool(&self) -> EditorTool {
        self.session
            .as_ref()
            .map(ModeSession::tool)
            .unwrap_or_default()
    }

    /// Registry der angehängten Handler (für Diagnose und Tests).
    pub fn attachments(&self) -> &SharedAttachments {
        &self.registry
    }

    /// Hat das aktive Werkzeug angefangene Eingaben?
    pub fn has_pending_input(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.mode.has_pending_input())
    }

    /// Wechselt das Werkzeug. Gleiches Werkzeug: keine Änderung.
    pub fn set_tool(&mut self, ctx: &mut ToolContext<'_>, tool: EditorTool) -> bool {
        if self.active_tool() == tool {
            return false;
        }
        let previous = self.active_tool();
        self.switch(ctx, tool);
        log::info!("Werkzeug gewechselt: {} → {}", previous.name(), tool.name());
        true
    }

    /// Abbau → Selektion leeren → Aufbau. Läuft immer vollständig durch.
    fn switch(&mut self, ctx: &mut ToolContext<'_>, tool: EditorTool) {
        if let Some(mut session) = self.session.take() {
            session.mode.cancel(ctx);
            drop(session);
        }
        if ctx.selection.clear(ctx.source) {
            ctx.selection_changed();
        }
        set_hover(ctx.source, None);
        self.session = Some(ModeSession::open(tool, &self.registry));
    }

    /// Verarbeitet ein Eingabe-Ereignis im aktiven Modus.
    ///
    /// Escape führt immer zurück zu Select und leert die Selektion.
    pub fn handle_event(&mut self, ctx: &mut ToolContext<'_>, event: &InputEvent) {
        if let InputEvent::Key {
            key: Key::Escape, ..
        } = event
        {
            self.switch(ctx, EditorTool::Select);
            log::debug!("Escape: zurück zu select");
            return;
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(e) = session.mode.handle(ctx, event) {
            log::error!(
                "Werkzeug '{}': Ereignis fehlgeschlagen: {:#}",
                session.tool().name(),
                e
            );
        }
        session.mode.sync(ctx.source, ctx.selection);
    }

    /// Bricht die laufende Geste ab (z.B. vor Undo/Redo).
    pub fn cancel_gesture(&mut self, ctx: &mut ToolContext<'_>) {
        if let Some(session) = self.session.as_mut() {
            session.mode.cancel(ctx);
        }
    }

    /// Abgleich nach Änderungen außerhalb der Werkzeuge.
    pub fn sync(&mut self, source: &VectorSource, selection: &SelectionState) {
        if let Some(session) = self.session.as_mut() {
            session.mode.sync(source, selection);
        }
    }

    /// Vorschau-Primitive des aktiven Modus.
    pub fn overlays(&self, source: &VectorSource, view: &MapView) -> Vec<DrawPrimitive> {
        self.session
            .as_ref()
            .map(|s| s.mode.overlays(source, view))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests;
