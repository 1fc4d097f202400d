//! Select-Modus: Klick- und Box-Selektion, Stützpunkte ziehen, Move-Handle,
//! Hover-Hervorhebung.
//!
//! Das Move-Handle existiert genau dann, wenn genau ein Feature selektiert
//! ist. Ein Druck auf das Handle hat Vorrang vor dem Stützpunkt-Ziehen,
//! solange es verschoben wird, ist Modify unterdrückt.

use super::{
    marker_overlay, overlay, set_hover, AttachmentGuard, AttachmentKind, AttachmentRegistry,
    EditEvent, EditorTool, InputEvent, Modifiers, SharedAttachments, ToolContext, ToolMode,
};
use crate::app::selection::SelectionState;
use crate::core::{Extent, FeatureId, Geometry, MapView, Rgba, VectorSource, VertexIndex, VertexMatch};
use crate::render::{DrawPrimitive, StrokeStyle};
use anyhow::anyhow;
use glam::DVec2;

const HANDLE_FILL: Rgba = Rgba::new(255, 165, 0, 1.0);
const HANDLE_RADIUS: f64 = 8.0;
const DRAG_BOX_STROKE: Rgba = Rgba::new(0, 0, 255, 1.0);
const DRAG_BOX_FILL: Rgba = Rgba::new(0, 0, 255, 0.1);

/// Was unter dem Zeiger lag, als die Taste gedrückt wurde.
#[derive(Debug, Clone, Copy)]
enum PressTarget {
    Handle(FeatureId),
    Vertex(VertexMatch),
    /// Shift gedrückt: Box-Selektion
    Box,
    /// Leere Karte (Verschieben der Ansicht ist Sache des Hosts)
    Map,
}

#[derive(Debug, Clone, Copy)]
enum Gesture {
    Idle,
    Pressed {
        start: DVec2,
        target: PressTarget,
    },
    BoxSelect {
        start: DVec2,
        current: DVec2,
    },
    Modify {
        feature_id: FeatureId,
        vertex_index: usize,
    },
    Translate {
        feature_id: FeatureId,
        last: DVec2,
    },
}

struct MoveHandle {
    feature_id: FeatureId,
    _guard: AttachmentGuard,
}

pub(super) struct SelectMode {
    registry: SharedAttachments,
    gesture: Gesture,
    handle: Option<MoveHandle>,
    /// Nach einem Ziehen folgt noch ein Klick vom Host: ignorieren
    suppress_click: bool,
}

impl SelectMode {
    pub(super) fn new(registry: &SharedAttachments) -> Self {
        Self {
            registry: registry.clone(),
            gesture: Gesture::Idle,
            handle: None,
            suppress_click: false,
        }
    }

    fn handle_hit(&self, ctx: &ToolContext<'_>, pos: DVec2) -> Option<FeatureId> {
        let handle = self.handle.as_ref()?;
        let center = ctx.source.get(handle.feature_id)?.geometry.center()?;
        (center.distance(pos) <= ctx.vertex_tolerance()).then_some(handle.feature_id)
    }

    fn vertex_hit(ctx: &ToolContext<'_>, pos: DVec2) -> Option<VertexMatch> {
        let selected = ctx
            .selection
            .ids()
            .iter()
            .filter_map(|id| ctx.source.get(*id));
        VertexIndex::from_features(selected).nearest_within(pos, ctx.vertex_tolerance())
    }

    fn press(&mut self, ctx: &ToolContext<'_>, pos: DVec2, modifiers: Modifiers) {
        self.suppress_click = false;
        let target = if modifiers.shift {
            PressTarget::Box
        } else if let Some(id) = self.handle_hit(ctx, pos) {
            PressTarget::Handle(id)
        } else if let Some(hit) = Self::vertex_hit(ctx, pos) {
            PressTarget::Vertex(hit)
        } else {
            PressTarget::Map
        };
        self.gesture = Gesture::Pressed { start: pos, target };
    }

    fn pointer_move(&mut self, ctx: &mut ToolContext<'_>, pos: DVec2) -> anyhow::Result<()> {
        match self.gesture {
            Gesture::Idle => {
                let hit = ctx.source.hit_test(pos, ctx.hit_tolerance());
                set_hover(ctx.source, hit);
                Ok(())
            }
            Gesture::Pressed { start, target } => {
                if start.distance(pos) <= ctx.drag_threshold() {
                    return Ok(());
                }
                self.suppress_click = true;
                self.gesture = match target {
                    PressTarget::Handle(feature_id) => {
                        ctx.history.start_block();
                        ctx.record_snapshot();
                        Gesture::Translate {
                            feature_id,
                            last: start,
                        }
                    }
                    PressTarget::Vertex(hit) => {
                        ctx.history.start_block();
                        ctx.record_snapshot();
                        Gesture::Modify {
                            feature_id: hit.feature_id,
                            vertex_index: hit.vertex_index,
                        }
                    }
                    PressTarget::Box => Gesture::BoxSelect {
                        start,
                        current: start,
                    },
                    PressTarget::Map => Gesture::Idle,
                };
                self.drag(ctx, pos)
            }
            _ => self.drag(ctx, pos),
        }
    }

    fn drag(&mut self, ctx: &mut ToolContext<'_>, pos: DVec2) -> anyhow::Result<()> {
        match &mut self.gesture {
            Gesture::Translate { feature_id, last } => {
                let id = *feature_id;
                let delta = pos - *last;
                *last = pos;
                let feature = ctx
                    .source
                    .get_mut(id)
                    .ok_or_else(|| anyhow!("Feature {} nicht mehr vorhanden", id))?;
                feature.geometry_mut().translate(delta);
                ctx.source.changed();
            }
            Gesture::Modify {
                feature_id,
                vertex_index,
            } => {
                let (id, index) = (*feature_id, *vertex_index);
                let feature = ctx
                    .source
                    .get_mut(id)
                    .ok_or_else(|| anyhow!("Feature {} nicht mehr vorhanden", id))?;
                if !feature.geometry_mut().set_vertex(index, pos) {
                    anyhow::bail!("Stützpunkt {} von Feature {} nicht editierbar", index, id);
                }
                ctx.source.changed();
            }
            Gesture::BoxSelect { current, .. } => *current = pos,
            Gesture::Idle | Gesture::Pressed { .. } => {}
        }
        Ok(())
    }

    fn release(&mut self, ctx: &mut ToolContext<'_>) {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Translate { feature_id, .. } | Gesture::Modify { feature_id, .. } => {
                ctx.history.end_block();
                ctx.events.push(EditEvent::GeometryChanged(feature_id));
                log::debug!("Geometrie von Feature {} geändert", feature_id);
            }
            Gesture::BoxSelect { start, current } => {
                let ids = ctx
                    .source
                    .features_in_extent(&Extent::from_corners(start, current));
                if ctx.selection.extend(ctx.source, &ids) {
                    ctx.selection_changed();
                }
            }
            Gesture::Idle | Gesture::Pressed { .. } => {}
        }
    }

    fn click(&mut self, ctx: &mut ToolContext<'_>, pos: DVec2, modifiers: Modifiers) {
        if std::mem::take(&mut self.suppress_click) {
            return;
        }
        let hit = ctx.source.hit_test(pos, ctx.hit_tolerance());
        let changed = match (hit, modifiers.shift) {
            (Some(id), true) => ctx.selection.toggle(ctx.source, id),
            (None, true) => false,
            (Some(id), false) => ctx.selection.replace(ctx.source, &[id]),
            (None, false) => ctx.selection.clear(ctx.source),
        };
        if changed {
            ctx.selection_changed();
        }
    }
}

impl ToolMode for SelectMode {
    fn tool(&self) -> EditorTool {
        EditorTool::Select
    }

    fn attachments(&self) -> &'static [AttachmentKind] {
        &[
            AttachmentKind::Select,
            AttachmentKind::DragBox,
            AttachmentKind::Modify,
            AttachmentKind::Hover,
        ]
    }

    fn handle(&mut self, ctx: &mut ToolContext<'_>, event: &InputEvent) -> anyhow::Result<()> {
        match *event {
            InputEvent::PointerDown { pos, modifiers } => self.press(ctx, pos, modifiers),
            InputEvent::PointerMove { pos, .. } => self.pointer_move(ctx, pos)?,
            InputEvent::PointerUp { .. } => self.release(ctx),
            InputEvent::Click { pos, modifiers } => self.click(ctx, pos, modifiers),
            InputEvent::DoubleClick { .. } | InputEvent::Key { .. } => {}
        }
        Ok(())
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        if matches!(
            self.gesture,
            Gesture::Translate { .. } | Gesture::Modify { .. }
        ) {
            ctx.history.end_block();
            log::debug!("Select: laufende Änderung abgebrochen");
        }
        self.gesture = Gesture::Idle;
        self.suppress_click = false;
        set_hover(ctx.source, None);
    }

    fn has_pending_input(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    fn sync(&mut self, source: &VectorSource, selection: &SelectionState) {
        let wanted = selection.single().filter(|id| source.contains(*id));
        let current = self.handle.as_ref().map(|h| h.feature_id);
        if wanted == current {
            return;
        }
        self.handle = wanted.map(|feature_id| MoveHandle {
            feature_id,
            _guard: AttachmentRegistry::attach(&self.registry, AttachmentKind::Translate),
        });
    }

    fn overlays(&self, source: &VectorSource, _view: &MapView) -> Vec<DrawPrimitive> {
        let mut out = Vec::new();
        if let Gesture::BoxSelect { start, current } = self.gesture {
            let mut stroke = StrokeStyle::solid(DRAG_BOX_STROKE, 1.0);
            stroke.line_dash = Some([4.0, 4.0]);
            if start.x != current.x && start.y != current.y {
                out.push(overlay(
                    Geometry::rectangle(start, current),
                    stroke,
                    Some(DRAG_BOX_FILL),
                ));
            }
        }
        if let Some(center) = self
            .handle
            .as_ref()
            .and_then(|h| source.get(h.feature_id))
            .and_then(|f| f.geometry.center())
        {
            out.push(marker_overlay(center, HANDLE_RADIUS, HANDLE_FILL));
        }
        out
    }
}
