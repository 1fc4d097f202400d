//! Lösch-Werkzeug: Hover zeigt rot an, was ein Klick entfernen würde.

use super::{
    overlay, set_hover, AttachmentKind, EditEvent, EditorTool, InputEvent, ToolContext, ToolMode,
};
use crate::core::{FeatureId, MapView, Rgba, VectorSource};
use crate::render::{DrawPrimitive, StrokeStyle};
use glam::DVec2;

const WARN_STROKE: Rgba = Rgba::new(255, 0, 0, 0.7);
const WARN_STROKE_WIDTH: f64 = 8.0;
const WARN_FILL: Rgba = Rgba::new(255, 0, 0, 0.3);

pub(super) struct DeleteMode {
    hovered: Option<FeatureId>,
}

impl DeleteMode {
    pub(super) fn new() -> Self {
        Self { hovered: None }
    }

    fn delete_at(&mut self, ctx: &mut ToolContext<'_>, pos: DVec2) {
        let Some(id) = ctx.source.hit_test(pos, ctx.hit_tolerance()) else {
            return;
        };
        ctx.record_snapshot();
        if ctx.source.remove(id).is_none() {
            return;
        }
        ctx.styles.remove(id);
        if ctx.selection.remove(ctx.source, id) {
            ctx.selection_changed();
        }
        ctx.events.push(EditEvent::FeatureRemoved(id));
        self.hovered = None;
        log::info!("delete: Feature {} entfernt", id);
    }
}

impl ToolMode for DeleteMode {
    fn tool(&self) -> EditorTool {
        EditorTool::Delete
    }

    fn attachments(&self) -> &'static [AttachmentKind] {
        &[AttachmentKind::Delete]
    }

    fn handle(&mut self, ctx: &mut ToolContext<'_>, event: &InputEvent) -> anyhow::Result<()> {
        match *event {
            InputEvent::PointerMove { pos, .. } => {
                // Eigenes Overlay statt Hover-Flag
                self.hovered = ctx.source.hit_test(pos, ctx.hit_tolerance());
            }
            InputEvent::Click { pos, .. } => self.delete_at(ctx, pos),
            _ => {}
        }
        Ok(())
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        self.hovered = None;
        set_hover(ctx.source, None);
    }

    fn overlays(&self, source: &VectorSource, _view: &MapView) -> Vec<DrawPrimitive> {
        self.hovered
            .and_then(|id| source.get(id))
            .map(|feature| {
                vec![overlay(
                    feature.geometry.as_ref().clone(),
                    StrokeStyle::solid(WARN_STROKE, WARN_STROKE_WIDTH),
                    Some(WARN_FILL),
                )]
            })
            .unwrap_or_default()
    }
}
