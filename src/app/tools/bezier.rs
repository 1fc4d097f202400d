//! Bezier-Werkzeug: Kontrollpunkte per Klick, Abschluss per Doppelklick.
//!
//! Gespeichert werden die Kontrollpunkte (nicht die interpolierte Kurve),
//! markiert mit `isSpline` und den Spline-Parametern aus den Optionen.
//! Die Vorschau-Ebene existiert nur, solange eine Kurve in Arbeit ist.

use super::{
    marker_overlay, sketch_overlay, AttachmentGuard, AttachmentKind, AttachmentRegistry,
    EditorTool, InputEvent, Key, SharedAttachments, ToolContext, ToolMode,
};
use crate::core::{Feature, Geometry, MapView, Rgba, SplineOptions, VectorSource};
use crate::render::DrawPrimitive;
use crate::shared::spline_geometry::{cardinal_spline, dedup_consecutive};
use glam::DVec2;

const CONTROL_POINT: Rgba = Rgba::new(255, 0, 0, 0.8);
const CONTROL_POINT_RADIUS: f64 = 6.0;

pub(super) struct BezierMode {
    registry: SharedAttachments,
    control_points: Vec<DVec2>,
    cursor: Option<DVec2>,
    /// Vorschau-Optionen (beim ersten Klick aus den Editor-Optionen)
    preview_options: SplineOptions,
    preview: Option<AttachmentGuard>,
}

impl BezierMode {
    pub(super) fn new(registry: &SharedAttachments) -> Self {
        Self {
            registry: registry.clone(),
            control_points: Vec::new(),
            cursor: None,
            preview_options: SplineOptions::default(),
            preview: None,
        }
    }

    fn add_point(&mut self, ctx: &ToolContext<'_>, pos: DVec2) {
        if self.preview.is_none() {
            self.preview_options = ctx.options.bezier_spline;
            self.preview = Some(AttachmentRegistry::attach(
                &self.registry,
                AttachmentKind::PreviewOverlay,
            ));
        }
        self.control_points.push(pos);
    }

    fn reset(&mut self) {
        self.control_points.clear();
        self.cursor = None;
        self.preview = None;
    }

    fn finish(&mut self, ctx: &mut ToolContext<'_>) {
        let points = dedup_consecutive(&self.control_points);
        self.reset();
        if points.len() < 2 {
            log::debug!("draw-bezier: zu wenige Kontrollpunkte ({})", points.len());
            return;
        }
        ctx.record_snapshot();
        let count = points.len();
        let feature = Feature::new(ctx.source.allocate_id(), Geometry::LineString(points))
            .with_spline(ctx.options.bezier_spline);
        let id = ctx.commit_feature(feature, None);
        log::info!(
            "draw-bezier: Feature {} mit {} Kontrollpunkten erstellt",
            id,
            count
        );
    }

    /// Vorschaulinie: geglättet ab drei Punkten, sonst gerade Verbindung.
    pub(super) fn preview_line(points: &[DVec2], options: SplineOptions) -> Vec<DVec2> {
        cardinal_spline(
            points,
            options.tension,
            options.points_per_seg,
            options.normalize,
        )
        .unwrap_or_else(|| points.to_vec())
    }
}

impl ToolMode for BezierMode {
    fn tool(&self) -> EditorTool {
        EditorTool::DrawBezier
    }

    fn attachments(&self) -> &'static [AttachmentKind] {
        &[AttachmentKind::Draw]
    }

    fn handle(&mut self, ctx: &mut ToolContext<'_>, event: &InputEvent) -> anyhow::Result<()> {
        match *event {
            InputEvent::PointerMove { pos, .. } => {
                if !self.control_points.is_empty() {
                    self.cursor = Some(pos);
                }
            }
            InputEvent::Click { pos, .. } => self.add_point(ctx, pos),
            InputEvent::DoubleClick { pos, .. } => {
                if !self.control_points.is_empty() {
                    self.control_points.push(pos);
                    self.finish(ctx);
                }
            }
            InputEvent::Key {
                key: Key::Enter, ..
            } => self.finish(ctx),
            InputEvent::Key {
                key: Key::Backspace,
                ..
            } => {
                self.control_points.pop();
                if self.control_points.is_empty() {
                    self.reset();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn cancel(&mut self, _ctx: &mut ToolContext<'_>) {
        if !self.control_points.is_empty() {
            log::debug!(
                "draw-bezier: {} Kontrollpunkt(e) verworfen",
                self.control_points.len()
            );
        }
        self.reset();
    }

    fn has_pending_input(&self) -> bool {
        !self.control_points.is_empty()
    }

    fn overlays(&self, _source: &VectorSource, _view: &MapView) -> Vec<DrawPrimitive> {
        if self.preview.is_none() {
            return Vec::new();
        }
        let mut pts = self.control_points.clone();
        pts.extend(self.cursor);
        let pts = dedup_consecutive(&pts);

        let mut out = Vec::new();
        if pts.len() >= 2 {
            let line = Self::preview_line(&pts, self.preview_options);
            out.push(sketch_overlay(Geometry::LineString(line)));
        }
        out.extend(
            self.control_points
                .iter()
                .map(|p| marker_overlay(*p, CONTROL_POINT_RADIUS, CONTROL_POINT)),
        );
        out
    }
}
