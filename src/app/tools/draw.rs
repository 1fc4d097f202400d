//! Zeichenwerkzeuge: Linie, Polygon, Rechteck, Kreis.

use super::{
    marker_overlay, sketch_overlay, AttachmentKind, EditorTool, InputEvent, Key, ToolContext,
    ToolMode,
};
use crate::core::{Feature, Geometry, MapView, Rgba, VectorSource};
use crate::render::DrawPrimitive;
use crate::shared::spline_geometry::dedup_consecutive;
use glam::DVec2;

const SKETCH_VERTEX: Rgba = Rgba::new(0, 153, 255, 1.0);
const SKETCH_VERTEX_RADIUS: f64 = 5.0;

/// Geometrieart des Zeichenwerkzeugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DrawKind {
    Line,
    Polygon,
    /// Zwei Klicks: gegenüberliegende Ecken
    Rectangle,
    /// Zwei Klicks: Mittelpunkt, Punkt auf dem Rand
    Circle,
}

impl DrawKind {
    fn tool(self) -> EditorTool {
        match self {
            DrawKind::Line => EditorTool::DrawLine,
            DrawKind::Polygon => EditorTool::DrawPolygon,
            DrawKind::Rectangle => EditorTool::DrawRectangle,
            DrawKind::Circle => EditorTool::DrawCircle,
        }
    }

    /// Mindestpunktzahl nach Entfernen doppelter Punkte.
    fn min_points(self) -> usize {
        match self {
            DrawKind::Line | DrawKind::Rectangle | DrawKind::Circle => 2,
            DrawKind::Polygon => 3,
        }
    }

    /// Zwei-Klick-Formen werden mit dem zweiten Klick abgeschlossen.
    fn finishes_on_second_click(self) -> bool {
        matches!(self, DrawKind::Rectangle | DrawKind::Circle)
    }

    /// Geometrie aus den gesetzten Punkten, `None` bei zu wenig Punkten.
    fn build(self, points: &[DVec2]) -> Option<Geometry> {
        let points = dedup_consecutive(points);
        if points.len() < self.min_points() {
            return None;
        }
        let geometry = match self {
            DrawKind::Line => Geometry::LineString(points),
            DrawKind::Polygon => Geometry::polygon_from_ring(points),
            DrawKind::Rectangle => {
                let (a, b) = (points[0], points[points.len() - 1]);
                if a.x == b.x || a.y == b.y {
                    return None;
                }
                Geometry::rectangle(a, b)
            }
            DrawKind::Circle => Geometry::Circle {
                center: points[0],
                radius: points[0].distance(points[points.len() - 1]),
            },
        };
        Some(geometry)
    }
}

/// Zeichenmodus für die vier Standardformen.
pub(super) struct DrawMode {
    kind: DrawKind,
    points: Vec<DVec2>,
    cursor: Option<DVec2>,
}

impl DrawMode {
    pub(super) fn new(kind: DrawKind) -> Self {
        Self {
            kind,
            points: Vec::new(),
            cursor: None,
        }
    }

    fn finish(&mut self, ctx: &mut ToolContext<'_>) {
        let points = std::mem::take(&mut self.points);
        let Some(geometry) = self.kind.build(&points) else {
            log::debug!(
                "{}: Skizze mit {} Punkt(en) verworfen",
                self.kind.tool().name(),
                points.len()
            );
            return;
        };
        ctx.record_snapshot();
        let feature = Feature::new(ctx.source.allocate_id(), geometry);
        let id = ctx.commit_feature(feature, None);
        log::info!(
            "{}: Feature {} erstellt",
            self.kind.tool().name(),
            id
        );
    }

    /// Vorschau aus gesetzten Punkten plus Cursor.
    fn preview_points(&self) -> Vec<DVec2> {
        let mut pts = self.points.clone();
        if let Some(cursor) = self.cursor {
            pts.push(cursor);
        }
        pts
    }
}

impl ToolMode for DrawMode {
    fn tool(&self) -> EditorTool {
        self.kind.tool()
    }

    fn attachments(&self) -> &'static [AttachmentKind] {
        &[AttachmentKind::Draw]
    }

    fn handle(&mut self, ctx: &mut ToolContext<'_>, event: &InputEvent) -> anyhow::Result<()> {
        match *event {
            InputEvent::PointerMove { pos, .. } => {
                self.cursor = Some(pos);
            }
            InputEvent::Click { pos, .. } => {
                self.points.push(pos);
                if self.kind.finishes_on_second_click() && self.points.len() >= 2 {
                    self.finish(ctx);
                }
            }
            InputEvent::DoubleClick { pos, .. } => {
                if !self.kind.finishes_on_second_click() && !self.points.is_empty() {
                    self.points.push(pos);
                    self.finish(ctx);
                }
            }
            InputEvent::Key {
                key: Key::Enter, ..
            } => {
                if !self.kind.finishes_on_second_click() {
                    self.finish(ctx);
                }
            }
            InputEvent::Key {
                key: Key::Backspace,
                ..
            } => {
                self.points.pop();
            }
            _ => {}
        }
        Ok(())
    }

    fn cancel(&mut self, _ctx: &mut ToolContext<'_>) {
        if !self.points.is_empty() {
            log::debug!("{}: Skizze abgebrochen", self.kind.tool().name());
        }
        self.points.clear();
        self.cursor = None;
    }

    fn has_pending_input(&self) -> bool {
        !self.points.is_empty()
    }

    fn overlays(&self, _source: &VectorSource, _view: &MapView) -> Vec<DrawPrimitive> {
        if self.points.is_empty() {
            return Vec::new();
        }
        let pts = self.preview_points();
        let mut out = Vec::new();
        let sketch = match self.kind {
            DrawKind::Polygon if dedup_consecutive(&pts).len() >= 3 => {
                Some(Geometry::polygon_from_ring(pts.clone()))
            }
            DrawKind::Line | DrawKind::Polygon if pts.len() >= 2 => {
                Some(Geometry::LineString(pts.clone()))
            }
            DrawKind::Rectangle | DrawKind::Circle => self.kind.build(&pts),
            _ => None,
        };
        if let Some(geometry) = sketch {
            out.push(sketch_overlay(geometry));
        }
        out.extend(
            self.points
                .iter()
                .map(|p| marker_overlay(*p, SKETCH_VERTEX_RADIUS, SKETCH_VERTEX)),
        );
        out
    }
}
