//! Offset-Werkzeug: Linien parallel kopieren, Flächen skalieren/strecken.
//!
//! Beide Gesten brauchen eine Host-Erweiterung (`Extensions`). Fehlt sie,
//! bleibt die Geste ein No-op mit Warnung.

use super::{
    sketch_overlay, AttachmentKind, EditEvent, EditorTool, InputEvent, ToolContext, ToolMode,
};
use crate::core::geometry::point_segment_distance;
use crate::core::{Feature, FeatureId, Geometry, GeometryClass, MapView, VectorSource};
use crate::render::DrawPrimitive;
use anyhow::Context;
use glam::DVec2;

/// Kleinster Hebel, ab dem ein Skalierungsfaktor berechnet wird.
const MIN_LEVER: f64 = 1e-9;

#[derive(Debug, Clone)]
enum Gesture {
    Idle,
    /// Parallele Kopie einer Linie
    OffsetLine {
        source_id: FeatureId,
        coords: Vec<DVec2>,
        start: DVec2,
        distance: f64,
        preview: Option<Vec<DVec2>>,
    },
    /// Skalieren einer Fläche um ihren Mittelpunkt
    Scale {
        feature_id: FeatureId,
        original: Geometry,
        anchor: DVec2,
        start: DVec2,
        started: bool,
    },
}

pub(super) struct OffsetMode {
    gesture: Gesture,
}

impl OffsetMode {
    pub(super) fn new() -> Self {
        Self {
            gesture: Gesture::Idle,
        }
    }

    fn press(&mut self, ctx: &ToolContext<'_>, pos: DVec2) {
        self.gesture = Gesture::Idle;
        let Some(id) = ctx.source.hit_test(pos, ctx.hit_tolerance()) else {
            return;
        };
        let Some(feature) = ctx.source.get(id) else {
            return;
        };
        match feature.geometry.as_ref() {
            Geometry::LineString(coords) => {
                if ctx.extensions.offset.is_none() {
                    log::warn!("offset: Erweiterung 'offset' nicht verfügbar, Geste ignoriert");
                    return;
                }
                self.gesture = Gesture::OffsetLine {
                    source_id: id,
                    coords: coords.clone(),
                    start: pos,
                    distance: 0.0,
                    preview: None,
                };
            }
            geometry if geometry.is_area() => {
                if ctx.extensions.transform.is_none() {
                    log::warn!("offset: Erweiterung 'transform' nicht verfügbar, Geste ignoriert");
                    return;
                }
                let Some(anchor) = geometry.center() else {
                    return;
                };
                self.gesture = Gesture::Scale {
                    feature_id: id,
                    original: geometry.clone(),
                    anchor,
                    start: pos,
                    started: false,
                };
            }
            other => log::debug!("offset: {} wird nicht unterstützt", other.type_name()),
        }
    }

    fn pointer_move(
        &mut self,
        ctx: &mut ToolContext<'_>,
        pos: DVec2,
        stretch: bool,
    ) -> anyhow::Result<()> {
        let threshold = ctx.drag_threshold();
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::OffsetLine {
                coords,
                start,
                distance,
                preview,
                ..
            } => {
                if start.distance(pos) <= threshold {
                    return Ok(());
                }
                *distance = signed_distance(coords, pos);
                *preview = ctx
                    .extensions
                    .offset
                    .as_ref()
                    .and_then(|ext| ext.offset_line(coords, *distance));
            }
            Gesture::Scale {
                feature_id,
                original,
                anchor,
                start,
                started,
            } => {
                if !*started {
                    if start.distance(pos) <= threshold {
                        return Ok(());
                    }
                    ctx.history.start_block();
                    ctx.record_snapshot();
                    *started = true;
                }
                let transform = ctx
                    .extensions
                    .transform
                    .as_ref()
                    .context("Erweiterung 'transform' während der Geste entfernt")?;
                let factor = scale_factor(*anchor, *start, pos, stretch);
                let scaled = transform.scale(original, *anchor, factor);
                if !ctx.source.set_geometry(*feature_id, scaled) {
                    anyhow::bail!("Feature {} nicht mehr vorhanden", feature_id);
                }
            }
        }
        Ok(())
    }

    fn release(&mut self, ctx: &mut ToolContext<'_>) -> anyhow::Result<()> {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::OffsetLine {
                source_id,
                distance,
                preview,
                ..
            } => {
                if distance == 0.0 {
                    return Ok(());
                }
                let coords = preview.context("Versatz nicht berechenbar")?;
                let Some(original) = ctx.source.get(source_id) else {
                    anyhow::bail!("Quell-Feature {} nicht mehr vorhanden", source_id);
                };
                let spline = original
                    .properties
                    .is_spline
                    .then(|| original.spline_options());
                let style = ctx
                    .styles
                    .get_or_default(source_id, GeometryClass::Line)
                    .into_owned();

                ctx.record_snapshot();
                let mut feature = Feature::new(ctx.source.allocate_id(), Geometry::LineString(coords));
                if let Some(options) = spline {
                    feature = feature.with_spline(options);
                }
                let id = ctx.commit_feature(feature, Some(&style));
                log::info!(
                    "offset: Parallele zu Feature {} erstellt (Feature {}, Abstand {:.2})",
                    source_id,
                    id,
                    distance
                );
            }
            Gesture::Scale {
                feature_id,
                started: true,
                ..
            } => {
                ctx.history.end_block();
                ctx.events.push(EditEvent::GeometryChanged(feature_id));
                log::debug!("offset: Feature {} skaliert", feature_id);
            }
            Gesture::Scale { .. } | Gesture::Idle => {}
        }
        Ok(())
    }
}

/// Vorzeichenbehafteter Abstand zum nächsten Segment (positiv = links).
fn signed_distance(coords: &[DVec2], p: DVec2) -> f64 {
    coords
        .windows(2)
        .filter(|w| w[0] != w[1])
        .map(|w| {
            let d = point_segment_distance(p, w[0], w[1]);
            let side = (w[1] - w[0]).perp_dot(p - w[0]);
            (d, if side < 0.0 { -d } else { d })
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, signed)| signed)
        .unwrap_or(0.0)
}

/// Skalierungsfaktor aus Hebel Anker→Start und Anker→Zeiger.
///
/// `stretch`: getrennte Faktoren je Achse, sonst gleichmäßig.
fn scale_factor(anchor: DVec2, start: DVec2, pos: DVec2, stretch: bool) -> DVec2 {
    let from = start - anchor;
    let to = pos - anchor;
    if stretch {
        let axis = |f: f64, t: f64| if f.abs() < MIN_LEVER { 1.0 } else { t / f };
        DVec2::new(axis(from.x, to.x), axis(from.y, to.y))
    } else if from.length() < MIN_LEVER {
        DVec2::ONE
    } else {
        DVec2::splat(to.length() / from.length())
    }
}

impl ToolMode for OffsetMode {
    fn tool(&self) -> EditorTool {
        EditorTool::Offset
    }

    fn attachments(&self) -> &'static [AttachmentKind] {
        &[AttachmentKind::Offset, AttachmentKind::Transform]
    }

    fn handle(&mut self, ctx: &mut ToolContext<'_>, event: &InputEvent) -> anyhow::Result<()> {
        match *event {
            InputEvent::PointerDown { pos, .. } => {
                self.press(ctx, pos);
                Ok(())
            }
            InputEvent::PointerMove { pos, modifiers } => {
                self.pointer_move(ctx, pos, modifiers.shift)
            }
            InputEvent::PointerUp { .. } => self.release(ctx),
            _ => Ok(()),
        }
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        if let Gesture::Scale {
            feature_id,
            original,
            started: true,
            ..
        } = std::mem::replace(&mut self.gesture, Gesture::Idle)
        {
            // Skalierung verwerfen: Ausgangsgeometrie zurück
            ctx.source.set_geometry(feature_id, original);
            ctx.history.end_block();
        }
    }

    fn has_pending_input(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    fn overlays(&self, _source: &VectorSource, _view: &MapView) -> Vec<DrawPrimitive> {
        match &self.gesture {
            Gesture::OffsetLine {
                preview: Some(coords),
                ..
            } => vec![sketch_overlay(Geometry::LineString(coords.clone()))],
            _ => Vec::new(),
        }
    }
}
