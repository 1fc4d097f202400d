//! Style-Resolver: Feature + Auflösung → geordnete Zeichen-Primitive.
//!
//! Reihenfolge je Feature: Halo (0) < Stützpunkte (1) < Paint-Layer (10+i)
//! < Pfeile (≥100). Oberhalb des LOD-Schwellwerts gibt es genau ein
//! vereinfachtes Primitiv. Der Resolver wirft nie: fehlende Styles ergeben
//! den Typ-Standard, kaputte Muster oder Geometrien werden ausgelassen.

use super::arrows::{self, ArrowPlacement, ARROW_ICON_SIZE};
use super::pattern::PatternTile;
use super::types::{
    DrawPrimitive, FillStyle, LayerOrderTable, PrimitiveKind, StrokeStyle, Symbol, Z_ARROW_MIN,
    Z_HALO, Z_PAINT_BASE, Z_VERTEX,
};
use crate::core::{Feature, FeatureStyle, Geometry, PatternType, Rgba, StyleLayer, StyleTable};
use crate::shared::spline_geometry::{cardinal_spline, offset_coords};
use crate::shared::ZoomSettings;
use glam::DVec2;
use std::collections::HashMap;
use std::sync::Arc;

// ── Feste Farben der Hervorhebungen ─────────────────────────────────

const SELECT_HALO: Rgba = Rgba::new(255, 165, 0, 0.8);
const SELECT_HALO_FILL: Rgba = Rgba::new(255, 165, 0, 0.2);
const HOVER_HALO: Rgba = Rgba::new(255, 193, 7, 0.6);
const SPLINE_VERTEX: Rgba = Rgba::new(255, 0, 0, 0.8);
const PLAIN_VERTEX: Rgba = Rgba::new(255, 165, 0, 1.0);
const FALLBACK_COLOR: Rgba = Rgba::new(0, 0, 0, 1.0);

/// Zusätzliche Halo-Breite bei Selektion bzw. Hover (Pixel).
const SELECT_HALO_EXTRA: f64 = 8.0;
const HOVER_HALO_EXTRA: f64 = 6.0;

/// Vereinfachte Darstellung (LOD) als gecachtes Paar Strich/Füllung.
#[derive(Debug, Clone)]
struct SimplifiedPaint {
    stroke: StrokeStyle,
    fill: Option<FillStyle>,
}

/// Löst Feature-Styles in Zeichen-Primitive auf.
///
/// Einziger Zustand ist ein kleiner Cache der LOD-Darstellungen, der bei
/// jeder Änderung der Zoom-Einstellungen verworfen wird.
#[derive(Debug, Default)]
pub struct StyleResolver {
    cache_settings: Option<ZoomSettings>,
    simplified_cache: HashMap<String, SimplifiedPaint>,
}

impl StyleResolver {
    /// Neuer Resolver mit leerem Cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Anzahl gecachter LOD-Darstellungen.
    pub fn cache_len(&self) -> usize {
        self.simplified_cache.len()
    }

    /// Verwirft den LOD-Cache.
    pub fn invalidate(&mut self) {
        self.simplified_cache.clear();
        self.cache_settings = None;
    }

    /// Liefert die Zeichen-Primitive eines Features.
    ///
    /// `orders` liefert die logische Layer-Reihenfolge (fehlend: 0), die in
    /// jedes Primitiv übernommen wird.
    pub fn resolve(
        &mut self,
        feature: &Feature,
        resolution: f64,
        zoom: &ZoomSettings,
        styles: &StyleTable,
        orders: &LayerOrderTable,
    ) -> Vec<DrawPrimitive> {
        if !feature.properties.layer_visible {
            return Vec::new();
        }

        let geometry = render_geometry(feature);
        if !geometry.is_valid() {
            log::debug!(
                "Feature {} hat ungültige {}-Geometrie, wird nicht gezeichnet",
                feature.id,
                geometry.type_name()
            );
            return Vec::new();
        }

        let class = geometry.class();
        let order = orders.get(&feature.id).copied().unwrap_or(0);
        let style = styles.get_or_default(feature.id, class);

        let mut out = if zoom.enabled && resolution > zoom.threshold {
            self.simplified(feature, &geometry, &style, zoom)
        } else {
            detailed(feature, &geometry, &style, resolution)
        };

        for primitive in &mut out {
            primitive.layer_order = order;
        }
        out
    }

    // ── LOD-Zweig ───────────────────────────────────────────────────

    fn simplified(
        &mut self,
        feature: &Feature,
        geometry: &Arc<Geometry>,
        style: &FeatureStyle,
        zoom: &ZoomSettings,
    ) -> Vec<DrawPrimitive> {
        if self.cache_settings.as_ref() != Some(zoom) {
            self.simplified_cache.clear();
            self.cache_settings = Some(zoom.clone());
        }

        let is_area = geometry.is_area();
        let width = zoom.style.stroke_width;

        let (key, stroke_color, fill_color) = if zoom.automatic_color {
            let Some(first) = style.layers.first() else {
                return Vec::new();
            };
            let stroke = Rgba::from_hex(&first.stroke_color, first.stroke_opacity);
            let fill = Rgba::from_hex(&first.fill_color, first.fill_opacity);
            (format!("{stroke}-{fill}-{width}-{is_area}"), stroke, fill)
        } else {
            let stroke = Rgba::parse_css(&zoom.style.stroke_color).unwrap_or(FALLBACK_COLOR);
            let fill = Rgba::parse_css(&zoom.style.fill_color).unwrap_or(FALLBACK_COLOR);
            (format!("global-{is_area}"), stroke, fill)
        };

        let paint = self
            .simplified_cache
            .entry(key)
            .or_insert_with(|| SimplifiedPaint {
                stroke: StrokeStyle::solid(stroke_color, width),
                fill: is_area.then_some(FillStyle::Solid(fill_color)),
            })
            .clone();

        vec![DrawPrimitive {
            feature_id: Some(feature.id),
            geometry: geometry.clone(),
            stroke: Some(paint.stroke),
            fill: paint.fill,
            symbol: None,
            z_index: Z_PAINT_BASE,
            layer_order: 0,
            kind: PrimitiveKind::Simplified,
        }]
    }
}

/// Zu zeichnende Geometrie: bei Splines die interpolierte Kurve.
///
/// Ohne mögliche Glättung (zu wenige Punkte) bleiben die geraden Segmente.
fn render_geometry(feature: &Feature) -> Arc<Geometry> {
    if !feature.is_spline_line() {
        return feature.geometry.clone();
    }
    let Geometry::LineString(control) = feature.geometry.as_ref() else {
        return feature.geometry.clone();
    };
    let opts = feature.spline_options();
    match cardinal_spline(control, opts.tension, opts.points_per_seg, opts.normalize) {
        Some(curve) => Arc::new(Geometry::LineString(curve)),
        None => feature.geometry.clone(),
    }
}

// ── Detail-Zweig ────────────────────────────────────────────────────

fn detailed(
    feature: &Feature,
    geometry: &Arc<Geometry>,
    style: &FeatureStyle,
    resolution: f64,
) -> Vec<DrawPrimitive> {
    let mut out = Vec::with_capacity(style.layers.len() + 2);
    let max_width = style.max_stroke_width();
    let is_area = geometry.is_area();
    let props = &feature.properties;

    if props.selected {
        out.push(halo(
            feature,
            geometry,
            SELECT_HALO,
            max_width + SELECT_HALO_EXTRA,
            is_area.then_some(SELECT_HALO_FILL),
        ));
        push_vertex_markers(&mut out, feature);
    } else if props.hovered {
        out.push(halo(
            feature,
            geometry,
            HOVER_HALO,
            max_width + HOVER_HALO_EXTRA,
            None,
        ));
    }

    for (index, layer) in style.layers.iter().enumerate() {
        if let Some(primitive) = paint_layer(feature, geometry, layer, index, resolution) {
            out.push(primitive);
        }
    }

    if style.arrows.enabled {
        if let Geometry::LineString(coords) = geometry.as_ref() {
            push_arrows(&mut out, feature, coords, style, resolution);
        }
    }

    out
}

fn halo(
    feature: &Feature,
    geometry: &Arc<Geometry>,
    color: Rgba,
    width: f64,
    fill: Option<Rgba>,
) -> DrawPrimitive {
    DrawPrimitive {
        feature_id: Some(feature.id),
        geometry: geometry.clone(),
        stroke: Some(StrokeStyle::solid(color, width)),
        fill: fill.map(FillStyle::Solid),
        symbol: None,
        z_index: Z_HALO,
        layer_order: 0,
        kind: PrimitiveKind::Halo,
    }
}

/// Stützpunkt-Marker an den Original-Koordinaten (bei Splines: Kontrollpunkte).
fn push_vertex_markers(out: &mut Vec<DrawPrimitive>, feature: &Feature) {
    let (radius, fill) = if feature.is_spline_line() {
        (6.0, SPLINE_VERTEX)
    } else {
        (5.0, PLAIN_VERTEX)
    };
    for vertex in feature.geometry.vertices() {
        out.push(DrawPrimitive::point(
            Some(feature.id),
            vertex,
            Symbol::Circle {
                radius,
                fill,
                stroke: StrokeStyle::solid(Rgba::WHITE, 2.0),
            },
            Z_VERTEX,
            PrimitiveKind::Vertex,
        ));
    }
}

fn paint_layer(
    feature: &Feature,
    geometry: &Arc<Geometry>,
    layer: &StyleLayer,
    index: usize,
    resolution: f64,
) -> Option<DrawPrimitive> {
    let layer_geometry = if layer.offset != 0.0 {
        offset_geometry(geometry, layer.offset * resolution)?
    } else {
        geometry.clone()
    };

    let mut stroke = StrokeStyle::solid(
        Rgba::from_hex(&layer.stroke_color, layer.stroke_opacity),
        layer.stroke_width,
    );
    if layer.dashed {
        let [dash, gap] = layer.dash_pattern;
        if dash.is_finite() && gap.is_finite() && dash > 0.0 && gap >= 0.0 {
            stroke.line_dash = Some(layer.dash_pattern);
        }
    }

    let fill = if geometry.is_area() {
        let background = Rgba::from_hex(&layer.fill_color, layer.fill_opacity);
        if layer.fill_pattern.kind == PatternType::None {
            Some(FillStyle::Solid(background))
        } else {
            let Some(tile) = PatternTile::build(&layer.fill_pattern) else {
                log::debug!(
                    "Füllmuster in Layer '{}' von Feature {} unbrauchbar, Layer ausgelassen",
                    layer.id,
                    feature.id
                );
                return None;
            };
            Some(FillStyle::Pattern { tile, background })
        }
    } else {
        None
    };

    Some(DrawPrimitive {
        feature_id: Some(feature.id),
        geometry: layer_geometry,
        stroke: Some(stroke),
        fill,
        symbol: None,
        z_index: Z_PAINT_BASE + index as i32,
        layer_order: 0,
        kind: PrimitiveKind::Paint(index),
    })
}

/// Versetzte Kopie einer Linie; Flächen und Punkte bleiben unverändert.
fn offset_geometry(geometry: &Arc<Geometry>, distance: f64) -> Option<Arc<Geometry>> {
    match geometry.as_ref() {
        Geometry::LineString(coords) => {
            offset_coords(coords, distance).map(|c| Arc::new(Geometry::LineString(c)))
        }
        Geometry::MultiLineString(lines) => lines
            .iter()
            .map(|l| offset_coords(l, distance))
            .collect::<Option<Vec<_>>>()
            .map(|parts| Arc::new(Geometry::MultiLineString(parts))),
        _ => Some(geometry.clone()),
    }
}

fn push_arrows(
    out: &mut Vec<DrawPrimitive>,
    feature: &Feature,
    coords: &[DVec2],
    style: &FeatureStyle,
    resolution: f64,
) {
    let arrows = &style.arrows;
    let z_index = Z_ARROW_MIN.max(Z_PAINT_BASE + style.layers.len() as i32);
    let scale = arrows.size / ARROW_ICON_SIZE;
    let icon = |placement: ArrowPlacement| {
        DrawPrimitive::point(
            Some(feature.id),
            placement.position,
            Symbol::Arrow {
                style: arrows.style,
                color: arrows.color.clone(),
                rotation: placement.rotation,
                scale,
            },
            z_index,
            PrimitiveKind::Arrow,
        )
    };

    if arrows.at_end {
        out.extend(arrows::end_arrow(coords).map(icon));
    }
    if arrows.at_start {
        out.extend(arrows::start_arrow(coords).map(icon));
    }
    if arrows.along_path {
        out.extend(
            arrows::along_path(coords, arrows.spacing * resolution)
                .into_iter()
                .map(icon),
        );
    }
}

#[cfg(test)]
mod tests;
