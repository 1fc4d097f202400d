//! SVG → Features.
//!
//! Unterstützt `path` (M L H V C S Q T A Z), `circle`, `ellipse`, `rect`,
//! `line`, `polygon` und `polyline`. Die Zeichenfläche (viewBox, sonst
//! width/height) wird linear auf ein Quadrat von `extent_deg` Grad um den
//! konfigurierten Ursprung abgebildet und anschließend nach Web Mercator
//! projiziert. Transformationen (`transform=`) werden nicht ausgewertet.

use super::ImportedFeature;
use crate::core::{lon_lat_to_mercator, EditorError, FeatureStyle, Geometry, GeometryClass, Rgba};
use crate::shared::spline_geometry::dedup_consecutive;
use crate::shared::SvgImportOptions;
use glam::DVec2;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::collections::HashMap;

/// Zwischenpunkte pro kubischem Bézier-Segment.
const CUBIC_STEPS: usize = 10;
/// Zwischenpunkte pro quadratischem Bézier-Segment.
const QUADRATIC_STEPS: usize = 8;
/// Ecken des Polygons, das eine Ellipse annähert.
const ELLIPSE_SEGMENTS: usize = 64;
/// Offene Pfade, deren Enden näher beieinander liegen (Meter), werden Polygone.
const CLOSE_DISTANCE_M: f64 = 100.0;
/// Zeichenflächengröße ohne viewBox/width/height.
const DEFAULT_CANVAS: f64 = 100.0;

type Attributes = HashMap<String, String>;

fn svg_err(e: impl std::fmt::Display) -> EditorError {
    EditorError::SvgImport(e.to_string())
}

// ── Koordinaten ─────────────────────────────────────────────────────

/// Abbildung SVG-Koordinaten → Web Mercator.
#[derive(Debug, Clone, Copy)]
struct CanvasTransform {
    min: DVec2,
    size: DVec2,
    origin: DVec2,
    extent_deg: f64,
}

impl CanvasTransform {
    fn from_root(attrs: &Attributes, options: &SvgImportOptions) -> Self {
        let (min, size) = attrs
            .get("viewBox")
            .and_then(|v| parse_view_box(v))
            .unwrap_or_else(|| {
                let dim = |key: &str| {
                    attrs
                        .get(key)
                        .and_then(|v| parse_length(v))
                        .filter(|v| *v > 0.0)
                        .unwrap_or(DEFAULT_CANVAS)
                };
                (DVec2::ZERO, DVec2::new(dim("width"), dim("height")))
            });
        Self {
            min,
            size,
            origin: DVec2::new(options.origin_lon, options.origin_lat),
            extent_deg: options.extent_deg,
        }
    }

    fn to_map(self, p: DVec2) -> DVec2 {
        let n = (p - self.min) / self.size;
        // SVG-y zeigt nach unten
        let lon = self.origin.x + (n.x - 0.5) * self.extent_deg;
        let lat = self.origin.y + (0.5 - n.y) * self.extent_deg;
        lon_lat_to_mercator(DVec2::new(lon, lat))
    }
}

fn parse_view_box(value: &str) -> Option<(DVec2, DVec2)> {
    let parts: Vec<f64> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().ok())
        .collect::<Option<_>>()?;
    match parts[..] {
        [x, y, w, h] if w > 0.0 && h > 0.0 => Some((DVec2::new(x, y), DVec2::new(w, h))),
        _ => None,
    }
}

/// Zahl mit optionaler Einheit (`12`, `12.5px`).
fn parse_length(value: &str) -> Option<f64> {
    value
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%')
        .parse()
        .ok()
}

// ── Tokenizer ───────────────────────────────────────────────────────

struct PathTokenizer {
    command: Regex,
    number: Regex,
}

impl PathTokenizer {
    fn new() -> Result<Self, EditorError> {
        Ok(Self {
            command: Regex::new(r"[MmLlHhVvCcSsQqTtAaZz][^MmLlHhVvCcSsQqTtAaZz]*")
                .map_err(svg_err)?,
            number: Regex::new(r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?").map_err(svg_err)?,
        })
    }

    fn numbers(&self, text: &str) -> Vec<f64> {
        self.number
            .find_iter(text)
            .filter_map(|m| m.as_str().parse().ok())
            .collect()
    }

    fn commands(&self, d: &str) -> Vec<(char, Vec<f64>)> {
        self.command
            .find_iter(d)
            .filter_map(|m| {
                let s = m.as_str();
                let cmd = s.chars().next()?;
                Some((cmd, self.numbers(&s[cmd.len_utf8()..])))
            })
            .collect()
    }

    fn points(&self, text: &str) -> Vec<DVec2> {
        self.numbers(text)
            .chunks_exact(2)
            .map(|p| DVec2::new(p[0], p[1]))
            .collect()
    }
}

// ── Pfade ───────────────────────────────────────────────────────────

/// Abgetasteter Pfad in SVG-Koordinaten.
#[derive(Debug, PartialEq)]
enum PathShape {
    Open(Vec<DVec2>),
    Closed(Vec<DVec2>),
}

fn cubic(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, steps: usize, out: &mut Vec<DVec2>) {
    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        let u = 1.0 - t;
        out.push(p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t));
    }
}

fn quadratic(p0: DVec2, p1: DVec2, p2: DVec2, steps: usize, out: &mut Vec<DVec2>) {
    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        let u = 1.0 - t;
        out.push(p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t));
    }
}

/// Tastet Pfadbefehle ab. Bögen werden als Gerade zum Endpunkt genähert,
/// der erste `Z`-Befehl schließt den Pfad ab.
fn trace_path(commands: &[(char, Vec<f64>)]) -> PathShape {
    let mut points = Vec::new();
    let mut current = DVec2::ZERO;
    let mut start = DVec2::ZERO;
    let mut last_cubic: Option<DVec2> = None;
    let mut last_quad: Option<DVec2> = None;

    for (cmd, values) in commands {
        let relative = cmd.is_ascii_lowercase();
        let at = |base: DVec2, x: f64, y: f64| {
            if relative {
                base + DVec2::new(x, y)
            } else {
                DVec2::new(x, y)
            }
        };
        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;

        match cmd.to_ascii_uppercase() {
            'M' => {
                for (i, v) in values.chunks_exact(2).enumerate() {
                    current = at(current, v[0], v[1]);
                    if i == 0 {
                        start = current;
                    }
                    points.push(current);
                }
            }
            'L' => {
                for v in values.chunks_exact(2) {
                    current = at(current, v[0], v[1]);
                    points.push(current);
                }
            }
            'H' => {
                for v in values {
                    current.x = if relative { current.x + v } else { *v };
                    points.push(current);
                }
            }
            'V' => {
                for v in values {
                    current.y = if relative { current.y + v } else { *v };
                    points.push(current);
                }
            }
            'C' => {
                for v in values.chunks_exact(6) {
                    let c1 = at(current, v[0], v[1]);
                    let c2 = at(current, v[2], v[3]);
                    let end = at(current, v[4], v[5]);
                    cubic(current, c1, c2, end, CUBIC_STEPS, &mut points);
                    cubic_ctrl = Some(c2);
                    current = end;
                }
            }
            'S' => {
                for v in values.chunks_exact(4) {
                    let c1 = cubic_ctrl
                        .or(last_cubic)
                        .map_or(current, |c| current * 2.0 - c);
                    let c2 = at(current, v[0], v[1]);
                    let end = at(current, v[2], v[3]);
                    cubic(current, c1, c2, end, CUBIC_STEPS, &mut points);
                    cubic_ctrl = Some(c2);
                    current = end;
                }
            }
            'Q' => {
                for v in values.chunks_exact(4) {
                    let c = at(current, v[0], v[1]);
                    let end = at(current, v[2], v[3]);
                    quadratic(current, c, end, QUADRATIC_STEPS, &mut points);
                    quad_ctrl = Some(c);
                    current = end;
                }
            }
            'T' => {
                for v in values.chunks_exact(2) {
                    let c = quad_ctrl
                        .or(last_quad)
                        .map_or(current, |c| current * 2.0 - c);
                    let end = at(current, v[0], v[1]);
                    quadratic(current, c, end, QUADRATIC_STEPS, &mut points);
                    quad_ctrl = Some(c);
                    current = end;
                }
            }
            'A' => {
                for v in values.chunks_exact(7) {
                    current = at(current, v[5], v[6]);
                    points.push(current);
                }
            }
            'Z' => {
                if points.len() > 2 {
                    return PathShape::Closed(points);
                }
                current = start;
            }
            _ => {}
        }
        last_cubic = cubic_ctrl;
        last_quad = quad_ctrl;
    }
    PathShape::Open(points)
}

fn path_geometry(shape: PathShape, canvas: CanvasTransform) -> Option<Geometry> {
    let (closed, points) = match shape {
        PathShape::Open(points) => (false, points),
        PathShape::Closed(points) => (true, points),
    };
    let mapped: Vec<DVec2> = points.into_iter().map(|p| canvas.to_map(p)).collect();
    let coords = dedup_consecutive(&mapped);

    if coords.len() > 2 {
        let (first, last) = (coords[0], coords[coords.len() - 1]);
        if closed || first.distance(last) < CLOSE_DISTANCE_M {
            let polygon = Geometry::polygon_from_ring(coords.clone());
            if polygon.is_valid() {
                return Some(polygon);
            }
            log::debug!(
                "SVG: Ring mit {} Punkten zu kurz für ein Polygon, als Linie übernommen",
                coords.len()
            );
        }
    }
    (coords.len() > 1).then_some(Geometry::LineString(coords))
}

// ── Elemente ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ElementKind {
    Path,
    Circle,
    Ellipse,
    Rect,
    Line,
    Polygon,
    Polyline,
}

impl ElementKind {
    fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "path" => ElementKind::Path,
            "circle" => ElementKind::Circle,
            "ellipse" => ElementKind::Ellipse,
            "rect" => ElementKind::Rect,
            "line" => ElementKind::Line,
            "polygon" => ElementKind::Polygon,
            "polyline" => ElementKind::Polyline,
            _ => return None,
        })
    }

    fn tag(self) -> &'static str {
        match self {
            ElementKind::Path => "path",
            ElementKind::Circle => "circle",
            ElementKind::Ellipse => "ellipse",
            ElementKind::Rect => "rect",
            ElementKind::Line => "line",
            ElementKind::Polygon => "polygon",
            ElementKind::Polyline => "polyline",
        }
    }
}

fn number(attrs: &Attributes, key: &str) -> f64 {
    attrs
        .get(key)
        .and_then(|v| parse_length(v))
        .unwrap_or(0.0)
}

fn element_geometry(
    kind: ElementKind,
    attrs: &Attributes,
    canvas: CanvasTransform,
    tokenizer: &PathTokenizer,
) -> Option<Geometry> {
    let map = |x: f64, y: f64| canvas.to_map(DVec2::new(x, y));
    match kind {
        ElementKind::Path => {
            let d = attrs.get("d")?;
            path_geometry(trace_path(&tokenizer.commands(d)), canvas)
        }
        ElementKind::Circle => {
            let (cx, cy, r) = (number(attrs, "cx"), number(attrs, "cy"), number(attrs, "r"));
            if r <= 0.0 {
                return None;
            }
            let center = map(cx, cy);
            let radius = map(cx + r, cy).distance(center);
            Some(Geometry::Circle { center, radius })
        }
        ElementKind::Ellipse => {
            let (cx, cy) = (number(attrs, "cx"), number(attrs, "cy"));
            let (rx, ry) = (number(attrs, "rx"), number(attrs, "ry"));
            if rx <= 0.0 || ry <= 0.0 {
                return None;
            }
            let ring = (0..ELLIPSE_SEGMENTS)
                .map(|i| {
                    let a = i as f64 / ELLIPSE_SEGMENTS as f64 * std::f64::consts::TAU;
                    map(cx + rx * a.cos(), cy + ry * a.sin())
                })
                .collect();
            Some(Geometry::polygon_from_ring(ring))
        }
        ElementKind::Rect => {
            let (x, y) = (number(attrs, "x"), number(attrs, "y"));
            let (w, h) = (number(attrs, "width"), number(attrs, "height"));
            if w <= 0.0 || h <= 0.0 {
                return None;
            }
            Some(Geometry::Polygon(vec![vec![
                map(x, y),
                map(x + w, y),
                map(x + w, y + h),
                map(x, y + h),
                map(x, y),
            ]]))
        }
        ElementKind::Line => Some(Geometry::LineString(vec![
            map(number(attrs, "x1"), number(attrs, "y1")),
            map(number(attrs, "x2"), number(attrs, "y2")),
        ])),
        ElementKind::Polygon | ElementKind::Polyline => {
            let points: Vec<DVec2> = tokenizer
                .points(attrs.get("points")?)
                .into_iter()
                .map(|p| canvas.to_map(p))
                .collect();
            match kind {
                ElementKind::Polygon if points.len() > 2 => {
                    Some(Geometry::polygon_from_ring(points))
                }
                ElementKind::Polyline if points.len() > 1 => Some(Geometry::LineString(points)),
                _ => None,
            }
        }
    }
}

/// Farben und Strichbreite des Elements im Standard-Style der Klasse.
///
/// `None`, wenn das Element nichts vom Standard Abweichendes vorgibt.
fn element_style(attrs: &Attributes, class: GeometryClass) -> Option<FeatureStyle> {
    let opacity = |key: &str| {
        attrs
            .get(key)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .map_or(1.0, |v| v.clamp(0.0, 1.0))
    };
    let fill = attrs.get("fill").map_or("#000000", String::as_str).trim();
    let stroke = attrs.get("stroke").map_or("none", String::as_str).trim();

    let mut style = FeatureStyle::default_for(class);
    let layer = style.layers.first_mut()?;
    let mut changed = false;

    if let Some(color) = Rgba::parse_css(stroke) {
        layer.stroke_color = color.to_hex();
        layer.stroke_opacity = opacity("stroke-opacity") * color.a;
        layer.stroke_width = attrs
            .get("stroke-width")
            .and_then(|v| parse_length(v))
            .filter(|w| *w >= 0.0)
            .unwrap_or(1.0);
        changed = true;
    }
    if class == GeometryClass::Area {
        if fill.eq_ignore_ascii_case("none") {
            layer.fill_opacity = 0.0;
            changed = true;
        } else if let Some(color) = Rgba::parse_css(fill) {
            layer.fill_color = color.to_hex();
            layer.fill_opacity = opacity("fill-opacity") * color.a;
            changed = true;
        }
    }
    changed.then_some(style)
}

fn attributes(element: &BytesStart<'_>) -> Result<Attributes, EditorError> {
    let mut attrs = Attributes::new();
    for attr in element.attributes().with_checks(false) {
        let attr = attr.map_err(svg_err)?;
        let key = std::str::from_utf8(attr.key.local_name().as_ref())
            .map_err(svg_err)?
            .to_string();
        let value = attr.unescape_value().map_err(svg_err)?.into_owned();
        attrs.insert(key, value);
    }
    // Inline-CSS überschreibt Präsentationsattribute
    if let Some(style) = attrs.get("style").cloned() {
        for declaration in style.split(';') {
            if let Some((key, value)) = declaration.split_once(':') {
                attrs.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
    }
    Ok(attrs)
}

/// Liest alle unterstützten Elemente in Dokumentreihenfolge.
///
/// Namen folgen dem Schema `{element}_{n}` mit fortlaufendem Zähler je
/// Elementtyp. Pfade mit mehr als drei Punkten werden als Splines markiert.
pub fn parse(text: &str, options: &SvgImportOptions) -> Result<Vec<ImportedFeature>, EditorError> {
    let tokenizer = PathTokenizer::new()?;
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut canvas: Option<CanvasTransform> = None;
    let mut counters: HashMap<ElementKind, usize> = HashMap::new();
    let mut features = Vec::new();

    loop {
        match reader.read_event().map_err(svg_err)? {
            Event::Start(e) | Event::Empty(e) => {
                let local = e.local_name();
                let tag = std::str::from_utf8(local.as_ref()).map_err(svg_err)?;
                if tag == "svg" {
                    if canvas.is_none() {
                        canvas = Some(CanvasTransform::from_root(&attributes(&e)?, options));
                    }
                    continue;
                }
                let Some(kind) = ElementKind::from_tag(tag) else {
                    continue;
                };
                let attrs = attributes(&e)?;
                let transform = *canvas
                    .get_or_insert_with(|| CanvasTransform::from_root(&Attributes::new(), options));
                let counter = counters.entry(kind).or_insert(0);
                let index = *counter;
                *counter += 1;

                let Some(geometry) = element_geometry(kind, &attrs, transform, &tokenizer) else {
                    log::debug!("SVG: {}_{} ohne verwertbare Geometrie", kind.tag(), index);
                    continue;
                };
                if !geometry.is_valid() {
                    log::warn!(
                        "SVG: {}_{} übersprungen (ungültige {})",
                        kind.tag(),
                        index,
                        geometry.type_name()
                    );
                    continue;
                }
                let spline = match (&geometry, kind) {
                    (Geometry::LineString(coords), ElementKind::Path) if coords.len() > 3 => {
                        Some(options.spline)
                    }
                    _ => None,
                };
                features.push(ImportedFeature {
                    style: element_style(&attrs, geometry.class()),
                    geometry,
                    spline,
                    name: Some(format!("{}_{}", kind.tag(), index)),
                    source: "svg",
                });
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if features.is_empty() {
        return Err(EditorError::EmptyImport("SVG"));
    }
    log::info!("SVG gelesen: {} Elemente", features.len());
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mercator_to_lon_lat;
    use approx::assert_relative_eq;

    fn options() -> SvgImportOptions {
        SvgImportOptions::default()
    }

    #[test]
    fn viewbox_center_maps_to_origin() {
        let svg = r#"<svg viewBox="0 0 200 100"><line x1="100" y1="50" x2="200" y2="0"/></svg>"#;

        let features = parse(svg, &options()).expect("SVG sollte lesbar sein");

        let Geometry::LineString(coords) = &features[0].geometry else {
            panic!("Linie erwartet");
        };
        let center = mercator_to_lon_lat(coords[0]);
        assert_relative_eq!(center.x, options().origin_lon, epsilon = 1e-9);
        assert_relative_eq!(center.y, options().origin_lat, epsilon = 1e-9);
        // rechte obere Ecke: +halbe Ausdehnung in beide Richtungen
        let corner = mercator_to_lon_lat(coords[1]);
        assert_relative_eq!(corner.x, options().origin_lon + 0.005, epsilon = 1e-9);
        assert_relative_eq!(corner.y, options().origin_lat + 0.005, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_rings_are_kept_as_lines_or_skipped() {
        let svg = r#"<svg width="100" height="100">
            <path d="M10 10 L90 10 L10 10 Z"/>
            <polygon points="10,50 90,50 10,50"/>
            <line x1="0" y1="0" x2="100" y2="100"/>
        </svg>"#;

        let features = parse(svg, &options()).expect("SVG sollte lesbar sein");

        assert_eq!(features.len(), 2);
        let Geometry::LineString(coords) = &features[0].geometry else {
            panic!("Linie statt Polygon erwartet");
        };
        assert_eq!(coords.len(), 3);
        assert_eq!(features[0].name.as_deref(), Some("path_0"));
        assert_eq!(features[1].name.as_deref(), Some("line_0"));
    }

    #[test]
    fn closed_path_becomes_polygon_and_curve_becomes_spline() {
        let svg = r#"<svg width="100" height="100">
            <path d="M10 10 L90 10 L90 90 Z"/>
            <path d="M0 50 C 20 0, 80 0, 100 50"/>
        </svg>"#;

        let features = parse(svg, &options()).expect("SVG sollte lesbar sein");

        assert_eq!(features.len(), 2);
        assert!(matches!(features[0].geometry, Geometry::Polygon(_)));
        assert_eq!(features[0].name.as_deref(), Some("path_0"));
        assert!(features[0].spline.is_none());

        let Geometry::LineString(coords) = &features[1].geometry else {
            panic!("Linie erwartet");
        };
        assert_eq!(coords.len(), CUBIC_STEPS + 1);
        assert_eq!(features[1].spline, Some(options().spline));
        assert_eq!(features[1].source, "svg");
    }

    #[test]
    fn relative_commands_and_implicit_lineto() {
        let tokenizer = PathTokenizer::new().expect("Regex gültig");
        let shape = trace_path(&tokenizer.commands("m10,10 20,0 h5 v-5"));

        assert_eq!(
            shape,
            PathShape::Open(vec![
                DVec2::new(10.0, 10.0),
                DVec2::new(30.0, 10.0),
                DVec2::new(35.0, 10.0),
                DVec2::new(35.0, 5.0),
            ])
        );
    }

    #[test]
    fn smooth_cubic_reflects_previous_control_point() {
        let tokenizer = PathTokenizer::new().expect("Regex gültig");
        let PathShape::Open(points) =
            trace_path(&tokenizer.commands("M0 0 C0 10 10 10 10 0 S20 -10 20 0"))
        else {
            panic!("offener Pfad erwartet");
        };

        // Zweites Segment ist das an (10,0) gespiegelte erste
        let mid_first = points[CUBIC_STEPS / 2];
        let mid_second = points[CUBIC_STEPS + CUBIC_STEPS / 2];
        assert_relative_eq!(mid_second.y, -mid_first.y, epsilon = 1e-9);
        assert_relative_eq!(mid_second.x, mid_first.x + 10.0, epsilon = 1e-9);
    }

    #[test]
    fn shapes_map_to_matching_geometries() {
        let svg = r##"<svg viewBox="0 0 100 100">
            <circle cx="50" cy="50" r="10" fill="#ff0000"/>
            <ellipse cx="50" cy="50" rx="20" ry="10"/>
            <rect x="0" y="0" width="10" height="10" style="fill: none; stroke: #00ff00"/>
            <polyline points="0,0 10,10 20,0"/>
            <polygon points="0,0 10,0 10,10"/>
            <circle cx="1" cy="1" r="0"/>
        </svg>"##;

        let features = parse(svg, &options()).expect("SVG sollte lesbar sein");

        assert_eq!(features.len(), 5);
        assert!(matches!(features[0].geometry, Geometry::Circle { .. }));
        let Geometry::Polygon(rings) = &features[1].geometry else {
            panic!("Ellipse als Polygon erwartet");
        };
        assert_eq!(rings[0].len(), ELLIPSE_SEGMENTS + 1);
        assert!(matches!(features[3].geometry, Geometry::LineString(_)));
        assert!(matches!(features[4].geometry, Geometry::Polygon(_)));

        let circle_style = features[0].style.as_ref().expect("Füllfarbe übernommen");
        assert_eq!(circle_style.layers[0].fill_color, "#ff0000");
        let rect_style = features[2].style.as_ref().expect("Inline-Style übernommen");
        assert_eq!(rect_style.layers[0].stroke_color, "#00ff00");
        assert_eq!(rect_style.layers[0].fill_opacity, 0.0);
    }

    #[test]
    fn svg_without_shapes_is_rejected() {
        let result = parse("<svg><g/></svg>", &options());
        assert_eq!(result, Err(EditorError::EmptyImport("SVG")));
    }
}
