//! Geometrie-Typen in Kartenkoordinaten (EPSG:3857, Meter).

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Achsenparalleles Begrenzungsrechteck.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Minimale Ecke (links unten)
    pub min: DVec2,
    /// Maximale Ecke (rechts oben)
    pub max: DVec2,
}

impl Extent {
    /// Erstellt ein Rechteck aus zwei beliebigen Ecken.
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Kleinstes Rechteck um alle Punkte, `None` bei leerer Eingabe.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a DVec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut extent = Self {
            min: first,
            max: first,
        };
        for p in iter {
            extent.extend_point(*p);
        }
        Some(extent)
    }

    /// Erweitert das Rechteck um einen Punkt.
    pub fn extend_point(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Vereinigt zwei Rechtecke.
    pub fn union(&self, other: &Extent) -> Extent {
        Extent {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Mittelpunkt des Rechtecks.
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Breite und Höhe.
    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    /// Prüft ob ein Punkt innerhalb (inkl. Rand) liegt.
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Prüft ob sich zwei Rechtecke überschneiden.
    pub fn intersects(&self, other: &Extent) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Grobe Geometrie-Klasse für Style-Entscheidungen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryClass {
    /// Einzelpunkt
    Point,
    /// Linienzug (einfach oder mehrteilig)
    Line,
    /// Fläche (Polygon, Multipolygon, Kreis)
    Area,
}

/// Geometrie eines Features.
///
/// Polygon-Ringe sind geschlossen gespeichert (erster == letzter Punkt),
/// der erste Ring ist der Außenring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Einzelpunkt
    Point(DVec2),
    /// Linienzug
    LineString(Vec<DVec2>),
    /// Polygon aus Ringen
    Polygon(Vec<Vec<DVec2>>),
    /// Kreis mit Mittelpunkt und Radius in Karteneinheiten
    Circle {
        /// Mittelpunkt
        center: DVec2,
        /// Radius
        radius: f64,
    },
    /// Mehrere Linienzüge
    MultiLineString(Vec<Vec<DVec2>>),
    /// Mehrere Polygone
    MultiPolygon(Vec<Vec<Vec<DVec2>>>),
}

impl Geometry {
    /// Erzeugt ein achsenparalleles Rechteck-Polygon aus zwei Ecken.
    pub fn rectangle(a: DVec2, b: DVec2) -> Self {
        let e = Extent::from_corners(a, b);
        Geometry::Polygon(vec![vec![
            e.min,
            DVec2::new(e.max.x, e.min.y),
            e.max,
            DVec2::new(e.min.x, e.max.y),
            e.min,
        ]])
    }

    /// Erzeugt ein Polygon aus einem offenen oder geschlossenen Punktzug.
    pub fn polygon_from_ring(mut ring: Vec<DVec2>) -> Self {
        if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
            if first != last {
                ring.push(first);
            }
        }
        Geometry::Polygon(vec![ring])
    }

    /// Geometrie-Klasse (Punkt, Linie, Fläche).
    pub fn class(&self) -> GeometryClass {
        match self {
            Geometry::Point(_) => GeometryClass::Point,
            Geometry::LineString(_) | Geometry::MultiLineString(_) => GeometryClass::Line,
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::Circle { .. } => {
                GeometryClass::Area
            }
        }
    }

    /// Flächengeometrie (bekommt Füllung).
    pub fn is_area(&self) -> bool {
        self.class() == GeometryClass::Area
    }

    /// Linie (bekommt Offset und Pfeile).
    pub fn is_line(&self) -> bool {
        self.class() == GeometryClass::Line
    }

    /// Kurzname des Geometrietyps (für Logging und Import-Meldungen).
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::Circle { .. } => "Circle",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Prüft Mindestpunktzahlen und endliche Koordinaten.
    pub fn is_valid(&self) -> bool {
        let finite = |p: &DVec2| p.is_finite();
        let ring_ok = |r: &Vec<DVec2>| r.len() >= 4 && r.iter().all(finite);
        let line_ok = |l: &Vec<DVec2>| l.len() >= 2 && l.iter().all(finite);
        match self {
            Geometry::Point(p) => p.is_finite(),
            Geometry::LineString(points) => line_ok(points),
            Geometry::Polygon(rings) => rings.first().is_some_and(ring_ok),
            Geometry::Circle { center, radius } => {
                center.is_finite() && radius.is_finite() && *radius >= 0.0
            }
            Geometry::MultiLineString(lines) => !lines.is_empty() && lines.iter().all(line_ok),
            Geometry::MultiPolygon(polys) => {
                !polys.is_empty() && polys.iter().all(|rings| rings.first().is_some_and(ring_ok))
            }
        }
    }

    /// Begrenzungsrechteck, `None` bei leerer Geometrie.
    pub fn extent(&self) -> Option<Extent> {
        match self {
            Geometry::Point(p) => Some(Extent { min: *p, max: *p }),
            Geometry::LineString(points) => Extent::from_points(points),
            Geometry::Polygon(rings) => Extent::from_points(rings.iter().flatten()),
            Geometry::Circle { center, radius } => {
                let r = DVec2::splat(radius.abs());
                Some(Extent {
                    min: *center - r,
                    max: *center + r,
                })
            }
            Geometry::MultiLineString(lines) => Extent::from_points(lines.iter().flatten()),
            Geometry::MultiPolygon(polys) => {
                Extent::from_points(polys.iter().flatten().flatten())
            }
        }
    }

    /// Mittelpunkt des Begrenzungsrechtecks (Position des Move-Handles).
    pub fn center(&self) -> Option<DVec2> {
        match self {
            Geometry::Circle { center, .. } => Some(*center),
            _ => self.extent().map(|e| e.center()),
        }
    }

    /// Editierbare Stützpunkte: Linienpunkte, Außenring ohne Schlusspunkt,
    /// Kreismittelpunkt. Mehrteilige Geometrien liefern alle Teile.
    pub fn vertices(&self) -> Vec<DVec2> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::LineString(points) => points.clone(),
            Geometry::Polygon(rings) => rings.first().map(|r| open_ring(r)).unwrap_or_default(),
            Geometry::Circle { center, .. } => vec![*center],
            Geometry::MultiLineString(lines) => lines.iter().flatten().copied().collect(),
            Geometry::MultiPolygon(polys) => polys
                .iter()
                .filter_map(|rings| rings.first())
                .flat_map(|r| open_ring(r))
                .collect(),
        }
    }

    /// Setzt einen Stützpunkt (Index wie in `vertices()`).
    ///
    /// Beim Außenring wird der Schlusspunkt mitgeführt. Gibt `false` zurück,
    /// wenn der Index nicht existiert oder die Geometrie nicht editierbar ist.
    pub fn set_vertex(&mut self, index: usize, pos: DVec2) -> bool {
        match self {
            Geometry::Point(p) if index == 0 => {
                *p = pos;
                true
            }
            Geometry::LineString(points) => match points.get_mut(index) {
                Some(p) => {
                    *p = pos;
                    true
                }
                None => false,
            },
            Geometry::Polygon(rings) => match rings.first_mut() {
                Some(ring) => set_ring_vertex(ring, index, pos),
                None => false,
            },
            Geometry::Circle { center, .. } if index == 0 => {
                *center = pos;
                true
            }
            _ => false,
        }
    }

    /// Verschiebt die gesamte Geometrie.
    pub fn translate(&mut self, delta: DVec2) {
        self.map_points(|p| p + delta);
    }

    /// Skaliert um einen Ankerpunkt (getrennte Faktoren für x/y).
    ///
    /// Kreise skalieren den Radius mit dem Mittel beider Faktoren.
    pub fn scale_about(&mut self, anchor: DVec2, factor: DVec2) {
        if let Geometry::Circle { center, radius } = self {
            *center = anchor + (*center - anchor) * factor;
            *radius *= (factor.x.abs() + factor.y.abs()) * 0.5;
            return;
        }
        self.map_points(|p| anchor + (p - anchor) * factor);
    }

    fn map_points(&mut self, f: impl Fn(DVec2) -> DVec2) {
        match self {
            Geometry::Point(p) => *p = f(*p),
            Geometry::LineString(points) => points.iter_mut().for_each(|p| *p = f(*p)),
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => rings
                .iter_mut()
                .flatten()
                .for_each(|p| *p = f(*p)),
            Geometry::Circle { center, .. } => *center = f(*center),
            Geometry::MultiPolygon(polys) => polys
                .iter_mut()
                .flatten()
                .flatten()
                .for_each(|p| *p = f(*p)),
        }
    }

    /// Abstand eines Punkts zur Geometrie (0 innerhalb von Flächen).
    pub fn distance_to(&self, p: DVec2) -> f64 {
        match self {
            Geometry::Point(q) => q.distance(p),
            Geometry::LineString(points) => polyline_distance(points, p),
            Geometry::Polygon(rings) => polygon_distance(rings, p),
            Geometry::Circle { center, radius } => (center.distance(p) - radius).max(0.0),
            Geometry::MultiLineString(lines) => lines
                .iter()
                .map(|l| polyline_distance(l, p))
                .fold(f64::INFINITY, f64::min),
            Geometry::MultiPolygon(polys) => polys
                .iter()
                .map(|rings| polygon_distance(rings, p))
                .fold(f64::INFINITY, f64::min),
        }
    }
}

fn open_ring(ring: &[DVec2]) -> Vec<DVec2> {
    match ring {
        [first, .., last] if first == last => ring[..ring.len() - 1].to_vec(),
        _ => ring.to_vec(),
    }
}

fn set_ring_vertex(ring: &mut [DVec2], index: usize, pos: DVec2) -> bool {
    let closed = ring.len() > 1 && ring.first() == ring.last();
    let open_len = if closed { ring.len() - 1 } else { ring.len() };
    if index >= open_len {
        return false;
    }
    ring[index] = pos;
    if closed && index == 0 {
        let last = ring.len() - 1;
        ring[last] = pos;
    }
    true
}

/// Abstand Punkt → Strecke.
pub fn point_segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn polyline_distance(points: &[DVec2], p: DVec2) -> f64 {
    match points {
        [] => f64::INFINITY,
        [single] => single.distance(p),
        _ => points
            .windows(2)
            .map(|w| point_segment_distance(p, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Even-Odd-Test gegen einen Ring.
pub fn point_in_ring(p: DVec2, ring: &[DVec2]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn polygon_distance(rings: &[Vec<DVec2>], p: DVec2) -> f64 {
    let Some(outer) = rings.first() else {
        return f64::INFINITY;
    };
    let in_hole = rings[1..].iter().any(|hole| point_in_ring(p, hole));
    if point_in_ring(p, outer) && !in_hole {
        return 0.0;
    }
    rings
        .iter()
        .map(|r| polyline_distance(r, p))
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Geometry {
        Geometry::rectangle(DVec2::new(0.0, 0.0), DVec2::new(10.0, 10.0))
    }

    #[test]
    fn rectangle_is_closed_and_has_four_vertices() {
        let g = square();
        let Geometry::Polygon(rings) = &g else {
            panic!("Polygon erwartet");
        };
        assert_eq!(rings[0].len(), 5);
        assert_eq!(rings[0].first(), rings[0].last());
        assert_eq!(g.vertices().len(), 4);
    }

    #[test]
    fn set_vertex_zero_moves_closing_point_too() {
        let mut g = square();
        assert!(g.set_vertex(0, DVec2::new(-1.0, -1.0)));
        let Geometry::Polygon(rings) = &g else {
            panic!("Polygon erwartet");
        };
        assert_eq!(rings[0][0], DVec2::new(-1.0, -1.0));
        assert_eq!(rings[0][4], DVec2::new(-1.0, -1.0));
        assert!(!g.set_vertex(4, DVec2::ZERO));
    }

    #[test]
    fn distance_is_zero_inside_area() {
        let g = square();
        assert_eq!(g.distance_to(DVec2::new(5.0, 5.0)), 0.0);
        assert_relative_eq!(g.distance_to(DVec2::new(15.0, 5.0)), 5.0);
    }

    #[test]
    fn circle_extent_and_scale() {
        let mut g = Geometry::Circle {
            center: DVec2::new(2.0, 2.0),
            radius: 3.0,
        };
        let e = g.extent().expect("Extent erwartet");
        assert_eq!(e.min, DVec2::new(-1.0, -1.0));
        g.scale_about(DVec2::new(2.0, 2.0), DVec2::splat(2.0));
        let Geometry::Circle { radius, .. } = g else {
            panic!("Kreis erwartet");
        };
        assert_relative_eq!(radius, 6.0);
    }

    #[test]
    fn degenerate_line_is_invalid() {
        assert!(!Geometry::LineString(vec![DVec2::ZERO]).is_valid());
        assert!(!Geometry::LineString(vec![DVec2::ZERO, DVec2::new(f64::NAN, 0.0)]).is_valid());
        assert!(Geometry::LineString(vec![DVec2::ZERO, DVec2::X]).is_valid());
    }
}
