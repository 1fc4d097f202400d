//! Reine Geometrie-Funktionen für Kardinal-Splines und Linien-Versatz.
//!
//! Layer-neutral: wird vom Style-Resolver und vom Bezier-Werkzeug genutzt,
//! ohne dass sich `render` und `app` gegenseitig importieren.

use glam::DVec2;

/// Punkt auf einem Hermite-Segment von `p1` nach `p2` (s ∈ [0, 1]).
///
/// `m1`/`m2` sind die Tangenten an den Segmentenden.
pub fn hermite_point(p1: DVec2, p2: DVec2, m1: DVec2, m2: DVec2, s: f64) -> DVec2 {
    let s2 = s * s;
    let s3 = s2 * s;
    let h1 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h2 = -2.0 * s3 + 3.0 * s2;
    let h3 = s3 - 2.0 * s2 + s;
    let h4 = s3 - s2;
    p1 * h1 + p2 * h2 + m1 * h3 + m2 * h4
}

/// Interpoliert eine Kardinal-Spline durch alle `points`.
///
/// Tangente am Punkt i: `(p[i+1] - p[i-1]) * tension`, Randpunkte werden
/// gedoppelt. `tension = 0.5` entspricht Catmull-Rom. Liefert `None`, wenn
/// keine Glättung möglich ist (weniger als 3 Punkte, keine Zwischenpunkte,
/// nicht-endliche Parameter); der Aufrufer zeichnet dann gerade Segmente.
pub fn cardinal_spline(
    points: &[DVec2],
    tension: f64,
    points_per_seg: usize,
    normalize: bool,
) -> Option<Vec<DVec2>> {
    if points.len() < 3 || points_per_seg == 0 || !tension.is_finite() {
        return None;
    }
    if points.iter().any(|p| !p.is_finite()) {
        return None;
    }

    let n = points.len();
    let at = |i: isize| points[i.clamp(0, n as isize - 1) as usize];
    let mut result = Vec::with_capacity((n - 1) * points_per_seg + 1);

    for seg in 0..n - 1 {
        let i = seg as isize;
        let (p0, p1, p2, p3) = (at(i - 1), at(i), at(i + 1), at(i + 2));
        let m1 = (p2 - p0) * tension;
        let m2 = (p3 - p1) * tension;
        for step in 0..points_per_seg {
            let s = step as f64 / points_per_seg as f64;
            result.push(hermite_point(p1, p2, m1, m2, s));
        }
    }
    // Endpunkt exakt übernehmen
    result.push(points[n - 1]);

    if normalize {
        let count = result.len();
        Some(resample_by_count(&result, count))
    } else {
        Some(result)
    }
}

/// Approximierte Länge einer Polyline.
pub fn polyline_length(points: &[DVec2]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Verteilt `count` Punkte gleichmäßig (Bogenlänge) entlang einer Polyline.
pub fn resample_by_count(polyline: &[DVec2], count: usize) -> Vec<DVec2> {
    if polyline.len() < 2 || count < 2 {
        return polyline.to_vec();
    }
    let total = polyline_length(polyline);
    if total < f64::EPSILON {
        return vec![polyline[0]];
    }

    let spacing = total / (count - 1) as f64;
    let mut result = Vec::with_capacity(count);
    result.push(polyline[0]);

    let mut seg = 0;
    let mut seg_start_dist = 0.0;
    for k in 1..count - 1 {
        let target = spacing * k as f64;
        while seg + 1 < polyline.len() {
            let seg_len = polyline[seg].distance(polyline[seg + 1]);
            if seg_start_dist + seg_len >= target || seg + 2 == polyline.len() {
                let t = if seg_len > 0.0 {
                    ((target - seg_start_dist) / seg_len).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                result.push(polyline[seg].lerp(polyline[seg + 1], t));
                break;
            }
            seg_start_dist += seg_len;
            seg += 1;
        }
    }

    result.push(polyline[polyline.len() - 1]);
    result
}

/// Entfernt direkt aufeinanderfolgende doppelte Punkte.
pub fn dedup_consecutive(points: &[DVec2]) -> Vec<DVec2> {
    let mut out: Vec<DVec2> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_none_or(|last| last.distance_squared(*p) > f64::EPSILON) {
            out.push(*p);
        }
    }
    out
}

/// Linke Normale eines Richtungsvektors (90° gegen den Uhrzeigersinn).
fn left_normal(dir: DVec2) -> DVec2 {
    DVec2::new(-dir.y, dir.x)
}

/// Maximale Gehrungslänge als Vielfaches des Versatzes.
const MITER_LIMIT: f64 = 4.0;

/// Parallele Kopie einer Linie im Abstand `offset` (Karteneinheiten).
///
/// Positiver Versatz liegt links der Laufrichtung. Ecken werden mit
/// Gehrung verbunden, sehr spitze Winkel auf `MITER_LIMIT` begrenzt.
/// Liefert `None` bei weniger als zwei unterscheidbaren Punkten.
pub fn offset_coords(coords: &[DVec2], offset: f64) -> Option<Vec<DVec2>> {
    let pts = dedup_consecutive(coords);
    if pts.len() < 2 || !offset.is_finite() {
        return None;
    }
    if offset == 0.0 {
        return Some(pts);
    }

    let normals: Vec<DVec2> = pts
        .windows(2)
        .map(|w| left_normal((w[1] - w[0]).normalize()))
        .collect();

    let mut out = Vec::with_capacity(pts.len());
    out.push(pts[0] + normals[0] * offset);
    for i in 1..pts.len() - 1 {
        let (n1, n2) = (normals[i - 1], normals[i]);
        let sum = n1 + n2;
        if sum.length_squared() < 1e-12 {
            // Umkehrpunkt: Normale des eingehenden Segments
            out.push(pts[i] + n1 * offset);
            continue;
        }
        let miter = sum.normalize();
        let cos_half = miter.dot(n1).max(1.0 / MITER_LIMIT);
        out.push(pts[i] + miter * (offset / cos_half));
    }
    let last = pts.len() - 1;
    out.push(pts[last] + normals[last - 1] * offset);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn zigzag() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(20.0, 0.0),
            DVec2::new(30.0, 10.0),
        ]
    }

    #[test]
    fn spline_passes_through_control_points() {
        let pts = zigzag();
        let curve = cardinal_spline(&pts, 0.5, 10, false).expect("Kurve erwartet");
        assert_eq!(curve.len(), 3 * 10 + 1);
        assert_eq!(curve[0], pts[0]);
        assert_eq!(curve[10], pts[1]);
        assert_eq!(curve[20], pts[2]);
        assert_eq!(*curve.last().expect("Endpunkt"), pts[3]);
    }

    #[test]
    fn spline_needs_three_points() {
        let pts = [DVec2::ZERO, DVec2::X];
        assert!(cardinal_spline(&pts, 0.5, 10, false).is_none());
        assert!(cardinal_spline(&zigzag(), 0.5, 0, false).is_none());
        assert!(cardinal_spline(&zigzag(), f64::NAN, 4, false).is_none());
    }

    #[test]
    fn normalized_spline_has_even_spacing() {
        let curve = cardinal_spline(&zigzag(), 0.5, 8, true).expect("Kurve erwartet");
        let gaps: Vec<f64> = curve.windows(2).map(|w| w[0].distance(w[1])).collect();
        let first = gaps[0];
        for gap in &gaps[..gaps.len() - 1] {
            assert_relative_eq!(*gap, first, epsilon = first * 0.2);
        }
    }

    #[test]
    fn offset_of_straight_line_is_parallel() {
        let line = [DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)];
        let left = offset_coords(&line, 2.0).expect("Versatz erwartet");
        assert_relative_eq!(left[0].y, 2.0);
        assert_relative_eq!(left[1].y, 2.0);
        let right = offset_coords(&line, -2.0).expect("Versatz erwartet");
        assert_relative_eq!(right[1].y, -2.0);
    }

    #[test]
    fn offset_corner_keeps_distance_to_both_segments() {
        let line = [
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(10.0, 10.0),
        ];
        let left = offset_coords(&line, 1.0).expect("Versatz erwartet");
        assert_relative_eq!(left[1].x, 9.0, epsilon = 1e-9);
        assert_relative_eq!(left[1].y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn resample_keeps_endpoints() {
        let line = [DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)];
        let pts = resample_by_count(&line, 6);
        assert_eq!(pts.len(), 6);
        assert_relative_eq!(pts[1].x, 2.0);
        assert_eq!(pts[5], line[1]);
        assert_relative_eq!(polyline_length(&pts), 10.0);
    }
}
