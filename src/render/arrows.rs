//! Pfeil-Platzierung entlang von Linien und SVG-Vorlagen der Pfeil-Icons.

use crate::core::ArrowStyle;
use glam::DVec2;

/// Kantenlänge der Icon-Vorlage in Pixeln (Skalierung = `size / 20`).
pub const ARROW_ICON_SIZE: f64 = 20.0;

/// Obergrenze für Pfeile entlang einer einzelnen Linie.
const MAX_ALONG_PATH: usize = 10_000;

/// Position und Drehung eines Pfeils.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowPlacement {
    /// Position in Kartenkoordinaten
    pub position: DVec2,
    /// Drehung in Radiant (`atan2` der Laufrichtung)
    pub rotation: f64,
}

fn direction_angle(from: DVec2, to: DVec2) -> f64 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Pfeil am Linienende, gedreht nach dem letzten Segment.
pub fn end_arrow(coords: &[DVec2]) -> Option<ArrowPlacement> {
    let [.., p1, p2] = coords else {
        return None;
    };
    Some(ArrowPlacement {
        position: *p2,
        rotation: direction_angle(*p1, *p2),
    })
}

/// Pfeil am Linienanfang, gedreht nach dem ersten Segment.
pub fn start_arrow(coords: &[DVec2]) -> Option<ArrowPlacement> {
    let [p1, p2, ..] = coords else {
        return None;
    };
    Some(ArrowPlacement {
        position: *p1,
        rotation: direction_angle(*p1, *p2),
    })
}

/// Pfeile im Abstand `spacing` entlang der Linie, beginnend bei `spacing / 2`.
///
/// Ein Pfeil bei Bogenlänge `d` wird nur gesetzt, wenn danach noch mehr als
/// eine halbe Teilung Linie folgt (`d + spacing/2 < Gesamtlänge`). Eine Linie
/// der Länge `5 × spacing` trägt damit genau 4 Pfeile.
pub fn along_path(coords: &[DVec2], spacing: f64) -> Vec<ArrowPlacement> {
    if coords.len() < 2 || !spacing.is_finite() || spacing <= 0.0 {
        return Vec::new();
    }

    let total: f64 = coords.windows(2).map(|w| w[0].distance(w[1])).sum();
    let half = spacing / 2.0;
    let limit = total - half - spacing * 1e-9;
    let mut result = Vec::new();
    let mut k = 0usize;
    let mut seg_start = 0.0;

    for w in coords.windows(2) {
        let (a, b) = (w[0], w[1]);
        let seg_len = a.distance(b);
        if seg_len <= f64::EPSILON {
            continue;
        }
        let rotation = direction_angle(a, b);
        loop {
            let d = half + k as f64 * spacing;
            if d >= limit || d > seg_start + seg_len || result.len() >= MAX_ALONG_PATH {
                break;
            }
            let t = (d - seg_start) / seg_len;
            result.push(ArrowPlacement {
                position: a.lerp(b, t),
                rotation,
            });
            k += 1;
        }
        seg_start += seg_len;
    }

    result
}

/// SVG-Markup eines Pfeil-Icons (20×20, Spitze zeigt nach rechts).
pub fn arrow_svg(style: ArrowStyle, color: &str) -> String {
    match style {
        ArrowStyle::Chevron => format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 20 20"><path d="M7.5 2.5l5 7.5-5 7.5" fill="none" stroke="{color}" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"/></svg>"#
        ),
        ArrowStyle::Triangle => format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 20 20"><path d="M2.5 2.5l15 7.5-15 7.5v-15z" fill="{color}"/></svg>"#
        ),
    }
}
