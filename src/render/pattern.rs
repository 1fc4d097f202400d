//! Musterkacheln für Flächenfüllungen.
//!
//! Eine Kachel beschreibt eine Wiederholungszelle in Pixeln; der Host
//! kachelt sie über die Fläche und dreht sie um `angle`.

use crate::core::{FillPatternConfig, PatternType, Rgba};
use glam::DVec2;

/// Form innerhalb einer Kachel (Pixel, Ursprung oben links).
#[derive(Debug, Clone, PartialEq)]
pub enum PatternShape {
    /// Linie
    Line {
        /// Start
        from: DVec2,
        /// Ende
        to: DVec2,
        /// Strichbreite
        width: f64,
    },
    /// Gefüllter Kreis
    Dot {
        /// Mittelpunkt
        center: DVec2,
        /// Radius
        radius: f64,
    },
    /// Kreisring
    Ring {
        /// Mittelpunkt
        center: DVec2,
        /// Radius
        radius: f64,
        /// Strichbreite
        width: f64,
    },
    /// Gefülltes Quadrat
    Square {
        /// Mittelpunkt
        center: DVec2,
        /// Halbe Kantenlänge
        half: f64,
    },
}

/// Eine fertige Musterkachel.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternTile {
    /// Kantenlänge der Kachel in Pixeln
    pub size: f64,
    /// Farbe aller Formen
    pub color: Rgba,
    /// Drehwinkel in Grad
    pub angle: f64,
    /// Formen der Kachel
    pub shapes: Vec<PatternShape>,
}

impl PatternTile {
    /// Baut die Kachel zu einer Muster-Konfiguration.
    ///
    /// `None` bei `type = none` oder unbrauchbaren Maßen.
    pub fn build(config: &FillPatternConfig) -> Option<Self> {
        let FillPatternConfig {
            kind,
            size,
            spacing,
            angle,
            ..
        } = *config;
        if kind == PatternType::None {
            return None;
        }
        if !(size.is_finite() && spacing.is_finite() && angle.is_finite()) {
            return None;
        }
        if size <= 0.0 || spacing <= 0.0 {
            return None;
        }

        let tile = spacing.max(size);
        let mid = tile / 2.0;
        let c = DVec2::splat(mid);
        let shapes = match kind {
            PatternType::None => return None,
            PatternType::Hatch => vec![PatternShape::Line {
                from: DVec2::new(0.0, mid),
                to: DVec2::new(tile, mid),
                width: size,
            }],
            PatternType::Cross => vec![
                PatternShape::Line {
                    from: DVec2::new(0.0, mid),
                    to: DVec2::new(tile, mid),
                    width: size,
                },
                PatternShape::Line {
                    from: DVec2::new(mid, 0.0),
                    to: DVec2::new(mid, tile),
                    width: size,
                },
            ],
            PatternType::Dot => vec![PatternShape::Dot {
                center: c,
                radius: size / 2.0,
            }],
            PatternType::Circle => vec![PatternShape::Ring {
                center: c,
                radius: size / 2.0,
                width: 1.0,
            }],
            PatternType::Square => vec![PatternShape::Square {
                center: c,
                half: size / 2.0,
            }],
        };

        Some(Self {
            size: tile,
            color: Rgba::from_hex(&config.color, 1.0),
            angle,
            shapes,
        })
    }
}
