//! Kartenansicht: Zentrum, Zoomstufe und Auflösung.

use super::geometry::Extent;
use glam::DVec2;

/// Auflösung (Meter pro Pixel) bei Zoomstufe 0 einer 256px-Kachel.
pub const RESOLUTION_AT_ZOOM_0: f64 = 156_543.033_928_040_97;

/// Kartenansicht in Web-Mercator-Koordinaten.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    /// Ansichtsmittelpunkt (Meter)
    pub center: DVec2,
    /// Zoomstufe (gebrochene Werte erlaubt)
    pub zoom: f64,
    /// Viewport-Größe in Pixeln
    pub viewport_size: DVec2,
}

impl MapView {
    /// Minimale Zoomstufe.
    pub const ZOOM_MIN: f64 = 0.0;
    /// Maximale Zoomstufe.
    pub const ZOOM_MAX: f64 = 28.0;

    /// Ansicht auf den Ursprung mit gegebener Zoomstufe.
    pub fn new(zoom: f64) -> Self {
        Self {
            center: DVec2::ZERO,
            zoom: zoom.clamp(Self::ZOOM_MIN, Self::ZOOM_MAX),
            viewport_size: DVec2::new(1280.0, 720.0),
        }
    }

    /// Karteneinheiten pro Bildschirmpixel.
    pub fn resolution(&self) -> f64 {
        RESOLUTION_AT_ZOOM_0 / 2f64.powf(self.zoom)
    }

    /// Setzt die Zoomstufe passend zu einer Auflösung.
    pub fn set_resolution(&mut self, resolution: f64) {
        if resolution > 0.0 && resolution.is_finite() {
            self.zoom = (RESOLUTION_AT_ZOOM_0 / resolution)
                .log2()
                .clamp(Self::ZOOM_MIN, Self::ZOOM_MAX);
        }
    }

    /// Verschiebt die Ansicht um ein Delta in Karteneinheiten.
    pub fn pan(&mut self, delta: DVec2) {
        self.center += delta;
    }

    /// Ändert die Zoomstufe relativ.
    pub fn zoom_by(&mut self, delta: f64) {
        self.zoom = (self.zoom + delta).clamp(Self::ZOOM_MIN, Self::ZOOM_MAX);
    }

    /// Bildschirmpixel (Ursprung oben links) → Kartenkoordinate.
    pub fn screen_to_map(&self, screen: DVec2) -> DVec2 {
        let offset = screen - self.viewport_size * 0.5;
        self.center + DVec2::new(offset.x, -offset.y) * self.resolution()
    }

    /// Kartenkoordinate → Bildschirmpixel.
    pub fn map_to_screen(&self, map: DVec2) -> DVec2 {
        let d = (map - self.center) / self.resolution();
        self.viewport_size * 0.5 + DVec2::new(d.x, -d.y)
    }

    /// Pixel-Toleranz in Karteneinheiten (für Hit-Tests).
    pub fn pixels_to_map(&self, pixels: f64) -> f64 {
        pixels * self.resolution()
    }

    /// Passt die Ansicht so an, dass `extent` mit `padding_px` Rand sichtbar ist.
    pub fn fit(&mut self, extent: &Extent, padding_px: f64) {
        let usable = (self.viewport_size - DVec2::splat(2.0 * padding_px)).max(DVec2::ONE);
        let size = extent.size();
        self.center = extent.center();
        let resolution = (size.x / usable.x).max(size.y / usable.y);
        if resolution > 0.0 {
            self.set_resolution(resolution);
        }
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::new(2.0)
    }
}
