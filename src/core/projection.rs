//! Sphärische Web-Mercator-Projektion (EPSG:4326 ↔ EPSG:3857).

use glam::DVec2;

/// Halber Erdumfang in Metern (Ausdehnung der Mercator-Ebene).
pub const MERCATOR_HALF_EXTENT: f64 = 20_037_508.342_789_244;

/// Breitengrad-Grenze, ab der Mercator divergiert.
const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Längen-/Breitengrad (Grad) → Web Mercator (Meter).
pub fn lon_lat_to_mercator(lon_lat: DVec2) -> DVec2 {
    let lat = lon_lat.y.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = lon_lat.x * MERCATOR_HALF_EXTENT / 180.0;
    let y = ((90.0 + lat).to_radians() / 2.0).tan().ln() / std::f64::consts::PI
        * MERCATOR_HALF_EXTENT;
    DVec2::new(x, y)
}

/// Web Mercator (Meter) → Längen-/Breitengrad (Grad).
pub fn mercator_to_lon_lat(xy: DVec2) -> DVec2 {
    let lon = xy.x / MERCATOR_HALF_EXTENT * 180.0;
    let lat = (2.0 * (xy.y / MERCATOR_HALF_EXTENT * std::f64::consts::PI).exp().atan()
        - std::f64::consts::FRAC_PI_2)
        .to_degrees();
    DVec2::new(lon, lat)
}
