//! Farbwerte: Hex-Strings aus dem Style-Modell → RGBA.

use std::fmt;

/// RGBA-Farbe, Kanäle 0–255, Alpha 0.0–1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Rot
    pub r: u8,
    /// Grün
    pub g: u8,
    /// Blau
    pub b: u8,
    /// Deckkraft
    pub a: f64,
}

impl Rgba {
    /// Erstellt eine Farbe (Alpha ungeprüft).
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Weiß, voll deckend.
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);

    /// Hex-Farbe (`#rgb` oder `#rrggbb`) plus Deckkraft.
    ///
    /// Ungültige Eingaben ergeben Schwarz mit der gewünschten Deckkraft.
    pub fn from_hex(hex: &str, opacity: f64) -> Self {
        let alpha = clamp_unit(opacity);
        parse_hex(hex)
            .map(|(r, g, b)| Rgba::new(r, g, b, alpha))
            .unwrap_or(Rgba::new(0, 0, 0, alpha))
    }

    /// CSS-Farbe: Hex, `rgb(...)`, `rgba(...)` oder ein paar Farbnamen.
    pub fn parse_css(input: &str) -> Option<Self> {
        let s = input.trim();
        if s.starts_with('#') {
            return parse_hex(s).map(|(r, g, b)| Rgba::new(r, g, b, 1.0));
        }
        let lower = s.to_ascii_lowercase();
        if let Some(body) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            let channel = |i: usize| parts.get(i)?.parse::<f64>().ok();
            let (r, g, b) = (channel(0)?, channel(1)?, channel(2)?);
            let a = if parts.len() > 3 { channel(3)? } else { 1.0 };
            return Some(Rgba::new(to_u8(r), to_u8(g), to_u8(b), clamp_unit(a)));
        }
        match lower.as_str() {
            "black" => Some(Rgba::new(0, 0, 0, 1.0)),
            "white" => Some(Rgba::WHITE),
            "red" => Some(Rgba::new(255, 0, 0, 1.0)),
            "green" => Some(Rgba::new(0, 128, 0, 1.0)),
            "blue" => Some(Rgba::new(0, 0, 255, 1.0)),
            "orange" => Some(Rgba::new(255, 165, 0, 1.0)),
            "yellow" => Some(Rgba::new(255, 255, 0, 1.0)),
            _ => None,
        }
    }

    /// Gleiche Farbe mit anderer Deckkraft.
    pub fn with_alpha(self, a: f64) -> Self {
        Rgba { a: clamp_unit(a), ..self }
    }

    /// `#rrggbb` ohne Alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        1.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

fn to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };
    let value = u32::from_str_radix(&expanded, 16).ok()?;
    Some((
        ((value >> 16) & 0xff) as u8,
        ((value >> 8) & 0xff) as u8,
        (value & 0xff) as u8,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_digit_hex_with_opacity() {
        let c = Rgba::from_hex("#ff8000", 0.5);
        assert_eq!((c.r, c.g, c.b), (255, 128, 0));
        assert_eq!(c.a, 0.5);
        assert_eq!(c.to_string(), "rgba(255, 128, 0, 0.5)");
    }

    #[test]
    fn three_digit_hex_is_expanded() {
        let c = Rgba::from_hex("#0f0", 1.0);
        assert_eq!((c.r, c.g, c.b), (0, 255, 0));
    }

    #[test]
    fn invalid_hex_falls_back_to_black() {
        let c = Rgba::from_hex("blau", 0.3);
        assert_eq!((c.r, c.g, c.b, c.a), (0, 0, 0, 0.3));
        assert_eq!(Rgba::from_hex("#12345", 1.0).r, 0);
    }

    #[test]
    fn css_rgb_and_rgba() {
        assert_eq!(
            Rgba::parse_css("rgb(10, 20, 30)"),
            Some(Rgba::new(10, 20, 30, 1.0))
        );
        assert_eq!(
            Rgba::parse_css("rgba(255,165,0,0.8)"),
            Some(Rgba::new(255, 165, 0, 0.8))
        );
        assert_eq!(Rgba::parse_css("none"), None);
    }
}
