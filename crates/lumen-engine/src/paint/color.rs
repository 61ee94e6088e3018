use std::fmt;

/// Error returned by [`Color::from_hex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color '{}': expected #rrggbb or #rrggbbaa", self.0)
    }
}

impl std::error::Error for ColorParseError {}

/// Straight-alpha sRGB color with 8-bit channels.
///
/// This is the color handed to the renderer contract as a tint/fill; blending
/// is the backend's concern.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parses `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(text: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(text.to_string());
        let hex = text.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Linear interpolation per channel, `t` clamped to [0, 1].
    #[inline]
    #[must_use]
    pub fn lerp(self, to: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color::new(mix(self.r, to.r), mix(self.g, to.g), mix(self.b, to.b), mix(self.a, to.a))
    }

    /// Scales alpha by `factor` (clamped to [0, 1]).
    #[inline]
    #[must_use]
    pub fn fade(self, factor: f32) -> Color {
        let a = (self.a as f32 * factor.clamp(0.0, 1.0)).round() as u8;
        Color { a, ..self }
    }

    /// Squared RGB distance, used when searching a texture for a color.
    #[inline]
    pub fn distance_sq(self, other: Color) -> u32 {
        let d = |a: u8, b: u8| {
            let v = a as i32 - b as i32;
            (v * v) as u32
        };
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_rgb() {
        assert_eq!(Color::from_hex("#ff8000").unwrap(), Color::new(255, 128, 0, 255));
    }

    #[test]
    fn from_hex_rgba_without_hash() {
        assert_eq!(Color::from_hex("10203040").unwrap(), Color::new(16, 32, 48, 64));
    }

    #[test]
    fn from_hex_rejects_bad_length() {
        assert!(Color::from_hex("#fff").is_err());
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        assert!(Color::from_hex("#gg0000").is_err());
    }

    #[test]
    fn lerp_midpoint() {
        let c = Color::BLACK.lerp(Color::WHITE, 0.5);
        assert_eq!(c, Color::new(128, 128, 128, 255));
    }

    #[test]
    fn lerp_clamps_t() {
        assert_eq!(Color::BLACK.lerp(Color::WHITE, 3.0), Color::WHITE);
    }

    #[test]
    fn fade_scales_alpha_only() {
        let c = Color::new(10, 20, 30, 200).fade(0.5);
        assert_eq!(c, Color::new(10, 20, 30, 100));
    }
}
