//! RGBA colours for particles and overlays.

use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from RGB values (0-1) with full alpha.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Creates a color from hex value (0xRRGGBBAA).
    #[must_use]
    pub const fn hex(hex: u32) -> Self {
        let r = ((hex >> 24) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let b = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let a = (hex & 0xFF) as f32 / 255.0;
        Self::rgba(r, g, b, a)
    }

    /// Returns a new color with different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Converts to array format.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Converts to 8-bit channels, rounding to nearest.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl FromStr for Color {
    type Err = EngineError;

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidColor(s.to_owned());
        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        match digits.len() {
            3 => {
                let expand = |n: u32| (n & 0xF) * 0x11;
                let (r, g, b) = (expand(value >> 8), expand(value >> 4), expand(value));
                Ok(Self::hex((r << 24) | (g << 16) | (b << 8) | 0xFF))
            }
            6 => Ok(Self::hex((value << 8) | 0xFF)),
            8 => Ok(Self::hex(value)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba8();
        if a == 0xFF {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_css_hex() {
        let c: Color = "#ff1744".parse().unwrap();
        assert_eq!(c.to_rgba8(), [0xff, 0x17, 0x44, 0xff]);
        assert_eq!(c, Color::hex(0xff17_44ff));

        let short: Color = "#f0a".parse().unwrap();
        assert_eq!(short.to_rgba8(), [0xff, 0x00, 0xaa, 0xff]);

        let with_alpha: Color = "#0000000d".parse().unwrap();
        assert_eq!(with_alpha.to_rgba8()[3], 0x0d);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("ff1744".parse::<Color>().is_err());
        assert!("#ff17".parse::<Color>().is_err());
        assert!("#gg1744".parse::<Color>().is_err());
        assert!("#+f1744".parse::<Color>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        assert_eq!(Color::hex(0xffc1_e3ff).to_string(), "#ffc1e3");
        assert_eq!(Color::BLACK.with_alpha(0.0).to_string(), "#00000000");
    }
}
