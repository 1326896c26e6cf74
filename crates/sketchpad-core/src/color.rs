//! Color representation shared by tools, config and the raster.

use peniko::Color;
use peniko::color::{Srgb, parse_color};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Color parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("Color must start with '#': {0}")]
    MissingHash(String),
    #[error("Unsupported color length in {0} (expected #rgb, #rrggbb or #rrggbbaa)")]
    BadLength(String),
    #[error("Invalid hex digits in {0}")]
    BadDigits(String),
    #[error("Unrecognized CSS color {input:?}: {source}")]
    Css {
        input: String,
        source: peniko::color::ParseError,
    },
}

/// Straight-alpha RGBA8 color.
///
/// Serialized as a hex string (`"#ff0000"`). Deserialization also accepts
/// CSS color syntax such as `"purple"` or `"rgb(0 128 0)"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Default swatches offered to hosts.
pub const DEFAULT_PALETTE: [Rgba; 6] = [
    Rgba::rgb(0x00, 0x00, 0x00),
    Rgba::rgb(0xFF, 0x00, 0x00),
    Rgba::rgb(0x00, 0x00, 0xFF),
    Rgba::rgb(0x00, 0x80, 0x00),
    Rgba::rgb(0xFF, 0xA5, 0x00),
    Rgba::rgb(0x80, 0x00, 0x80),
];

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Result<Self, ColorError> {
        let digits = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(s.to_string()))?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::BadDigits(s.to_string()));
        }

        let bad = || ColorError::BadDigits(s.to_string());
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| bad());
        match digits.len() {
            3 => {
                let nibble =
                    |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).map(|v| v * 17).map_err(|_| bad());
                Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(ColorError::BadLength(s.to_string())),
        }
    }

    /// Parse hex notation or any CSS color (`"orange"`, `"rgb(255 0 0 / 50%)"`).
    pub fn parse(s: &str) -> Result<Self, ColorError> {
        if s.trim_start().starts_with('#') {
            return Self::from_hex(s);
        }
        let color: Color = parse_color(s)
            .map_err(|source| ColorError::Css {
                input: s.to_string(),
                source,
            })?
            .to_alpha_color::<Srgb>();
        Ok(color.into())
    }

    /// Lowercase hex; the alpha pair is only written when not opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_array(rgba: [u8; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::black()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgba {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_hex()
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_hex() {
        assert_eq!(Rgba::from_hex("#FF0000").unwrap(), Rgba::rgb(255, 0, 0));
        assert_eq!(Rgba::from_hex("#0f0").unwrap(), Rgba::rgb(0, 255, 0));
        assert_eq!(
            Rgba::from_hex("#00000080").unwrap(),
            Rgba::new(0, 0, 0, 128)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Rgba::from_hex("ff0000"), Err(ColorError::MissingHash(_))));
        assert!(matches!(Rgba::from_hex("#ff00"), Err(ColorError::BadLength(_))));
        assert!(matches!(Rgba::from_hex("#gg0000"), Err(ColorError::BadDigits(_))));
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(Rgba::rgb(255, 165, 0).to_hex(), "#ffa500");
        assert_eq!(Rgba::new(1, 2, 3, 4).to_hex(), "#01020304");
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Rgba::rgb(0, 0, 255)).unwrap();
        assert_eq!(json, "\"#0000ff\"");
        let back: Rgba = serde_json::from_str("\"#800080\"").unwrap();
        assert_eq!(back, DEFAULT_PALETTE[5]);
        assert!(serde_json::from_str::<Rgba>("\"#ff00\"").is_err());
    }

    #[test]
    fn test_parse_css_colors() {
        assert_eq!("purple".parse::<Rgba>().unwrap(), DEFAULT_PALETTE[5]);
        assert_eq!(Rgba::parse(" orange ").unwrap(), DEFAULT_PALETTE[4]);
        assert_eq!(Rgba::parse("rgb(0 128 0)").unwrap(), DEFAULT_PALETTE[3]);
        assert_eq!(Rgba::parse("#00f").unwrap(), DEFAULT_PALETTE[2]);
        assert!(matches!(Rgba::parse("chartreuse-ish"), Err(ColorError::Css { .. })));
        let back: Rgba = serde_json::from_str("\"red\"").unwrap();
        assert_eq!(back.to_hex(), "#ff0000");
    }

    #[test]
    fn test_peniko_conversion() {
        let color = Rgba::new(10, 20, 30, 40);
        let peniko: Color = color.into();
        assert_eq!(Rgba::from(peniko), color);
    }
}
