//! Base color of the product

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::PreviewError;

/// An opaque sRGB color, written as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Neutral color used until the user picks one
    pub const NEUTRAL: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pixel value for raster surfaces
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 0xff])
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = PreviewError;

    /// Parses `#rrggbb` or the `#rgb` shorthand
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PreviewError::InvalidColor(s.to_string());

        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Color::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                // #abc == #aabbcc
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 0x11);
                Ok(Color::rgb(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = PreviewError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_form() {
        let color: Color = "#112233".parse().unwrap();
        assert_eq!(color, Color::rgb(0x11, 0x22, 0x33));

        let upper: Color = "#A0b1C2".parse().unwrap();
        assert_eq!(upper, Color::rgb(0xa0, 0xb1, 0xc2));
    }

    #[test]
    fn test_parse_short_form() {
        let color: Color = "#f80".parse().unwrap();
        assert_eq!(color, Color::rgb(0xff, 0x88, 0x00));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["112233", "#12345", "#gg0000", "", "#", "#1122334", "#+1+2+3"] {
            assert!(
                matches!(input.parse::<Color>(), Err(PreviewError::InvalidColor(_))),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_display_is_lowercase_long_form() {
        assert_eq!(Color::rgb(0xab, 0x01, 0xff).to_string(), "#ab01ff");
        assert_eq!(Color::default().to_string(), "#ffffff");
    }
}
