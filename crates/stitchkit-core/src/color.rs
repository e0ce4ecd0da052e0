//! RGB color handling for pattern layers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ColorParseError;

/// An RGB color with 8-bit channels.
///
/// Layers default to black, matching a freshly created layer in the editor.
/// The serde representation is `{"r": .., "g": .., "b": ..}`, which is also
/// the shape used by the color-suggestion payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Creates a color from 8-bit channels.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Formats as `#rrggbb`, the value format of color-picker widgets.
    pub fn to_hex_string(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parses a `#rrggbb` string as produced by color-picker widgets.
    pub fn from_hex_str(s: &str) -> Result<Self, ColorParseError> {
        let digits = s.strip_prefix('#').ok_or_else(|| ColorParseError::MissingHash {
            input: s.to_string(),
        })?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorParseError::BadLength {
                input: s.to_string(),
            });
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorParseError::InvalidDigit {
                input: s.to_string(),
            })
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_string())
    }
}
