//! Project colours.
//!
//! Project colours are stored as validated `#RRGGBB` values. Anything that
//! does not parse falls back to [`DEFAULT_PROJECT_COLOR`] instead of failing
//! the whole render.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Colour used when a project colour is missing or malformed (`#3B82F6`).
pub const DEFAULT_PROJECT_COLOR: Rgb = Rgb {
    r: 0x3B,
    g: 0x82,
    b: 0xF6,
};

/// A validated 24-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` string (hex digits are case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidColor` unless the input is exactly seven
    /// characters: a leading `#` followed by six hex digits.
    pub fn parse(value: &str) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidColor {
            value: value.to_string(),
        };

        let hex = value.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Parse a colour, substituting [`DEFAULT_PROJECT_COLOR`] when malformed.
    pub fn parse_or_default(value: &str) -> Self {
        match Self::parse(value) {
            Ok(color) => color,
            Err(_) => {
                warn!("Invalid project color: {:?}, using default", value);
                DEFAULT_PROJECT_COLOR
            }
        }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        DEFAULT_PROJECT_COLOR
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    /// Lenient: a stored colour that no longer parses becomes the default.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(Rgb::parse_or_default)
            .unwrap_or(DEFAULT_PROJECT_COLOR))
    }
}
