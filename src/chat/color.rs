//! RGB colors and the legacy 16-color table.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// An RGB color, displayed as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Self = Self(0x00, 0x00, 0x00);
    pub const DARK_BLUE: Self = Self(0x00, 0x00, 0xAA);
    pub const DARK_GREEN: Self = Self(0x00, 0xAA, 0x00);
    pub const DARK_AQUA: Self = Self(0x00, 0xAA, 0xAA);
    pub const DARK_RED: Self = Self(0xAA, 0x00, 0x00);
    pub const DARK_PURPLE: Self = Self(0xAA, 0x00, 0xAA);
    pub const GOLD: Self = Self(0xFF, 0xAA, 0x00);
    pub const GRAY: Self = Self(0xAA, 0xAA, 0xAA);
    pub const DARK_GRAY: Self = Self(0x55, 0x55, 0x55);
    pub const BLUE: Self = Self(0x55, 0x55, 0xFF);
    pub const GREEN: Self = Self(0x55, 0xFF, 0x55);
    pub const AQUA: Self = Self(0x55, 0xFF, 0xFF);
    pub const RED: Self = Self(0xFF, 0x55, 0x55);
    pub const LIGHT_PURPLE: Self = Self(0xFF, 0x55, 0xFF);
    pub const YELLOW: Self = Self(0xFF, 0xFF, 0x55);
    pub const WHITE: Self = Self(0xFF, 0xFF, 0xFF);

    /// Parse exactly six hex digits (no leading `#`).
    pub fn from_hex_digits(digits: &[u8]) -> Option<Self> {
        match digits {
            [r0, r1, g0, g1, b0, b1] => Some(Self(
                hex_value(*r0)? << 4 | hex_value(*r1)?,
                hex_value(*g0)? << 4 | hex_value(*g1)?,
                hex_value(*b0)? << 4 | hex_value(*b1)?,
            )),
            _ => None,
        }
    }
}

/// Color used for text before any color marker.
pub const DEFAULT_COLOR: Rgb = Rgb::WHITE;

/// Legacy color codes `&0`..`&f`, indexed by digit value.
pub const LEGACY_COLORS: [Rgb; 16] = [
    Rgb::BLACK,
    Rgb::DARK_BLUE,
    Rgb::DARK_GREEN,
    Rgb::DARK_AQUA,
    Rgb::DARK_RED,
    Rgb::DARK_PURPLE,
    Rgb::GOLD,
    Rgb::GRAY,
    Rgb::DARK_GRAY,
    Rgb::BLUE,
    Rgb::GREEN,
    Rgb::AQUA,
    Rgb::RED,
    Rgb::LIGHT_PURPLE,
    Rgb::YELLOW,
    Rgb::WHITE,
];

/// Value of a single ASCII hex digit, case-insensitive.
#[inline]
pub const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Look up the legacy color for a code digit such as `c` or `7`.
pub fn legacy_color(digit: char) -> Option<Rgb> {
    if !digit.is_ascii() {
        return None;
    }
    hex_value(digit as u8).map(|i| LEGACY_COLORS[i as usize])
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Error returned when parsing a `#RRGGBB` string fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color {0:?}: expected #RRGGBB")]
pub struct ColorParseError(pub String);

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        Self::from_hex_digits(digits.as_bytes()).ok_or_else(|| ColorParseError(s.to_string()))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
