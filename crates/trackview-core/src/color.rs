//! Track colors
//!
//! A track either has no color or one of the palette's colors. Stepping
//! through the palette treats "no color" as the slot before the first
//! color, so repeated steps cycle through every color and back to none.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 24-bit RGB color (`0xRRGGBB`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RgbColor(pub u32);

impl RgbColor {
    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0 & 0xFF_FFFF)
    }
}

/// Default track colors
pub const DEFAULT_TRACK_COLORS: [RgbColor; 8] = [
    RgbColor(0xC5_0A08),
    RgbColor(0x32_BE44),
    RgbColor(0x42_D4F4),
    RgbColor(0xF8_D200),
    RgbColor(0x00_44FF),
    RgbColor(0xAF_00CC),
    RgbColor(0xFC_A6D7),
    RgbColor(0xF2_F2FF),
];

/// Ordered set of colors a track can be assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackColorPalette {
    colors: Vec<RgbColor>,
}

impl Default for TrackColorPalette {
    fn default() -> Self {
        Self::new(DEFAULT_TRACK_COLORS.to_vec())
    }
}

impl TrackColorPalette {
    pub fn new(colors: Vec<RgbColor>) -> Self {
        Self { colors }
    }

    pub fn colors(&self) -> &[RgbColor] {
        &self.colors
    }

    /// Color after `color`; none after the last one.
    ///
    /// A color that is not in the palette steps to the first color.
    pub fn next_color(&self, color: Option<RgbColor>) -> Option<RgbColor> {
        match color.and_then(|c| self.position(c)) {
            Some(index) => self.colors.get(index + 1).copied(),
            None => self.colors.first().copied(),
        }
    }

    /// Color before `color`; none before the first one.
    ///
    /// A color that is not in the palette steps to the last color.
    pub fn previous_color(&self, color: Option<RgbColor>) -> Option<RgbColor> {
        match color.and_then(|c| self.position(c)) {
            Some(0) => None,
            Some(index) => self.colors.get(index - 1).copied(),
            None => self.colors.last().copied(),
        }
    }

    fn position(&self, color: RgbColor) -> Option<usize> {
        self.colors.iter().position(|&c| c == color)
    }
}
