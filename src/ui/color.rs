//! Display colors derived from a calendar's background color.
//!
//! Text on a calendar entry is either black or near-white, picked with the
//! W3C color-brightness heuristic (<http://www.w3.org/TR/AERT#color-contrast>).

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NEAR_BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
pub const NEAR_WHITE: Color = Color::rgb(0xFA, 0xFA, 0xFA);

const RED_WEIGHT: u32 = 299;
const GREEN_WEIGHT: u32 = 587;
const BLUE_WEIGHT: u32 = 114;
const BRIGHTNESS_THRESHOLD: f64 = 130.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("Invalid hex color: {0:?}")]
    InvalidHex(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Which hex pair feeds the blue term of the brightness score.
///
/// `MirrorGreen` reuses the green pair for blue, matching the calendars
/// rendered by the legacy web front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlueChannel {
    #[default]
    Independent,
    MirrorGreen,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `RRGGBB` or `#RRGGBB`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        static HEX_RE: OnceLock<Regex> = OnceLock::new();
        let pattern = HEX_RE.get_or_init(|| {
            Regex::new(r"^#?([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})$")
                .expect("invalid hex color regex")
        });

        let invalid = || ColorError::InvalidHex(hex.to_string());
        let caps = pattern.captures(hex.trim()).ok_or_else(invalid)?;
        let channel = |idx: usize| {
            caps.get(idx)
                .and_then(|m| u8::from_str_radix(m.as_str(), 16).ok())
                .ok_or_else(invalid)
        };

        Ok(Self::rgb(channel(1)?, channel(2)?, channel(3)?))
    }

    pub fn brightness(&self, blue: BlueChannel) -> f64 {
        let blue_value = match blue {
            BlueChannel::Independent => self.b,
            BlueChannel::MirrorGreen => self.g,
        };
        let weighted = self.r as u32 * RED_WEIGHT
            + self.g as u32 * GREEN_WEIGHT
            + blue_value as u32 * BLUE_WEIGHT;
        weighted as f64 / 1000.0
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

pub fn text_color(background: Color) -> Color {
    text_color_with(background, BlueChannel::default())
}

pub fn text_color_with(background: Color, blue: BlueChannel) -> Color {
    if background.brightness(blue) > BRIGHTNESS_THRESHOLD {
        NEAR_BLACK
    } else {
        NEAR_WHITE
    }
}

pub fn border_color(background: Color) -> Color {
    text_color(background)
}

pub fn border_color_with(background: Color, blue: BlueChannel) -> Color {
    text_color_with(background, blue)
}

pub fn text_color_for(background: &str) -> Result<Color, ColorError> {
    Color::from_hex(background).map(text_color)
}

pub fn border_color_for(background: &str) -> Result<Color, ColorError> {
    Color::from_hex(background).map(border_color)
}
