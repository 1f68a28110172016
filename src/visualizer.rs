//! Keyboard visualization colors
//!
//! Keys 0-120 sweep through red, yellow, green, cyan, blue and purple in
//! bands of 20 keys.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Serialize, Serializer};

use crate::midi::{index_keybinding, Note};

/// Highest key index with a defined color
pub const MAX_KEY_INDEX: u32 = 120;

/// Width of one hue band
const BAND: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("key index {0} is outside 0..=120")]
pub struct KeyRangeError(pub u32);

/// An RGB color, displayed as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl KeyColor {
    /// Build from unit channel values. Channels are scaled to 0-255 and
    /// truncated.
    fn from_unit(r: f64, g: f64, b: f64) -> Self {
        // `as` saturates, so values are truncated into 0..=255
        Self {
            r: (r * 255.0) as u8,
            g: (g * 255.0) as u8,
            b: (b * 255.0) as u8,
        }
    }

    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for KeyColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for KeyColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Color of a key on the visual keyboard
pub fn key_color(key_index: u32) -> Result<KeyColor, KeyRangeError> {
    if key_index > MAX_KEY_INDEX {
        return Err(KeyRangeError(key_index));
    }
    Ok(band_color(key_index))
}

/// Like [`key_color`], clamping indices above 120 to the top key
pub fn key_color_clamped(key_index: u32) -> KeyColor {
    band_color(key_index.min(MAX_KEY_INDEX))
}

fn band_color(key_index: u32) -> KeyColor {
    let i = key_index as f64;
    let div = (key_index % BAND) as f64;

    match key_index {
        // RED, starting at 25% instead of black
        0..=19 => KeyColor::from_unit((div / 20.0).max(0.25), 0.0, 0.0),
        // YELLOW
        20..=39 => KeyColor::from_unit(1.0, div / 40.0, 0.0),
        // GREEN
        40..=59 => KeyColor {
            r: (255.0 - (div / 20.0) * 255.0) as u8,
            g: 255,
            b: 0,
        },
        // CYAN
        60..=79 => KeyColor {
            r: 0,
            g: (255.0 - (div / 20.0) * 255.0) as u8,
            b: ((div / 20.0) * 255.0) as u8,
        },
        // BLUE
        80..=99 => KeyColor::from_unit(0.0, 0.0, i / 100.0),
        // PURPLE, fading over 40 keys so the top key stays purple
        _ => KeyColor {
            r: ((div / 40.0) * 255.0) as u8,
            g: 0,
            b: (255.0 - (div / 40.0) * 255.0) as u8,
        },
    }
}

/// Everything the rendering layer needs to draw one key
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInfo {
    pub index: u32,
    pub note: String,
    pub is_sharp: bool,
    pub color: KeyColor,
    pub binding: Option<char>,
}

/// Describe the keys in `range`. Indices above 120 are skipped.
pub fn keyboard_layout(range: RangeInclusive<u32>) -> Vec<KeyInfo> {
    let (start, end) = range.into_inner();
    let end = end.min(MAX_KEY_INDEX);
    if start > end {
        return Vec::new();
    }

    (start..=end)
        .map(|index| {
            let note = Note::from_index(index);
            KeyInfo {
                index,
                note: note.to_string(),
                is_sharp: note.pitch().is_sharp(),
                color: key_color_clamped(index),
                binding: index_keybinding(index),
            }
        })
        .collect()
}
