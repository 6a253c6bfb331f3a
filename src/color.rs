//! Segment colours.

use serde::{Deserialize, Serialize};

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Colours assigned to each kind of motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    pub rapid: Rgba,
    pub feed: Rgba,
    pub arc: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            rapid: Rgba::new(230, 41, 55, 255),
            feed: Rgba::new(0, 121, 241, 255),
            arc: Rgba::new(0, 158, 47, 255),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_palette_keeps_defaults() {
        let palette: Palette = toml::from_str("rapid = { r = 1, g = 2, b = 3 }").unwrap();

        assert_eq!(palette.rapid, Rgba::new(1, 2, 3, 255));
        assert_eq!(palette.feed, Palette::default().feed);
    }
}
