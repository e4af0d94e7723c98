//! Per-object rendering metadata.
//!
//! The engine never reads these values; they are precomputed by the compiler
//! and handed to renderers untouched.

/// Opaque RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb`.
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#')?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let mut it = digits.chars().map(|c| c.to_digit(16));
                let r = it.next()?? as u8;
                let g = it.next()?? as u8;
                let b = it.next()?? as u8;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => Some(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => None,
        }
    }

    /// Looks up a named palette color (case-insensitive).
    pub fn named(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        NAMED_PALETTE
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, color)| *color)
    }
}

const NAMED_PALETTE: [(&str, Color); 19] = [
    ("black", Color::rgb(0x00, 0x00, 0x00)),
    ("white", Color::rgb(0xff, 0xff, 0xff)),
    ("grey", Color::rgb(0x9d, 0x9d, 0x9d)),
    ("darkgrey", Color::rgb(0x69, 0x71, 0x75)),
    ("lightgrey", Color::rgb(0xcc, 0xcc, 0xcc)),
    ("gray", Color::rgb(0x9d, 0x9d, 0x9d)),
    ("darkgray", Color::rgb(0x69, 0x71, 0x75)),
    ("lightgray", Color::rgb(0xcc, 0xcc, 0xcc)),
    ("red", Color::rgb(0xbe, 0x26, 0x33)),
    ("darkred", Color::rgb(0x73, 0x29, 0x30)),
    ("lightred", Color::rgb(0xe0, 0x6f, 0x8b)),
    ("brown", Color::rgb(0xa4, 0x64, 0x22)),
    ("darkbrown", Color::rgb(0x49, 0x3c, 0x2b)),
    ("orange", Color::rgb(0xeb, 0x89, 0x31)),
    ("yellow", Color::rgb(0xf7, 0xe2, 0x6b)),
    ("green", Color::rgb(0x44, 0x89, 0x1a)),
    ("darkgreen", Color::rgb(0x2f, 0x48, 0x4e)),
    ("blue", Color::rgb(0x1d, 0x57, 0xf7)),
    ("purple", Color::rgb(0x88, 0x2e, 0x72)),
];

/// Resolved palette plus an optional sprite of palette indices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectGraphics {
    /// `None` entries are colors that failed to resolve; they render transparent.
    pub palette: Vec<Option<Color>>,
    pub width: usize,
    pub height: usize,
    /// Row-major palette indices; `None` is transparent.
    pub pixels: Vec<Option<usize>>,
}

impl ObjectGraphics {
    /// Color at `(x, y)`, or the first palette color for sprite-less objects.
    pub fn color_at(&self, x: usize, y: usize) -> Option<Color> {
        if self.pixels.is_empty() {
            return self.palette.first().copied().flatten();
        }
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = self.pixels[y * self.width + x]?;
        self.palette.get(index).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_both_forms() {
        assert_eq!(Color::from_hex("#fff"), Some(Color::rgb(255, 255, 255)));
        assert_eq!(Color::from_hex("#102030"), Some(Color::rgb(0x10, 0x20, 0x30)));
        assert_eq!(Color::from_hex("#12"), None);
        assert_eq!(Color::from_hex("red"), None);
    }

    #[test]
    fn sprite_less_objects_use_first_color() {
        let graphics = ObjectGraphics {
            palette: vec![Color::named("Blue"), Color::named("red")],
            ..Default::default()
        };
        assert_eq!(graphics.color_at(3, 3), Color::named("blue"));
    }
}
