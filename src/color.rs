//! # Color Codec
//!
//! LectureNotes stores colors as signed 32-bit ARGB integers (Android's
//! `Color` packing). This module turns them into normalized RGB.
//!
//! ```text
//! bits:  31..24  23..16  15..8   7..0
//!          A       R       G      B
//! ```
//!
//! Alpha is discarded.

/// Normalized RGB color, each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Decode a packed ARGB integer into normalized RGB.
///
/// ## Example
///
/// ```
/// use lnpdf::color::{decode, Rgb};
///
/// assert_eq!(decode(-1), Rgb::WHITE);
/// assert_eq!(decode(0), Rgb::BLACK);
/// ```
pub fn decode(packed: i32) -> Rgb {
    // Same bits as (value + 2^32) mod 2^32
    let argb = packed as u32;

    let r = (argb >> 16) & 0xFF;
    let g = (argb >> 8) & 0xFF;
    let b = argb & 0xFF;

    Rgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

/// Parse a packed color as written in notebook files.
///
/// Android writes signed values (`-16777216` for opaque black), but unsigned
/// spellings wrap to the same bits.
pub fn parse_packed(text: &str) -> Option<i32> {
    let value: i64 = text.trim().parse().ok()?;
    Some(value as u32 as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_all_bits() {
        assert_eq!(decode(-1), Rgb::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_decode_zero() {
        assert_eq!(decode(0), Rgb::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_decode_ignores_alpha() {
        // Opaque black and transparent black decode the same
        assert_eq!(decode(0xFF00_0000_u32 as i32), Rgb::BLACK);
        assert_eq!(decode(0x0000_0000), Rgb::BLACK);
    }

    #[test]
    fn test_decode_channels() {
        // Opaque pure red, as Android writes it
        let red = decode(-65536);
        assert_eq!(red, Rgb::new(1.0, 0.0, 0.0));

        let c = decode(0x0033_6699);
        assert!((c.r - 0x33 as f32 / 255.0).abs() < 1e-6);
        assert!((c.g - 0x66 as f32 / 255.0).abs() < 1e-6);
        assert!((c.b - 0x99 as f32 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_packed() {
        assert_eq!(parse_packed("-16777216"), Some(-16777216));
        assert_eq!(parse_packed("4278190080"), Some(-16777216));
        assert_eq!(parse_packed(" 255 "), Some(255));
        assert_eq!(parse_packed("red"), None);
    }
}
