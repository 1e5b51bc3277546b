//! # PDF Object Syntax
//!
//! Low-level builders for the bits of PDF syntax lnpdf writes: numbers,
//! strings and dates.
//!
//! ## String Encoding
//!
//! Page text uses the standard Type1 fonts with `/WinAnsiEncoding`, so text
//! is one byte per character:
//!
//! | Input | Output |
//! |-------|--------|
//! | U+0020..U+007E, U+00A0..U+00FF | same byte |
//! | typographic quotes, dashes, `…`, `•`, `€` | their WinAnsi byte (0x80..0x9F) |
//! | tab | space |
//! | other control characters | dropped |
//! | anything else | `?` |

use chrono::{DateTime, FixedOffset};

// ============================================================================
// FILE STRUCTURE
// ============================================================================

/// File header. The second line marks the file as binary.
pub const HEADER: &[u8] = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n";

/// End-of-file marker.
pub const EOF: &[u8] = b"%%EOF\n";

// ============================================================================
// NUMBERS
// ============================================================================

/// Format a real number compactly (at most four decimals, no trailing zeros).
///
/// ## Example
///
/// ```
/// use lnpdf::pdf::objects::real;
///
/// assert_eq!(real(10.0), "10");
/// assert_eq!(real(0.25), "0.25");
/// assert_eq!(real(-1.5), "-1.5");
/// ```
pub fn real(value: f32) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let text = format!("{:.4}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" || text.is_empty() {
        "0".to_string()
    } else {
        text.to_string()
    }
}

// ============================================================================
// STRINGS
// ============================================================================

/// Encode text for a WinAnsi-encoded standard font.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .filter_map(|c| match c {
            '\t' => Some(b' '),
            c if (c as u32) < 0x20 || c == '\u{7F}' => None,
            c if (c as u32) < 0x80 => Some(c as u8),
            c if (0xA0..=0xFF).contains(&(c as u32)) => Some(c as u32 as u8),
            '€' => Some(0x80),
            '‚' => Some(0x82),
            '„' => Some(0x84),
            '…' => Some(0x85),
            '‘' => Some(0x91),
            '’' => Some(0x92),
            '“' => Some(0x93),
            '”' => Some(0x94),
            '•' => Some(0x95),
            '–' => Some(0x96),
            '—' => Some(0x97),
            '™' => Some(0x99),
            _ => Some(b'?'),
        })
        .collect()
}

/// Wrap bytes in a literal string `( ... )`, escaping as needed.
pub fn literal(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 2);
    out.push(b'(');
    for &b in bytes {
        match b {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(b);
            }
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\n' => out.extend_from_slice(b"\\n"),
            _ => out.push(b),
        }
    }
    out.push(b')');
    out
}

/// A text string for document metadata.
///
/// ASCII goes out as a literal; anything else as UTF-16BE hex with a BOM.
pub fn text_string(text: &str) -> Vec<u8> {
    if text.is_ascii() {
        return literal(text.as_bytes());
    }
    let mut out = String::from("<FEFF");
    for unit in text.encode_utf16() {
        out.push_str(&format!("{:04X}", unit));
    }
    out.push('>');
    out.into_bytes()
}

// ============================================================================
// DATES
// ============================================================================

/// Format a date as `D:YYYYMMDDHHmmSS+HH'mm'`.
pub fn date(time: &DateTime<FixedOffset>) -> String {
    let offset = time.offset().local_minus_utc();
    let sign = if offset < 0 { '-' } else { '+' };
    let offset = offset.abs();
    format!(
        "D:{}{}{:02}'{:02}'",
        time.format("%Y%m%d%H%M%S"),
        sign,
        offset / 3600,
        (offset % 3600) / 60
    )
}
