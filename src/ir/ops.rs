//! # IR Opcodes
//!
//! This module defines the intermediate representation for styled text.
//! LectureNotes stores formatting as flat `(command, argument, from, to)`
//! records. The compiler turns those into an ordered queue of [`StyleEvent`]s,
//! each pinning one [`Op`] to a character offset in the text.
//!
//! ## Design Philosophy
//!
//! ```text
//! StyleRecord (raw tokens) → StyleInterval → EventQueue → StyleMachine → backend
//! ```
//!
//! Records stay as raw tokens until compile time so a single bad line only
//! takes down its own text element. Each opcode is a single, atomic state
//! change; text spans are sliced from the content at replay time.

use std::fmt;

use crate::color::{self, Rgb};
use crate::error::{LnPdfError, Result};

/// Bold bit of the style bitmask.
pub const BOLD: u32 = 0b01;

/// Italic bit of the style bitmask.
pub const ITALIC: u32 = 0b10;

/// Font family used for text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Typeface {
    #[default]
    Sans,
    Serif,
    Mono,
}

impl Typeface {
    /// Resolve a typeface name from a style record.
    ///
    /// Unknown names fall back to [`Typeface::Sans`].
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "serif" => Typeface::Serif,
            "mono" | "monospace" | "monospaced" => Typeface::Mono,
            "sans" | "sans-serif" | "sansserif" => Typeface::Sans,
            other => {
                log::debug!("unknown typeface {:?}, using sans-serif", other);
                Typeface::Sans
            }
        }
    }

    /// Map the notebook's `textlayerfontfamily` code.
    pub fn from_family_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Typeface::Sans),
            2 => Some(Typeface::Serif),
            3 => Some(Typeface::Mono),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Typeface::Sans => "sans-serif",
            Typeface::Serif => "serif",
            Typeface::Mono => "monospace",
        }
    }
}

// ============================================================================
// SOURCE RECORDS
// ============================================================================

/// One line of a `.style` file, split into whitespace-separated tokens.
///
/// The fields are `command argument from to extra`. The last field has no
/// known meaning and is carried along untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRecord {
    /// 1-based line number in the source file (0 when built in code)
    pub line: usize,
    pub fields: Vec<String>,
}

impl StyleRecord {
    /// Build a record from its parts.
    pub fn new(command: &str, argument: &str, from: i64, to: i64) -> Self {
        Self {
            line: 0,
            fields: vec![
                command.to_string(),
                argument.to_string(),
                from.to_string(),
                to.to_string(),
                "0".to_string(),
            ],
        }
    }

    /// Tokenize one line. Blank lines yield `None`.
    pub fn from_line(line: usize, text: &str) -> Option<Self> {
        let fields: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        if fields.is_empty() {
            return None;
        }
        Some(Self { line, fields })
    }

    /// Command token, if present.
    pub fn command(&self) -> Option<&str> {
        self.fields.first().map(String::as_str)
    }

    fn malformed(&self, what: &str) -> LnPdfError {
        LnPdfError::MalformedInterval(format!(
            "line {}: {} in {:?}",
            self.line,
            what,
            self.fields.join(" ")
        ))
    }
}

/// Closed set of style commands.
///
/// [`CommandKind::UnderlineOff`] never appears in source data. It is the
/// inverse the compiler synthesizes for [`CommandKind::UnderlineOn`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandKind {
    TypefaceSet(Typeface),
    StyleBitmaskSet(u32),
    StyleBitmaskXor(u32),
    UnderlineOn,
    UnderlineOff,
    UnderlineXor(bool),
    /// Packed ARGB color
    ForegroundColor(i32),
    RelativeSize(f32),
    Subscript,
    Superscript,
}

/// A command applied over `[start, end)`.
///
/// `end == None` marks a synthesized inverse that needs no further undo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleInterval {
    pub command: CommandKind,
    pub start: usize,
    pub end: Option<usize>,
}

impl StyleInterval {
    pub fn new(command: CommandKind, start: usize, end: usize) -> Self {
        Self {
            command,
            start,
            end: Some(end),
        }
    }

    /// A synthesized inverse event at `index`.
    pub fn inverse(command: CommandKind, index: usize) -> Self {
        Self {
            command,
            start: index,
            end: None,
        }
    }

    /// Parse a raw record.
    ///
    /// ## Errors
    ///
    /// - [`LnPdfError::UnrecognizedCommand`] for a command token outside the vocabulary
    /// - [`LnPdfError::MalformedInterval`] for a wrong field count, non-integer
    ///   offsets, a negative start, or an unparsable argument
    pub fn parse(record: &StyleRecord) -> Result<Self> {
        let [command, argument, from, to, _extra] = record.fields.as_slice() else {
            return Err(record.malformed(&format!(
                "expected 5 fields, found {}",
                record.fields.len()
            )));
        };

        let start: i64 = from
            .parse()
            .map_err(|_| record.malformed("non-numeric start offset"))?;
        let end: i64 = to
            .parse()
            .map_err(|_| record.malformed("non-numeric end offset"))?;
        if start < 0 {
            return Err(record.malformed("negative start offset"));
        }

        let command = match command.as_str() {
            "typeface" => CommandKind::TypefaceSet(Typeface::from_name(argument)),
            "styleset" => CommandKind::StyleBitmaskSet(style_bits(record, argument)?),
            "stylexor" => CommandKind::StyleBitmaskXor(style_bits(record, argument)?),
            "underline" => CommandKind::UnderlineOn,
            "underlinexor" => {
                let bit: i64 = argument
                    .parse()
                    .map_err(|_| record.malformed("bad underline bit"))?;
                CommandKind::UnderlineXor(bit != 0)
            }
            "foregroundcolor" => CommandKind::ForegroundColor(
                color::parse_packed(argument).ok_or_else(|| record.malformed("bad color"))?,
            ),
            "relativesize" => {
                let factor: f32 = argument
                    .parse()
                    .map_err(|_| record.malformed("bad size factor"))?;
                if !factor.is_finite() || !(1.0 / factor).is_finite() {
                    return Err(record.malformed("size factor must be finite and invertible"));
                }
                CommandKind::RelativeSize(factor)
            }
            "subscript" => CommandKind::Subscript,
            "superscript" => CommandKind::Superscript,
            other => return Err(LnPdfError::UnrecognizedCommand(other.to_string())),
        };

        Ok(Self {
            command,
            start: start as usize,
            end: usize::try_from(end).ok(),
        })
    }
}

/// Bold and italic bits of a signed bitmask argument (`-1` sets both).
fn style_bits(record: &StyleRecord, argument: &str) -> Result<u32> {
    let value: i32 = argument
        .parse()
        .map_err(|_| record.malformed("bad style bitmask"))?;
    Ok(value as u32 & (BOLD | ITALIC))
}

// ============================================================================
// EVENTS
// ============================================================================

/// Style defaults for one text element, in device units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextDefaults {
    pub style: u32,
    pub size: f32,
    /// Packed ARGB color
    pub color: i32,
    pub typeface: Typeface,
}

/// IR opcodes - one state change or text span each.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Set the bold/italic bitmask.
    SetStyle(u32),

    /// Enable/disable underline.
    SetUnderline(bool),

    /// Set the text color.
    SetColor(Rgb),

    /// Set the font size in device units.
    SetSize(f32),

    /// Set the font family.
    SetTypeface(Typeface),

    /// Move the cursor relative to its current position (y grows downward).
    Translate { dx: f32, dy: f32 },

    /// Move the cursor to an absolute position (top-left origin).
    Goto { x: f32, y: f32 },

    /// Text span. May contain explicit newlines.
    Text(String),
}

/// One-line listing form, as printed by `--dump-events`.
impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::SetStyle(style) => write!(
                f,
                "style bold={} italic={}",
                style & BOLD != 0,
                style & ITALIC != 0
            ),
            Op::SetUnderline(on) => write!(f, "underline {}", if *on { "on" } else { "off" }),
            Op::SetColor(c) => write!(f, "color {:.3} {:.3} {:.3}", c.r, c.g, c.b),
            Op::SetSize(size) => write!(f, "size {:.2}", size),
            Op::SetTypeface(typeface) => write!(f, "typeface {}", typeface.name()),
            Op::Translate { dx, dy } => write!(f, "translate {:.2} {:.2}", dx, dy),
            Op::Goto { x, y } => write!(f, "goto {:.2} {:.2}", x, y),
            Op::Text(text) => write!(f, "text {:?}", text),
        }
    }
}

/// An op pinned to a character offset.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleEvent {
    pub index: usize,
    pub op: Op,
}

/// Ordered event queue produced by the compiler.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    pub events: Vec<StyleEvent>,
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event at `index`.
    pub fn push(&mut self, index: usize, op: Op) {
        self.events.push(StyleEvent { index, op });
    }

    /// Get the number of events in the queue.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate over events.
    pub fn iter(&self) -> impl Iterator<Item = &StyleEvent> {
        self.events.iter()
    }

    /// Stable sort by index; ties keep emission order.
    pub fn sort(&mut self) {
        self.events.sort_by_key(|event| event.index);
    }

    /// One `@index op` line per event.
    pub fn describe(&self) -> Vec<String> {
        self.into_iter()
            .map(|event| format!("@{} {}", event.index, event.op))
            .collect()
    }

    /// Flatten into a single op stream, slicing `text` between events.
    ///
    /// Offsets count characters, not bytes, and are clamped to the text.
    /// Empty spans are dropped.
    pub fn to_ops(&self, text: &str) -> Vec<Op> {
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_len = bounds.len() - 1;
        let slice = |from: usize, to: usize| -> String {
            text[bounds[from.min(char_len)]..bounds[to.min(char_len)]].to_string()
        };

        let mut ops = Vec::with_capacity(self.events.len() * 2);
        let mut current = 0;

        for event in self {
            if event.index > current {
                let span = slice(current, event.index);
                if !span.is_empty() {
                    ops.push(Op::Text(span));
                }
                current = event.index;
            }
            ops.push(event.op.clone());
        }

        if current < char_len {
            ops.push(Op::Text(slice(current, char_len)));
        }

        ops
    }
}

impl<'a> IntoIterator for &'a EventQueue {
    type Item = &'a StyleEvent;
    type IntoIter = std::slice::Iter<'a, StyleEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Style state tracked while replaying one text element.
///
/// Created fresh per element. `style == None` means no bitmask has been
/// applied yet, so the first one seeds bold and italic unconditionally.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub style: Option<u32>,
    pub underline: bool,
    pub color: Rgb,
    pub size: f32,
    pub typeface: Typeface,
    pub x: f32,
    pub y: f32,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            style: None,
            underline: false,
            color: Rgb::BLACK,
            size: 0.0,
            typeface: Typeface::Sans,
            x: 0.0,
            y: 0.0,
        }
    }
}
