//! Recording backend.
//!
//! Logs every backend call instead of drawing. Used by `--dump-events` and
//! throughout the tests.

use crate::color::Rgb;
use crate::ir::{TextBackend, Typeface};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Bold(bool),
    Italic(bool),
    Underline(bool),
    Color(Rgb),
    Size(f32),
    Typeface(Typeface),
    Translate(f32, f32),
    Goto(f32, f32),
    Text(String),
    Flush,
}

/// A [`TextBackend`] that records calls in order.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Vec<Call>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Text spans written so far.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl TextBackend for Recorder {
    fn set_bold(&mut self, bold: bool) {
        self.calls.push(Call::Bold(bold));
    }

    fn set_italic(&mut self, italic: bool) {
        self.calls.push(Call::Italic(italic));
    }

    fn set_underline(&mut self, underline: bool) {
        self.calls.push(Call::Underline(underline));
    }

    fn set_color(&mut self, color: Rgb) {
        self.calls.push(Call::Color(color));
    }

    fn set_size(&mut self, size: f32) {
        self.calls.push(Call::Size(size));
    }

    fn set_typeface(&mut self, typeface: Typeface) {
        self.calls.push(Call::Typeface(typeface));
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.calls.push(Call::Translate(dx, dy));
    }

    fn goto(&mut self, x: f32, y: f32) {
        self.calls.push(Call::Goto(x, y));
    }

    fn write_text(&mut self, text: &str) {
        self.calls.push(Call::Text(text.to_string()));
    }

    fn flush(&mut self) {
        self.calls.push(Call::Flush);
    }
}
