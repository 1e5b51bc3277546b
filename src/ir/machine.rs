//! # Style State Machine
//!
//! Replays an [`EventQueue`] against a [`TextBackend`].
//!
//! ## Architecture
//!
//! ```text
//! EventQueue + text → to_ops() → StyleMachine::apply(op) → TextBackend calls
//!                                      ↓
//!                               RenderState (fresh per element)
//! ```
//!
//! Bold and italic travel together as one bitmask. The machine only calls
//! `set_bold` / `set_italic` for bits that actually changed; the first
//! bitmask seeds both unconditionally. Every other op is forwarded as is.

use super::ops::{BOLD, EventQueue, ITALIC, Op, RenderState};
use crate::color::Rgb;
use crate::ir::Typeface;

/// Capabilities a rendering backend exposes to the text machinery.
///
/// Coordinates are device units with a top-left origin; `y` grows downward.
pub trait TextBackend {
    fn set_bold(&mut self, bold: bool);

    fn set_italic(&mut self, italic: bool);

    fn set_underline(&mut self, underline: bool);

    fn set_color(&mut self, color: Rgb);

    /// Font size in device units.
    fn set_size(&mut self, size: f32);

    fn set_typeface(&mut self, typeface: Typeface);

    /// Move the cursor relative to its current position.
    fn translate(&mut self, dx: f32, dy: f32);

    /// Move the cursor to an absolute position.
    fn goto(&mut self, x: f32, y: f32);

    /// Write a text span at the cursor. Newlines start a new line.
    fn write_text(&mut self, text: &str);

    /// Finish any buffered text object.
    fn flush(&mut self) {}
}

/// Replays style ops against a backend, tracking [`RenderState`].
pub struct StyleMachine<'a, B: TextBackend + ?Sized> {
    backend: &'a mut B,
    state: RenderState,
}

impl<'a, B: TextBackend + ?Sized> StyleMachine<'a, B> {
    /// Create a machine with fresh state.
    pub fn new(backend: &'a mut B) -> Self {
        Self {
            backend,
            state: RenderState::default(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Replay a whole queue over `text` and return the final state.
    pub fn run(mut self, queue: &EventQueue, text: &str) -> RenderState {
        for op in queue.to_ops(text) {
            self.apply(&op);
        }
        self.state
    }

    /// Apply a single op.
    pub fn apply(&mut self, op: &Op) {
        log::debug!("apply {:?}", op);

        match op {
            Op::SetStyle(style) => self.set_style(*style),
            Op::SetUnderline(underline) => {
                self.state.underline = *underline;
                self.backend.set_underline(*underline);
            }
            Op::SetColor(color) => {
                self.state.color = *color;
                self.backend.set_color(*color);
            }
            Op::SetSize(size) => {
                self.state.size = *size;
                self.backend.set_size(*size);
            }
            Op::SetTypeface(typeface) => {
                self.state.typeface = *typeface;
                self.backend.set_typeface(*typeface);
            }
            Op::Translate { dx, dy } => {
                self.state.x += dx;
                self.state.y += dy;
                self.backend.translate(*dx, *dy);
            }
            Op::Goto { x, y } => {
                self.state.x = *x;
                self.state.y = *y;
                self.backend.goto(*x, *y);
            }
            Op::Text(text) => self.backend.write_text(text),
        }
    }

    /// Apply a bitmask, calling the backend only for changed bits.
    fn set_style(&mut self, style: u32) {
        match self.state.style {
            None => {
                self.backend.set_bold(style & BOLD != 0);
                self.backend.set_italic(style & ITALIC != 0);
            }
            Some(previous) => {
                let changed = previous ^ style;
                if changed & BOLD != 0 {
                    self.backend.set_bold(style & BOLD != 0);
                }
                if changed & ITALIC != 0 {
                    self.backend.set_italic(style & ITALIC != 0);
                }
            }
        }

        self.state.style = Some(style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{StyleRecord, TextDefaults, compile};
    use crate::render::record::{Call, Recorder};
    use pretty_assertions::assert_eq;

    fn defaults() -> TextDefaults {
        TextDefaults {
            style: 0,
            size: 12.0,
            color: 0,
            typeface: Typeface::Sans,
        }
    }

    fn replay(text: &str, records: &[StyleRecord]) -> (Recorder, RenderState) {
        let queue = compile(text.chars().count(), &defaults(), records, (0.0, 0.0)).unwrap();
        let mut recorder = Recorder::new();
        let state = StyleMachine::new(&mut recorder).run(&queue, text);
        (recorder, state)
    }

    #[test]
    fn test_first_style_seeds_both() {
        let mut recorder = Recorder::new();
        let mut machine = StyleMachine::new(&mut recorder);
        machine.apply(&Op::SetStyle(0));
        assert_eq!(machine.state().style, Some(0));
        assert_eq!(recorder.calls(), &[Call::Bold(false), Call::Italic(false)]);
    }

    #[test]
    fn test_style_diff_only_changed_bits() {
        let mut recorder = Recorder::new();
        let mut machine = StyleMachine::new(&mut recorder);
        machine.apply(&Op::SetStyle(0));
        machine.apply(&Op::SetStyle(2));
        machine.apply(&Op::SetStyle(2));
        machine.apply(&Op::SetStyle(1));
        assert_eq!(
            recorder.calls(),
            &[
                Call::Bold(false),
                Call::Italic(false),
                Call::Italic(true),
                Call::Bold(true),
                Call::Italic(false),
            ]
        );
    }

    #[test]
    fn test_other_ops_not_diffed() {
        let mut recorder = Recorder::new();
        let mut machine = StyleMachine::new(&mut recorder);
        machine.apply(&Op::SetUnderline(false));
        machine.apply(&Op::SetUnderline(false));
        machine.apply(&Op::SetSize(4.0));
        machine.apply(&Op::SetSize(4.0));
        assert_eq!(
            recorder.calls(),
            &[
                Call::Underline(false),
                Call::Underline(false),
                Call::Size(4.0),
                Call::Size(4.0),
            ]
        );
    }

    #[test]
    fn test_hello_world_bold_calls() {
        let (recorder, state) = replay("Hello World", &[StyleRecord::new("stylexor", "1", 0, 5)]);

        let bold: Vec<_> = recorder
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::Bold(_)))
            .collect();
        // Seed, on, off
        assert_eq!(bold, vec![&Call::Bold(false), &Call::Bold(true), &Call::Bold(false)]);
        assert_eq!(recorder.texts(), vec!["Hello", " World"]);
        assert_eq!(state.style, Some(0));
    }

    #[test]
    fn test_hello_world_bold_after_seed() {
        let (recorder, _) = replay("Hello World", &[StyleRecord::new("stylexor", "1", 0, 5)]);
        let calls = recorder.calls();
        // Drop the setup calls: Bold, Italic, Size, Color, Typeface, Goto
        assert_eq!(
            &calls[6..],
            &[
                Call::Bold(true),
                Call::Text("Hello".into()),
                Call::Bold(false),
                Call::Text(" World".into()),
            ]
        );
        let italics = calls.iter().filter(|c| matches!(c, Call::Italic(_))).count();
        assert_eq!(italics, 1, "italic only fires for the seed");
    }

    #[test]
    fn test_non_overlapping_restores_default_state() {
        let text = "abcdefghijklmnop";
        let (_, state) = replay(
            text,
            &[
                StyleRecord::new("stylexor", "3", 0, 2),
                StyleRecord::new("underline", "0", 2, 4),
                StyleRecord::new("foregroundcolor", "-65536", 4, 6),
                StyleRecord::new("relativesize", "2", 6, 8),
                StyleRecord::new("typeface", "serif", 8, 10),
                StyleRecord::new("superscript", "0", 10, 12),
                StyleRecord::new("underlinexor", "1", 12, 14),
            ],
        );
        assert_eq!(state.style, Some(0));
        assert!(!state.underline);
        assert_eq!(state.color, Rgb::BLACK);
        assert_eq!(state.size, 12.0);
        assert_eq!(state.typeface, Typeface::Sans);
        assert_eq!(state.y, 0.0);
    }

    #[test]
    fn test_cursor_tracking() {
        let mut recorder = Recorder::new();
        let mut machine = StyleMachine::new(&mut recorder);
        machine.apply(&Op::Goto { x: 10.0, y: 20.0 });
        machine.apply(&Op::Translate { dx: 1.0, dy: -3.0 });
        assert_eq!(machine.state().x, 11.0);
        assert_eq!(machine.state().y, 17.0);
    }
}
