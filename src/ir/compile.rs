//! # Style Event Compiler
//!
//! Turns a text element's style records into an ordered [`EventQueue`].
//!
//! ## Algorithm
//!
//! ```text
//! seed @0: SetStyle, SetSize, SetColor, SetTypeface, Goto
//!
//! worklist = source intervals (source order)
//! for each entry (worklist grows while we walk it):
//!     emit its op at `start`, computed from the running state
//!     if it has an `end`: insert the inverse into the worklist
//!     update the running state
//!
//! stable sort by index
//! ```
//!
//! Inverses are processed like any other entry, so they see the running
//! state at the point they are reached. That is what makes overlapping
//! intervals compose: an XOR undone after another XOR began still flips only
//! its own bits, and relative sizes multiply back out.
//!
//! ## Inverse Placement
//!
//! An inverse at index `i` goes in front of the first worklist entry whose
//! start is `>= i`, scanning from the head, or at the tail if there is none.
//! Two inverses targeting the same index therefore end up last-in-first-out,
//! which unwinds nested intervals in the right order.
//!
//! If the head scan lands at or before the entry being processed (a source
//! list not sorted by start, or an empty interval), the inverse goes directly
//! after the current entry instead. Every inverse is processed exactly once
//! and the walk always terminates.

use super::ops::{CommandKind, EventQueue, Op, StyleInterval, StyleRecord, TextDefaults, Typeface};
use crate::color;
use crate::error::Result;

/// Running values while walking the worklist.
#[derive(Debug, Clone, Copy)]
struct Running {
    style: u32,
    underline: bool,
    color: i32,
    size: f32,
    typeface: Typeface,
}

/// Compile raw style records into an ordered event queue.
///
/// `origin` is the initial cursor position in device units. Every record is
/// parsed before any is processed: an element either compiles completely or
/// fails without producing events.
///
/// ## Errors
///
/// - [`LnPdfError::UnrecognizedCommand`](crate::LnPdfError::UnrecognizedCommand)
/// - [`LnPdfError::MalformedInterval`](crate::LnPdfError::MalformedInterval)
///
/// ## Example
///
/// ```
/// use lnpdf::ir::{compile, Op, StyleRecord, TextDefaults, Typeface};
///
/// let defaults = TextDefaults { style: 0, size: 12.0, color: 0, typeface: Typeface::Sans };
/// let records = [StyleRecord::new("stylexor", "1", 0, 5)];
/// let queue = compile(11, &defaults, &records, (0.0, 0.0)).unwrap();
///
/// let ops = queue.to_ops("Hello World");
/// assert!(ops.contains(&Op::Text("Hello".into())));
/// ```
pub fn compile(
    text_len: usize,
    defaults: &TextDefaults,
    records: &[StyleRecord],
    origin: (f32, f32),
) -> Result<EventQueue> {
    let intervals = records
        .iter()
        .map(StyleInterval::parse)
        .collect::<Result<Vec<_>>>()?;

    Ok(compile_intervals(text_len, defaults, intervals, origin))
}

/// Compile already-parsed intervals. Infallible.
pub fn compile_intervals(
    text_len: usize,
    defaults: &TextDefaults,
    intervals: Vec<StyleInterval>,
    origin: (f32, f32),
) -> EventQueue {
    let mut queue = EventQueue::new();
    let mut running = Running {
        style: defaults.style,
        underline: false,
        color: defaults.color,
        size: defaults.size,
        typeface: defaults.typeface,
    };

    // ===== Setup =====
    queue.push(0, Op::SetStyle(running.style));
    queue.push(0, Op::SetSize(running.size));
    queue.push(0, Op::SetColor(color::decode(running.color)));
    queue.push(0, Op::SetTypeface(running.typeface));
    queue.push(
        0,
        Op::Goto {
            x: origin.0,
            y: origin.1,
        },
    );

    // ===== Worklist =====
    let mut worklist = intervals;
    let mut current = 0;

    while current < worklist.len() {
        let interval = worklist[current];
        if interval.end.is_some_and(|end| end > text_len) {
            log::debug!(
                "interval {:?} ends past the text ({} chars)",
                interval,
                text_len
            );
        }

        let inverse = step(&mut queue, &mut running, interval);

        if let (Some(end), Some(inverse)) = (interval.end, inverse) {
            insert_inverse(&mut worklist, current, StyleInterval::inverse(inverse, end));
        }

        current += 1;
    }

    queue.sort();
    queue
}

/// Emit the op for one worklist entry and update the running state.
///
/// Returns the command that undoes it, if it has one.
fn step(queue: &mut EventQueue, running: &mut Running, interval: StyleInterval) -> Option<CommandKind> {
    let at = interval.start;

    match interval.command {
        CommandKind::TypefaceSet(typeface) => {
            queue.push(at, Op::SetTypeface(typeface));
            let undo = CommandKind::TypefaceSet(running.typeface);
            running.typeface = typeface;
            Some(undo)
        }
        CommandKind::StyleBitmaskSet(style) => {
            queue.push(at, Op::SetStyle(style));
            let undo = CommandKind::StyleBitmaskSet(running.style);
            running.style = style;
            Some(undo)
        }
        CommandKind::StyleBitmaskXor(mask) => {
            running.style ^= mask;
            queue.push(at, Op::SetStyle(running.style));
            Some(CommandKind::StyleBitmaskXor(mask))
        }
        // "on" is absolute, so the undo is always "off" (not a toggle)
        CommandKind::UnderlineOn => {
            queue.push(at, Op::SetUnderline(true));
            running.underline = true;
            Some(CommandKind::UnderlineOff)
        }
        CommandKind::UnderlineOff => {
            queue.push(at, Op::SetUnderline(false));
            running.underline = false;
            None
        }
        CommandKind::UnderlineXor(bit) => {
            running.underline ^= bit;
            queue.push(at, Op::SetUnderline(running.underline));
            Some(CommandKind::UnderlineXor(bit))
        }
        CommandKind::ForegroundColor(packed) => {
            queue.push(at, Op::SetColor(color::decode(packed)));
            let undo = CommandKind::ForegroundColor(running.color);
            running.color = packed;
            Some(undo)
        }
        CommandKind::RelativeSize(factor) => {
            running.size *= factor;
            queue.push(at, Op::SetSize(running.size));
            Some(CommandKind::RelativeSize(1.0 / factor))
        }
        // Scripts swap sub/super blindly; nested scripts are not tracked
        CommandKind::Subscript => {
            queue.push(
                at,
                Op::Translate {
                    dx: 0.0,
                    dy: 0.5 * running.size,
                },
            );
            Some(CommandKind::Superscript)
        }
        CommandKind::Superscript => {
            queue.push(
                at,
                Op::Translate {
                    dx: 0.0,
                    dy: -0.5 * running.size,
                },
            );
            Some(CommandKind::Subscript)
        }
    }
}

/// Insert an inverse in front of the first entry starting at or after it.
fn insert_inverse(worklist: &mut Vec<StyleInterval>, current: usize, inverse: StyleInterval) {
    let at = worklist
        .iter()
        .position(|entry| entry.start >= inverse.start)
        .map_or(worklist.len(), |pos| pos.max(current + 1));

    worklist.insert(at, inverse);
}
