//! # Intermediate Representation (IR)
//!
//! This module provides the IR layer for styled text. The IR is an ordered
//! queue of style events that sits between LectureNotes style records and a
//! rendering backend.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐     ┌──────────┐
//! │ .style file │ ──► │  Compiler   │ ──► │ StyleMachine │ ──► │ Backend  │
//! │  (records)  │     │ (EventQueue)│     │ (RenderState)│     │ (PDF...) │
//! └─────────────┘     └─────────────┘     └──────────────┘     └──────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use lnpdf::ir::{compile, StyleMachine, StyleRecord, TextDefaults, Typeface};
//! use lnpdf::render::record::Recorder;
//!
//! let defaults = TextDefaults { style: 0, size: 12.0, color: 0, typeface: Typeface::Sans };
//! let records = [StyleRecord::new("stylexor", "1", 0, 5)];
//! let queue = compile(11, &defaults, &records, (0.0, 0.0)).unwrap();
//!
//! // Inspect the IR
//! println!("{:#?}", queue.to_ops("Hello World"));
//!
//! // Replay it
//! let mut recorder = Recorder::new();
//! let state = StyleMachine::new(&mut recorder).run(&queue, "Hello World");
//! assert_eq!(state.style, Some(0));
//! ```

mod compile;
mod machine;
mod ops;

pub use compile::{compile, compile_intervals};
pub use machine::{StyleMachine, TextBackend};
pub use ops::*;
