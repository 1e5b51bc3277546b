//! # lnpdf - LectureNotes to PDF
//!
//! lnpdf converts LectureNotes handwritten notebooks into PDF documents. It
//! provides:
//!
//! - **Notebook model**: boards, folders, notebooks, pages and text elements
//! - **Style compiler**: flat style intervals to an ordered event queue
//! - **Style machine**: replays events against a text backend
//! - **PDF backend**: bitmap layers plus styled text in the standard fonts
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use lnpdf::{convert, notebook::Notebook, render::RenderConfig};
//!
//! let notebook = Notebook::open(Path::new("LectureNotes/physics"))?;
//! let path = convert::write_notebook(&notebook, &RenderConfig::DEFAULT, Path::new("."))?;
//! println!("wrote {}", path.display());
//!
//! # Ok::<(), lnpdf::LnPdfError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`notebook`] | On-disk notebook model |
//! | [`ir`] | Style records, compiler, event queue, style machine |
//! | [`render`] | Per-element driver and render configuration |
//! | [`pdf`] | PDF writer and page canvas |
//! | [`convert`] | Notebook to PDF, page layers, error recovery |
//! | [`color`] | Packed ARGB decoding |
//! | [`error`] | Error types |

pub mod color;
pub mod convert;
pub mod error;
pub mod ir;
pub mod notebook;
pub mod pdf;
pub mod render;

// Re-exports for convenience
pub use error::LnPdfError;
pub use render::RenderConfig;
