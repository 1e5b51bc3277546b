//! # PDF Backend
//!
//! A small PDF 1.4 writer, just enough for notebook pages: full-page bitmap
//! layers, a background fill and styled text in the standard fonts.
//!
//! ## Module Structure
//!
//! - [`objects`]: number, string and date syntax
//! - [`writer`]: object numbering, xref table, trailer
//! - [`image`]: bitmap layers as deflated RGB plus soft mask
//! - [`canvas`]: one page's content stream (implements [`TextBackend`])
//! - [`document`]: pages, fonts and metadata into a file
//!
//! ## Usage Example
//!
//! ```
//! use lnpdf::color::Rgb;
//! use lnpdf::ir::TextBackend;
//! use lnpdf::pdf::PdfDocument;
//!
//! let mut doc = PdfDocument::new("notes", 288.0, 432.0);
//! let mut page = doc.new_page();
//! page.fill_background(Rgb::WHITE);
//! page.goto(36.0, 36.0);
//! page.write_text("Hello");
//! doc.push_page(page);
//!
//! let bytes = doc.to_bytes()?;
//! assert!(bytes.starts_with(b"%PDF-1.4"));
//! # Ok::<(), lnpdf::LnPdfError>(())
//! ```
//!
//! [`TextBackend`]: crate::ir::TextBackend

pub mod canvas;
pub mod document;
pub mod image;
pub mod objects;
pub mod writer;

pub use canvas::PageCanvas;
pub use document::PdfDocument;
pub use image::PageImage;
