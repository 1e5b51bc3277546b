//! # Rendering Module
//!
//! Glue between notebook text and a rendering backend.
//!
//! ## Modules
//!
//! - [`config`]: DPI, font size correction, default typeface
//! - [`driver`]: compile and replay one text element
//! - [`record`]: a backend that records calls (inspection and tests)
//!
//! ## Usage Example
//!
//! ```
//! use lnpdf::notebook::{NotebookSettings, TextElement};
//! use lnpdf::render::{PageGeometry, RenderConfig, record::Recorder, render_text};
//! # let xml = "<notebook><paperwidth>1200</paperwidth><paperheight>1800</paperheight>\
//! #   <papercolor>-1</papercolor><textlayerfontfamily>1</textlayerfontfamily>\
//! #   <textlayerfontstyle>0</textlayerfontstyle><textlayerfontsize>40</textlayerfontsize>\
//! #   <textlayerfontcolor>-16777216</textlayerfontcolor><textlayerleftmargin>0.1</textlayerleftmargin>\
//! #   <textlayertopmargin>0.1</textlayertopmargin><textlayerrightmargin>0.1</textlayerrightmargin>\
//! #   <textlayerbottommargin>0.1</textlayerbottommargin><layers>2</layers>\
//! #   <displayedlayers>2</displayedlayers><textlayer>2</textlayer>\
//! #   <displaytextlayer>1</displaytextlayer></notebook>";
//! let settings = NotebookSettings::parse(xml)?;
//! let config = RenderConfig::DEFAULT;
//! let geometry = PageGeometry::for_notebook(&settings, &config);
//!
//! let mut recorder = Recorder::new();
//! render_text(&TextElement::new("Hello"), &settings, &config, &geometry, &mut recorder)?;
//! assert_eq!(recorder.texts(), vec!["Hello"]);
//! # Ok::<(), lnpdf::LnPdfError>(())
//! ```

pub mod config;
pub mod driver;
pub mod record;

pub use config::RenderConfig;
pub use driver::{PageGeometry, compile_text, initial_cursor, render_text, text_defaults};
