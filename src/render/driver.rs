//! # Render Driver
//!
//! Drives one text element through the compiler and the style machine.
//!
//! ## Coordinate Spaces
//!
//! ```text
//! notebook (normalized)        device (points, top-left origin)
//! (0,0) ─────── (1,0)          (0,0) ─────────── (width,0)
//!   │             │     ──►      │                  │
//! (0,1) ─────── (1,1)          (0,height) ─── (width,height)
//! ```
//!
//! Positions (box origins, margins) are normalized to the page. Font sizes
//! are notebook pixels, scaled by [`RenderConfig::points_per_pixel`]. Sizes
//! and script offsets are converted once, in the defaults, so everything the
//! compiler derives from them is already in device units.

use crate::error::Result;
use crate::ir::{EventQueue, RenderState, StyleMachine, TextBackend, TextDefaults, compile};
use crate::notebook::{NotebookSettings, TextElement};
use crate::render::RenderConfig;

/// Page size in device units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    /// Device units per notebook pixel
    pub pixel: f32,
}

impl PageGeometry {
    pub fn for_notebook(settings: &NotebookSettings, config: &RenderConfig) -> Self {
        let pixel = config.points_per_pixel();
        Self {
            width: settings.paper_width * pixel,
            height: settings.paper_height * pixel,
            pixel,
        }
    }

    /// Convert a normalized notebook position to device units.
    #[inline]
    pub fn to_device(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.width, y * self.height)
    }
}

/// Notebook text defaults, in device units.
pub fn text_defaults(
    settings: &NotebookSettings,
    config: &RenderConfig,
    geometry: &PageGeometry,
) -> TextDefaults {
    TextDefaults {
        style: settings.font_style,
        size: settings.font_size * config.font_size_factor * geometry.pixel,
        color: settings.font_color,
        typeface: settings.typeface(config),
    }
}

/// Where the text starts: the box origin, or the notebook's text margins.
pub fn initial_cursor(
    text: &TextElement,
    settings: &NotebookSettings,
    geometry: &PageGeometry,
) -> (f32, f32) {
    let (x, y) = text
        .origin()
        .unwrap_or((settings.margin_left, settings.margin_top));
    geometry.to_device(x, y)
}

/// Compile a text element into its event queue.
pub fn compile_text(
    text: &TextElement,
    settings: &NotebookSettings,
    config: &RenderConfig,
    geometry: &PageGeometry,
) -> Result<EventQueue> {
    compile(
        text.char_len(),
        &text_defaults(settings, config, geometry),
        &text.style,
        initial_cursor(text, settings, geometry),
    )
}

/// Render one text element onto `backend`.
///
/// Nothing reaches the backend when compilation fails.
pub fn render_text<B: TextBackend + ?Sized>(
    text: &TextElement,
    settings: &NotebookSettings,
    config: &RenderConfig,
    geometry: &PageGeometry,
    backend: &mut B,
) -> Result<RenderState> {
    let queue = compile_text(text, settings, config, geometry)?;
    log::debug!("{}: {} events", text.name, queue.len());

    let state = StyleMachine::new(&mut *backend).run(&queue, &text.content);
    backend.flush();
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LnPdfError;
    use crate::ir::{StyleRecord, Typeface};
    use crate::notebook::TextFrame;
    use crate::notebook::settings::tests::NOTEBOOK_XML;
    use crate::render::record::{Call, Recorder};

    fn settings() -> NotebookSettings {
        NotebookSettings::parse(NOTEBOOK_XML).unwrap()
    }

    fn geometry() -> PageGeometry {
        PageGeometry::for_notebook(&settings(), &RenderConfig::DEFAULT)
    }

    #[test]
    fn test_geometry() {
        let g = geometry();
        // 1200 x 1800 px at 300 DPI
        assert!((g.width - 288.0).abs() < 1e-3);
        assert!((g.height - 432.0).abs() < 1e-3);
        assert_eq!(g.to_device(0.5, 0.5), (g.width * 0.5, g.height * 0.5));
    }

    #[test]
    fn test_defaults_in_device_units() {
        let defaults = text_defaults(&settings(), &RenderConfig::DEFAULT, &geometry());
        // 40 px × 3/4 × 0.24 pt/px
        assert!((defaults.size - 7.2).abs() < 1e-4);
        assert_eq!(defaults.style, 1);
        assert_eq!(defaults.typeface, Typeface::Serif);
    }

    #[test]
    fn test_cursor_from_margins() {
        let g = geometry();
        let (x, y) = initial_cursor(&TextElement::new("x"), &settings(), &g);
        assert!((x - 0.1 * g.width).abs() < 1e-3);
        assert!((y - 0.05 * g.height).abs() < 1e-3);
    }

    #[test]
    fn test_cursor_from_box() {
        let g = geometry();
        let text = TextElement::new("x").with_frame(TextFrame {
            x: 0.5,
            y: 0.25,
            width: 0.2,
            height: 0.1,
        });
        assert_eq!(initial_cursor(&text, &settings(), &g), (0.5 * g.width, 0.25 * g.height));
    }

    #[test]
    fn test_render_flushes() {
        let mut recorder = Recorder::new();
        let text = TextElement::new("Hi");
        render_text(&text, &settings(), &RenderConfig::DEFAULT, &geometry(), &mut recorder).unwrap();
        assert_eq!(recorder.calls().last(), Some(&Call::Flush));
        assert_eq!(recorder.texts(), vec!["Hi"]);
    }

    #[test]
    fn test_failed_element_does_not_block_sibling() {
        let broken = TextElement::new("broken")
            .with_style(vec![StyleRecord::new("frobnicate", "1", 0, 3)]);
        let sibling = TextElement::new("Hello World")
            .with_style(vec![StyleRecord::new("stylexor", "1", 0, 5)]);

        let mut recorder = Recorder::new();
        let err = render_text(&broken, &settings(), &RenderConfig::DEFAULT, &geometry(), &mut recorder)
            .unwrap_err();
        assert!(matches!(err, LnPdfError::UnrecognizedCommand(_)));
        assert!(recorder.calls().is_empty());

        let state = render_text(&sibling, &settings(), &RenderConfig::DEFAULT, &geometry(), &mut recorder)
            .unwrap();
        assert_eq!(recorder.texts(), vec!["Hello", " World"]);
        // Notebook default style is bold, so the xor turns it off and back on
        assert_eq!(state.style, Some(1));
    }
}
