//! # Page Canvas
//!
//! Builds one page's content stream. Callers work in device units with a
//! top-left origin; the canvas flips to PDF's bottom-left origin on output.
//!
//! ## Text Model
//!
//! The canvas is a [`TextBackend`]. Text operators are emitted lazily:
//!
//! | Backend call | Emitted |
//! |--------------|---------|
//! | first `write_text` | `BT`, then `Tf`/`rg`/`Ts` as needed |
//! | `goto(x, y)` | `Tm` placing the baseline one font size below `y` |
//! | `translate(dx, _)` | `TJ` kerning before the next span |
//! | `translate(_, dy)` | text rise (`Ts`), positive `dy` moves down |
//! | `\n` in text | `Td` by -1.2 × size |
//! | `flush()` | `ET`, then the collected underlines |
//!
//! Font and color operators are only written when the effective value
//! differs from what the content stream already has.
//!
//! ## Fonts
//!
//! The twelve standard Type1 fonts, addressed `/F1`..`/F12`:
//!
//! ```text
//!          regular            bold                 italic                  bold italic
//! sans     Helvetica          Helvetica-Bold       Helvetica-Oblique       Helvetica-BoldOblique
//! serif    Times-Roman        Times-Bold           Times-Italic            Times-BoldItalic
//! mono     Courier            Courier-Bold         Courier-Oblique         Courier-BoldOblique
//! ```

use super::image::PageImage;
use super::objects::{encode_win_ansi, literal, real};
use crate::color::Rgb;
use crate::ir::{TextBackend, Typeface};

/// Standard fonts, indexed by [`font_index`].
pub const BASE_FONTS: [&str; 12] = [
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-Oblique",
    "Helvetica-BoldOblique",
    "Times-Roman",
    "Times-Bold",
    "Times-Italic",
    "Times-BoldItalic",
    "Courier",
    "Courier-Bold",
    "Courier-Oblique",
    "Courier-BoldOblique",
];

/// Line advance as a multiple of the font size.
pub const LEADING: f32 = 1.2;

/// Index into [`BASE_FONTS`].
pub fn font_index(typeface: Typeface, bold: bool, italic: bool) -> usize {
    let family = match typeface {
        Typeface::Sans => 0,
        Typeface::Serif => 1,
        Typeface::Mono => 2,
    };
    family * 4 + usize::from(bold) + 2 * usize::from(italic)
}

/// Approximate advance width of `text`. Good enough for underlines.
pub fn approx_width(text: &str, typeface: Typeface, size: f32) -> f32 {
    let em = match typeface {
        Typeface::Mono => 0.6,
        _ => 0.5,
    };
    text.chars().count() as f32 * em * size
}

#[derive(Debug, Clone, PartialEq)]
struct Underline {
    x0: f32,
    x1: f32,
    /// Device y (top-left origin)
    y: f32,
    width: f32,
    color: Rgb,
}

/// Text state as set by the backend calls.
#[derive(Debug, Clone)]
struct TextState {
    bold: bool,
    italic: bool,
    underline: bool,
    typeface: Typeface,
    size: f32,
    color: Rgb,

    /// Baseline start of the current line, device units
    line_x: f32,
    line_y: Option<f32>,
    /// Approximate advance since the start of the line
    advance: f32,
    /// Accumulated vertical offset, positive is down
    rise: f32,
    /// Horizontal offset not yet written
    pending_dx: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            typeface: Typeface::Sans,
            size: 12.0,
            color: Rgb::BLACK,
            line_x: 0.0,
            line_y: None,
            advance: 0.0,
            rise: 0.0,
            pending_dx: 0.0,
        }
    }
}

/// What the content stream currently has in effect inside `BT`/`ET`.
#[derive(Debug, Clone, Default)]
struct Applied {
    open: bool,
    font: Option<(usize, f32)>,
    color: Option<Rgb>,
    rise: Option<f32>,
}

/// One page of drawing operations.
#[derive(Debug, Clone)]
pub struct PageCanvas {
    width: f32,
    height: f32,
    content: Vec<u8>,
    images: Vec<PageImage>,
    text: TextState,
    applied: Applied,
    underlines: Vec<Underline>,
}

impl PageCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            content: Vec::new(),
            images: Vec::new(),
            text: TextState::default(),
            applied: Applied::default(),
            underlines: Vec::new(),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Content stream so far (uncompressed).
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn images(&self) -> &[PageImage] {
        &self.images
    }

    /// Close any open text and hand over the content stream and images.
    ///
    /// Image `i` in the returned list is referenced as `/Im{i+1}`.
    pub fn into_parts(mut self) -> (Vec<u8>, Vec<PageImage>) {
        self.flush();
        (self.content, self.images)
    }

    /// Fill the whole page with `color`.
    pub fn fill_background(&mut self, color: Rgb) {
        self.flush();
        self.op(format!(
            "q {} {} {} rg 0 0 {} {} re f Q",
            real(color.r),
            real(color.g),
            real(color.b),
            real(self.width),
            real(self.height)
        ));
    }

    /// Draw `image` stretched over the whole page.
    pub fn draw_image(&mut self, image: PageImage) {
        self.flush();
        self.images.push(image);
        self.op(format!(
            "q {} 0 0 {} 0 0 cm /Im{} Do Q",
            real(self.width),
            real(self.height),
            self.images.len()
        ));
    }

    // ========================================================================
    // CONTENT STREAM
    // ========================================================================

    fn op(&mut self, line: String) {
        self.content.extend_from_slice(line.as_bytes());
        self.content.push(b'\n');
    }

    fn begin_text(&mut self) {
        if self.applied.open {
            return;
        }
        self.op("BT".to_string());
        self.applied = Applied {
            open: true,
            ..Applied::default()
        };
        let line_y = *self.text.line_y.get_or_insert(self.text.size);
        self.set_matrix(self.text.line_x, line_y);
    }

    fn set_matrix(&mut self, x: f32, baseline: f32) {
        self.op(format!(
            "1 0 0 1 {} {} Tm",
            real(x),
            real(self.height - baseline)
        ));
    }

    fn newline(&mut self) {
        let leading = LEADING * self.text.size;
        self.op(format!("0 {} Td", real(-leading)));
        if let Some(y) = self.text.line_y.as_mut() {
            *y += leading;
        }
        self.text.advance = 0.0;
        self.text.pending_dx = 0.0;
    }

    fn show(&mut self, span: &str) {
        let t = &self.text;
        let font = (font_index(t.typeface, t.bold, t.italic), t.size);
        let (color, rise, size) = (t.color, t.rise, t.size);

        if self.applied.font != Some(font) {
            self.op(format!("/F{} {} Tf", font.0 + 1, real(font.1)));
            self.applied.font = Some(font);
        }
        if self.applied.color != Some(color) {
            self.op(format!(
                "{} {} {} rg",
                real(color.r),
                real(color.g),
                real(color.b)
            ));
            self.applied.color = Some(color);
        }
        if self.applied.rise != Some(rise) {
            self.op(format!("{} Ts", real(-rise)));
            self.applied.rise = Some(rise);
        }
        if self.text.pending_dx != 0.0 && size > 0.0 {
            let adjust = -self.text.pending_dx * 1000.0 / size;
            self.op(format!("[{}] TJ", real(adjust)));
        }
        self.text.pending_dx = 0.0;

        let mut line = literal(&encode_win_ansi(span));
        line.extend_from_slice(b" Tj\n");
        self.content.extend_from_slice(&line);

        let width = approx_width(span, self.text.typeface, size);
        if self.text.underline {
            let x0 = self.text.line_x + self.text.advance;
            let baseline = self.text.line_y.unwrap_or(size);
            self.underlines.push(Underline {
                x0,
                x1: x0 + width,
                y: baseline + rise + 0.15 * size,
                width: (0.06 * size).max(0.1),
                color,
            });
        }
        self.text.advance += width;
    }

    fn stroke_underlines(&mut self) {
        for u in std::mem::take(&mut self.underlines) {
            let y = real(self.height - u.y);
            self.op(format!(
                "q {} w {} {} {} RG {} {} m {} {} l S Q",
                real(u.width),
                real(u.color.r),
                real(u.color.g),
                real(u.color.b),
                real(u.x0),
                y,
                real(u.x1),
                y
            ));
        }
    }
}

impl TextBackend for PageCanvas {
    fn set_bold(&mut self, bold: bool) {
        self.text.bold = bold;
    }

    fn set_italic(&mut self, italic: bool) {
        self.text.italic = italic;
    }

    fn set_underline(&mut self, underline: bool) {
        self.text.underline = underline;
    }

    fn set_color(&mut self, color: Rgb) {
        self.text.color = color;
    }

    fn set_size(&mut self, size: f32) {
        self.text.size = size;
    }

    fn set_typeface(&mut self, typeface: Typeface) {
        self.text.typeface = typeface;
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.text.pending_dx += dx;
        self.text.advance += dx;
        self.text.rise += dy;
    }

    fn goto(&mut self, x: f32, y: f32) {
        let baseline = y + self.text.size;
        self.text.line_x = x;
        self.text.line_y = Some(baseline);
        self.text.advance = 0.0;
        self.text.pending_dx = 0.0;
        if self.applied.open {
            self.set_matrix(x, baseline);
        }
    }

    fn write_text(&mut self, text: &str) {
        self.begin_text();
        for (i, span) in text.split('\n').enumerate() {
            if i > 0 {
                self.newline();
            }
            if !span.is_empty() {
                self.show(span);
            }
        }
    }

    fn flush(&mut self) {
        if self.applied.open {
            self.op("ET".to_string());
            self.applied = Applied::default();
        }
        self.stroke_underlines();
        self.text = TextState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn content(canvas: &PageCanvas) -> String {
        String::from_utf8_lossy(canvas.content()).into_owned()
    }

    #[test]
    fn test_font_index() {
        assert_eq!(BASE_FONTS[font_index(Typeface::Sans, false, false)], "Helvetica");
        assert_eq!(BASE_FONTS[font_index(Typeface::Sans, true, true)], "Helvetica-BoldOblique");
        assert_eq!(BASE_FONTS[font_index(Typeface::Serif, false, true)], "Times-Italic");
        assert_eq!(BASE_FONTS[font_index(Typeface::Mono, true, false)], "Courier-Bold");
    }

    #[test]
    fn test_background() {
        let mut canvas = PageCanvas::new(100.0, 200.0);
        canvas.fill_background(Rgb::WHITE);
        assert_eq!(content(&canvas), "q 1 1 1 rg 0 0 100 200 re f Q\n");
    }

    #[test]
    fn test_image_placement() {
        let mut canvas = PageCanvas::new(100.0, 200.0);
        let img = PageImage::from_rgba(&RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]))).unwrap();
        canvas.draw_image(img.clone());
        canvas.draw_image(img);
        assert_eq!(
            content(&canvas),
            "q 100 0 0 200 0 0 cm /Im1 Do Q\nq 100 0 0 200 0 0 cm /Im2 Do Q\n"
        );
        assert_eq!(canvas.images().len(), 2);
    }

    #[test]
    fn test_text_is_flipped_to_pdf_origin() {
        let mut canvas = PageCanvas::new(100.0, 200.0);
        canvas.set_size(10.0);
        canvas.goto(5.0, 20.0);
        canvas.write_text("Hi");
        canvas.flush();
        assert_eq!(
            content(&canvas),
            "BT\n1 0 0 1 5 170 Tm\n/F1 10 Tf\n0 0 0 rg\n0 Ts\n(Hi) Tj\nET\n"
        );
    }

    #[test]
    fn test_font_switch_is_lazy() {
        let mut canvas = PageCanvas::new(100.0, 100.0);
        canvas.set_size(10.0);
        canvas.goto(0.0, 0.0);
        canvas.write_text("a");
        canvas.set_bold(true);
        canvas.set_bold(false);
        canvas.write_text("b");
        canvas.set_bold(true);
        canvas.write_text("c");
        let text = content(&canvas);
        assert_eq!(text.matches("Tf").count(), 2);
        assert!(text.contains("/F2 10 Tf\n(c) Tj"));
        assert_eq!(text.matches(" rg").count(), 1);
    }

    #[test]
    fn test_newline_and_rise() {
        let mut canvas = PageCanvas::new(100.0, 100.0);
        canvas.set_size(10.0);
        canvas.goto(0.0, 0.0);
        canvas.write_text("a\nb");
        canvas.translate(0.0, -5.0);
        canvas.write_text("c");
        let text = content(&canvas);
        assert!(text.contains("(a) Tj\n0 -12 Td\n(b) Tj\n5 Ts\n(c) Tj"));
    }

    #[test]
    fn test_horizontal_translate_becomes_kerning() {
        let mut canvas = PageCanvas::new(100.0, 100.0);
        canvas.set_size(10.0);
        canvas.goto(0.0, 0.0);
        canvas.write_text("a");
        canvas.translate(2.0, 0.0);
        canvas.write_text("b");
        assert!(content(&canvas).contains("[-200] TJ\n(b) Tj"));
    }

    #[test]
    fn test_underline_stroked_on_flush() {
        let mut canvas = PageCanvas::new(100.0, 100.0);
        canvas.set_size(10.0);
        canvas.goto(0.0, 0.0);
        canvas.write_text("ab");
        canvas.set_underline(true);
        canvas.write_text("cd");
        assert!(!content(&canvas).contains(" l S"));

        canvas.flush();
        let text = content(&canvas);
        let et = text.find("ET\n").unwrap();
        let stroke = text.find(" l S Q").unwrap();
        assert!(stroke > et);
        // Starts after "ab" (2 × 0.5 em), baseline 10 plus 1.5 below
        assert!(text.contains("q 0.6 w 0 0 0 RG 10 88.5 m 20 88.5 l S Q"));
    }

    #[test]
    fn test_non_latin_text_is_replaced() {
        let mut canvas = PageCanvas::new(100.0, 100.0);
        canvas.write_text("(π)");
        assert!(content(&canvas).contains("(\\(?\\)) Tj"));
    }

    #[test]
    fn test_into_parts_closes_text() {
        let mut canvas = PageCanvas::new(100.0, 100.0);
        canvas.write_text("x");
        let (content, images) = canvas.into_parts();
        assert!(content.ends_with(b"ET\n"));
        assert!(images.is_empty());
    }
}
