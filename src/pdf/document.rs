//! Assemble page canvases into a PDF file.

use chrono::{DateTime, FixedOffset, Local};

use super::canvas::{BASE_FONTS, PageCanvas};
use super::image::deflate;
use super::objects::{date, real, text_string};
use super::writer::{ObjRef, PdfWriter};
use crate::error::Result;

/// Producer string written to the document info.
pub const PRODUCER: &str = concat!("lnpdf ", env!("CARGO_PKG_VERSION"));

/// A multi-page document where every page shares one size.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    title: String,
    width: f32,
    height: f32,
    pages: Vec<PageCanvas>,
    created: Option<DateTime<FixedOffset>>,
}

impl PdfDocument {
    pub fn new(title: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            pages: Vec::new(),
            created: None,
        }
    }

    /// Fix the creation date (defaults to now).
    pub fn with_creation_date(mut self, created: DateTime<FixedOffset>) -> Self {
        self.created = Some(created);
        self
    }

    /// A blank canvas with this document's page size.
    pub fn new_page(&self) -> PageCanvas {
        PageCanvas::new(self.width, self.height)
    }

    pub fn push_page(&mut self, page: PageCanvas) {
        self.pages.push(page);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialize the document.
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        let mut w = PdfWriter::new();
        let catalog = w.alloc();
        let page_tree = w.alloc();
        let info = w.alloc();

        let mut font_dict = String::new();
        for (i, name) in BASE_FONTS.iter().enumerate() {
            let font = w.alloc();
            w.object(
                font,
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                    name
                ),
            );
            font_dict.push_str(&format!(" /F{} {}", i + 1, font));
        }

        let media_box = format!("[0 0 {} {}]", real(self.width), real(self.height));
        let mut kids: Vec<ObjRef> = Vec::with_capacity(self.pages.len());

        for page in self.pages {
            let (content, images) = page.into_parts();
            let page_id = w.alloc();

            let mut xobjects = String::new();
            for (i, image) in images.iter().enumerate() {
                let smask = match &image.alpha {
                    Some(alpha) => {
                        let mask = w.alloc();
                        w.stream(
                            mask,
                            &image_dict(image.width, image.height, "/DeviceGray"),
                            alpha,
                        );
                        format!(" /SMask {}", mask)
                    }
                    None => String::new(),
                };
                let id = w.alloc();
                let dict = format!(
                    "{}{}",
                    image_dict(image.width, image.height, "/DeviceRGB"),
                    smask
                );
                w.stream(id, &dict, &image.rgb);
                xobjects.push_str(&format!(" /Im{} {}", i + 1, id));
            }

            let contents = w.alloc();
            w.stream(contents, "/Filter /FlateDecode", &deflate(&content)?);

            w.object(
                page_id,
                format!(
                    "<< /Type /Page /Parent {} /MediaBox {} /Resources << /Font <<{} >> /XObject <<{} >> >> /Contents {} >>",
                    page_tree, media_box, font_dict, xobjects, contents
                ),
            );
            kids.push(page_id);
        }

        let kid_list: Vec<String> = kids.iter().map(ObjRef::to_string).collect();
        w.object(
            page_tree,
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kid_list.join(" "),
                kids.len()
            ),
        );
        w.object(catalog, format!("<< /Type /Catalog /Pages {} >>", page_tree));

        let created = self
            .created
            .unwrap_or_else(|| DateTime::<FixedOffset>::from(Local::now()));
        let mut info_body = b"<< /Title ".to_vec();
        info_body.extend_from_slice(&text_string(&self.title));
        info_body.extend_from_slice(
            format!(
                " /Producer ({}) /CreationDate ({}) >>",
                PRODUCER,
                date(&created)
            )
            .as_bytes(),
        );
        w.object(info, info_body);

        Ok(w.finish(catalog, info))
    }
}

fn image_dict(width: u32, height: u32, color_space: &str) -> String {
    format!(
        "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace {} /BitsPerComponent 8 /Filter /FlateDecode",
        width, height, color_space
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::ir::TextBackend;
    use crate::pdf::image::PageImage;
    use chrono::TimeZone;
    use image::{Rgba, RgbaImage};

    fn fixed_date() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .unwrap()
    }

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn test_empty_document() {
        let doc = PdfDocument::new("empty", 100.0, 200.0).with_creation_date(fixed_date());
        let text = as_text(&doc.to_bytes().unwrap());
        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.contains("/Type /Pages /Kids [] /Count 0"));
        assert!(text.contains("/Title (empty)"));
        assert!(text.contains("/CreationDate (D:20240501120000+00'00')"));
    }

    #[test]
    fn test_pages_and_fonts() {
        let mut doc = PdfDocument::new("notes", 288.0, 432.0).with_creation_date(fixed_date());
        for _ in 0..2 {
            let mut page = doc.new_page();
            page.fill_background(Rgb::WHITE);
            page.write_text("hi");
            doc.push_page(page);
        }
        assert_eq!(doc.page_count(), 2);

        let text = as_text(&doc.to_bytes().unwrap());
        assert!(text.contains("/Count 2"));
        assert_eq!(text.matches("/Type /Page ").count(), 2);
        assert!(text.contains("/MediaBox [0 0 288 432]"));
        for name in BASE_FONTS {
            assert!(text.contains(&format!("/BaseFont /{} ", name)));
        }
        assert!(text.contains("/F12 "));
    }

    #[test]
    fn test_translucent_image_gets_smask() {
        let mut doc = PdfDocument::new("img", 10.0, 10.0).with_creation_date(fixed_date());
        let mut page = doc.new_page();
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        page.draw_image(PageImage::from_rgba(&img).unwrap());
        doc.push_page(page);

        let text = as_text(&doc.to_bytes().unwrap());
        assert!(text.contains("/ColorSpace /DeviceGray"));
        assert!(text.contains("/SMask "));
        assert!(text.contains("/XObject << /Im1 "));
    }

    #[test]
    fn test_unicode_title() {
        let doc = PdfDocument::new("Übung", 10.0, 10.0).with_creation_date(fixed_date());
        let text = as_text(&doc.to_bytes().unwrap());
        assert!(text.contains("/Title <FEFF00DC"));
    }
}
