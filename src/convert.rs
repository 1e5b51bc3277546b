//! # Notebook Conversion
//!
//! Turns a [`Notebook`] into PDF bytes.
//!
//! ## Page Layers
//!
//! Each page is drawn bottom to top:
//!
//! ```text
//! layer 0            paper color fill
//! layer 1..=N        bitmap layers in order, except
//! layer == textlayer the text layer (page text, then text boxes)
//! ```
//!
//! `N` is the notebook's `displayedlayers`. The text layer takes a layer slot
//! only when the notebook has any text at all, and is drawn only when
//! `displaytextlayer` is set. Bitmap layers are consumed in file order
//! (`pageN.png`, `pageN_2.png`, ...) regardless of where the text layer sits.
//!
//! ## Error Recovery
//!
//! A text element whose style records fail to compile is skipped with a
//! warning; its siblings and the rest of the page still render. Any other
//! error aborts the notebook.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::color;
use crate::error::Result;
use crate::notebook::{Notebook, Page};
use crate::pdf::{PageCanvas, PageImage, PdfDocument};
use crate::render::{PageGeometry, RenderConfig, render_text};

/// Render every page of `notebook` and serialize the document.
///
/// Pages render in parallel and land in page-number order.
pub fn notebook_to_pdf(notebook: &Notebook, config: &RenderConfig) -> Result<Vec<u8>> {
    let geometry = PageGeometry::for_notebook(&notebook.settings, config);

    let pages: Vec<PageCanvas> = notebook
        .pages
        .par_iter()
        .map(|page| draw_page(notebook, page, config, &geometry))
        .collect::<Result<_>>()?;

    let mut doc = PdfDocument::new(notebook.name.clone(), geometry.width, geometry.height);
    for page in pages {
        doc.push_page(page);
    }
    doc.to_bytes()
}

/// Convert `notebook` and write `<name>.pdf` into `out_dir`.
pub fn write_notebook(notebook: &Notebook, config: &RenderConfig, out_dir: &Path) -> Result<PathBuf> {
    let bytes = notebook_to_pdf(notebook, config)?;
    let path = out_dir.join(format!("{}.pdf", notebook.name));
    fs::write(&path, bytes)?;
    log::info!("wrote {}", path.display());
    Ok(path)
}

/// Draw one page onto a fresh canvas.
pub fn draw_page(
    notebook: &Notebook,
    page: &Page,
    config: &RenderConfig,
    geometry: &PageGeometry,
) -> Result<PageCanvas> {
    let settings = &notebook.settings;
    let mut canvas = PageCanvas::new(geometry.width, geometry.height);
    canvas.fill_background(color::decode(settings.paper_color));

    let mut bitmaps = page.image_layers.iter();
    for layer in 1..=settings.displayed_layers {
        if notebook.have_text_layer && settings.text_layer == layer {
            if settings.display_text {
                draw_text_layer(notebook, page, config, geometry, &mut canvas)?;
            }
            continue;
        }
        match bitmaps.next() {
            Some(path) => canvas.draw_image(PageImage::open(path)?),
            None => log::warn!(
                "{}: page {} has no bitmap for layer {}",
                notebook.name,
                page.number,
                layer
            ),
        }
    }

    log::info!("{}: drew page {}", notebook.name, page.number);
    Ok(canvas)
}

fn draw_text_layer(
    notebook: &Notebook,
    page: &Page,
    config: &RenderConfig,
    geometry: &PageGeometry,
    canvas: &mut PageCanvas,
) -> Result<()> {
    for text in page.text_elements() {
        match render_text(text, &notebook.settings, config, geometry, canvas) {
            Ok(_) => {}
            Err(e) if e.is_element_local() => {
                log::warn!(
                    "{}: page {}: skipping {}: {}",
                    notebook.name,
                    page.number,
                    text.name,
                    e
                );
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notebook::settings::tests::NOTEBOOK_XML;
    use image::{Rgba, RgbaImage};

    fn blank_png(path: &Path) {
        RgbaImage::from_pixel(4, 6, Rgba([255, 255, 255, 0]))
            .save(path)
            .unwrap();
    }

    /// Notebook with two pages. Page 1 has two bitmaps and text.
    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("notebook.xml"), NOTEBOOK_XML).unwrap();
        blank_png(&root.join("page1.png"));
        blank_png(&root.join("page1_2.png"));
        blank_png(&root.join("page2.png"));
        fs::write(root.join("text1.txt"), "Hello World").unwrap();
        fs::write(root.join("text1.style"), "stylexor 1 0 5 0\n").unwrap();
        dir
    }

    fn page_content(canvas: PageCanvas) -> String {
        String::from_utf8_lossy(&canvas.into_parts().0).into_owned()
    }

    #[test]
    fn test_text_layer_sits_between_bitmaps() {
        let dir = fixture();
        let notebook = Notebook::open(dir.path()).unwrap();
        let config = RenderConfig::DEFAULT;
        let geometry = PageGeometry::for_notebook(&notebook.settings, &config);

        // layers 3, textlayer 2: bitmap, text, bitmap
        let text = page_content(draw_page(&notebook, &notebook.pages[0], &config, &geometry).unwrap());
        let im1 = text.find("/Im1 Do").unwrap();
        let bt = text.find("BT").unwrap();
        let im2 = text.find("/Im2 Do").unwrap();
        assert!(im1 < bt && bt < im2);
        assert!(text.contains("(Hello) Tj"));
        assert!(text.contains("( World) Tj"));
    }

    #[test]
    fn test_missing_bitmap_is_skipped() {
        let dir = fixture();
        let notebook = Notebook::open(dir.path()).unwrap();
        let config = RenderConfig::DEFAULT;
        let geometry = PageGeometry::for_notebook(&notebook.settings, &config);

        let canvas = draw_page(&notebook, &notebook.pages[1], &config, &geometry).unwrap();
        assert_eq!(canvas.images().len(), 1);
    }

    #[test]
    fn test_hidden_text_layer() {
        let dir = fixture();
        let xml = NOTEBOOK_XML.replace(
            "<displaytextlayer>1</displaytextlayer>",
            "<displaytextlayer>0</displaytextlayer>",
        );
        fs::write(dir.path().join("notebook.xml"), xml).unwrap();
        let notebook = Notebook::open(dir.path()).unwrap();
        let config = RenderConfig::DEFAULT;
        let geometry = PageGeometry::for_notebook(&notebook.settings, &config);

        let canvas = draw_page(&notebook, &notebook.pages[0], &config, &geometry).unwrap();
        // The text slot is still reserved, so only two bitmaps are drawn
        assert_eq!(canvas.images().len(), 2);
        assert!(!page_content(canvas).contains("BT"));
    }

    #[test]
    fn test_bad_text_element_is_skipped() {
        let dir = fixture();
        fs::write(dir.path().join("text1_1.txt"), "boxed").unwrap();
        fs::write(dir.path().join("text1_1.style"), "frobnicate 1 0 3 0\n").unwrap();
        fs::write(dir.path().join("text1_2.txt"), "second").unwrap();
        let notebook = Notebook::open(dir.path()).unwrap();
        let config = RenderConfig::DEFAULT;
        let geometry = PageGeometry::for_notebook(&notebook.settings, &config);

        let text = page_content(draw_page(&notebook, &notebook.pages[0], &config, &geometry).unwrap());
        assert!(text.contains("(Hello) Tj"));
        assert!(!text.contains("(boxed) Tj"));
        assert!(text.contains("(second) Tj"));
    }

    #[test]
    fn test_write_notebook() {
        let dir = fixture();
        let out = tempfile::tempdir().unwrap();
        let notebook = Notebook::open(dir.path()).unwrap();

        let path = write_notebook(&notebook, &RenderConfig::DEFAULT, out.path()).unwrap();
        assert_eq!(path, out.path().join(format!("{}.pdf", notebook.name)));
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(String::from_utf8_lossy(&bytes).contains("/Count 2"));
    }
}
