//! Notebook metadata from `notebook.xml`.
//!
//! ```xml
//! <notebook>
//!   <paperwidth>2480</paperwidth>
//!   <paperheight>3508</paperheight>
//!   <papercolor>-1</papercolor>
//!   <textlayerfontfamily>1</textlayerfontfamily>
//!   <textlayerfontstyle>0</textlayerfontstyle>
//!   <textlayerfontsize>48</textlayerfontsize>
//!   <textlayerfontcolor>-16777216</textlayerfontcolor>
//!   <textlayerleftmargin>0.05</textlayerleftmargin>
//!   ...
//! </notebook>
//! ```
//!
//! Paper pattern and scale settings are ignored.

use std::path::Path;
use std::str::FromStr;

use roxmltree::Node;

use crate::color;
use crate::error::{LnPdfError, Result};
use crate::ir::Typeface;
use crate::render::RenderConfig;

/// Parsed `notebook.xml`.
#[derive(Debug, Clone, PartialEq)]
pub struct NotebookSettings {
    /// Paper width in notebook pixels
    pub paper_width: f32,
    /// Paper height in notebook pixels
    pub paper_height: f32,
    /// Packed ARGB
    pub paper_color: i32,

    pub font_family: i32,
    /// Default bold/italic bitmask
    pub font_style: u32,
    /// Stored font size (before the size correction factor)
    pub font_size: f32,
    /// Packed ARGB
    pub font_color: i32,

    // Text layer margins, normalized to the page
    pub margin_left: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,

    pub layers: u32,
    pub displayed_layers: u32,
    /// 1-based layer slot of the text layer
    pub text_layer: u32,
    pub display_text: bool,
}

impl NotebookSettings {
    /// Parse the contents of `notebook.xml`.
    pub fn parse(xml: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(xml).map_err(|e| LnPdfError::Xml(e.to_string()))?;
        let root = doc.root_element();

        Ok(Self {
            paper_width: field(root, "paperwidth")?,
            paper_height: field(root, "paperheight")?,
            paper_color: color_field(root, "papercolor")?,
            font_family: field(root, "textlayerfontfamily")?,
            font_style: field(root, "textlayerfontstyle")?,
            font_size: field(root, "textlayerfontsize")?,
            font_color: color_field(root, "textlayerfontcolor")?,
            margin_left: field(root, "textlayerleftmargin")?,
            margin_top: field(root, "textlayertopmargin")?,
            margin_right: field(root, "textlayerrightmargin")?,
            margin_bottom: field(root, "textlayerbottommargin")?,
            layers: field(root, "layers")?,
            displayed_layers: field(root, "displayedlayers")?,
            text_layer: field(root, "textlayer")?,
            display_text: field::<i32>(root, "displaytextlayer")? != 0,
        })
    }

    /// Read and parse a `notebook.xml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::parse(&xml).map_err(|e| match e {
            LnPdfError::Notebook(msg) => LnPdfError::Notebook(format!("{}: {}", path.display(), msg)),
            LnPdfError::Xml(msg) => LnPdfError::Xml(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Default typeface for text on this notebook.
    pub fn typeface(&self, config: &RenderConfig) -> Typeface {
        Typeface::from_family_code(self.font_family).unwrap_or(config.default_typeface)
    }
}

fn field_text<'a>(root: Node<'a, '_>, name: &str) -> Result<&'a str> {
    root.children()
        .find(|node| node.has_tag_name(name))
        .and_then(|node| node.text())
        .map(str::trim)
        .ok_or_else(|| LnPdfError::Notebook(format!("missing <{}>", name)))
}

fn field<T: FromStr>(root: Node<'_, '_>, name: &str) -> Result<T> {
    let text = field_text(root, name)?;
    text.parse()
        .map_err(|_| LnPdfError::Notebook(format!("bad <{}> value {:?}", name, text)))
}

fn color_field(root: Node<'_, '_>, name: &str) -> Result<i32> {
    let text = field_text(root, name)?;
    color::parse_packed(text)
        .ok_or_else(|| LnPdfError::Notebook(format!("bad <{}> color {:?}", name, text)))
}
