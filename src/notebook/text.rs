//! Text elements: the page text layer and text boxes.
//!
//! Each element is a group of files sharing a base name:
//!
//! | File | Contents |
//! |------|----------|
//! | `text3.txt` / `text3_1.txt` | the text itself |
//! | `.box` | x, y, width, height (one per line, normalized) |
//! | `.style` | style records, one per line |

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{LnPdfError, Result};
use crate::ir::StyleRecord;

/// Position and size of a text box, normalized to the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextFrame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl TextFrame {
    /// Parse a `.box` file: four numbers, one per line.
    pub fn parse(text: &str) -> Option<Self> {
        let mut values = text.lines().map(|line| line.trim().parse::<f32>());
        let mut next = || values.next()?.ok();
        Some(Self {
            x: next()?,
            y: next()?,
            width: next()?,
            height: next()?,
        })
    }
}

/// A run of text with optional frame and style records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextElement {
    /// Base file name, used in log messages
    pub name: String,
    pub content: String,
    pub frame: Option<TextFrame>,
    pub style: Vec<StyleRecord>,
}

impl TextElement {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_frame(mut self, frame: TextFrame) -> Self {
        self.frame = Some(frame);
        self
    }

    pub fn with_style(mut self, style: Vec<StyleRecord>) -> Self {
        self.style = style;
        self
    }

    /// Whether `<base>.txt` exists.
    pub fn exists(base: &Path) -> bool {
        with_extension(base, "txt").is_file()
    }

    /// Load `<base>.txt` plus the optional `.box` and `.style` files.
    pub fn load(base: &Path) -> Result<Self> {
        let name = base
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content = std::fs::read_to_string(with_extension(base, "txt"))?;

        let box_path = with_extension(base, "box");
        let frame = if box_path.is_file() {
            let text = std::fs::read_to_string(&box_path)?;
            Some(TextFrame::parse(&text).ok_or_else(|| {
                LnPdfError::Notebook(format!("{}: expected four numbers", box_path.display()))
            })?)
        } else {
            None
        };

        let style_path = with_extension(base, "style");
        let style = if style_path.is_file() {
            parse_style(&std::fs::read_to_string(&style_path)?)
        } else {
            Vec::new()
        };

        Ok(Self {
            name,
            content,
            frame,
            style,
        })
    }

    /// Explicit origin from the `.box` file, if any.
    pub fn origin(&self) -> Option<(f32, f32)> {
        self.frame.map(|f| (f.x, f.y))
    }

    /// Length in characters (style offsets count characters).
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Split a `.style` file into records. Blank lines are skipped.
pub fn parse_style(text: &str) -> Vec<StyleRecord> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| StyleRecord::from_line(i + 1, line))
        .collect()
}

/// `base` + `.ext`, without touching dots already in the base name.
fn with_extension(base: &Path, ext: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(".");
    path.push(ext);
    PathBuf::from(path)
}
