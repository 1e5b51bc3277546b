//! Notebook pages.
//!
//! A page exists while `page{n}.png` exists. Everything else is optional:
//!
//! ```text
//! page3.png, page3_2.png, page3_3.png ...   image layers (bottom to top)
//! text3.txt                                  page text
//! text3_1.txt, text3_2.txt ...               text boxes
//! key3.txt                                   keywords, one per line
//! ```

use std::path::{Path, PathBuf};

use super::text::TextElement;
use crate::error::Result;

/// One notebook page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page number
    pub number: u32,
    pub image_layers: Vec<PathBuf>,
    pub text: Option<TextElement>,
    pub text_boxes: Vec<TextElement>,
    pub keywords: Vec<String>,
}

impl Page {
    /// Load page `number` from a notebook directory.
    ///
    /// Returns `Ok(None)` when the page does not exist.
    pub fn open(root: &Path, number: u32) -> Result<Option<Self>> {
        let background = root.join(format!("page{}.png", number));
        if !background.is_file() {
            return Ok(None);
        }

        let mut image_layers = vec![background];
        for layer in 2.. {
            let path = root.join(format!("page{}_{}.png", number, layer));
            if !path.is_file() {
                break;
            }
            image_layers.push(path);
        }

        let text_base = root.join(format!("text{}", number));
        let text = if TextElement::exists(&text_base) {
            Some(TextElement::load(&text_base)?)
        } else {
            None
        };

        let mut text_boxes = Vec::new();
        for index in 1.. {
            let box_base = root.join(format!("text{}_{}", number, index));
            if !TextElement::exists(&box_base) {
                break;
            }
            text_boxes.push(TextElement::load(&box_base)?);
        }

        let key_path = root.join(format!("key{}.txt", number));
        let keywords = if key_path.is_file() {
            std::fs::read_to_string(&key_path)?
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            Vec::new()
        };

        Ok(Some(Self {
            number,
            image_layers,
            text,
            text_boxes,
            keywords,
        }))
    }

    /// Page text first, then text boxes in order.
    pub fn text_elements(&self) -> impl Iterator<Item = &TextElement> {
        self.text.iter().chain(self.text_boxes.iter())
    }

    /// Whether this page has any text at all.
    pub fn has_text(&self) -> bool {
        self.text.is_some() || !self.text_boxes.is_empty()
    }
}
