//! # Notebook Data Model
//!
//! Reads LectureNotes notebooks from disk.
//!
//! ## Directory Layout
//!
//! ```text
//! board/                   settings.xml
//! ├── physics/             notebook.xml, page1.png, text1.txt, ...
//! └── term1/               folder.xml
//!     └── maths/           notebook.xml, ...
//! ```
//!
//! ## Module Structure
//!
//! - [`board`]: boards and folders
//! - [`page`]: page discovery (image layers, text, keywords)
//! - [`settings`]: `notebook.xml`
//! - [`text`]: text elements and their `.box` / `.style` files

pub mod board;
pub mod page;
pub mod settings;
pub mod text;

pub use board::{Board, Entry, Folder};
pub use page::Page;
pub use settings::NotebookSettings;
pub use text::{TextElement, TextFrame};

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{LnPdfError, Result};

/// A notebook with all its pages loaded.
#[derive(Debug, Clone)]
pub struct Notebook {
    pub root: PathBuf,
    /// Directory name
    pub name: String,
    pub settings: NotebookSettings,
    pub pages: Vec<Page>,
    /// True when any page has page text or text boxes
    pub have_text_layer: bool,
}

impl Notebook {
    pub const MARKER: &'static str = "notebook.xml";

    pub fn is_notebook(path: &Path) -> bool {
        locate(path, Self::MARKER).is_some()
    }

    /// Open a notebook directory, or the path of its `notebook.xml`.
    pub fn open(path: &Path) -> Result<Self> {
        let root = locate(path, Self::MARKER).ok_or_else(|| {
            LnPdfError::Notebook(format!("{} is not a notebook", path.display()))
        })?;
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "notebook".to_string());

        let settings = NotebookSettings::load(&root.join(Self::MARKER))?;

        let mut pages = Vec::new();
        for number in 1.. {
            match Page::open(&root, number)? {
                Some(page) => pages.push(page),
                None => break,
            }
        }

        let have_text_layer = pages.iter().any(Page::has_text);
        log::debug!("{}: {} pages, text layer: {}", name, pages.len(), have_text_layer);

        Ok(Self {
            root,
            name,
            settings,
            pages,
            have_text_layer,
        })
    }

    /// Listing summary.
    pub fn summary(&self) -> NotebookSummary {
        NotebookSummary {
            name: self.name.clone(),
            root: self.root.display().to_string(),
            paper_width: self.settings.paper_width,
            paper_height: self.settings.paper_height,
            pages: self
                .pages
                .iter()
                .map(|page| PageSummary {
                    number: page.number,
                    bitmaps: page.image_layers.len(),
                    text: page.text.is_some(),
                    boxes: page.text_boxes.len(),
                    keywords: page.keywords.clone(),
                })
                .collect(),
        }
    }
}

/// Serializable notebook listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotebookSummary {
    pub name: String,
    pub root: String,
    pub paper_width: f32,
    pub paper_height: f32,
    pub pages: Vec<PageSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSummary {
    pub number: u32,
    pub bitmaps: usize,
    pub text: bool,
    pub boxes: usize,
    pub keywords: Vec<String>,
}

impl PageSummary {
    /// One listing line: `"name"<3> - bitmaps: 2 - text: Y - boxes: 1 - keywords: 0`.
    pub fn line(&self, notebook: &str) -> String {
        format!(
            "\"{}\"<{}> - bitmaps: {} - text: {} - boxes: {} - keywords: {}",
            notebook,
            self.number,
            self.bitmaps,
            if self.text { 'Y' } else { 'n' },
            self.boxes,
            self.keywords.len()
        )
    }
}

/// Resolve a directory containing `marker`, accepting the marker path itself.
pub(crate) fn locate(path: &Path, marker: &str) -> Option<PathBuf> {
    if path.file_name().is_some_and(|name| name == marker) && path.is_file() {
        return path.parent().map(Path::to_path_buf);
    }
    if path.is_dir() && path.join(marker).is_file() {
        return Some(path.to_path_buf());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notebook::settings::tests::NOTEBOOK_XML;
    use std::fs;

    fn notebook_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("notebook.xml"), NOTEBOOK_XML).unwrap();
        fs::write(root.join("page1.png"), b"").unwrap();
        fs::write(root.join("page1_2.png"), b"").unwrap();
        fs::write(root.join("page2.png"), b"").unwrap();
        fs::write(root.join("text2_1.txt"), "box").unwrap();
        fs::write(root.join("key2.txt"), "exam\n").unwrap();
        dir
    }

    #[test]
    fn test_open_notebook() {
        let dir = notebook_dir();
        let notebook = Notebook::open(dir.path()).unwrap();
        assert_eq!(notebook.pages.len(), 2);
        assert!(notebook.have_text_layer);
        assert_eq!(notebook.settings.paper_width, 1200.0);
    }

    #[test]
    fn test_open_via_notebook_xml() {
        let dir = notebook_dir();
        let notebook = Notebook::open(&dir.path().join("notebook.xml")).unwrap();
        assert_eq!(notebook.root, dir.path());
    }

    #[test]
    fn test_summary_lines() {
        let dir = notebook_dir();
        let mut notebook = Notebook::open(dir.path()).unwrap();
        notebook.name = "physics".into();
        let summary = notebook.summary();

        assert_eq!(
            summary.pages[0].line(&summary.name),
            "\"physics\"<1> - bitmaps: 2 - text: n - boxes: 0 - keywords: 0"
        );
        assert_eq!(
            summary.pages[1].line(&summary.name),
            "\"physics\"<2> - bitmaps: 1 - text: n - boxes: 1 - keywords: 1"
        );
    }

    #[test]
    fn test_summary_json() {
        let dir = notebook_dir();
        let summary = Notebook::open(dir.path()).unwrap().summary();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["pages"][1]["boxes"], 1);
        assert_eq!(json["pages"][1]["keywords"][0], "exam");
    }

    #[test]
    fn test_not_a_notebook() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!Notebook::is_notebook(dir.path()));
        let err = Notebook::open(dir.path()).unwrap_err();
        assert!(err.to_string().contains("is not a notebook"));
    }
}
