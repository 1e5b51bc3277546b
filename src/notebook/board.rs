//! Notebook boards and folders.
//!
//! A board is the LectureNotes data directory (marked by `settings.xml`).
//! It holds notebooks (`notebook.xml`) and folders (`folder.xml`), and
//! folders nest.

use std::path::{Path, PathBuf};

use super::{Notebook, locate};
use crate::error::{LnPdfError, Result};

/// A child of a board or folder.
#[derive(Debug, Clone)]
pub enum Entry {
    Notebook(Notebook),
    Folder(Folder),
}

/// Top-level notebooks board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub root: PathBuf,
}

impl Board {
    pub const MARKER: &'static str = "settings.xml";

    pub fn is_board(path: &Path) -> bool {
        locate(path, Self::MARKER).is_some()
    }

    /// Open a board directory, or the path of its `settings.xml`.
    pub fn open(path: &Path) -> Result<Self> {
        let root = locate(path, Self::MARKER).ok_or_else(|| {
            LnPdfError::Notebook(format!("{} is not a notebooks board", path.display()))
        })?;
        Ok(Self { root })
    }

    pub fn children(&self) -> Result<Vec<Entry>> {
        children_of(&self.root)
    }

    /// Every notebook on the board, folders included.
    pub fn all_notebooks(&self) -> Result<Vec<Notebook>> {
        let mut notebooks = Vec::new();
        collect_notebooks(&self.root, &mut notebooks)?;
        Ok(notebooks)
    }
}

/// A folder of notebooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub root: PathBuf,
}

impl Folder {
    pub const MARKER: &'static str = "folder.xml";

    pub fn open(path: &Path) -> Result<Self> {
        let root = locate(path, Self::MARKER).ok_or_else(|| {
            LnPdfError::Notebook(format!("{} is not a notebook folder", path.display()))
        })?;
        Ok(Self { root })
    }

    pub fn children(&self) -> Result<Vec<Entry>> {
        children_of(&self.root)
    }
}

/// Sub-notebooks and sub-folders, sorted by directory name.
fn children_of(root: &Path) -> Result<Vec<Entry>> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    let mut entries = Vec::new();
    for dir in dirs {
        if dir.join(Notebook::MARKER).is_file() {
            entries.push(Entry::Notebook(Notebook::open(&dir)?));
        } else if dir.join(Folder::MARKER).is_file() {
            entries.push(Entry::Folder(Folder { root: dir }));
        }
    }
    Ok(entries)
}

fn collect_notebooks(root: &Path, out: &mut Vec<Notebook>) -> Result<()> {
    for entry in children_of(root)? {
        match entry {
            Entry::Notebook(notebook) => out.push(notebook),
            Entry::Folder(folder) => collect_notebooks(&folder.root, out)?,
        }
    }
    Ok(())
}
