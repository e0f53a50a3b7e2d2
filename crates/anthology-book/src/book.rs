//! Loading a whole book from its source directory.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::{parse_document, Document, DocumentError};
use crate::summary::{parse_summary, ManifestError, SectionNumber, SummaryItem, SummaryLink};

/// Name of the manifest inside the source directory.
pub const SUMMARY_FILE: &str = "SUMMARY.md";

/// A loaded book: the manifest structure with every chapter parsed.
#[derive(Debug, Clone)]
pub struct Book {
    /// Manifest title, if the manifest has one
    pub title: Option<String>,

    /// Top-level entries in reading order
    pub items: Vec<BookItem>,
}

/// A top-level entry of a book.
#[derive(Debug, Clone)]
pub enum BookItem {
    Chapter(Chapter),
    PartTitle(String),
    Separator,
}

/// A chapter and its sub-chapters.
#[derive(Debug, Clone)]
pub struct Chapter {
    /// Manifest link text
    pub name: String,

    /// Section number, `None` for prefix and suffix chapters
    pub number: Option<SectionNumber>,

    /// Source path relative to the source directory; `None` for drafts
    pub path: Option<PathBuf>,

    /// Parsed content; `None` for drafts
    pub document: Option<Document>,

    pub sub_chapters: Vec<Chapter>,
}

impl Chapter {
    /// Page title: the document's own title, else the manifest link text.
    pub fn title(&self) -> &str {
        self.document
            .as_ref()
            .and_then(Document::title)
            .unwrap_or(&self.name)
    }

    pub fn is_draft(&self) -> bool {
        self.path.is_none()
    }
}

impl Book {
    /// Every chapter, depth-first in reading order, drafts included.
    pub fn chapters(&self) -> Vec<&Chapter> {
        fn walk<'a>(chapter: &'a Chapter, out: &mut Vec<&'a Chapter>) {
            out.push(chapter);
            for child in &chapter.sub_chapters {
                walk(child, out);
            }
        }

        let mut out = Vec::new();
        for item in &self.items {
            if let BookItem::Chapter(chapter) = item {
                walk(chapter, &mut out);
            }
        }
        out
    }

    /// Chapters that have content, in reading order.
    pub fn written_chapters(&self) -> Vec<&Chapter> {
        self.chapters()
            .into_iter()
            .filter(|c| !c.is_draft())
            .collect()
    }
}

/// Errors that can occur when loading a book.
#[derive(Debug, thiserror::Error)]
pub enum BookError {
    #[error("Manifest not found: {0}")]
    MissingSummary(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Failed to parse chapter {path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },
}

/// Load the book rooted at `src_dir`.
///
/// Reads `SUMMARY.md`, then every chapter it references. A missing chapter
/// file is an error; draft entries are kept without content.
pub fn load_book(src_dir: &Path) -> Result<Book, BookError> {
    let summary_path = src_dir.join(SUMMARY_FILE);
    if !summary_path.is_file() {
        return Err(BookError::MissingSummary(summary_path));
    }

    let source = read(&summary_path)?;
    let summary = parse_summary(&source)?;

    let mut seen = HashSet::new();
    for link in summary.links().into_iter().filter(|l| !l.is_draft()) {
        if let Some(location) = &link.location {
            if !seen.insert(location) {
                tracing::warn!(
                    "{} is listed more than once in {}",
                    location.display(),
                    SUMMARY_FILE
                );
            }
        }
    }

    let mut items = Vec::with_capacity(summary.items.len());

    for item in &summary.items {
        items.push(match item {
            SummaryItem::Link(link) => BookItem::Chapter(load_chapter(src_dir, link)?),
            SummaryItem::PartTitle(title) => BookItem::PartTitle(title.clone()),
            SummaryItem::Separator => BookItem::Separator,
        });
    }

    let book = Book {
        title: summary.title,
        items,
    };

    tracing::debug!(
        "Loaded {} chapters from {}",
        book.written_chapters().len(),
        src_dir.display()
    );

    Ok(book)
}

fn load_chapter(src_dir: &Path, link: &SummaryLink) -> Result<Chapter, BookError> {
    let document = match &link.location {
        Some(location) => {
            let path = src_dir.join(location);
            let source = read(&path)?;
            let document = parse_document(&source).map_err(|source| BookError::Document {
                path: path.clone(),
                source,
            })?;
            Some(document)
        }
        None => None,
    };

    let sub_chapters = link
        .nested
        .iter()
        .map(|child| load_chapter(src_dir, child))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Chapter {
        name: link.name.clone(),
        number: link.number.clone(),
        path: link.location.clone(),
        document,
        sub_chapters,
    })
}

fn read(path: &Path) -> Result<String, BookError> {
    fs::read_to_string(path).map_err(|source| BookError::Read {
        path: path.to_path_buf(),
        source,
    })
}
