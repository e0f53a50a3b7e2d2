//! Book model for anthology.
//!
//! An anthology is a set of markdown chapters ordered by a `SUMMARY.md`
//! manifest. This crate parses the manifest, parses each chapter (optional
//! YAML frontmatter carrying attribution, then markdown), and loads the whole
//! book from a source directory.

pub mod book;
pub mod document;
pub mod frontmatter;
pub mod summary;

pub use book::{load_book, Book, BookError, BookItem, Chapter, SUMMARY_FILE};
pub use document::{markdown_options, parse_document, slugify, Document, DocumentError, Heading};
pub use frontmatter::{Attribution, Frontmatter, FrontmatterError};
pub use summary::{parse_summary, ManifestError, SectionNumber, Summary, SummaryItem, SummaryLink};
