//! Chapter document parser.

use std::collections::HashMap;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::frontmatter::{extract_frontmatter, Attribution, Frontmatter, FrontmatterError};

/// A parsed chapter.
#[derive(Debug, Clone)]
pub struct Document {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Headings in document order, with unique anchor ids
    pub headings: Vec<Heading>,
}

/// A heading inside a chapter.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    /// Heading text
    pub title: String,
    /// Anchor ID, unique within the chapter
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Errors that can occur when parsing a chapter.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

impl Document {
    /// The chapter's own title: frontmatter first, then the first level-1 heading.
    pub fn title(&self) -> Option<&str> {
        self.frontmatter
            .as_ref()
            .and_then(|f| f.title.as_deref())
            .or_else(|| {
                self.headings
                    .iter()
                    .find(|h| h.level == 1)
                    .map(|h| h.title.as_str())
            })
    }

    /// Attribution declared in the frontmatter.
    pub fn attribution(&self) -> Option<Attribution> {
        self.frontmatter.as_ref().and_then(Frontmatter::attribution)
    }
}

/// Markdown extensions enabled for every chapter.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Parse a chapter.
///
/// Extracts frontmatter and collects headings for the in-page outline.
pub fn parse_document(source: &str) -> Result<Document, DocumentError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    let mut headings = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut current_heading: Option<(u8, String)> = None;

    for event in Parser::new_ext(content, markdown_options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((heading_level(level), String::new()));
            }

            Event::Text(text) | Event::Code(text) => {
                if let Some((_, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&text);
                }
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current_heading.take() {
                    let id = unique_id(&mut seen, slugify(&title));
                    headings.push(Heading { title, id, level });
                }
            }

            _ => {}
        }
    }

    Ok(Document {
        frontmatter,
        content: content.to_string(),
        headings,
    })
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Suffix repeated slugs with a counter: `intro`, `intro-1`, `intro-2`.
fn unique_id(seen: &mut HashMap<String, usize>, slug: String) -> String {
    let slug = if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    };

    let count = seen.entry(slug.clone()).or_insert(0);
    let id = if *count == 0 {
        slug
    } else {
        format!("{}-{}", slug, count)
    };
    *count += 1;
    id
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
