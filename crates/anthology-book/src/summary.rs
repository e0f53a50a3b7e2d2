//! `SUMMARY.md` manifest parser.
//!
//! The manifest is ordinary markdown with a fixed shape:
//!
//! ```markdown
//! # Summary
//!
//! [Foreword](foreword.md)
//!
//! # Fundamentals
//!
//! - [Ownership](ownership.md)
//!     - [Borrowing](borrowing.md)
//! - [Coming soon]()
//!
//! ---
//!
//! [Contributors](contributors.md)
//! ```
//!
//! A leading level-1 heading is the title. Links before the first list are
//! prefix chapters, links after the last list are suffix chapters; neither
//! is numbered. List items are numbered chapters, nesting gives
//! sub-chapters. Later level-1 headings are part titles and `---` is a
//! separator. An empty link target marks a draft chapter.

use std::fmt;
use std::path::{Component, PathBuf};

use percent_encoding::percent_decode_str;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

/// A parsed manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Leading `# Title`, if any
    pub title: Option<String>,

    /// Top-level entries in book order
    pub items: Vec<SummaryItem>,
}

/// A top-level manifest entry.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryItem {
    Link(SummaryLink),
    PartTitle(String),
    Separator,
}

/// A reference to a chapter.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLink {
    /// Link text, shown in navigation
    pub name: String,

    /// Path relative to the source directory; `None` for drafts
    pub location: Option<PathBuf>,

    /// Section number; `None` for prefix and suffix chapters
    pub number: Option<SectionNumber>,

    /// Sub-chapters
    pub nested: Vec<SummaryLink>,
}

/// Dotted section number such as `2.1.`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionNumber(pub Vec<u32>);

impl fmt::Display for SectionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for n in &self.0 {
            write!(f, "{}.", n)?;
        }
        Ok(())
    }
}

impl Summary {
    /// Every chapter link, depth-first in reading order.
    pub fn links(&self) -> Vec<&SummaryLink> {
        fn walk<'a>(link: &'a SummaryLink, out: &mut Vec<&'a SummaryLink>) {
            out.push(link);
            for child in &link.nested {
                walk(child, out);
            }
        }

        let mut out = Vec::new();
        for item in &self.items {
            if let SummaryItem::Link(link) = item {
                walk(link, &mut out);
            }
        }
        out
    }
}

impl SummaryLink {
    /// Whether the chapter is listed but not written yet.
    pub fn is_draft(&self) -> bool {
        self.location.is_none()
    }
}

/// Errors that can occur when parsing a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("SUMMARY.md line {line}: {message}")]
    Parse { line: usize, message: String },
}

fn error(line: usize, message: impl Into<String>) -> ManifestError {
    ManifestError::Parse {
        line,
        message: message.into(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Prefix,
    Numbered,
    Suffix,
}

/// A list item being assembled.
struct PendingItem {
    line: usize,
    name: Option<String>,
    location: Option<PathBuf>,
    stray_text: String,
    nested: Vec<SummaryLink>,
}

impl PendingItem {
    fn new(line: usize) -> Self {
        Self {
            line,
            name: None,
            location: None,
            stray_text: String::new(),
            nested: Vec::new(),
        }
    }

    fn finish(self) -> Result<SummaryLink, ManifestError> {
        let Some(name) = self.name else {
            return Err(error(
                self.line,
                format!(
                    "list item `{}` does not link to a chapter",
                    self.stray_text.trim()
                ),
            ));
        };

        Ok(SummaryLink {
            name,
            location: self.location,
            number: None,
            nested: self.nested,
        })
    }
}

/// A link whose text is being collected.
struct OpenLink {
    line: usize,
    dest: String,
    text: String,
}

/// Parse a `SUMMARY.md` manifest.
pub fn parse_summary(source: &str) -> Result<Summary, ManifestError> {
    let mut title = None;
    let mut items = Vec::new();
    let mut section = Section::Prefix;
    let mut seen_entry = false;
    let mut list_depth = 0usize;
    let mut numbered = 0u32;

    let mut pending: Vec<PendingItem> = Vec::new();
    let mut heading: Option<(HeadingLevel, usize, String)> = None;
    let mut link: Option<OpenLink> = None;

    for (event, range) in Parser::new(source).into_offset_iter() {
        let line = line_of(source, range.start);

        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                if list_depth > 0 {
                    return Err(error(line, "headings are not allowed inside a chapter list"));
                }
                heading = Some((level, line, String::new()));
            }

            Event::End(TagEnd::Heading(_)) => {
                let Some((level, line, text)) = heading.take() else {
                    continue;
                };
                let text = text.trim().to_string();

                if level != HeadingLevel::H1 {
                    return Err(error(line, "only level-1 headings are allowed"));
                }

                if !seen_entry && title.is_none() {
                    title = Some(text);
                    continue;
                }

                if section == Section::Suffix {
                    return Err(error(line, "part titles cannot follow suffix chapters"));
                }
                section = Section::Numbered;
                seen_entry = true;
                items.push(SummaryItem::PartTitle(text));
            }

            Event::Start(Tag::List(_)) => {
                if list_depth == 0 {
                    if section == Section::Suffix {
                        return Err(error(line, "numbered chapters cannot follow suffix chapters"));
                    }
                    section = Section::Numbered;
                    seen_entry = true;
                }
                list_depth += 1;
            }

            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
            }

            Event::Start(Tag::Item) => {
                pending.push(PendingItem::new(line));
            }

            Event::End(TagEnd::Item) => {
                let Some(item) = pending.pop() else {
                    continue;
                };
                let mut finished = item.finish()?;

                match pending.last_mut() {
                    Some(parent) => parent.nested.push(finished),
                    None => {
                        numbered += 1;
                        assign_numbers(&mut finished, SectionNumber(vec![numbered]));
                        items.push(SummaryItem::Link(finished));
                    }
                }
            }

            Event::Start(Tag::Link { dest_url, .. }) => {
                if heading.is_none() {
                    link = Some(OpenLink {
                        line,
                        dest: dest_url.to_string(),
                        text: String::new(),
                    });
                }
            }

            Event::End(TagEnd::Link) => {
                let Some(open) = link.take() else {
                    continue;
                };
                let location = parse_location(&open.dest, open.line)?;
                let name = open.text.trim().to_string();

                if list_depth > 0 {
                    let Some(item) = pending.last_mut() else {
                        continue;
                    };
                    if item.name.is_some() {
                        return Err(error(open.line, "a list item may only link to one chapter"));
                    }
                    item.name = Some(name);
                    item.location = location;
                } else {
                    if section == Section::Numbered {
                        section = Section::Suffix;
                    }
                    seen_entry = true;
                    items.push(SummaryItem::Link(SummaryLink {
                        name,
                        location,
                        number: None,
                        nested: Vec::new(),
                    }));
                }
            }

            Event::Text(text) | Event::Code(text) => {
                if let Some(open) = link.as_mut() {
                    open.text.push_str(&text);
                } else if let Some((_, _, heading_text)) = heading.as_mut() {
                    heading_text.push_str(&text);
                } else if let Some(item) = pending.last_mut() {
                    item.stray_text.push_str(&text);
                } else if !text.trim().is_empty() {
                    return Err(error(
                        line,
                        format!("expected a link to a chapter, found `{}`", text.trim()),
                    ));
                }
            }

            Event::SoftBreak | Event::HardBreak => {
                if let Some(open) = link.as_mut() {
                    open.text.push(' ');
                }
            }

            Event::Rule => {
                if list_depth == 0 {
                    seen_entry = true;
                    items.push(SummaryItem::Separator);
                }
            }

            _ => {}
        }
    }

    Ok(Summary { title, items })
}

fn assign_numbers(link: &mut SummaryLink, number: SectionNumber) {
    for (index, child) in link.nested.iter_mut().enumerate() {
        let mut child_number = number.clone();
        child_number.0.push(index as u32 + 1);
        assign_numbers(child, child_number);
    }
    link.number = Some(number);
}

fn parse_location(dest: &str, line: usize) -> Result<Option<PathBuf>, ManifestError> {
    let dest = dest.trim();
    if dest.is_empty() {
        return Ok(None);
    }

    if dest.contains("://") || dest.starts_with('/') {
        return Err(error(
            line,
            format!("chapter `{}` must be a path relative to the source directory", dest),
        ));
    }

    let dest = dest.strip_prefix("./").unwrap_or(dest);
    let location = PathBuf::from(percent_decode_str(dest).decode_utf8_lossy().as_ref());

    // Chapters render to the same relative path under the output directory.
    let escapes = location
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(error(
            line,
            format!("chapter `{}` must stay inside the source directory", dest),
        ));
    }

    Ok(Some(location))
}

fn line_of(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())].matches('\n').count() + 1
}
