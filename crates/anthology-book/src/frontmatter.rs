//! Frontmatter extraction and parsing.

use serde::{Deserialize, Serialize};

/// Parsed frontmatter from a chapter file.
///
/// Every field is optional: curated articles often arrive without any
/// metadata, and the manifest link text is enough to title a chapter.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Frontmatter {
    /// Chapter title, overrides the first heading
    #[serde(default)]
    pub title: Option<String>,

    /// Short summary, used in the search index
    #[serde(default)]
    pub description: Option<String>,

    /// Original author of the article
    #[serde(default)]
    pub author: Option<String>,

    /// Where the article was first published
    #[serde(default)]
    pub source: Option<String>,

    /// License the article is republished under
    #[serde(default)]
    pub license: Option<String>,

    /// Original publication date, free-form
    #[serde(default)]
    pub published: Option<String>,
}

/// Who wrote a chapter and under what terms it is included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribution {
    pub author: Option<String>,
    pub source: Option<String>,
    pub license: Option<String>,
    pub published: Option<String>,
}

impl Frontmatter {
    /// Attribution metadata, or `None` when the chapter declares none.
    pub fn attribution(&self) -> Option<Attribution> {
        if self.author.is_none()
            && self.source.is_none()
            && self.license.is_none()
            && self.published.is_none()
        {
            return None;
        }

        Some(Attribution {
            author: self.author.clone(),
            source: self.source.clone(),
            license: self.license.clone(),
            published: self.published.clone(),
        })
    }
}

/// Extract frontmatter from chapter source.
///
/// Returns the parsed frontmatter and the remaining content after the frontmatter block.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    // The opening fence is a whole `---` line with YAML right below it; a
    // blank line after it means a thematic break.
    let Some(after_open) = strip_fence_line(trimmed) else {
        return Ok((None, source));
    };
    if after_open.starts_with('\n') || after_open.starts_with("\r\n") {
        return Ok((None, source));
    }

    // Find the closing --- line
    let mut offset = 0;
    let mut close = None;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            close = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }
    let Some((close_start, close_end)) = close else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_start].trim();
    let remaining = &after_open[close_end..];

    let frontmatter = if yaml_content.is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    Ok((Some(frontmatter), remaining.trim_start()))
}

fn strip_fence_line(text: &str) -> Option<&str> {
    text.strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}
