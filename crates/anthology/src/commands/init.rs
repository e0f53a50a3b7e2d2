//! Scaffold a new anthology.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command in the current directory.
pub fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing anthology...");

    scaffold(Path::new("."), yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'anthology build' to render the book.");

    Ok(())
}

/// Write the starter files under `root`.
///
/// Existing files are kept unless `overwrite` is set.
pub fn scaffold(root: &Path, overwrite: bool) -> Result<()> {
    let src_dir = root.join("src");

    if src_dir.exists() && !overwrite {
        tracing::warn!("src/ directory already exists. Use --yes to overwrite.");
        return Ok(());
    }

    fs::create_dir_all(src_dir.join("articles")).context("Failed to create src directory")?;

    let files = [
        ("anthology.toml", DEFAULT_CONFIG),
        ("src/SUMMARY.md", DEFAULT_SUMMARY),
        ("src/introduction.md", DEFAULT_INTRODUCTION),
        ("src/articles/first-article.md", DEFAULT_ARTICLE),
    ];

    for (rel, content) in files {
        let path = root.join(rel);
        if path.exists() && !overwrite {
            tracing::debug!("Keeping existing {}", rel);
            continue;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", rel))?;
        tracing::info!("Created {}", rel);
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Anthology Configuration

[book]
title = "My Anthology"
authors = []
src = "src"
language = "en"

[build]
# Output root; the book lands in <output>/<volume>/
output = "_book"
volume = "1"

# "html" for the built-in renderer, "command" to run an external tool
renderer = "html"
command = ["mdbook", "build", "--dest-dir", "{dest}"]
minify = true

[publish]
canonical_branch = "master"
hosting_branch = "gh-pages"
remote_url = "https://{token}@github.com/{slug}.git"
"#;

const DEFAULT_SUMMARY: &str = r#"# Summary

[Introduction](introduction.md)

# Articles

- [A First Article](articles/first-article.md)
"#;

const DEFAULT_INTRODUCTION: &str = r#"# Introduction

This anthology collects articles written elsewhere. Each chapter credits
its author and links back to where it was first published.

Add a chapter by placing a markdown file under `src/` and listing it in
`src/SUMMARY.md`.
"#;

const DEFAULT_ARTICLE: &str = r#"---
title: A First Article
author: Jane Doe
source: https://example.com/blog/first-article
license: CC BY 4.0
published: "2024-01-01"
---

# A First Article

Replace this text with the article you want to include.

The frontmatter above is shown as an attribution footer below the chapter.
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use anthology_static::StaticBuilder;
    use tempfile::tempdir;

    #[test]
    fn scaffold_builds_into_a_book() {
        let temp = tempdir().unwrap();

        scaffold(temp.path(), false).unwrap();

        let loaded = load_config(&temp.path().join("anthology.toml")).unwrap();
        assert_eq!(loaded.file.book.title, "My Anthology");

        let result = StaticBuilder::new(loaded.build_config(None, None))
            .build()
            .unwrap();

        let out = temp.path().join("_book");
        assert_eq!(result.output_dir, out);
        assert!(out.join("index.html").exists());
        assert!(out.join("1/index.html").exists());

        let article = fs::read_to_string(out.join("1/articles/first-article.html")).unwrap();
        assert!(article.contains("Jane Doe"));
    }

    #[test]
    fn keeps_existing_files_without_overwrite() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/SUMMARY.md"), "- [Mine](mine.md)\n").unwrap();

        scaffold(temp.path(), false).unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("src/SUMMARY.md")).unwrap(),
            "- [Mine](mine.md)\n"
        );
        assert!(!temp.path().join("anthology.toml").exists());
    }

    #[test]
    fn overwrite_replaces_files() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/SUMMARY.md"), "- [Mine](mine.md)\n").unwrap();

        scaffold(temp.path(), true).unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("src/SUMMARY.md")).unwrap(),
            DEFAULT_SUMMARY
        );
    }
}
