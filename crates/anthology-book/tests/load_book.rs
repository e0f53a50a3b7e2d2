use std::fs;
use std::path::{Path, PathBuf};

use anthology_book::{load_book, BookError, BookItem};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn loads_chapters_in_manifest_order() {
    let temp = tempdir().unwrap();
    let src = temp.path();

    write(
        src,
        "SUMMARY.md",
        r#"# Summary

[Introduction](intro.md)

# Articles

- [Why Ownership](articles/ownership.md)
    - [Borrowing](articles/borrowing.md)
- [Unwritten]()
"#,
    );
    write(src, "intro.md", "# Welcome\n\nHello.");
    write(
        src,
        "articles/ownership.md",
        "---\ntitle: Ownership, Explained\nauthor: A. Writer\nsource: https://blog.example/ownership\n---\n# Ownership\n",
    );
    write(src, "articles/borrowing.md", "Borrowing without a heading.");

    let book = load_book(src).unwrap();

    assert_eq!(book.title.as_deref(), Some("Summary"));
    assert!(matches!(book.items[1], BookItem::PartTitle(ref t) if t == "Articles"));

    let titles: Vec<_> = book.chapters().iter().map(|c| c.title().to_string()).collect();
    assert_eq!(
        titles,
        vec!["Welcome", "Ownership, Explained", "Borrowing", "Unwritten"]
    );

    let written = book.written_chapters();
    assert_eq!(written.len(), 3);
    assert_eq!(
        written[2].path.as_deref(),
        Some(PathBuf::from("articles/borrowing.md").as_path())
    );
    assert_eq!(written[2].number.as_ref().unwrap().to_string(), "1.1.");

    let attribution = written[1].document.as_ref().unwrap().attribution().unwrap();
    assert_eq!(attribution.author.as_deref(), Some("A. Writer"));
}

#[test]
fn missing_manifest_is_reported() {
    let temp = tempdir().unwrap();

    let err = load_book(temp.path()).unwrap_err();

    assert!(matches!(err, BookError::MissingSummary(_)));
}

#[test]
fn missing_chapter_file_is_reported() {
    let temp = tempdir().unwrap();
    write(temp.path(), "SUMMARY.md", "- [Gone](gone.md)\n");

    let err = load_book(temp.path()).unwrap_err();

    match err {
        BookError::Read { path, .. } => assert!(path.ends_with("gone.md")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn bad_frontmatter_names_the_chapter() {
    let temp = tempdir().unwrap();
    write(temp.path(), "SUMMARY.md", "- [Broken](broken.md)\n");
    write(temp.path(), "broken.md", "---\ntitle: never closed\n");

    let err = load_book(temp.path()).unwrap_err();

    assert!(err.to_string().contains("broken.md"));
}
