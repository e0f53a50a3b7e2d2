//! Built-in HTML renderer.

use std::fs;
use std::path::{Component, Path, PathBuf};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use pulldown_cmark::{html, CowStr, Event, Parser, Tag};
use walkdir::WalkDir;

use anthology_book::{load_book, markdown_options, Book, BookItem, Chapter, Document, SUMMARY_FILE};

use crate::assets::AssetPipeline;
use crate::builder::BuildError;
use crate::renderer::{RenderContext, Renderer};
use crate::templates::{Context, NavItem, PageLink, TemplateEngine, TocEntry};

/// Characters escaped in a URL path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Words of chapter text kept in the search index.
const SEARCH_EXCERPT_WORDS: usize = 60;

/// Renders the book with the built-in templates.
pub struct HtmlRenderer {
    templates: TemplateEngine,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self {
            templates: TemplateEngine::new(),
        }
    }

    fn render_page(
        &self,
        ctx: &RenderContext<'_>,
        book: &Book,
        chapter: &Chapter,
        page_path: &str,
        base: &str,
        nav: &[NavItem],
        previous: Option<&Chapter>,
        next: Option<&Chapter>,
    ) -> Result<String, BuildError> {
        let content = chapter
            .document
            .as_ref()
            .map(|doc| render_markdown(doc, base))
            .unwrap_or_default();

        let toc = chapter
            .document
            .as_ref()
            .map(|doc| {
                doc.headings
                    .iter()
                    .filter(|h| h.level > 1)
                    .map(|h| TocEntry {
                        title: h.title.clone(),
                        id: h.id.clone(),
                        level: h.level,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let context = Context {
            title: chapter.title().to_string(),
            book_title: book_title(ctx, book),
            description: ctx.config.description.clone(),
            language: ctx.config.language.clone(),
            content,
            nav: nav.to_vec(),
            toc,
            current: page_path.to_string(),
            path_to_root: path_to_root(page_path),
            previous: previous.and_then(page_link),
            next: next.and_then(page_link),
            attribution: chapter.document.as_ref().and_then(Document::attribution),
        };

        self.templates
            .render_chapter(&context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HtmlRenderer {
    fn name(&self) -> &str {
        "html"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<(), BuildError> {
        let book = load_book(&ctx.config.src_dir)?;
        let nav = build_navigation(&book);
        let chapters = book.written_chapters();

        let has_own_index = chapters
            .iter()
            .any(|c| chapter_url(c).as_deref() == Some("index.html"));

        for (index, chapter) in chapters.iter().enumerate() {
            let Some(page_path) = chapter_url(chapter) else {
                continue;
            };
            let previous = index.checked_sub(1).and_then(|i| chapters.get(i)).copied();
            let next = chapters.get(index + 1).copied();

            let html =
                self.render_page(ctx, &book, chapter, &page_path, "", &nav, previous, next)?;
            write_file(&ctx.dest.join(output_path(chapter)), &html)?;

            // The first chapter doubles as the book's entry page. Its body
            // links are relative to its own directory, so rebase them.
            if index == 0 && !has_own_index {
                let base = page_dir(&page_path);
                let html = self.render_page(
                    ctx,
                    &book,
                    chapter,
                    "index.html",
                    &base,
                    &nav,
                    previous,
                    next,
                )?;
                write_file(&ctx.dest.join("index.html"), &html)?;
            }

            tracing::debug!("Rendered {}", page_path);
        }

        self.write_assets(ctx)?;
        write_search_index(ctx.dest, &chapters)?;
        copy_static_files(&ctx.config.src_dir, ctx.dest)?;

        tracing::info!("Rendered {} chapters", chapters.len());

        Ok(())
    }
}

impl HtmlRenderer {
    fn write_assets(&self, ctx: &RenderContext<'_>) -> Result<(), BuildError> {
        let css = AssetPipeline::generate_css();
        let css = if ctx.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or(css)
        } else {
            css
        };

        write_file(&ctx.dest.join("assets").join("book.css"), &css)
    }
}

fn book_title(ctx: &RenderContext<'_>, book: &Book) -> String {
    if ctx.config.title.is_empty() {
        book.title.clone().unwrap_or_default()
    } else {
        ctx.config.title.clone()
    }
}

/// Build the sidebar from the manifest structure.
pub fn build_navigation(book: &Book) -> Vec<NavItem> {
    fn chapter_item(chapter: &Chapter) -> NavItem {
        NavItem {
            kind: "chapter",
            title: chapter.name.clone(),
            number: chapter.number.as_ref().map(|n| n.to_string()),
            path: chapter_url(chapter),
            children: chapter.sub_chapters.iter().map(chapter_item).collect(),
        }
    }

    book.items
        .iter()
        .map(|item| match item {
            BookItem::Chapter(chapter) => chapter_item(chapter),
            BookItem::PartTitle(title) => NavItem::part(title.clone()),
            BookItem::Separator => NavItem::separator(),
        })
        .collect()
}

fn page_link(chapter: &Chapter) -> Option<PageLink> {
    chapter_url(chapter).map(|path| PageLink {
        title: chapter.name.clone(),
        path,
    })
}

/// Output file of a chapter, relative to the book root.
fn output_path(chapter: &Chapter) -> PathBuf {
    chapter
        .path
        .as_ref()
        .map(|p| p.with_extension("html"))
        .unwrap_or_default()
}

/// Link to a chapter page relative to the book root; `None` for drafts.
fn chapter_url(chapter: &Chapter) -> Option<String> {
    chapter.path.as_ref().map(|p| url_path(&p.with_extension("html")))
}

/// Join path components with `/`, percent-encoding each segment.
pub fn url_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .map(|part| utf8_percent_encode(&part, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Directory part of `page_path` with a trailing `/`, empty at the root.
fn page_dir(page_path: &str) -> String {
    page_path
        .rsplit_once('/')
        .map(|(dir, _)| format!("{}/", dir))
        .unwrap_or_default()
}

/// `../` once per directory level of `page_path`.
fn path_to_root(page_path: &str) -> String {
    "../".repeat(page_path.matches('/').count())
}

/// Render chapter markdown, giving headings their anchor ids and pointing
/// links at other chapters to their rendered pages. Relative link and image
/// targets are prefixed with `base`.
fn render_markdown(document: &Document, base: &str) -> String {
    let mut heading_index = 0;

    let parser = Parser::new_ext(&document.content, markdown_options()).map(|event| match event {
        Event::Start(Tag::Heading {
            level,
            id,
            classes,
            attrs,
        }) => {
            let id = document
                .headings
                .get(heading_index)
                .map(|h| CowStr::from(h.id.clone()))
                .or(id);
            heading_index += 1;
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            })
        }
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: rewrite_link(dest_url, base),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: rebase(dest_url, base),
            title,
            id,
        }),
        other => other,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// `other.md#part` becomes `other.html#part`; external links are untouched.
fn rewrite_link<'a>(dest: CowStr<'a>, base: &str) -> CowStr<'a> {
    if !is_relative(&dest) {
        return dest;
    }

    let rewritten = {
        let target: &str = &dest;
        let (path, fragment) = match target.find('#') {
            Some(pos) => target.split_at(pos),
            None => (target, ""),
        };
        path.strip_suffix(".md")
            .map(|stem| format!("{}.html{}", stem, fragment))
    };

    let dest = match rewritten {
        Some(link) => CowStr::from(link),
        None => dest,
    };

    rebase(dest, base)
}

fn rebase<'a>(dest: CowStr<'a>, base: &str) -> CowStr<'a> {
    if base.is_empty() || !is_relative(&dest) {
        return dest;
    }
    CowStr::from(format!("{}{}", base, dest))
}

/// A path-relative URL: no scheme and no leading `/` or `#`.
fn is_relative(dest: &str) -> bool {
    let has_scheme = dest
        .split('/')
        .next()
        .is_some_and(|first| first.contains(':'));

    !(dest.is_empty() || dest.starts_with('#') || dest.starts_with('/') || has_scheme)
}

fn write_search_index(dest: &Path, chapters: &[&Chapter]) -> Result<(), BuildError> {
    let index: Vec<serde_json::Value> = chapters
        .iter()
        .filter_map(|chapter| {
            let path = chapter_url(chapter)?;
            let doc = chapter.document.as_ref()?;

            let author = doc.attribution().and_then(|a| a.author);
            let description = doc.frontmatter.as_ref().and_then(|f| f.description.clone());
            let headings: Vec<&str> = doc.headings.iter().map(|h| h.title.as_str()).collect();

            Some(serde_json::json!({
                "title": chapter.title(),
                "number": chapter.number.as_ref().map(|n| n.to_string()),
                "path": path,
                "author": author,
                "description": description,
                "headings": headings,
                "excerpt": excerpt(&doc.content),
            }))
        })
        .collect();

    let json =
        serde_json::to_string_pretty(&index).map_err(|e| BuildError::WriteError(e.to_string()))?;

    write_file(&dest.join("searchindex.json"), &json)
}

/// First words of a chapter's prose, code excluded.
fn excerpt(markdown: &str) -> String {
    let mut words = Vec::new();
    let mut in_code = false;

    for event in Parser::new_ext(markdown, markdown_options()) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code = true,
            Event::End(pulldown_cmark::TagEnd::CodeBlock) => in_code = false,
            Event::Text(text) if !in_code => {
                words.extend(text.split_whitespace().map(str::to_string));
            }
            _ => {}
        }
        if words.len() >= SEARCH_EXCERPT_WORDS {
            break;
        }
    }

    words.truncate(SEARCH_EXCERPT_WORDS);
    words.join(" ")
}

/// Copy images and other non-markdown files next to the rendered pages.
fn copy_static_files(src_dir: &Path, dest: &Path) -> Result<(), BuildError> {
    let walker = WalkDir::new(src_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.')
        });

    for entry in walker.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || path.starts_with(dest) {
            continue;
        }

        let is_markdown = path.extension().and_then(|e| e.to_str()) == Some("md");
        if is_markdown || path.file_name().and_then(|n| n.to_str()) == Some(SUMMARY_FILE) {
            continue;
        }

        let relative = path.strip_prefix(src_dir).unwrap_or(path);
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }
        fs::copy(path, &target)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", target.display(), e)))?;
    }

    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }
    fs::write(path, content)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}
