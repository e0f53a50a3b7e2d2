//! Template engine for rendering book pages.

use minijinja::{context, Environment};

use anthology_book::Attribution;

/// A navigation entry in the book sidebar.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NavItem {
    /// `chapter`, `part` or `separator`
    pub kind: &'static str,
    /// Display title
    pub title: String,
    /// Section number such as `1.2.`
    pub number: Option<String>,
    /// Page path relative to the book root; `None` for drafts
    pub path: Option<String>,
    /// Child items
    pub children: Vec<NavItem>,
}

impl NavItem {
    pub fn part(title: impl Into<String>) -> Self {
        Self {
            kind: "part",
            title: title.into(),
            number: None,
            path: None,
            children: Vec::new(),
        }
    }

    pub fn separator() -> Self {
        Self {
            kind: "separator",
            title: String::new(),
            number: None,
            path: None,
            children: Vec::new(),
        }
    }
}

/// An entry of the in-page outline.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// A previous/next link.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PageLink {
    pub title: String,
    /// Path relative to the book root
    pub path: String,
}

/// Context for rendering a chapter page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Context {
    /// Chapter title
    pub title: String,
    /// Book title
    pub book_title: String,
    /// Book description for the meta tag
    pub description: Option<String>,
    /// Document language
    pub language: String,
    /// Rendered content HTML
    pub content: String,
    /// Sidebar navigation
    pub nav: Vec<NavItem>,
    /// In-page outline
    pub toc: Vec<TocEntry>,
    /// Path of this page relative to the book root
    pub current: String,
    /// Prefix leading from this page back to the book root
    pub path_to_root: String,
    pub previous: Option<PageLink>,
    pub next: Option<PageLink>,
    /// Author and license footer
    pub attribution: Option<Attribution>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");

        env.add_template_owned("chapter.html".to_string(), CHAPTER_TEMPLATE.to_string())
            .expect("Failed to add chapter template");

        env.add_template_owned("nav.html".to_string(), NAV_TEMPLATE.to_string())
            .expect("Failed to add nav template");

        env.add_template_owned("redirect.html".to_string(), REDIRECT_TEMPLATE.to_string())
            .expect("Failed to add redirect template");

        Self { env }
    }

    /// Render a chapter page.
    pub fn render_chapter(&self, context: &Context) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("chapter.html")?;

        tmpl.render(context! {
            title => &context.title,
            book_title => &context.book_title,
            description => &context.description,
            language => &context.language,
            content => &context.content,
            nav => &context.nav,
            toc => &context.toc,
            current => &context.current,
            path_to_root => &context.path_to_root,
            previous => &context.previous,
            next => &context.next,
            attribution => &context.attribution,
        })
    }

    /// Render the page that forwards a visitor to `target`.
    pub fn render_redirect(&self, target: &str) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("redirect.html")?;

        tmpl.render(context! { target => target })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ language }}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} - {{ book_title }}</title>
  {% if description %}<meta name="description" content="{{ description }}">
  {% endif %}<link rel="stylesheet" href="{{ path_to_root | safe }}assets/book.css">
</head>
<body>
  <div class="layout">
    <nav class="sidebar">
      {% include "nav.html" %}
    </nav>
    <main class="main">
      {% block content %}{% endblock %}
    </main>
  </div>
</body>
</html>
"##;

const CHAPTER_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="chapter">
  <div class="content">
    {{ content | safe }}
  </div>
  {% if attribution %}
  <footer class="attribution">
    {% if attribution.author %}<p>Written by <span class="author">{{ attribution.author }}</span>{% if attribution.published %}, {{ attribution.published }}{% endif %}.</p>{% endif %}
    {% if attribution.source %}<p>Originally published at <a href="{{ attribution.source }}">{{ attribution.source }}</a>.</p>{% endif %}
    {% if attribution.license %}<p>Licensed under {{ attribution.license }}.</p>{% endif %}
  </footer>
  {% endif %}
  <nav class="pager">
    {% if previous %}<a class="previous" rel="prev" href="{{ path_to_root | safe }}{{ previous.path | safe }}">&larr; {{ previous.title }}</a>{% endif %}
    {% if next %}<a class="next" rel="next" href="{{ path_to_root | safe }}{{ next.path | safe }}">{{ next.title }} &rarr;</a>{% endif %}
  </nav>
</article>

{% if toc %}
<aside class="toc">
  <h2>On this page</h2>
  <ul>
  {% for entry in toc %}
    <li class="toc-level-{{ entry.level }}">
      <a href="#{{ entry.id }}">{{ entry.title }}</a>
    </li>
  {% endfor %}
  </ul>
</aside>
{% endif %}
{% endblock %}"##;

const NAV_TEMPLATE: &str = r##"<div class="nav-header">
  <a href="{{ path_to_root | safe }}index.html" class="nav-logo">{{ book_title }}</a>
</div>
<ol class="nav-list">
{% for item in nav recursive %}
  {% if item.kind == "part" %}
  <li class="part-title">{{ item.title }}</li>
  {% elif item.kind == "separator" %}
  <li class="spacer"></li>
  {% else %}
  <li class="nav-item{% if item.path and item.path == current %} active{% endif %}">
    {% if item.number %}<strong>{{ item.number }}</strong> {% endif %}
    {% if item.path %}<a href="{{ path_to_root | safe }}{{ item.path | safe }}">{{ item.title }}</a>{% else %}<span class="draft">{{ item.title }}</span>{% endif %}
    {% if item.children %}
    <ol class="nav-children">{{ loop(item.children) }}</ol>
    {% endif %}
  </li>
  {% endif %}
{% endfor %}
</ol>"##;

const REDIRECT_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Redirecting...</title>
  <meta http-equiv="refresh" content="0; url={{ target | safe }}">
  <link rel="canonical" href="{{ target | safe }}">
</head>
<body>
  <p>Redirecting to <a href="{{ target | safe }}">{{ target | safe }}</a>...</p>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> Context {
        Context {
            title: "Ownership".to_string(),
            book_title: "Rust Essays".to_string(),
            description: None,
            language: "en".to_string(),
            content: "<p>Hello world</p>".to_string(),
            nav: vec![],
            toc: vec![],
            current: "ownership.html".to_string(),
            path_to_root: String::new(),
            previous: None,
            next: None,
            attribution: None,
        }
    }

    #[test]
    fn renders_basic_page() {
        let engine = TemplateEngine::new();

        let html = engine.render_chapter(&context()).unwrap();

        assert!(html.contains("<title>Ownership - Rust Essays</title>"));
        assert!(html.contains("<p>Hello world</p>"));
        assert!(html.contains(r#"href="assets/book.css""#));
        assert!(!html.contains("attribution"));
    }

    #[test]
    fn renders_nested_navigation() {
        let engine = TemplateEngine::new();

        let mut ctx = context();
        ctx.path_to_root = "../".to_string();
        ctx.current = "essays/borrowing.html".to_string();
        ctx.nav = vec![
            NavItem::part("Essays"),
            NavItem {
                kind: "chapter",
                title: "Ownership".to_string(),
                number: Some("1.".to_string()),
                path: Some("ownership.html".to_string()),
                children: vec![NavItem {
                    kind: "chapter",
                    title: "Borrowing".to_string(),
                    number: Some("1.1.".to_string()),
                    path: Some("essays/borrowing.html".to_string()),
                    children: vec![],
                }],
            },
            NavItem::separator(),
            NavItem {
                kind: "chapter",
                title: "Someday".to_string(),
                number: Some("2.".to_string()),
                path: None,
                children: vec![],
            },
        ];

        let html = engine.render_chapter(&ctx).unwrap();

        assert!(html.contains(r#"<li class="part-title">Essays</li>"#));
        assert!(html.contains(r#"<a href="../ownership.html">Ownership</a>"#));
        assert!(html.contains(r#"<a href="../essays/borrowing.html">Borrowing</a>"#));
        assert!(html.contains(r#"<li class="nav-item active">"#));
        assert!(html.contains(r#"<span class="draft">Someday</span>"#));
        assert!(html.contains("<strong>1.1.</strong>"));
    }

    #[test]
    fn renders_attribution_and_pager() {
        let engine = TemplateEngine::new();

        let mut ctx = context();
        ctx.attribution = Some(Attribution {
            author: Some("Jane Doe".to_string()),
            source: Some("https://example.com/post".to_string()),
            license: Some("CC BY 4.0".to_string()),
            published: None,
        });
        ctx.next = Some(PageLink {
            title: "Traits".to_string(),
            path: "traits.html".to_string(),
        });

        let html = engine.render_chapter(&ctx).unwrap();

        assert!(html.contains(r#"<span class="author">Jane Doe</span>"#));
        assert!(html.contains("Licensed under CC BY 4.0."));
        assert!(html.contains("Originally published at"));
        assert!(html.contains(r#"rel="next" href="traits.html""#));
        assert!(!html.contains(r#"rel="prev""#));
    }

    #[test]
    fn escapes_titles() {
        let engine = TemplateEngine::new();

        let mut ctx = context();
        ctx.title = "Vec<T> & friends".to_string();

        let html = engine.render_chapter(&ctx).unwrap();

        assert!(html.contains("Vec&lt;T&gt; &amp; friends"));
    }

    #[test]
    fn renders_redirect() {
        let engine = TemplateEngine::new();

        let html = engine.render_redirect("1/index.html").unwrap();

        assert!(html.contains(r#"content="0; url=1/index.html""#));
        assert!(html.contains(r#"<a href="1/index.html">"#));
    }
}
