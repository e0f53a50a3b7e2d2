//! Stylesheet for the built-in renderer.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the book stylesheet.
    pub fn generate_css() -> String {
        BOOK_CSS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const BOOK_CSS: &str = r#"/* Anthology book theme */

:root {
  --sidebar-width: 300px;
  --toc-width: 200px;
  --content-max-width: 760px;
  --background: #ffffff;
  --foreground: #1f2328;
  --muted: #f6f8fa;
  --muted-foreground: #59636e;
  --border: #d1d9e0;
  --primary: #b7410e;
  --primary-foreground: #ffffff;
}

@media (prefers-color-scheme: dark) {
  :root {
    --background: #161b22;
    --foreground: #e6edf3;
    --muted: #0d1117;
    --muted-foreground: #9198a1;
    --border: #30363d;
    --primary: #f0883e;
    --primary-foreground: #0d1117;
  }
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: Georgia, "Times New Roman", serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.7;
}

.layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) 1fr;
  min-height: 100vh;
}

/* Sidebar */
.sidebar {
  background: var(--muted);
  border-right: 1px solid var(--border);
  padding: 1.5rem;
  position: sticky;
  top: 0;
  height: 100vh;
  overflow-y: auto;
  font-family: system-ui, -apple-system, sans-serif;
  font-size: 0.9rem;
}

.nav-header {
  margin-bottom: 1.5rem;
}

.nav-logo {
  font-weight: 700;
  font-size: 1.2rem;
  color: var(--foreground);
  text-decoration: none;
}

.nav-list,
.nav-children {
  list-style: none;
}

.nav-children {
  margin-left: 1rem;
}

.nav-item {
  margin: 0.2rem 0;
}

.nav-item a {
  color: var(--muted-foreground);
  text-decoration: none;
}

.nav-item a:hover {
  color: var(--primary);
}

.nav-item.active > a {
  color: var(--primary);
  font-weight: 600;
}

.nav-item strong {
  font-weight: 400;
  color: var(--muted-foreground);
  margin-right: 0.25rem;
}

.draft {
  color: var(--muted-foreground);
  font-style: italic;
  opacity: 0.6;
}

.part-title {
  margin: 1.25rem 0 0.5rem;
  font-weight: 700;
  color: var(--foreground);
}

.spacer {
  height: 1px;
  margin: 0.75rem 0;
  background: var(--border);
}

/* Main content */
.main {
  display: grid;
  grid-template-columns: 1fr var(--toc-width);
  gap: 2rem;
  padding: 2rem;
  max-width: calc(var(--content-max-width) + var(--toc-width) + 4rem);
}

.chapter {
  max-width: var(--content-max-width);
}

.content h1 {
  font-size: 2.25rem;
  margin-bottom: 1.5rem;
}

.content h2 {
  font-size: 1.5rem;
  margin: 2rem 0 1rem;
  padding-bottom: 0.4rem;
  border-bottom: 1px solid var(--border);
}

.content h3 {
  font-size: 1.2rem;
  margin: 1.5rem 0 0.75rem;
}

.content p,
.content ul,
.content ol,
.content blockquote,
.content table {
  margin-bottom: 1rem;
}

.content ul,
.content ol {
  padding-left: 1.5rem;
}

.content a {
  color: var(--primary);
  text-underline-offset: 3px;
}

.content blockquote {
  border-left: 3px solid var(--border);
  padding-left: 1rem;
  color: var(--muted-foreground);
}

.content pre {
  background: var(--muted);
  border: 1px solid var(--border);
  border-radius: 0.4rem;
  padding: 1rem;
  overflow-x: auto;
  font-size: 0.875rem;
  margin-bottom: 1rem;
}

.content code {
  font-family: ui-monospace, "SFMono-Regular", Menlo, monospace;
  font-size: 0.875em;
}

.content table {
  border-collapse: collapse;
}

.content th,
.content td {
  border: 1px solid var(--border);
  padding: 0.4rem 0.75rem;
}

/* Attribution footer */
.attribution {
  margin-top: 3rem;
  padding-top: 1rem;
  border-top: 1px solid var(--border);
  font-size: 0.9rem;
  color: var(--muted-foreground);
}

.attribution .author {
  font-weight: 600;
}

/* Previous / next */
.pager {
  display: flex;
  justify-content: space-between;
  margin-top: 2rem;
  font-family: system-ui, -apple-system, sans-serif;
}

.pager a {
  color: var(--primary);
  text-decoration: none;
}

.pager .next {
  margin-left: auto;
}

/* In-page outline */
.toc {
  position: sticky;
  top: 2rem;
  align-self: start;
  font-family: system-ui, -apple-system, sans-serif;
  font-size: 0.85rem;
}

.toc h2 {
  font-size: 0.8rem;
  text-transform: uppercase;
  letter-spacing: 0.05em;
  margin-bottom: 0.5rem;
}

.toc ul {
  list-style: none;
}

.toc a {
  color: var(--muted-foreground);
  text-decoration: none;
}

.toc-level-3 {
  padding-left: 0.75rem;
}

.toc-level-4,
.toc-level-5,
.toc-level-6 {
  padding-left: 1.5rem;
}

@media (max-width: 900px) {
  .layout {
    grid-template-columns: 1fr;
  }

  .sidebar {
    position: static;
    height: auto;
  }

  .main {
    grid-template-columns: 1fr;
  }

  .toc {
    display: none;
  }
}
"#;
