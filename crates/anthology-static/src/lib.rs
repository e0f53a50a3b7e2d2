//! Book builder for anthology.
//!
//! Renders a book into `<output>/<volume>/` through a [`Renderer`] (the
//! built-in HTML renderer or an external tool) and writes a redirect page at
//! `<output>/index.html` pointing at the book's entry page.

pub mod assets;
pub mod builder;
pub mod html;
pub mod renderer;
pub mod templates;

pub use builder::{write_redirect, BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use html::HtmlRenderer;
pub use renderer::{CommandRenderer, RenderContext, Renderer, RendererKind, DEFAULT_COMMAND};
