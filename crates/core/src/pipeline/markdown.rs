//! Markdown-to-HTML rendering via pulldown-cmark.

use pulldown_cmark::{html, Options, Parser};

use crate::pipeline::{ContentStage, ProcessContext};

/// Renders the working markdown into HTML.
///
/// Runs after the sanitizer, so the input contains no raw HTML; entity
/// references the sanitizer introduced pass through as escaped text.
pub struct RenderStage;

impl ContentStage for RenderStage {
    fn name(&self) -> &'static str {
        "render"
    }

    fn apply(&self, ctx: &mut ProcessContext) -> Result<(), String> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_FOOTNOTES);

        let parser = Parser::new_ext(&ctx.working, options);
        let mut rendered = String::with_capacity(ctx.working.len() * 3 / 2);
        html::push_html(&mut rendered, parser);

        tracing::debug!(html_len = rendered.len(), "Rendered markdown");
        ctx.rendered_html = Some(rendered);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
