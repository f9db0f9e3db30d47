//! Disallowed-markup removal.
//!
//! Strips the handful of constructs that must never survive into stored
//! content (script/iframe/object/embed tags, `javascript:` URLs, inline
//! event handlers), then entity-escapes remaining angle brackets so no raw
//! HTML passes through the renderer. Markdown syntax is untouched.

use regex::Regex;

use crate::pipeline::{ContentStage, ProcessContext};

/// Patterns that are removed outright, matched case-insensitively.
const DISALLOWED: &[&str] = &[
    "<script",
    "</script>",
    "<iframe",
    "</iframe>",
    "<object",
    "</object>",
    "<embed",
    "javascript:",
    "onerror=",
    "onload=",
    "onclick=",
];

/// Strips disallowed markup from the working content.
pub struct SanitizeStage {
    disallowed: Regex,
}

impl SanitizeStage {
    pub fn new() -> Self {
        let pattern = format!("(?i)({})", DISALLOWED.join("|"));
        Self {
            disallowed: Regex::new(&pattern).expect("disallowed-markup pattern is valid"),
        }
    }
}

impl Default for SanitizeStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStage for SanitizeStage {
    fn name(&self) -> &'static str {
        "sanitize"
    }

    fn apply(&self, ctx: &mut ProcessContext) -> Result<(), String> {
        let stripped = self.disallowed.replace_all(&ctx.working, "");
        let escaped = stripped.replace('<', "&lt;").replace('>', "&gt;");

        if escaped != ctx.working {
            tracing::debug!(
                before = ctx.working.len(),
                after = escaped.len(),
                "Sanitizer rewrote content"
            );
            ctx.working = escaped;
            ctx.sanitized = true;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
