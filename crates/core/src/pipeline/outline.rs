//! Heading-based outline extraction.
//!
//! Walks the working markdown for ATX headings (`#` through `######`) and
//! records them as an ordered, JSON-encoded list the frontend can turn
//! into a table of contents.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::pipeline::{ContentStage, ProcessContext};

/// One heading in the document outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Position in document order, starting at 0.
    pub index: usize,
    /// Heading level, 1 through 6.
    pub level: usize,
    pub title: String,
}

/// Extracts the heading outline from the working markdown.
pub struct OutlineStage {
    heading: Regex,
}

impl OutlineStage {
    pub fn new() -> Self {
        Self {
            heading: Regex::new(r"(?m)^(#{1,6})\s+(.+)$").expect("heading pattern is valid"),
        }
    }

    fn extract(&self, markdown: &str) -> Vec<OutlineEntry> {
        self.heading
            .captures_iter(markdown)
            .enumerate()
            .map(|(index, caps)| OutlineEntry {
                index,
                level: caps[1].len(),
                title: caps[2].trim().to_string(),
            })
            .collect()
    }
}

impl Default for OutlineStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStage for OutlineStage {
    fn name(&self) -> &'static str {
        "outline"
    }

    fn apply(&self, ctx: &mut ProcessContext) -> Result<(), String> {
        let entries = self.extract(&ctx.working);
        tracing::debug!(headings = entries.len(), "Extracted outline");

        let json = serde_json::to_string(&entries)
            .map_err(|e| format!("outline serialization failed: {e}"))?;
        ctx.outline = Some(json);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
