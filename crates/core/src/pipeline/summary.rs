//! Plain-text summary extraction.
//!
//! Strips markdown markers from the working content, collapses whitespace,
//! and truncates to a character budget. Truncation prefers the last
//! sentence boundary inside the budget, provided it does not fall so early
//! that the summary would be mostly empty; otherwise the text is cut hard
//! and ellipsized.

use regex::Regex;

use crate::pipeline::{ContentStage, ProcessContext};

/// Character budget for extracted summaries.
const MAX_SUMMARY_CHARS: usize = 200;

/// A sentence boundary earlier than this position is ignored; the text is
/// ellipsis-truncated instead.
const BOUNDARY_FLOOR: usize = 100;

/// Characters treated as sentence boundaries (ASCII and fullwidth).
const SENTENCE_BOUNDARIES: &[char] = &['.', '!', '?', '。', '！', '？'];

/// Extracts a plain-text summary from the working markdown.
pub struct SummaryStage {
    code_block: Regex,
    image: Regex,
    link: Regex,
    heading: Regex,
    bold: Regex,
    italic: Regex,
    inline_code: Regex,
    whitespace: Regex,
    max_chars: usize,
    boundary_floor: usize,
}

impl SummaryStage {
    pub fn new(max_chars: usize, boundary_floor: usize) -> Self {
        Self {
            code_block: Regex::new(r"(?s)```.*?```").expect("code-block pattern is valid"),
            image: Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("image pattern is valid"),
            link: Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("link pattern is valid"),
            heading: Regex::new(r"(?m)^#{1,6}\s+").expect("heading pattern is valid"),
            bold: Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"),
            italic: Regex::new(r"\*(.+?)\*").expect("italic pattern is valid"),
            inline_code: Regex::new(r"`(.+?)`").expect("inline-code pattern is valid"),
            whitespace: Regex::new(r"\s+").expect("whitespace pattern is valid"),
            max_chars,
            boundary_floor,
        }
    }

    /// Reduce markdown to a single line of plain text.
    fn plain_text(&self, markdown: &str) -> String {
        let text = self.code_block.replace_all(markdown, "");
        let text = self.image.replace_all(&text, "");
        let text = self.link.replace_all(&text, "$1");
        let text = self.heading.replace_all(&text, "");
        let text = self.bold.replace_all(&text, "$1");
        let text = self.italic.replace_all(&text, "$1");
        let text = self.inline_code.replace_all(&text, "$1");
        self.whitespace.replace_all(&text, " ").trim().to_string()
    }

    /// Truncate to the character budget, preferring sentence boundaries.
    ///
    /// Counts characters, not bytes, so multi-byte text never splits
    /// mid-character.
    fn truncate(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() <= self.max_chars {
            return text.to_string();
        }

        let window = &chars[..self.max_chars];
        let boundary = window
            .iter()
            .rposition(|c| SENTENCE_BOUNDARIES.contains(c));

        match boundary {
            Some(idx) if idx > self.boundary_floor => window[..=idx].iter().collect(),
            _ => {
                let mut cut: String = window.iter().collect();
                cut.push_str("...");
                cut
            }
        }
    }
}

impl Default for SummaryStage {
    fn default() -> Self {
        Self::new(MAX_SUMMARY_CHARS, BOUNDARY_FLOOR)
    }
}

impl ContentStage for SummaryStage {
    fn name(&self) -> &'static str {
        "summary"
    }

    fn apply(&self, ctx: &mut ProcessContext) -> Result<(), String> {
        if ctx.working.is_empty() {
            ctx.summary = Some(String::new());
            return Ok(());
        }

        let summary = self.truncate(&self.plain_text(&ctx.working));
        tracing::debug!(summary_len = summary.chars().count(), "Extracted summary");
        ctx.summary = Some(summary);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
