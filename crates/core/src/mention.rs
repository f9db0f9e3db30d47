//! `@username` extraction from comment content.
//!
//! A mention is `@` followed by 3 to 20 word characters, not immediately
//! followed by another word character or `@` (so over-long handles and
//! `@a@b` chains do not produce partial matches). Extraction is purely
//! textual; resolving names to user ids is the caller's job.

use regex::Regex;

/// Extracts mentioned usernames from text.
pub struct MentionParser {
    pattern: Regex,
}

impl MentionParser {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"@(\w{3,20})").expect("mention pattern is valid"),
        }
    }

    /// Return mentioned usernames, deduplicated, in first-seen order.
    pub fn extract(&self, content: &str) -> Vec<String> {
        let mut seen = Vec::new();
        for caps in self.pattern.captures_iter(content) {
            let whole = caps.get(0).expect("group 0 always present");

            // The regex crate has no lookahead; check the tail boundary
            // by hand. A following word character means the handle was
            // longer than allowed; a following `@` is not a mention.
            let tail = content[whole.end()..].chars().next();
            if matches!(tail, Some(c) if c.is_alphanumeric() || c == '_' || c == '@') {
                continue;
            }

            let name = caps[1].to_string();
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
        seen
    }
}

impl Default for MentionParser {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
