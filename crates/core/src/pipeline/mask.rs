//! Masked-term substitution for comment content.
//!
//! Matches a fixed vocabulary and replaces every occurrence with `***`
//! before rendering. The vocabulary is deliberately small and compiled in;
//! moderation beyond simple term masking happens through the comment
//! review flow, not here.

use crate::pipeline::{ContentStage, ProcessContext};

/// Terms that are never stored or rendered verbatim.
const MASKED_TERMS: &[&str] = &["viagra", "casino", "lottery", "free-money"];

/// Replacement written over every matched term.
const REPLACEMENT: &str = "***";

/// Replaces masked-vocabulary terms in the working content.
#[derive(Default)]
pub struct MaskTermsStage;

impl ContentStage for MaskTermsStage {
    fn name(&self) -> &'static str {
        "mask-terms"
    }

    fn apply(&self, ctx: &mut ProcessContext) -> Result<(), String> {
        let mut content = ctx.working.clone();
        for term in MASKED_TERMS {
            if content.contains(term) {
                content = content.replace(term, REPLACEMENT);
            }
        }

        if content != ctx.working {
            tracing::warn!("Masked-vocabulary terms replaced in comment content");
            ctx.working = content;
            ctx.masked = true;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
