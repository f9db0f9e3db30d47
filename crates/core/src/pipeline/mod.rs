//! Staged content-transformation pipeline.
//!
//! A [`Pipeline`] runs an ordered list of [`ContentStage`]s over raw
//! markdown. Each stage sees the cumulative [`ProcessContext`] of the
//! stages before it and may rewrite the working content or attach derived
//! fields. The first failing stage aborts the run; nothing is persisted on
//! failure.
//!
//! The stage set is fixed per content type: articles get
//! sanitize → render → outline → summary, comments get
//! sanitize → mask → render.

pub mod markdown;
pub mod mask;
pub mod outline;
pub mod sanitize;
pub mod summary;

pub use markdown::RenderStage;
pub use mask::MaskTermsStage;
pub use outline::OutlineStage;
pub use sanitize::SanitizeStage;
pub use summary::SummaryStage;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// ProcessContext
// ---------------------------------------------------------------------------

/// Mutable state threaded through the stages of one pipeline run.
#[derive(Debug, Clone)]
pub struct ProcessContext {
    /// The untouched input, kept for stages that need to look back at it.
    pub raw: String,
    /// The markdown being transformed; stages rewrite this in place.
    pub working: String,
    /// HTML produced by the render stage.
    pub rendered_html: Option<String>,
    /// Plain-text summary produced by the summary stage.
    pub summary: Option<String>,
    /// JSON-encoded heading outline produced by the outline stage.
    pub outline: Option<String>,
    /// Set when the sanitizer actually removed something.
    pub sanitized: bool,
    /// Set when the mask stage replaced at least one term.
    pub masked: bool,
}

impl ProcessContext {
    fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            working: raw.to_string(),
            rendered_html: None,
            summary: None,
            outline: None,
            sanitized: false,
            masked: false,
        }
    }
}

// ---------------------------------------------------------------------------
// ContentStage
// ---------------------------------------------------------------------------

/// One discrete content transformation.
///
/// Stages are stateless and safely shared across concurrent pipeline runs;
/// all per-run state lives in the [`ProcessContext`]. A stage signals
/// failure by returning the reason; the pipeline attaches the stage name
/// and stops.
pub trait ContentStage: Send + Sync {
    /// Stage name used in logs and pipeline errors.
    fn name(&self) -> &'static str;

    /// Apply the transformation to the context.
    fn apply(&self, ctx: &mut ProcessContext) -> Result<(), String>;
}

// ---------------------------------------------------------------------------
// ProcessedContent
// ---------------------------------------------------------------------------

/// Aggregated output of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct ProcessedContent {
    pub rendered_body: String,
    pub summary: Option<String>,
    pub outline: Option<String>,
    /// Whether masked-vocabulary terms were replaced.
    pub masked: bool,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Ordered chain of content stages for one content type.
pub struct Pipeline {
    stages: Vec<Box<dyn ContentStage>>,
}

impl Pipeline {
    /// Build a pipeline from an explicit stage list.
    pub fn new(stages: Vec<Box<dyn ContentStage>>) -> Self {
        Self { stages }
    }

    /// The article chain: sanitize, render, outline, summary.
    pub fn articles() -> Self {
        Self::new(vec![
            Box::new(SanitizeStage::new()),
            Box::new(RenderStage),
            Box::new(OutlineStage::new()),
            Box::new(SummaryStage::default()),
        ])
    }

    /// The comment chain: sanitize, mask, render.
    pub fn comments() -> Self {
        Self::new(vec![
            Box::new(SanitizeStage::new()),
            Box::new(MaskTermsStage::default()),
            Box::new(RenderStage),
        ])
    }

    /// Run every stage in registration order.
    ///
    /// The first stage failure aborts the run and surfaces as
    /// [`CoreError::Pipeline`]; later stages never execute. Identical
    /// input always yields identical output.
    pub fn process(&self, raw: &str) -> Result<ProcessedContent, CoreError> {
        let mut ctx = ProcessContext::new(raw);

        for stage in &self.stages {
            tracing::debug!(stage = stage.name(), "Running content stage");
            if let Err(reason) = stage.apply(&mut ctx) {
                tracing::warn!(
                    stage = stage.name(),
                    reason = %reason,
                    "Content stage failed, aborting pipeline"
                );
                return Err(CoreError::Pipeline {
                    stage: stage.name(),
                    reason,
                });
            }
        }

        Ok(ProcessedContent {
            rendered_body: ctx.rendered_html.unwrap_or_default(),
            summary: ctx.summary,
            outline: ctx.outline,
            masked: ctx.masked,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
