//! Error types for the analysis pipeline.

use thiserror::Error;

use crate::pipeline::error_code::ErrorCode;
use crate::pipeline::errors::SpecError;
use crate::pipeline::validation::{ValidationDiagnostic, ValidationReport};

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors raised by the analysis core.
///
/// Only [`AnalysisError::Configuration`] and [`AnalysisError::InvalidSpec`]
/// abort a run, and both are raised before any document is touched.
/// Per-document failures never surface here: a tokenizer returns a
/// [`SegmentError`](crate::nlp::tokenizer::SegmentError) and the runner
/// records the document as skipped.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid configuration: {}", .report.summary())]
    Configuration { report: ValidationReport },

    #[error("analysis spec is not valid JSON: {0}")]
    InvalidSpec(#[from] serde_json::Error),

    #[error("lexicon line {line}: {reason}")]
    Lexicon { line: usize, reason: String },

    #[error("dictionary error: {0}")]
    Dictionary(String),
}

impl AnalysisError {
    /// Build a configuration error carrying a single diagnostic.
    pub fn configuration(path: impl Into<String>, message: impl Into<String>) -> Self {
        let mut report = ValidationReport::default();
        report
            .diagnostics
            .push(ValidationDiagnostic::error(SpecError::new(
                ErrorCode::InvalidValue,
                path,
                message,
            )));
        Self::Configuration { report }
    }
}
