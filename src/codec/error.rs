use thiserror::Error;

/// Errors raised while encoding or decoding a sample series.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The text is not a bracketed, comma-delimited list of the expected
    /// element type. No partial result is produced.
    #[error("malformed sample series: {reason}")]
    MalformedInput { reason: String },

    /// A floating-point sample is NaN or infinite and has no encoded form.
    #[error("sample at index {index} is not finite")]
    NonFiniteSample { index: usize },

    #[error("failed to render sample series: {0}")]
    Render(#[from] serde_json::Error),
}

impl CodecError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        CodecError::MalformedInput {
            reason: reason.into(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, CodecError::MalformedInput { .. })
    }
}
