use thiserror::Error;

/// Fatal analysis failures, surfaced before any feature is computed.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A configuration parameter is out of range.
    #[error("Invalid {parameter}: {message}")]
    InvalidConfig {
        parameter: &'static str,
        message: String,
    },
    /// The sample buffer holds no samples.
    #[error("Empty signal: nothing to analyze")]
    EmptySignal,
}

impl AnalysisError {
    pub(crate) fn invalid(parameter: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            parameter,
            message: message.into(),
        }
    }
}
