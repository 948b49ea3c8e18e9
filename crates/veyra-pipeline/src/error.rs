use thiserror::Error;
use veyra_db::DbError;
use veyra_llm::LlmError;
use veyra_x::XApiError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("store error: {0}")]
    Store(#[from] DbError),

    #[error("X API error: {0}")]
    XApi(#[from] XApiError),

    #[error("text generation failed: {0}")]
    Generation(#[from] LlmError),

    /// Preconditions for a stage are not met; nothing was written.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("publish failed: {0}")]
    Publish(String),

    #[error("unknown account: {0}")]
    UnknownAccount(String),
}

impl PipelineError {
    /// Stable identifier used in invocation status details.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Store(_) => "store",
            Self::XApi(_) => "x_api",
            Self::Generation(_) => "generation",
            Self::InsufficientData(_) => "insufficient_data",
            Self::Publish(_) => "publish",
            Self::UnknownAccount(_) => "unknown_account",
        }
    }
}
