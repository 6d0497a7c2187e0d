//! Domain error types.

use chrono::NaiveDate;

use super::driver::StepResult;

/// Top-level error type for riskalloc.
#[derive(Debug, thiserror::Error)]
pub enum RiskAllocError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    /// Candidate scores sum to zero, a negative number, or a non-finite value.
    #[error("degenerate candidate scores: scaling base is {scaling_base}")]
    DegenerateInput { scaling_base: f64 },

    #[error("no candidates for this step")]
    EmptyCandidates,

    #[error("invalid candidate {ticker}: {reason}")]
    InvalidCandidate { ticker: String, reason: String },

    #[error("step {step} ({date}) failed: {source}")]
    StepFailed {
        step: usize,
        date: NaiveDate,
        /// The last step that completed before the failure, if any.
        last_completed: Option<Box<StepResult>>,
        #[source]
        source: Box<RiskAllocError>,
    },

    #[error("data load error: {reason}")]
    DataLoad { reason: String },

    #[error("unsupported price file type \"{extension}\"")]
    UnsupportedFileType { extension: String },

    #[error("insufficient data: have {rows} rows, need {minimum}")]
    InsufficientData { rows: usize, minimum: usize },

    #[error("no price for {ticker}")]
    MissingPrice { ticker: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RiskAllocError {
    pub(crate) fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        RiskAllocError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn config_missing(section: &str, key: &str) -> Self {
        RiskAllocError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }

    pub(crate) fn data_load(reason: impl Into<String>) -> Self {
        RiskAllocError::DataLoad {
            reason: reason.into(),
        }
    }
}

impl From<&RiskAllocError> for std::process::ExitCode {
    fn from(err: &RiskAllocError) -> Self {
        let code: u8 = match err {
            RiskAllocError::Io(_) => 1,
            RiskAllocError::ConfigParse { .. }
            | RiskAllocError::ConfigMissing { .. }
            | RiskAllocError::ConfigInvalid { .. } => 2,
            RiskAllocError::DataLoad { .. }
            | RiskAllocError::UnsupportedFileType { .. }
            | RiskAllocError::InsufficientData { .. }
            | RiskAllocError::MissingPrice { .. } => 3,
            RiskAllocError::DegenerateInput { .. }
            | RiskAllocError::EmptyCandidates
            | RiskAllocError::InvalidCandidate { .. } => 4,
            RiskAllocError::StepFailed { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
