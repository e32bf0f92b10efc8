//! Domain error types.

/// Top-level error type for ribbonscan.
#[derive(Debug, thiserror::Error)]
pub enum RibbonError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(
        "invalid ribbon spans {short}/{medium}/{long}: spans must be nonzero and strictly increasing"
    )]
    InvalidSpans {
        short: usize,
        medium: usize,
        long: usize,
    },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("insufficient data for {ticker}: have {bars} bars, need {minimum}")]
    InsufficientData {
        ticker: String,
        bars: usize,
        minimum: usize,
    },

    #[error("data provider error for {ticker}: {reason}")]
    Provider { ticker: String, reason: String },

    #[error("state store error: {reason}")]
    StateStore { reason: String },

    #[error("notification error: {reason}")]
    Notify { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&RibbonError> for std::process::ExitCode {
    fn from(err: &RibbonError) -> Self {
        let code: u8 = match err {
            RibbonError::Io(_) => 1,
            RibbonError::ConfigParse { .. }
            | RibbonError::ConfigInvalid { .. }
            | RibbonError::InvalidSpans { .. } => 2,
            RibbonError::StateStore { .. } => 3,
            RibbonError::Notify { .. } => 4,
            RibbonError::NoData { .. }
            | RibbonError::InsufficientData { .. }
            | RibbonError::Provider { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
