use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PredictorError>;

/// Why a single predictor produced no value.
#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Predictor returned status: {code}")]
    UpstreamStatus { code: u16 },

    #[error("Failed to parse predictor response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No prediction available")]
    NoPrediction,

    #[error("Predictor did not answer within {0:?}")]
    Timeout(Duration),
}
