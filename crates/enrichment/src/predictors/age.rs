use serde::Deserialize;

use super::client::Prediction;
use crate::error::{PredictorError, Result};

pub const DEFAULT_AGE_API_URL: &str = "https://api.agify.io";

/// agify.io
pub struct Age;

#[derive(Debug, Deserialize)]
pub struct AgeBody {
    #[serde(default)]
    pub age: Option<i32>,
}

impl Prediction for Age {
    const KIND: &'static str = "age";

    type Body = AgeBody;
    type Value = i32;

    /// agify answers `0` (older versions) or `null` for names it has no data
    /// on. Both mean "unknown", so a literal age of zero can never be predicted.
    /// Negative ages cannot be stored and count as unknown too.
    fn extract(body: AgeBody) -> Result<i32> {
        match body.age {
            Some(age) if age > 0 => Ok(age),
            _ => Err(PredictorError::NoPrediction),
        }
    }
}
