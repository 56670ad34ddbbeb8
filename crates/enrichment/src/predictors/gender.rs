use serde::Deserialize;
use storage::dto::person::GENDERS;

use super::client::Prediction;
use crate::error::{PredictorError, Result};

pub const DEFAULT_GENDER_API_URL: &str = "https://api.genderize.io";

/// genderize.io
pub struct Gender;

#[derive(Debug, Deserialize)]
pub struct GenderBody {
    #[serde(default)]
    pub gender: Option<String>,
}

impl Prediction for Gender {
    const KIND: &'static str = "gender";

    type Body = GenderBody;
    type Value = String;

    /// Only genders the person table accepts count as a prediction.
    fn extract(body: GenderBody) -> Result<String> {
        match body.gender {
            Some(gender) if GENDERS.contains(&gender.as_str()) => Ok(gender),
            _ => Err(PredictorError::NoPrediction),
        }
    }
}
