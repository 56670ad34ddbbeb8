use serde::Deserialize;
use storage::dto::person::NATIONALITY_MAX_LEN;

use super::client::Prediction;
use crate::error::{PredictorError, Result};

pub const DEFAULT_NATIONALITY_API_URL: &str = "https://api.nationalize.io";

/// nationalize.io
pub struct Nationality;

#[derive(Debug, Deserialize)]
pub struct CountryGuess {
    pub country_id: String,
}

#[derive(Debug, Deserialize)]
pub struct NationalityBody {
    #[serde(default)]
    pub country: Vec<CountryGuess>,
}

impl Prediction for Nationality {
    const KIND: &'static str = "nationality";

    type Body = NationalityBody;
    type Value = String;

    /// nationalize.io sorts guesses by descending probability, so the first
    /// one is taken as is. A code that does not fit the column is no answer.
    fn extract(body: NationalityBody) -> Result<String> {
        body.country
            .into_iter()
            .next()
            .map(|guess| guess.country_id)
            .filter(|code| !code.is_empty() && code.chars().count() <= NATIONALITY_MAX_LEN)
            .ok_or(PredictorError::NoPrediction)
    }
}
