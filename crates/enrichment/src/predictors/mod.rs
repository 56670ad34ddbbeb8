mod age;
mod client;
mod gender;
mod nationality;

pub use age::{Age, AgeBody, DEFAULT_AGE_API_URL};
pub use client::{HttpPredictor, Prediction, build_client};
pub use gender::{DEFAULT_GENDER_API_URL, Gender, GenderBody};
pub use nationality::{CountryGuess, DEFAULT_NATIONALITY_API_URL, Nationality, NationalityBody};

pub type AgePredictor = HttpPredictor<Age>;
pub type GenderPredictor = HttpPredictor<Gender>;
pub type NationalityPredictor = HttpPredictor<Nationality>;
