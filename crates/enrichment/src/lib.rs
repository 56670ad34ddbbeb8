//! Best-effort person enrichment from name-based prediction APIs.

pub mod enricher;
pub mod error;
pub mod observer;
pub mod predictors;
pub mod traits;

pub use enricher::{Enricher, Enrichment, EnrichmentSettings};
pub use error::{PredictorError, Result};
pub use observer::{EnrichmentObserver, NoopObserver, TracingObserver};
pub use traits::Predictor;
