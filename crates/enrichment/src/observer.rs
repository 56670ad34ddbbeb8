use std::fmt;

use crate::enricher::Enrichment;
use crate::error::PredictorError;

/// Receives enrichment events. The orchestrator never logs directly, so any
/// sink (or none) can be plugged in.
pub trait EnrichmentObserver: Send + Sync {
    fn started(&self, _name: &str) {}

    fn predicted(&self, _name: &str, _kind: &'static str, _value: &dyn fmt::Display) {}

    fn failed(&self, _name: &str, _kind: &'static str, _error: &PredictorError) {}

    fn completed(&self, _name: &str, _enrichment: &Enrichment) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl EnrichmentObserver for TracingObserver {
    fn started(&self, name: &str) {
        tracing::info!(name, "Starting enrichment");
    }

    fn predicted(&self, name: &str, kind: &'static str, value: &dyn fmt::Display) {
        tracing::debug!(name, kind, %value, "Prediction received");
    }

    fn failed(&self, name: &str, kind: &'static str, error: &PredictorError) {
        tracing::warn!(name, kind, error = %error, "Failed to enrich {}", kind);
    }

    fn completed(&self, name: &str, enrichment: &Enrichment) {
        tracing::info!(
            name,
            predicted = enrichment.predicted_count(),
            "Completed enrichment"
        );
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl EnrichmentObserver for NoopObserver {}
