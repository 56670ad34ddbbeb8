use std::sync::Arc;

use enrichment::Enricher;
use storage::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub enricher: Arc<Enricher>,
}

impl AppState {
    pub fn new(db: Database, enricher: Enricher) -> Self {
        Self {
            db,
            enricher: Arc::new(enricher),
        }
    }
}
