use crate::Result;

/// One external guess about a given name.
#[async_trait::async_trait]
pub trait Predictor: Send + Sync {
    type Value: Send;

    /// Short label used in logs, e.g. `"age"`.
    fn kind(&self) -> &'static str;

    async fn predict(&self, name: &str) -> Result<Self::Value>;
}
