use std::marker::PhantomData;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::{PredictorError, Result};
use crate::traits::Predictor;

/// Response shape of one predictor API and how to get a value out of it.
pub trait Prediction {
    const KIND: &'static str;

    type Body: DeserializeOwned;
    type Value: Send;

    fn extract(body: Self::Body) -> Result<Self::Value>;
}

/// Calls `GET {base_url}/?name={name}` once and decodes the body as `P::Body`.
pub struct HttpPredictor<P> {
    client: Client,
    base_url: String,
    _prediction: PhantomData<fn() -> P>,
}

impl<P: Prediction> HttpPredictor<P> {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            _prediction: PhantomData,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }

    /// Decodes a raw body. Separate from the HTTP call so that transport and
    /// decode failures stay distinguishable.
    pub fn decode(bytes: &[u8]) -> Result<P::Value> {
        let body: P::Body = serde_json::from_slice(bytes)?;
        P::extract(body)
    }
}

#[async_trait::async_trait]
impl<P: Prediction> Predictor for HttpPredictor<P> {
    type Value = P::Value;

    fn kind(&self) -> &'static str {
        P::KIND
    }

    async fn predict(&self, name: &str) -> Result<P::Value> {
        tracing::debug!(kind = P::KIND, name, "Fetching prediction");

        let response = self
            .client
            .get(self.endpoint())
            .query(&[("name", name)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictorError::UpstreamStatus {
                code: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        Self::decode(&bytes)
    }
}

/// Shared HTTP client for all predictors with an explicit request timeout.
pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("person-enrichment/", env!("CARGO_PKG_VERSION")))
        .build()?;

    Ok(client)
}
