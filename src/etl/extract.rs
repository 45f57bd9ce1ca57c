//! Spot price extraction over HTTP

use super::{EtlError, Stage, StageTiming, TimingSink};
use crate::config::ApiConfig;
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Fetches the raw spot price payload
pub struct Extractor {
    client: Client,
    url: String,
}

impl Extractor {
    /// Create an extractor for `url` with the reqwest default client settings
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// Create an extractor from configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self, EtlError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one GET and return the JSON body
    ///
    /// The extract timing covers the request up to the response headers.
    /// Transport errors, non-2xx statuses and non-JSON bodies are returned
    /// as-is.
    pub async fn extract(&self, sink: &dyn TimingSink) -> Result<Value, EtlError> {
        tracing::debug!(url = %self.url, "Fetching Bitcoin spot price");

        let start = Instant::now();
        let response = self.client.get(&self.url).send().await?;
        sink.record(StageTiming::since(Stage::Extract, start));

        let body = response.error_for_status()?.json::<Value>().await?;
        Ok(body)
    }
}
