//! One extract → transform → load cycle

use super::{validate, EtlError, Extractor, Loader, Stage, StageTiming, TimingSink};
use crate::quote::{Quote, StoredQuote};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// The three ETL stages wired together
pub struct Pipeline {
    extractor: Extractor,
    loader: Loader,
    sink: Arc<dyn TimingSink>,
}

impl Pipeline {
    pub fn new(extractor: Extractor, loader: Loader, sink: Arc<dyn TimingSink>) -> Self {
        Self {
            extractor,
            loader,
            sink,
        }
    }

    pub async fn extract(&self) -> Result<Value, EtlError> {
        self.extractor
            .extract(self.sink.as_ref())
            .instrument(tracing::info_span!("extract", url = %self.extractor.url()))
            .await
    }

    /// Validate the raw payload, logging and returning any shape error
    pub fn transform(&self, raw: Value) -> Result<Quote, EtlError> {
        let _span = tracing::info_span!("transform").entered();

        let start = Instant::now();
        let quote = match validate(raw) {
            Ok(quote) => quote,
            Err(e) => {
                tracing::error!(error = %e, "Spot price payload failed validation");
                return Err(e.into());
            }
        };
        self.sink.record(StageTiming::since(Stage::Transform, start));

        tracing::debug!(
            price = ?quote.price(),
            base = %quote.base,
            currency = %quote.currency,
            "Spot price validated"
        );
        Ok(quote)
    }

    pub async fn load(&self, quote: &Quote) -> Result<StoredQuote, EtlError> {
        self.loader
            .load(quote, self.sink.as_ref())
            .instrument(tracing::info_span!("load"))
            .await
    }

    /// Run all three stages once
    pub async fn run_cycle(&self) -> Result<StoredQuote, EtlError> {
        let raw = self.extract().await?;
        let quote = self.transform(raw)?;
        self.load(&quote).await
    }
}
