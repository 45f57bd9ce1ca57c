//! Loading validated quotes into the store

use super::{EtlError, Stage, StageTiming, TimingSink};
use crate::quote::{Quote, StoredQuote};
use crate::store::QuoteStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

/// Writes one row per validated quote
pub struct Loader {
    store: Arc<dyn QuoteStore>,
}

impl Loader {
    pub fn new(store: Arc<dyn QuoteStore>) -> Self {
        Self { store }
    }

    /// Insert `quote` stamped with the current UTC time
    pub async fn load(
        &self,
        quote: &Quote,
        sink: &dyn TimingSink,
    ) -> Result<StoredQuote, EtlError> {
        let start = Instant::now();
        let stored = self.store.insert(quote, Utc::now()).await?;
        sink.record(StageTiming::since(Stage::Load, start));

        tracing::info!(
            id = stored.id,
            amount = %stored.quote.amount,
            base = %stored.quote.base,
            currency = %stored.quote.currency,
            "Quote stored"
        );

        Ok(stored)
    }
}
