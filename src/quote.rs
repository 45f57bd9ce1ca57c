//! Spot price quote types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A validated spot price quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Quote {
    /// Price as sent by the API (decimal string, e.g. "64213.57")
    pub amount: String,
    /// Asset code (e.g. "BTC")
    pub base: String,
    /// Quote currency code (e.g. "USD")
    pub currency: String,
}

impl Quote {
    pub fn new(
        amount: impl Into<String>,
        base: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            base: base.into(),
            currency: currency.into(),
        }
    }

    /// Parse `amount` as a decimal
    pub fn price(&self) -> Option<Decimal> {
        Decimal::from_str(&self.amount).ok()
    }
}

/// A quote persisted to the `bitcoin_data` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct StoredQuote {
    /// Storage-assigned, monotonically increasing identity
    pub id: i64,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub quote: Quote,
    /// Capture time (UTC)
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_parses_amount() {
        let quote = Quote::new("100.5", "BTC", "USD");
        assert_eq!(quote.price(), Some(dec!(100.5)));
    }

    #[test]
    fn test_price_non_numeric_amount() {
        let quote = Quote::new("n/a", "BTC", "USD");
        assert!(quote.price().is_none());
    }

    #[test]
    fn test_stored_quote_serializes_flat() {
        let stored = StoredQuote {
            id: 7,
            quote: Quote::new("64000.01", "BTC", "USD"),
            timestamp: DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["amount"], "64000.01");
        assert_eq!(json["currency"], "USD");
    }
}
