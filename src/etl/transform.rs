//! Payload validation

use crate::quote::Quote;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// The payload did not match `{"data": {"amount", "base", "currency"}}`
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Missing field, wrong type or missing `data` object
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Field present but empty
    #[error("field `data.{0}` is empty")]
    EmptyField(&'static str),
}

/// Spot price response envelope
#[derive(Debug, Deserialize)]
struct SpotPriceResponse {
    data: Quote,
}

/// Validate a raw spot price response into a [`Quote`]
///
/// Fields other than `amount`, `base` and `currency` are dropped.
pub fn validate(raw: Value) -> Result<Quote, ValidationError> {
    let response: SpotPriceResponse = serde_json::from_value(raw)?;
    let quote = response.data;

    for (name, value) in [
        ("amount", &quote.amount),
        ("base", &quote.base),
        ("currency", &quote.currency),
    ] {
        if value.is_empty() {
            return Err(ValidationError::EmptyField(name));
        }
    }

    Ok(quote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_spot_price() {
        let raw = json!({
            "data": {"amount": "64213.57", "base": "BTC", "currency": "USD"}
        });

        let quote = validate(raw).unwrap();
        assert_eq!(quote, Quote::new("64213.57", "BTC", "USD"));
    }

    #[test]
    fn test_validate_drops_extra_fields() {
        let raw = json!({
            "data": {
                "amount": "100.5",
                "base": "BTC",
                "currency": "USD",
                "exchange": "coinbase"
            },
            "warnings": []
        });

        let quote = validate(raw).unwrap();
        let json = serde_json::to_value(&quote).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.iter().all(|k| ["amount", "base", "currency"].contains(&k.as_str())));
    }

    #[test]
    fn test_validate_missing_field() {
        for missing in ["amount", "base", "currency"] {
            let mut data = json!({"amount": "1", "base": "BTC", "currency": "USD"});
            data.as_object_mut().unwrap().remove(missing);

            let result = validate(json!({ "data": data }));
            assert!(
                matches!(result, Err(ValidationError::Malformed(_))),
                "missing {missing} should fail"
            );
        }
    }

    #[test]
    fn test_validate_empty_field() {
        let raw = json!({"data": {"amount": "1", "base": "", "currency": "USD"}});
        let err = validate(raw).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyField("base")));
    }

    #[test]
    fn test_validate_wrong_type() {
        let raw = json!({"data": {"amount": 100.5, "base": "BTC", "currency": "USD"}});
        assert!(validate(raw).is_err());
    }

    #[test]
    fn test_validate_missing_envelope() {
        let raw = json!({"amount": "1", "base": "BTC", "currency": "USD"});
        assert!(validate(raw).is_err());
    }

    #[test]
    fn test_validate_api_error_body() {
        let raw = json!({"errors": [{"id": "not_found", "message": "Invalid currency"}]});
        assert!(validate(raw).is_err());
    }
}
