//! Expected response shapes for each endpoint, and the decimal conversion
//! applied to every rate at the decoding boundary.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Number, Value};
use std::collections::BTreeMap;

pub use crate::core::cache::Payload;
use crate::core::{Error, Result};

/// Currency (or cryptocurrency) code to its descriptive fields.
pub type CodeTable = BTreeMap<String, BTreeMap<String, String>>;

/// Symbol to rate.
pub type Rates = BTreeMap<String, Decimal>;

/// Outer key (a date for time series, a symbol for fluctuation) to inner key to value.
pub type RateSeries = BTreeMap<String, Rates>;

#[derive(Debug, Deserialize)]
pub(crate) struct SymbolsPayload {
    pub symbols: CodeTable,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CryptocurrenciesPayload {
    pub cryptocurrencies: CodeTable,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RatesPayload {
    pub rates: BTreeMap<String, Number>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConvertPayload {
    pub result: Number,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SeriesPayload {
    pub rates: BTreeMap<String, BTreeMap<String, Number>>,
}

/// Decodes `payload` into the shape expected from `endpoint`.
pub(crate) fn decode<T: DeserializeOwned>(endpoint: &str, payload: Payload) -> Result<T> {
    serde_json::from_value(Value::Object(payload))
        .map_err(|e| Error::unexpected_shape(endpoint, e))
}

/// Converts a JSON number to a [`Decimal`] through its shortest textual form.
///
/// The text may be plain (`1.0842`) or scientific (`1.2e-7`).
pub fn to_decimal(number: &Number) -> std::result::Result<Decimal, rust_decimal::Error> {
    let text = number.to_string();
    // from_scientific rejects plain numbers so trying both
    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&text))
}

pub(crate) fn to_rates(endpoint: &str, rates: BTreeMap<String, Number>) -> Result<Rates> {
    rates
        .into_iter()
        .map(|(symbol, rate)| {
            let value = to_decimal(&rate).map_err(|e| {
                Error::unexpected_shape(endpoint, format!("rate {rate} for {symbol}: {e}"))
            })?;
            Ok((symbol, value))
        })
        .collect()
}

pub(crate) fn to_series(
    endpoint: &str,
    series: BTreeMap<String, BTreeMap<String, Number>>,
) -> Result<RateSeries> {
    series
        .into_iter()
        .map(|(key, rates)| Ok((key, to_rates(endpoint, rates)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn payload(json: &str) -> Payload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_to_decimal_keeps_shortest_form() {
        let number: Number = serde_json::from_str("1.0842").unwrap();
        assert_eq!(to_decimal(&number).unwrap(), dec!(1.0842));

        let number: Number = serde_json::from_str("0.1").unwrap();
        assert_eq!(to_decimal(&number).unwrap(), dec!(0.1));

        let number: Number = serde_json::from_str("133").unwrap();
        assert_eq!(to_decimal(&number).unwrap(), dec!(133));
    }

    #[test]
    fn test_to_decimal_scientific() {
        let number: Number = serde_json::from_str("1.2e-7").unwrap();
        assert_eq!(to_decimal(&number).unwrap(), dec!(0.00000012));
    }

    #[test]
    fn test_decode_rates() {
        let decoded: RatesPayload = decode(
            "latest",
            payload(r#"{"success": true, "rates": {"USD": 1.1, "GBP": 0.85}}"#),
        )
        .unwrap();
        let rates = to_rates("latest", decoded.rates).unwrap();
        assert_eq!(rates["USD"], dec!(1.1));
        assert_eq!(rates["GBP"], dec!(0.85));
    }

    #[test]
    fn test_decode_missing_field_is_unexpected_shape() {
        let err = decode::<RatesPayload>("latest", payload(r#"{"success": true}"#)).unwrap_err();
        assert!(matches!(err, Error::UnexpectedShape { endpoint, .. } if endpoint == "latest"));

        let err = decode::<ConvertPayload>("convert", payload(r#"{"result": null}"#)).unwrap_err();
        assert!(matches!(err, Error::UnexpectedShape { .. }));

        let err = decode::<RatesPayload>("latest", payload(r#"{"rates": {"USD": "1.1"}}"#))
            .unwrap_err();
        assert!(matches!(err, Error::UnexpectedShape { .. }));
    }

    #[test]
    fn test_decode_series() {
        let decoded: SeriesPayload = decode(
            "timeseries",
            payload(
                r#"{"rates": {
                    "2020-01-01": {"USD": 1.12, "GBP": 0.85},
                    "2020-01-02": {"USD": 1.13}
                }}"#,
            ),
        )
        .unwrap();
        let series = to_series("timeseries", decoded.rates).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series["2020-01-01"]["GBP"], dec!(0.85));
        assert_eq!(series["2020-01-02"]["USD"], dec!(1.13));
    }
}
