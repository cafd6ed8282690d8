//! Client for the exchangerate.host API.

use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::context::ExchangeContext;
use super::payload::{
    self, CodeTable, ConvertPayload, CryptocurrenciesPayload, Payload, RateSeries, Rates,
    RatesPayload, SeriesPayload, SymbolsPayload,
};
use crate::core::validator::validate_date;
use crate::core::{CurrencyCode, Error, Query, Result};

pub const SYMBOLS: &str = "symbols";
pub const CRYPTOCURRENCIES: &str = "cryptocurrencies";
pub const LATEST: &str = "latest";
pub const CONVERT: &str = "convert";
pub const TIMESERIES: &str = "timeseries";
pub const FLUCTUATION: &str = "fluctuation";

/// A client with its own base currency and caching switch, over a shared
/// [`ExchangeContext`].
#[derive(Clone)]
pub struct Exchange {
    context: Arc<ExchangeContext>,
    base: CurrencyCode,
    cache_enabled: bool,
}

impl Exchange {
    /// Creates a client with caching enabled.
    pub fn new(context: Arc<ExchangeContext>, base: CurrencyCode) -> Self {
        Self {
            context,
            base,
            cache_enabled: true,
        }
    }

    pub fn from_code(context: Arc<ExchangeContext>, base: &str) -> Result<Self> {
        Ok(Self::new(context, base.parse()?))
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    /// Changes the base currency. The current one is kept if `base` is invalid.
    pub fn set_base(&mut self, base: &str) -> Result<()> {
        self.base = base.parse()?;
        Ok(())
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    /// Turns the shared cache on or off for this client only.
    pub fn set_cache(&mut self, enabled: bool) {
        self.cache_enabled = enabled;
    }

    pub fn context(&self) -> &Arc<ExchangeContext> {
        &self.context
    }

    /// Fetches `path` with `query`: encode, probe the cache, request, decode,
    /// check `success`, store.
    #[instrument(
        name = "ExchangeFetch",
        skip(self, query),
        fields(cache = self.cache_enabled)
    )]
    pub async fn get(&self, path: &str, query: &Query) -> Result<Payload> {
        let url = query.encode(&self.context.endpoint(path), self.context.access_key())?;
        let cache_key = url.to_string();

        if self.cache_enabled {
            if let Some(cached) = self.context.cache().get(&cache_key).await {
                return Ok(cached);
            }
        }

        debug!("Requesting {}", url.path());
        let response = self.context.transport().get(&url).await?;
        debug!(status = response.status, "Received response");

        let body = response.body;
        let payload: Payload = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(source) => {
                warn!(error = %source, "Failed to decode response");
                return Err(Error::Decode { body, source });
            }
        };

        match payload.get("success") {
            Some(Value::Bool(true)) => {}
            Some(Value::Bool(false)) => return Err(Error::InvalidApiResponse { body }),
            Some(other) => {
                return Err(Error::unexpected_shape(
                    path,
                    format!("non-boolean success field {other} in {body:?}"),
                ));
            }
            None => {
                return Err(Error::unexpected_shape(
                    path,
                    format!("missing success field in {body:?}"),
                ));
            }
        }

        if self.cache_enabled {
            self.context.cache().put(cache_key, payload.clone()).await;
        }

        Ok(payload)
    }

    fn base_query(&self) -> Query {
        Query::new().with_base(self.base.as_str())
    }

    async fn api_symbols(&self) -> Result<CodeTable> {
        let payload = self.get(SYMBOLS, &Query::new()).await?;
        Ok(payload::decode::<SymbolsPayload>(SYMBOLS, payload)?.symbols)
    }

    async fn api_cryptocurrencies(&self) -> Result<CodeTable> {
        let payload = self.get(CRYPTOCURRENCIES, &Query::new()).await?;
        Ok(payload::decode::<CryptocurrenciesPayload>(CRYPTOCURRENCIES, payload)?.cryptocurrencies)
    }

    async fn api_rates(&self, path: &str, query: &Query) -> Result<Rates> {
        let payload = self.get(path, query).await?;
        let decoded: RatesPayload = payload::decode(path, payload)?;
        payload::to_rates(path, decoded.rates)
    }

    async fn api_convert(&self, query: &Query) -> Result<Decimal> {
        let payload = self.get(CONVERT, query).await?;
        let decoded: ConvertPayload = payload::decode(CONVERT, payload)?;
        payload::to_decimal(&decoded.result)
            .map_err(|e| Error::unexpected_shape(CONVERT, format!("result {}: {e}", decoded.result)))
    }

    /// Historical rates live under a `/YYYY-MM-DD` path rather than a `date` parameter.
    async fn api_historical(&self, date: &str, query: Query) -> Result<Rates> {
        validate_date(date)?;
        let query = Query { date: None, ..query };
        self.api_rates(date, &query).await
    }

    async fn api_series(&self, path: &str, query: &Query) -> Result<RateSeries> {
        let payload = self.get(path, query).await?;
        let decoded: SeriesPayload = payload::decode(path, payload)?;
        payload::to_series(path, decoded.rates)
    }

    /// Sorted codes of the supported forex/fiat currencies.
    pub async fn forex_codes(&self) -> Result<Vec<String>> {
        Ok(self.api_symbols().await?.into_keys().collect())
    }

    /// Supported forex/fiat currencies with their descriptions.
    pub async fn forex_data(&self) -> Result<CodeTable> {
        self.api_symbols().await
    }

    /// Sorted codes of the supported cryptocurrencies.
    pub async fn crypto_codes(&self) -> Result<Vec<String>> {
        Ok(self.api_cryptocurrencies().await?.into_keys().collect())
    }

    /// Supported cryptocurrencies with their names and symbols.
    pub async fn crypto_data(&self) -> Result<CodeTable> {
        self.api_cryptocurrencies().await
    }

    pub async fn latest_rates_all(&self) -> Result<Rates> {
        self.api_rates(LATEST, &self.base_query()).await
    }

    pub async fn latest_rates_multiple(&self, symbols: &[&str]) -> Result<Rates> {
        let query = self.base_query().with_symbols(symbols.iter().copied());
        self.api_rates(LATEST, &query).await
    }

    pub async fn latest_rates_single(&self, symbol: &str) -> Result<Decimal> {
        let query = self.base_query().with_symbols([symbol]);
        let rates = self.api_rates(LATEST, &query).await?;
        pick(LATEST, rates, symbol)
    }

    /// Converts `amount` of the base currency into `target` at the latest rate.
    pub async fn convert_to(&self, target: &str, amount: i64) -> Result<Decimal> {
        let query = Query::new()
            .with_from(self.base.as_str())
            .with_to(target)
            .with_amount(amount);
        self.api_convert(&query).await
    }

    /// Converts `amount` of the base currency into `target` at the rate of `date`.
    pub async fn convert_at(&self, date: &str, target: &str, amount: i64) -> Result<Decimal> {
        let query = Query::new()
            .with_from(self.base.as_str())
            .with_to(target)
            .with_amount(amount)
            .with_date(date);
        self.api_convert(&query).await
    }

    pub async fn historical_rates_all(&self, date: &str) -> Result<Rates> {
        self.api_historical(date, self.base_query()).await
    }

    pub async fn historical_rates_multiple(&self, date: &str, symbols: &[&str]) -> Result<Rates> {
        let query = self.base_query().with_symbols(symbols.iter().copied());
        self.api_historical(date, query).await
    }

    pub async fn historical_rates_single(&self, date: &str, symbol: &str) -> Result<Decimal> {
        let query = self.base_query().with_symbols([symbol]);
        let rates = self.api_historical(date, query).await?;
        pick(date, rates, symbol)
    }

    /// Daily rates between `start` and `end`, keyed by date then symbol.
    pub async fn timeseries_all(&self, start: &str, end: &str) -> Result<RateSeries> {
        let query = self.base_query().with_time_frame(start, end);
        self.api_series(TIMESERIES, &query).await
    }

    pub async fn timeseries_multiple(
        &self,
        start: &str,
        end: &str,
        symbols: &[&str],
    ) -> Result<RateSeries> {
        let query = self
            .base_query()
            .with_time_frame(start, end)
            .with_symbols(symbols.iter().copied());
        self.api_series(TIMESERIES, &query).await
    }

    pub async fn timeseries_single(&self, start: &str, end: &str, symbol: &str) -> Result<RateSeries> {
        self.timeseries_multiple(start, end, &[symbol]).await
    }

    /// Fluctuation between `start` and `end`, keyed by symbol then figure
    /// (`start_rate`, `end_rate`, `change`, `change_pct`).
    pub async fn fluctuation_all(&self, start: &str, end: &str) -> Result<RateSeries> {
        let query = self.base_query().with_time_frame(start, end);
        self.api_series(FLUCTUATION, &query).await
    }

    pub async fn fluctuation_multiple(
        &self,
        start: &str,
        end: &str,
        symbols: &[&str],
    ) -> Result<RateSeries> {
        let query = self
            .base_query()
            .with_time_frame(start, end)
            .with_symbols(symbols.iter().copied());
        self.api_series(FLUCTUATION, &query).await
    }

    pub async fn fluctuation_single(&self, start: &str, end: &str, symbol: &str) -> Result<Rates> {
        let mut series = self.fluctuation_multiple(start, end, &[symbol]).await?;
        series
            .remove(symbol)
            .ok_or_else(|| Error::unexpected_shape(FLUCTUATION, format!("no entry for {symbol}")))
    }
}

fn pick(endpoint: &str, mut rates: Rates, symbol: &str) -> Result<Decimal> {
    rates
        .remove(symbol)
        .ok_or_else(|| Error::unexpected_shape(endpoint, format!("no rate for {symbol}")))
}
