//! Query parameters and their encoding into a request URL.

use reqwest::Url;
use std::collections::BTreeMap;

use super::error::{Error, Result};
use super::validator::{validate_code, validate_date, validate_symbols, validate_time_frame};

/// A `(start_date, end_date)` pair for time-series and fluctuation queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeFrame {
    pub start: String,
    pub end: String,
}

impl TimeFrame {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Parameters sent to an endpoint. Every field is optional.
///
/// Nothing is validated until [`Query::encode`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Query {
    pub base: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Only sent when greater than one.
    pub amount: Option<i64>,
    pub symbols: Vec<String>,
    pub date: Option<String>,
    pub time_frame: Option<TimeFrame>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_time_frame(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.time_frame = Some(TimeFrame::new(start, end));
        self
    }

    /// Builds the request URL for `endpoint`.
    ///
    /// Fields are validated in the order base, from, to, amount, symbols, date,
    /// time frame and the first failure is returned. The access key is always
    /// sent, even when empty. Parameters come out sorted by name, so equal
    /// queries encode to byte-identical URLs.
    pub fn encode(&self, endpoint: &str, access_key: &str) -> Result<Url> {
        let mut url = Url::parse(endpoint).map_err(|e| Error::InvalidUrl {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        let mut params: BTreeMap<&str, String> = BTreeMap::new();
        params.insert("access_key", access_key.to_string());

        if let Some(base) = &self.base {
            validate_code(base)?;
            params.insert("base", base.clone());
        }

        if let Some(from) = &self.from {
            validate_code(from)?;
            params.insert("from", from.clone());
        }

        if let Some(to) = &self.to {
            validate_code(to)?;
            params.insert("to", to.clone());
        }

        if let Some(amount) = self.amount.filter(|amount| *amount > 1) {
            params.insert("amount", amount.to_string());
        }

        if !self.symbols.is_empty() {
            validate_symbols(self.symbols.as_slice())?;
            params.insert("symbols", self.symbols.join(","));
        }

        if let Some(date) = &self.date {
            validate_date(date)?;
            params.insert("date", date.clone());
        }

        if let Some(frame) = &self.time_frame {
            // only the start is floor-checked, end >= start follows
            validate_date(&frame.start)?;
            validate_time_frame(&frame.start, &frame.end)?;
            params.insert("start_date", frame.start.clone());
            params.insert("end_date", frame.end.clone());
        }

        url.query_pairs_mut().clear().extend_pairs(params.iter());
        Ok(url)
    }
}
