//! Client for the [exchangerate.host](https://exchangerate.host) currency
//! exchange rate API.
//!
//! Queries are validated and encoded into canonical URLs, responses are
//! cached until the next UTC midnight and rates are returned as
//! [`rust_decimal::Decimal`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use exrates::{Exchange, ExchangeContext};
//!
//! # async fn demo() -> exrates::Result<()> {
//! let context = Arc::new(ExchangeContext::new("https://api.exchangerate.host", "my-key")?);
//! let exchange = Exchange::from_code(context, "USD")?;
//! let eur = exchange.latest_rates_single("EUR").await?;
//! println!("1 USD = {eur} EUR");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod providers;

pub use crate::core::{CurrencyCode, Error, Query, Result, TimeFrame};
pub use crate::providers::{Exchange, ExchangeContext};

use crate::core::config::AppConfig;
use std::sync::Arc;
use tracing::{debug, info};

/// A command for the `exrates` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Supported fiat currencies
    Symbols,
    /// Supported cryptocurrencies
    Crypto,
    Latest {
        symbols: Vec<String>,
    },
    Convert {
        to: String,
        amount: i64,
        date: Option<String>,
    },
    Historical {
        date: String,
        symbols: Vec<String>,
    },
    Timeseries {
        start: String,
        end: String,
        symbols: Vec<String>,
    },
    Fluctuation {
        start: String,
        end: String,
        symbols: Vec<String>,
    },
}

/// Per-invocation overrides of the configuration.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub base: Option<String>,
    pub no_cache: bool,
}

fn load_config(config_path: Option<&str>) -> anyhow::Result<AppConfig> {
    match config_path {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    }
}

/// Runs `command` against the configured API and returns what should be printed.
pub async fn render_command(
    command: AppCommand,
    config_path: Option<&str>,
    options: &RunOptions,
) -> anyhow::Result<String> {
    let config = load_config(config_path)?;
    debug!("Loaded config: {config:#?}");

    let context = Arc::new(ExchangeContext::from_config(&config)?);
    let mut exchange = Exchange::new(context, config.base.clone());
    if let Some(base) = &options.base {
        exchange.set_base(base)?;
    }
    exchange.set_cache(config.cache && !options.no_cache);

    let base = exchange.base().to_string();
    let output = match command {
        AppCommand::Symbols => {
            let codes = exchange.forex_data().await?;
            cli::rates::code_table("Supported currencies", &codes)
        }
        AppCommand::Crypto => {
            let codes = exchange.crypto_data().await?;
            cli::rates::code_table("Supported cryptocurrencies", &codes)
        }
        AppCommand::Latest { symbols } => {
            let symbols: Vec<&str> = symbols.iter().map(String::as_str).collect();
            let rates = if symbols.is_empty() {
                exchange.latest_rates_all().await?
            } else {
                exchange.latest_rates_multiple(&symbols).await?
            };
            cli::rates::rates_table(&format!("Latest rates ({base})"), &rates)
        }
        AppCommand::Convert { to, amount, date } => {
            let result = match &date {
                Some(date) => exchange.convert_at(date, &to, amount).await?,
                None => exchange.convert_to(&to, amount).await?,
            };
            cli::rates::conversion_line(amount, &base, &result, &to)
        }
        AppCommand::Historical { date, symbols } => {
            let symbols: Vec<&str> = symbols.iter().map(String::as_str).collect();
            let rates = if symbols.is_empty() {
                exchange.historical_rates_all(&date).await?
            } else {
                exchange.historical_rates_multiple(&date, &symbols).await?
            };
            cli::rates::rates_table(&format!("Rates on {date} ({base})"), &rates)
        }
        AppCommand::Timeseries {
            start,
            end,
            symbols,
        } => {
            let symbols: Vec<&str> = symbols.iter().map(String::as_str).collect();
            let series = if symbols.is_empty() {
                exchange.timeseries_all(&start, &end).await?
            } else {
                exchange.timeseries_multiple(&start, &end, &symbols).await?
            };
            cli::rates::series_table(&format!("Rates {start} to {end} ({base})"), "Date", &series)
        }
        AppCommand::Fluctuation {
            start,
            end,
            symbols,
        } => {
            let symbols: Vec<&str> = symbols.iter().map(String::as_str).collect();
            let series = if symbols.is_empty() {
                exchange.fluctuation_all(&start, &end).await?
            } else {
                exchange.fluctuation_multiple(&start, &end, &symbols).await?
            };
            cli::rates::series_table(
                &format!("Fluctuation {start} to {end} ({base})"),
                "Symbol",
                &series,
            )
        }
    };

    Ok(output)
}

/// Runs `command` and prints its result.
pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    options: &RunOptions,
) -> anyhow::Result<()> {
    info!(?command, "Running command");
    let output = render_command(command, config_path, options).await?;
    println!("{output}");
    Ok(())
}
