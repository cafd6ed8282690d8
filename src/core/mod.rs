//! Query validation, encoding and caching

pub mod cache;
pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod query;
pub mod validator;

// Re-export main types for cleaner imports
pub use cache::{Cache, Payload, ResponseCache};
pub use currency::CurrencyCode;
pub use error::{Error, Result};
pub use query::{Query, TimeFrame};
