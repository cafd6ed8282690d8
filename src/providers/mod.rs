//! HTTP access to the exchange rate API

pub mod context;
pub mod exchange;
pub mod http;
pub mod payload;

pub use context::ExchangeContext;
pub use exchange::Exchange;
pub use http::{HttpResponse, HttpTransport, ReqwestTransport};
