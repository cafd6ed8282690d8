//! Terminal output and setup for the `exrates` binary

pub mod rates;
pub mod setup;
pub mod ui;
