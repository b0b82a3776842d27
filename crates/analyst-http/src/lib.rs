//! HTTP clients for the remote scoring services
//!
//! Implements [`analyst_core::ScoringService`] over reqwest for:
//!
//! - [`StockServiceClient`]: multipart upload, company listing, per-symbol evaluation
//! - [`PortfolioServiceClient`]: JSON upload and per-customer evaluation
//!
//! Both clients share a [`ClientConfig`] holding the base URL, timeouts and
//! endpoint paths.

pub mod config;
pub mod error;
pub mod portfolio;
pub mod stock;
mod transport;
mod wire;

#[cfg(test)]
mod testing;

pub use config::{ClientConfig, ClientConfigBuilder, PortfolioEndpoints, StockEndpoints};
pub use error::{ClientError, Result};
pub use portfolio::PortfolioServiceClient;
pub use stock::StockServiceClient;
