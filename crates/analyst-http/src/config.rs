//! Configuration for the scoring service clients

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Endpoint paths of the stock evaluation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEndpoints {
    /// Multipart upload of the raw file
    pub upload: String,
    /// Listing of uploaded companies
    pub companies: String,
    /// Per-symbol evaluation; the symbol is appended as a path segment
    pub evaluate: String,
}

impl Default for StockEndpoints {
    fn default() -> Self {
        Self {
            upload: "/upload".to_string(),
            companies: "/companies".to_string(),
            evaluate: "/evaluate".to_string(),
        }
    }
}

/// Endpoint paths of the portfolio analysis service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioEndpoints {
    pub upload: String,
    pub evaluate: String,
}

impl Default for PortfolioEndpoints {
    fn default() -> Self {
        Self {
            upload: "/upload-json".to_string(),
            evaluate: "/evaluate-customer".to_string(),
        }
    }
}

/// Configuration shared by both service clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the scoring service
    pub base_url: String,

    /// Whole-request timeout
    pub request_timeout: Duration,

    /// TCP connect timeout
    pub connect_timeout: Duration,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` from the environment
    pub use_system_proxy: bool,

    pub stock: StockEndpoints,

    pub portfolio: PortfolioEndpoints,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            use_system_proxy: true,
            stock: StockEndpoints::default(),
            portfolio: PortfolioEndpoints::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Override settings from `ANALYST_SERVICE_URL` and `ANALYST_TIMEOUT_SECS`
    pub fn with_env(mut self) -> Result<Self> {
        if let Ok(url) = std::env::var("ANALYST_SERVICE_URL") {
            self.base_url = url;
        }
        if let Ok(secs) = std::env::var("ANALYST_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ClientError::ConfigError(format!("ANALYST_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            self.request_timeout = Duration::from_secs(secs);
        }
        Ok(self)
    }

    /// Parsed base URL
    pub fn base(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::ConfigError(format!(
                "base_url must use http or https, got {}",
                url.scheme()
            )));
        }
        Ok(url)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.base()?;

        if self.request_timeout.is_zero() {
            return Err(ClientError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.connect_timeout.is_zero() {
            return Err(ClientError::ConfigError(
                "connect_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    request_timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    use_system_proxy: Option<bool>,
    stock: Option<StockEndpoints>,
    portfolio: Option<PortfolioEndpoints>,
}

impl ClientConfigBuilder {
    /// Set the service base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the connect timeout
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Route requests through the environment's proxy settings or not
    pub fn use_system_proxy(mut self, enabled: bool) -> Self {
        self.use_system_proxy = Some(enabled);
        self
    }

    pub fn stock_endpoints(mut self, endpoints: StockEndpoints) -> Self {
        self.stock = Some(endpoints);
        self
    }

    pub fn portfolio_endpoints(mut self, endpoints: PortfolioEndpoints) -> Self {
        self.portfolio = Some(endpoints);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ClientConfig> {
        let defaults = ClientConfig::default();

        let config = ClientConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            use_system_proxy: self.use_system_proxy.unwrap_or(defaults.use_system_proxy),
            stock: self.stock.unwrap_or(defaults.stock),
            portfolio: self.portfolio.unwrap_or(defaults.portfolio),
        };

        config.validate()?;
        Ok(config)
    }
}
