//! Command-line front end for the stock evaluator and the portfolio analyzer
//!
//! # Usage
//!
//! ```bash
//! # Point at the scoring service (defaults to http://localhost:5000)
//! export ANALYST_SERVICE_URL="http://localhost:5000"
//!
//! # Evaluate stocks, uploading a file straight away
//! cargo run -p analyst-cli -- stock --file stocks.json
//!
//! # Analyze portfolios, printing chart series as JSON
//! cargo run -p analyst-cli -- --json portfolio
//! ```

mod commands;
mod render;
mod repl;

use analyst_core::ScoringService;
use analyst_http::{ClientConfig, PortfolioServiceClient, StockServiceClient};
use analyst_utils::LogFormat;
use clap::{Parser, Subcommand};
use commands::Command;
use render::{OutputMode, Presentable};
use repl::Repl;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "analyst", version)]
#[command(about = "Upload datasets to a scoring service and review evaluations", long_about = None)]
struct Args {
    /// Base URL of the scoring service [env: ANALYST_SERVICE_URL]
    #[arg(long, global = true)]
    service_url: Option<String>,

    /// Request timeout in seconds [env: ANALYST_TIMEOUT_SECS]
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Print listings and results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log line format: pretty or json
    #[arg(long, global = true, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    tool: Tool,
}

#[derive(Subcommand, Debug)]
enum Tool {
    /// Stock Evaluator: upload company parameters, evaluate one symbol at a time
    Stock {
        /// Dataset to upload on start
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Portfolio Analyzer: upload client holdings, evaluate one client at a time
    Portfolio {
        /// Dataset to upload on start
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

impl Args {
    /// Defaults, then environment, then flags
    fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = ClientConfig::default().with_env()?;
        if let Some(url) = &self.service_url {
            config.base_url.clone_from(url);
        }
        if let Some(secs) = self.timeout {
            config.request_timeout = Duration::from_secs(secs);
        }
        config.validate()?;
        Ok(config)
    }

    fn output(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Table
        }
    }
}

async fn run<S>(service: S, file: Option<PathBuf>, output: OutputMode) -> anyhow::Result<()>
where
    S: ScoringService,
    S::Evaluation: Presentable,
{
    let repl = Repl::new(Arc::new(service), output);
    let first = file.map(|path| Command::Upload(Some(path)));

    let stdin = io::stdin();
    repl.run(first, stdin.lock(), io::stdout()).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    analyst_utils::init_tracing_with(args.log_format)?;

    let config = args.client_config()?;
    let output = args.output();
    info!("Using scoring service at {}", config.base_url);

    match args.tool {
        Tool::Stock { file } => run(StockServiceClient::new(&config)?, file, output).await,
        Tool::Portfolio { file } => run(PortfolioServiceClient::new(&config)?, file, output).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "analyst",
            "--service-url",
            "http://scoring:8080",
            "--timeout",
            "5",
            "--json",
            "stock",
            "--file",
            "stocks.json",
        ])
        .unwrap();

        assert!(args.json);
        assert_eq!(args.output(), OutputMode::Json);
        assert_eq!(args.log_format, LogFormat::Pretty);
        assert!(matches!(
            &args.tool,
            Tool::Stock { file: Some(path) } if path.as_os_str() == "stocks.json"
        ));

        let config = args.client_config().unwrap();
        assert_eq!(config.base_url, "http://scoring:8080");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["analyst", "portfolio", "--log-format", "json"]).unwrap();
        assert_eq!(args.log_format, LogFormat::Json);
        assert_eq!(args.output(), OutputMode::Table);
        assert!(matches!(args.tool, Tool::Portfolio { file: None }));
    }

    #[test]
    fn test_args_reject_bad_input() {
        assert!(Args::try_parse_from(["analyst"]).is_err());
        assert!(Args::try_parse_from(["analyst", "--log-format", "yaml", "stock"]).is_err());
        assert!(Args::try_parse_from(["analyst", "bonds"]).is_err());
    }

    #[test]
    fn test_invalid_service_url_is_rejected() {
        let args =
            Args::try_parse_from(["analyst", "--service-url", "ftp://scoring", "stock"]).unwrap();
        assert!(args.client_config().is_err());
    }
}
