//! Command-line interface parsing for Storefront Copy
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into a validated `StartupConfig` for the binary.

use std::time::Duration;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::cache::DEFAULT_TTL;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// `product-copy` was given an empty id
    #[error("Invalid product id: must not be empty")]
    EmptyProductId,

    /// `watch` was given a zero interval
    #[error("Invalid interval: must be at least 1 second")]
    ZeroInterval,
}

/// Storefront Copy - Fetch editorial storefront copy from the content API
#[derive(Parser, Debug)]
#[command(name = "storefront-copy")]
#[command(about = "Editorial storefront copy with a stale-tolerant cache")]
#[command(version)]
pub struct Cli {
    /// Read published documents anonymously through the CDN
    #[arg(long, global = true)]
    pub public: bool,

    /// How long fetched documents are served without revalidating
    #[arg(long, global = true, value_name = "SECS", default_value_t = DEFAULT_TTL.as_secs())]
    pub ttl_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// What to fetch
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the site header
    Header,
    /// Print the site footer
    Footer,
    /// Print header and footer together
    Layout,
    /// Print the copy attached to a commerce product
    ProductCopy {
        /// Commerce product id, e.g. prod_01H...
        product_id: String,
    },
    /// Poll header and footer on an interval, printing each refresh
    ///
    /// Examples:
    ///   storefront-copy watch                      # every 60s until Ctrl-C
    ///   storefront-copy watch --interval-secs 5 --count 3
    Watch {
        /// Seconds between polls
        #[arg(long, value_name = "SECS", default_value_t = 60)]
        interval_secs: u64,
        /// Stop after this many refreshes
        #[arg(long, value_name = "N")]
        count: Option<u64>,
    },
}

/// Validated action to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Header,
    Footer,
    Layout,
    ProductCopy(String),
    Watch {
        interval: Duration,
        count: Option<u64>,
    },
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// Cache time-to-live
    pub ttl: Duration,
    /// Whether to read anonymously through the CDN
    pub public: bool,
    /// What to do
    pub action: Action,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if an argument is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let action = match &cli.command {
            Command::Header => Action::Header,
            Command::Footer => Action::Footer,
            Command::Layout => Action::Layout,
            Command::ProductCopy { product_id } => {
                let product_id = product_id.trim();
                if product_id.is_empty() {
                    return Err(CliError::EmptyProductId);
                }
                Action::ProductCopy(product_id.to_string())
            }
            Command::Watch {
                interval_secs,
                count,
            } => {
                if *interval_secs == 0 {
                    return Err(CliError::ZeroInterval);
                }
                Action::Watch {
                    interval: Duration::from_secs(*interval_secs),
                    count: *count,
                }
            }
        };

        Ok(StartupConfig {
            ttl: Duration::from_secs(cli.ttl_secs),
            public: cli.public,
            action,
        })
    }
}
