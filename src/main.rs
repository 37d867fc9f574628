//! Storefront Copy - Fetch editorial storefront copy
//!
//! Prints header, footer, or product copy from the content API as JSON,
//! serving cached or default copy when the API is unavailable.

use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use storefront_copy::cli::{Action, Cli, StartupConfig};
use storefront_copy::config::SanityConfig;
use storefront_copy::content::{ContentService, SanityClient};
use storefront_copy::refresh::{RefreshConfig, RefreshHandle, RefreshMessage};

/// Logs go to stderr so stdout stays valid JSON
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Writes `value` as pretty JSON followed by a newline
fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let startup = StartupConfig::from_cli(&cli)?;
    tracing::debug!(action = ?startup.action, "parsed arguments");

    let mut config = SanityConfig::from_env()?;
    if startup.public {
        config = config.public();
    }
    tracing::debug!(?config, ttl = ?startup.ttl, "starting");

    let client = SanityClient::new(&config)?;
    let service = Arc::new(ContentService::new(client, startup.ttl));

    match startup.action {
        Action::Header => print_json(&service.header().await)?,
        Action::Footer => print_json(&service.footer().await)?,
        Action::Layout => print_json(&service.layout().await)?,
        Action::ProductCopy(product_id) => {
            print_json(&service.product_copy(&product_id).await?)?
        }
        Action::Watch { interval, count } => {
            let mut handle = RefreshHandle::spawn(service.clone(), RefreshConfig { interval });

            let mut updates = 0u64;
            loop {
                tokio::select! {
                    message = handle.receiver.recv() => match message {
                        Some(RefreshMessage::LayoutUpdated(layout)) => {
                            print_json(&layout)?;
                            updates += 1;
                            if count.is_some_and(|count| updates >= count) {
                                break;
                            }
                        }
                        None => break,
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }

            handle.shutdown().await;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine; variables may come from the environment.
    // Loaded before tracing so RUST_LOG can be set there.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
