//! pagecache - fetch URLs through a shared, counting cache
//!
//! Each requested URL is counted in the configured key-value store and served
//! from a short-lived cache when possible. Page bodies go to stdout; logs go
//! to stderr.

use std::io::{self, Write};

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pagecache::cli::{Cli, Command, ProxyConfig};
use pagecache::PageProxy;

/// Installs the global tracing subscriber; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
    let filter = if verbose {
        "pagecache=debug,warn"
    } else {
        "pagecache=warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Validate everything before touching the store
    let config = ProxyConfig::from_cli(&cli)?;

    let store = config.store.connect().await?;
    info!(store = ?config.store, ttl_secs = config.ttl.as_secs(), "Store ready");
    let proxy = PageProxy::new(store).with_ttl(config.ttl);

    let mut stdout = io::stdout().lock();
    match &cli.command {
        Command::Get { urls, repeat } => {
            for _ in 0..*repeat {
                for url in urls {
                    let page = proxy.get_page(url).await?;
                    stdout.write_all(page.as_bytes())?;
                }
            }
        }
        Command::Count { urls } => {
            for url in urls {
                let count = proxy.access_count(url).await?;
                writeln!(stdout, "{}\t{}", count, url)?;
            }
        }
    }
    stdout.flush()?;

    Ok(())
}
