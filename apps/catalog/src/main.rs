use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use catalog_view::{CatalogSession, ViewSettings};
use clap::Parser;
use client_core::{HttpDataSource, ListingMode, SystemClock};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;
use url_state::{LocationStore, MemoryLocation};

mod commands;
mod config;
mod render;

use commands::{parse_command, CliCommand, HELP};
use config::load_settings;

#[derive(Parser, Debug)]
#[command(about = "Browse a paginated product listing from the terminal")]
struct Args {
    /// Listing endpoint, e.g. https://dummyjson.com/products
    #[arg(long)]
    api_url: Option<String>,
    /// Initial location, e.g. "/products?q=phone&page=2" or "?sortBy=price"
    #[arg(long, default_value = "")]
    location: String,
    #[arg(long)]
    page_size: Option<u32>,
    #[arg(long, value_parser = parse_mode)]
    mode: Option<ListingMode>,
    /// Settings file (defaults to ./catalog.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Render the initial view and exit
    #[arg(long)]
    once: bool,
}

fn parse_mode(raw: &str) -> Result<ListingMode, String> {
    ListingMode::parse(raw).ok_or_else(|| format!("unknown listing mode '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref());
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    if let Some(page_size) = args.page_size.filter(|size| *size > 0) {
        settings.page_size = page_size;
    }
    if let Some(mode) = args.mode {
        settings.listing_mode = mode;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let endpoint = Url::parse(&settings.api_url)
        .with_context(|| format!("invalid listing endpoint '{}'", settings.api_url))?;
    info!(endpoint = %endpoint, mode = ?settings.listing_mode, page_size = settings.page_size, "starting catalog");

    let location = if args.location.starts_with('/') {
        MemoryLocation::from_href(&args.location)
    } else {
        MemoryLocation::new("/products", args.location.as_str())
    };
    let path = location.path().to_string();

    let source =
        HttpDataSource::with_timeout(endpoint, settings.listing_mode, settings.request_timeout)
            .context("failed to build HTTP client")?;

    let mut session = CatalogSession::start(
        location,
        Arc::new(source),
        ViewSettings {
            page_size: settings.page_size,
            cache: settings.cache_settings(),
        },
        Arc::new(SystemClock),
    );
    session.settle().await;
    print!("{}", render::render(&session.snapshot(), &path));

    if args.once {
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read command")? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        session.revalidate();
        match command {
            CliCommand::Quit => break,
            CliCommand::Help => {
                println!("{HELP}");
                continue;
            }
            CliCommand::Show => {}
            CliCommand::Refetch => session.refetch(),
            CliCommand::View(action) => {
                session.dispatch(action);
            }
        }

        if session.outstanding() > 0 {
            print!("{}", render::render(&session.snapshot(), &path));
        }
        session.settle().await;
        print!("{}", render::render(&session.snapshot(), &path));
    }

    info!(location = %session.controller().location().search(), "catalog closed");
    Ok(())
}
