mod app;
mod config;
mod panels;
mod store;
mod ui;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "marks")]
#[command(about = "Terminal bookmark tree browser", long_about = None)]
struct Args {
    /// Bookmark document URL (overrides the configured source)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Config file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let mut config = config::load_config(args.config)?;
    if let Some(url) = args.url {
        config.source.url = url;
    }

    // Create and run the application
    let mut app = app::MarksApp::new(config)?;
    app.run().await?;

    Ok(())
}
