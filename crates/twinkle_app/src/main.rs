//! twinkle-demo: render a chat page with a star rating request
//!
//! Simulates user clicks on the rating widget and writes the resulting page
//! as HTML.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use twinkle_app::{ChatPage, TwinkleConfig};
use twinkle_widgets::Rating;

#[derive(Parser, Debug)]
#[command(name = "twinkle-demo", about = "Render a chat page with a star rating request")]
struct Args {
    /// Configuration file (twinkle.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Star to click, in order; may be repeated
    #[arg(long = "click", value_name = "STAR")]
    clicks: Vec<u8>,

    /// Write HTML here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => TwinkleConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => TwinkleConfig::default(),
    };

    let mut page = ChatPage::new(config).context("building chat page")?;
    let widget = page.request_rating().context("requesting rating")?;

    for click in &args.clicks {
        let rating = Rating::try_from(*click).with_context(|| format!("--click {click}"))?;
        page.rate(&widget, rating);

        for message in page.take_outbox() {
            info!(payload = %message.payload(), "sent");
        }
        page.acknowledge(rating).context("acknowledging rating")?;
    }

    let html = page.render_html();
    match &args.output {
        Some(path) => {
            fs::write(path, html).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "page written");
        }
        None => print!("{html}"),
    }

    Ok(())
}
