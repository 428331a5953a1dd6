use anyhow::{Context, Result};
use chunkload::{load::DEFAULT_CHUNK_SIZE, load_with, utils::expand_home, LoadOptions};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Hourly Beijing PM2.5 export the loader reads when no path is given.
const DEFAULT_SOURCE: &str = "~/Downloads/BJ_PM25.csv";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Load a CSV file in fixed-size row chunks into one in-memory table"
)]
struct Args {
    /// CSV file with a header row
    #[arg(default_value = DEFAULT_SOURCE)]
    path: String,
    /// Data rows per chunk
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,
    /// Print the first N rows of the loaded table
    #[arg(long, value_name = "N")]
    head: Option<usize>,
    /// Print the table shape as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) resolve input ────────────────────────────────────────────
    let args = Args::parse();
    let path = expand_home(&args.path);
    let opts = LoadOptions {
        chunk_size: args.chunk_size,
        ..LoadOptions::default()
    };

    // ─── 3) chunked read + concat ────────────────────────────────────
    let table = load_with(&path, &opts)?;
    let (rows, columns) = table.shape();
    info!(path = %path.display(), rows, columns, "table ready");

    // ─── 4) optional inspection ──────────────────────────────────────
    if let Some(n) = args.head {
        println!("{}", table.head(n));
    }
    if args.json {
        let shape = serde_json::to_string_pretty(&table.describe_shape())
            .context("serializing table shape")?;
        println!("{}", shape);
    }

    Ok(())
}
