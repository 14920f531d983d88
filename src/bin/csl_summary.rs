use anyhow::Result;
use clap::Parser;
use cslscraper::csl::{self, SourceList};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Print per-list record counts and skipped rows for a local CSL file.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    path: PathBuf,
    /// Also print every skipped row
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let parsed = csl::read_file(&args.path)?;

    println!("{}", args.path.display());
    for source in SourceList::ALL {
        println!("  {:<8} {:>7}", source.code(), parsed.records.count(source));
    }
    println!("  {:<8} {:>7}", "total", parsed.records.len());

    if parsed.errors.is_empty() {
        return Ok(());
    }
    println!("skipped:");
    for (kind, n) in parsed.skipped_by_reason() {
        println!("  {:<16} {:>7}", format!("{:?}", kind), n);
    }
    if args.verbose {
        for err in &parsed.errors {
            println!("  {}", err);
        }
    }
    Ok(())
}
