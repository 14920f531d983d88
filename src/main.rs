use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cslscraper::{
    csl::{self, ParsedCsl, SourceList},
    fetch::{urls::UrlResolver, FetchConfig, HttpFetcher},
    uk::{self, ParsedUk},
};
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Source {
    Us,
    Uk,
    All,
}

#[derive(Parser)]
#[command(author, version, about = "Download and parse the US CSL and UK sanctions lists")]
struct Args {
    /// Directory downloaded files are cached in
    #[arg(long, default_value = "data")]
    dir: PathBuf,
    #[arg(long, value_enum, default_value_t = Source::All)]
    source: Source,
    /// Write parsed records as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Serialize)]
struct Output<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    us: Option<&'a csl::Csl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uk: Option<&'a [uk::UkRecord]>,
}

async fn run_us(fetcher: &HttpFetcher, resolver: &UrlResolver, dir: &Path) -> Result<ParsedCsl> {
    let mut files = csl::download(fetcher, resolver, dir).await?;
    let file = files
        .remove(csl::CSL_FILE_NAME)
        .context("us csl download returned no file")?;
    tokio::task::spawn_blocking(move || csl::read_csl(file)).await?
}

async fn run_uk(fetcher: &HttpFetcher, resolver: &UrlResolver, dir: &Path) -> Result<ParsedUk> {
    let file = uk::download(fetcher, resolver, dir).await?;
    tokio::task::spawn_blocking(move || uk::read_uk(file)).await?
}

fn report_us(parsed: &ParsedCsl) {
    let counts: BTreeMap<&str, usize> = SourceList::ALL
        .iter()
        .map(|s| (s.code(), parsed.records.count(*s)))
        .collect();
    info!(total = parsed.records.len(), ?counts, "US CSL records");
    if !parsed.errors.is_empty() {
        warn!(skipped = ?parsed.skipped_by_reason(), "US CSL rows skipped");
    }
}

fn report_uk(parsed: &ParsedUk) {
    info!(
        rows = parsed.records.len(),
        groups = parsed.group_count(),
        last_updated = %parsed.last_updated,
        "UK list records"
    );
    if !parsed.errors.is_empty() {
        warn!(skipped = parsed.errors.len(), "UK rows skipped");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    let args = Args::parse();
    fs::create_dir_all(&args.dir)?;

    // ─── 2) config from the environment ──────────────────────────────
    let resolver = UrlResolver::from_env();
    let fetcher = HttpFetcher::new(FetchConfig::from_env()?)?;

    // ─── 3) fetch + parse, each list on its own ──────────────────────
    let want_us = matches!(args.source, Source::Us | Source::All);
    let want_uk = matches!(args.source, Source::Uk | Source::All);
    let dir = args.dir.as_path();

    let (us, uk) = tokio::join!(
        async {
            if want_us {
                run_us(&fetcher, &resolver, dir).await.map(Some)
            } else {
                Ok(None)
            }
        },
        async {
            if want_uk {
                run_uk(&fetcher, &resolver, dir).await.map(Some)
            } else {
                Ok(None)
            }
        }
    );
    let us = us?;
    let uk = uk?;

    if let Some(parsed) = &us {
        report_us(parsed);
    }
    if let Some(parsed) = &uk {
        report_uk(parsed);
    }

    // ─── 4) optional JSON dump ───────────────────────────────────────
    if let Some(path) = &args.json {
        let out = Output {
            us: us.as_ref().map(|p| &p.records),
            uk: uk.as_ref().map(|p| p.records.as_slice()),
        };
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &out)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "wrote json");
    }

    info!("all done");
    Ok(())
}
