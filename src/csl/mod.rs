// src/csl/mod.rs

pub mod columns;
pub mod decode;
pub mod multi;
pub mod parse;
pub mod quoting;
pub mod records;

pub use columns::Column;
pub use decode::{Row, SourceList};
pub use multi::{join_multi, split_multi, MULTI_DELIMITER};
pub use parse::{read_csl, read_file, ParsedCsl, RowError, RowErrorKind};
pub use quoting::QuoteGuard;
pub use records::{Cap, Cmic, Csl, CslRecord, Dtc, El, Fse, Isn, Meu, NsMbs, Plc, Ssi, Uvl};

use anyhow::{Context, Result};
use std::{collections::BTreeMap, fs::File, path::Path};
use tracing::instrument;

use crate::fetch::{urls::UrlResolver, Fetcher};

/// Logical name the US list is stored under.
pub const CSL_FILE_NAME: &str = "csl.csv";

/// Fetch the consolidated screening list into `dir`, keyed by [`CSL_FILE_NAME`].
#[instrument(level = "info", skip(fetcher, resolver, dir), fields(dir = %dir.as_ref().display()))]
pub async fn download<F, P>(
    fetcher: &F,
    resolver: &UrlResolver,
    dir: P,
) -> Result<BTreeMap<String, File>>
where
    F: Fetcher,
    P: AsRef<Path>,
{
    let url = resolver.us_csl_url()?;
    let mut files = BTreeMap::new();
    files.insert(CSL_FILE_NAME.to_string(), url);
    fetcher
        .get_files(dir.as_ref(), &files)
        .await
        .context("us csl download")
}
