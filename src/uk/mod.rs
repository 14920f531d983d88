// src/uk/mod.rs
//
// The UK consolidated list is a single source, so there is no demultiplexing.
// Its first row is a `Last Updated,<date>` preamble, the second the header.
// Columns are located by header name.

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fs::File,
    io::Read,
    path::Path,
};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::csl::QuoteGuard;
use crate::fetch::{urls::UrlResolver, Fetcher};

/// Logical name the UK list is stored under.
pub const UK_FILE_NAME: &str = "ConList.csv";

const PREAMBLE_TAG: &str = "Last Updated";
const NAME_PARTS: [&str; 5] = ["Name 1", "Name 2", "Name 3", "Name 4", "Name 5"];
const SURNAME: &str = "Name 6";
const GROUP_ID: &str = "Group ID";
const ADDRESS_PARTS: [&str; 7] = [
    "Address 1",
    "Address 2",
    "Address 3",
    "Address 4",
    "Address 5",
    "Address 6",
    "Post/Zip Code",
];

/// One row of the UK list. A group (designated person or entity) spans
/// several rows when it has aliases; rows are kept as published.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UkRecord {
    pub group_id: String,
    /// Individual, Entity or Ship.
    pub group_type: String,
    /// Name 1..5 followed by Name 6 (surname / entity name).
    pub name: String,
    pub title: String,
    pub date_of_birth: String,
    pub town_of_birth: String,
    pub country_of_birth: String,
    pub nationality: String,
    pub address: String,
    pub country: String,
    pub regime: String,
    pub listed_on: String,
    pub last_updated: String,
    /// "Primary name", "AKA", ...
    pub alias_type: String,
    pub other_information: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UkRowError {
    #[error("line {line}: missing group id")]
    MissingGroupId { line: u64 },
    #[error("line {line}: group {group_id} has no name")]
    MissingName { line: u64, group_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedUk {
    /// Date from the preamble row, verbatim. Empty if the file had none.
    pub last_updated: String,
    pub records: Vec<UkRecord>,
    pub errors: Vec<UkRowError>,
}

impl ParsedUk {
    pub fn group_count(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.group_id.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

struct Header {
    index: HashMap<String, usize>,
}

impl Header {
    fn new(record: &StringRecord) -> Result<Self> {
        let index: HashMap<String, usize> = record
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim_start_matches('\u{feff}').trim().to_string(), i))
            .collect();
        for required in [GROUP_ID, SURNAME] {
            if !index.contains_key(required) {
                bail!("UK list header is missing column {:?}", required);
            }
        }
        Ok(Self { index })
    }

    fn get<'r>(&self, record: &'r StringRecord, name: &str) -> &'r str {
        self.index
            .get(name)
            .and_then(|&i| record.get(i))
            .map(str::trim)
            .unwrap_or("")
    }

    fn joined(&self, record: &StringRecord, names: &[&str], sep: &str) -> String {
        names
            .iter()
            .map(|n| self.get(record, n))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(sep)
    }
}

fn decode(header: &Header, record: &StringRecord, line: u64) -> Result<UkRecord, UkRowError> {
    let group_id = header.get(record, GROUP_ID);
    if group_id.is_empty() {
        return Err(UkRowError::MissingGroupId { line });
    }

    let mut parts: Vec<&str> = NAME_PARTS
        .iter()
        .map(|n| header.get(record, n))
        .filter(|s| !s.is_empty())
        .collect();
    let surname = header.get(record, SURNAME);
    if !surname.is_empty() {
        parts.push(surname);
    }
    if parts.is_empty() {
        return Err(UkRowError::MissingName {
            line,
            group_id: group_id.to_string(),
        });
    }

    Ok(UkRecord {
        group_id: group_id.to_string(),
        group_type: header.get(record, "Group Type").to_string(),
        name: parts.join(" "),
        title: header.get(record, "Title").to_string(),
        date_of_birth: header.get(record, "DOB").to_string(),
        town_of_birth: header.get(record, "Town of Birth").to_string(),
        country_of_birth: header.get(record, "Country of Birth").to_string(),
        nationality: header.get(record, "Nationality").to_string(),
        address: header.joined(record, &ADDRESS_PARTS, ", "),
        country: header.get(record, "Country").to_string(),
        regime: header.get(record, "Regime").to_string(),
        listed_on: header.get(record, "Listed On").to_string(),
        last_updated: header.get(record, "Last Updated").to_string(),
        alias_type: header.get(record, "Alias Type").to_string(),
        other_information: header.get(record, "Other Information").to_string(),
    })
}

/// Parse the UK consolidated list.
#[instrument(level = "info", skip(reader))]
pub fn read_uk<R: Read>(reader: R) -> Result<ParsedUk> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(QuoteGuard::new(reader));
    let mut records = rdr.records();
    let mut parsed = ParsedUk::default();

    let first = match records.next() {
        Some(r) => r.context("reading UK preamble")?,
        None => return Ok(parsed),
    };
    let tag = first.get(0).map(|s| s.trim_start_matches('\u{feff}').trim());
    let header_row = if tag == Some(PREAMBLE_TAG) {
        parsed.last_updated = first.get(1).unwrap_or("").trim().to_string();
        match records.next() {
            Some(r) => r.context("reading UK header")?,
            None => return Ok(parsed),
        }
    } else {
        first
    };
    let header = Header::new(&header_row)?;

    for (idx, result) in records.enumerate() {
        let record = result.with_context(|| format!("CSV parse error at UK record {}", idx))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        match decode(&header, &record, line) {
            Ok(rec) => parsed.records.push(rec),
            Err(err) => {
                debug!(%err, "skipping UK row");
                parsed.errors.push(err);
            }
        }
    }

    info!(
        last_updated = %parsed.last_updated,
        records = parsed.records.len(),
        skipped = parsed.errors.len(),
        "parsed UK list"
    );
    Ok(parsed)
}

pub fn read_file<P: AsRef<Path>>(path: P) -> Result<ParsedUk> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_uk(file).with_context(|| format!("reading {}", path.display()))
}

/// Fetch the UK list into `dir` as [`UK_FILE_NAME`].
#[instrument(level = "info", skip(fetcher, resolver, dir), fields(dir = %dir.as_ref().display()))]
pub async fn download<F, P>(fetcher: &F, resolver: &UrlResolver, dir: P) -> Result<File>
where
    F: Fetcher,
    P: AsRef<Path>,
{
    let url = resolver.uk_csl_url()?;
    let mut files = BTreeMap::new();
    files.insert(UK_FILE_NAME.to_string(), url);
    let mut out = fetcher
        .get_files(dir.as_ref(), &files)
        .await
        .context("uk csl download")?;
    out.remove(UK_FILE_NAME)
        .with_context(|| format!("uk csl download: {} missing from fetch result", UK_FILE_NAME))
}
