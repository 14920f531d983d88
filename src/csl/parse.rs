// src/csl/parse.rs

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use std::{collections::BTreeMap, fs::File, io::Read, path::Path};
use thiserror::Error;
use tracing::{debug, info, instrument};

use super::columns::Column;
use super::quoting::QuoteGuard;
use super::decode::{Row, SourceList};
use super::records::{Csl, CslRecord};

/// Rows shorter than this cannot carry a name.
pub const MIN_COLUMNS: usize = Column::Name.index() + 1;

/// A row that was skipped. Parsing carries on past these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("line {line}: missing source discriminator")]
    MissingSource { line: u64 },

    #[error("line {line}: unknown source discriminator {value:?}")]
    UnknownSource { line: u64, value: String },

    #[error("line {line}: {columns} columns, need at least {required}")]
    ShortRow {
        line: u64,
        columns: usize,
        required: usize,
    },

    #[error("line {line}: {} row has neither a name nor an entity number", .list.code())]
    MissingIdentity { line: u64, list: SourceList },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RowErrorKind {
    MissingSource,
    UnknownSource,
    ShortRow,
    MissingIdentity,
}

impl RowError {
    pub fn kind(&self) -> RowErrorKind {
        match self {
            RowError::MissingSource { .. } => RowErrorKind::MissingSource,
            RowError::UnknownSource { .. } => RowErrorKind::UnknownSource,
            RowError::ShortRow { .. } => RowErrorKind::ShortRow,
            RowError::MissingIdentity { .. } => RowErrorKind::MissingIdentity,
        }
    }

    /// 1-based line in the source file.
    pub fn line(&self) -> u64 {
        match self {
            RowError::MissingSource { line }
            | RowError::UnknownSource { line, .. }
            | RowError::ShortRow { line, .. }
            | RowError::MissingIdentity { line, .. } => *line,
        }
    }
}

/// Result of one CSL parse: the records plus every skipped row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCsl {
    pub records: Csl,
    pub errors: Vec<RowError>,
}

impl ParsedCsl {
    pub fn skipped_by_reason(&self) -> BTreeMap<RowErrorKind, usize> {
        let mut out = BTreeMap::new();
        for err in &self.errors {
            *out.entry(err.kind()).or_insert(0) += 1;
        }
        out
    }

    /// Data rows consumed, decoded or not.
    pub fn rows_seen(&self) -> usize {
        self.records.len() + self.errors.len()
    }
}

/// Route one raw row to its decoder.
fn demux(record: &StringRecord, line: u64) -> Result<CslRecord, RowError> {
    let row = Row::new(record);

    let discriminator = row.cell(Column::Source);
    if discriminator.trim().is_empty() {
        return Err(RowError::MissingSource { line });
    }
    let list =
        SourceList::from_discriminator(discriminator).ok_or_else(|| RowError::UnknownSource {
            line,
            value: discriminator.to_string(),
        })?;

    if row.len() < MIN_COLUMNS {
        return Err(RowError::ShortRow {
            line,
            columns: row.len(),
            required: MIN_COLUMNS,
        });
    }
    if row.cell(Column::Name).trim().is_empty() && row.cell(Column::EntityNumber).trim().is_empty()
    {
        return Err(RowError::MissingIdentity { line, list });
    }

    Ok(list.decode(&row))
}

/// Parse a CSL CSV stream. The first row is a header and is skipped without
/// being checked; columns are read by position only.
///
/// Malformed rows are collected in [`ParsedCsl::errors`]. A stream that is
/// not readable as CSV (I/O failure, invalid UTF-8, a quoted field left open
/// at end of input) fails the whole parse.
#[instrument(level = "info", skip(reader))]
pub fn read_csl<R: Read>(reader: R) -> Result<ParsedCsl> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(QuoteGuard::new(reader));

    let mut parsed = ParsedCsl::default();
    let mut record = StringRecord::new();
    let mut idx = 0usize;

    while rdr
        .read_record(&mut record)
        .with_context(|| format!("CSV parse error at record {}", idx))?
    {
        idx += 1;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        match demux(&record, line) {
            Ok(rec) => parsed.records.push(rec),
            Err(err) => {
                debug!(%err, "skipping row");
                parsed.errors.push(err);
            }
        }
    }

    info!(
        rows = idx,
        records = parsed.records.len(),
        skipped = parsed.errors.len(),
        "parsed CSL"
    );
    Ok(parsed)
}

/// [`read_csl`] over a file on disk.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<ParsedCsl> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_csl(file).with_context(|| format!("reading {}", path.display()))
}
