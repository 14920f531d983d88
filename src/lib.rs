//! Ingestion of the U.S. Consolidated Screening List and the U.K.
//! consolidated sanctions list.
//!
//! - [`fetch`] resolves download URLs and retrieves files into a local cache.
//! - [`csl`] demultiplexes the CSL feed into one typed collection per source list.
//! - [`uk`] reads the single-source UK list.

pub mod csl;
pub mod fetch;
pub mod uk;

pub use csl::{read_csl, Csl, CslRecord, ParsedCsl, RowError, RowErrorKind, SourceList};
pub use fetch::{
    urls::{UrlConfig, UrlResolver},
    FetchConfig, Fetcher, HttpFetcher,
};
pub use uk::{read_uk, ParsedUk, UkRecord};
