//! Parsers for the documents the grading CLI reads.
//!
//! This module provides parsers for:
//!
//! - **Grading requests** (JSON): allowed orientations plus patient and donor phenotypes
//! - **Scoring metadata** (JSON): a single resolved typing, for pairwise comparison
//! - **TCE group tables** (TSV/CSV, optionally gzipped): DPB1 T-cell epitope groups
//!
//! ## Example
//!
//! ```rust,no_run
//! use hla_grading::parsing::json::parse_request_file;
//! use std::path::Path;
//!
//! let request = parse_request_file(Path::new("request.json")).unwrap();
//! ```
//!
//! Every scoring metadata document is validated after parsing, so callers only ever
//! see metadata that satisfy the grading invariants.

use thiserror::Error;

use crate::core::metadata::MetadataError;

pub mod json;
pub mod tsv;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid table format: {0}")]
    InvalidFormat(String),

    #[error("Invalid scoring metadata: {0}")]
    InvalidMetadata(#[from] MetadataError),

    #[error("Too many TCE group rows: {0} exceeds maximum allowed (100000)")]
    TooManyRows(usize),
}
