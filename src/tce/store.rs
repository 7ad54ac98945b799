use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;
use tracing::{info, warn};

use crate::parsing::tsv::{parse_tce_table_file, TceRow};
use crate::parsing::ParseError;

#[derive(Error, Debug)]
pub enum TceError {
    #[error("Failed to read TCE group table: {0}")]
    ParseError(#[from] ParseError),
}

/// Source of DPB1 T-cell epitope group assignments.
///
/// Implementations may be remote and blocking; they must be safe to share between
/// grading threads.
pub trait TceGroupLookup: Send + Sync {
    /// TCE group of an allele in the given nomenclature version, if one is assigned
    fn tce_group(&self, allele_name: &str, hla_version: &str) -> Option<String>;
}

/// A lookup with no assignments, so no mismatch is ever permissive
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTceGroups;

impl TceGroupLookup for NoTceGroups {
    fn tce_group(&self, _allele_name: &str, _hla_version: &str) -> Option<String> {
        None
    }
}

/// In-memory TCE group assignments, optionally per nomenclature version
#[derive(Debug, Default)]
pub struct TceGroupTable {
    /// Index: (allele, version) -> TCE group
    versioned: HashMap<(String, String), String>,

    /// Index: allele -> TCE group, for rows valid in every version
    unversioned: HashMap<String, String>,
}

impl TceGroupTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table from a TSV/CSV file (`.gz` compressed files are accepted)
    ///
    /// # Errors
    ///
    /// Returns `TceError::ParseError` if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, TceError> {
        let rows = parse_tce_table_file(path)?;
        let table = Self::from_rows(rows);
        info!(
            "Loaded {} TCE group assignments from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Build a table from parsed rows; later rows replace earlier duplicates
    pub fn from_rows(rows: impl IntoIterator<Item = TceRow>) -> Self {
        let mut table = Self::new();
        for row in rows {
            table.insert(row.allele_name, row.tce_group, row.hla_version);
        }
        table
    }

    /// Add an assignment; `hla_version` of `None` applies to every version
    pub fn insert(
        &mut self,
        allele_name: impl Into<String>,
        tce_group: impl Into<String>,
        hla_version: Option<String>,
    ) {
        let allele_name = allele_name.into();
        let tce_group = tce_group.into();
        let previous = match hla_version {
            Some(version) => self
                .versioned
                .insert((allele_name.clone(), version), tce_group),
            None => self.unversioned.insert(allele_name.clone(), tce_group),
        };
        if previous.is_some() {
            warn!("Duplicate TCE group assignment for {allele_name}; keeping the last one");
        }
    }

    pub fn len(&self) -> usize {
        self.versioned.len() + self.unversioned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TceGroupLookup for TceGroupTable {
    fn tce_group(&self, allele_name: &str, hla_version: &str) -> Option<String> {
        self.versioned
            .get(&(allele_name.to_string(), hla_version.to_string()))
            .or_else(|| self.unversioned.get(allele_name))
            .cloned()
    }
}

/// Memoises another lookup per (allele, version) for the life of a search request
pub struct CachingTceLookup<L> {
    inner: L,
    cache: Mutex<HashMap<(String, String), Option<String>>>,
}

impl<L: TceGroupLookup> CachingTceLookup<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of distinct (allele, version) pairs looked up so far
    pub fn cached_entries(&self) -> usize {
        self.cache.lock().map_or(0, |cache| cache.len())
    }
}

impl<L: TceGroupLookup> TceGroupLookup for CachingTceLookup<L> {
    fn tce_group(&self, allele_name: &str, hla_version: &str) -> Option<String> {
        let key = (allele_name.to_string(), hla_version.to_string());

        // A poisoned cache only loses memoisation; fall through to the inner lookup
        if let Ok(cache) = self.cache.lock() {
            if let Some(group) = cache.get(&key) {
                return group.clone();
            }
        }

        let group = self.inner.tce_group(allele_name, hla_version);
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, group.clone());
        }
        group
    }
}
