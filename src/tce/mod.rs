//! DPB1 T-cell epitope (TCE) group assignments.
//!
//! Permissive-mismatch grading at DPB1 compares the TCE groups of the patient's and
//! donor's alleles. The assignments come from an external source behind the
//! [`TceGroupLookup`] trait:
//!
//! - [`TceGroupTable`]: in-memory table, loaded from a TSV/CSV file
//! - [`CachingTceLookup`]: memoises any lookup for the duration of a search request
//! - [`NoTceGroups`]: no assignments at all
//!
//! ## Table format
//!
//! ```text
//! # allele   tce_group   hla_version (optional)
//! allele	tce_group	hla_version
//! 01:01:01:01	3
//! 09:01:01	1	3.55.0
//! ```
//!
//! Rows without a version apply to every nomenclature version; a versioned row wins
//! over an unversioned one for the same allele.
//!
//! [`TceGroupLookup`]: store::TceGroupLookup
//! [`TceGroupTable`]: store::TceGroupTable
//! [`CachingTceLookup`]: store::CachingTceLookup
//! [`NoTceGroups`]: store::NoTceGroups

pub mod store;
