//! # hla-grading
//!
//! A library for grading HLA compatibility between a transplant patient and a
//! potential donor.
//!
//! Patient and donor typings arrive at very different resolutions: a serology
//! antigen, a single fully sequenced allele, an ambiguous list of candidate alleles,
//! or a consolidated summary of many alleles. `hla-grading` compares each typed
//! position on a common graded scale and picks the best pairing of positions at
//! each locus.
//!
//! ## Features
//!
//! - **Category dispatch**: One calculator per combination of typing categories
//! - **Molecular grades**: gDNA, cDNA, protein, G group, and P group matches
//! - **Null alleles**: A separate grade branch for non-expressed alleles
//! - **Serology grades**: Associated, split, and broad antigen matches
//! - **Permissive mismatches**: DPB1 T-cell epitope (TCE) groups
//! - **Orientation selection**: Direct vs cross pairing with ties preserved
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use hla_grading::core::metadata::{AlleleTypingStatus, ScoringMetadata, SingleAlleleScoringInfo};
//! use hla_grading::core::phenotype::{all_orientations, Phenotype};
//! use hla_grading::grading::{GradingConfig, GradingService};
//! use hla_grading::tce::store::NoTceGroups;
//! use hla_grading::{Locus, MatchGrade};
//!
//! let allele = |name: &str| {
//!     Some(ScoringMetadata::single_allele(
//!         Locus::A,
//!         SingleAlleleScoringInfo::new(name, AlleleTypingStatus::default()),
//!     ))
//! };
//!
//! let patient = Phenotype::new()
//!     .with_locus(Locus::A, allele("01:01:01:01"), allele("02:01:01:01"));
//! let donor = Phenotype::new()
//!     .with_locus(Locus::A, allele("02:01:01:01"), allele("01:01:01:01"));
//!
//! let service = GradingService::with_config(Arc::new(NoTceGroups), &GradingConfig::default());
//! let result = service.score(&all_orientations([Locus::A]), &patient, &donor).unwrap();
//!
//! assert_eq!(result[&Locus::A].grades.position1, MatchGrade::GDna);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Loci, grades, scoring metadata, and phenotypes
//! - [`grading`]: Calculators, dispatch, and the grading service
//! - [`tce`]: DPB1 TCE group lookups
//! - [`parsing`]: Parsers for request documents and TCE group tables
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod grading;
pub mod parsing;
pub mod tce;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::metadata::{ScoringInfo, ScoringMetadata};
pub use crate::core::phenotype::{AllowedOrientations, LocusInfo, Phenotype};
pub use crate::core::types::*;
pub use grading::{GradingError, GradingResult, GradingService};
