//! Core data types for HLA match grading.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Locus`], [`Orientation`], [`HlaTypingCategory`]: identifiers for what is graded
//! - [`MatchGrade`]: the ordered grade scale, with its explicit [`MATCH_GRADE_RANKING`]
//! - [`ScoringMetadata`] and [`ScoringInfo`]: the resolved typing of one position
//! - [`Phenotype`]: a patient's or donor's metadata per locus and position
//!
//! ## Typing categories
//!
//! | Category | Example typing | Scoring info |
//! |----------|----------------|--------------|
//! | Serology | `A24` | matching serologies |
//! | Single allele | `A*24:02:01:01` | name, sequence status, G/P group |
//! | Multiple allele | `A*24:02/24:03` | candidate single alleles |
//! | Consolidated molecular | `A*24:XX` | G/P group sets |
//! | New allele | not in the nomenclature | allele name only |
//!
//! Scoring metadata are produced by the nomenclature dictionary outside this crate
//! and are treated as immutable values.
//!
//! [`Locus`]: types::Locus
//! [`Orientation`]: types::Orientation
//! [`HlaTypingCategory`]: types::HlaTypingCategory
//! [`MatchGrade`]: types::MatchGrade
//! [`MATCH_GRADE_RANKING`]: types::MATCH_GRADE_RANKING
//! [`ScoringMetadata`]: metadata::ScoringMetadata
//! [`ScoringInfo`]: metadata::ScoringInfo
//! [`Phenotype`]: phenotype::Phenotype

pub mod metadata;
pub mod phenotype;
pub mod types;
