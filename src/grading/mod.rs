//! HLA match grading between patient and donor phenotypes.
//!
//! This module provides the grading pipeline:
//!
//! - [`GradingService`]: grades every requested locus and picks the best orientation
//! - [`GradingCalculatorFactory`]: selects a calculator from the typing categories
//! - [`calculators`]: one grading calculator per category combination
//! - [`PermissiveMismatchCalculator`]: DPB1 T-cell epitope comparison
//!
//! ## Orientation Selection
//!
//! Each locus carries two typings per side. In the **direct** orientation patient
//! position 1 is compared with donor position 1 (and 2 with 2); in the **cross**
//! orientation patient position 1 is compared with donor position 2 (and 2 with 1).
//!
//! Each evaluated orientation is scored by summing the ranks of its two grades; the
//! lowest sum wins and ties keep every tied orientation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use hla_grading::grading::{GradingConfig, GradingService};
//! use hla_grading::parsing::json::parse_request_file;
//! use hla_grading::tce::store::NoTceGroups;
//! use std::path::Path;
//!
//! let request = parse_request_file(Path::new("request.json")).unwrap();
//! let service = GradingService::with_config(Arc::new(NoTceGroups), &GradingConfig::default());
//!
//! for (locus, result) in service.score_request(&request).unwrap() {
//!     println!("{locus}: {} / {}", result.grades.position1, result.grades.position2);
//! }
//! ```

pub mod calculators;
pub mod error;
pub mod factory;
pub mod permissive;
pub mod service;

pub use error::GradingError;
pub use factory::GradingCalculatorFactory;
pub use permissive::PermissiveMismatchCalculator;
pub use service::{
    GradePair, GradingConfig, GradingRequest, GradingResult, GradingService, LocusGradingResult,
};
