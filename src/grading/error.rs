use thiserror::Error;

use crate::core::types::{HlaTypingCategory, Locus};

/// Grading failures. All are caller or wiring defects and are never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GradingError {
    #[error("{calculator} calculator cannot grade {patient} (patient) against {donor} (donor)")]
    InvalidCombination {
        calculator: &'static str,
        patient: HlaTypingCategory,
        donor: HlaTypingCategory,
    },

    #[error("Cannot grade patient typing at locus {patient} against donor typing at locus {donor}")]
    LocusMismatch { patient: Locus, donor: Locus },

    #[error("Missing required argument: {0}")]
    ArgumentNull(&'static str),

    #[error("No orientations to evaluate at locus {0}")]
    NoOrientations(Locus),
}
