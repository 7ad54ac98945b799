//! Grading calculators, one per family of typing-category pairs.
//!
//! | Calculator | Patient / donor categories |
//! |------------|----------------------------|
//! | [`ExpressingAlleleGradingCalculator`] | two expressing single alleles |
//! | [`NullAlleleGradingCalculator`] | two null single alleles |
//! | [`ExpressingVsNullAlleleGradingCalculator`] | one expressing, one null single allele |
//! | [`MultipleAlleleGradingCalculator`] | at least one multiple allele, otherwise single alleles |
//! | [`ConsolidatedMolecularGradingCalculator`] | at least one consolidated molecular, no serology |
//! | [`SerologyGradingCalculator`] | at least one serology |
//! | [`NewAlleleGradingCalculator`] | at least one new allele |
//!
//! Each calculator checks the pair it is given before grading, so a calculator
//! invoked outside its permitted set fails with `InvalidCombination` instead of
//! producing a grade.

use crate::core::metadata::{ScoringInfo, ScoringMetadata};
use crate::core::types::MatchGrade;
use crate::grading::error::GradingError;

pub mod consolidated;
pub mod expressing;
pub mod expressing_vs_null;
pub mod multiple;
pub mod new_allele;
pub mod null;
pub mod serology;

pub use consolidated::ConsolidatedMolecularGradingCalculator;
pub use expressing::ExpressingAlleleGradingCalculator;
pub use expressing_vs_null::ExpressingVsNullAlleleGradingCalculator;
pub use multiple::MultipleAlleleGradingCalculator;
pub use new_allele::NewAlleleGradingCalculator;
pub use null::NullAlleleGradingCalculator;
pub use serology::SerologyGradingCalculator;

/// Grades one patient typing against one donor typing at the same locus
pub trait GradingCalculator {
    /// Short name used in error messages and logs
    fn name(&self) -> &'static str;

    /// Whether this calculator handles the given category pair
    fn permits(&self, patient: &ScoringInfo, donor: &ScoringInfo) -> bool;

    /// Grade a pair already known to be permitted and at the same locus
    fn grade(
        &self,
        patient: &ScoringMetadata,
        donor: &ScoringMetadata,
    ) -> Result<MatchGrade, GradingError>;

    /// Validate the pair, then grade it
    ///
    /// # Errors
    ///
    /// Returns `GradingError::LocusMismatch` if the typings are at different loci, or
    /// `GradingError::InvalidCombination` if this calculator does not handle the pair.
    fn calculate_grade(
        &self,
        patient: &ScoringMetadata,
        donor: &ScoringMetadata,
    ) -> Result<MatchGrade, GradingError> {
        if patient.locus != donor.locus {
            return Err(GradingError::LocusMismatch {
                patient: patient.locus,
                donor: donor.locus,
            });
        }
        if !self.permits(&patient.scoring_info, &donor.scoring_info) {
            return Err(self.invalid_combination(patient, donor));
        }
        self.grade(patient, donor)
    }

    fn invalid_combination(
        &self,
        patient: &ScoringMetadata,
        donor: &ScoringMetadata,
    ) -> GradingError {
        GradingError::InvalidCombination {
            calculator: self.name(),
            patient: patient.category(),
            donor: donor.category(),
        }
    }
}

/// Identifies which calculator a [`Calculator`] wraps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalculatorKind {
    ExpressingAllele,
    NullAllele,
    ExpressingVsNullAllele,
    MultipleAllele,
    ConsolidatedMolecular,
    Serology,
    NewAllele,
}

impl std::fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExpressingAllele => write!(f, "expressing allele"),
            Self::NullAllele => write!(f, "null allele"),
            Self::ExpressingVsNullAllele => write!(f, "expressing vs null allele"),
            Self::MultipleAllele => write!(f, "multiple allele"),
            Self::ConsolidatedMolecular => write!(f, "consolidated molecular"),
            Self::Serology => write!(f, "serology"),
            Self::NewAllele => write!(f, "new allele"),
        }
    }
}

/// The closed set of calculators the factory can hand out
#[derive(Debug, Clone, Copy)]
pub enum Calculator<'a> {
    ExpressingAllele(ExpressingAlleleGradingCalculator<'a>),
    NullAllele(NullAlleleGradingCalculator),
    ExpressingVsNullAllele(ExpressingVsNullAlleleGradingCalculator),
    MultipleAllele(MultipleAlleleGradingCalculator<'a>),
    ConsolidatedMolecular(ConsolidatedMolecularGradingCalculator),
    Serology(SerologyGradingCalculator),
    NewAllele(NewAlleleGradingCalculator),
}

impl Calculator<'_> {
    pub fn kind(&self) -> CalculatorKind {
        match self {
            Self::ExpressingAllele(_) => CalculatorKind::ExpressingAllele,
            Self::NullAllele(_) => CalculatorKind::NullAllele,
            Self::ExpressingVsNullAllele(_) => CalculatorKind::ExpressingVsNullAllele,
            Self::MultipleAllele(_) => CalculatorKind::MultipleAllele,
            Self::ConsolidatedMolecular(_) => CalculatorKind::ConsolidatedMolecular,
            Self::Serology(_) => CalculatorKind::Serology,
            Self::NewAllele(_) => CalculatorKind::NewAllele,
        }
    }

    fn inner(&self) -> &dyn GradingCalculator {
        match self {
            Self::ExpressingAllele(c) => c,
            Self::NullAllele(c) => c,
            Self::ExpressingVsNullAllele(c) => c,
            Self::MultipleAllele(c) => c,
            Self::ConsolidatedMolecular(c) => c,
            Self::Serology(c) => c,
            Self::NewAllele(c) => c,
        }
    }
}

impl GradingCalculator for Calculator<'_> {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn permits(&self, patient: &ScoringInfo, donor: &ScoringInfo) -> bool {
        self.inner().permits(patient, donor)
    }

    fn grade(
        &self,
        patient: &ScoringMetadata,
        donor: &ScoringMetadata,
    ) -> Result<MatchGrade, GradingError> {
        self.inner().grade(patient, donor)
    }
}
