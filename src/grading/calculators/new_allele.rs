use crate::core::metadata::{ScoringInfo, ScoringMetadata};
use crate::core::types::MatchGrade;
use crate::grading::calculators::GradingCalculator;
use crate::grading::error::GradingError;

/// Grades pairings involving an allele missing from the active nomenclature.
///
/// A new allele has no sequence status, groups or serologies to compare. Until a rule
/// for comparing new alleles is agreed, every such pairing grades as a fixed
/// `Mismatch` placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewAlleleGradingCalculator;

impl GradingCalculator for NewAlleleGradingCalculator {
    fn name(&self) -> &'static str {
        "new allele"
    }

    fn permits(&self, patient: &ScoringInfo, donor: &ScoringInfo) -> bool {
        matches!(patient, ScoringInfo::NewAllele(_)) || matches!(donor, ScoringInfo::NewAllele(_))
    }

    fn grade(
        &self,
        _patient: &ScoringMetadata,
        _donor: &ScoringMetadata,
    ) -> Result<MatchGrade, GradingError> {
        Ok(MatchGrade::Mismatch)
    }
}
