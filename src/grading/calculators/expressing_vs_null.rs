use crate::core::metadata::{ScoringInfo, ScoringMetadata};
use crate::core::types::MatchGrade;
use crate::grading::calculators::GradingCalculator;
use crate::grading::error::GradingError;

/// An expressing allele never matches a null allele, whatever groups they share
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressingVsNullAlleleGradingCalculator;

impl GradingCalculator for ExpressingVsNullAlleleGradingCalculator {
    fn name(&self) -> &'static str {
        "expressing vs null allele"
    }

    fn permits(&self, patient: &ScoringInfo, donor: &ScoringInfo) -> bool {
        matches!(
            (patient, donor),
            (ScoringInfo::SingleAllele(p), ScoringInfo::SingleAllele(d)) if p.is_null() != d.is_null()
        )
    }

    fn grade(
        &self,
        _patient: &ScoringMetadata,
        _donor: &ScoringMetadata,
    ) -> Result<MatchGrade, GradingError> {
        Ok(MatchGrade::Mismatch)
    }
}
