use crate::core::metadata::{ScoringInfo, ScoringMetadata};
use crate::core::types::MatchGrade;
use crate::grading::calculators::GradingCalculator;
use crate::grading::error::GradingError;
use crate::utils::validation::intersects;

/// Grades consolidated molecular typings against any molecular typing by G and P
/// group overlap. There is no permissive-mismatch fallback for this category.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolidatedMolecularGradingCalculator;

fn is_molecular(info: &ScoringInfo) -> bool {
    matches!(
        info,
        ScoringInfo::SingleAllele(_)
            | ScoringInfo::MultipleAllele(_)
            | ScoringInfo::ConsolidatedMolecular(_)
    )
}

impl GradingCalculator for ConsolidatedMolecularGradingCalculator {
    fn name(&self) -> &'static str {
        "consolidated molecular"
    }

    fn permits(&self, patient: &ScoringInfo, donor: &ScoringInfo) -> bool {
        let either_consolidated = matches!(patient, ScoringInfo::ConsolidatedMolecular(_))
            || matches!(donor, ScoringInfo::ConsolidatedMolecular(_));
        either_consolidated && is_molecular(patient) && is_molecular(donor)
    }

    fn grade(
        &self,
        patient: &ScoringMetadata,
        donor: &ScoringMetadata,
    ) -> Result<MatchGrade, GradingError> {
        if patient.lookup_name == donor.lookup_name {
            return Ok(MatchGrade::GGroup);
        }

        let patient_info = &patient.scoring_info;
        let donor_info = &donor.scoring_info;

        if intersects(
            &patient_info.matching_g_groups(),
            &donor_info.matching_g_groups(),
        ) {
            return Ok(MatchGrade::GGroup);
        }
        if intersects(
            &patient_info.matching_p_groups(),
            &donor_info.matching_p_groups(),
        ) {
            return Ok(MatchGrade::PGroup);
        }

        Ok(MatchGrade::Mismatch)
    }
}
