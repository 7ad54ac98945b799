use crate::core::metadata::{DnaCategory, ScoringInfo, ScoringMetadata, SingleAlleleScoringInfo};
use crate::core::types::MatchGrade;
use crate::grading::calculators::GradingCalculator;
use crate::grading::error::GradingError;

/// Grades two null (non-expressing) single alleles
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAlleleGradingCalculator;

impl NullAlleleGradingCalculator {
    /// Identical null alleles are graded by how much of their sequence is known;
    /// any other pair is a null mismatch.
    pub fn grade_alleles(
        &self,
        patient: &SingleAlleleScoringInfo,
        donor: &SingleAlleleScoringInfo,
    ) -> MatchGrade {
        if patient.allele_name != donor.allele_name {
            return MatchGrade::NullMismatch;
        }

        let both_full = patient.typing_status.is_full_sequence()
            && donor.typing_status.is_full_sequence();
        if !both_full {
            return MatchGrade::NullPartial;
        }

        match (
            patient.typing_status.dna_category,
            donor.typing_status.dna_category,
        ) {
            (DnaCategory::GDna, DnaCategory::GDna) => MatchGrade::NullGDna,
            _ => MatchGrade::NullCDna,
        }
    }
}

impl GradingCalculator for NullAlleleGradingCalculator {
    fn name(&self) -> &'static str {
        "null allele"
    }

    fn permits(&self, patient: &ScoringInfo, donor: &ScoringInfo) -> bool {
        matches!(
            (patient, donor),
            (ScoringInfo::SingleAllele(p), ScoringInfo::SingleAllele(d)) if p.is_null() && d.is_null()
        )
    }

    fn grade(
        &self,
        patient: &ScoringMetadata,
        donor: &ScoringMetadata,
    ) -> Result<MatchGrade, GradingError> {
        match (&patient.scoring_info, &donor.scoring_info) {
            (ScoringInfo::SingleAllele(p), ScoringInfo::SingleAllele(d)) => {
                Ok(self.grade_alleles(p, d))
            }
            _ => Err(self.invalid_combination(patient, donor)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::{AlleleTypingStatus, SequenceStatus};
    use crate::core::types::Locus;

    fn null_allele(name: &str, status: SequenceStatus, dna: DnaCategory) -> ScoringMetadata {
        ScoringMetadata::single_allele(
            Locus::A,
            SingleAlleleScoringInfo::new(name, AlleleTypingStatus::new(status, dna)),
        )
    }

    fn grade(patient: &ScoringMetadata, donor: &ScoringMetadata) -> MatchGrade {
        let calculator = NullAlleleGradingCalculator;
        let forward = calculator.calculate_grade(patient, donor).unwrap();
        assert_eq!(forward, calculator.calculate_grade(donor, patient).unwrap());
        forward
    }

    #[test]
    fn test_identical_full_gdna_null_alleles() {
        let patient = null_allele("999:999N", SequenceStatus::Full, DnaCategory::GDna);
        let donor = null_allele("999:999N", SequenceStatus::Full, DnaCategory::GDna);
        assert_eq!(grade(&patient, &donor), MatchGrade::NullGDna);
    }

    #[test]
    fn test_identical_full_cdna_null_alleles() {
        let patient = null_allele("999:999N", SequenceStatus::Full, DnaCategory::CDna);
        let donor = null_allele("999:999N", SequenceStatus::Full, DnaCategory::CDna);
        assert_eq!(grade(&patient, &donor), MatchGrade::NullCDna);
    }

    #[test]
    fn test_identical_partial_null_alleles() {
        for dna in [DnaCategory::GDna, DnaCategory::CDna] {
            let patient = null_allele("999:999N", SequenceStatus::Partial, dna);
            let donor = null_allele("999:999N", SequenceStatus::Partial, dna);
            assert_eq!(grade(&patient, &donor), MatchGrade::NullPartial);
        }
    }

    #[test]
    fn test_different_null_alleles() {
        let patient = null_allele("111:111N", SequenceStatus::Full, DnaCategory::GDna);
        let donor = null_allele("999:999N", SequenceStatus::Full, DnaCategory::GDna);
        assert_eq!(grade(&patient, &donor), MatchGrade::NullMismatch);
    }

    #[test]
    fn test_rejects_expressing_allele() {
        let patient = null_allele("111:111N", SequenceStatus::Full, DnaCategory::GDna);
        let donor = null_allele("111:111", SequenceStatus::Full, DnaCategory::GDna);
        assert!(matches!(
            NullAlleleGradingCalculator.calculate_grade(&patient, &donor),
            Err(GradingError::InvalidCombination { .. })
        ));
    }
}
