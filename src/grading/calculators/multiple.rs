use std::slice;

use crate::core::metadata::{ScoringInfo, ScoringMetadata, SingleAlleleScoringInfo};
use crate::core::types::{Locus, MatchGrade};
use crate::grading::calculators::{
    ExpressingAlleleGradingCalculator, GradingCalculator, NullAlleleGradingCalculator,
};
use crate::grading::error::GradingError;
use crate::grading::permissive::PermissiveMismatchCalculator;

/// Grades ambiguous typings by the best grade over every pair of candidate alleles
#[derive(Debug, Clone, Copy)]
pub struct MultipleAlleleGradingCalculator<'a> {
    expressing: ExpressingAlleleGradingCalculator<'a>,
}

impl<'a> MultipleAlleleGradingCalculator<'a> {
    pub fn new(permissive: &'a PermissiveMismatchCalculator) -> Self {
        Self {
            expressing: ExpressingAlleleGradingCalculator::new(permissive),
        }
    }

    fn grade_allele_pair(
        &self,
        locus: Locus,
        patient: &SingleAlleleScoringInfo,
        donor: &SingleAlleleScoringInfo,
    ) -> MatchGrade {
        match (patient.is_null(), donor.is_null()) {
            (false, false) => self.expressing.grade_alleles(locus, patient, donor),
            (true, true) => NullAlleleGradingCalculator.grade_alleles(patient, donor),
            _ => MatchGrade::Mismatch,
        }
    }
}

/// Candidate alleles of a molecular typing; a single allele is its own only candidate
fn candidates(info: &ScoringInfo) -> Option<&[SingleAlleleScoringInfo]> {
    match info {
        ScoringInfo::SingleAllele(allele) => Some(slice::from_ref(allele)),
        ScoringInfo::MultipleAllele(multiple) => Some(&multiple.alleles),
        ScoringInfo::Serology(_)
        | ScoringInfo::ConsolidatedMolecular(_)
        | ScoringInfo::NewAllele(_) => None,
    }
}

impl GradingCalculator for MultipleAlleleGradingCalculator<'_> {
    fn name(&self) -> &'static str {
        "multiple allele"
    }

    fn permits(&self, patient: &ScoringInfo, donor: &ScoringInfo) -> bool {
        let either_multiple = matches!(patient, ScoringInfo::MultipleAllele(_))
            || matches!(donor, ScoringInfo::MultipleAllele(_));
        either_multiple && candidates(patient).is_some() && candidates(donor).is_some()
    }

    fn grade(
        &self,
        patient: &ScoringMetadata,
        donor: &ScoringMetadata,
    ) -> Result<MatchGrade, GradingError> {
        let (Some(patient_alleles), Some(donor_alleles)) = (
            candidates(&patient.scoring_info),
            candidates(&donor.scoring_info),
        ) else {
            return Err(self.invalid_combination(patient, donor));
        };

        let best = patient_alleles
            .iter()
            .flat_map(|p| {
                donor_alleles
                    .iter()
                    .map(move |d| self.grade_allele_pair(patient.locus, p, d))
            })
            .min()
            .unwrap_or(MatchGrade::Mismatch);

        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::metadata::{
        AlleleTypingStatus, DnaCategory, MultipleAlleleScoringInfo, SequenceStatus,
    };
    use crate::tce::store::{NoTceGroups, TceGroupTable};

    fn allele(name: &str) -> SingleAlleleScoringInfo {
        SingleAlleleScoringInfo::new(
            name,
            AlleleTypingStatus::new(SequenceStatus::Full, DnaCategory::GDna),
        )
    }

    fn multiple(locus: Locus, alleles: Vec<SingleAlleleScoringInfo>) -> ScoringMetadata {
        ScoringMetadata::new(
            locus,
            "allele-string",
            ScoringInfo::MultipleAllele(MultipleAlleleScoringInfo::new(alleles)),
        )
    }

    fn no_tce() -> PermissiveMismatchCalculator {
        PermissiveMismatchCalculator::new(Arc::new(NoTceGroups), "3.55.0")
    }

    #[test]
    fn test_best_grade_across_candidates() {
        let permissive = no_tce();
        let calculator = MultipleAlleleGradingCalculator::new(&permissive);

        let patient = multiple(
            Locus::A,
            vec![
                allele("111:111").with_p_group("p-1"),
                allele("222:222:01").with_g_group("g-2"),
            ],
        );
        let donor = multiple(
            Locus::A,
            vec![
                allele("333:333").with_p_group("p-1"),
                allele("222:222:02").with_g_group("g-2"),
            ],
        );

        assert_eq!(
            calculator.calculate_grade(&patient, &donor),
            Ok(MatchGrade::Protein)
        );
        assert_eq!(
            calculator.calculate_grade(&donor, &patient),
            Ok(MatchGrade::Protein)
        );
    }

    #[test]
    fn test_multiple_vs_single_allele() {
        let permissive = no_tce();
        let calculator = MultipleAlleleGradingCalculator::new(&permissive);

        let patient = multiple(Locus::B, vec![allele("111:111"), allele("999:999")]);
        let donor = ScoringMetadata::single_allele(Locus::B, allele("999:999"));

        assert_eq!(
            calculator.calculate_grade(&patient, &donor),
            Ok(MatchGrade::GDna)
        );
        assert_eq!(
            calculator.calculate_grade(&donor, &patient),
            Ok(MatchGrade::GDna)
        );
    }

    #[test]
    fn test_no_shared_candidates_is_mismatch() {
        let permissive = no_tce();
        let calculator = MultipleAlleleGradingCalculator::new(&permissive);

        let patient = multiple(Locus::C, vec![allele("111:111"), allele("222:222")]);
        let donor = multiple(Locus::C, vec![allele("333:333"), allele("444:444")]);

        assert_eq!(
            calculator.calculate_grade(&patient, &donor),
            Ok(MatchGrade::Mismatch)
        );
    }

    #[test]
    fn test_null_candidate_pairs_use_null_rules() {
        let permissive = no_tce();
        let calculator = MultipleAlleleGradingCalculator::new(&permissive);

        let patient = multiple(Locus::A, vec![allele("111:111N"), allele("222:222")]);
        let donor = ScoringMetadata::single_allele(Locus::A, allele("111:111N"));

        // 111:111N vs 111:111N is a null match; 222:222 vs 111:111N is a mismatch
        assert_eq!(
            calculator.calculate_grade(&patient, &donor),
            Ok(MatchGrade::NullGDna)
        );
    }

    #[test]
    fn test_dpb1_permissive_mismatch_per_pair() {
        let mut table = TceGroupTable::new();
        table.insert("222:222", "2", None);
        table.insert("999:999", "2", None);
        let permissive = PermissiveMismatchCalculator::new(Arc::new(table), "3.55.0");
        let calculator = MultipleAlleleGradingCalculator::new(&permissive);

        let patient = multiple(Locus::Dpb1, vec![allele("111:111"), allele("222:222")]);
        let donor = ScoringMetadata::single_allele(Locus::Dpb1, allele("999:999"));

        assert_eq!(
            calculator.calculate_grade(&patient, &donor),
            Ok(MatchGrade::PermissiveMismatch)
        );
    }

    #[test]
    fn test_rejects_single_allele_pair() {
        let permissive = no_tce();
        let calculator = MultipleAlleleGradingCalculator::new(&permissive);
        let single = ScoringMetadata::single_allele(Locus::A, allele("111:111"));

        assert!(matches!(
            calculator.calculate_grade(&single, &single),
            Err(GradingError::InvalidCombination { .. })
        ));
    }
}
