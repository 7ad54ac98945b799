use crate::core::metadata::{DnaCategory, ScoringInfo, ScoringMetadata, SingleAlleleScoringInfo};
use crate::core::types::{Locus, MatchGrade};
use crate::grading::calculators::GradingCalculator;
use crate::grading::error::GradingError;
use crate::grading::permissive::PermissiveMismatchCalculator;
use crate::utils::validation::first_fields_match;

/// Grades two expressing single alleles, from sequence identity down to DPB1
/// permissive mismatch
#[derive(Debug, Clone, Copy)]
pub struct ExpressingAlleleGradingCalculator<'a> {
    permissive: &'a PermissiveMismatchCalculator,
}

impl<'a> ExpressingAlleleGradingCalculator<'a> {
    pub fn new(permissive: &'a PermissiveMismatchCalculator) -> Self {
        Self { permissive }
    }

    /// Grade two expressing alleles. Rules are tried best grade first.
    pub fn grade_alleles(
        &self,
        locus: Locus,
        patient: &SingleAlleleScoringInfo,
        donor: &SingleAlleleScoringInfo,
    ) -> MatchGrade {
        let both_full = patient.typing_status.is_full_sequence()
            && donor.typing_status.is_full_sequence();

        if both_full {
            if patient.allele_name == donor.allele_name
                && patient.typing_status.dna_category == donor.typing_status.dna_category
            {
                return match patient.typing_status.dna_category {
                    DnaCategory::GDna => MatchGrade::GDna,
                    DnaCategory::CDna => MatchGrade::CDna,
                };
            }
            if first_fields_match(&patient.allele_name, &donor.allele_name, 3) {
                return MatchGrade::CDna;
            }
            if first_fields_match(&patient.allele_name, &donor.allele_name, 2) {
                return MatchGrade::Protein;
            }
        }

        if shared(&patient.matching_g_group, &donor.matching_g_group) {
            return MatchGrade::GGroup;
        }
        if shared(&patient.matching_p_group, &donor.matching_p_group) {
            return MatchGrade::PGroup;
        }

        if self
            .permissive
            .is_permissive_mismatch(locus, &patient.allele_name, &donor.allele_name)
        {
            return MatchGrade::PermissiveMismatch;
        }

        MatchGrade::Mismatch
    }
}

fn shared(patient: &Option<String>, donor: &Option<String>) -> bool {
    matches!((patient, donor), (Some(p), Some(d)) if p == d)
}

impl GradingCalculator for ExpressingAlleleGradingCalculator<'_> {
    fn name(&self) -> &'static str {
        "expressing allele"
    }

    fn permits(&self, patient: &ScoringInfo, donor: &ScoringInfo) -> bool {
        matches!(
            (patient, donor),
            (ScoringInfo::SingleAllele(p), ScoringInfo::SingleAllele(d)) if !p.is_null() && !d.is_null()
        )
    }

    fn grade(
        &self,
        patient: &ScoringMetadata,
        donor: &ScoringMetadata,
    ) -> Result<MatchGrade, GradingError> {
        match (&patient.scoring_info, &donor.scoring_info) {
            (ScoringInfo::SingleAllele(p), ScoringInfo::SingleAllele(d)) => {
                Ok(self.grade_alleles(patient.locus, p, d))
            }
            _ => Err(self.invalid_combination(patient, donor)),
        }
    }
}
