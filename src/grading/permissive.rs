use std::sync::Arc;

use tracing::debug;

use crate::core::types::Locus;
use crate::tce::store::TceGroupLookup;

/// Decides whether a DPB1 allele mismatch is permissive, i.e. both alleles share a
/// T-cell epitope group
#[derive(Clone)]
pub struct PermissiveMismatchCalculator {
    lookup: Arc<dyn TceGroupLookup>,
    hla_nomenclature_version: String,
}

impl PermissiveMismatchCalculator {
    pub fn new(
        lookup: Arc<dyn TceGroupLookup>,
        hla_nomenclature_version: impl Into<String>,
    ) -> Self {
        Self {
            lookup,
            hla_nomenclature_version: hla_nomenclature_version.into(),
        }
    }

    pub fn hla_nomenclature_version(&self) -> &str {
        &self.hla_nomenclature_version
    }

    /// True only at DPB1, when both alleles have the same non-empty TCE group
    #[must_use]
    pub fn is_permissive_mismatch(
        &self,
        locus: Locus,
        patient_allele_name: &str,
        donor_allele_name: &str,
    ) -> bool {
        if locus != Locus::Dpb1 {
            return false;
        }

        let version = self.hla_nomenclature_version.as_str();
        let patient_group = self.lookup.tce_group(patient_allele_name, version);
        let donor_group = self.lookup.tce_group(donor_allele_name, version);

        debug!(
            "TCE groups at DPB1: {patient_allele_name} -> {patient_group:?}, {donor_allele_name} -> {donor_group:?}"
        );

        match (patient_group, donor_group) {
            (Some(patient), Some(donor)) => !patient.is_empty() && patient == donor,
            _ => false,
        }
    }
}

impl std::fmt::Debug for PermissiveMismatchCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissiveMismatchCalculator")
            .field("hla_nomenclature_version", &self.hla_nomenclature_version)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tce::store::TceGroupTable;

    fn calculator() -> PermissiveMismatchCalculator {
        let mut table = TceGroupTable::new();
        table.insert("111:111", "3", None);
        table.insert("999:999", "3", None);
        table.insert("222:222", "2", None);
        table.insert("333:333", "", None);
        table.insert("444:444", "", None);
        PermissiveMismatchCalculator::new(Arc::new(table), "3.55.0")
    }

    #[test]
    fn test_same_tce_group_at_dpb1_is_permissive() {
        assert!(calculator().is_permissive_mismatch(Locus::Dpb1, "111:111", "999:999"));
    }

    #[test]
    fn test_different_tce_groups_are_not_permissive() {
        assert!(!calculator().is_permissive_mismatch(Locus::Dpb1, "111:111", "222:222"));
    }

    #[test]
    fn test_missing_tce_group_is_not_permissive() {
        let calculator = calculator();
        assert!(!calculator.is_permissive_mismatch(Locus::Dpb1, "111:111", "555:555"));
        assert!(!calculator.is_permissive_mismatch(Locus::Dpb1, "555:555", "111:111"));
        assert!(!calculator.is_permissive_mismatch(Locus::Dpb1, "555:555", "666:666"));
    }

    #[test]
    fn test_empty_tce_groups_are_not_permissive() {
        assert!(!calculator().is_permissive_mismatch(Locus::Dpb1, "333:333", "444:444"));
    }

    #[test]
    fn test_other_loci_are_never_permissive() {
        let calculator = calculator();
        for locus in Locus::ALL.into_iter().filter(|l| *l != Locus::Dpb1) {
            assert!(!calculator.is_permissive_mismatch(locus, "111:111", "999:999"));
            assert!(!calculator.is_permissive_mismatch(locus, "111:111", "111:111"));
        }
    }
}
