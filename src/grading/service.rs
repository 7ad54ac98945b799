use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::metadata::ScoringMetadata;
use crate::core::phenotype::{AllowedOrientations, LocusInfo, Phenotype};
use crate::core::types::{Locus, MatchGrade, Orientation};
use crate::grading::calculators::GradingCalculator;
use crate::grading::error::GradingError;
use crate::grading::factory::GradingCalculatorFactory;
use crate::grading::permissive::PermissiveMismatchCalculator;
use crate::tce::store::TceGroupLookup;

/// Grade given to a position pair when either side is untyped.
///
/// Untyped data is treated as presumptively near-matching rather than as a mismatch.
pub const UNTYPED_POSITION_GRADE: MatchGrade = MatchGrade::PGroup;

/// Default HLA nomenclature version used for TCE group lookups
pub const DEFAULT_HLA_NOMENCLATURE_VERSION: &str = "3.55.0";

/// Configuration for the grading service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingConfig {
    /// Nomenclature version shared by patient and donor metadata
    pub hla_nomenclature_version: String,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            hla_nomenclature_version: DEFAULT_HLA_NOMENCLATURE_VERSION.to_string(),
        }
    }
}

/// A grading call as read from a request document; every part may be absent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradingRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hla_nomenclature_version: Option<String>,

    #[serde(default)]
    pub allowed_orientations: Option<AllowedOrientations>,

    #[serde(default)]
    pub patient: Option<Phenotype>,

    #[serde(default)]
    pub donor: Option<Phenotype>,
}

/// Grades of the two position pairs of an orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradePair {
    pub position1: MatchGrade,
    pub position2: MatchGrade,
}

impl GradePair {
    pub fn new(position1: MatchGrade, position2: MatchGrade) -> Self {
        Self {
            position1,
            position2,
        }
    }

    /// Sum of both grade ranks; lower is better
    pub fn score(&self) -> u32 {
        u32::from(self.position1.rank()) + u32::from(self.position2.rank())
    }
}

/// Best grade pair at a locus and every orientation that achieves it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocusGradingResult {
    pub grades: GradePair,
    pub orientations: BTreeSet<Orientation>,
}

/// Per-locus results of grading one donor against a patient
pub type GradingResult = BTreeMap<Locus, LocusGradingResult>;

/// Grades patient and donor phenotypes locus by locus
#[derive(Debug, Clone)]
pub struct GradingService {
    permissive: PermissiveMismatchCalculator,
}

impl GradingService {
    pub fn new(permissive: PermissiveMismatchCalculator) -> Self {
        Self { permissive }
    }

    /// Create a service from a TCE lookup and configuration
    pub fn with_config(lookup: Arc<dyn TceGroupLookup>, config: &GradingConfig) -> Self {
        Self::new(PermissiveMismatchCalculator::new(
            lookup,
            config.hla_nomenclature_version.clone(),
        ))
    }

    /// Nomenclature version used for TCE group lookups
    pub fn hla_nomenclature_version(&self) -> &str {
        self.permissive.hla_nomenclature_version()
    }

    pub fn factory(&self) -> GradingCalculatorFactory<'_> {
        GradingCalculatorFactory::new(&self.permissive)
    }

    /// Grade a single patient typing against a single donor typing
    ///
    /// # Errors
    ///
    /// Returns `GradingError::LocusMismatch` if the typings are at different loci.
    pub fn grade_typings(
        &self,
        patient: &ScoringMetadata,
        donor: &ScoringMetadata,
    ) -> Result<MatchGrade, GradingError> {
        self.factory()
            .calculator_for(&patient.scoring_info, &donor.scoring_info)
            .calculate_grade(patient, donor)
    }

    /// Grade a request whose parts may be missing
    ///
    /// # Errors
    ///
    /// Returns `GradingError::ArgumentNull` before grading anything if the orientation
    /// map or either phenotype is absent, otherwise any error from [`Self::score`].
    pub fn score_request(&self, request: &GradingRequest) -> Result<GradingResult, GradingError> {
        let allowed = request
            .allowed_orientations
            .as_ref()
            .ok_or(GradingError::ArgumentNull("allowed orientations"))?;
        let patient = request
            .patient
            .as_ref()
            .ok_or(GradingError::ArgumentNull("patient phenotype"))?;
        let donor = request
            .donor
            .as_ref()
            .ok_or(GradingError::ArgumentNull("donor phenotype"))?;

        self.score(allowed, patient, donor)
    }

    /// Grade every locus in `allowed`, considering only the orientations listed there
    ///
    /// # Errors
    ///
    /// Returns the first grading error encountered; no partial result is returned.
    pub fn score(
        &self,
        allowed: &AllowedOrientations,
        patient: &Phenotype,
        donor: &Phenotype,
    ) -> Result<GradingResult, GradingError> {
        allowed
            .iter()
            .map(|(&locus, orientations)| {
                let result = self.score_locus(
                    locus,
                    orientations,
                    &patient.locus(locus),
                    &donor.locus(locus),
                )?;
                Ok((locus, result))
            })
            .collect()
    }

    /// Grade one locus
    ///
    /// # Errors
    ///
    /// Returns `GradingError::NoOrientations` if `orientations` is empty, or any
    /// calculator error.
    pub fn score_locus(
        &self,
        locus: Locus,
        orientations: &BTreeSet<Orientation>,
        patient: &LocusInfo<Option<&ScoringMetadata>>,
        donor: &LocusInfo<Option<&ScoringMetadata>>,
    ) -> Result<LocusGradingResult, GradingError> {
        if orientations.is_empty() {
            return Err(GradingError::NoOrientations(locus));
        }

        // One untyped side falls through to per-position substitution over the allowed set
        if patient.is_untyped() && donor.is_untyped() {
            debug!("Locus {locus} untyped; both orientations graded as {UNTYPED_POSITION_GRADE}");
            return Ok(LocusGradingResult {
                grades: GradePair::new(UNTYPED_POSITION_GRADE, UNTYPED_POSITION_GRADE),
                orientations: Orientation::ALL.into_iter().collect(),
            });
        }

        let mut graded = Vec::with_capacity(orientations.len());
        for &orientation in orientations {
            let grades = self.grade_orientation(orientation, patient, donor)?;
            debug!(
                "Locus {locus} {orientation}: {} / {} (score {})",
                grades.position1,
                grades.position2,
                grades.score()
            );
            graded.push((orientation, grades));
        }

        let best_score = graded
            .iter()
            .map(|(_, grades)| grades.score())
            .min()
            .ok_or(GradingError::NoOrientations(locus))?;

        let winners: Vec<(Orientation, GradePair)> = graded
            .into_iter()
            .filter(|(_, grades)| grades.score() == best_score)
            .collect();

        // Orientations iterate Direct before Cross, so the first winner's pair is reported
        let grades = winners
            .first()
            .map(|(_, grades)| *grades)
            .ok_or(GradingError::NoOrientations(locus))?;

        Ok(LocusGradingResult {
            grades,
            orientations: winners.into_iter().map(|(o, _)| o).collect(),
        })
    }

    fn grade_orientation(
        &self,
        orientation: Orientation,
        patient: &LocusInfo<Option<&ScoringMetadata>>,
        donor: &LocusInfo<Option<&ScoringMetadata>>,
    ) -> Result<GradePair, GradingError> {
        let (donor1, donor2) = match orientation {
            Orientation::Direct => (donor.position1, donor.position2),
            Orientation::Cross => (donor.position2, donor.position1),
        };

        Ok(GradePair::new(
            self.grade_position(patient.position1, donor1)?,
            self.grade_position(patient.position2, donor2)?,
        ))
    }

    fn grade_position(
        &self,
        patient: Option<&ScoringMetadata>,
        donor: Option<&ScoringMetadata>,
    ) -> Result<MatchGrade, GradingError> {
        match (patient, donor) {
            (Some(patient), Some(donor)) => self.grade_typings(patient, donor),
            _ => Ok(UNTYPED_POSITION_GRADE),
        }
    }

    /// Grade many donors against one patient in parallel.
    ///
    /// Each donor gets its own result, so a failure for one candidate does not affect
    /// the others.
    pub fn score_donors(
        &self,
        allowed: &AllowedOrientations,
        patient: &Phenotype,
        donors: &[Phenotype],
    ) -> Vec<Result<GradingResult, GradingError>> {
        donors
            .par_iter()
            .map(|donor| self.score(allowed, patient, donor))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::{
        AlleleTypingStatus, ScoringInfo, SerologyEntry, SerologyScoringInfo, SerologySubtype,
        SingleAlleleScoringInfo,
    };
    use crate::core::phenotype::all_orientations;
    use crate::tce::store::NoTceGroups;

    fn service() -> GradingService {
        GradingService::with_config(Arc::new(NoTceGroups), &GradingConfig::default())
    }

    fn allele(locus: Locus, name: &str) -> ScoringMetadata {
        ScoringMetadata::single_allele(
            locus,
            SingleAlleleScoringInfo::new(name, AlleleTypingStatus::default()),
        )
    }

    fn serology(locus: Locus, entries: &[(&str, SerologySubtype, bool)]) -> ScoringMetadata {
        ScoringMetadata::new(
            locus,
            entries.first().map_or("", |e| e.0),
            ScoringInfo::Serology(SerologyScoringInfo {
                matching_serologies: entries
                    .iter()
                    .map(|(name, subtype, direct)| SerologyEntry::new(*name, *subtype, *direct))
                    .collect(),
            }),
        )
    }

    fn orientations(values: &[Orientation]) -> BTreeSet<Orientation> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_direct_orientation_wins() {
        let service = service();
        let p1 = allele(Locus::A, "01:01:01:01");
        let p2 = allele(Locus::A, "02:01:01:01");
        let d2 = allele(Locus::A, "03:01:01:01");

        let result = service
            .score_locus(
                Locus::A,
                &orientations(&Orientation::ALL),
                &LocusInfo::new(Some(&p1), Some(&p2)),
                &LocusInfo::new(Some(&p1), Some(&d2)),
            )
            .unwrap();

        assert_eq!(
            result.grades,
            GradePair::new(MatchGrade::GDna, MatchGrade::Mismatch)
        );
        assert_eq!(result.orientations, orientations(&[Orientation::Direct]));
    }

    #[test]
    fn test_cross_orientation_wins() {
        let service = service();
        let p1 = allele(Locus::B, "07:02:01:01");
        let p2 = allele(Locus::B, "08:01:01:01");
        let d1 = allele(Locus::B, "08:01:01:01");
        let d2 = allele(Locus::B, "07:02:01:01");

        let result = service
            .score_locus(
                Locus::B,
                &orientations(&Orientation::ALL),
                &LocusInfo::new(Some(&p1), Some(&p2)),
                &LocusInfo::new(Some(&d1), Some(&d2)),
            )
            .unwrap();

        assert_eq!(result.grades, GradePair::new(MatchGrade::GDna, MatchGrade::GDna));
        assert_eq!(result.orientations, orientations(&[Orientation::Cross]));
    }

    #[test]
    fn test_lower_summed_rank_wins() {
        // Direct grades (Associated, Mismatch); Cross grades (Split, Mismatch)
        let service = service();
        let p1 = serology(Locus::A, &[("2403", SerologySubtype::Associated, true)]);
        let p2 = serology(Locus::A, &[("24", SerologySubtype::Split, true)]);
        let d1 = serology(Locus::A, &[("2403", SerologySubtype::Associated, true)]);
        let d2 = serology(
            Locus::A,
            &[
                ("2", SerologySubtype::NotSplit, true),
                ("2403", SerologySubtype::Associated, false),
            ],
        );

        let result = service
            .score_locus(
                Locus::A,
                &orientations(&Orientation::ALL),
                &LocusInfo::new(Some(&p1), Some(&p2)),
                &LocusInfo::new(Some(&d1), Some(&d2)),
            )
            .unwrap();

        assert_eq!(
            result.grades,
            GradePair::new(MatchGrade::Associated, MatchGrade::Mismatch)
        );
        assert_eq!(result.orientations, orientations(&[Orientation::Direct]));
    }

    #[test]
    fn test_tied_orientations_are_all_kept() {
        let service = service();
        let typing = allele(Locus::C, "07:01:01:01");

        let result = service
            .score_locus(
                Locus::C,
                &orientations(&Orientation::ALL),
                &LocusInfo::new(Some(&typing), Some(&typing)),
                &LocusInfo::new(Some(&typing), Some(&typing)),
            )
            .unwrap();

        assert_eq!(result.grades, GradePair::new(MatchGrade::GDna, MatchGrade::GDna));
        assert_eq!(result.orientations, orientations(&Orientation::ALL));
    }

    #[test]
    fn test_only_allowed_orientations_are_evaluated() {
        let service = service();
        let p1 = allele(Locus::B, "07:02:01:01");
        let p2 = allele(Locus::B, "08:01:01:01");

        let result = service
            .score_locus(
                Locus::B,
                &orientations(&[Orientation::Direct]),
                &LocusInfo::new(Some(&p1), Some(&p2)),
                &LocusInfo::new(Some(&p2), Some(&p1)),
            )
            .unwrap();

        assert_eq!(
            result.grades,
            GradePair::new(MatchGrade::Mismatch, MatchGrade::Mismatch)
        );
        assert_eq!(result.orientations, orientations(&[Orientation::Direct]));
    }

    #[test]
    fn test_untyped_locus_returns_both_orientations() {
        let service = service();
        for requested in [
            orientations(&[Orientation::Direct]),
            orientations(&[Orientation::Cross]),
            orientations(&Orientation::ALL),
        ] {
            let result = service
                .score_locus(
                    Locus::Dqb1,
                    &requested,
                    &LocusInfo::new(None, None),
                    &LocusInfo::new(None, None),
                )
                .unwrap();
            assert_eq!(
                result.grades,
                GradePair::new(MatchGrade::PGroup, MatchGrade::PGroup)
            );
            assert_eq!(result.orientations, orientations(&Orientation::ALL));
        }
    }

    #[test]
    fn test_one_untyped_side_keeps_allowed_orientations() {
        let service = service();
        let typing = allele(Locus::A, "01:01:01:01");

        let result = service
            .score_locus(
                Locus::A,
                &orientations(&[Orientation::Direct]),
                &LocusInfo::new(Some(&typing), Some(&typing)),
                &LocusInfo::new(None, None),
            )
            .unwrap();

        assert_eq!(
            result.grades,
            GradePair::new(MatchGrade::PGroup, MatchGrade::PGroup)
        );
        assert_eq!(result.orientations, orientations(&[Orientation::Direct]));

        let result = service
            .score_locus(
                Locus::A,
                &orientations(&Orientation::ALL),
                &LocusInfo::new(None, None),
                &LocusInfo::new(Some(&typing), Some(&typing)),
            )
            .unwrap();
        assert_eq!(result.orientations, orientations(&Orientation::ALL));
    }

    #[test]
    fn test_single_missing_position_defaults_to_p_group() {
        let service = service();
        let typing = allele(Locus::Drb1, "15:01:01:01");

        let result = service
            .score_locus(
                Locus::Drb1,
                &orientations(&[Orientation::Direct]),
                &LocusInfo::new(Some(&typing), None),
                &LocusInfo::new(Some(&typing), Some(&typing)),
            )
            .unwrap();

        assert_eq!(
            result.grades,
            GradePair::new(MatchGrade::GDna, MatchGrade::PGroup)
        );
    }

    #[test]
    fn test_empty_orientation_set_is_rejected() {
        let service = service();
        let result = service.score_locus(
            Locus::A,
            &BTreeSet::new(),
            &LocusInfo::new(None, None),
            &LocusInfo::new(None, None),
        );
        assert_eq!(result, Err(GradingError::NoOrientations(Locus::A)));
    }

    #[test]
    fn test_config_sets_nomenclature_version() {
        assert_eq!(
            service().hla_nomenclature_version(),
            DEFAULT_HLA_NOMENCLATURE_VERSION
        );

        let config = GradingConfig {
            hla_nomenclature_version: "3.55.0".to_string(),
        };
        let service = GradingService::with_config(Arc::new(NoTceGroups), &config);
        assert_eq!(service.hla_nomenclature_version(), "3.55.0");
    }

    #[test]
    fn test_score_request_requires_all_arguments() {
        let service = service();
        let complete = GradingRequest {
            hla_nomenclature_version: None,
            allowed_orientations: Some(all_orientations([Locus::A])),
            patient: Some(Phenotype::new()),
            donor: Some(Phenotype::new()),
        };
        assert!(service.score_request(&complete).is_ok());

        let mut request = complete.clone();
        request.allowed_orientations = None;
        assert_eq!(
            service.score_request(&request),
            Err(GradingError::ArgumentNull("allowed orientations"))
        );

        let mut request = complete.clone();
        request.patient = None;
        assert_eq!(
            service.score_request(&request),
            Err(GradingError::ArgumentNull("patient phenotype"))
        );

        let mut request = complete;
        request.donor = None;
        assert_eq!(
            service.score_request(&request),
            Err(GradingError::ArgumentNull("donor phenotype"))
        );
    }

    #[test]
    fn test_locus_mismatch_aborts_scoring() {
        let service = service();
        let patient = Phenotype::new().with_locus(
            Locus::A,
            Some(allele(Locus::A, "01:01")),
            Some(allele(Locus::A, "01:01")),
        );
        let donor = Phenotype::new().with_locus(
            Locus::A,
            Some(allele(Locus::B, "01:01")),
            Some(allele(Locus::A, "01:01")),
        );

        let result = service.score(&all_orientations([Locus::A]), &patient, &donor);
        assert!(matches!(result, Err(GradingError::LocusMismatch { .. })));
    }

    #[test]
    fn test_score_donors_isolates_failures() {
        let service = service();
        let patient = Phenotype::new().with_locus(
            Locus::A,
            Some(allele(Locus::A, "01:01")),
            Some(allele(Locus::A, "02:01")),
        );
        let good = patient.clone();
        let bad = Phenotype::new().with_locus(
            Locus::A,
            Some(allele(Locus::C, "01:01")),
            Some(allele(Locus::A, "02:01")),
        );

        let results =
            service.score_donors(&all_orientations([Locus::A]), &patient, &[good, bad]);

        assert_eq!(results.len(), 2);
        let first = results[0].as_ref().unwrap();
        assert_eq!(
            first[&Locus::A].grades,
            GradePair::new(MatchGrade::GDna, MatchGrade::GDna)
        );
        assert!(results[1].is_err());
    }
}
