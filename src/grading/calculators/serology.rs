use std::collections::BTreeSet;

use crate::core::metadata::{ScoringInfo, ScoringMetadata, SerologyEntry, SerologySubtype};
use crate::core::types::MatchGrade;
use crate::grading::calculators::GradingCalculator;
use crate::grading::error::GradingError;

/// Grades any pairing that involves a serology typing, using the serologies both
/// typings relate to through the WMDA equivalence tables.
///
/// The relationships are hierarchical: a broad antigen covers its splits, and a split
/// covers its associated antigens.
///
/// - A serology that is the direct equivalent of both typings grades by its subtype:
///   associated, split (split or not-split) or broad.
/// - A serology shared any other way compares the levels of the two typings: a broad
///   against a split or associated antigen grades broad, and an associated antigen
///   against a split or not-split grades split. Two different antigens at the same
///   level, such as sibling splits of one broad, do not match.
///
/// A typing without any direct serology stands at the shared serology itself.
///
/// The best grade across all shared serologies wins. Null alleles contribute no
/// serologies, so they never match here.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerologyGradingCalculator;

impl GradingCalculator for SerologyGradingCalculator {
    fn name(&self) -> &'static str {
        "serology"
    }

    fn permits(&self, patient: &ScoringInfo, donor: &ScoringInfo) -> bool {
        matches!(patient, ScoringInfo::Serology(_)) || matches!(donor, ScoringInfo::Serology(_))
    }

    fn grade(
        &self,
        patient: &ScoringMetadata,
        donor: &ScoringMetadata,
    ) -> Result<MatchGrade, GradingError> {
        Ok(serology_match_grade(
            &patient.scoring_info.matching_serologies(),
            &donor.scoring_info.matching_serologies(),
        ))
    }
}

/// Best grade obtainable from two sets of matching serologies
pub fn serology_match_grade(
    patient: &BTreeSet<SerologyEntry>,
    donor: &BTreeSet<SerologyEntry>,
) -> MatchGrade {
    let patient_direct = coarsest_direct_subtype(patient);
    let donor_direct = coarsest_direct_subtype(donor);

    let mut best = MatchGrade::Mismatch;
    for p in patient {
        for d in donor.iter().filter(|d| d.name == p.name) {
            let (patient_level, patient_at_shared) = side_level(p, patient_direct);
            let (donor_level, donor_at_shared) = side_level(d, donor_direct);
            let grade = if patient_at_shared && donor_at_shared {
                Some(direct_match_grade(p.subtype.max(d.subtype)))
            } else {
                related_match_grade(patient_level, donor_level)
            };
            if let Some(grade) = grade {
                best = best.best(grade);
            }
        }
    }
    best
}

/// Level a typing meets the other at through `shared`, and whether the typing is
/// `shared` itself
fn side_level(
    shared: &SerologyEntry,
    direct: Option<SerologySubtype>,
) -> (SerologySubtype, bool) {
    match direct {
        Some(level) if !shared.is_direct => (level, false),
        _ => (shared.subtype, true),
    }
}

/// Coarsest subtype among a typing's direct serologies; `Broad` is the coarsest
fn coarsest_direct_subtype(serologies: &BTreeSet<SerologyEntry>) -> Option<SerologySubtype> {
    serologies
        .iter()
        .filter(|s| s.is_direct)
        .map(|s| s.subtype)
        .max()
}

fn direct_match_grade(subtype: SerologySubtype) -> MatchGrade {
    match subtype {
        SerologySubtype::Associated => MatchGrade::Associated,
        SerologySubtype::Split | SerologySubtype::NotSplit => MatchGrade::Split,
        SerologySubtype::Broad => MatchGrade::Broad,
    }
}

/// Grade of two different antigens related through a shared serology
fn related_match_grade(patient: SerologySubtype, donor: SerologySubtype) -> Option<MatchGrade> {
    use SerologySubtype::{Associated, Broad, NotSplit, Split};

    match (patient, donor) {
        (Broad, Broad) => None,
        (Broad, _) | (_, Broad) => Some(MatchGrade::Broad),
        (Associated, Split | NotSplit) | (Split | NotSplit, Associated) => Some(MatchGrade::Split),
        _ => None,
    }
}
