use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::metadata::ScoringMetadata;
use crate::core::types::{Locus, Orientation};

/// A value for each of the two typed positions at a locus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocusInfo<T> {
    pub position1: T,
    pub position2: T,
}

impl<T> LocusInfo<T> {
    pub fn new(position1: T, position2: T) -> Self {
        Self {
            position1,
            position2,
        }
    }
}

impl<T> LocusInfo<Option<T>> {
    /// True when neither position carries a typing
    pub fn is_untyped(&self) -> bool {
        self.position1.is_none() && self.position2.is_none()
    }
}

/// Typing of one patient or donor: scoring metadata per locus and position.
///
/// Loci absent from the map are untyped, as are positions set to `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phenotype {
    loci: BTreeMap<Locus, LocusInfo<Option<ScoringMetadata>>>,
}

impl Phenotype {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_locus(
        mut self,
        locus: Locus,
        position1: Option<ScoringMetadata>,
        position2: Option<ScoringMetadata>,
    ) -> Self {
        self.set_locus(locus, position1, position2);
        self
    }

    pub fn set_locus(
        &mut self,
        locus: Locus,
        position1: Option<ScoringMetadata>,
        position2: Option<ScoringMetadata>,
    ) {
        self.loci.insert(locus, LocusInfo::new(position1, position2));
    }

    /// Metadata at both positions of a locus; untyped loci yield `None` twice
    pub fn locus(&self, locus: Locus) -> LocusInfo<Option<&ScoringMetadata>> {
        self.loci.get(&locus).map_or_else(
            || LocusInfo::new(None, None),
            |info| LocusInfo::new(info.position1.as_ref(), info.position2.as_ref()),
        )
    }

    /// All typed metadata, in locus order
    pub fn metadata(&self) -> impl Iterator<Item = &ScoringMetadata> {
        self.loci
            .values()
            .flat_map(|info| [info.position1.as_ref(), info.position2.as_ref()])
            .flatten()
    }
}

/// Orientations the caller wants evaluated, per locus
pub type AllowedOrientations = BTreeMap<Locus, BTreeSet<Orientation>>;

/// Allow both orientations at each of the given loci
pub fn all_orientations(loci: impl IntoIterator<Item = Locus>) -> AllowedOrientations {
    loci.into_iter()
        .map(|locus| (locus, Orientation::ALL.into_iter().collect()))
        .collect()
}
