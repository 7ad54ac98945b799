use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{HlaTypingCategory, Locus};
use crate::utils::validation::{is_null_allele, MAX_ALLELES_PER_TYPING};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("Empty allele name in {0} typing")]
    EmptyAlleleName(String),

    #[error("Null allele '{0}' must not carry G group or P group memberships")]
    NullAlleleWithGroups(String),

    #[error("Multiple allele typing '{0}' has no candidate alleles")]
    EmptyAlleleSet(String),

    #[error("Multiple allele typing '{0}' has {1} alleles, exceeding the maximum allowed")]
    TooManyAlleles(String, usize),
}

/// How a serology relates to the typing that lists it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerologySubtype {
    Associated,
    Split,
    NotSplit,
    Broad,
}

/// A serology reachable from a typing through the WMDA equivalence tables
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SerologyEntry {
    /// Serology name, e.g. "24" or "9"
    pub name: String,

    pub subtype: SerologySubtype,

    /// True for the direct serological equivalent of the typing; false for
    /// serologies only related through the broad/split/associated hierarchy
    pub is_direct: bool,
}

impl SerologyEntry {
    pub fn new(name: impl Into<String>, subtype: SerologySubtype, is_direct: bool) -> Self {
        Self {
            name: name.into(),
            subtype,
            is_direct,
        }
    }
}

/// Extent of the sequence known for an allele
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceStatus {
    Full,
    Partial,
}

/// Which DNA the allele sequence was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DnaCategory {
    GDna,
    CDna,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AlleleTypingStatus {
    pub sequence_status: SequenceStatus,
    pub dna_category: DnaCategory,
}

impl AlleleTypingStatus {
    pub fn new(sequence_status: SequenceStatus, dna_category: DnaCategory) -> Self {
        Self {
            sequence_status,
            dna_category,
        }
    }

    pub fn is_full_sequence(&self) -> bool {
        self.sequence_status == SequenceStatus::Full
    }
}

impl Default for AlleleTypingStatus {
    fn default() -> Self {
        Self::new(SequenceStatus::Full, DnaCategory::GDna)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerologyScoringInfo {
    #[serde(default)]
    pub matching_serologies: BTreeSet<SerologyEntry>,
}

/// A single, fully resolved allele
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SingleAlleleScoringInfo {
    pub allele_name: String,

    #[serde(default)]
    pub typing_status: AlleleTypingStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_g_group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_p_group: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub matching_serologies: BTreeSet<SerologyEntry>,
}

impl SingleAlleleScoringInfo {
    pub fn new(allele_name: impl Into<String>, typing_status: AlleleTypingStatus) -> Self {
        Self {
            allele_name: allele_name.into(),
            typing_status,
            matching_g_group: None,
            matching_p_group: None,
            matching_serologies: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_g_group(mut self, g_group: impl Into<String>) -> Self {
        self.matching_g_group = Some(g_group.into());
        self
    }

    #[must_use]
    pub fn with_p_group(mut self, p_group: impl Into<String>) -> Self {
        self.matching_p_group = Some(p_group.into());
        self
    }

    #[must_use]
    pub fn with_serologies(mut self, serologies: impl IntoIterator<Item = SerologyEntry>) -> Self {
        self.matching_serologies = serologies.into_iter().collect();
        self
    }

    pub fn is_null(&self) -> bool {
        is_null_allele(&self.allele_name)
    }

    pub fn g_groups(&self) -> BTreeSet<String> {
        self.matching_g_group.iter().cloned().collect()
    }

    pub fn p_groups(&self) -> BTreeSet<String> {
        self.matching_p_group.iter().cloned().collect()
    }
}

/// An ambiguous typing that expands to several candidate alleles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleAlleleScoringInfo {
    pub alleles: Vec<SingleAlleleScoringInfo>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub matching_serologies: BTreeSet<SerologyEntry>,
}

impl MultipleAlleleScoringInfo {
    pub fn new(alleles: impl IntoIterator<Item = SingleAlleleScoringInfo>) -> Self {
        Self {
            alleles: alleles.into_iter().collect(),
            matching_serologies: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_serologies(mut self, serologies: impl IntoIterator<Item = SerologyEntry>) -> Self {
        self.matching_serologies = serologies.into_iter().collect();
        self
    }

    pub fn g_groups(&self) -> BTreeSet<String> {
        self.alleles
            .iter()
            .filter_map(|a| a.matching_g_group.clone())
            .collect()
    }

    pub fn p_groups(&self) -> BTreeSet<String> {
        self.alleles
            .iter()
            .filter_map(|a| a.matching_p_group.clone())
            .collect()
    }
}

/// A typing pre-aggregated across many alleles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedMolecularScoringInfo {
    #[serde(default)]
    pub matching_g_groups: BTreeSet<String>,

    #[serde(default)]
    pub matching_p_groups: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub matching_serologies: BTreeSet<SerologyEntry>,
}

/// An allele that is not part of the active nomenclature version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAlleleScoringInfo {
    pub allele_name: String,
}

/// Category-specific data used to grade a typing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ScoringInfo {
    Serology(SerologyScoringInfo),
    SingleAllele(SingleAlleleScoringInfo),
    MultipleAllele(MultipleAlleleScoringInfo),
    ConsolidatedMolecular(ConsolidatedMolecularScoringInfo),
    NewAllele(NewAlleleScoringInfo),
}

impl ScoringInfo {
    pub fn category(&self) -> HlaTypingCategory {
        match self {
            Self::Serology(_) => HlaTypingCategory::Serology,
            Self::SingleAllele(_) => HlaTypingCategory::SingleAllele,
            Self::MultipleAllele(_) => HlaTypingCategory::MultipleAllele,
            Self::ConsolidatedMolecular(_) => HlaTypingCategory::ConsolidatedMolecular,
            Self::NewAllele(_) => HlaTypingCategory::NewAllele,
        }
    }

    /// Serologies this typing can be matched on.
    ///
    /// Null alleles are not expressed and so never contribute serologies, and new
    /// alleles have no serology assignment.
    pub fn matching_serologies(&self) -> BTreeSet<SerologyEntry> {
        match self {
            Self::Serology(info) => info.matching_serologies.clone(),
            Self::SingleAllele(info) if info.is_null() => BTreeSet::new(),
            Self::SingleAllele(info) => info.matching_serologies.clone(),
            Self::MultipleAllele(info) => info.matching_serologies.clone(),
            Self::ConsolidatedMolecular(info) => info.matching_serologies.clone(),
            Self::NewAllele(_) => BTreeSet::new(),
        }
    }

    /// G groups of a molecular typing; empty for serology and new alleles
    pub fn matching_g_groups(&self) -> BTreeSet<String> {
        match self {
            Self::SingleAllele(info) => info.g_groups(),
            Self::MultipleAllele(info) => info.g_groups(),
            Self::ConsolidatedMolecular(info) => info.matching_g_groups.clone(),
            Self::Serology(_) | Self::NewAllele(_) => BTreeSet::new(),
        }
    }

    /// P groups of a molecular typing; empty for serology and new alleles
    pub fn matching_p_groups(&self) -> BTreeSet<String> {
        match self {
            Self::SingleAllele(info) => info.p_groups(),
            Self::MultipleAllele(info) => info.p_groups(),
            Self::ConsolidatedMolecular(info) => info.matching_p_groups.clone(),
            Self::Serology(_) | Self::NewAllele(_) => BTreeSet::new(),
        }
    }
}

/// Everything needed to grade one typed position of a patient or donor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringMetadata {
    pub locus: Locus,

    /// Name the typing was looked up by in the nomenclature dictionary
    pub lookup_name: String,

    pub scoring_info: ScoringInfo,
}

impl ScoringMetadata {
    pub fn new(locus: Locus, lookup_name: impl Into<String>, scoring_info: ScoringInfo) -> Self {
        Self {
            locus,
            lookup_name: lookup_name.into(),
            scoring_info,
        }
    }

    /// Metadata for a single allele, looked up by its own name
    pub fn single_allele(locus: Locus, info: SingleAlleleScoringInfo) -> Self {
        Self::new(locus, info.allele_name.clone(), ScoringInfo::SingleAllele(info))
    }

    pub fn category(&self) -> HlaTypingCategory {
        self.scoring_info.category()
    }

    /// Check the data-model invariants that grading relies on
    ///
    /// # Errors
    ///
    /// Returns a `MetadataError` describing the first violated invariant.
    pub fn validate(&self) -> Result<(), MetadataError> {
        match &self.scoring_info {
            ScoringInfo::SingleAllele(info) => validate_single_allele(info),
            ScoringInfo::MultipleAllele(info) => {
                if info.alleles.is_empty() {
                    return Err(MetadataError::EmptyAlleleSet(self.lookup_name.clone()));
                }
                if info.alleles.len() > MAX_ALLELES_PER_TYPING {
                    return Err(MetadataError::TooManyAlleles(
                        self.lookup_name.clone(),
                        info.alleles.len(),
                    ));
                }
                info.alleles.iter().try_for_each(validate_single_allele)
            }
            ScoringInfo::NewAllele(info) if info.allele_name.trim().is_empty() => Err(
                MetadataError::EmptyAlleleName(HlaTypingCategory::NewAllele.to_string()),
            ),
            ScoringInfo::NewAllele(_)
            | ScoringInfo::Serology(_)
            | ScoringInfo::ConsolidatedMolecular(_) => Ok(()),
        }
    }
}

fn validate_single_allele(info: &SingleAlleleScoringInfo) -> Result<(), MetadataError> {
    if info.allele_name.trim().is_empty() {
        return Err(MetadataError::EmptyAlleleName(
            HlaTypingCategory::SingleAllele.to_string(),
        ));
    }
    if info.is_null()
        && (info.matching_g_group.is_some() || info.matching_p_group.is_some())
    {
        return Err(MetadataError::NullAlleleWithGroups(info.allele_name.clone()));
    }
    Ok(())
}
