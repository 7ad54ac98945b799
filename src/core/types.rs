use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// HLA locus graded by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Locus {
    A,
    B,
    C,
    Dpb1,
    Dqb1,
    Drb1,
}

impl Locus {
    /// All loci, in reporting order
    pub const ALL: [Locus; 6] = [
        Locus::A,
        Locus::B,
        Locus::C,
        Locus::Dpb1,
        Locus::Dqb1,
        Locus::Drb1,
    ];
}

impl std::fmt::Display for Locus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
            Self::C => write!(f, "C"),
            Self::Dpb1 => write!(f, "DPB1"),
            Self::Dqb1 => write!(f, "DQB1"),
            Self::Drb1 => write!(f, "DRB1"),
        }
    }
}

impl std::str::FromStr for Locus {
    type Err = String;

    /// Parse a locus name, case-insensitively and with an optional `HLA-` prefix
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let name = upper.strip_prefix("HLA-").unwrap_or(&upper);
        Locus::ALL
            .into_iter()
            .find(|locus| locus.to_string() == name)
            .ok_or_else(|| {
                format!("Unknown locus '{s}'; expected one of A, B, C, DPB1, DQB1, DRB1")
            })
    }
}

/// Pairing of the patient's two typed positions against the donor's
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Patient position 1 vs donor position 1, patient position 2 vs donor position 2
    Direct,
    /// Patient position 1 vs donor position 2, patient position 2 vs donor position 1
    Cross,
}

impl Orientation {
    pub const ALL: [Orientation; 2] = [Orientation::Direct, Orientation::Cross];
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "Direct"),
            Self::Cross => write!(f, "Cross"),
        }
    }
}

/// Category of an HLA typing, derived from its scoring info
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HlaTypingCategory {
    Serology,
    SingleAllele,
    MultipleAllele,
    ConsolidatedMolecular,
    NewAllele,
}

impl std::fmt::Display for HlaTypingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serology => write!(f, "serology"),
            Self::SingleAllele => write!(f, "single allele"),
            Self::MultipleAllele => write!(f, "multiple allele"),
            Self::ConsolidatedMolecular => write!(f, "consolidated molecular"),
            Self::NewAllele => write!(f, "new allele"),
        }
    }
}

/// Quality of the match between one patient typing and one donor typing.
///
/// Grades are ordered best first: `a < b` means `a` is the better match. The order
/// is defined by [`MATCH_GRADE_RANKING`] and not by declaration order, because
/// orientation selection sums these ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchGrade {
    GDna,
    CDna,
    Protein,
    GGroup,
    PGroup,
    Associated,
    Split,
    Broad,
    PermissiveMismatch,
    Mismatch,
    NullGDna,
    NullCDna,
    NullPartial,
    NullMismatch,
}

/// Every attainable grade, best match first.
///
/// The null-allele branch sits between the molecular grades and the serology grades.
pub const MATCH_GRADE_RANKING: [MatchGrade; 14] = [
    MatchGrade::GDna,
    MatchGrade::CDna,
    MatchGrade::Protein,
    MatchGrade::GGroup,
    MatchGrade::PGroup,
    MatchGrade::NullGDna,
    MatchGrade::NullCDna,
    MatchGrade::NullPartial,
    MatchGrade::NullMismatch,
    MatchGrade::Associated,
    MatchGrade::Split,
    MatchGrade::Broad,
    MatchGrade::PermissiveMismatch,
    MatchGrade::Mismatch,
];

impl MatchGrade {
    /// Position of this grade in [`MATCH_GRADE_RANKING`]; 0 is the best match
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::GDna => 0,
            Self::CDna => 1,
            Self::Protein => 2,
            Self::GGroup => 3,
            Self::PGroup => 4,
            Self::NullGDna => 5,
            Self::NullCDna => 6,
            Self::NullPartial => 7,
            Self::NullMismatch => 8,
            Self::Associated => 9,
            Self::Split => 10,
            Self::Broad => 11,
            Self::PermissiveMismatch => 12,
            Self::Mismatch => 13,
        }
    }

    /// Returns the better (lower ranked) of two grades
    #[must_use]
    pub fn best(self, other: Self) -> Self {
        std::cmp::min(self, other)
    }

    /// True for the grades produced by comparing two null alleles
    #[must_use]
    pub fn is_null_grade(self) -> bool {
        matches!(
            self,
            Self::NullGDna | Self::NullCDna | Self::NullPartial | Self::NullMismatch
        )
    }
}

impl PartialOrd for MatchGrade {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MatchGrade {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl std::fmt::Display for MatchGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::GDna => "GDna",
            Self::CDna => "CDna",
            Self::Protein => "Protein",
            Self::GGroup => "GGroup",
            Self::PGroup => "PGroup",
            Self::Associated => "Associated",
            Self::Split => "Split",
            Self::Broad => "Broad",
            Self::PermissiveMismatch => "PermissiveMismatch",
            Self::Mismatch => "Mismatch",
            Self::NullGDna => "NullGDna",
            Self::NullCDna => "NullCDna",
            Self::NullPartial => "NullPartial",
            Self::NullMismatch => "NullMismatch",
        };
        write!(f, "{name}")
    }
}
