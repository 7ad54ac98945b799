//! Centralized validation and allele-name helpers.

use std::collections::BTreeSet;

/// Maximum number of rows allowed in a single TCE group table (DOS protection)
pub const MAX_TCE_ENTRIES: usize = 100_000;

/// Maximum number of candidate alleles accepted in one multiple-allele typing
pub const MAX_ALLELES_PER_TYPING: usize = 10_000;

/// Suffix marking a null (non-expressing) allele
pub const NULL_ALLELE_SUFFIX: char = 'N';

/// Check whether an allele name denotes a null (non-expressing) allele.
///
/// # Examples
///
/// ```
/// use hla_grading::utils::validation::is_null_allele;
///
/// assert!(is_null_allele("01:01:01:02N"));
/// assert!(!is_null_allele("01:01:01:01"));
/// ```
#[must_use]
pub fn is_null_allele(allele_name: &str) -> bool {
    allele_name.trim_end().ends_with(NULL_ALLELE_SUFFIX)
}

/// Split an allele name into its colon-separated fields.
///
/// A leading locus prefix (`A*`) is dropped, as is any expression suffix on the
/// last field (`N`, `L`, `S`, `Q`, ...), so `A*24:02:01:02L` yields
/// `["24", "02", "01", "02"]`.
#[must_use]
pub fn allele_fields(allele_name: &str) -> Vec<&str> {
    let name = allele_name
        .split_once('*')
        .map_or(allele_name, |(_, rest)| rest)
        .trim();

    let mut fields: Vec<&str> = name.split(':').collect();
    if let Some(last) = fields.pop() {
        fields.push(last.trim_end_matches(|c: char| c.is_ascii_alphabetic()));
    }
    fields
}

/// True if the first `count` fields of both allele names are identical.
///
/// Names with fewer than `count` fields are compared on all of their fields, so
/// two-field names only agree here when they are the same allele.
#[must_use]
pub fn first_fields_match(a: &str, b: &str, count: usize) -> bool {
    let a_fields = allele_fields(a);
    let b_fields = allele_fields(b);
    let a_prefix = &a_fields[..a_fields.len().min(count)];
    let b_prefix = &b_fields[..b_fields.len().min(count)];
    a_prefix == b_prefix
}

/// True when the two sets share at least one element
#[must_use]
pub fn intersects<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> bool {
    a.intersection(b).next().is_some()
}

/// Check if adding another TCE table row would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new row.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_tce_entry_limit(count: usize) -> Option<String> {
    if count >= MAX_TCE_ENTRIES {
        Some(format!(
            "Too many TCE group rows: adding another would exceed maximum of {MAX_TCE_ENTRIES}"
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_null_allele() {
        assert!(is_null_allele("111:111N"));
        assert!(is_null_allele("A*01:01:01:02N"));
        assert!(!is_null_allele("999:999"));
        assert!(!is_null_allele("24:02:01:02L"));
    }

    #[test]
    fn test_allele_fields() {
        assert_eq!(allele_fields("999:999"), vec!["999", "999"]);
        assert_eq!(allele_fields("A*01:01:01:01"), vec!["01", "01", "01", "01"]);
        assert_eq!(allele_fields("24:02:01:02L"), vec!["24", "02", "01", "02"]);
        assert_eq!(allele_fields("111:111N"), vec!["111", "111"]);
    }

    #[test]
    fn test_first_fields_match() {
        assert!(first_fields_match("01:01:01:01", "01:01:01:02", 3));
        assert!(!first_fields_match("01:01:01:01", "01:01:02:01", 3));
        assert!(first_fields_match("01:01:01:01", "01:01:02:01", 2));
        assert!(!first_fields_match("01:01", "01:01:02", 3));
        assert!(first_fields_match("999:999", "999:999", 3));
    }

    #[test]
    fn test_intersects() {
        let a: BTreeSet<&str> = ["g1", "g2"].into_iter().collect();
        let b: BTreeSet<&str> = ["g2", "g3"].into_iter().collect();
        let c: BTreeSet<&str> = ["g4"].into_iter().collect();
        let empty: BTreeSet<&str> = BTreeSet::new();

        assert!(intersects(&a, &b));
        assert!(!intersects(&a, &c));
        assert!(!intersects(&a, &empty));
        assert!(!intersects(&empty, &empty));
    }

    #[test]
    fn test_check_tce_entry_limit() {
        assert!(check_tce_entry_limit(0).is_none());
        assert!(check_tce_entry_limit(MAX_TCE_ENTRIES - 1).is_none());
        assert!(check_tce_entry_limit(MAX_TCE_ENTRIES).is_some());
    }
}
