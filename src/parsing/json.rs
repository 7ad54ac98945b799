use std::path::Path;

use tracing::debug;

use crate::core::metadata::ScoringMetadata;
use crate::core::phenotype::Phenotype;
use crate::grading::service::GradingRequest;
use crate::parsing::ParseError;

/// Parse a grading request from a JSON file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Json` if it is
/// not a valid request document, or `ParseError::InvalidMetadata` if any typing
/// violates the metadata invariants.
pub fn parse_request_file(path: &Path) -> Result<GradingRequest, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_request_text(&content)
}

/// Parse a grading request from JSON text
///
/// Missing top-level fields are accepted here and reported when the request is scored.
///
/// # Errors
///
/// Returns `ParseError::Json` for malformed JSON or `ParseError::InvalidMetadata`
/// if any typing violates the metadata invariants.
pub fn parse_request_text(text: &str) -> Result<GradingRequest, ParseError> {
    let request: GradingRequest = serde_json::from_str(text)?;

    for phenotype in [&request.patient, &request.donor].into_iter().flatten() {
        validate_phenotype(phenotype)?;
    }

    debug!(
        "Parsed grading request with {} loci",
        request.allowed_orientations.as_ref().map_or(0, |a| a.len())
    );
    Ok(request)
}

/// Parse a phenotype from a JSON file
///
/// # Errors
///
/// Returns the same errors as [`parse_request_file`].
pub fn parse_phenotype_file(path: &Path) -> Result<Phenotype, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_phenotype_text(&content)
}

/// Parse a phenotype (locus -> two positions of scoring metadata) from JSON text
///
/// # Errors
///
/// Returns `ParseError::Json` for malformed JSON or `ParseError::InvalidMetadata`
/// if any typing violates the metadata invariants.
pub fn parse_phenotype_text(text: &str) -> Result<Phenotype, ParseError> {
    let phenotype: Phenotype = serde_json::from_str(text)?;
    validate_phenotype(&phenotype)?;
    Ok(phenotype)
}

/// Parse a single scoring metadata document from a JSON file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or the errors of
/// [`parse_metadata_text`].
pub fn parse_metadata_file(path: &Path) -> Result<ScoringMetadata, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_metadata_text(&content)
}

/// Parse a single scoring metadata document from JSON text
///
/// # Errors
///
/// Returns `ParseError::Json` for malformed JSON or `ParseError::InvalidMetadata`
/// if the typing violates the metadata invariants.
pub fn parse_metadata_text(text: &str) -> Result<ScoringMetadata, ParseError> {
    let metadata: ScoringMetadata = serde_json::from_str(text)?;
    metadata.validate()?;
    Ok(metadata)
}

fn validate_phenotype(phenotype: &Phenotype) -> Result<(), ParseError> {
    phenotype
        .metadata()
        .try_for_each(ScoringMetadata::validate)
        .map_err(ParseError::from)
}
