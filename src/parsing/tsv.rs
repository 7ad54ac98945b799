use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::warn;

use crate::parsing::ParseError;
use crate::utils::validation::check_tce_entry_limit;

/// One TCE group assignment read from a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TceRow {
    pub allele_name: String,
    pub tce_group: String,
    pub hla_version: Option<String>,
}

/// Parse a TCE group table file with columns: allele, tce_group, [hla_version]
///
/// The delimiter is a comma for `.csv` files and a tab otherwise; a trailing `.gz`
/// is decompressed first.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_tce_table_file(path: &Path) -> Result<Vec<TceRow>, ParseError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let (is_gzipped, stem) = match name.strip_suffix(".gz") {
        Some(stem) => (true, stem.to_string()),
        None => (false, name),
    };
    let delimiter = if stem.ends_with(".csv") { ',' } else { '\t' };

    let content = if is_gzipped {
        let file = std::fs::File::open(path)?;
        let mut decoder = GzDecoder::new(file);
        let mut content = String::new();
        decoder.read_to_string(&mut content)?;
        content
    } else {
        std::fs::read_to_string(path)?
    };

    parse_tce_table_text(&content, delimiter)
}

/// Parse TCE group table text with columns: allele, tce_group, [hla_version]
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if lines have fewer than 2 fields or an empty
/// allele name, or `ParseError::TooManyRows` if the limit is exceeded.
pub fn parse_tce_table_text(text: &str, delimiter: char) -> Result<Vec<TceRow>, ParseError> {
    let mut rows = Vec::new();
    let mut first_data_line = true;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();

        // Check if first non-empty/non-comment line is a header
        if first_data_line {
            first_data_line = false;
            let first = fields.first().map(|s| s.to_lowercase()).unwrap_or_default();
            if first == "allele" || first == "allele_name" || first == "name" {
                continue;
            }
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        if fields.len() < 2 {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has fewer than 2 fields"
            )));
        }

        let allele_name = fields[0];
        if allele_name.is_empty() {
            return Err(ParseError::InvalidFormat(format!(
                "Empty allele name on line {line_num}"
            )));
        }

        // Unassigned alleles are simply left out of the table
        let tce_group = fields[1];
        if tce_group.is_empty() {
            warn!("Skipping line {line_num}: no TCE group for {allele_name}");
            continue;
        }

        let hla_version = fields
            .get(2)
            .filter(|v| !v.is_empty())
            .map(|v| (*v).to_string());

        if check_tce_entry_limit(rows.len()).is_some() {
            return Err(ParseError::TooManyRows(rows.len()));
        }

        rows.push(TceRow {
            allele_name: allele_name.to_string(),
            tce_group: tce_group.to_string(),
            hla_version,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_parse_tce_table_text() {
        let tsv = r"allele	tce_group	hla_version
01:01:01:01	3
02:01:02	3	3.55.0
09:01:01	1
";

        let rows = parse_tce_table_text(tsv, '\t').unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].allele_name, "01:01:01:01");
        assert_eq!(rows[0].tce_group, "3");
        assert!(rows[0].hla_version.is_none());
        assert_eq!(rows[1].hla_version.as_deref(), Some("3.55.0"));
    }

    #[test]
    fn test_parse_csv_without_header() {
        let csv = "01:01:01:01,3\n09:01:01,1\n";
        let rows = parse_tce_table_text(csv, ',').unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].tce_group, "1");
    }

    #[test]
    fn test_parse_skips_comments_and_unassigned_rows() {
        let tsv = "# exported TCE groups\n\nallele\ttce_group\n01:01:01:01\t\n09:01:01\t1\n";
        let rows = parse_tce_table_text(tsv, '\t').unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].allele_name, "09:01:01");
    }

    #[test]
    fn test_parse_rejects_short_lines() {
        let tsv = "01:01:01:01\t3\n09:01:01\n";
        let err = parse_tce_table_text(tsv, '\t').unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(_)));
    }

    #[test]
    fn test_parse_gzipped_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tce.tsv.gz");

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(b"allele\ttce_group\n01:01:01:01\t3\n")
            .unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let rows = parse_tce_table_file(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tce_group, "3");
    }
}
