use std::path::PathBuf;

use clap::Args;

use crate::cli::{build_service, GradingOptions, OutputFormat};
use crate::grading::service::{GradingResult, DEFAULT_HLA_NOMENCLATURE_VERSION};
use crate::parsing::json::parse_request_file;

#[derive(Args)]
pub struct GradeArgs {
    /// Grading request (JSON with allowed_orientations, patient, and donor)
    #[arg(required = true)]
    pub request: PathBuf,

    #[command(flatten)]
    pub grading: GradingOptions,
}

pub fn run(args: GradeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let request = parse_request_file(&args.request)?;

    // Command line wins over the request document
    let hla_version = args
        .grading
        .hla_version
        .clone()
        .or_else(|| request.hla_nomenclature_version.clone())
        .unwrap_or_else(|| DEFAULT_HLA_NOMENCLATURE_VERSION.to_string());

    let service = build_service(args.grading.tce_groups.as_deref(), hla_version)?;
    if verbose {
        eprintln!(
            "HLA nomenclature version: {}",
            service.hla_nomenclature_version()
        );
    }
    let result = service.score_request(&request)?;

    match format {
        OutputFormat::Text => print_text_result(&result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Tsv => {
            print_tsv_header(false);
            print_tsv_result(None, &result);
        }
    }

    Ok(())
}

pub(crate) fn print_text_result(result: &GradingResult) {
    println!("Grading Results");
    println!("{}", "=".repeat(60));

    for (locus, locus_result) in result {
        let orientations: Vec<String> = locus_result
            .orientations
            .iter()
            .map(ToString::to_string)
            .collect();
        println!(
            "  {:<6} {:<20} {:<20} [{}]",
            locus.to_string(),
            locus_result.grades.position1.to_string(),
            locus_result.grades.position2.to_string(),
            orientations.join(", ")
        );
    }
}

pub(crate) fn print_tsv_header(with_donor: bool) {
    let prefix = if with_donor { "donor\t" } else { "" };
    println!("{prefix}locus\tposition1\tposition2\torientations");
}

/// Print one row per locus; `donor` adds a leading column when grading several donors
pub(crate) fn print_tsv_result(donor: Option<&str>, result: &GradingResult) {
    for (locus, locus_result) in result {
        let orientations: Vec<String> = locus_result
            .orientations
            .iter()
            .map(ToString::to_string)
            .collect();
        let prefix = donor.map(|d| format!("{d}\t")).unwrap_or_default();
        println!(
            "{prefix}{locus}\t{}\t{}\t{}",
            locus_result.grades.position1,
            locus_result.grades.position2,
            orientations.join(",")
        );
    }
}
