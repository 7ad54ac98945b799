use std::path::PathBuf;

use clap::Args;
use tracing::warn;

use crate::cli::grade::{print_text_result, print_tsv_header, print_tsv_result};
use crate::cli::{build_service, GradingOptions, OutputFormat};
use crate::core::phenotype::all_orientations;
use crate::core::types::Locus;
use crate::grading::error::GradingError;
use crate::grading::service::{GradingResult, DEFAULT_HLA_NOMENCLATURE_VERSION};
use crate::parsing::json::parse_phenotype_file;

#[derive(Args)]
pub struct CompareArgs {
    /// Patient phenotype (JSON)
    #[arg(required = true)]
    pub patient: PathBuf,

    /// Donor phenotypes (JSON), graded independently
    #[arg(required = true, num_args = 1..)]
    pub donors: Vec<PathBuf>,

    /// Loci to grade (comma-separated); defaults to all six
    #[arg(long, value_delimiter = ',')]
    pub loci: Vec<Locus>,

    #[command(flatten)]
    pub grading: GradingOptions,
}

pub fn run(args: CompareArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let patient = parse_phenotype_file(&args.patient)?;
    let donors = args
        .donors
        .iter()
        .map(|path| parse_phenotype_file(path))
        .collect::<Result<Vec<_>, _>>()?;

    let loci = if args.loci.is_empty() {
        Locus::ALL.to_vec()
    } else {
        args.loci.clone()
    };
    let allowed = all_orientations(loci);

    if verbose {
        eprintln!(
            "Grading {} donor(s) at {} loci",
            donors.len(),
            allowed.len()
        );
    }

    let hla_version = args
        .grading
        .hla_version
        .clone()
        .unwrap_or_else(|| DEFAULT_HLA_NOMENCLATURE_VERSION.to_string());
    let service = build_service(args.grading.tce_groups.as_deref(), hla_version)?;
    let results = service.score_donors(&allowed, &patient, &donors);

    let named: Vec<(String, Result<GradingResult, GradingError>)> = args
        .donors
        .iter()
        .map(|path| path.display().to_string())
        .zip(results)
        .collect();

    for (donor, result) in &named {
        if let Err(e) = result {
            warn!("Failed to grade donor {donor}: {e}");
        }
    }

    match format {
        OutputFormat::Text => print_text_comparison(&named),
        OutputFormat::Json => print_json_comparison(&named)?,
        OutputFormat::Tsv => print_tsv_comparison(&named),
    }

    if named.iter().all(|(_, result)| result.is_err()) {
        anyhow::bail!("No donor could be graded");
    }

    Ok(())
}

fn print_text_comparison(named: &[(String, Result<GradingResult, GradingError>)]) {
    for (i, (donor, result)) in named.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("Donor: {donor}");
        match result {
            Ok(result) => print_text_result(result),
            Err(e) => println!("  Error: {e}"),
        }
    }
}

fn print_json_comparison(
    named: &[(String, Result<GradingResult, GradingError>)],
) -> anyhow::Result<()> {
    let output: Vec<serde_json::Value> = named
        .iter()
        .map(|(donor, result)| match result {
            Ok(result) => serde_json::json!({ "donor": donor, "result": result }),
            Err(e) => serde_json::json!({ "donor": donor, "error": e.to_string() }),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_comparison(named: &[(String, Result<GradingResult, GradingError>)]) {
    print_tsv_header(true);
    for (donor, result) in named {
        if let Ok(result) = result {
            print_tsv_result(Some(donor), result);
        }
    }
}
