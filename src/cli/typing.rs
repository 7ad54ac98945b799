use std::path::PathBuf;

use clap::Args;

use crate::cli::{build_service, GradingOptions, OutputFormat};
use crate::grading::calculators::GradingCalculator;
use crate::grading::service::DEFAULT_HLA_NOMENCLATURE_VERSION;
use crate::parsing::json::parse_metadata_file;

#[derive(Args)]
pub struct TypingArgs {
    /// Patient scoring metadata (JSON)
    #[arg(required = true)]
    pub patient: PathBuf,

    /// Donor scoring metadata (JSON)
    #[arg(required = true)]
    pub donor: PathBuf,

    #[command(flatten)]
    pub grading: GradingOptions,
}

pub fn run(args: TypingArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let patient = parse_metadata_file(&args.patient)?;
    let donor = parse_metadata_file(&args.donor)?;

    let hla_version = args
        .grading
        .hla_version
        .clone()
        .unwrap_or_else(|| DEFAULT_HLA_NOMENCLATURE_VERSION.to_string());
    let service = build_service(args.grading.tce_groups.as_deref(), hla_version)?;

    let calculator = service
        .factory()
        .calculator_for(&patient.scoring_info, &donor.scoring_info);

    if verbose {
        eprintln!(
            "Patient: {} ({}), donor: {} ({})",
            patient.lookup_name,
            patient.category(),
            donor.lookup_name,
            donor.category()
        );
    }

    let grade = calculator.calculate_grade(&patient, &donor)?;

    match format {
        OutputFormat::Text => {
            println!("Locus:      {}", patient.locus);
            println!("Patient:    {} ({})", patient.lookup_name, patient.category());
            println!("Donor:      {} ({})", donor.lookup_name, donor.category());
            println!("Calculator: {}", calculator.kind());
            println!("Grade:      {grade}");
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "locus": patient.locus,
                "patient": patient.lookup_name,
                "donor": donor.lookup_name,
                "calculator": calculator.kind().to_string(),
                "grade": grade,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("locus\tpatient\tdonor\tcalculator\tgrade");
            println!(
                "{}\t{}\t{}\t{}\t{grade}",
                patient.locus,
                patient.lookup_name,
                donor.lookup_name,
                calculator.kind()
            );
        }
    }

    Ok(())
}
