//! Command-line interface for hla-grade.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **grade**: Grade a request document (orientations plus patient and donor)
//! - **compare**: Grade one patient phenotype against one or more donor phenotypes
//! - **typing**: Grade a single patient typing against a single donor typing
//! - **grades**: List the match grades in ranking order
//!
//! ## Usage
//!
//! ```text
//! # Grade a request
//! hla-grade grade request.json
//!
//! # Use DPB1 TCE groups for permissive mismatches
//! hla-grade grade request.json --tce-groups dpb1_tce.tsv.gz --hla-version 3.55.0
//!
//! # Grade several donors at selected loci, as JSON
//! hla-grade compare patient.json donor1.json donor2.json --loci A,B,DRB1 --format json
//!
//! # Show which calculator handles a pair of typings
//! hla-grade typing patient_a1.json donor_a1.json
//! ```

use std::path::Path;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::grading::service::{GradingConfig, GradingService};
use crate::tce::store::{CachingTceLookup, NoTceGroups, TceGroupLookup, TceGroupTable};

pub mod compare;
pub mod grade;
pub mod grades;
pub mod typing;

#[derive(Parser)]
#[command(name = "hla-grade")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Grade HLA matches between transplant patients and donors")]
#[command(
    long_about = "hla-grade compares the HLA typings of a patient and a donor locus by locus.\n\nFor each locus it grades both typed positions, evaluates the direct and cross orientations, and reports:\n- The best pair of match grades\n- Every orientation that achieves it\n- Permissive DPB1 mismatches when TCE groups are supplied"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Grade a request document
    Grade(grade::GradeArgs),

    /// Grade a patient against one or more donors
    Compare(compare::CompareArgs),

    /// Grade one patient typing against one donor typing
    Typing(typing::TypingArgs),

    /// List match grades, best first
    Grades,
}

/// Options shared by the commands that run the grading service
#[derive(clap::Args)]
pub struct GradingOptions {
    /// DPB1 TCE group table (TSV or CSV, optionally gzipped)
    #[arg(long)]
    pub tce_groups: Option<std::path::PathBuf>,

    /// HLA nomenclature version used for TCE group lookups
    #[arg(long)]
    pub hla_version: Option<String>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Build a grading service; without a TCE table no mismatch is permissive
pub(crate) fn build_service(
    tce_groups: Option<&Path>,
    hla_version: String,
) -> anyhow::Result<GradingService> {
    let lookup: Arc<dyn TceGroupLookup> = match tce_groups {
        Some(path) => Arc::new(CachingTceLookup::new(TceGroupTable::load_from_file(path)?)),
        None => Arc::new(NoTceGroups),
    };
    let config = GradingConfig {
        hla_nomenclature_version: hla_version,
    };
    Ok(GradingService::with_config(lookup, &config))
}
