use crate::cli::OutputFormat;
use crate::core::types::MATCH_GRADE_RANKING;

pub fn run(format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Match Grades (best first)");
            println!("{}", "=".repeat(60));
            for grade in MATCH_GRADE_RANKING {
                let branch = if grade.is_null_grade() { "null" } else { "" };
                println!("  {:>2}. {:<20} {branch}", grade.rank(), grade.to_string());
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = MATCH_GRADE_RANKING
                .iter()
                .map(|grade| {
                    serde_json::json!({
                        "grade": grade,
                        "rank": grade.rank(),
                        "null": grade.is_null_grade(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("rank\tgrade\tnull");
            for grade in MATCH_GRADE_RANKING {
                println!("{}\t{grade}\t{}", grade.rank(), grade.is_null_grade());
            }
        }
    }

    Ok(())
}
