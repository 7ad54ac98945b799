use clap::Parser;
use tracing_subscriber::EnvFilter;

use hla_grading::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("hla_grading=debug,info")
    } else {
        EnvFilter::new("hla_grading=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Grade(args) => {
            cli::grade::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Compare(args) => {
            cli::compare::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Typing(args) => {
            cli::typing::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Grades => {
            cli::grades::run(cli.format)?;
        }
    }

    Ok(())
}
