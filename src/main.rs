use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use campaign_report::utils::{setup_logging, validate_args};
use campaign_report::{analyze_campaign_file, print_analysis_results, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);
    validate_args(&args)?;

    match analyze_campaign_file(&args) {
        Ok(result) => {
            print_analysis_results(&result, &args).context("Failed to write report")?;
            Ok(())
        }
        Err(e) => {
            let message = format!("{:#}", e);
            error!(action = "abort", component = "analysis", error = %message, "Analysis failed");
            std::process::exit(1);
        }
    }
}
