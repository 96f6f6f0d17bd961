use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "chobirich_all_categories_data.json";

#[derive(Parser, Debug)]
#[command(
    name = "campaign-report",
    about = "Summarize and validate a scraped campaign dataset",
    version,
    long_about = None
)]
pub struct Args {
    /// Path to the scraped campaign JSON document
    #[arg(short, long, default_value = DEFAULT_DATA_FILE)]
    pub file: PathBuf,

    /// Number of distinct cashback values to display per reward type
    #[arg(short, long, default_value_t = 10)]
    pub top: usize,

    /// Number of validation errors to display
    #[arg(short = 'e', long, default_value_t = 10)]
    pub max_errors: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_DATA_FILE),
            top: 10,
            max_errors: 10,
            verbose: false,
        }
    }
}
