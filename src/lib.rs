pub mod aggregate;
pub mod args;
pub mod dataset;
pub mod error;
pub mod report;
pub mod stats;
pub mod utils;
pub mod validate;

pub use args::Args;
pub use dataset::{load_dataset, Campaign, Dataset};
pub use error::LoadError;
pub use report::{analyze_campaign_file, analyze_dataset, print_analysis_results};
pub use stats::{AnalysisResult, CashbackBucket, FrequencyTable};
