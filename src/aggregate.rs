use regex::Regex;
use std::time::Instant;
use tracing::info;

use crate::dataset::Campaign;
use crate::stats::{CashbackBucket, CashbackStats, FrequencyTable};

/// Cashback rules, checked in order. Anything unmatched is `Other`.
const CASHBACK_RULES: [(CashbackBucket, &str); 3] = [
    (CashbackBucket::None, r"^なし$"),
    (CashbackBucket::Percent, r"%"),
    (CashbackBucket::Point, r"pt|ポイント"),
];

pub struct CashbackClassifier {
    rules: Vec<(CashbackBucket, Regex)>,
}

impl CashbackClassifier {
    pub fn new() -> Result<Self, regex::Error> {
        let rules = CASHBACK_RULES
            .iter()
            .map(|&(bucket, pattern)| Ok((bucket, Regex::new(pattern)?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    pub fn classify(&self, cashback: &str) -> CashbackBucket {
        self.rules
            .iter()
            .find(|(_, rule)| rule.is_match(cashback))
            .map_or(CashbackBucket::Other, |&(bucket, _)| bucket)
    }
}

pub fn count_categories(campaigns: &[Campaign]) -> FrequencyTable<String> {
    let start_time = Instant::now();
    let table: FrequencyTable<String> = campaigns
        .iter()
        .map(|c| c.category_label().into_owned())
        .collect();

    info!(
        action = "complete",
        component = "category_count",
        category_count = table.len(),
        campaign_count = table.total(),
        duration_ms = start_time.elapsed().as_millis(),
        "Category counts computed"
    );
    table
}

pub fn summarize_cashback(
    campaigns: &[Campaign],
    classifier: &CashbackClassifier,
) -> CashbackStats {
    let start_time = Instant::now();
    let mut stats = CashbackStats::default();

    for campaign in campaigns {
        let cashback = campaign.cashback_text();
        match classifier.classify(cashback) {
            CashbackBucket::None => stats.none += 1,
            CashbackBucket::Percent => {
                stats.percent += 1;
                stats.percent_values.increment(cashback.to_string());
            }
            CashbackBucket::Point => {
                stats.point += 1;
                stats.point_values.increment(cashback.to_string());
            }
            CashbackBucket::Other => stats.other += 1,
        }
    }

    info!(
        action = "complete",
        component = "cashback_classify",
        percent = stats.percent,
        point = stats.point,
        none = stats.none,
        other = stats.other,
        campaign_count = stats.total(),
        duration_ms = start_time.elapsed().as_millis(),
        "Cashback types classified"
    );
    stats
}
