use serde_json::Value;
use std::time::Instant;
use tracing::info;
use url::Url;

use crate::dataset::{is_present, Campaign, CampaignId, Dataset, RequiredField};
use crate::stats::{CountCheck, FrequencyTable};

pub const CAMPAIGN_URL_PREFIX: &str = "https://www.chobirich.com/ad_details/";
const EXPECTED_SCHEME: &str = "https";
const EXPECTED_HOST: &str = "www.chobirich.com";
const EXPECTED_PATH_PREFIX: &str = "/ad_details/";

/// Runs every record-level check and returns findings in discovery order:
/// required fields, then URL format, then duplicate ids.
pub fn validate_campaigns(campaigns: &[Campaign]) -> Vec<String> {
    let start_time = Instant::now();
    let mut errors = Vec::new();

    let missing = check_required_fields(campaigns);
    let malformed = check_url_format(campaigns);
    let duplicates = check_duplicate_ids(campaigns);

    info!(
        action = "complete",
        component = "validation",
        missing_fields = missing.len(),
        malformed_urls = malformed.len(),
        duplicate_ids = duplicates.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Validation completed"
    );

    errors.extend(missing);
    errors.extend(malformed);
    errors.extend(duplicates);
    errors
}

pub fn check_required_fields(campaigns: &[Campaign]) -> Vec<String> {
    let mut errors = Vec::new();
    for (i, campaign) in campaigns.iter().enumerate() {
        for field in RequiredField::ALL {
            if !campaign.has_field(field) {
                errors.push(format!("案件 {}: {}フィールドが欠落または空", i + 1, field));
            }
        }
    }
    errors
}

pub fn check_url_format(campaigns: &[Campaign]) -> Vec<String> {
    let mut errors = Vec::new();
    for (i, campaign) in campaigns.iter().enumerate() {
        let url = campaign.url.as_ref();
        if !is_present(url) {
            continue;
        }
        let reason = match url {
            Some(Value::String(raw)) => url_malformation(raw),
            _ => Some(UrlMalformation::Unparseable),
        };
        if let Some(reason) = reason {
            errors.push(format!(
                "案件 {} ({}): 不正なURLフォーマット ({})",
                i + 1,
                campaign.display_name(),
                reason
            ));
        }
    }
    errors
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlMalformation {
    Unparseable,
    Scheme(String),
    Host(String),
    Path(String),
    NonCanonical,
}

impl std::fmt::Display for UrlMalformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrlMalformation::Unparseable => write!(f, "URLとして解析できません"),
            UrlMalformation::Scheme(scheme) => write!(f, "スキーム不一致: {}", scheme),
            UrlMalformation::Host(host) => write!(f, "ホスト不一致: {}", host),
            UrlMalformation::Path(path) => write!(f, "パス不一致: {}", path),
            UrlMalformation::NonCanonical => write!(f, "非正規の表記"),
        }
    }
}

/// Returns `None` when `raw` starts with the campaign URL prefix, otherwise
/// the first component that disagrees with it.
pub fn url_malformation(raw: &str) -> Option<UrlMalformation> {
    if raw.starts_with(CAMPAIGN_URL_PREFIX) {
        return None;
    }

    let Ok(parsed) = Url::parse(raw) else {
        return Some(UrlMalformation::Unparseable);
    };

    if parsed.scheme() != EXPECTED_SCHEME {
        return Some(UrlMalformation::Scheme(parsed.scheme().to_string()));
    }
    let host = parsed.host_str().unwrap_or_default();
    if host != EXPECTED_HOST {
        return Some(UrlMalformation::Host(host.to_string()));
    }
    if !parsed.path().starts_with(EXPECTED_PATH_PREFIX) {
        return Some(UrlMalformation::Path(parsed.path().to_string()));
    }
    Some(UrlMalformation::NonCanonical)
}

/// One error per id seen more than once. Campaigns without an id are skipped.
pub fn check_duplicate_ids(campaigns: &[Campaign]) -> Vec<String> {
    let id_counts: FrequencyTable<CampaignId> =
        campaigns.iter().filter_map(Campaign::campaign_id).collect();

    id_counts
        .iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, count)| format!("ID {}: {}回重複", id, count))
        .collect()
}

pub fn check_counts(dataset: &Dataset) -> CountCheck {
    if dataset.counts_match() {
        CountCheck::Match
    } else {
        CountCheck::Mismatch {
            declared: dataset.total_campaigns,
            actual: dataset.campaigns.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn campaigns(values: Value) -> Vec<Campaign> {
        serde_json::from_value(values).unwrap()
    }

    fn complete(id: &str) -> Value {
        json!({
            "id": id,
            "name": format!("案件{}", id),
            "cashback": "1%",
            "category": "ショッピング",
            "url": format!("{}{}", CAMPAIGN_URL_PREFIX, id),
        })
    }

    #[test]
    fn complete_campaigns_produce_no_errors() {
        let list = campaigns(json!([complete("1"), complete("2")]));
        assert!(validate_campaigns(&list).is_empty());
    }

    #[test]
    fn missing_fields_are_reported_per_field_in_order() {
        let list = campaigns(json!([
            complete("1"),
            { "id": "2", "name": null, "cashback": "", "url": CAMPAIGN_URL_PREFIX }
        ]));
        assert_eq!(
            check_required_fields(&list),
            vec![
                "案件 2: nameフィールドが欠落または空",
                "案件 2: cashbackフィールドが欠落または空",
                "案件 2: categoryフィールドが欠落または空",
            ]
        );
    }

    #[test]
    fn url_prefix_rules() {
        assert_eq!(url_malformation("https://www.chobirich.com/ad_details/123"), None);
        assert_eq!(
            url_malformation("http://chobirich.com/ad_details/123"),
            Some(UrlMalformation::Scheme("http".to_string()))
        );
        assert_eq!(
            url_malformation("https://chobirich.com/ad_details/123"),
            Some(UrlMalformation::Host("chobirich.com".to_string()))
        );
        assert_eq!(
            url_malformation("https://www.chobirich.com/shopping/shop/101"),
            Some(UrlMalformation::Path("/shopping/shop/101".to_string()))
        );
        assert_eq!(
            url_malformation("/ad_details/123"),
            Some(UrlMalformation::Unparseable)
        );
        assert_eq!(
            url_malformation("HTTPS://www.chobirich.com/ad_details/1"),
            Some(UrlMalformation::NonCanonical)
        );
        assert_eq!(
            url_malformation(" https://www.chobirich.com/ad_details/1"),
            Some(UrlMalformation::NonCanonical)
        );
    }

    #[test]
    fn empty_url_is_only_a_missing_field() {
        let mut record = complete("1");
        record["url"] = json!("");
        let list = campaigns(json!([record]));
        assert!(check_url_format(&list).is_empty());
        assert_eq!(
            validate_campaigns(&list),
            vec!["案件 1: urlフィールドが欠落または空"]
        );
    }

    #[test]
    fn malformed_url_names_the_campaign() {
        let list = campaigns(json!([
            { "url": "http://chobirich.com/ad_details/9" },
            { "name": "旅行予約", "url": "https://example.com/x" }
        ]));
        assert_eq!(
            check_url_format(&list),
            vec![
                "案件 1 (不明): 不正なURLフォーマット (スキーム不一致: http)",
                "案件 2 (旅行予約): 不正なURLフォーマット (ホスト不一致: example.com)",
            ]
        );
    }

    #[test]
    fn duplicate_ids_reported_once_with_count() {
        let list = campaigns(json!([{ "id": "A" }, { "id": "A" }, { "id": "B" }]));
        assert_eq!(check_duplicate_ids(&list), vec!["ID A: 2回重複"]);
    }

    #[test]
    fn missing_ids_are_not_duplicates() {
        let list = campaigns(json!([{}, { "id": null }, { "id": "" }, { "id": "" }]));
        assert!(check_duplicate_ids(&list).is_empty());
        assert_eq!(
            check_required_fields(&list)
                .iter()
                .filter(|e| e.contains("idフィールド"))
                .count(),
            4
        );
    }

    #[test]
    fn zero_and_false_ids_are_not_duplicates() {
        let list = campaigns(json!([{ "id": 0 }, { "id": 0 }, { "id": false }, { "id": false }]));
        assert!(check_duplicate_ids(&list).is_empty());
        assert!(!check_required_fields(&list)
            .iter()
            .any(|e| e.contains("idフィールド")));
    }

    #[test]
    fn checks_run_in_fixed_order() {
        let list = campaigns(json!([
            { "id": "A", "url": "http://x.test/" },
            { "id": "A" }
        ]));
        let errors = validate_campaigns(&list);
        let url_pos = errors.iter().position(|e| e.contains("不正なURL")).unwrap();
        let dup_pos = errors.iter().position(|e| e.starts_with("ID A")).unwrap();
        let last_missing = errors.iter().rposition(|e| e.contains("欠落")).unwrap();
        assert!(last_missing < url_pos);
        assert!(url_pos < dup_pos);
    }

    fn dataset(total: u64, len: usize) -> Dataset {
        Dataset {
            scraped_at: "2025-01-01T00:00:00Z".to_string(),
            total_campaigns: total,
            campaigns: vec![Campaign::default(); len],
        }
    }

    #[test]
    fn count_reconciliation() {
        assert_eq!(check_counts(&dataset(3, 3)), CountCheck::Match);
        assert_eq!(
            check_counts(&dataset(3, 2)),
            CountCheck::Mismatch { declared: 3, actual: 2 }
        );
    }
}
