use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::error::LoadError;

/// Label substituted for a missing category or campaign name.
pub const UNKNOWN_LABEL: &str = "不明";

#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub scraped_at: String,
    pub total_campaigns: u64,
    pub campaigns: Vec<Campaign>,
}

/// One scraped campaign. Fields stay loosely typed because the scraper may
/// leave any of them out, null them, or emit numbers where text is expected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Campaign {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub cashback: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default)]
    pub url: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Id,
    Name,
    Cashback,
    Category,
    Url,
}

impl RequiredField {
    pub const ALL: [RequiredField; 5] = [
        RequiredField::Id,
        RequiredField::Name,
        RequiredField::Cashback,
        RequiredField::Category,
        RequiredField::Url,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RequiredField::Id => "id",
            RequiredField::Name => "name",
            RequiredField::Cashback => "cashback",
            RequiredField::Category => "category",
            RequiredField::Url => "url",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hashable form of a campaign id. Text and numeric ids never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CampaignId {
    Text(String),
    Number(String),
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CampaignId::Text(s) | CampaignId::Number(s) => f.write_str(s),
        }
    }
}

/// A value counts as present unless it is null or the empty string.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Display text of a present value; strings verbatim, anything else as JSON.
pub fn field_text(value: Option<&Value>) -> Option<Cow<'_, str>> {
    if !is_present(value) {
        return None;
    }
    match value? {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        other => Some(Cow::Owned(other.to_string())),
    }
}

impl Campaign {
    pub fn field(&self, field: RequiredField) -> Option<&Value> {
        match field {
            RequiredField::Id => self.id.as_ref(),
            RequiredField::Name => self.name.as_ref(),
            RequiredField::Cashback => self.cashback.as_ref(),
            RequiredField::Category => self.category.as_ref(),
            RequiredField::Url => self.url.as_ref(),
        }
    }

    pub fn has_field(&self, field: RequiredField) -> bool {
        is_present(self.field(field))
    }

    pub fn category_label(&self) -> Cow<'_, str> {
        field_text(self.category.as_ref()).unwrap_or(Cow::Borrowed(UNKNOWN_LABEL))
    }

    pub fn display_name(&self) -> Cow<'_, str> {
        field_text(self.name.as_ref()).unwrap_or(Cow::Borrowed(UNKNOWN_LABEL))
    }

    /// Cashback text used for classification; non-string values yield "".
    pub fn cashback_text(&self) -> &str {
        match &self.cashback {
            Some(Value::String(s)) => s.as_str(),
            _ => "",
        }
    }

    /// Id used for duplicate detection. Falsy ids (null, "", zero, false)
    /// are not candidates even though the required-field check accepts zero.
    pub fn campaign_id(&self) -> Option<CampaignId> {
        match self.id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(CampaignId::Text(s.clone())),
            Value::Number(n) if n.as_f64() != Some(0.0) => {
                Some(CampaignId::Number(n.to_string()))
            }
            Value::Null | Value::String(_) | Value::Number(_) | Value::Bool(false) => None,
            other => Some(CampaignId::Text(other.to_string())),
        }
    }
}

impl Dataset {
    pub fn counts_match(&self) -> bool {
        usize::try_from(self.total_campaigns).map_or(false, |n| n == self.campaigns.len())
    }
}

pub fn parse_dataset(content: &str, path: &Path) -> Result<Dataset, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::DataFormat {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let start_time = Instant::now();
    info!(action = "start", component = "dataset_load", file_path = ?path, "Loading campaign dataset");

    let content = fs::read_to_string(path).map_err(|source| LoadError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = parse_dataset(&content, path)?;

    info!(
        action = "complete",
        component = "dataset_load",
        campaign_count = dataset.campaigns.len(),
        declared_total = dataset.total_campaigns,
        duration_ms = start_time.elapsed().as_millis(),
        "Campaign dataset loaded"
    );
    Ok(dataset)
}
