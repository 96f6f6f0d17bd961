use std::collections::HashMap;
use std::fmt;

/// Occurrence counts keyed by label, remembering the order keys were first seen.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    entries: Vec<(K, usize)>,
    index: HashMap<K, usize>,
}

impl<K> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K> FrequencyTable<K>
where
    K: Clone + Eq + std::hash::Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> + '_ {
        self.entries.iter().map(|(key, count)| (key, *count))
    }

    /// Entries by descending count. The sort is stable, so ties keep first-seen order.
    pub fn sorted_desc(&self) -> Vec<(&K, usize)> {
        let mut sorted: Vec<(&K, usize)> = self.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }

    pub fn top(&self, n: usize) -> Vec<(&K, usize)> {
        let mut sorted = self.sorted_desc();
        sorted.truncate(n);
        sorted
    }
}

impl<K> FromIterator<K> for FrequencyTable<K>
where
    K: Clone + Eq + std::hash::Hash,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = Self::new();
        for key in iter {
            table.increment(key);
        }
        table
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CashbackBucket {
    Percent,
    Point,
    None,
    Other,
}

impl CashbackBucket {
    /// Display order of the bucket summary.
    pub const ALL: [CashbackBucket; 4] = [
        CashbackBucket::Percent,
        CashbackBucket::Point,
        CashbackBucket::None,
        CashbackBucket::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CashbackBucket::Percent => "%還元",
            CashbackBucket::Point => "pt還元",
            CashbackBucket::None => "なし",
            CashbackBucket::Other => "その他",
        }
    }
}

impl fmt::Display for CashbackBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CashbackStats {
    pub percent: usize,
    pub point: usize,
    pub none: usize,
    pub other: usize,
    pub percent_values: FrequencyTable<String>,
    pub point_values: FrequencyTable<String>,
}

impl CashbackStats {
    pub fn count(&self, bucket: CashbackBucket) -> usize {
        match bucket {
            CashbackBucket::Percent => self.percent,
            CashbackBucket::Point => self.point,
            CashbackBucket::None => self.none,
            CashbackBucket::Other => self.other,
        }
    }

    pub fn total(&self) -> usize {
        self.percent + self.point + self.none + self.other
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountCheck {
    Match,
    Mismatch { declared: u64, actual: usize },
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub scraped_at: String,
    pub declared_total: u64,
    pub actual_total: usize,
    pub categories: FrequencyTable<String>,
    pub cashback: CashbackStats,
    pub errors: Vec<String>,
    pub count_check: CountCheck,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_desc_keeps_first_seen_order_on_ties() {
        let table: FrequencyTable<&str> = ["b", "a", "c", "a", "c"].into_iter().collect();
        let sorted: Vec<_> = table.sorted_desc().into_iter().map(|(k, c)| (*k, c)).collect();
        assert_eq!(sorted, vec![("a", 2), ("c", 2), ("b", 1)]);
    }

    #[test]
    fn top_truncates() {
        let table: FrequencyTable<u32> = (0..20).collect();
        assert_eq!(table.top(10).len(), 10);
        assert_eq!(table.total(), 20);
    }
}
