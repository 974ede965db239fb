//! Top-N ranking of location summaries for the recommendations view.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Number of locations the recommendations chart displays.
pub const DEFAULT_TOP_N: usize = 5;

/// Metric name for ranking by the overall location score.
pub const SCORE_METRIC: &str = "score";

/// Per-location aggregate record: an overall score plus per-metric summary
/// values. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationSummary {
    pub location: String,
    pub score: Option<f64>,
    #[serde(default)]
    pub summary: HashMap<String, Option<f64>>,
}

impl LocationSummary {
    /// The value of the selected metric, if present.
    pub fn metric_value(&self, metric: &str) -> Option<f64> {
        if metric == SCORE_METRIC {
            self.score
        } else {
            self.summary.get(metric).copied().flatten()
        }
    }
}

/// One bar of the ranked chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEntry {
    pub name: String,
    pub value: f64,
}

/// Rank locations by the selected metric, descending, keeping the top `n`.
///
/// Records whose selected metric is absent are excluded (for `score`, a
/// record with no score is excluded). Non-finite values sort last. The
/// caller may reverse the result for bottom-to-top chart display.
pub fn top_n(records: &[LocationSummary], metric: &str, n: usize) -> Vec<RankedEntry> {
    let mut ranked: Vec<RankedEntry> = records
        .iter()
        .filter_map(|r| {
            r.metric_value(metric).map(|value| RankedEntry {
                name: r.location.clone(),
                value,
            })
        })
        .collect();

    ranked.sort_by(|a, b| match (a.value.is_finite(), b.value.is_finite()) {
        (true, true) => b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    });
    ranked.truncate(n);
    ranked
}
