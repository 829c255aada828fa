use serde::Serialize;
use serde_json::Value;

use crate::align::{Alignment, Movement, TopKDelta};

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub original: Vec<f64>,
    pub reranked: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRef {
    pub item_id: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    pub user_id: String,
    pub user_features: Value,
    pub items: Vec<ItemRef>,
    pub labels: Vec<f64>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improved,
    Regressed,
    Unchanged,
}

impl Trend {
    pub fn from_delta(delta: f64) -> Self {
        if delta > 0.0 {
            Self::Improved
        } else if delta < 0.0 {
            Self::Regressed
        } else {
            Self::Unchanged
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Self::Improved => "[+]",
            Self::Regressed => "[-]",
            Self::Unchanged => "[=]",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineCounts {
    pub lines_read: usize,
    pub records: usize,
    pub skipped_field_count: usize,
    pub skipped_malformed: usize,
}

impl LineCounts {
    pub fn skipped(&self) -> usize {
        self.skipped_field_count + self.skipped_malformed
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricComparison {
    pub metric: String,
    pub original_pct: f64,
    pub reranked_pct: f64,
    pub delta_pct: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSummary {
    pub record_count: usize,
    pub rerank_scale: f64,
    pub metrics: Vec<MetricComparison>,
    pub mean_delta_pct: f64,
    pub verdict: Trend,
    pub best_metric: String,
    pub best_delta_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub report_version: u32,
    pub generated_at: String,
    pub predict_path: String,
    pub predict_sha256: String,
    pub lines: LineCounts,
    pub summary: ComparisonSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct OriginalRow {
    pub position: usize,
    pub item: ItemRef,
    pub label: f64,
    pub clicked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RerankedRow {
    pub position: usize,
    pub original_position: Option<usize>,
    pub item: Option<ItemRef>,
    pub label: f64,
    pub clicked: bool,
    pub movement: Option<Movement>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SampleReport {
    pub sample_index: usize,
    pub user_id: String,
    pub user_features: Value,
    pub item_count: usize,
    pub clicked_count: i64,
    pub clicked_positions: Vec<usize>,
    pub original_rows: Vec<OriginalRow>,
    pub reranked_rows: Vec<RerankedRow>,
    pub alignment: Alignment,
    pub top_k: Vec<TopKDelta>,
    pub summary_delta: TopKDelta,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectionReport {
    pub report_version: u32,
    pub generated_at: String,
    pub test_path: String,
    pub predict_path: String,
    pub skipped_samples: usize,
    pub samples: Vec<SampleReport>,
}
