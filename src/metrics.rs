pub const CLICKED_LABEL: f64 = 1.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MetricKind {
    Precision,
    AveragePrecision,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MetricSpec {
    pub kind: MetricKind,
    pub k: usize,
}

impl MetricSpec {
    pub fn precision(k: usize) -> Self {
        Self {
            kind: MetricKind::Precision,
            k,
        }
    }

    pub fn average_precision(k: usize) -> Self {
        Self {
            kind: MetricKind::AveragePrecision,
            k,
        }
    }

    pub fn label(self) -> String {
        match self.kind {
            MetricKind::Precision => format!("p@{}", self.k),
            MetricKind::AveragePrecision => format!("map@{}", self.k),
        }
    }

    pub fn score(self, labels: &[f64]) -> f64 {
        match self.kind {
            MetricKind::Precision => precision_at_k(labels, self.k),
            MetricKind::AveragePrecision => average_precision_at_k(labels, self.k),
        }
    }
}

pub fn is_relevant(label: f64) -> bool {
    label > 0.0
}

pub fn is_clicked(label: f64) -> bool {
    label == CLICKED_LABEL
}

pub fn precision_at_k(labels: &[f64], k: usize) -> f64 {
    let cutoff = labels.len().min(k);
    if cutoff == 0 {
        return 0.0;
    }

    let hit_count = labels
        .iter()
        .take(cutoff)
        .filter(|label| is_relevant(**label))
        .count();
    hit_count as f64 / cutoff as f64
}

pub fn average_precision_at_k(labels: &[f64], k: usize) -> f64 {
    let cutoff = labels.len().min(k);
    let mut hits = 0_usize;
    let mut precision_sum = 0.0_f64;

    for (index, label) in labels.iter().take(cutoff).enumerate() {
        if is_relevant(*label) {
            hits += 1;
            precision_sum += hits as f64 / (index + 1) as f64;
        }
    }

    if hits == 0 {
        return 0.0;
    }
    precision_sum / hits as f64
}

/// Sum of label values in the first `k` positions, without the relevance threshold.
pub fn label_sum_at_k(labels: &[f64], k: usize) -> f64 {
    labels.iter().take(k).sum()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    Some(values.iter().sum::<f64>() / values.len() as f64)
}
