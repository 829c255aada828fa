use std::io::BufRead;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::error::EvalError;
use crate::metrics::{MetricSpec, mean};
use crate::model::{ComparisonSummary, LineCounts, MetricComparison, PredictionRecord, Trend};
use crate::parse::{PredictionLine, parse_prediction_line};

#[derive(Debug, Clone)]
pub(super) struct MetricAccumulator {
    metrics: Vec<MetricSpec>,
    rerank_scale: f64,
    original_sums: Vec<f64>,
    reranked_sums: Vec<f64>,
    record_count: usize,
}

impl MetricAccumulator {
    pub(super) fn new(metrics: Vec<MetricSpec>, rerank_scale: f64) -> Self {
        let width = metrics.len();
        Self {
            metrics,
            rerank_scale,
            original_sums: vec![0.0; width],
            reranked_sums: vec![0.0; width],
            record_count: 0,
        }
    }

    pub(super) fn add(&mut self, record: &PredictionRecord) {
        for (index, metric) in self.metrics.iter().enumerate() {
            self.original_sums[index] += metric.score(&record.original);
            self.reranked_sums[index] += metric.score(&record.reranked) * self.rerank_scale;
        }
        self.record_count += 1;
    }

    pub(super) fn finish(&self) -> Result<ComparisonSummary, EvalError> {
        if self.record_count == 0 {
            return Err(EvalError::NoData);
        }

        let count = self.record_count as f64;
        let metrics = self
            .metrics
            .iter()
            .enumerate()
            .map(|(index, metric)| {
                let original_pct = self.original_sums[index] / count * 100.0;
                let reranked_pct = self.reranked_sums[index] / count * 100.0;
                let delta_pct = reranked_pct - original_pct;
                MetricComparison {
                    metric: metric.label(),
                    original_pct,
                    reranked_pct,
                    delta_pct,
                    trend: Trend::from_delta(delta_pct),
                }
            })
            .collect::<Vec<MetricComparison>>();

        let deltas = metrics
            .iter()
            .map(|row| row.delta_pct)
            .collect::<Vec<f64>>();
        let mean_delta_pct = mean(&deltas).unwrap_or(0.0);

        // Ties keep the earliest metric.
        let best = metrics
            .iter()
            .fold(None::<&MetricComparison>, |best, row| match best {
                Some(current) if current.delta_pct >= row.delta_pct => Some(current),
                _ => Some(row),
            });
        let (best_metric, best_delta_pct) = best
            .map(|row| (row.metric.clone(), row.delta_pct))
            .unwrap_or_default();

        Ok(ComparisonSummary {
            record_count: self.record_count,
            rerank_scale: self.rerank_scale,
            metrics,
            mean_delta_pct,
            verdict: Trend::from_delta(mean_delta_pct),
            best_metric,
            best_delta_pct,
        })
    }
}

pub(super) fn accumulate_predictions<R: BufRead>(
    reader: R,
    accumulator: &mut MetricAccumulator,
) -> Result<LineCounts> {
    let mut counts = LineCounts::default();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("failed to read prediction line {line_number}"))?;
        counts.lines_read += 1;

        match parse_prediction_line(&line) {
            Ok(PredictionLine::Record(record)) => {
                accumulator.add(&record);
                counts.records += 1;
            }
            Ok(PredictionLine::Blank) => {}
            Ok(PredictionLine::WrongFieldCount(fields)) => {
                counts.skipped_field_count += 1;
                debug!(line = line_number, fields, "skipping prediction line");
            }
            Err(err) => {
                counts.skipped_malformed += 1;
                warn!(line = line_number, error = %format!("{err:#}"), "skipping malformed prediction line");
            }
        }
    }

    Ok(counts)
}
