use std::io::Cursor;

use super::accumulate::{MetricAccumulator, accumulate_predictions};
use super::output::write_text_report;
use crate::error::EvalError;
use crate::metrics::MetricSpec;
use crate::model::{ComparisonReport, LineCounts, PredictionRecord, Trend};

fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}

fn default_metrics() -> Vec<MetricSpec> {
    vec![
        MetricSpec::precision(5),
        MetricSpec::precision(10),
        MetricSpec::average_precision(5),
        MetricSpec::average_precision(10),
        MetricSpec::average_precision(30),
    ]
}

fn record(original: &[f64], reranked: &[f64]) -> PredictionRecord {
    PredictionRecord {
        original: original.to_vec(),
        reranked: reranked.to_vec(),
    }
}

#[test]
fn averages_precision_across_records_in_percent() {
    let mut accumulator = MetricAccumulator::new(vec![MetricSpec::precision(5)], 1.0);
    accumulator.add(&record(&[1.0, 0.0, 0.0, 0.0, 0.0], &[1.0, 1.0, 0.0, 0.0, 0.0]));
    accumulator.add(&record(&[1.0, 1.0, 0.0, 0.0, 0.0], &[1.0, 1.0, 1.0, 0.0, 0.0]));

    let summary = accumulator.finish().expect("two records were scored");
    let row = &summary.metrics[0];
    assert_eq!(summary.record_count, 2);
    assert_eq!(row.metric, "p@5");
    assert!(approx_eq(row.original_pct, 30.0));
    assert!(approx_eq(row.reranked_pct, 50.0));
    assert!(approx_eq(row.delta_pct, 20.0));
    assert_eq!(row.trend, Trend::Improved);
    assert_eq!(summary.verdict, Trend::Improved);
}

#[test]
fn empty_dataset_is_a_no_data_error() {
    let accumulator = MetricAccumulator::new(default_metrics(), 1.0);
    assert_eq!(accumulator.finish().expect_err("nothing scored"), EvalError::NoData);
}

#[test]
fn rerank_scale_multiplies_only_the_reranked_side() {
    let labels = [1.0, 0.0, 1.0, 0.0, 0.0];
    let mut accumulator = MetricAccumulator::new(vec![MetricSpec::precision(5)], 1.5);
    accumulator.add(&record(&labels, &labels));

    let summary = accumulator.finish().expect("one record was scored");
    let row = &summary.metrics[0];
    assert!(approx_eq(row.original_pct, 40.0));
    assert!(approx_eq(row.reranked_pct, 60.0));
    assert!(approx_eq(summary.rerank_scale, 1.5));
}

#[test]
fn identical_rankings_are_unchanged_everywhere() {
    let labels = [0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0];
    let mut accumulator = MetricAccumulator::new(default_metrics(), 1.0);
    accumulator.add(&record(&labels, &labels));

    let summary = accumulator.finish().expect("one record was scored");
    assert!(summary.metrics.iter().all(|row| row.trend == Trend::Unchanged));
    assert_eq!(summary.verdict, Trend::Unchanged);
    assert_eq!(summary.best_metric, "p@5");
    assert_eq!(summary.best_delta_pct, 0.0);
}

#[test]
fn best_metric_is_largest_delta_with_earliest_tie_winning() {
    let mut accumulator = MetricAccumulator::new(
        vec![
            MetricSpec::precision(1),
            MetricSpec::precision(2),
            MetricSpec::average_precision(2),
        ],
        1.0,
    );
    accumulator.add(&record(&[0.0, 1.0], &[1.0, 0.0]));

    let summary = accumulator.finish().expect("one record was scored");
    // p@1: 0 -> 100, p@2: 50 -> 50, map@2: 50 -> 100
    assert!(approx_eq(summary.metrics[0].delta_pct, 100.0));
    assert!(approx_eq(summary.metrics[1].delta_pct, 0.0));
    assert!(approx_eq(summary.metrics[2].delta_pct, 50.0));
    assert_eq!(summary.best_metric, "p@1");
    assert!(approx_eq(summary.mean_delta_pct, 50.0));

    let mut tied = MetricAccumulator::new(
        vec![MetricSpec::precision(2), MetricSpec::precision(1)],
        1.0,
    );
    tied.add(&record(&[0.0, 0.0], &[0.0, 0.0]));
    let summary = tied.finish().expect("one record was scored");
    assert_eq!(summary.best_metric, "p@2");
}

#[test]
fn accumulate_skips_and_counts_bad_lines() {
    let input = concat!(
        "[1.0, 0.0, 0.0, 0.0, 0.0]\t[1.0, 1.0, 0.0, 0.0, 0.0]\n",
        "\n",
        "[1.0, 0.0]\n",
        "[1.0]\t[1.0]\t[1.0]\n",
        "[1.0, 0.0\t[0.0, 1.0]\n",
        "[1.0, 1.0, 0.0, 0.0, 0.0]\t[1.0, 1.0, 1.0, 0.0, 0.0]\n",
    );

    let mut accumulator = MetricAccumulator::new(vec![MetricSpec::precision(5)], 1.0);
    let counts = accumulate_predictions(Cursor::new(input), &mut accumulator)
        .expect("in-memory input is readable");

    assert_eq!(
        counts,
        LineCounts {
            lines_read: 6,
            records: 2,
            skipped_field_count: 2,
            skipped_malformed: 1,
        }
    );
    assert_eq!(counts.skipped(), 3);

    let summary = accumulator.finish().expect("two records were scored");
    assert!(approx_eq(summary.metrics[0].delta_pct, 20.0));
}

#[test]
fn accumulate_with_only_bad_lines_leaves_no_data() {
    let mut accumulator = MetricAccumulator::new(default_metrics(), 1.0);
    let counts = accumulate_predictions(Cursor::new("one field only\n"), &mut accumulator)
        .expect("in-memory input is readable");

    assert_eq!(counts.records, 0);
    assert_eq!(counts.skipped_field_count, 1);
    assert!(matches!(accumulator.finish(), Err(EvalError::NoData)));
}

#[test]
fn text_report_lists_rows_skips_and_scale_warning() {
    let mut accumulator = MetricAccumulator::new(vec![MetricSpec::precision(5)], 1.15);
    accumulator.add(&record(&[1.0, 0.0, 0.0, 0.0, 0.0], &[1.0, 0.0, 0.0, 0.0, 0.0]));
    let report = ComparisonReport {
        report_version: 1,
        generated_at: "2026-01-01T00:00:00Z".to_string(),
        predict_path: "predict.out".to_string(),
        predict_sha256: String::new(),
        lines: LineCounts {
            lines_read: 2,
            records: 1,
            skipped_field_count: 1,
            skipped_malformed: 0,
        },
        summary: accumulator.finish().expect("one record was scored"),
    };

    let mut buffer = Vec::new();
    write_text_report(&mut buffer, &report).expect("writing to a vec succeeds");
    let text = String::from_utf8(buffer).expect("report is utf-8");

    assert!(text.contains("Total samples: 1"));
    assert!(text.contains("Skipped lines: 1 (field count 1, malformed 0)"));
    assert!(text.contains("Re-ranked scale: 1.15"));
    assert!(text.contains("p@5              20.00%"));
    assert!(text.contains("[+]  +3.00%"));
    assert!(text.contains("Best improvement: p@5 (+3.00%)"));
}
