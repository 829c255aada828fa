use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::CompareArgs;
use crate::config::ComparisonConfig;
use crate::model::ComparisonReport;
use crate::util::{now_utc_string, open_reader, sha256_file, write_json_pretty, write_json_stdout};

use super::accumulate::{MetricAccumulator, accumulate_predictions};
use super::output::write_text_report;

const REPORT_VERSION: u32 = 1;

pub fn run(args: CompareArgs) -> Result<()> {
    let config = ComparisonConfig::from_args(args)?;
    let predict_path = config.predict_path.display().to_string();

    info!(
        path = %predict_path,
        metrics = config.metrics.len(),
        rerank_scale = config.rerank_scale,
        scaled = config.is_scaled(),
        "comparison requested"
    );

    let reader = open_reader(&config.predict_path)?;
    let mut accumulator = MetricAccumulator::new(config.metrics.clone(), config.rerank_scale);
    let lines = accumulate_predictions(reader, &mut accumulator)
        .with_context(|| format!("failed to read {predict_path}"))?;

    info!(
        lines = lines.lines_read,
        records = lines.records,
        skipped = lines.skipped(),
        "scored prediction records"
    );
    if lines.skipped() > 0 {
        warn!(
            skipped_field_count = lines.skipped_field_count,
            skipped_malformed = lines.skipped_malformed,
            "some prediction lines were skipped"
        );
    }

    let summary = accumulator
        .finish()
        .with_context(|| format!("cannot compare rankings from {predict_path}"))?;

    let report = ComparisonReport {
        report_version: REPORT_VERSION,
        generated_at: now_utc_string(),
        predict_sha256: sha256_file(&config.predict_path)?,
        predict_path,
        lines,
        summary,
    };

    if let Some(report_path) = &config.report_path {
        write_json_pretty(report_path, &report)?;
        info!(path = %report_path.display(), "wrote comparison report");
    }

    if config.json {
        write_json_stdout(&report)?;
    } else {
        let mut output = io::BufWriter::new(io::stdout().lock());
        write_text_report(&mut output, &report)?;
        output.flush()?;
    }

    info!(
        best_metric = %report.summary.best_metric,
        mean_delta_pct = report.summary.mean_delta_pct,
        "comparison completed"
    );
    Ok(())
}
