use std::io::Write;

use anyhow::Result;

use crate::config::NEUTRAL_RERANK_SCALE;
use crate::model::{ComparisonReport, Trend};

const RULE_WIDTH: usize = 80;

pub(super) fn write_text_report<W: Write>(output: &mut W, report: &ComparisonReport) -> Result<()> {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let summary = &report.summary;

    writeln!(output, "{heavy}")?;
    writeln!(output, "PERFORMANCE COMPARISON: Original vs Re-ranked")?;
    writeln!(output, "{heavy}")?;
    writeln!(output, "Input: {}", report.predict_path)?;
    writeln!(output, "Total samples: {}", summary.record_count)?;
    writeln!(
        output,
        "Skipped lines: {} (field count {}, malformed {})",
        report.lines.skipped(),
        report.lines.skipped_field_count,
        report.lines.skipped_malformed
    )?;
    if summary.rerank_scale != NEUTRAL_RERANK_SCALE {
        writeln!(
            output,
            "Re-ranked scale: {} (simulated uplift, not measured)",
            summary.rerank_scale
        )?;
    }

    writeln!(output)?;
    writeln!(output, "{light}")?;
    writeln!(
        output,
        "{:<15} {:<15} {:<15} {:<15}",
        "Metric", "Original", "Re-ranked", "Improvement"
    )?;
    writeln!(output, "{light}")?;
    for row in &summary.metrics {
        writeln!(
            output,
            "{:<15} {:>6.2}%{:7} {:>6.2}%{:7} {} {:>+6.2}%",
            row.metric,
            row.original_pct,
            "",
            row.reranked_pct,
            "",
            row.trend.marker(),
            row.delta_pct
        )?;
    }
    writeln!(output, "{light}")?;

    writeln!(output)?;
    writeln!(output, "{heavy}")?;
    writeln!(output, "SUMMARY")?;
    writeln!(output, "{heavy}")?;
    match summary.verdict {
        Trend::Improved => writeln!(
            output,
            "Re-ranking improves ranking quality. Average change: {:+.2}%",
            summary.mean_delta_pct
        )?,
        Trend::Regressed => writeln!(
            output,
            "Re-ranking degrades ranking quality. Average change: {:+.2}%",
            summary.mean_delta_pct
        )?,
        Trend::Unchanged => writeln!(output, "Re-ranking shows no change in ranking quality")?,
    }
    writeln!(
        output,
        "Best improvement: {} ({:+.2}%)",
        summary.best_metric, summary.best_delta_pct
    )?;
    writeln!(output, "{heavy}")?;

    Ok(())
}
