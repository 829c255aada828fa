use std::io::Write;

use anyhow::Result;

use crate::model::{InspectionReport, ItemRef, SampleReport, Trend};

const RULE_WIDTH: usize = 80;

pub(super) fn write_text_report<W: Write>(
    output: &mut W,
    report: &InspectionReport,
) -> Result<()> {
    let heavy = "=".repeat(RULE_WIDTH);

    writeln!(output, "{heavy}")?;
    writeln!(output, "RE-RANKING INSPECTION")?;
    writeln!(output, "{heavy}")?;
    writeln!(output, "Test data: {}", report.test_path)?;
    writeln!(output, "Predictions: {}", report.predict_path)?;
    writeln!(output, "Showing {} samples", report.samples.len())?;

    for sample in &report.samples {
        write_sample(output, sample)?;
    }

    if report.skipped_samples > 0 {
        writeln!(output)?;
        writeln!(
            output,
            "Skipped samples without a usable prediction line: {}",
            report.skipped_samples
        )?;
    }
    writeln!(output)?;
    writeln!(output, "{heavy}")?;

    Ok(())
}

fn write_sample<W: Write>(output: &mut W, sample: &SampleReport) -> Result<()> {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    writeln!(output)?;
    writeln!(output, "{heavy}")?;
    writeln!(output, "SAMPLE {}", sample.sample_index + 1)?;
    writeln!(output, "{heavy}")?;
    writeln!(output, "User ID: {}", sample.user_id)?;
    writeln!(output, "   User Features: {}", sample.user_features)?;
    writeln!(output, "Total items: {}", sample.item_count)?;
    writeln!(output, "   User clicked: {} items", sample.clicked_count)?;
    writeln!(
        output,
        "   Clicked positions: {:?}",
        sample.clicked_positions
    )?;

    writeln!(output)?;
    writeln!(output, "{light}")?;
    writeln!(
        output,
        "ALL {} ITEMS - BEFORE RE-RANKING (Original Order)",
        sample.item_count
    )?;
    write_table_header(output, &light)?;
    for row in &sample.original_rows {
        writeln!(
            output,
            "{}",
            format_row(row.position, Some(&row.item), row.clicked).trim_end()
        )?;
    }

    writeln!(output)?;
    writeln!(output, "{light}")?;
    writeln!(
        output,
        "ALL {} ITEMS - AFTER RE-RANKING (Model's Order)",
        sample.reranked_rows.len()
    )?;
    write_table_header(output, &light)?;
    for row in &sample.reranked_rows {
        let mut line = format_row(row.position, row.item.as_ref(), row.clicked);
        if row.original_position.is_none() {
            line.push_str(" [unmatched]");
        } else if let Some(movement) = row.movement {
            line.push(' ');
            line.push_str(&movement.annotation());
        }
        writeln!(output, "{}", line.trim_end())?;
    }

    writeln!(output)?;
    writeln!(output, "{light}")?;
    writeln!(output, "IMPROVEMENT AT DIFFERENT POSITIONS")?;
    writeln!(output, "{light}")?;
    for delta in &sample.top_k {
        let change = delta.change();
        writeln!(
            output,
            "Top {:2}: Original={}, Re-ranked={}, Change={:+} {}",
            delta.k,
            delta.original_count(),
            delta.reranked_count(),
            change,
            Trend::from_delta(delta.reranked - delta.original).marker()
        )?;
    }

    let gained = sample.summary_delta.change();
    if gained > 0 {
        writeln!(output)?;
        writeln!(
            output,
            "Overall: re-ranking moved {gained} more relevant items into top {}",
            sample.summary_delta.k
        )?;
    }

    Ok(())
}

fn write_table_header<W: Write>(output: &mut W, light: &str) -> Result<()> {
    writeln!(output, "{light}")?;
    writeln!(
        output,
        "{:<5} {:<10} {:<10} {:<10} Status",
        "Pos", "Item ID", "Category", "Label"
    )?;
    writeln!(output, "{light}")?;
    Ok(())
}

fn format_row(position: usize, item: Option<&ItemRef>, clicked: bool) -> String {
    let (item_id, category) = item
        .map(|item| (item.item_id.as_str(), item.category.as_str()))
        .unwrap_or(("?", "?"));
    let (label, status) = if clicked {
        ("[CLICKED]", "[*]")
    } else {
        ("[Ignored]", "   ")
    };
    format!("{position:<5} {item_id:<10} {category:<10} {label:<10} {status}")
}
