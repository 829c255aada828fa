use anyhow::{Context, Result};
use tracing::warn;

use crate::align::{
    AlignedPosition, MismatchPolicy, align_by_label_value, classify_movement, top_k_delta,
    top_k_deltas,
};
use crate::error::EvalError;
use crate::metrics::{is_clicked, label_sum_at_k};
use crate::model::{ItemRecord, OriginalRow, PredictionRecord, RerankedRow, SampleReport};
use crate::parse::{PredictionLine, parse_item_line, parse_prediction_line};

#[derive(Debug, Clone)]
pub(super) struct SampleOptions<'a> {
    pub delta_cutoffs: &'a [usize],
    pub summary_k: usize,
    pub mismatch_policy: MismatchPolicy,
}

/// Pairs test lines with prediction lines by position. Samples whose prediction
/// line is blank, has the wrong field count, or fails to decode are skipped and
/// counted; a bad test line or a strict alignment failure aborts.
pub(super) fn collect_samples(
    test_lines: &[String],
    predict_lines: &[String],
    options: &SampleOptions<'_>,
) -> Result<(Vec<SampleReport>, usize)> {
    let mut samples = Vec::with_capacity(test_lines.len().min(predict_lines.len()));
    let mut skipped_samples = 0_usize;

    for (index, (test_line, predict_line)) in test_lines.iter().zip(predict_lines).enumerate() {
        let line_number = index + 1;
        let item = parse_item_line(test_line)
            .with_context(|| format!("failed to parse test line {line_number}"))?;

        let prediction = match parse_prediction_line(predict_line) {
            Ok(PredictionLine::Record(prediction)) => prediction,
            Ok(PredictionLine::Blank | PredictionLine::WrongFieldCount(_)) => {
                skipped_samples += 1;
                warn!(sample = line_number, "skipping sample without a two-field prediction line");
                continue;
            }
            Err(err) => {
                skipped_samples += 1;
                warn!(sample = line_number, error = %format!("{err:#}"), "skipping sample with malformed prediction line");
                continue;
            }
        };

        if prediction.original != item.labels {
            warn!(
                sample = line_number,
                "prediction original labels differ from test-data labels; aligning against test-data labels"
            );
        }

        let sample = build_sample_report(index, &item, &prediction, options)
            .with_context(|| format!("failed to align sample {line_number}"))?;
        if !sample.alignment.is_complete() {
            warn!(
                sample = line_number,
                unmatched = ?sample.alignment.unmatched,
                "partial alignment: some re-ranked labels have no original match"
            );
        }
        samples.push(sample);
    }

    Ok((samples, skipped_samples))
}

/// Original positions come from the test-data labels; the prediction line only
/// contributes the re-ranked order.
pub(super) fn build_sample_report(
    sample_index: usize,
    item: &ItemRecord,
    prediction: &PredictionRecord,
    options: &SampleOptions<'_>,
) -> Result<SampleReport, EvalError> {
    let original = &item.labels;
    let reranked = &prediction.reranked;
    let alignment = align_by_label_value(original, reranked, options.mismatch_policy)?;

    let original_rows = item
        .items
        .iter()
        .zip(original)
        .enumerate()
        .map(|(index, (item_ref, label))| OriginalRow {
            position: index + 1,
            item: item_ref.clone(),
            label: *label,
            clicked: is_clicked(*label),
        })
        .collect::<Vec<OriginalRow>>();

    let reranked_rows = reranked
        .iter()
        .enumerate()
        .map(|(new_position, label)| {
            let original_index = alignment.original_index_at(new_position);
            RerankedRow {
                position: new_position + 1,
                original_position: original_index.map(|index| index + 1),
                item: original_index.and_then(|index| item.items.get(index).cloned()),
                label: *label,
                clicked: is_clicked(*label),
                movement: original_index.and_then(|original_index| {
                    classify_movement(
                        original,
                        AlignedPosition {
                            new_position,
                            original_index,
                        },
                    )
                }),
            }
        })
        .collect::<Vec<RerankedRow>>();

    let clicked_positions = original
        .iter()
        .enumerate()
        .filter(|(_, label)| is_clicked(**label))
        .map(|(index, _)| index)
        .collect::<Vec<usize>>();

    Ok(SampleReport {
        sample_index,
        user_id: item.user_id.clone(),
        user_features: item.user_features.clone(),
        item_count: original.len(),
        clicked_count: label_sum_at_k(original, original.len()) as i64,
        clicked_positions,
        original_rows,
        reranked_rows,
        alignment,
        top_k: top_k_deltas(original, reranked, options.delta_cutoffs),
        summary_delta: top_k_delta(original, reranked, options.summary_k),
    })
}
