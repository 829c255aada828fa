use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::model::{ItemRecord, ItemRef, PredictionRecord};

const PREDICTION_FIELD_COUNT: usize = 2;
const TEST_FIELD_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionLine {
    Record(PredictionRecord),
    Blank,
    WrongFieldCount(usize),
}

pub fn parse_prediction_line(line: &str) -> Result<PredictionLine> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(PredictionLine::Blank);
    }

    let fields = trimmed.split('\t').collect::<Vec<&str>>();
    if fields.len() != PREDICTION_FIELD_COUNT {
        return Ok(PredictionLine::WrongFieldCount(fields.len()));
    }

    let original = decode_labels(fields[0]).context("failed to decode original labels")?;
    let reranked = decode_labels(fields[1]).context("failed to decode re-ranked labels")?;

    Ok(PredictionLine::Record(PredictionRecord { original, reranked }))
}

pub fn parse_item_line(line: &str) -> Result<ItemRecord> {
    let fields = line.trim().split('|').collect::<Vec<&str>>();
    if fields.len() < TEST_FIELD_COUNT {
        bail!(
            "expected {TEST_FIELD_COUNT} '|'-separated fields, found {}",
            fields.len()
        );
    }

    let user_id = fields[0].to_string();
    let user_features: Value =
        serde_json::from_str(fields[1]).context("failed to decode user features")?;
    let raw_items: Vec<Vec<Value>> =
        serde_json::from_str(fields[2]).context("failed to decode item list")?;
    let _: Value = serde_json::from_str(fields[3]).context("failed to decode position features")?;
    let _: Value =
        serde_json::from_str(fields[4]).context("failed to decode interaction features")?;
    let labels = decode_labels(fields[5]).context("failed to decode labels")?;

    let mut items = Vec::with_capacity(raw_items.len());
    for (index, entry) in raw_items.iter().enumerate() {
        let (Some(item_id), Some(category)) = (entry.first(), entry.get(1)) else {
            bail!("item {index} needs at least an id and a category");
        };
        items.push(ItemRef {
            item_id: render_scalar(item_id),
            category: render_scalar(category),
        });
    }

    if items.len() != labels.len() {
        bail!(
            "item count {} does not match label count {}",
            items.len(),
            labels.len()
        );
    }

    Ok(ItemRecord {
        user_id,
        user_features,
        items,
        labels,
    })
}

fn decode_labels(raw: &str) -> Result<Vec<f64>> {
    let labels: Vec<f64> = serde_json::from_str(raw.trim())?;
    Ok(labels)
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
