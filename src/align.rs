//! Recovers which original item sits at each re-ranked position when the
//! prediction file only carries label values.
//!
//! Matching is greedy: each re-ranked position, in order, claims the lowest
//! unclaimed original index with an equal label value. With binary labels any
//! two items sharing a value are interchangeable, so a pair only means "an
//! item carrying this label", not necessarily the exact item.

use serde::Serialize;

use crate::error::EvalError;
use crate::metrics::{is_clicked, label_sum_at_k};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MismatchPolicy {
    /// Keep going and list the position in [`Alignment::unmatched`].
    Record,
    Fail,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AlignedPosition {
    pub new_position: usize,
    pub original_index: usize,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Alignment {
    pub pairs: Vec<AlignedPosition>,
    pub unmatched: Vec<usize>,
}

impl Alignment {
    pub fn original_index_at(&self, new_position: usize) -> Option<usize> {
        self.pairs
            .iter()
            .find(|pair| pair.new_position == new_position)
            .map(|pair| pair.original_index)
    }

    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty()
    }
}

pub fn align_by_label_value(
    original: &[f64],
    reranked: &[f64],
    policy: MismatchPolicy,
) -> Result<Alignment, EvalError> {
    if policy == MismatchPolicy::Fail && original.len() != reranked.len() {
        return Err(EvalError::LengthMismatch {
            original: original.len(),
            reranked: reranked.len(),
        });
    }

    let mut claimed = vec![false; original.len()];
    let mut alignment = Alignment {
        pairs: Vec::with_capacity(reranked.len()),
        unmatched: Vec::new(),
    };

    for (new_position, label) in reranked.iter().enumerate() {
        let matched = original
            .iter()
            .enumerate()
            .position(|(index, value)| !claimed[index] && value == label);

        match matched {
            Some(original_index) => {
                claimed[original_index] = true;
                alignment.pairs.push(AlignedPosition {
                    new_position,
                    original_index,
                });
            }
            None if policy == MismatchPolicy::Fail => {
                return Err(EvalError::UnmatchedLabel {
                    position: new_position,
                    label: *label,
                });
            }
            None => alignment.unmatched.push(new_position),
        }
    }

    Ok(alignment)
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "direction", rename_all = "snake_case")]
pub enum Movement {
    Up { from_position: usize },
    Down { from_position: usize },
    Unchanged,
}

impl Movement {
    pub fn annotation(self) -> String {
        match self {
            Self::Up { from_position } => format!("^ UP (from pos {from_position})"),
            Self::Down { from_position } => format!("v DOWN (from pos {from_position})"),
            Self::Unchanged => "= (same pos)".to_string(),
        }
    }
}

/// Only items whose original label is exactly the clicked value are classified.
pub fn classify_movement(original: &[f64], pair: AlignedPosition) -> Option<Movement> {
    let label = original.get(pair.original_index).copied()?;
    if !is_clicked(label) {
        return None;
    }

    let from_position = pair.original_index + 1;
    let movement = if pair.original_index == pair.new_position {
        Movement::Unchanged
    } else if pair.original_index > pair.new_position {
        Movement::Up { from_position }
    } else {
        Movement::Down { from_position }
    };
    Some(movement)
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct TopKDelta {
    pub k: usize,
    pub original: f64,
    pub reranked: f64,
}

impl TopKDelta {
    pub fn original_count(&self) -> i64 {
        self.original as i64
    }

    pub fn reranked_count(&self) -> i64 {
        self.reranked as i64
    }

    pub fn change(&self) -> i64 {
        (self.reranked - self.original) as i64
    }
}

pub fn top_k_delta(original: &[f64], reranked: &[f64], k: usize) -> TopKDelta {
    TopKDelta {
        k,
        original: label_sum_at_k(original, k),
        reranked: label_sum_at_k(reranked, k),
    }
}

pub fn top_k_deltas(original: &[f64], reranked: &[f64], cutoffs: &[usize]) -> Vec<TopKDelta> {
    cutoffs
        .iter()
        .map(|k| top_k_delta(original, reranked, *k))
        .collect()
}
