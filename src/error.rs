use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("no valid prediction records to average")]
    NoData,

    #[error("re-ranked position {position} (label {label}) has no unclaimed original match")]
    UnmatchedLabel { position: usize, label: f64 },

    #[error("label sequences differ in length: original {original} vs re-ranked {reranked}")]
    LengthMismatch { original: usize, reranked: usize },
}
