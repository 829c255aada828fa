use std::path::PathBuf;

use anyhow::{Result, bail};
use tracing::warn;

use crate::align::MismatchPolicy;
use crate::cli::{CompareArgs, InspectArgs};
use crate::metrics::MetricSpec;

pub const NEUTRAL_RERANK_SCALE: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct ComparisonConfig {
    pub predict_path: PathBuf,
    pub metrics: Vec<MetricSpec>,
    pub rerank_scale: f64,
    pub report_path: Option<PathBuf>,
    pub json: bool,
}

impl ComparisonConfig {
    pub fn from_args(args: CompareArgs) -> Result<Self> {
        let precision_cutoffs = normalize_cutoffs(&args.precision_cutoffs, "--precision-k")?;
        let ap_cutoffs = normalize_cutoffs(&args.ap_cutoffs, "--ap-k")?;

        let mut metrics = Vec::with_capacity(precision_cutoffs.len() + ap_cutoffs.len());
        metrics.extend(precision_cutoffs.into_iter().map(MetricSpec::precision));
        metrics.extend(ap_cutoffs.into_iter().map(MetricSpec::average_precision));

        let rerank_scale = validate_rerank_scale(args.rerank_scale)?;

        Ok(Self {
            predict_path: args.predict_path,
            metrics,
            rerank_scale,
            report_path: args.report_path,
            json: args.json,
        })
    }

    pub fn is_scaled(&self) -> bool {
        self.rerank_scale != NEUTRAL_RERANK_SCALE
    }
}

#[derive(Debug, Clone)]
pub struct InspectionConfig {
    pub test_path: PathBuf,
    pub predict_path: PathBuf,
    pub sample_limit: usize,
    pub delta_cutoffs: Vec<usize>,
    pub summary_k: usize,
    pub mismatch_policy: MismatchPolicy,
    pub json: bool,
}

impl InspectionConfig {
    pub fn from_args(args: InspectArgs) -> Result<Self> {
        if args.samples == 0 {
            bail!("--samples must be at least 1");
        }
        if args.summary_k == 0 {
            bail!("--summary-k must be at least 1");
        }

        let mismatch_policy = if args.strict_alignment {
            MismatchPolicy::Fail
        } else {
            MismatchPolicy::Record
        };

        Ok(Self {
            test_path: args.test_path,
            predict_path: args.predict_path,
            sample_limit: args.samples,
            delta_cutoffs: normalize_cutoffs(&args.delta_cutoffs, "--delta-k")?,
            summary_k: args.summary_k,
            mismatch_policy,
            json: args.json,
        })
    }
}

fn normalize_cutoffs(values: &[usize], flag: &str) -> Result<Vec<usize>> {
    if values.is_empty() {
        bail!("{flag} needs at least one cutoff");
    }
    if values.contains(&0) {
        bail!("{flag} cutoffs must be positive");
    }

    let mut cutoffs = values.to_vec();
    cutoffs.sort_unstable();
    cutoffs.dedup();
    Ok(cutoffs)
}

fn validate_rerank_scale(scale: f64) -> Result<f64> {
    if !scale.is_finite() || scale < 0.0 {
        bail!("--rerank-scale must be a finite, non-negative number (got {scale})");
    }
    if scale != NEUTRAL_RERANK_SCALE {
        warn!(
            rerank_scale = scale,
            "re-ranked scores are scaled; reported uplift is simulated, not measured"
        );
    }
    Ok(scale)
}
