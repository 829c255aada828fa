use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::InspectArgs;
use crate::config::InspectionConfig;
use crate::model::InspectionReport;
use crate::util::{now_utc_string, read_leading_lines, write_json_stdout};

use super::output::write_text_report;
use super::sample::{SampleOptions, collect_samples};

const REPORT_VERSION: u32 = 1;

pub fn run(args: InspectArgs) -> Result<()> {
    let config = InspectionConfig::from_args(args)?;
    let test_path = config.test_path.display().to_string();
    let predict_path = config.predict_path.display().to_string();

    info!(
        test_path = %test_path,
        predict_path = %predict_path,
        samples = config.sample_limit,
        "inspection requested"
    );

    let test_lines = read_leading_lines(&config.test_path, config.sample_limit)?;
    let predict_lines = read_leading_lines(&config.predict_path, config.sample_limit)?;
    if test_lines.len() != predict_lines.len() {
        warn!(
            test_lines = test_lines.len(),
            predict_lines = predict_lines.len(),
            "input files have different line counts; extra lines are ignored"
        );
    }

    let options = SampleOptions {
        delta_cutoffs: &config.delta_cutoffs,
        summary_k: config.summary_k,
        mismatch_policy: config.mismatch_policy,
    };

    let (samples, skipped_samples) = collect_samples(&test_lines, &predict_lines, &options)
        .with_context(|| format!("failed to inspect {test_path} against {predict_path}"))?;

    let report = InspectionReport {
        report_version: REPORT_VERSION,
        generated_at: now_utc_string(),
        test_path,
        predict_path,
        skipped_samples,
        samples,
    };

    if config.json {
        write_json_stdout(&report)?;
    } else {
        let mut output = io::BufWriter::new(io::stdout().lock());
        write_text_report(&mut output, &report)?;
        output.flush()?;
    }

    info!(
        samples = report.samples.len(),
        skipped = report.skipped_samples,
        "inspection completed"
    );
    Ok(())
}
