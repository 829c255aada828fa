use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_TEST_PATH: &str = "dataset/rec_test_set.sample.txt";
pub const DEFAULT_PREDICT_PATH: &str = "dataset/rec_test_set.sample.txt.predict.out";

#[derive(Parser, Debug)]
#[command(
    name = "rerank-eval",
    version,
    about = "Compare ranking quality before and after re-ranking"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Average precision metrics over every prediction record.
    Compare(CompareArgs),
    /// Show item movement for the first few samples.
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    #[arg(long, default_value = DEFAULT_PREDICT_PATH)]
    pub predict_path: PathBuf,

    #[arg(long = "precision-k", default_values_t = [5_usize, 10])]
    pub precision_cutoffs: Vec<usize>,

    #[arg(long = "ap-k", default_values_t = [5_usize, 10, 30])]
    pub ap_cutoffs: Vec<usize>,

    /// Multiplier applied to every re-ranked score before averaging. Anything
    /// other than 1.0 reports a simulated uplift, not a measured one.
    #[arg(long, default_value_t = 1.0)]
    pub rerank_scale: f64,

    #[arg(long)]
    pub report_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[arg(long, default_value = DEFAULT_TEST_PATH)]
    pub test_path: PathBuf,

    #[arg(long, default_value = DEFAULT_PREDICT_PATH)]
    pub predict_path: PathBuf,

    #[arg(long, default_value_t = 5)]
    pub samples: usize,

    #[arg(long = "delta-k", default_values_t = [5_usize, 10, 30])]
    pub delta_cutoffs: Vec<usize>,

    #[arg(long, default_value_t = 10)]
    pub summary_k: usize,

    #[arg(long, default_value_t = false)]
    pub strict_alignment: bool,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}
