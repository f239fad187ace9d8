mod classifier;
mod extract;
mod input;
mod logging;
mod model;
mod pipeline;
mod report;
mod scoring;

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::extract::{ExtractParams, run_extract};
use crate::input::predictions::load_predictions;
use crate::model::metrics::{HAM, SPAM};
use crate::model::profile::{EvalProfile, ModelKind};
use crate::pipeline::PipelineError;
use crate::pipeline::stage1_load::{Stage1Params, run_stage1};
use crate::pipeline::stage2_split::{Stage2Params, run_stage2};
use crate::pipeline::stage3_fit::run_stage3;
use crate::pipeline::stage4_score::run_stage4;
use crate::pipeline::stage5_report::{Stage5Input, write_reports};
use crate::report::ReportFormat;
use crate::report::json::{RunSummary, ScoreEntry, TOOL_NAME, render_summary_json};
use crate::report::text::render_score_block;
use crate::scoring::score;

#[derive(Debug, Parser)]
#[command(name = "hamspam-eval", version, about = "Train and score ham/spam classifiers")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug). RUST_LOG overrides it.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load ham and spam tables, fit the models and score both partitions.
    Run(RunArgs),
    /// Score an existing table of true and predicted labels.
    Score(ScoreArgs),
    /// Extract header features from e-mail message files.
    Extract(ExtractArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    #[arg(long)]
    ham: PathBuf,
    #[arg(long)]
    spam: PathBuf,
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "text")]
    format: ReportFormat,
    /// Classifier to evaluate; repeat for several.
    #[arg(long = "model", value_enum)]
    models: Vec<ModelKind>,
    /// Evaluate every classifier family.
    #[arg(long, conflicts_with = "models")]
    compare: bool,
    #[arg(long)]
    test_fraction: Option<f64>,
    #[arg(long)]
    split_seed: Option<u64>,
    #[arg(long)]
    shuffle_seed: Option<u64>,
    #[arg(long)]
    label_column: Option<String>,
    /// Column excluded from the features; repeatable. Replaces the default `Fname`.
    #[arg(long = "drop-column")]
    drop_columns: Vec<String>,
    /// Boosting rounds of the gbdt model.
    #[arg(long)]
    iterations: Option<usize>,
    #[arg(long)]
    learning_rate: Option<f64>,
    /// Depth of each boosted tree.
    #[arg(long)]
    boost_depth: Option<u32>,
    #[arg(long)]
    max_depth: Option<usize>,
    #[arg(long)]
    min_weight_leaf: Option<f32>,
    #[arg(long)]
    max_iterations: Option<u64>,
    #[arg(long)]
    alpha: Option<f64>,
}

#[derive(Debug, Args)]
struct ScoreArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value = "y_true")]
    true_column: String,
    #[arg(long, default_value = "y_pred")]
    pred_column: String,
    #[arg(long, value_enum, default_value = "text")]
    format: ReportFormat,
    /// Title used for the report block.
    #[arg(long, default_value = "model")]
    name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LabelArg {
    Ham,
    Spam,
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Message file or directory of message files.
    #[arg(long)]
    input: PathBuf,
    /// Also write a flattened CSV table here.
    #[arg(long, requires = "label")]
    table: Option<PathBuf>,
    #[arg(long, value_enum)]
    label: Option<LabelArg>,
}

#[derive(Debug, Clone)]
struct RunConfig {
    ham: PathBuf,
    spam: PathBuf,
    out_dir: Option<PathBuf>,
    format: ReportFormat,
    profile: EvalProfile,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Run(args) => {
            run_evaluation(&build_run_config(args)?).map_err(|e| e.to_string())
        }
        Command::Score(args) => run_score(&args),
        Command::Extract(args) => {
            let label = match args.label {
                Some(LabelArg::Spam) => SPAM,
                Some(LabelArg::Ham) | None => HAM,
            };
            run_extract(&ExtractParams {
                input: &args.input,
                table: args.table.as_deref(),
                label,
            })
            .map(|_| ())
            .map_err(|e| e.to_string())
        }
    }
}

/// Applies CLI overrides on top of the default profile.
fn build_run_config(args: RunArgs) -> Result<RunConfig, String> {
    let mut profile = if args.compare {
        EvalProfile::compare_v1()
    } else {
        EvalProfile::default_v1()
    };
    if !args.models.is_empty() {
        let mut models = Vec::with_capacity(args.models.len());
        for kind in args.models {
            if !models.contains(&kind) {
                models.push(kind);
            }
        }
        profile.models = models;
    }
    if let Some(f) = args.test_fraction {
        if !(f > 0.0 && f < 1.0) {
            return Err(format!("--test-fraction must be in (0, 1), got {f}"));
        }
        profile.test_fraction = f;
    }
    if let Some(seed) = args.split_seed {
        profile.split_seed = seed;
    }
    if let Some(seed) = args.shuffle_seed {
        profile.shuffle_seed = seed;
    }
    if let Some(label) = args.label_column {
        profile.label_column = label;
    }
    if !args.drop_columns.is_empty() {
        profile.drop_columns = args.drop_columns;
    }
    if let Some(n) = args.iterations {
        if n == 0 {
            return Err("--iterations must be at least 1".to_string());
        }
        profile.params.iterations = n;
    }
    if let Some(rate) = args.learning_rate {
        if !(rate > 0.0 && rate.is_finite()) {
            return Err(format!("--learning-rate must be positive, got {rate}"));
        }
        profile.params.learning_rate = rate;
    }
    if let Some(depth) = args.boost_depth {
        if depth == 0 {
            return Err("--boost-depth must be at least 1".to_string());
        }
        profile.params.boost_depth = depth;
    }
    if let Some(depth) = args.max_depth {
        if depth == 0 {
            return Err("--max-depth must be at least 1".to_string());
        }
        profile.params.max_depth = Some(depth);
    }
    if let Some(w) = args.min_weight_leaf {
        profile.params.min_weight_leaf = w;
    }
    if let Some(n) = args.max_iterations {
        profile.params.max_iterations = n;
    }
    if let Some(alpha) = args.alpha {
        if alpha < 0.0 {
            return Err(format!("--alpha must be non-negative, got {alpha}"));
        }
        profile.params.alpha = alpha;
    }

    Ok(RunConfig {
        ham: args.ham,
        spam: args.spam,
        out_dir: args.out,
        format: args.format,
        profile,
    })
}

fn run_evaluation(config: &RunConfig) -> Result<(), PipelineError> {
    let profile = &config.profile;
    let stage1 = run_stage1(&Stage1Params {
        ham_path: &config.ham,
        spam_path: &config.spam,
        label_column: &profile.label_column,
    })?;

    let split = run_stage2(
        stage1.table,
        &Stage2Params {
            label_column: &profile.label_column,
            drop_columns: &profile.drop_columns,
            test_fraction: profile.test_fraction,
            split_seed: profile.split_seed,
            shuffle_seed: profile.shuffle_seed,
        },
    )?;
    let split_stats = split.stats();

    let predictions = run_stage3(&split, &profile.models, &profile.params)?;
    let scored = run_stage4(&split, &predictions)?;

    let input = Stage5Input {
        profile: Some(profile),
        load: Some(&stage1.stats),
        split: Some(&split_stats),
        scored: &scored,
        version: env!("CARGO_PKG_VERSION"),
    };
    let mut stdout = std::io::stdout().lock();
    write_reports(&input, config.format, config.out_dir.as_deref(), &mut stdout)
}

fn run_score(args: &ScoreArgs) -> Result<(), String> {
    let table = load_predictions(&args.input, &args.true_column, &args.pred_column)
        .map_err(|e| e.to_string())?;
    let report = score(&table.y_true, &table.y_pred).map_err(|e| e.to_string())?;
    tracing::info!(origin = %table.origin, rows = report.n_samples(), "scored predictions");

    let rendered = match args.format {
        ReportFormat::Text => render_score_block(&args.name, &report),
        ReportFormat::Json => {
            let summary = RunSummary {
                tool: TOOL_NAME,
                version: env!("CARGO_PKG_VERSION"),
                config: None,
                data: None,
                results: vec![ScoreEntry::new(&args.name, None, &report)],
            };
            render_summary_json(&summary).map_err(|e| e.to_string())?
        }
    };
    std::io::stdout()
        .lock()
        .write_all(rendered.as_bytes())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
