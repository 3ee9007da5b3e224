use monoxide::model::{MockModel, Model};
use monoxide::monitor::{KeywordMonitor, Monitor};
use monoxide::mutator::{Mutator, PassthroughMutator, ShuffleMutator};
use monoxide::oracle::{KeywordOracle, Oracle};
use monoxide::runner::{RunConfig, Runner};
use monoxide::seeded_rng;

use clap::{Parser, ValueEnum};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "MonOxide",
    about = "Offline evaluation of LLM safety monitors under adversarial prompt mutation"
)]
struct Cli {
    /// Path to a JSON file containing an ordered array of attack prompts
    #[arg(long)]
    attacks: PathBuf,

    /// Maximum number of cases to sample from the corpus
    #[arg(long, default_value_t = 200)]
    n: usize,

    /// Seed for the run's shared random stream
    #[arg(long, default_value_t = 123)]
    seed: u64,

    /// Where to write the JSON report
    #[arg(long, default_value = "out/report.json")]
    report: PathBuf,

    /// Which mutation to apply to each prompt before submission
    #[arg(long, value_enum, default_value_t = MutatorType::Shuffle)]
    mutator: MutatorType,

    /// Suppress per-case progress output
    #[arg(long, default_value = "false")]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum MutatorType {
    Shuffle,
    Passthrough,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !cli.quiet {
        println!("{}", "Initializing MonOxide...".bold().cyan());
    }

    // 1. One stream for the whole run: the mutator's permutations and the mock
    // model's choices must advance the same sequence for seed reproducibility.
    let rng = seeded_rng(cli.seed);

    // 2. Instantiate Collaborators
    let model: Arc<dyn Model> = Arc::new(MockModel::new(Arc::clone(&rng)));
    let monitor: Arc<dyn Monitor> = Arc::new(KeywordMonitor::default());
    let oracle: Arc<dyn Oracle> = Arc::new(KeywordOracle::default());

    // 3. Select Mutator
    let mutator: Arc<dyn Mutator> = match cli.mutator {
        MutatorType::Shuffle => Arc::new(ShuffleMutator),
        MutatorType::Passthrough => Arc::new(PassthroughMutator),
    };

    // 4. Run
    let config = RunConfig {
        attacks: cli.attacks,
        sample_count: cli.n,
        seed: cli.seed,
        report: cli.report.clone(),
    };
    let runner = Runner::new(config).quiet(cli.quiet);
    let report = runner.run(mutator, model, monitor, oracle, rng).await?;

    // 5. Report
    if !cli.quiet {
        println!("Cases evaluated: {}", report.n_cases);
        println!(
            "Violations detected: {}",
            format!("{}", report.detected_violations).red().bold()
        );
        println!("Report saved to {}", cli.report.display());
    }
    println!("{}", report.to_json_pretty()?);

    Ok(())
}
