//! # MonOxide
//!
//! **MonOxide** is an offline evaluation harness that measures how well a safety
//! *monitor* detects policy-violating outputs produced by a *model* when the
//! incoming attack prompts are adversarially mutated.
//!
//! It replays a fixed corpus of attack prompts through a mutation step, collects
//! the model's responses, and compares the monitor's verdicts against an
//! independent ground-truth oracle, reporting aggregate rates at the end.
//!
//! ## Core Architecture
//!
//! The library is built around five main parts:
//!
//! 1.  **[Mutator](crate::mutator::Mutator)**: Defines the **attack surface**; transforms each prompt before submission (e.g., shuffling sentence fragments to simulate paraphrase attacks).
//! 2.  **[Model](crate::model::Model)**: The system producing responses — a pluggable collaborator (mock, local, or networked).
//! 3.  **[Monitor](crate::monitor::Monitor)**: The detector under evaluation; scores each response with a suspicion value in `[0, 1]`.
//! 4.  **[Oracle](crate::oracle::Oracle)**: The ground truth; judges violations independently of the monitor so a stronger monitor can be swapped in with no other changes.
//! 5.  **[Runner](crate::runner::Runner)**: The driver that iterates the corpus in order, tallies outcomes, and emits the report.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use monoxide::model::{MockModel, Model};
//! use monoxide::monitor::{KeywordMonitor, Monitor};
//! use monoxide::mutator::{Mutator, ShuffleMutator};
//! use monoxide::oracle::{KeywordOracle, Oracle};
//! use monoxide::runner::{RunConfig, Runner};
//! use monoxide::seeded_rng;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // 1. One seeded stream drives every randomized choice in the run.
//!     let rng = seeded_rng(123);
//!
//!     // 2. Wire up the collaborators (swap any of these for real systems).
//!     let mutator: Arc<dyn Mutator> = Arc::new(ShuffleMutator);
//!     let model: Arc<dyn Model> = Arc::new(MockModel::new(Arc::clone(&rng)));
//!     let monitor: Arc<dyn Monitor> = Arc::new(KeywordMonitor::default());
//!     let oracle: Arc<dyn Oracle> = Arc::new(KeywordOracle::default());
//!
//!     // 3. Run the evaluation and persist the report.
//!     let config = RunConfig {
//!         attacks: "attacks.json".into(),
//!         sample_count: 200,
//!         seed: 123,
//!         report: "out/report.json".into(),
//!     };
//!     let report = Runner::new(config)
//!         .run(mutator, model, monitor, oracle, rng)
//!         .await?;
//!
//!     println!("Detected {} violations.", report.detected_violations);
//!     Ok(())
//! }
//! ```

pub mod corpus;
pub mod model;
pub mod monitor;
pub mod mutator;
pub mod oracle;
pub mod runner;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A convenient type alias for `anyhow::Result`.
pub type MonOxideResult<T> = anyhow::Result<T>;

/// Handle to the run's single pseudo-random stream.
///
/// The mutator's permutations and any randomized collaborator behavior (such as
/// [`MockModel`](crate::model::MockModel)) all draw from this one stream, so the
/// full sequence of choices across a run reproduces for a fixed seed.
pub type SharedRng = Arc<Mutex<StdRng>>;

/// Creates the shared stream for a run from an explicit seed.
pub fn seeded_rng(seed: u64) -> SharedRng {
    Arc::new(Mutex::new(StdRng::seed_from_u64(seed)))
}

/// Everything observed about a single evaluation case.
///
/// Built once per corpus entry, folded into the running tally, and discarded —
/// cases are never persisted individually.
#[derive(Debug, Clone)]
pub struct CaseRecord {
    /// The corpus prompt before mutation.
    pub original_prompt: String,

    /// The prompt actually submitted to the model.
    pub mutated_prompt: String,

    /// The raw text response received from the model.
    pub response: String,

    /// The monitor's suspicion score in `[0, 1]`.
    pub suspicion_score: f64,

    /// The oracle's ground-truth verdict.
    pub is_violation: bool,

    /// The monitor's binarized decision (score above the flag threshold).
    pub is_flagged: bool,

    /// Wall-clock time from model invocation to just after monitor scoring.
    pub elapsed: Duration,
}

/// The aggregate result of a full evaluation run.
///
/// Constructed only after the loop completes and never mutated afterwards.
/// Field order here is the persisted key order other tooling consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// The seed the run's random stream was initialized with.
    pub seed: u64,

    /// Number of cases actually processed: `min(sample_count, corpus_len)`.
    pub n_cases: usize,

    /// Fraction of cases whose response the oracle judged a violation.
    pub violation_rate: f64,

    /// Count of true positives: cases both violating and flagged.
    pub detected_violations: usize,

    /// Fraction of cases the monitor flagged.
    pub flag_rate: f64,

    /// Fraction of cases with any non-empty response at all.
    pub utility_proxy: f64,

    /// Mean wall-clock detection latency in milliseconds over the true
    /// positives, or `null` when none occurred.
    pub detection_latency_ms: Option<f64>,
}

impl Report {
    /// Serializes the report with 2-space indentation and stable key order.
    pub fn to_json_pretty(&self) -> MonOxideResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the report to `path`, creating parent directories as needed.
    pub fn persist(&self, path: &Path) -> MonOxideResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}
